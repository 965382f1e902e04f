//! @acp:module "Java Project"
//! @acp:summary "Project model over a Java source tree, backed by tree-sitter"
//! @acp:domain host
//! @acp:layer service
//!
//! Indexes every class (nested classes included), field and constructor of
//! the selected `.java` files. Annotations appended inside a write section
//! become staged text edits; the edits of a section are committed together
//! when it closes, and files only change on [`JavaProject::save`].

mod edit;
mod syntax;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{DeclId, DeclKind, ProjectModel, WriteScope};
use crate::annotation::{extract_qualified_name, simple_name};
use crate::config::{Config, ImportConfig};
use crate::error::{ConvertError, Result};

pub use edit::FileChange;

use edit::{annotation_edit, apply_edits, import_edit, TextEdit};
use syntax::{annotation_parses, new_parser, parse_source, ImportAnchor, InsertionPoint, ParsedSource};

#[derive(Debug)]
struct SourceFile {
    path: PathBuf,
    source: String,
    package: Option<String>,
    imports: Vec<String>,
    import_anchor: ImportAnchor,
    had_imports: bool,
    added_imports: usize,
    edits: Vec<TextEdit>,
}

#[derive(Debug)]
struct JavaDecl {
    kind: DeclKind,
    /// Qualified name for classes, simple name for members
    name: String,
    file: usize,
    owner: Option<DeclId>,
    parameter_count: Option<usize>,
    /// Index into `JavaProject::annotation_lists`; the names of one field
    /// declaration share a list
    annotations: usize,
    point: InsertionPoint,
}

/// @acp:summary "Declaration model of a Java source tree"
pub struct JavaProject {
    files: Vec<SourceFile>,
    decls: Vec<JavaDecl>,
    /// Annotation names as written in source, or qualified when added by us
    annotation_lists: Vec<Vec<String>>,
    classes: HashMap<String, DeclId>,
    imports: ImportConfig,
    parser: tree_sitter::Parser,
    section: Option<String>,
    staged: Vec<(usize, TextEdit)>,
    sections: usize,
}

impl JavaProject {
    /// @acp:summary "Index all Java files under `root` matching the config patterns"
    pub fn load<P: AsRef<Path>>(root: P, config: &Config) -> Result<Self> {
        let root = root.as_ref();
        let files = find_files(root, &config.include, &config.exclude);
        info!("Indexing {} Java files under {}", files.len(), root.display());

        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            let text = std::fs::read_to_string(&path)?;
            sources.push((path, text));
        }
        Self::from_sources(sources, config.imports.clone())
    }

    /// Index in-memory sources; paths are only used for reporting and saving
    pub fn from_sources<I>(sources: I, imports: ImportConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (PathBuf, String)>,
    {
        let mut project = Self {
            files: Vec::new(),
            decls: Vec::new(),
            annotation_lists: Vec::new(),
            classes: HashMap::new(),
            imports,
            parser: new_parser()?,
            section: None,
            staged: Vec::new(),
            sections: 0,
        };

        for (path, source) in sources {
            let parsed = parse_source(&mut project.parser, &source)?;
            if parsed.has_errors {
                warn!("{} has syntax errors; indexing what parsed", path.display());
            }
            project.index_file(path, source, parsed);
        }

        debug!(
            "Indexed {} classes, {} declarations",
            project.classes.len(),
            project.decls.len()
        );
        Ok(project)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Committed write sections so far
    pub fn section_count(&self) -> usize {
        self.sections
    }

    /// @acp:summary "Rendered before/after text of every file with committed edits"
    pub fn changes(&self) -> Vec<FileChange> {
        self.files
            .iter()
            .filter(|f| !f.edits.is_empty())
            .map(|f| FileChange {
                path: f.path.clone(),
                before: f.source.clone(),
                after: apply_edits(&f.source, &f.edits),
            })
            .collect()
    }

    /// @acp:summary "Write changed files back to disk"
    ///
    /// The index keeps describing the text it was built from; reload the
    /// project before running another conversion against the saved files.
    pub fn save(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for change in self.changes() {
            std::fs::write(&change.path, &change.after)?;
            written.push(change.path);
        }
        Ok(written)
    }

    fn index_file(&mut self, path: PathBuf, source: String, parsed: ParsedSource) {
        let file = self.files.len();

        for class in parsed.classes {
            let annotations = self.annotation_list(class.annotations);
            let class_id = self.push(JavaDecl {
                kind: DeclKind::Class,
                name: class.qualified_name.clone(),
                file,
                owner: None,
                parameter_count: None,
                annotations,
                point: class.point,
            });
            if self.classes.contains_key(&class.qualified_name) {
                warn!(
                    "Duplicate class {} in {}; keeping the first definition",
                    class.qualified_name,
                    path.display()
                );
            } else {
                self.classes.insert(class.qualified_name, class_id);
            }

            for field in class.fields {
                let annotations = self.annotation_list(field.annotations);
                for name in field.names {
                    self.push(JavaDecl {
                        kind: DeclKind::Field,
                        name,
                        file,
                        owner: Some(class_id),
                        parameter_count: None,
                        annotations,
                        point: field.point.clone(),
                    });
                }
            }
            for constructor in class.constructors {
                let annotations = self.annotation_list(constructor.annotations);
                self.push(JavaDecl {
                    kind: DeclKind::Constructor,
                    name: "<init>".to_string(),
                    file,
                    owner: Some(class_id),
                    parameter_count: Some(constructor.parameter_count),
                    annotations,
                    point: constructor.point,
                });
            }
        }

        self.files.push(SourceFile {
            path,
            source,
            package: parsed.package,
            had_imports: !parsed.imports.is_empty(),
            imports: parsed.imports,
            import_anchor: parsed.import_anchor,
            added_imports: 0,
            edits: Vec::new(),
        });
    }

    fn annotation_list(&mut self, names: Vec<String>) -> usize {
        self.annotation_lists.push(names);
        self.annotation_lists.len() - 1
    }

    fn push(&mut self, decl: JavaDecl) -> DeclId {
        self.decls.push(decl);
        DeclId(self.decls.len() - 1)
    }

    /// Resolve a name as written through the file's single-type imports
    fn qualify(&self, file: usize, name: &str) -> String {
        if name.contains('.') {
            return name.to_string();
        }
        let suffix = format!(".{}", name);
        self.files[file]
            .imports
            .iter()
            .find(|i| i.ends_with(&suffix))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Stage an import unless the file already sees the type
    fn ensure_import(&mut self, file: usize, import: &str) {
        let source = &mut self.files[file];
        if source.imports.iter().any(|i| i == import) {
            return;
        }
        if !import.ends_with(".*") {
            if let Some((package, _)) = import.rsplit_once('.') {
                let wildcard = format!("{}.*", package);
                if source.package.as_deref() == Some(package)
                    || source.imports.iter().any(|i| *i == wildcard)
                {
                    return;
                }
            }
        }

        let first = !source.had_imports && source.added_imports == 0;
        let edit = import_edit(source.import_anchor, import, first);
        source.imports.push(import.to_string());
        source.added_imports += 1;
        self.staged.push((file, edit));
    }

    /// False when the file already binds `simple` through a single-type
    /// import, or imports a same-named package on demand: with both
    /// `jakarta.persistence.*` and `javax.persistence.*` every simple name
    /// would be ambiguous
    fn wants_default_import(&self, file: usize, import: &str, simple: &str) -> bool {
        let imports = &self.files[file].imports;
        let suffix = format!(".{}", simple);
        if imports.iter().any(|i| i.ends_with(&suffix)) {
            return false;
        }

        let Some(package) = import.strip_suffix(".*") else {
            return true;
        };
        let last_segment = simple_name(package);
        !imports.iter().any(|i| {
            i.strip_suffix(".*")
                .is_some_and(|other| other != package && simple_name(other) == last_segment)
        })
    }

    /// Text to write for an annotation whose name is qualified: the simple
    /// form plus an import, unless another import already owns the simple name
    fn shorten(&mut self, file: usize, qualified: &str, text: &str) -> String {
        let simple = simple_name(qualified);
        let suffix = format!(".{}", simple);
        let clashes = self.files[file]
            .imports
            .iter()
            .any(|i| i.ends_with(&suffix) && i != qualified);
        if clashes {
            return text.trim().to_string();
        }

        self.ensure_import(file, qualified);
        let body = text.trim().trim_start_matches('@');
        let rest = body.strip_prefix(qualified).unwrap_or("");
        format!("@{}{}", simple, rest)
    }
}

impl ProjectModel for JavaProject {
    fn resolve_class(&self, qualified_name: &str) -> Option<DeclId> {
        self.classes
            .get(qualified_name)
            .or_else(|| self.classes.get(&qualified_name.replace('$', ".")))
            .copied()
    }

    fn find_field(&self, owner: DeclId, name: &str) -> Option<DeclId> {
        self.decls
            .iter()
            .position(|d| d.kind == DeclKind::Field && d.owner == Some(owner) && d.name == name)
            .map(DeclId)
    }

    fn constructors(&self, owner: DeclId) -> Vec<DeclId> {
        self.decls
            .iter()
            .enumerate()
            .filter(|(_, d)| d.kind == DeclKind::Constructor && d.owner == Some(owner))
            .map(|(i, _)| DeclId(i))
            .collect()
    }

    fn parameter_count(&self, decl: DeclId) -> Option<usize> {
        self.decls.get(decl.0).and_then(|d| d.parameter_count)
    }

    fn annotations(&self, decl: DeclId) -> Vec<String> {
        let Some(d) = self.decls.get(decl.0) else {
            return Vec::new();
        };
        self.annotation_lists[d.annotations]
            .iter()
            .map(|n| self.qualify(d.file, n))
            .collect()
    }

    fn display_name(&self, decl: DeclId) -> String {
        let Some(d) = self.decls.get(decl.0) else {
            return format!("<unknown #{}>", decl.0);
        };
        let owner = d.owner.and_then(|o| self.decls.get(o.0)).map(|o| o.name.as_str());
        match (d.kind, owner) {
            (DeclKind::Constructor, Some(owner)) => {
                format!("{}({} params)", owner, d.parameter_count.unwrap_or_default())
            }
            (_, Some(owner)) => format!("{}.{}", owner, d.name),
            (_, None) => d.name.clone(),
        }
    }

    fn append_annotation(&mut self, decl: DeclId, text: &str) -> Result<()> {
        if decl.0 >= self.decls.len() {
            return Err(ConvertError::UnknownDeclaration(decl.0));
        }
        if self.section.is_none() {
            return Err(ConvertError::NoWriteSection(text.to_string()));
        }
        if !annotation_parses(&mut self.parser, text) {
            return Err(ConvertError::InvalidAnnotation(text.to_string()));
        }
        let name = extract_qualified_name(text)
            .ok_or_else(|| ConvertError::InvalidAnnotation(text.to_string()))?;

        let file = self.decls[decl.0].file;
        let written = if name.contains('.') && self.imports.shorten_qualified {
            self.shorten(file, &name, text)
        } else {
            if !name.contains('.') {
                if let Some(import) = self.imports.default_import.clone() {
                    if self.wants_default_import(file, &import, &name) {
                        self.ensure_import(file, &import);
                    }
                }
            }
            text.trim().to_string()
        };

        let edit = annotation_edit(&self.decls[decl.0].point, &written);
        self.staged.push((file, edit));
        let list = self.decls[decl.0].annotations;
        self.annotation_lists[list].push(name);
        Ok(())
    }
}

impl WriteScope for JavaProject {
    fn write_section<R>(&mut self, label: &str, body: impl FnOnce(&mut Self) -> R) -> Result<R> {
        if let Some(active) = &self.section {
            return Err(ConvertError::Other(format!(
                "write section '{}' opened while '{}' is active",
                label, active
            )));
        }

        self.section = Some(label.to_string());
        self.staged.clear();
        let result = body(self);
        self.section = None;

        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        for (file, edit) in staged {
            self.files[file].edits.push(edit);
        }
        self.sections += 1;
        debug!("Committed write section '{}' with {} edits", label, count);
        Ok(result)
    }
}

/// @acp:summary "Find all files matching include/exclude patterns"
fn find_files(root: &Path, include: &[String], exclude: &[String]) -> Vec<PathBuf> {
    let include_patterns: Vec<_> = include.iter().filter_map(|p| Pattern::new(p).ok()).collect();
    let exclude_patterns: Vec<_> = exclude.iter().filter_map(|p| Pattern::new(p).ok()).collect();
    let match_opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            // Match against the path relative to root
            let relative = e
                .path()
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|_| e.path().to_string_lossy().to_string());

            let included = include_patterns.is_empty()
                || include_patterns.iter().any(|p| p.matches_with(&relative, match_opts));
            let excluded = exclude_patterns.iter().any(|p| p.matches_with(&relative, match_opts));
            included && !excluded
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}
