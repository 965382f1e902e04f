//! @acp:module "Source Edits"
//! @acp:summary "Text insertions against the original Java source and their rendering"
//! @acp:domain host
//! @acp:layer service
//!
//! All offsets refer to the text as it was indexed. Edits are only applied
//! when changes are rendered, so handles and insertion points stay valid for
//! the lifetime of the project.

use std::path::PathBuf;

use serde::Serialize;
use similar::TextDiff;

use super::syntax::{ImportAnchor, InsertionPoint};

/// Imports sort before annotations sharing the same offset
const RANK_IMPORT: u8 = 0;
const RANK_ANNOTATION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextEdit {
    pub offset: usize,
    pub rank: u8,
    pub text: String,
}

/// Insert annotation text at a declaration's insertion point
pub(crate) fn annotation_edit(point: &InsertionPoint, annotation: &str) -> TextEdit {
    let text = if point.after_annotation {
        format!("\n{}{}", point.indent, annotation)
    } else {
        format!("{}\n{}", annotation, point.indent)
    };
    TextEdit {
        offset: point.offset,
        rank: RANK_ANNOTATION,
        text,
    }
}

/// Insert one import line; `first` marks the first import of a file that had none
pub(crate) fn import_edit(anchor: ImportAnchor, import: &str, first: bool) -> TextEdit {
    let (offset, text) = match anchor {
        ImportAnchor::AfterImports(offset) => (offset, format!("\nimport {};", import)),
        ImportAnchor::AfterPackage(offset) if first => (offset, format!("\n\nimport {};", import)),
        ImportAnchor::AfterPackage(offset) => (offset, format!("\nimport {};", import)),
        ImportAnchor::Start => (0, format!("import {};\n", import)),
    };
    TextEdit {
        offset,
        rank: RANK_IMPORT,
        text,
    }
}

/// Apply edits in offset order; edits at the same offset keep their relative order
pub(crate) fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|e| (e.offset, e.rank));

    let mut out = String::with_capacity(source.len() + edits.iter().map(|e| e.text.len()).sum::<usize>());
    let mut cursor = 0;
    for edit in ordered {
        let offset = edit.offset.min(source.len());
        if offset > cursor {
            out.push_str(&source[cursor..offset]);
            cursor = offset;
        }
        out.push_str(&edit.text);
    }
    out.push_str(&source[cursor..]);
    out
}

/// @acp:summary "Before/after text of one changed Java file"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub before: String,
    pub after: String,
}

impl FileChange {
    /// Unified diff with three lines of context
    pub fn unified_diff(&self) -> String {
        let name = self.path.display().to_string();
        let diff = TextDiff::from_lines(&self.before, &self.after);
        diff.unified_diff()
            .context_radius(3)
            .header(&format!("a/{}", name), &format!("b/{}", name))
            .to_string()
    }

    /// Number of lines added by the change
    pub fn lines_added(&self) -> usize {
        self.after.lines().count().saturating_sub(self.before.lines().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn point(offset: usize, indent: &str, after_annotation: bool) -> InsertionPoint {
        InsertionPoint {
            offset,
            indent: indent.to_string(),
            after_annotation,
        }
    }

    #[test]
    fn test_same_offset_keeps_order() {
        let source = "class A {\n    int x;\n}\n";
        let at = source.find("int x").unwrap();
        let edits = vec![
            annotation_edit(&point(at, "    ", false), "@Id"),
            annotation_edit(&point(at, "    ", false), "@Column(name = \"x\")"),
        ];
        assert_eq!(
            apply_edits(source, &edits),
            "class A {\n    @Id\n    @Column(name = \"x\")\n    int x;\n}\n"
        );
    }

    #[test]
    fn test_append_after_existing_annotation() {
        let source = "class A {\n    @Id\n    int x;\n}\n";
        let at = source.find("@Id").unwrap() + 3;
        let edits = vec![annotation_edit(&point(at, "    ", true), "@GeneratedValue")];
        assert_eq!(
            apply_edits(source, &edits),
            "class A {\n    @Id\n    @GeneratedValue\n    int x;\n}\n"
        );
    }

    #[test]
    fn test_imports_sort_before_annotations_at_same_offset() {
        let source = "class A {}\n";
        let edits = vec![
            annotation_edit(&point(0, "", false), "@Entity"),
            import_edit(ImportAnchor::Start, "javax.persistence.*", true),
        ];
        assert_eq!(
            apply_edits(source, &edits),
            "import javax.persistence.*;\n@Entity\nclass A {}\n"
        );
    }

    #[test]
    fn test_import_after_package() {
        let source = "package a;\n\nclass A {}\n";
        let at = source.find(';').unwrap() + 1;
        let edits = vec![
            import_edit(ImportAnchor::AfterPackage(at), "x.Y", true),
            import_edit(ImportAnchor::AfterPackage(at), "x.Z", false),
        ];
        assert_eq!(
            apply_edits(source, &edits),
            "package a;\n\nimport x.Y;\nimport x.Z;\n\nclass A {}\n"
        );
    }

    #[test]
    fn test_unified_diff() {
        let change = FileChange {
            path: PathBuf::from("A.java"),
            before: "class A {}\n".to_string(),
            after: "@Entity\nclass A {}\n".to_string(),
        };
        let diff = change.unified_diff();
        assert!(diff.contains("--- a/A.java"));
        assert!(diff.contains("+++ b/A.java"));
        assert!(diff.contains("+@Entity"));
        assert_eq!(change.lines_added(), 1);
    }
}
