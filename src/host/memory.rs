//! @acp:module "In-Memory Project"
//! @acp:summary "Declaration table host for tests and embedding"
//! @acp:domain core
//! @acp:layer service
//!
//! Each write section is journaled as a [`WriteStep`], which is the unit a
//! host would offer for undo.

use std::collections::HashMap;

use super::{DeclId, DeclKind, ProjectModel, WriteScope};
use crate::annotation::extract_qualified_name;
use crate::error::{ConvertError, Result};

#[derive(Debug, Clone)]
struct MemoryDecl {
    kind: DeclKind,
    name: String,
    owner: Option<DeclId>,
    parameter_count: Option<usize>,
    annotations: Vec<String>,
}

/// @acp:summary "Annotations appended inside one write section"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStep {
    pub label: String,
    pub appended: Vec<(DeclId, String)>,
}

/// @acp:summary "In-memory declaration model"
#[derive(Debug, Default)]
pub struct MemoryProject {
    decls: Vec<MemoryDecl>,
    classes: HashMap<String, DeclId>,
    open_step: Option<WriteStep>,
    steps: Vec<WriteStep>,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class under its fully qualified name
    pub fn add_class(&mut self, qualified_name: &str) -> DeclId {
        let id = self.push(MemoryDecl {
            kind: DeclKind::Class,
            name: qualified_name.to_string(),
            owner: None,
            parameter_count: None,
            annotations: Vec::new(),
        });
        self.classes.insert(qualified_name.to_string(), id);
        id
    }

    pub fn add_field(&mut self, owner: DeclId, name: &str) -> DeclId {
        self.push(MemoryDecl {
            kind: DeclKind::Field,
            name: name.to_string(),
            owner: Some(owner),
            parameter_count: None,
            annotations: Vec::new(),
        })
    }

    pub fn add_constructor(&mut self, owner: DeclId, parameter_count: usize) -> DeclId {
        self.push(MemoryDecl {
            kind: DeclKind::Constructor,
            name: "<init>".to_string(),
            owner: Some(owner),
            parameter_count: Some(parameter_count),
            annotations: Vec::new(),
        })
    }

    /// Seed an existing annotation, bypassing write sections and validation
    pub fn annotate(&mut self, decl: DeclId, text: &str) {
        if let Some(d) = self.decls.get_mut(decl.0) {
            let text = if text.starts_with('@') {
                text.to_string()
            } else {
                format!("@{}", text)
            };
            d.annotations.push(text);
        }
    }

    /// Full annotation texts on a declaration, in the order they were added
    pub fn annotation_texts(&self, decl: DeclId) -> &[String] {
        self.decls
            .get(decl.0)
            .map(|d| d.annotations.as_slice())
            .unwrap_or(&[])
    }

    /// Completed write sections
    pub fn steps(&self) -> &[WriteStep] {
        &self.steps
    }

    fn push(&mut self, decl: MemoryDecl) -> DeclId {
        self.decls.push(decl);
        DeclId(self.decls.len() - 1)
    }

    fn decl(&self, decl: DeclId) -> Result<&MemoryDecl> {
        self.decls
            .get(decl.0)
            .ok_or(ConvertError::UnknownDeclaration(decl.0))
    }
}

impl ProjectModel for MemoryProject {
    fn resolve_class(&self, qualified_name: &str) -> Option<DeclId> {
        self.classes.get(qualified_name).copied()
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
        self.annotation_texts(decl)
            .iter()
            .filter_map(|text| extract_qualified_name(text))
            .collect()
    }

    fn display_name(&self, decl: DeclId) -> String {
        let Some(d) = self.decls.get(decl.0) else {
            return format!("<unknown #{}>", decl.0);
        };
        match d.owner.and_then(|o| self.decls.get(o.0)) {
            Some(owner) => match d.kind {
                DeclKind::Constructor => format!(
                    "{}({} params)",
                    owner.name,
                    d.parameter_count.unwrap_or_default()
                ),
                _ => format!("{}.{}", owner.name, d.name),
            },
            None => d.name.clone(),
        }
    }

    fn append_annotation(&mut self, decl: DeclId, text: &str) -> Result<()> {
        self.decl(decl)?;
        if !is_well_formed(text) {
            return Err(ConvertError::InvalidAnnotation(text.to_string()));
        }
        let Some(step) = self.open_step.as_mut() else {
            return Err(ConvertError::NoWriteSection(text.to_string()));
        };

        step.appended.push((decl, text.to_string()));
        self.decls[decl.0].annotations.push(text.to_string());
        Ok(())
    }
}

impl WriteScope for MemoryProject {
    fn write_section<R>(&mut self, label: &str, body: impl FnOnce(&mut Self) -> R) -> Result<R> {
        if self.open_step.is_some() {
            return Err(ConvertError::Other(format!(
                "write section '{}' opened while another is active",
                label
            )));
        }

        self.open_step = Some(WriteStep {
            label: label.to_string(),
            appended: Vec::new(),
        });
        let result = body(self);
        if let Some(step) = self.open_step.take() {
            self.steps.push(step);
        }
        Ok(result)
    }
}

/// Structural check standing in for a real annotation parser: a valid name,
/// balanced `()`/`{}` outside string literals, and nothing after the
/// argument list.
fn is_well_formed(text: &str) -> bool {
    let text = text.trim();
    if !text.starts_with('@') || extract_qualified_name(text).is_none() {
        return false;
    }

    let mut depth: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut closed_args = false;

    for c in text.chars() {
        if closed_args {
            return false;
        }
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '{' => depth.push(c),
            ')' => {
                if depth.pop() != Some('(') {
                    return false;
                }
                if depth.is_empty() {
                    closed_args = true;
                }
            }
            '}' => {
                if depth.pop() != Some('{') {
                    return false;
                }
            }
            _ => {}
        }
    }

    !in_string && depth.is_empty()
}
