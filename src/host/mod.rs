//! @acp:module "Host Interfaces"
//! @acp:summary "Capabilities the conversion engine needs from its host project"
//! @acp:domain core
//! @acp:layer api
//!
//! The engine never owns declarations. A host hands out opaque [`DeclId`]
//! handles, answers name lookups, lists annotations, and accepts new
//! annotation text inside a write section. Two hosts ship with the crate:
//!
//! - [`MemoryProject`]: a plain in-memory declaration table
//! - [`JavaProject`]: a Java source tree indexed with tree-sitter

pub mod java;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use java::{FileChange, JavaProject};
pub use memory::{MemoryProject, WriteStep};

/// @acp:summary "Opaque handle to a class, field or constructor"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub usize);

/// Kind of declaration behind a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Field,
    Constructor,
}

/// @acp:summary "Declaration lookup and annotation mutation"
pub trait ProjectModel {
    /// Find a class by fully qualified name
    fn resolve_class(&self, qualified_name: &str) -> Option<DeclId>;

    /// Find a field declared directly on `owner`
    fn find_field(&self, owner: DeclId, name: &str) -> Option<DeclId>;

    /// Constructors declared on `owner`, in source order
    fn constructors(&self, owner: DeclId) -> Vec<DeclId>;

    /// Declared parameter count (constructors only)
    fn parameter_count(&self, decl: DeclId) -> Option<usize>;

    /// Names of the annotations currently on `decl`, qualified where the host
    /// can resolve them
    fn annotations(&self, decl: DeclId) -> Vec<String>;

    /// Human-readable name for logs and reports
    fn display_name(&self, decl: DeclId) -> String;

    /// Attach annotation text to `decl`.
    ///
    /// Fails with `InvalidAnnotation` when the text does not parse as an
    /// annotation, and with `NoWriteSection` when called outside
    /// [`WriteScope::write_section`].
    fn append_annotation(&mut self, decl: DeclId, text: &str) -> Result<()>;
}

/// @acp:summary "Scoped exclusive write access delimiting one undo step"
pub trait WriteScope: ProjectModel {
    fn write_section<R>(&mut self, label: &str, body: impl FnOnce(&mut Self) -> R) -> Result<R>
    where
        Self: Sized;
}

/// @acp:summary "Single-line channel for non-fatal failures"
pub trait DiagnosticSink {
    fn emit(&mut self, message: String);
}

impl DiagnosticSink for Vec<String> {
    fn emit(&mut self, message: String) {
        self.push(message);
    }
}
