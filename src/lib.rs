#![forbid(unsafe_code)]

//! @acp:module "xml2anno Library"
//! @acp:summary "Converts Hibernate and Spring XML mappings into Java annotations"
//! @acp:domain core
//! @acp:layer api
//! @acp:stability stable
//!
//! # xml2anno
//!
//! Walks a Hibernate `<hibernate-mapping>` or Spring `<beans>` document,
//! resolves every mapped class, field and constructor in a project model,
//! and adds the equivalent JPA or Spring annotations. Re-running a
//! conversion never duplicates an annotation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use xml2anno::{convert, Config, JavaProject, MappingDocument};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let document = MappingDocument::load("Order.hbm.xml")?;
//!     let mut project = JavaProject::load("src/main/java", &config)?;
//!
//!     let report = convert(&document, None, &mut project)?;
//!     println!("{} annotations added", report.annotations_added);
//!
//!     for change in project.changes() {
//!         print!("{}", change.unified_diff());
//!     }
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod host;
pub mod mapping;
pub mod rules;

// Re-exports
pub use annotation::{
    add_if_absent, build, extract_qualified_name, has_annotation, literal, AnnotationSet,
    AnnotationSpec, MergeOutcome,
};
pub use config::{Config, ImportConfig, OutputFormat};
pub use convert::{convert, select_units, ConversionReport, SkippedUnit};
pub use error::{ConvertError, Result};
pub use host::{
    DeclId, DeclKind, DiagnosticSink, FileChange, JavaProject, MemoryProject, ProjectModel,
    WriteScope, WriteStep,
};
pub use mapping::{line_span, BeanTag, DocumentKind, HibernateTag, MappingDocument, MappingNode, Span};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
