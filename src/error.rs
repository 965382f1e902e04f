//! @acp:module "Errors"
//! @acp:summary "Error types for mapping conversion"
//! @acp:domain core
//! @acp:layer model
//!
//! Rule-level failures (missing attributes, unresolved declarations, annotation
//! text the host cannot parse) never surface here; they are recorded in the
//! conversion report. These variants cover loading, configuration and host I/O.

use thiserror::Error;

/// @acp:summary "Library error type"
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Unsupported mapping document: root tag <{0}>")]
    UnsupportedDocument(String),

    #[error("Invalid annotation text: {0}")]
    InvalidAnnotation(String),

    #[error("Unknown declaration handle: {0}")]
    UnknownDeclaration(usize),

    #[error("Mutation outside of a write section: {0}")]
    NoWriteSection(String),

    #[error("Java parse error: {0}")]
    JavaParse(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
