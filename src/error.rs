//! Error types
//!
//! Library-level failures. Commands wrap these in `anyhow` at the CLI edge.

use thiserror::Error;

use crate::parse::DiagnosticKind;

/// Errors produced by the annotation reader
#[derive(Debug, Error)]
pub enum AnrdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Raised in strict mode for any error-severity diagnostic
    #[error("Malformed annotation at offset {offset}: {kind}")]
    Malformed { kind: DiagnosticKind, offset: usize },

    /// Input ended inside a parameter list; always fatal
    #[error("Unexpected end of input inside parameters of @{annotation} (offset {offset})")]
    UnexpectedEnd { annotation: String, offset: usize },
}

pub type Result<T> = std::result::Result<T, AnrdError>;
