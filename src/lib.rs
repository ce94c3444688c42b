#![forbid(unsafe_code)]

//! # anrd - annotation reader
//!
//! Extracts `@Name` / `@Name(key="value", list=["a","b"])` annotations from
//! documentation comments.
//!
//! The reader only sees a raw comment string; getting that string out of a
//! source file or a reflection API is the caller's job.
//!
//! ## Example
//!
//! ```rust
//! use anrd::{parse, ParameterValue};
//!
//! let doc = r#"/**
//!  * @Route(path="/users", methods=["GET","POST"])
//!  * @Deprecated
//!  */"#;
//!
//! let outcome = parse(doc).unwrap();
//! let route = outcome.by_name("Route")[0];
//!
//! assert_eq!(route.parameter("path"), Some(&ParameterValue::Scalar("/users".into())));
//! assert_eq!(outcome.annotations()[1].name(), "Deprecated");
//! ```

pub mod annotation;
pub mod commands;
pub mod config;
pub mod error;
pub mod parse;

// Re-exports
pub use annotation::{by_name, Annotation, ParameterValue, Parameters, IMPLICIT_KEY};
pub use config::{Config, DuplicateKeyPolicy, Strictness};
pub use error::{AnrdError, Result};
pub use parse::{
    compile, normalize, parse, tokenize, Diagnostic, DiagnosticKind, ParseOutcome, Parser,
    Severity, Token, TokenKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
