//! Docblock parsing
//!
//! Raw comment text goes through three stages, each consuming the previous
//! one's output:
//!
//! 1. [`normalize`] strips `/**`, `*` and leading spaces from every line
//! 2. [`tokenize`] cuts the normalized text into tokens
//! 3. [`compile`] turns tokens into [`Annotation`] records
//!
//! [`Parser`] runs the whole pipeline under a [`Config`] and decides which
//! diagnostics are fatal.

pub mod compiler;
pub mod lexer;
pub mod normalize;

use std::fmt;

use serde::Serialize;

use crate::annotation::{self, Annotation};
use crate::config::{Config, Strictness};
use crate::error::{AnrdError, Result};

pub use compiler::{compile, compile_with};
pub use lexer::{tokenize, Lexed, Lexer, Token, TokenKind};
pub use normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Something the reader skipped, tolerated or stopped on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A run of characters that is no token kind
    DroppedRun { text: String },
    /// A `"` with no closing partner; contents kept as-is
    UnterminatedString,
    /// `@` not followed by a name at all; the pass stops here
    MalformedHead { found: TokenKind },
    /// `@` separated from the following name by whitespace; no annotation
    DetachedName { name: String },
    /// `@Name` followed by something other than `(`, `@` or the end
    UnexpectedToken { annotation: String, found: TokenKind },
    /// Input ended inside `(...)` or `[...]`
    UnexpectedEnd { annotation: String },
    /// A key given twice in one annotation
    DuplicateParameter { annotation: String, key: String },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::MalformedHead { .. } | DiagnosticKind::UnexpectedEnd { .. } => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }

    /// Whether this diagnostic ended the pass early
    pub fn halts(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::MalformedHead { .. } | DiagnosticKind::UnexpectedEnd { .. }
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::DroppedRun { text } => write!(f, "dropped unrecognized text {:?}", text),
            DiagnosticKind::UnterminatedString => write!(f, "unterminated string literal"),
            DiagnosticKind::MalformedHead { found } => {
                write!(f, "expected annotation name after '@', found {}", found)
            }
            DiagnosticKind::DetachedName { name } => {
                write!(f, "'@' not attached to {:?}, ignored", name)
            }
            DiagnosticKind::UnexpectedToken { annotation, found } => {
                write!(f, "@{} followed by {}, ignored", annotation, found)
            }
            DiagnosticKind::UnexpectedEnd { annotation } => {
                write!(f, "input ended inside parameters of @{}", annotation)
            }
            DiagnosticKind::DuplicateParameter { annotation, key } => {
                write!(f, "parameter {:?} repeated in @{}", key, annotation)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    /// Byte offset into the normalized text
    pub offset: usize,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (offset {})", self.kind, self.offset)
    }
}

/// Annotations found plus everything the reader had to say about the input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub annotations: Vec<Annotation>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Annotations with exactly this name, in source order
    pub fn by_name(&self, name: &str) -> Vec<&Annotation> {
        annotation::by_name(&self.annotations, name)
    }

    /// No diagnostics of any severity
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The pass stopped before the end of the input
    pub fn is_truncated(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind.halts())
    }

    fn first_with(&self, severity: Severity) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.severity() >= severity)
    }
}

/// Runs the normalize → tokenize → compile pipeline
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: Config,
}

impl Parser {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse a raw comment block.
    ///
    /// Input ending inside a parameter list is always an error. In strict mode
    /// so is any other error-severity diagnostic; in permissive mode the
    /// annotations found before it are returned with the diagnostic attached.
    pub fn parse(&self, raw: &str) -> Result<ParseOutcome> {
        let text = normalize(raw);
        let lexed = Lexer::new(&text).run();
        let mut outcome = compile_with(&lexed.tokens, self.config.duplicate_keys);

        outcome.diagnostics.extend(lexed.diagnostics);
        outcome.diagnostics.sort_by_key(|d| d.offset);

        let unexpected_end = outcome.diagnostics.iter().find_map(|d| match &d.kind {
            DiagnosticKind::UnexpectedEnd { annotation } => Some((annotation.clone(), d.offset)),
            _ => None,
        });
        if let Some((annotation, offset)) = unexpected_end {
            return Err(AnrdError::UnexpectedEnd { annotation, offset });
        }

        if self.config.strictness == Strictness::Strict {
            if let Some(diag) = outcome.first_with(Severity::Error) {
                return Err(AnrdError::Malformed {
                    kind: diag.kind.clone(),
                    offset: diag.offset,
                });
            }
        }

        Ok(outcome)
    }
}

/// Parse with the default (permissive) configuration
pub fn parse(raw: &str) -> Result<ParseOutcome> {
    Parser::default().parse(raw)
}
