//! Annotation compiler
//!
//! Walks the token stream once, looking for `@` markers and turning each
//! `@Name` / `@Name(...)` into an [`Annotation`]. The pass is lenient. A
//! marker with no name at all stops it. A marker spaced apart from its name,
//! or any token that fits nowhere, is skipped. Everything is reported
//! through diagnostics.

use crate::annotation::{Annotation, ParameterValue, Parameters, IMPLICIT_KEY};
use crate::config::DuplicateKeyPolicy;

use super::lexer::{Token, TokenKind};
use super::{Diagnostic, DiagnosticKind, ParseOutcome};

/// The pass cannot continue; the diagnostic is already recorded
struct Halt;

type Step<T> = std::result::Result<T, Halt>;

/// Compile tokens into annotations with the default duplicate key policy
pub fn compile(tokens: &[Token]) -> ParseOutcome {
    compile_with(tokens, DuplicateKeyPolicy::default())
}

pub fn compile_with(tokens: &[Token], duplicates: DuplicateKeyPolicy) -> ParseOutcome {
    Compiler::new(tokens, duplicates).run()
}

struct Compiler<'t> {
    tokens: &'t [Token],
    duplicates: DuplicateKeyPolicy,
    annotations: Vec<Annotation>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Compiler<'t> {
    fn new(tokens: &'t [Token], duplicates: DuplicateKeyPolicy) -> Self {
        Self {
            tokens,
            duplicates,
            annotations: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> ParseOutcome {
        let mut i = 0;
        while i < self.tokens.len() {
            if self.kind_at(i) != TokenKind::AnnotationMarker {
                i += 1;
                continue;
            }
            match self.annotation(i) {
                Ok(next) => i = next,
                Err(Halt) => {
                    if let Some(diag) = self.diagnostics.last() {
                        tracing::warn!(
                            offset = diag.offset,
                            kept = self.annotations.len(),
                            "annotation pass stopped: {}",
                            diag.kind
                        );
                    }
                    break;
                }
            }
        }

        ParseOutcome {
            annotations: self.annotations,
            diagnostics: self.diagnostics,
        }
    }

    /// Compile the annotation whose marker sits at `at`. Returns the index to
    /// resume scanning from.
    fn annotation(&mut self, at: usize) -> Step<usize> {
        let marker_end = self.tokens[at].end_offset();
        let name = match self.tokens.get(at + 1) {
            Some(tok) if tok.kind() == TokenKind::Identifier && tok.offset() == marker_end => {
                tok.text().to_string()
            }
            Some(tok) if tok.kind() == TokenKind::Identifier => {
                // `@ name`: not an annotation, scanning resumes at the name
                let kind = DiagnosticKind::DetachedName {
                    name: tok.text().to_string(),
                };
                self.report(kind, self.tokens[at].offset());
                return Ok(at + 1);
            }
            _ => {
                let found = self.kind_at(at + 1);
                self.report(DiagnosticKind::MalformedHead { found }, self.tokens[at].offset());
                return Err(Halt);
            }
        };

        let after = at + 2;
        match self.kind_at(after) {
            TokenKind::AnnotationMarker | TokenKind::End => {
                self.emit(name, Parameters::new());
                Ok(after)
            }
            TokenKind::OpenParen if self.kind_at(after + 1) == TokenKind::CloseParen => {
                self.emit(name, Parameters::new());
                Ok(after + 2)
            }
            TokenKind::OpenParen => {
                let (params, next) = self.parameters(&name, after)?;
                self.emit(name, params);
                Ok(next)
            }
            found => {
                let offset = self.offset_at(after);
                self.report(
                    DiagnosticKind::UnexpectedToken {
                        annotation: name,
                        found,
                    },
                    offset,
                );
                Ok(after)
            }
        }
    }

    /// Parameter list opened at `open`. Returns the parameters and the index
    /// after the list.
    fn parameters(&mut self, name: &str, open: usize) -> Step<(Parameters, usize)> {
        let mut params = Parameters::new();
        let mut comma = false;
        let mut i = open;

        loop {
            i += 1;
            match self.kind_at(i) {
                TokenKind::OpenBracket => {
                    // A positional list is the whole parameter list
                    let offset = self.offset_at(i);
                    let (items, close) = self.list(name, i)?;
                    self.store(name, &mut params, IMPLICIT_KEY, ParameterValue::List(items), offset);
                    return Ok((params, close + 1));
                }
                TokenKind::Identifier if params.is_empty() || comma => {
                    let key = self.tokens[i].text().to_string();
                    let key_offset = self.tokens[i].offset();
                    i += 1;
                    if self.kind_at(i) == TokenKind::Assign {
                        i += 1;
                        match self.kind_at(i) {
                            TokenKind::OpenBracket => {
                                let (items, close) = self.list(name, i)?;
                                self.store(name, &mut params, &key, ParameterValue::List(items), key_offset);
                                i = close;
                                comma = false;
                            }
                            TokenKind::StringLiteral => {
                                let value = self.tokens[i].unquoted().to_string();
                                self.store(name, &mut params, &key, ParameterValue::Scalar(value), key_offset);
                                comma = false;
                            }
                            _ => {}
                        }
                    }
                }
                TokenKind::StringLiteral if params.is_empty() => {
                    let value = self.tokens[i].unquoted().to_string();
                    let offset = self.tokens[i].offset();
                    self.store(name, &mut params, IMPLICIT_KEY, ParameterValue::Scalar(value), offset);
                }
                _ => {}
            }

            match self.kind_at(i) {
                TokenKind::Comma => comma = true,
                TokenKind::CloseParen => return Ok((params, i + 1)),
                TokenKind::End => return Err(self.unexpected_end(name, i)),
                _ => {}
            }
        }
    }

    /// Bracketed string list opened at `open`. Returns the items and the
    /// index of the closing bracket.
    fn list(&mut self, name: &str, open: usize) -> Step<(Vec<String>, usize)> {
        let mut items = Vec::new();
        let mut comma = false;
        let mut i = open;

        loop {
            i += 1;
            match self.kind_at(i) {
                TokenKind::StringLiteral if items.is_empty() || comma => {
                    items.push(self.tokens[i].unquoted().to_string());
                    comma = false;
                }
                TokenKind::Comma => comma = true,
                TokenKind::CloseBracket => return Ok((items, i)),
                TokenKind::End => return Err(self.unexpected_end(name, i)),
                _ => {}
            }
        }
    }

    fn store(
        &mut self,
        annotation: &str,
        params: &mut Parameters,
        key: &str,
        value: ParameterValue,
        offset: usize,
    ) {
        if params.contains_key(key) {
            self.report(
                DiagnosticKind::DuplicateParameter {
                    annotation: annotation.to_string(),
                    key: key.to_string(),
                },
                offset,
            );
            if self.duplicates == DuplicateKeyPolicy::FirstWins {
                return;
            }
        }
        params.insert(key, value);
    }

    fn emit(&mut self, name: String, params: Parameters) {
        tracing::debug!(annotation = %name, parameters = params.len(), "compiled annotation");
        self.annotations.push(Annotation::new(name, params));
    }

    fn unexpected_end(&mut self, name: &str, at: usize) -> Halt {
        let offset = self.offset_at(at);
        self.report(
            DiagnosticKind::UnexpectedEnd {
                annotation: name.to_string(),
            },
            offset,
        );
        Halt
    }

    fn report(&mut self, kind: DiagnosticKind, offset: usize) {
        self.diagnostics.push(Diagnostic::new(kind, offset));
    }

    /// Kind at `i`; running off the slice reads as `End`
    fn kind_at(&self, i: usize) -> TokenKind {
        self.tokens.get(i).map_or(TokenKind::End, Token::kind)
    }

    fn offset_at(&self, i: usize) -> usize {
        match self.tokens.get(i) {
            Some(tok) => tok.offset(),
            None => self.tokens.last().map_or(0, Token::end_offset),
        }
    }
}
