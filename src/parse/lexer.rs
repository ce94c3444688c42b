//! Tokenizer
//!
//! Splits normalized comment text into a flat [`Token`] stream. Runs of
//! ordinary characters are cut at blanks and delimiters; delimiters become
//! single-character tokens. A `"` toggles string mode, in which blanks and
//! delimiters are plain content. Runs that fit no token kind are dropped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::{Diagnostic, DiagnosticKind};

/// Characters that end a run and are emitted as their own token
const DELIMITERS: &[char] = &['@', '(', ')', '=', ',', '[', ']'];

/// Characters that end a run and are discarded
const BLANKS: &[char] = &[' ', '\n', '\r', '\t'];

/// A run starting with a word character is an identifier, whatever follows
static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9a-z_]+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Identifier,
    /// Text includes the surrounding quotes
    StringLiteral,
    OpenParen,
    CloseParen,
    Assign,
    AnnotationMarker,
    Comma,
    OpenBracket,
    CloseBracket,
    /// Synthesized once, always last
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::StringLiteral => "string literal",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::Assign => "'='",
            TokenKind::AnnotationMarker => "'@'",
            TokenKind::Comma => "','",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::End => "end of input",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    kind: TokenKind,
    text: String,
    /// Byte offset into the normalized text
    offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset just past the last character
    pub fn end_offset(&self) -> usize {
        self.offset + self.text.len()
    }

    /// String literal contents without the delimiting quotes
    pub fn unquoted(&self) -> &str {
        let mut chars = self.text.chars();
        chars.next();
        chars.next_back();
        chars.as_str()
    }
}

/// Tokens plus whatever the lexer had to drop or tolerate
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Single-pass tokenizer over normalized text
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn run(mut self) -> Lexed {
        let source = self.source;
        let mut start = 0;
        let mut string_start: Option<usize> = None;

        for (pos, ch) in source.char_indices() {
            let boundary = is_blank(ch) || is_delimiter(ch);
            if boundary && string_start.is_none() {
                self.flush(start, pos);
                let next = pos + ch.len_utf8();
                if is_delimiter(ch) {
                    self.flush(pos, next);
                }
                start = next;
            } else if ch == '"' {
                string_start = match string_start {
                    Some(_) => None,
                    None => Some(pos),
                };
            }
        }

        self.flush(start, source.len());

        if let Some(offset) = string_start {
            tracing::debug!(offset, "unterminated string literal flushed as-is");
            self.diagnostics
                .push(Diagnostic::new(DiagnosticKind::UnterminatedString, offset));
        }

        let end = source.len();
        self.tokens.push(Token::new(TokenKind::End, "", end));

        Lexed {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// Classify `source[start..end]` and push it; empty runs are ignored
    fn flush(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let run = &self.source[start..end];

        match classify(run) {
            Some(kind) => self.tokens.push(Token::new(kind, run, start)),
            None => {
                tracing::debug!(run, offset = start, "dropping unclassifiable run");
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DroppedRun {
                        text: run.to_string(),
                    },
                    start,
                ));
            }
        }
    }
}

/// Tokenize normalized text. The result always ends with one `End` token.
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).run().tokens
}

fn is_delimiter(ch: char) -> bool {
    DELIMITERS.contains(&ch)
}

fn is_blank(ch: char) -> bool {
    BLANKS.contains(&ch)
}

fn classify(run: &str) -> Option<TokenKind> {
    if run.starts_with('\\') || IDENTIFIER_PATTERN.is_match(run) {
        return Some(TokenKind::Identifier);
    }
    match run.chars().next()? {
        '"' => Some(TokenKind::StringLiteral),
        '(' => Some(TokenKind::OpenParen),
        ')' => Some(TokenKind::CloseParen),
        '=' => Some(TokenKind::Assign),
        '@' => Some(TokenKind::AnnotationMarker),
        ',' => Some(TokenKind::Comma),
        '[' => Some(TokenKind::OpenBracket),
        ']' => Some(TokenKind::CloseBracket),
        _ => None,
    }
}
