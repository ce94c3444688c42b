//! Tokens command: dump the token stream of one comment block
//!
//! Only normalizes and lexes; the compiler never runs, so reader
//! configuration has no effect on the output.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::parse::{normalize, Lexed, Lexer, TokenKind};

/// Options for the tokens command
#[derive(Debug, Clone)]
pub struct TokensOptions {
    /// Comment file (reads from stdin if None)
    pub file: Option<PathBuf>,
    /// Output as JSON
    pub json: bool,
}

/// Execute the tokens command
pub fn execute_tokens(options: TokensOptions) -> Result<()> {
    let input = super::read_input(options.file.as_deref())?;
    let lexed = lex_input(&input);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&lexed.tokens)?);
        return Ok(());
    }

    print!("{}", render_tokens(&lexed));
    for diag in &lexed.diagnostics {
        eprintln!("{} {}", style("!").yellow(), diag);
    }

    Ok(())
}

fn lex_input(input: &str) -> Lexed {
    Lexer::new(&normalize(input)).run()
}

/// One line per token: offset, kind, text
fn render_tokens(lexed: &Lexed) -> String {
    let mut out = String::new();
    for token in &lexed.tokens {
        let kind = format!("{:?}", token.kind());
        let _ = match token.kind() {
            TokenKind::End => writeln!(out, "{:>5}  {}", token.offset(), style(kind).dim()),
            _ => writeln!(
                out,
                "{:>5}  {:<16} {}",
                token.offset(),
                style(kind).cyan(),
                token.text()
            ),
        };
    }
    out
}
