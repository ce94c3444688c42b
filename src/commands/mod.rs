//! CLI command implementations
//!
//! Each command lives in its own submodule. All of them read one raw
//! comment block from a file or stdin.

pub mod normalize;
pub mod parse;
pub mod tokens;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

pub use normalize::{execute_normalize, NormalizeOptions};
pub use parse::{execute_parse, ParseOptions};
pub use tokens::{execute_tokens, TokensOptions};

/// Read the comment block from `path`, or stdin when no path is given
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
