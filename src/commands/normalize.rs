//! Normalize command: print a comment block with its decoration stripped
//!
//! Shows exactly the text the tokenizer sees, which is what diagnostic
//! offsets refer to.

use std::path::PathBuf;

use anyhow::Result;

use crate::parse::normalize;

/// Options for the normalize command
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Comment file (reads from stdin if None)
    pub file: Option<PathBuf>,
}

/// Execute the normalize command
pub fn execute_normalize(options: NormalizeOptions) -> Result<()> {
    let input = super::read_input(options.file.as_deref())?;
    println!("{}", normalize(&input));
    Ok(())
}
