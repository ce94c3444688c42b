//! Parse command: print the annotations of one comment block
//!
//! Runs the full pipeline under the loaded configuration. Diagnostics go to
//! stderr; `--json` prints the whole outcome instead.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::annotation::Annotation;
use crate::config::Config;
use crate::parse::{Diagnostic, ParseOutcome, Parser, Severity};

/// Options for the parse command
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Comment file (reads from stdin if None)
    pub file: Option<PathBuf>,
    /// Output as JSON
    pub json: bool,
    /// Only show annotations with this name
    pub name: Option<String>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    annotations: Vec<&'a Annotation>,
    diagnostics: &'a [Diagnostic],
}

/// Execute the parse command
pub fn execute_parse(options: ParseOptions, config: Config) -> Result<()> {
    let input = super::read_input(options.file.as_deref())?;
    let parser = Parser::new(config);
    let outcome = parser.parse(&input)?;
    let selected = select(&outcome, options.name.as_deref());

    if options.json {
        let report = JsonReport {
            annotations: selected,
            diagnostics: outcome.diagnostics(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for diag in outcome.diagnostics() {
        match diag.severity() {
            Severity::Warning => eprintln!("{} {}", style("!").yellow(), diag),
            Severity::Error => eprintln!("{} {}", style("✗").red(), diag),
        }
    }

    print!("{}", render_annotations(&selected));
    println!(
        "{} {} annotation(s)",
        style("✓").green(),
        selected.len()
    );

    Ok(())
}

fn select<'a>(outcome: &'a ParseOutcome, name: Option<&str>) -> Vec<&'a Annotation> {
    match name {
        Some(n) => outcome.by_name(n),
        None => outcome.annotations().iter().collect(),
    }
}

/// One line per annotation, one indented line per parameter
pub fn render_annotations(annotations: &[&Annotation]) -> String {
    let mut out = String::new();
    for ann in annotations {
        let _ = writeln!(out, "@{}", style(ann.name()).cyan().bold());
        for (key, value) in ann.parameters().iter() {
            let _ = writeln!(out, "    {} = {}", key, value);
        }
    }
    out
}
