#![forbid(unsafe_code)]
//! anrd command line interface
//!
//! Loads `.anrd.config.json` (or `--config`), applies `--strict`, and
//! dispatches to the command implementations in [`anrd::commands`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use anrd::commands::{
    execute_normalize, execute_parse, execute_tokens, NormalizeOptions, ParseOptions,
    TokensOptions,
};
use anrd::config::DEFAULT_CONFIG_FILE;
use anrd::{Config, Strictness};

#[derive(Parser)]
#[command(name = "anrd")]
#[command(about = "Annotation reader - extract @Name(...) metadata from doc comments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Fail on malformed annotations instead of truncating
    #[arg(long, global = true, env = "ANRD_STRICT")]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse annotations from a comment block
    Parse {
        /// File holding the comment (reads stdin if omitted)
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Only show annotations with this name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show the token stream of a comment block
    Tokens {
        /// File holding the comment (reads stdin if omitted)
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Strip comment decoration and print the remaining text
    Normalize {
        /// File holding the comment (reads stdin if omitted)
        file: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config
    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        if cli.config != PathBuf::from(DEFAULT_CONFIG_FILE) {
            eprintln!(
                "{} Config file {} not found, using defaults",
                style("!").yellow(),
                cli.config.display()
            );
        }
        Config::default()
    };
    if cli.strict {
        config.strictness = Strictness::Strict;
    }
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Parse { file, json, name } => {
            let options = ParseOptions { file, json, name };
            execute_parse(options, config)?;
        }

        Commands::Tokens { file, json } => {
            let options = TokensOptions { file, json };
            execute_tokens(options)?;
        }

        Commands::Normalize { file } => {
            let options = NormalizeOptions { file };
            execute_normalize(options)?;
        }
    }

    Ok(())
}
