//! Configuration
//!
//! Reader configuration loading and defaults. Every field is optional in the
//! JSON file; a missing file means the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AnrdError;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".anrd.config.json";

/// Main reader configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// What to do with malformed annotations
    #[serde(default)]
    pub strictness: Strictness,

    /// Which value survives when a key repeats inside one annotation
    #[serde(default)]
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl Config {
    /// Load config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AnrdError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save config to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
            ..Self::default()
        }
    }
}

/// Malformed input handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Truncate at the first malformed head and report a diagnostic
    #[default]
    Permissive,
    /// Fail on any error-severity diagnostic
    Strict,
}

/// Resolution of `@A(x="1", x="2")`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// Later value replaces the earlier one; the key keeps its first position
    #[default]
    LastWins,
    /// Earlier value is kept; later ones are ignored
    FirstWins,
}
