// Runtime configuration for the CLI: defaults, then environment, then flags

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "LEDGER_DB_PATH";
pub const OUTPUT_ENV: &str = "LEDGER_OUTPUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(LedgerError::Config(format!(
                "{} must be 'json' or 'text', got '{}'",
                OUTPUT_ENV, other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub db_path: PathBuf,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("ledger.db"),
            output: OutputFormat::Json,
        }
    }
}

impl Config {
    /// Defaults overridden by `LEDGER_DB_PATH` / `LEDGER_OUTPUT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(DB_PATH_ENV).filter(|p| !p.is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(output) = lookup(OUTPUT_ENV) {
            config.output = output.parse()?;
        }

        Ok(config)
    }

    /// Apply command-line flags on top (flags win).
    pub fn with_overrides(mut self, db_path: Option<PathBuf>, output: Option<OutputFormat>) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        if let Some(output) = output {
            self.output = output;
        }
        self
    }
}
