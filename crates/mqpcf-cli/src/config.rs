//! CLI configuration file

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use tracing::Level;

/// How decoded handles are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Settings read from a TOML file; command-line flags override them.
///
/// ```toml
/// log_level = "debug"
/// output = "json"
/// dump_limit = 256
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: String,
    pub output: OutputFormat,
    /// Bytes shown by `dump`
    pub dump_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            output: OutputFormat::Table,
            dump_limit: 100,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dump_limit == 0 {
            bail!("dump_limit must be greater than zero");
        }
        parse_level(&self.log_level)?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level> {
        parse_level(&self.log_level)
    }
}

pub fn parse_level(s: &str) -> Result<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => bail!("Unknown log level: {}", other),
    }
}
