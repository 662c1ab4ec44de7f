//! Configuration for the json2sql CLI and service.
//!
//! Loaded from TOML:
//!
//! ```toml
//! database_url = "sqlite::memory:"
//!
//! [compiler]
//! quote_numeric_filters = true
//!
//! [output]
//! format = "table"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Json2SqlResult, QueryError};
use crate::parser::BuildOptions;

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = "json2sql.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database to run compiled statements against. Without one the CLI
    /// only prints SQL.
    pub database_url: Option<String>,
    pub compiler: CompilerConfig,
    pub output: OutputConfig,
}

/// Options forwarded to the query builder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub quote_numeric_filters: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            quote_numeric_filters: BuildOptions::default().quote_numeric_filters,
        }
    }
}

impl From<&CompilerConfig> for BuildOptions {
    fn from(config: &CompilerConfig) -> Self {
        BuildOptions {
            quote_numeric_filters: config.quote_numeric_filters,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// How the CLI prints results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored SQL plus a result table
    #[default]
    Table,
    /// The full result envelope as JSON
    Json,
    /// Bare SQL text
    Sql,
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Json2SqlResult<Self> {
        toml::from_str(content).map_err(|e| QueryError::Config(e.to_string()))
    }

    /// Read configuration from a file.
    pub fn from_file(path: &Path) -> Json2SqlResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| QueryError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration, trying in order: `explicit`, `./json2sql.toml`,
    /// then the user config directory. Falls back to defaults.
    ///
    /// An explicit path that does not exist is an error; the implicit
    /// locations are simply skipped.
    pub fn load(explicit: Option<&Path>) -> Json2SqlResult<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }

        for path in Self::search_paths() {
            if path.is_file() {
                debug!(path = %path.display(), "loading config");
                return Self::from_file(&path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Implicit config locations, highest priority first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("json2sql").join("config.toml"));
        }
        paths
    }

    /// Builder options derived from the `[compiler]` table.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::from(&self.compiler)
    }
}
