//! Engine settings loaded from `engine.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chess_engine::{EvalTableError, PieceSquareTables, SearchLimits};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration or evaluation tables.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to read evaluation tables from {}: {source}", .path.display())]
    TablesReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse evaluation tables: {0}")]
    TablesParseError(#[from] serde_json::Error),

    #[error("Invalid evaluation tables: {0}")]
    InvalidTables(#[from] EvalTableError),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Thinking time per move in milliseconds. Defaults to 1000.
    #[serde(default = "default_time_budget_ms")]
    pub time_budget_ms: u64,
    /// Optional depth cap; searches stop at this depth even with time left.
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// JSON file holding `[phase][piece][square]` piece-square tables.
    #[serde(default)]
    pub eval_tables: Option<PathBuf>,
    /// Self-play stops after this many plies. Defaults to 300.
    #[serde(default = "default_max_plies")]
    pub max_plies: u32,
}

fn default_time_budget_ms() -> u64 {
    1000
}

fn default_max_plies() -> u32 {
    300
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            time_budget_ms: default_time_budget_ms(),
            max_depth: None,
            eval_tables: None,
            max_plies: default_max_plies(),
        }
    }
}

impl EngineConfig {
    pub const DEFAULT_PATH: &'static str = "engine.toml";

    /// Reads `path`, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            time: Duration::from_millis(self.time_budget_ms),
            max_depth: self.max_depth,
        }
    }

    /// Loads the configured evaluation tables, if any.
    pub fn load_tables(&self) -> Result<Option<PieceSquareTables>, ConfigError> {
        let Some(path) = &self.eval_tables else {
            return Ok(None);
        };
        let content = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::TablesReadError {
                path: path.clone(),
                source,
            }
        })?;
        let nested: Vec<Vec<Vec<i32>>> = serde_json::from_str(&content)?;
        Ok(Some(PieceSquareTables::from_nested(nested)?))
    }
}
