//! Factory configuration
//!
//! Only presentation settings live here; nothing in the configuration
//! changes how expressions are built, compared or serialized.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {message}")]
    Io { path: String, message: String },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings of an `ExpressionFactory`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Spaces per nesting level in dumps
    pub indent_width: usize,

    /// Dump depth used when the caller does not pick one (0 = unlimited)
    pub default_dump_depth: usize,

    /// Print node types in dumps
    pub show_types: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            default_dump_depth: 0,
            show_types: true,
        }
    }
}

impl FactoryConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
