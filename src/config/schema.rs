//! YAML schema definitions for engine configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Accumulation mode used by every block application of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Carry the accumulated Jacobian alongside each value
    #[default]
    Forward,
    /// Record local Jacobians as graph edges for a later backward pass
    Reverse,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Forward => write!(f, "forward"),
            Mode::Reverse => write!(f, "reverse"),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Mode::Forward),
            "reverse" => Ok(Mode::Reverse),
            other => Err(Error::ConfigError(format!(
                "Unknown mode `{}` (must be one of: forward, reverse)",
                other
            ))),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Accumulation mode
    #[serde(default)]
    pub mode: Mode,

    /// Reject forward-mode inputs whose gradients refer to different leaf sets
    #[serde(default = "default_check_leaf_layout")]
    pub check_leaf_layout: bool,
}

fn default_check_leaf_layout() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            check_leaf_layout: default_check_leaf_layout(),
        }
    }
}

impl EngineConfig {
    /// Configuration for the given mode with default checks
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {}", e)))
    }

    /// Serialize the configuration to YAML text
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
