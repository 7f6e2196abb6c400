//! Loading engine configuration from disk

use super::schema::EngineConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load an engine configuration from a YAML file
///
/// # Example
///
/// ```no_run
/// use blockgrad::{config::load_config, Context};
///
/// let config = load_config("engine.yaml")?;
/// let ctx = Context::from_config(&config);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<EngineConfig> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    let config = EngineConfig::from_yaml_str(&yaml_content)?;
    log::debug!(
        "Loaded engine config from {}: mode={}",
        config_path.as_ref().display(),
        config.mode
    );

    Ok(config)
}
