//! Tests for config module

use super::*;
use crate::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_reverse_config() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"mode: reverse\ncheck_leaf_layout: false\n")
        .unwrap();

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.mode, Mode::Reverse);
    assert!(!config.check_leaf_layout);
}

#[test]
fn test_defaults_apply_to_missing_fields() {
    let config = EngineConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.mode, Mode::Forward);
    assert!(config.check_leaf_layout);
}

#[test]
fn test_unknown_mode_rejected() {
    let result = EngineConfig::from_yaml_str("mode: sideways\n");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_missing_file_is_config_error() {
    let result = load_config("/nonexistent/blockgrad/engine.yaml");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_yaml_roundtrip() {
    let config = EngineConfig::with_mode(Mode::Reverse);
    let yaml = config.to_yaml_string().unwrap();
    assert!(yaml.contains("mode: reverse"));
    assert_eq!(EngineConfig::from_yaml_str(&yaml).unwrap(), config);
}

#[test]
fn test_mode_from_str() {
    assert_eq!("forward".parse::<Mode>().unwrap(), Mode::Forward);
    assert_eq!(" Reverse ".parse::<Mode>().unwrap(), Mode::Reverse);
    assert!("both".parse::<Mode>().is_err());
    assert_eq!(Mode::Reverse.to_string(), "reverse");
}
