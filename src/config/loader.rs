//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// └── engine.yaml   # Signup, roster, auto-open and display settings
/// ```
///
/// # Example
///
/// ```no_run
/// use work_signup_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Cutoff: {} minutes", loader.config().signup.cancellation_cutoff_minutes);
/// # Ok::<(), work_signup_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads `engine.yaml` from the specified directory.
    ///
    /// Returns `ConfigNotFound` if the file is missing and `ConfigParseError`
    /// if it is not valid YAML for [`EngineConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let engine_path = path.as_ref().join("engine.yaml");
        let path_str = engine_path.display().to_string();

        let content = fs::read_to_string(&engine_path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from an inline YAML document.
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        Self::parse(yaml, "<inline>")
    }

    fn parse(content: &str, path: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        if config.signup.cancellation_cutoff_minutes < 0 {
            return Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: "signup.cancellation_cutoff_minutes must not be negative".to_string(),
            });
        }

        tracing::debug!(path, "Loaded engine configuration");
        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_shipped_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config, crate::config::EngineConfig::default());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let loader = ConfigLoader::from_yaml_str(
            "signup:\n  cancellation_cutoff_minutes: 120\n",
        )
        .unwrap();

        let config = loader.config();
        assert_eq!(config.signup.cancellation_cutoff_minutes, 120);
        assert_eq!(config.signup.cancellation_cutoff(), chrono::Duration::hours(2));
        assert_eq!(config.roster.poll_interval_seconds, 5);
        assert_eq!(config.auto_open.sweep_interval_seconds, 60);
        assert_eq!(config.display.regular_bucket_title, "Regular");
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        match ConfigLoader::from_yaml_str("signup: [not, a, map]") {
            Err(EngineError::ConfigParseError { path, .. }) => assert_eq!(path, "<inline>"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_cutoff_is_rejected() {
        let result =
            ConfigLoader::from_yaml_str("signup:\n  cancellation_cutoff_minutes: -5\n");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
