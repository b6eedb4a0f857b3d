#![allow(clippy::result_large_err)]

use super::EsteiraConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve and load the effective configuration.
    /// Precedence: explicit path > ESTEIRA_CONFIG > ./esteira.toml.
    /// Environment variables override config file values.
    pub fn load(explicit_path: Option<&Path>) -> Result<EsteiraConfig, AppError> {
        let path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => env::var("ESTEIRA_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("esteira.toml")),
        };

        let mut config = Self::load_from_file(&path)?.unwrap_or_default();
        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load config from a specific file path.
    /// Returns Ok(None) if the file doesn't exist (defaults + env vars apply).
    pub fn load_from_file(path: &Path) -> Result<Option<EsteiraConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: EsteiraConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })?;

        Ok(Some(config))
    }

    /// Apply environment variable overrides to the configuration.
    /// Environment variables take precedence over config file values.
    fn apply_env_overrides(config: &mut EsteiraConfig) {
        if let Ok(base_url) = env::var("ESTEIRA_API_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(token) = env::var("ESTEIRA_API_TOKEN") {
            config.api.token = Some(token);
        }

        if let Ok(timeout) = env::var("ESTEIRA_API_TIMEOUT") {
            config.api.request_timeout = timeout;
        }

        if let Ok(poll_interval) = env::var("ESTEIRA_POLL_INTERVAL") {
            config.pipeline.poll_interval = poll_interval;
        }

        if let Ok(priority_refresh) = env::var("ESTEIRA_PRIORITY_REFRESH") {
            config.pipeline.priority_refresh = priority_refresh;
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "ESTEIRA_CONFIG - Path to the config file (default: ./esteira.toml)",
            "ESTEIRA_API_URL - Override pipeline API base URL",
            "ESTEIRA_API_TOKEN - Bearer token for API requests",
            "ESTEIRA_API_TIMEOUT - Per-request timeout (e.g. 30s)",
            "ESTEIRA_POLL_INTERVAL - Pipeline poll interval in watch mode (e.g. 20s)",
            "ESTEIRA_PRIORITY_REFRESH - Priority tone refresh interval (e.g. 60s)",
        ]
    }
}
