use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main Esteira configuration loaded from esteira.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EsteiraConfig {
    /// Pipeline API endpoint configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling and refresh cadence
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Pipeline API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the pipeline API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token attached to every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Per-request timeout (humantime form, e.g. "30s")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

/// Polling and refresh cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Interval between pipeline polls in watch mode
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Interval between priority tone recomputations
    #[serde(default = "default_priority_refresh")]
    pub priority_refresh: String,
}

fn default_base_url() -> String {
    "https://consignado-backend1.onrender.com/api".to_string()
}

fn default_request_timeout() -> String {
    "30s".to_string()
}

fn default_poll_interval() -> String {
    "20s".to_string()
}

fn default_priority_refresh() -> String {
    "60s".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            token: None,
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            poll_interval: default_poll_interval(),
            priority_refresh: default_priority_refresh(),
        }
    }
}

fn parse_duration_field(name: &str, value: &str) -> Result<Duration, AppError> {
    humantime::parse_duration(value.trim()).map_err(|e| {
        AppError::new(
            ErrorCategory::ConfigError,
            format!("invalid duration for {}: {} ({})", name, value, e),
        )
    })
}

impl EsteiraConfig {
    pub fn request_timeout(&self) -> Result<Duration, AppError> {
        parse_duration_field("api.request_timeout", &self.api.request_timeout)
    }

    pub fn poll_interval(&self) -> Result<Duration, AppError> {
        parse_duration_field("pipeline.poll_interval", &self.pipeline.poll_interval)
    }

    pub fn priority_refresh(&self) -> Result<Duration, AppError> {
        parse_duration_field("pipeline.priority_refresh", &self.pipeline.priority_refresh)
    }

    /// Ensure every duration field parses and the base URL is non-empty.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "api.base_url must not be empty",
            ));
        }
        self.request_timeout()?;
        self.poll_interval()?;
        self.priority_refresh()?;
        Ok(())
    }
}


pub mod loader;

pub use loader::ConfigLoader;
