//! Configuration management for CourseGraph
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with COURSEGRAPH__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values
//!
//! Scoring weights are fixed constants and deliberately absent here.

use crate::errors::{GraphError, Result};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Recommendation configuration
    #[serde(default)]
    pub recommendation: RecommendationConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationConfig {
    /// Number of courses recommended per input course
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name attached to log output
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_limit() -> usize { crate::DEFAULT_RECOMMENDATION_LIMIT }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "coursegraph".to_string() }

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            service_name: default_service_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("recommendation.default_limit", default_limit() as i64)?
            .set_default("observability.log_level", default_log_level())?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with COURSEGRAPH__ prefix
            // e.g., COURSEGRAPH__RECOMMENDATION__DEFAULT_LIMIT=5
            .add_source(
                Environment::with_prefix("COURSEGRAPH")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("COURSEGRAPH")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the ranker cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.recommendation.default_limit == 0 {
            return Err(GraphError::Configuration(ConfigError::Message(
                "recommendation.default_limit must be at least 1".to_string(),
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recommendation: RecommendationConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}
