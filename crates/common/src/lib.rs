//! CourseGraph Common Library
//!
//! Shared code for the CourseGraph crates including:
//! - Error types and handling
//! - Configuration management
//! - Logging initialisation
//! - Metrics

pub mod config;
pub mod errors;
pub mod metrics;
pub mod telemetry;

// Re-export commonly used types
pub use crate::config::{AppConfig, ObservabilityConfig, RecommendationConfig};
pub use crate::errors::{ErrorCode, GraphError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of recommendations per input course
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;
