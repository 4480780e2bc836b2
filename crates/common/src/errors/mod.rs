//! Error types for CourseGraph
//!
//! Provides the error taxonomy shared by the graph store and the ranker:
//! - Distinct error variants for each contract violation
//! - Machine-readable error codes
//! - Caller vs internal classification
//!
//! Scoring never produces these errors; a missing or mis-kinded candidate
//! scores zero instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Graph construction errors (1xxx)
    UnknownVertex,
    KindMismatch,
    InvalidAttribute,
    SelfLoop,

    // Request errors (2xxx)
    InvalidLimit,

    // Internal errors (9xxx)
    ConfigurationError,
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Construction (1xxx)
            ErrorCode::UnknownVertex => 1001,
            ErrorCode::KindMismatch => 1002,
            ErrorCode::InvalidAttribute => 1003,
            ErrorCode::SelfLoop => 1004,

            // Requests (2xxx)
            ErrorCode::InvalidLimit => 2001,

            // Internal (9xxx)
            ErrorCode::ConfigurationError => 9001,
            ErrorCode::InternalError => 9002,
        }
    }
}

/// Graph and recommendation error types
#[derive(Error, Debug)]
pub enum GraphError {
    // Construction errors
    #[error("Unknown vertex: {item}")]
    UnknownVertex { item: String },

    #[error("Vertex {item} is a {found}, expected a {expected}")]
    KindMismatch {
        item: String,
        expected: String,
        found: String,
    },

    #[error("Invalid attribute for {item}: {message}")]
    InvalidAttribute { item: String, message: String },

    #[error("Vertex {item} cannot be its own neighbour")]
    SelfLoop { item: String },

    // Request errors
    #[error("Recommendation limit must be at least 1, got {limit}")]
    InvalidLimit { limit: usize },

    // Internal errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl GraphError {
    /// Shorthand for an `UnknownVertex` error
    pub fn unknown_vertex(item: impl Into<String>) -> Self {
        GraphError::UnknownVertex { item: item.into() }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            GraphError::UnknownVertex { .. } => ErrorCode::UnknownVertex,
            GraphError::KindMismatch { .. } => ErrorCode::KindMismatch,
            GraphError::InvalidAttribute { .. } => ErrorCode::InvalidAttribute,
            GraphError::SelfLoop { .. } => ErrorCode::SelfLoop,
            GraphError::InvalidLimit { .. } => ErrorCode::InvalidLimit,
            GraphError::Configuration(_) => ErrorCode::ConfigurationError,
            GraphError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the caller violated a contract (malformed graph or request)
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            GraphError::UnknownVertex { .. }
                | GraphError::KindMismatch { .. }
                | GraphError::InvalidAttribute { .. }
                | GraphError::SelfLoop { .. }
                | GraphError::InvalidLimit { .. }
        )
    }

    /// Check if this error should be logged at error level
    pub fn is_internal_error(&self) -> bool {
        !self.is_caller_error()
    }
}
