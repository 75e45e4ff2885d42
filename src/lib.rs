//! stressmeter - concurrent load generation and measurement
//!
//! Runs a caller supplied job a fixed number of times across a fixed pool
//! of concurrent workers, records latency, failures and caller defined
//! metrics per invocation, and reduces them into per-metric statistics.

use std::fmt;

// Public re-exports
pub mod bench;
pub mod config;
pub mod http;
pub mod models;
pub mod report;
pub mod util;

pub use bench::{job_fn, FnJob, Job, JobError, JobResult, Runner};
pub use models::{MetricSlot, MetricStatistic, RunReport};

// Common error types
#[derive(Debug)]
pub enum StressError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Run requested with unusable arguments
    InvalidArgument(String),
    /// A job supplied the wrong number of metric values
    MetricMismatch { expected: usize, actual: usize },
    /// Worker task failed to complete
    WorkerError(String),
    /// Report history persistence error
    PersistenceError(String),
    /// HTTP job failure (connection, protocol)
    HttpError(String),
}

impl fmt::Display for StressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StressError::IoError(err) => write!(f, "I/O error: {}", err),
            StressError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            StressError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            StressError::MetricMismatch { expected, actual } => write!(
                f,
                "Metric count mismatch: expected {} values, got {}",
                expected, actual
            ),
            StressError::WorkerError(msg) => write!(f, "Worker error: {}", msg),
            StressError::PersistenceError(msg) => write!(f, "Report persistence error: {}", msg),
            StressError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for StressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StressError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StressError {
    fn from(err: std::io::Error) -> Self {
        StressError::IoError(err)
    }
}

impl From<serde_json::Error> for StressError {
    fn from(err: serde_json::Error) -> Self {
        StressError::PersistenceError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for StressError {
    fn from(err: toml::de::Error) -> Self {
        StressError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for StressError {
    fn from(err: toml::ser::Error) -> Self {
        StressError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

impl From<reqwest::Error> for StressError {
    fn from(err: reqwest::Error) -> Self {
        StressError::HttpError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StressError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            StressError::WorkerError(format!("Worker panicked: {}", err))
        } else {
            StressError::WorkerError(format!("Worker join failed: {}", err))
        }
    }
}

/// Result type alias for stressmeter operations
pub type Result<T> = std::result::Result<T, StressError>;

/// Error handling utilities
pub mod error {
    use super::StressError;

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &StressError) -> String {
        match error {
            StressError::InvalidArgument(msg) => {
                format!("Nothing to run: {}. Use a positive count and concurrency.", msg)
            }
            StressError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            StressError::PersistenceError(_) => {
                "Failed to save report. Check disk space and permissions.".to_string()
            }
            StressError::HttpError(msg) => {
                format!("Target unreachable or misbehaving: {}", msg)
            }
            _ => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "stressmeter";
pub const CONFIG_FILE: &str = "stressmeter.toml";
pub const REPORTS_FILE: &str = "reports.json";
pub const MAX_REPORT_HISTORY: usize = 100;
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
