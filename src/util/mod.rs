//! Utility functions module
//!
//! Contains helpers for human-readable durations and rates.

pub mod units;

// Re-export commonly used functions
pub use units::{calculate_tps, format_duration, format_latency, format_tps};
