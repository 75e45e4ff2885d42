//! Run report data models
//!
//! Contains structures for storing and serializing run reports and
//! per-metric statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::util::units::{format_latency, format_tps};

/// Aggregate outcome of a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp when the run was started
    pub started_at: DateTime<Utc>,
    /// Wall clock time from worker launch to the completion barrier
    #[serde(with = "duration_serde")]
    pub run_time: Duration,
    /// Sum of every individual job duration
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Jobs completed per second of wall time
    pub per_second: f64,
    /// Requested number of job invocations
    pub count: usize,
    /// Requested number of concurrent workers
    pub concurrency: usize,
    /// Statistics for built-in metrics, then caller metrics in declared order
    pub metrics: Vec<MetricStatistic>,
}

/// Statistics for one metric across every job of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricStatistic {
    pub name: String,
    /// Sum of all values
    pub total: f64,
    /// Run wall time in seconds used as the rate baseline
    pub total_seconds: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation
    pub stdev: f64,
    /// Metric units per second of wall time
    pub per_sec: f64,
    pub p90: f64,
    pub p95: f64,
}

impl Default for RunReport {
    fn default() -> Self {
        Self {
            started_at: DateTime::<Utc>::default(),
            run_time: Duration::ZERO,
            total_duration: Duration::ZERO,
            per_second: 0.0,
            count: 0,
            concurrency: 0,
            metrics: Vec::new(),
        }
    }
}

impl RunReport {
    /// Look up a metric statistic by name
    pub fn metric(&self, name: &str) -> Option<&MetricStatistic> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Latency statistic, always the first entry of a completed run
    pub fn latency(&self) -> Option<&MetricStatistic> {
        self.metrics.first()
    }

    /// Error indicator statistic, always the second entry of a completed run
    pub fn errors(&self) -> Option<&MetricStatistic> {
        self.metrics.get(1)
    }

    /// Fraction of failed jobs (0.0 to 1.0)
    pub fn error_rate(&self) -> f64 {
        self.errors().map(|m| m.avg).unwrap_or(0.0)
    }

    /// Get a human-readable one line summary of the run
    pub fn summary(&self) -> String {
        format!(
            "{} - {} jobs x {} workers - {} - {} avg latency - {:.1}% errors",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.count,
            self.concurrency,
            format_tps(self.per_second),
            format_latency(self.latency().map(|m| m.avg).unwrap_or(0.0)),
            self.error_rate() * 100.0
        )
    }
}

// Custom serde module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_nanos() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}
