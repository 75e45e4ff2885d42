//! Metric catalog
//!
//! A run tracks one ordered list of metrics: the built-in ones first, then
//! the caller declared ones. Each entry knows how to read its value out of
//! a `JobRecord`, so names and values never drift apart.

use crate::models::slot::{JobRecord, BUILTIN_ERROR, BUILTIN_LATENCY};

pub const METRIC_NAME_LATENCY: &str = "latency(s)";
pub const METRIC_NAME_ERROR: &str = "error";

/// Where a metric's value lives inside a job record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    /// Position in the built-in slot
    Builtin(usize),
    /// Position in the caller slot
    Caller(usize),
}

/// A named metric and its accessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: String,
    pub source: MetricSource,
}

impl MetricDescriptor {
    pub fn builtin(name: &str, position: usize) -> Self {
        Self {
            name: name.to_string(),
            source: MetricSource::Builtin(position),
        }
    }

    pub fn caller(name: &str, position: usize) -> Self {
        Self {
            name: name.to_string(),
            source: MetricSource::Caller(position),
        }
    }

    /// Read this metric's value from a record
    pub fn value(&self, record: &JobRecord) -> f64 {
        let value = match self.source {
            MetricSource::Builtin(position) => record.builtin.get(position),
            MetricSource::Caller(position) => record.caller.get(position),
        };
        value.unwrap_or(0.0)
    }

    /// Collect this metric's value from every record, in record order
    pub fn column(&self, records: &[JobRecord]) -> Vec<f64> {
        records.iter().map(|record| self.value(record)).collect()
    }
}

/// Build the ordered catalog: latency, error, then caller metrics in order
pub fn catalog<S: AsRef<str>>(metric_names: &[S]) -> Vec<MetricDescriptor> {
    let mut descriptors = vec![
        MetricDescriptor::builtin(METRIC_NAME_LATENCY, BUILTIN_LATENCY),
        MetricDescriptor::builtin(METRIC_NAME_ERROR, BUILTIN_ERROR),
    ];
    descriptors.extend(
        metric_names
            .iter()
            .enumerate()
            .map(|(position, name)| MetricDescriptor::caller(name.as_ref(), position)),
    );
    descriptors
}
