//! Per-job metric storage
//!
//! Every job index owns one `JobRecord`: a built-in slot holding latency and
//! the error indicator, and a caller slot holding the values the job reports.

use crate::{Result, StressError};
use std::time::Duration;

/// Position of the latency value (seconds) in a built-in slot
pub const BUILTIN_LATENCY: usize = 0;
/// Position of the error indicator in a built-in slot
pub const BUILTIN_ERROR: usize = 1;
/// Number of values in a built-in slot
pub const BUILTIN_METRICS: usize = 2;

/// Fixed-length ordered container of metric values for one job invocation
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSlot {
    values: Vec<f64>,
}

impl MetricSlot {
    /// Create a zero-filled slot holding `len` values
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Create a built-in slot (latency, error)
    pub fn builtin() -> Self {
        Self::new(BUILTIN_METRICS)
    }

    /// Number of values this slot holds; fixed for its whole life
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set every value at once, in declared metric order.
    ///
    /// The slot is left untouched when `values` does not match its length;
    /// jobs should propagate the error so the invocation counts as failed.
    pub fn set_values(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.values.len() {
            return Err(StressError::MetricMismatch {
                expected: self.values.len(),
                actual: values.len(),
            });
        }
        self.values.copy_from_slice(values);
        Ok(())
    }

    /// Get the value at `position`, if any
    pub fn get(&self, position: usize) -> Option<f64> {
        self.values.get(position).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn set(&mut self, position: usize, value: f64) {
        self.values[position] = value;
    }
}

/// Everything recorded for a single job index
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// Job index in `[0, count)`
    pub index: usize,
    /// Built-in metrics: latency seconds and error indicator
    pub builtin: MetricSlot,
    /// Caller declared metrics
    pub caller: MetricSlot,
    /// Measured wall time of the invocation
    pub duration: Duration,
}

impl JobRecord {
    /// Create a fresh record with a caller slot of `caller_metrics` values
    pub fn new(index: usize, caller_metrics: usize) -> Self {
        Self {
            index,
            builtin: MetricSlot::builtin(),
            caller: MetricSlot::new(caller_metrics),
            duration: Duration::ZERO,
        }
    }

    /// Store the outcome of an invocation in the built-in slot
    pub fn record_outcome(&mut self, elapsed: Duration, failed: bool) {
        self.duration = elapsed;
        self.builtin.set(BUILTIN_LATENCY, elapsed.as_secs_f64());
        self.builtin
            .set(BUILTIN_ERROR, if failed { 1.0 } else { 0.0 });
    }

    /// Whether the invocation was recorded as failed
    pub fn failed(&self) -> bool {
        self.builtin.get(BUILTIN_ERROR) == Some(1.0)
    }

    /// Allocate one record per job index
    pub fn arena(count: usize, caller_metrics: usize) -> Vec<JobRecord> {
        (0..count)
            .map(|index| JobRecord::new(index, caller_metrics))
            .collect()
    }
}
