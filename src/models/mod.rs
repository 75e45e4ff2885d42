//! Data models module
//!
//! Contains the per-job metric slots, the metric catalog and the
//! run report structures produced by a run.

pub mod metric;
pub mod result;
pub mod slot;

// Re-export commonly used types
pub use metric::{catalog, MetricDescriptor, MetricSource, METRIC_NAME_ERROR, METRIC_NAME_LATENCY};
pub use result::{MetricStatistic, RunReport};
pub use slot::{JobRecord, MetricSlot};
