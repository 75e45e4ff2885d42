//! Load generation engine module
//!
//! Contains the job abstraction, stride partitioning of job indices,
//! the workers that execute them, the run orchestrator and the
//! statistics aggregation.

pub mod job;
pub mod partition;
pub mod progress;
pub mod runner;
pub mod stats;
pub mod worker;

// Re-export commonly used types
pub use job::{job_fn, FnJob, Job, JobError, JobResult};
pub use partition::Partitioner;
pub use progress::{ProgressTracker, ProgressUpdate};
pub use runner::Runner;
pub use stats::{aggregate, nearest_rank};
pub use worker::Worker;
