//! The unit of work executed by workers

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::MetricSlot;

/// Failure returned by a job; only its presence is recorded
pub type JobError = Box<dyn std::error::Error + Send + Sync>;

pub type JobResult = std::result::Result<(), JobError>;

/// A job invoked once per index of a run.
///
/// Implementations must set exactly as many values into `slot` as metric
/// names were declared for the run, in the same order, using
/// [`MetricSlot::set_values`]. Returning `Err` marks the invocation as failed.
///
/// # Example
/// ```rust
/// use async_trait::async_trait;
/// use stressmeter::{Job, JobResult, MetricSlot};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Job for Echo {
///     async fn run(&self, index: usize, slot: &mut MetricSlot) -> JobResult {
///         slot.set_values(&[index as f64])?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Job: Send + Sync {
    async fn run(&self, index: usize, slot: &mut MetricSlot) -> JobResult;
}

/// Adapter turning a synchronous closure into a [`Job`]
pub struct FnJob<F>(pub F);

/// Wrap a closure `Fn(index, &mut MetricSlot) -> JobResult` as a job
pub fn job_fn<F>(f: F) -> FnJob<F>
where
    F: Fn(usize, &mut MetricSlot) -> JobResult + Send + Sync,
{
    FnJob(f)
}

#[async_trait]
impl<F> Job for FnJob<F>
where
    F: Fn(usize, &mut MetricSlot) -> JobResult + Send + Sync,
{
    async fn run(&self, index: usize, slot: &mut MetricSlot) -> JobResult {
        (self.0)(index, slot)
    }
}

#[async_trait]
impl<J> Job for Arc<J>
where
    J: Job + ?Sized,
{
    async fn run(&self, index: usize, slot: &mut MetricSlot) -> JobResult {
        self.as_ref().run(index, slot).await
    }
}
