//! Job worker
//!
//! A worker owns a disjoint batch of job records and runs the job once per
//! record, in increasing index order, measuring each invocation.

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::bench::job::Job;
use crate::bench::progress::{notify, ProgressUpdate};
use crate::models::JobRecord;

/// A single worker and the records it owns for the whole run
#[derive(Debug)]
pub struct Worker {
    /// Worker ID, equal to its stride offset
    pub id: usize,
    records: Vec<JobRecord>,
    startup_delay: Duration,
    progress_tx: Option<mpsc::Sender<ProgressUpdate>>,
}

impl Worker {
    /// Create a worker over `records`, which must be in increasing index order
    pub fn new(id: usize, records: Vec<JobRecord>, startup_delay: Duration) -> Self {
        Self {
            id,
            records,
            startup_delay,
            progress_tx: None,
        }
    }

    /// Send a progress update after each invocation
    pub fn with_progress(mut self, progress_tx: Option<mpsc::Sender<ProgressUpdate>>) -> Self {
        self.progress_tx = progress_tx;
        self
    }

    /// Number of job invocations this worker will perform
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Run every owned job and hand the filled records back
    pub async fn run<J>(mut self, job: &J) -> Vec<JobRecord>
    where
        J: Job + ?Sized,
    {
        tracing::debug!(worker = self.id, jobs = self.records.len(), "worker started");
        let mut failures = 0usize;

        for record in self.records.iter_mut() {
            if !self.startup_delay.is_zero() {
                tokio::time::sleep(self.startup_delay).await;
            }

            let begin = Instant::now();
            let outcome = job.run(record.index, &mut record.caller).await;
            let elapsed = begin.elapsed();

            let failed = match outcome {
                Ok(()) => false,
                Err(err) => {
                    tracing::trace!(
                        worker = self.id,
                        index = record.index,
                        error = %err,
                        "job failed"
                    );
                    failures += 1;
                    true
                }
            };
            record.record_outcome(elapsed, failed);

            notify(
                self.progress_tx.as_ref(),
                ProgressUpdate {
                    worker_id: self.id,
                    index: record.index,
                    failed,
                    elapsed,
                },
            );
        }

        tracing::debug!(worker = self.id, failures, "worker finished");
        self.records
    }
}
