//! Progress updates streamed by workers while a run is in flight
//!
//! Updates are best-effort: workers use `try_send` and drop the update when
//! the channel is full or closed. The run report never depends on them.

use std::time::Duration;
use tokio::sync::mpsc;

/// Progress update sent after every job invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Worker that ran the job
    pub worker_id: usize,
    /// Job index that just completed
    pub index: usize,
    /// Whether the job returned an error
    pub failed: bool,
    /// Measured duration of the invocation
    pub elapsed: Duration,
}

/// Running tally of progress updates for a run of `total` jobs
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Fold one update into the tally
    pub fn record(&mut self, update: &ProgressUpdate) {
        self.completed += 1;
        if update.failed {
            self.failed += 1;
        }
    }

    /// Calculate completion percentage (0.0 to 1.0)
    pub fn completion_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed as f64) / (self.total as f64)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// Non-blocking send; a full or closed channel loses the update
pub(crate) fn notify(tx: Option<&mpsc::Sender<ProgressUpdate>>, update: ProgressUpdate) {
    if let Some(tx) = tx {
        let _ = tx.try_send(update);
    }
}
