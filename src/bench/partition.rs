//! Stride partitioning of job indices across workers
//!
//! Worker `n` owns `{n, n + c, n + 2c, ...}` below `count`. The assignment
//! is static for the whole run, so each job record has exactly one owner.

use crate::models::JobRecord;

/// Deterministic assignment of job indices to workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    count: usize,
    concurrency: usize,
}

impl Partitioner {
    /// Create a partitioner; `concurrency` must be non-zero
    pub fn new(count: usize, concurrency: usize) -> Self {
        debug_assert!(concurrency > 0, "concurrency must be non-zero");
        Self { count, concurrency }
    }

    /// Worker that owns `index`
    pub fn owner_of(&self, index: usize) -> usize {
        index % self.concurrency
    }

    /// Indices owned by `worker`, in increasing order
    pub fn indices_for(&self, worker: usize) -> impl Iterator<Item = usize> {
        let start = if worker < self.concurrency {
            worker
        } else {
            self.count
        };
        (start..self.count).step_by(self.concurrency)
    }

    /// Number of indices owned by `worker`
    pub fn share_of(&self, worker: usize) -> usize {
        if worker >= self.concurrency || worker >= self.count {
            0
        } else {
            (self.count - worker).div_ceil(self.concurrency)
        }
    }

    /// Index sets of every worker
    pub fn assignments(&self) -> Vec<Vec<usize>> {
        (0..self.concurrency)
            .map(|worker| self.indices_for(worker).collect())
            .collect()
    }

    /// Move an arena of records into per-worker batches.
    ///
    /// Records must be in index order; each batch keeps increasing order.
    pub fn split(&self, records: Vec<JobRecord>) -> Vec<Vec<JobRecord>> {
        let mut batches: Vec<Vec<JobRecord>> = (0..self.concurrency)
            .map(|worker| Vec::with_capacity(self.share_of(worker)))
            .collect();
        for record in records {
            let owner = self.owner_of(record.index);
            batches[owner].push(record);
        }
        batches
    }
}
