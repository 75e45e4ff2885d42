//! Run orchestration
//!
//! The runner allocates one record per job index, moves each worker's stride
//! of records into that worker, waits for every worker to hand its records
//! back, and aggregates the statistics.

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::bench::job::Job;
use crate::bench::partition::Partitioner;
use crate::bench::progress::ProgressUpdate;
use crate::bench::stats::aggregate;
use crate::bench::worker::Worker;
use crate::config::RunConfig;
use crate::models::{catalog, JobRecord, RunReport};
use crate::util::units::calculate_tps;
use crate::{Result, StressError};

const DEFAULT_STARTUP_JITTER: Duration = Duration::from_millis(500);

/// Orchestrates a bounded batch of job invocations over a fixed worker pool
#[derive(Debug)]
pub struct Runner {
    rng: SmallRng,
    startup_jitter_max: Duration,
    progress_tx: Option<mpsc::Sender<ProgressUpdate>>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }
}

impl Runner {
    /// Create a runner seeded from entropy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner drawing its startup delay from `rng`
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            startup_jitter_max: DEFAULT_STARTUP_JITTER,
            progress_tx: None,
        }
    }

    /// Create a runner from the jitter and seed settings of `config`
    pub fn from_config(config: &RunConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(rng).with_startup_jitter(config.startup_jitter_max)
    }

    /// Set the upper bound of the per-run startup delay; zero disables it
    pub fn with_startup_jitter(mut self, max: Duration) -> Self {
        self.startup_jitter_max = max;
        self
    }

    /// Stream best-effort progress updates to `progress_tx`
    pub fn with_progress(mut self, progress_tx: mpsc::Sender<ProgressUpdate>) -> Self {
        self.progress_tx = Some(progress_tx);
        self
    }

    /// Draw the startup delay shared by every worker of one run
    pub fn draw_startup_delay(&mut self) -> Duration {
        let max_ms = self.startup_jitter_max.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.rng.gen_range(0..max_ms))
    }

    /// Run the job `count` times across `concurrency` workers.
    ///
    /// Jobs must set one value per entry of `metric_names`, in that order.
    /// Job failures are recorded in the error metric and never abort the run;
    /// only a panicking job surfaces as an error.
    pub async fn run<J, S>(
        &mut self,
        count: usize,
        concurrency: usize,
        metric_names: &[S],
        job: J,
    ) -> Result<RunReport>
    where
        J: Job + 'static,
        S: AsRef<str>,
    {
        if count == 0 {
            return Err(StressError::InvalidArgument(
                "count must be greater than 0".to_string(),
            ));
        }
        if concurrency == 0 {
            return Err(StressError::InvalidArgument(
                "concurrency must be greater than 0".to_string(),
            ));
        }

        let catalog = catalog(metric_names);
        let partitioner = Partitioner::new(count, concurrency);
        let startup_delay = self.draw_startup_delay();
        tracing::info!(
            count,
            concurrency,
            metrics = metric_names.len(),
            startup_delay_ms = startup_delay.as_millis() as u64,
            "Starting run"
        );

        let job = Arc::new(job);
        let batches = partitioner.split(JobRecord::arena(count, metric_names.len()));

        let started_at = Utc::now();
        let start = Instant::now();
        let mut handles = Vec::with_capacity(concurrency);
        for (id, batch) in batches.into_iter().enumerate() {
            let worker =
                Worker::new(id, batch, startup_delay).with_progress(self.progress_tx.clone());
            let job = Arc::clone(&job);
            handles.push(tokio::spawn(async move { worker.run(job.as_ref()).await }));
        }

        // Barrier: every worker is awaited even if one of them panicked
        let mut records = Vec::with_capacity(count);
        let mut failure = None;
        for handle in handles {
            match handle.await {
                Ok(batch) => records.extend(batch),
                Err(err) => {
                    failure.get_or_insert(StressError::from(err));
                }
            }
        }
        let run_time = start.elapsed();
        if let Some(err) = failure {
            return Err(err);
        }
        records.sort_unstable_by_key(|record: &JobRecord| record.index);

        let total_duration = records.iter().map(|record| record.duration).sum();
        let per_second = calculate_tps(count, run_time);
        let metrics = aggregate(&catalog, &records, run_time.as_secs_f64());

        tracing::info!(
            run_time_ms = run_time.as_millis() as u64,
            tps = per_second,
            "Run complete"
        );

        Ok(RunReport {
            started_at,
            run_time,
            total_duration,
            per_second,
            count,
            concurrency,
            metrics,
        })
    }

    /// Run with count, concurrency and metric names taken from `config`
    pub async fn run_config<J>(&mut self, config: &RunConfig, job: J) -> Result<RunReport>
    where
        J: Job + 'static,
    {
        config.validate()?;
        self.run(config.count, config.concurrency, &config.metric_names, job)
            .await
    }
}
