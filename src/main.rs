use clap::Parser;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use stressmeter::bench::{ProgressTracker, Runner};
use stressmeter::config::persistence::ReportStorage;
use stressmeter::config::RunConfig;
use stressmeter::http::HttpGet;
use stressmeter::report::{JsonReporter, Reporter, TextReporter};
use stressmeter::{error, Result};

/// Fire HTTP GET requests at a target and report latency statistics
#[derive(Debug, Parser)]
#[command(name = "stressmeter", version)]
struct Cli {
    /// Target address, e.g. 127.0.0.1:8000 or http://host:8000
    addr: String,

    /// Request path
    #[arg(long, default_value = "/ping")]
    path: String,

    /// Total number of requests
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Number of concurrent workers
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Upper bound of the startup delay in milliseconds
    #[arg(long)]
    jitter_ms: Option<u64>,

    /// Seed for the startup delay
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Append the report to the local history
    #[arg(long)]
    save: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// CLI flags override the loaded configuration
    fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(jitter_ms) = self.jitter_ms {
            config.startup_jitter_max = Duration::from_millis(jitter_ms);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.metric_names = HttpGet::metric_names();
        config
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.apply(RunConfig::load()?);
    config.validate()?;

    let (progress_tx, mut progress_rx) = mpsc::channel(1024);
    let pb = indicatif::ProgressBar::new(config.count as u64);
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner} {pos}/{len} ({per_sec}, {eta}) {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
    );

    let total = config.count;
    let progress = tokio::spawn(async move {
        let mut tracker = ProgressTracker::new(total);
        while let Some(update) = progress_rx.recv().await {
            tracker.record(&update);
            pb.set_position(tracker.completed as u64);
            pb.set_message(format!("{} failed", tracker.failed));
        }
        pb.finish_and_clear();
    });

    let job = HttpGet::new(&cli.addr, &cli.path)?;
    tracing::debug!(url = job.url(), "HTTP target");
    let report = {
        let mut runner = Runner::from_config(&config).with_progress(progress_tx);
        runner.run_config(&config, job).await?
    };
    // The runner held the last sender; the progress task ends once it drains
    progress.await.ok();

    let mut stdout = std::io::stdout();
    if cli.json {
        JsonReporter.report(&report, &mut stdout)?;
    } else {
        TextReporter.report(&report, &mut stdout)?;
    }

    if cli.save {
        let summary = report.summary();
        let storage = ReportStorage::new()?;
        storage.append_report(report)?;
        tracing::info!(path = %storage.path().display(), %summary, "Report saved");
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "stressmeter=debug"
    } else {
        "stressmeter=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{}", error::user_friendly_message(&e));
        std::process::exit(1);
    }
}
