//! Report rendering
//!
//! Reporters turn a finished [`RunReport`] into output for a sink. The core
//! run never depends on how a report is rendered.

use std::io::Write;

use crate::models::{MetricStatistic, RunReport};
use crate::util::units::format_duration;
use crate::{Result, VERSION};

/// Renders a run report into a writer
pub trait Reporter {
    fn report(&self, report: &RunReport, out: &mut dyn Write) -> Result<()>;

    /// Render into a string
    fn render(&self, report: &RunReport) -> Result<String> {
        let mut buffer = Vec::new();
        self.report(report, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Plain text reporter.
///
/// Percentiles are only printed for the first metric, which is latency.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReporter;

impl TextReporter {
    fn write_metric(
        &self,
        metric: &MetricStatistic,
        with_percentiles: bool,
        out: &mut dyn Write,
    ) -> Result<()> {
        writeln!(out, "Metric: {}", metric.name)?;
        writeln!(out, "Total: {:.3}", metric.total)?;
        writeln!(out, "Avg: {:.3}", metric.avg)?;
        writeln!(out, "Min: {:.3}", metric.min)?;
        writeln!(out, "Max: {:.3}", metric.max)?;
        writeln!(out, "Stdev: {:.3}", metric.stdev)?;
        if metric.total_seconds > 0.0 {
            writeln!(out, "PerSec: {:.3}", metric.per_sec)?;
        }
        if with_percentiles {
            writeln!(out, "P90: {:.3}", metric.p90)?;
            writeln!(out, "P95: {:.3}", metric.p95)?;
        }
        Ok(())
    }
}

impl Reporter for TextReporter {
    fn report(&self, report: &RunReport, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "stressmeter version: {}", VERSION)?;
        writeln!(
            out,
            "Running in {}({:.3}s), count: {}, concurrency: {}",
            format_duration(report.run_time),
            report.run_time.as_secs_f64(),
            report.count,
            report.concurrency
        )?;
        writeln!(out, "TPS: {:.3}/s", report.per_second)?;

        for (i, metric) in report.metrics.iter().enumerate() {
            writeln!(out)?;
            self.write_metric(metric, i == 0, out)?;
        }
        Ok(())
    }
}

/// Pretty-printed JSON reporter
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, report: &RunReport, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        Ok(())
    }
}
