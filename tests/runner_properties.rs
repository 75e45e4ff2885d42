//! End-to-end properties of a run

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stressmeter::models::{METRIC_NAME_ERROR, METRIC_NAME_LATENCY};
use stressmeter::{job_fn, Job, JobResult, MetricSlot, Runner};

fn runner() -> Runner {
    Runner::with_rng(SmallRng::seed_from_u64(7)).with_startup_jitter(Duration::ZERO)
}

const NO_METRICS: &[&str] = &[];

/// Records every index it is invoked with
#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<usize>>>,
}

#[async_trait]
impl Job for Recorder {
    async fn run(&self, index: usize, _slot: &mut MetricSlot) -> JobResult {
        tokio::task::yield_now().await;
        self.seen.lock().unwrap().push(index);
        Ok(())
    }
}

#[tokio::test]
async fn test_every_index_runs_exactly_once() {
    for (count, concurrency) in [(1, 1), (4, 2), (10, 3), (17, 1), (5, 40), (64, 64)] {
        let recorder = Recorder::default();
        let report = runner()
            .run(count, concurrency, NO_METRICS, recorder.clone())
            .await
            .unwrap();

        let mut seen = recorder.seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(
            seen,
            (0..count).collect::<Vec<_>>(),
            "count={} concurrency={}",
            count,
            concurrency
        );
        assert_eq!(report.count, count);
        assert_eq!(report.concurrency, concurrency);
    }
}

#[tokio::test]
async fn test_succeeding_job_has_no_errors() {
    let job = job_fn(|_, _slot: &mut MetricSlot| Ok(()));
    let report = runner().run(4, 2, NO_METRICS, job).await.unwrap();

    assert_eq!(report.count, 4);
    let errors = report.metric(METRIC_NAME_ERROR).unwrap();
    assert_eq!(errors.total, 0.0);
    assert_eq!(errors.avg, 0.0);
}

#[tokio::test]
async fn test_failing_job_has_full_error_rate() {
    let job = job_fn(|_, _slot: &mut MetricSlot| Err("always".into()));
    let report = runner().run(6, 4, NO_METRICS, job).await.unwrap();

    let errors = report.metric(METRIC_NAME_ERROR).unwrap();
    assert_eq!(errors.avg, 1.0);
    assert_eq!(errors.total, 6.0);
    assert_eq!(report.error_rate(), 1.0);
}

#[tokio::test]
async fn test_empty_metric_names_report_builtins() {
    let count = 5;
    let job = job_fn(|index, _slot: &mut MetricSlot| {
        if index == 1 || index == 3 {
            return Err("odd one out".into());
        }
        Ok(())
    });
    let report = runner().run(count, 2, NO_METRICS, job).await.unwrap();

    let names: Vec<&str> = report.metrics.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec![METRIC_NAME_LATENCY, METRIC_NAME_ERROR]);

    // Every job contributes one sample, so averages divide by count
    let errors = report.errors().unwrap();
    assert_eq!(errors.total, 2.0);
    assert_eq!(errors.avg, errors.total / count as f64);
    assert_eq!(errors.avg, 0.4);
    let latency = report.latency().unwrap();
    assert!((latency.avg * count as f64 - latency.total).abs() < 1e-9);
}

#[tokio::test]
async fn test_latency_total_matches_job_durations() {
    let job = job_fn(|_, _slot: &mut MetricSlot| {
        std::thread::sleep(Duration::from_millis(2));
        Ok(())
    });
    let report = runner().run(6, 3, NO_METRICS, job).await.unwrap();

    let latency = report.latency().unwrap();
    let expected = report.total_duration.as_secs_f64();
    assert!((latency.total - expected).abs() < 1e-6);
    assert!(latency.min >= 0.002);
    assert!(latency.per_sec > 0.0);
}

#[tokio::test]
async fn test_statistics_are_ordered_and_bounded() {
    let job = job_fn(|index, slot: &mut MetricSlot| {
        slot.set_values(&[(index % 7) as f64, 3.0])?;
        if index % 5 == 0 {
            return Err("every fifth".into());
        }
        Ok(())
    });
    let report = runner().run(50, 8, &["mod7", "constant"], job).await.unwrap();

    for metric in &report.metrics {
        assert!(metric.min <= metric.avg && metric.avg <= metric.max, "{:?}", metric);
        assert!(metric.stdev >= 0.0);
        assert!(metric.p90 <= metric.p95 && metric.p95 <= metric.max);
    }
    assert_eq!(report.metric("constant").unwrap().stdev, 0.0);
    assert_eq!(report.metric(METRIC_NAME_ERROR).unwrap().total, 10.0);
}

#[tokio::test]
async fn test_mismatched_values_count_as_failure() {
    let job = job_fn(|index, slot: &mut MetricSlot| {
        if index == 0 {
            slot.set_values(&[1.0, 2.0])?;
        } else {
            slot.set_values(&[1.0])?;
        }
        Ok(())
    });
    let report = runner().run(4, 2, &["only"], job).await.unwrap();

    assert_eq!(report.metric(METRIC_NAME_ERROR).unwrap().total, 1.0);
    // The rejected slot keeps its zero value
    assert_eq!(report.metric("only").unwrap().total, 3.0);
}

#[tokio::test]
async fn test_fresh_runs_do_not_share_state() {
    let job = || {
        job_fn(|_, slot: &mut MetricSlot| {
            slot.set_values(&[1.0])?;
            Ok(())
        })
    };
    let mut runner = runner();
    let first = runner.run(3, 2, &["one"], job()).await.unwrap();
    let second = runner.run(5, 2, &["one"], job()).await.unwrap();

    assert_eq!(first.metric("one").unwrap().total, 3.0);
    assert_eq!(second.metric("one").unwrap().total, 5.0);
}
