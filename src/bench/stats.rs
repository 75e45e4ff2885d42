//! Statistics aggregation
//!
//! Reduces the values of one metric across every job record into a
//! [`MetricStatistic`]. Aggregation is a pure function of the records, so
//! replaying it over the same data gives identical results.

use crate::models::{JobRecord, MetricDescriptor, MetricStatistic};

pub const P90: f64 = 0.90;
pub const P95: f64 = 0.95;

/// Nearest-rank percentile of ascending `sorted` values: `sorted[floor(N * p)]`
pub fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (sorted.len() as f64 * percentile).floor() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

impl MetricStatistic {
    /// Compute statistics for `values`, with `total_seconds` as the rate baseline.
    ///
    /// An empty value set yields a zero-filled statistic.
    pub fn compute(name: &str, values: &[f64], total_seconds: f64) -> Self {
        let mut stat = MetricStatistic {
            name: name.to_string(),
            total_seconds,
            ..Default::default()
        };
        let Some((&first, rest)) = values.split_first() else {
            return stat;
        };

        stat.min = first;
        stat.max = first;
        stat.total = first;
        for &value in rest {
            stat.min = stat.min.min(value);
            stat.max = stat.max.max(value);
            stat.total += value;
        }

        let n = values.len() as f64;
        stat.avg = stat.total / n;
        // Rounding can push the mean a hair outside the observed range
        if stat.avg < stat.min {
            stat.avg = stat.min;
        } else if stat.avg > stat.max {
            stat.avg = stat.max;
        }

        let variance = values
            .iter()
            .map(|&value| (value - stat.avg) * (value - stat.avg))
            .sum::<f64>()
            / n;
        stat.stdev = variance.sqrt();

        if total_seconds > 0.0 {
            stat.per_sec = stat.total / total_seconds;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        stat.p90 = nearest_rank(&sorted, P90);
        stat.p95 = nearest_rank(&sorted, P95);

        stat
    }
}

/// Compute one statistic per catalog entry, in catalog order
pub fn aggregate(
    catalog: &[MetricDescriptor],
    records: &[JobRecord],
    total_seconds: f64,
) -> Vec<MetricStatistic> {
    catalog
        .iter()
        .map(|descriptor| {
            MetricStatistic::compute(&descriptor.name, &descriptor.column(records), total_seconds)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog;
    use std::time::Duration;

    #[test]
    fn test_nearest_rank_convention() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(nearest_rank(&values, P90), 10.0);
        assert_eq!(nearest_rank(&values, P95), 10.0);
        assert_eq!(nearest_rank(&values, 0.5), 6.0);
        assert_eq!(nearest_rank(&[], P90), 0.0);
    }

    #[test]
    fn test_nearest_rank_larger_sample() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(nearest_rank(&values, P90), 91.0);
        assert_eq!(nearest_rank(&values, P95), 96.0);
    }

    #[test]
    fn test_compute_basic() {
        let values = [4.0, 2.0, 8.0, 6.0];
        let stat = MetricStatistic::compute("bytes", &values, 2.0);

        assert_eq!(stat.name, "bytes");
        assert_eq!(stat.total, 20.0);
        assert_eq!(stat.min, 2.0);
        assert_eq!(stat.max, 8.0);
        assert_eq!(stat.avg, 5.0);
        assert!((stat.stdev - 5.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(stat.per_sec, 10.0);
        assert_eq!(stat.p90, 8.0);
        assert_eq!(stat.p95, 8.0);
    }

    #[test]
    fn test_percentiles_on_unsorted_input() {
        let values = [10.0, 3.0, 7.0, 1.0, 9.0, 2.0, 8.0, 4.0, 6.0, 5.0];
        let stat = MetricStatistic::compute("x", &values, 1.0);
        assert_eq!(stat.p90, 10.0);
        assert_eq!(stat.p95, 10.0);
    }

    #[test]
    fn test_single_value() {
        let stat = MetricStatistic::compute("x", &[-3.5], 1.0);
        assert_eq!(stat.min, -3.5);
        assert_eq!(stat.max, -3.5);
        assert_eq!(stat.avg, -3.5);
        assert_eq!(stat.stdev, 0.0);
        assert_eq!(stat.p90, -3.5);
    }

    #[test]
    fn test_identical_values_have_zero_stdev() {
        let values = [0.1; 7];
        let stat = MetricStatistic::compute("x", &values, 1.0);
        assert_eq!(stat.stdev, 0.0);
        assert!(stat.min <= stat.avg && stat.avg <= stat.max);
    }

    #[test]
    fn test_all_zero_values_are_computed() {
        let stat = MetricStatistic::compute("error", &[0.0, 0.0, 0.0], 3.0);
        assert_eq!(stat.total, 0.0);
        assert_eq!(stat.avg, 0.0);
        assert_eq!(stat.stdev, 0.0);
        assert_eq!(stat.p95, 0.0);
        assert_eq!(stat.total_seconds, 3.0);
    }

    #[test]
    fn test_empty_values_are_zero_filled() {
        let stat = MetricStatistic::compute("x", &[], 3.0);
        assert_eq!(
            stat,
            MetricStatistic {
                name: "x".to_string(),
                total_seconds: 3.0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_zero_run_time_has_no_rate() {
        let stat = MetricStatistic::compute("x", &[1.0, 2.0], 0.0);
        assert_eq!(stat.per_sec, 0.0);
    }

    #[test]
    fn test_aggregate_uses_each_metric_own_values() {
        let mut records = JobRecord::arena(4, 1);
        for record in records.iter_mut() {
            record.record_outcome(Duration::from_secs(1), false);
            record.caller.set_values(&[record.index as f64 * 10.0]).unwrap();
        }

        let stats = aggregate(&catalog(&["size"]), &records, 4.0);
        assert_eq!(stats.len(), 3);

        // Latency is constant, so only the caller metric has spread
        assert_eq!(stats[0].stdev, 0.0);
        assert_eq!(stats[1].total, 0.0);
        let size = &stats[2];
        assert_eq!(size.name, "size");
        assert_eq!(size.total, 60.0);
        assert_eq!(size.avg, 15.0);
        assert!((size.stdev - 125.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_is_replayable() {
        let mut records = JobRecord::arena(25, 1);
        for record in records.iter_mut() {
            let i = record.index as f64;
            let elapsed = Duration::from_micros(1000 + record.index as u64 * 37);
            record.record_outcome(elapsed, record.index % 3 == 0);
            record.caller.set_values(&[(i * 1.7).sin()]).unwrap();
        }
        let catalog = catalog(&["wave"]);

        let first = aggregate(&catalog, &records, 1.25);
        let second = aggregate(&catalog, &records, 1.25);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.total.to_bits(), b.total.to_bits());
            assert_eq!(a.avg.to_bits(), b.avg.to_bits());
            assert_eq!(a.stdev.to_bits(), b.stdev.to_bits());
            assert_eq!(a.p90.to_bits(), b.p90.to_bits());
            assert_eq!(a.p95.to_bits(), b.p95.to_bits());
        }
    }
}
