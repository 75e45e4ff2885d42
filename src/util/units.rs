//! Units formatting and conversion utilities
//!
//! Provides functions for human-readable formatting of durations, latencies
//! and job throughput.

use std::time::Duration;

/// Format duration into a human-readable string, truncated to microseconds
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use stressmeter::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1s 500ms");
/// assert_eq!(format_duration(Duration::from_nanos(2_345_678)), "2ms 345us");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let truncated = Duration::from_micros(duration.as_micros() as u64);
    if truncated.is_zero() {
        return format!("{}ns", duration.as_nanos());
    }
    humantime::format_duration(truncated).to_string()
}

/// Calculate jobs per second from a job count and wall time
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use stressmeter::util::units::calculate_tps;
///
/// let tps = calculate_tps(500, Duration::from_millis(250));
/// assert!((tps - 2000.0).abs() < 0.01);
/// ```
pub fn calculate_tps(count: usize, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }

    count as f64 / duration.as_secs_f64()
}

/// Format a jobs-per-second value with appropriate units
///
/// # Examples
/// ```
/// use stressmeter::util::units::format_tps;
///
/// assert_eq!(format_tps(1500.0), "1.5K/s");
/// assert_eq!(format_tps(42.0), "42.0/s");
/// ```
pub fn format_tps(tps: f64) -> String {
    if tps >= 1_000_000.0 {
        format!("{:.1}M/s", tps / 1_000_000.0)
    } else if tps >= 1_000.0 {
        format!("{:.1}K/s", tps / 1_000.0)
    } else {
        format!("{:.1}/s", tps)
    }
}

/// Format a latency given in seconds with appropriate precision
///
/// # Examples
/// ```
/// use stressmeter::util::units::format_latency;
///
/// assert_eq!(format_latency(0.005), "5.00ms");
/// assert_eq!(format_latency(0.0005), "500μs");
/// ```
pub fn format_latency(seconds: f64) -> String {
    let micros = (seconds * 1_000_000.0).round();

    if seconds >= 1.0 {
        format!("{:.3}s", seconds)
    } else if micros >= 1000.0 {
        format!("{:.2}ms", micros / 1000.0)
    } else {
        format!("{}μs", micros as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1us");
        assert_eq!(format_duration(Duration::from_nanos(999)), "999ns");
        assert_eq!(format_duration(Duration::ZERO), "0ns");
    }

    #[test]
    fn test_calculate_tps() {
        assert!((calculate_tps(1000, Duration::from_secs(2)) - 500.0).abs() < 0.01);
        assert_eq!(calculate_tps(1000, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_format_tps() {
        assert_eq!(format_tps(0.5), "0.5/s");
        assert_eq!(format_tps(2500.0), "2.5K/s");
        assert_eq!(format_tps(3_200_000.0), "3.2M/s");
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(0.0015), "1.50ms");
        assert_eq!(format_latency(0.00005), "50μs");
        assert_eq!(format_latency(2.5), "2.500s");
    }
}
