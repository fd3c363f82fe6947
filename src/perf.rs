use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

pub const SLOW_OPERATION_THRESHOLD: Duration = Duration::from_secs(2);

/// Logs duration and memory delta of measured operations. Holds no per-operation state:
/// every `start` returns its own `Measurement`.
#[derive(Debug, Clone)]
pub struct PerformanceLogger {
    slow_threshold: Duration,
}

impl Default for PerformanceLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceLogger {
    pub fn new() -> Self {
        Self::with_slow_threshold(SLOW_OPERATION_THRESHOLD)
    }

    pub fn with_slow_threshold(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }

    pub fn start(&self, operation: &str) -> Measurement {
        Measurement {
            operation: operation.to_string(),
            started_at: Utc::now(),
            start: Instant::now(),
            start_memory: resident_memory_bytes(),
            slow_threshold: self.slow_threshold,
        }
    }

    /// Run `work` inside a measurement. The work's error is returned untouched.
    pub async fn measure<T, E, F, Fut>(&self, operation: &str, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let m = self.start(operation);
        match work().await {
            Ok(v) => {
                m.finish(true, None);
                Ok(v)
            }
            Err(e) => {
                m.finish(false, Some(e.to_string()));
                Err(e)
            }
        }
    }
}

#[derive(Debug)]
pub struct Measurement {
    operation: String,
    started_at: DateTime<Utc>,
    start: Instant,
    start_memory: Option<i64>,
    slow_threshold: Duration,
}

impl Measurement {
    pub fn finish(self, success: bool, error: Option<String>) -> MeasurementReport {
        let duration = self.start.elapsed();
        let memory_delta = match (self.start_memory, resident_memory_bytes()) {
            (Some(before), Some(after)) => after - before,
            _ => 0,
        };

        let report = MeasurementReport {
            operation: self.operation,
            started_at: self.started_at,
            duration_ms: round2(duration.as_secs_f64() * 1000.0),
            memory_mb: round2(memory_delta as f64 / 1024.0 / 1024.0),
            success,
            error,
            slow: is_slow(duration, self.slow_threshold),
        };

        match report.error.as_deref() {
            Some(error) => tracing::info!(
                operation = %report.operation,
                duration_ms = report.duration_ms,
                memory_mb = report.memory_mb,
                success = report.success,
                error,
                "performance metric"
            ),
            None => tracing::info!(
                operation = %report.operation,
                duration_ms = report.duration_ms,
                memory_mb = report.memory_mb,
                success = report.success,
                "performance metric"
            ),
        }

        if report.slow {
            tracing::warn!(
                operation = %report.operation,
                duration_ms = report.duration_ms,
                memory_mb = report.memory_mb,
                success = report.success,
                "slow operation detected"
            );
        }

        report
    }
}

#[derive(Debug, Clone)]
pub struct MeasurementReport {
    pub operation: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: f64,
    pub memory_mb: f64,
    pub success: bool,
    pub error: Option<String>,
    pub slow: bool,
}

/// Strictly greater: a duration equal to the threshold is not slow.
pub fn is_slow(duration: Duration, threshold: Duration) -> bool {
    duration > threshold
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// Resident set size; None where procfs is unavailable.
fn resident_memory_bytes() -> Option<i64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss(&status)
}

// `VmRSS:    1234 kB` is reported in kB whatever the kernel page size is.
fn parse_vm_rss(status: &str) -> Option<i64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: i64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct WorkFailed(&'static str);

    impl fmt::Display for WorkFailed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "work failed: {}", self.0)
        }
    }

    #[tokio::test]
    async fn measure_returns_work_result() {
        let perf = PerformanceLogger::new();
        let out: Result<usize, WorkFailed> = perf.measure("count", || async { Ok(7) }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn measure_returns_original_error_unchanged() {
        let perf = PerformanceLogger::new();
        let out: Result<(), WorkFailed> = perf.measure("boom", || async { Err(WorkFailed("timeout")) }).await;
        let err = out.unwrap_err();
        assert_eq!(err, WorkFailed("timeout"));
        assert_eq!(err.to_string(), "work failed: timeout");
    }

    #[test]
    fn slow_threshold_is_exclusive() {
        assert!(!is_slow(Duration::from_secs(2), SLOW_OPERATION_THRESHOLD));
        assert!(!is_slow(Duration::from_millis(1999), SLOW_OPERATION_THRESHOLD));
        assert!(is_slow(Duration::from_millis(2001), SLOW_OPERATION_THRESHOLD));
    }

    #[test]
    fn finish_reports_failure_details() {
        let perf = PerformanceLogger::new();
        let report = perf.start("fetch_marketplace_data").finish(false, Some("connection reset".into()));
        assert_eq!(report.operation, "fetch_marketplace_data");
        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("connection reset"));
        assert!(!report.slow);
        assert!(report.duration_ms >= 0.0);
    }

    #[test]
    fn successful_measurement_has_no_error() {
        let before = Utc::now();
        let report = PerformanceLogger::new().start("fetch_order_statuses").finish(true, None);
        assert!(report.success);
        assert!(report.error.is_none());
        assert!(report.started_at >= before && report.started_at <= Utc::now());
    }

    #[test]
    fn vm_rss_is_read_in_kilobytes() {
        let status = "Name:\tsync\nVmPeak:\t  900 kB\nVmRSS:\t    2048 kB\nThreads:\t4\n";
        assert_eq!(parse_vm_rss(status), Some(2048 * 1024));
        assert_eq!(parse_vm_rss("Name:\tsync\n"), None);
    }

    #[tokio::test]
    async fn overlapping_measurements_with_same_name_are_independent() {
        let perf = PerformanceLogger::with_slow_threshold(Duration::from_millis(20));
        let first = perf.start("fetch_orders");
        tokio::time::sleep(Duration::from_millis(40)).await;
        let second = perf.start("fetch_orders");

        let second = second.finish(true, None);
        let first = first.finish(true, None);

        assert!(first.slow);
        assert!(!second.slow);
        assert!(first.duration_ms > second.duration_ms);
    }
}
