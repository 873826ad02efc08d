//! Process-wide dispatch counters
//!
//! Provides counters for monitoring the facade: records handed to the sink,
//! sink failures, and calls rejected because their handle was closed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatch observability
///
/// # Example
///
/// ```
/// use runtime_env_log::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_sink_failure();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.sink_failures(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Records submitted to a sink
    dispatched: AtomicU64,

    /// Submissions that returned an error or panicked
    sink_failures: AtomicU64,

    /// Calls that hit the closed-handle fast path
    closed_rejections: AtomicU64,
}

static GLOBAL_METRICS: DispatchMetrics = DispatchMetrics::new();

/// Counters shared by every dispatcher in the process
pub fn dispatch_metrics() -> &'static DispatchMetrics {
    &GLOBAL_METRICS
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            closed_rejections: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn closed_rejections(&self) -> u64 {
        self.closed_rejections.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_closed_rejection(&self) -> u64 {
        self.closed_rejections.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of dispatched records the sink failed on, as a percentage
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn failure_rate(&self) -> f64 {
        let dispatched = self.dispatched();
        if dispatched == 0 {
            return 0.0;
        }
        (self.sink_failures() as f64 / dispatched as f64) * 100.0
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_rate() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..20 {
            metrics.record_dispatched();
        }
        metrics.record_sink_failure();

        let rate = metrics.failure_rate();
        assert!((4.9..=5.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.record_closed_rejection(), 0);
        assert_eq!(metrics.record_closed_rejection(), 1);
        assert_eq!(metrics.closed_rejections(), 2);
    }
}
