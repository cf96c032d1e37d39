//! Derived compression performance metrics
//!
//! A single `CompressionMetrics` instance lives for the whole process,
//! shared between the middleware and the observability endpoint. Counters
//! only accumulate; `reset` is an explicit administrative action.

use parking_lot::Mutex;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Default)]
struct MetricsState {
    total_requests: u64,
    compressed_requests: u64,
    total_original_bytes: u64,
    total_compressed_bytes: u64,
    processing_times: Vec<Duration>,
}

/// Process-wide compression counters and timings
#[derive(Debug, Default)]
pub struct CompressionMetrics {
    state: Mutex<MetricsState>,
}

impl CompressionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a response that passed through the middleware
    pub fn record_request(&self) {
        self.state.lock().total_requests += 1;
    }

    /// Record a completed compression
    pub fn record_compression(&self, original: usize, compressed: usize, elapsed: Duration) {
        let mut state = self.state.lock();
        state.compressed_requests += 1;
        state.total_original_bytes += original as u64;
        state.total_compressed_bytes += compressed as u64;
        state.processing_times.push(elapsed);
    }

    /// Administrative reset of all counters
    pub fn reset(&self) {
        let mut state = self.state.lock();
        *state = MetricsState::default();
    }

    /// Snapshot the current counters and derived values
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.lock();

        let bytes_saved = state
            .total_original_bytes
            .saturating_sub(state.total_compressed_bytes);

        let compression_ratio = if state.total_original_bytes > 0 {
            round2(bytes_saved as f64 / state.total_original_bytes as f64 * 100.0)
        } else {
            0.0
        };

        let avg_processing_time_ms = if state.processing_times.is_empty() {
            0.0
        } else {
            let total_ms: f64 = state
                .processing_times
                .iter()
                .map(|d| d.as_secs_f64() * 1000.0)
                .sum();
            round2(total_ms / state.processing_times.len() as f64)
        };

        MetricsSnapshot {
            total_requests: state.total_requests,
            compressed_requests: state.compressed_requests,
            compression_ratio,
            avg_processing_time_ms,
            bytes_saved,
            total_original_size: state.total_original_bytes,
            total_compressed_size: state.total_compressed_bytes,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Point-in-time view of the compression counters
///
/// This is the payload of the observability endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub compressed_requests: u64,
    /// Percentage of bytes saved across all compressed responses (0-100)
    pub compression_ratio: f64,
    pub avg_processing_time_ms: f64,
    pub bytes_saved: u64,
    pub total_original_size: u64,
    pub total_compressed_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_all_zero_initially() {
        let metrics = CompressionMetrics::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.compressed_requests, 0);
        assert_eq!(snapshot.compression_ratio, 0.0);
        assert_eq!(snapshot.avg_processing_time_ms, 0.0);
        assert_eq!(snapshot.bytes_saved, 0);
        assert_eq!(snapshot.total_original_size, 0);
        assert_eq!(snapshot.total_compressed_size, 0);
    }

    #[test]
    fn test_ratio_without_compression_stays_zero() {
        let metrics = CompressionMetrics::new();
        metrics.record_request();
        metrics.record_request();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.compression_ratio, 0.0);
    }

    #[test]
    fn test_accumulation() {
        let metrics = CompressionMetrics::new();
        metrics.record_request();
        metrics.record_compression(1000, 400, Duration::from_millis(2));
        metrics.record_compression(3000, 600, Duration::from_millis(4));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.compressed_requests, 2);
        assert_eq!(snapshot.total_original_size, 4000);
        assert_eq!(snapshot.total_compressed_size, 1000);
        assert_eq!(snapshot.bytes_saved, 3000);
        assert_eq!(snapshot.compression_ratio, 75.0);
        assert_eq!(snapshot.avg_processing_time_ms, 3.0);
    }

    #[test]
    fn test_ratio_rounds_to_two_decimals() {
        let metrics = CompressionMetrics::new();
        metrics.record_compression(3, 1, Duration::from_micros(10));

        // 2/3 saved = 66.666...%
        assert_eq!(metrics.snapshot().compression_ratio, 66.67);
    }

    #[test]
    fn test_reset_clears_everything() {
        let metrics = CompressionMetrics::new();
        metrics.record_request();
        metrics.record_compression(1000, 100, Duration::from_millis(1));

        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.compressed_requests, 0);
        assert_eq!(snapshot.total_original_size, 0);
    }

    #[test]
    fn test_snapshot_serializes_contract_fields() {
        let metrics = CompressionMetrics::new();
        metrics.record_request();
        metrics.record_compression(2000, 500, Duration::from_millis(1));

        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        for field in [
            "total_requests",
            "compressed_requests",
            "compression_ratio",
            "avg_processing_time_ms",
            "bytes_saved",
            "total_original_size",
            "total_compressed_size",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(json["compression_ratio"], 75.0);
    }
}
