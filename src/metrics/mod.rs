//! Basic metrics instrumentation for index maintenance.
//!
//! Provides counters and duration tracking for store batches and indexed items.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for index operations.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of batches flushed to the store
    batches_total: Arc<AtomicU64>,

    /// Total number of write operations across all batches
    write_ops_total: Arc<AtomicU64>,

    /// Total duration of all batch flushes in milliseconds
    batch_duration_total_ms: Arc<AtomicU64>,

    /// Total number of failed store calls
    store_errors_total: Arc<AtomicU64>,

    /// Number of items added
    items_added_total: Arc<AtomicU64>,

    /// Number of items removed
    items_removed_total: Arc<AtomicU64>,

    /// Number of postings written
    postings_written_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            batches_total: Arc::new(AtomicU64::new(0)),
            write_ops_total: Arc::new(AtomicU64::new(0)),
            batch_duration_total_ms: Arc::new(AtomicU64::new(0)),
            store_errors_total: Arc::new(AtomicU64::new(0)),
            items_added_total: Arc::new(AtomicU64::new(0)),
            items_removed_total: Arc::new(AtomicU64::new(0)),
            postings_written_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a flushed batch with its size and duration.
    pub fn record_batch(&self, ops: usize, duration: Duration) {
        self.batches_total.fetch_add(1, Ordering::Relaxed);
        self.write_ops_total.fetch_add(ops as u64, Ordering::Relaxed);
        self.batch_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed store call.
    pub fn record_store_error(&self) {
        self.store_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an added item and the number of postings written for it.
    pub fn record_item_added(&self, postings: usize) {
        self.items_added_total.fetch_add(1, Ordering::Relaxed);
        self.postings_written_total
            .fetch_add(postings as u64, Ordering::Relaxed);
    }

    /// Record a removed item.
    pub fn record_item_removed(&self) {
        self.items_removed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn batches_total(&self) -> u64 {
        self.batches_total.load(Ordering::Relaxed)
    }

    pub fn write_ops_total(&self) -> u64 {
        self.write_ops_total.load(Ordering::Relaxed)
    }

    pub fn batch_duration_total_ms(&self) -> u64 {
        self.batch_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average batch flush duration in milliseconds.
    pub fn batch_duration_avg_ms(&self) -> f64 {
        let total = self.batch_duration_total_ms.load(Ordering::Relaxed);
        let count = self.batches_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn store_errors_total(&self) -> u64 {
        self.store_errors_total.load(Ordering::Relaxed)
    }

    pub fn items_added_total(&self) -> u64 {
        self.items_added_total.load(Ordering::Relaxed)
    }

    pub fn items_removed_total(&self) -> u64 {
        self.items_removed_total.load(Ordering::Relaxed)
    }

    pub fn postings_written_total(&self) -> u64 {
        self.postings_written_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            batches_total: self.batches_total(),
            write_ops_total: self.write_ops_total(),
            batch_duration_total_ms: self.batch_duration_total_ms(),
            batch_duration_avg_ms: self.batch_duration_avg_ms(),
            store_errors_total: self.store_errors_total(),
            items_added_total: self.items_added_total(),
            items_removed_total: self.items_removed_total(),
            postings_written_total: self.postings_written_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub batches_total: u64,
    pub write_ops_total: u64,
    pub batch_duration_total_ms: u64,
    pub batch_duration_avg_ms: f64,
    pub store_errors_total: u64,
    pub items_added_total: u64,
    pub items_removed_total: u64,
    pub postings_written_total: u64,
}

/// Helper for timing batch flushes.
pub struct BatchTimer {
    start: Instant,
    ops: usize,
    metrics: Metrics,
}

impl BatchTimer {
    /// Start timing a batch of `ops` writes.
    pub fn new(metrics: Metrics, ops: usize) -> Self {
        Self {
            start: Instant::now(),
            ops,
            metrics,
        }
    }

    /// Complete the timing and record the batch.
    pub fn complete(self) {
        self.metrics.record_batch(self.ops, self.start.elapsed());
    }

    /// Complete the timing and record the batch as failed.
    pub fn complete_with_error(self) {
        self.metrics.record_batch(self.ops, self.start.elapsed());
        self.metrics.record_store_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.batches_total(), 0);
        assert_eq!(metrics.store_errors_total(), 0);
        assert_eq!(metrics.batch_duration_total_ms(), 0);
    }

    #[test]
    fn test_record_batch() {
        let metrics = Metrics::new();
        metrics.record_batch(4, Duration::from_millis(100));
        assert_eq!(metrics.batches_total(), 1);
        assert_eq!(metrics.write_ops_total(), 4);
        assert_eq!(metrics.batch_duration_avg_ms(), 100.0);
    }

    #[test]
    fn test_average_duration() {
        let metrics = Metrics::new();
        metrics.record_batch(1, Duration::from_millis(100));
        metrics.record_batch(1, Duration::from_millis(200));
        assert_eq!(metrics.batches_total(), 2);
        assert_eq!(metrics.batch_duration_total_ms(), 300);
        assert_eq!(metrics.batch_duration_avg_ms(), 150.0);
    }

    #[test]
    fn test_items() {
        let metrics = Metrics::new();
        metrics.record_item_added(3);
        metrics.record_item_added(2);
        metrics.record_item_removed();
        assert_eq!(metrics.items_added_total(), 2);
        assert_eq!(metrics.postings_written_total(), 5);
        assert_eq!(metrics.items_removed_total(), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let handle = metrics.clone();
        let worker = thread::spawn(move || {
            for _ in 0..10 {
                handle.record_item_removed();
            }
        });
        worker.join().unwrap();
        assert_eq!(metrics.items_removed_total(), 10);
    }

    #[test]
    fn test_batch_timer() {
        let metrics = Metrics::new();
        BatchTimer::new(metrics.clone(), 3).complete();
        BatchTimer::new(metrics.clone(), 1).complete_with_error();

        assert_eq!(metrics.batches_total(), 2);
        assert_eq!(metrics.write_ops_total(), 4);
        assert_eq!(metrics.store_errors_total(), 1);
    }
}
