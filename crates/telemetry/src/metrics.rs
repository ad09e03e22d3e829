//! Internal metrics collection.
//!
//! Counters, gauges and latency histograms kept in-process and exposed as a
//! serializable snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the ingest pipeline.
#[derive(Debug, Default)]
pub struct Metrics {
    // Trigger metrics
    pub notifications_received: Counter,
    pub invocations: Counter,
    pub keys_rejected: Counter,

    // Load metrics
    pub objects_loaded: Counter,
    pub rows_loaded: Counter,
    pub load_errors: Counter,

    // Registry metrics
    pub new_devices: Counter,
    pub listing_errors: Counter,

    // Crawler metrics
    pub crawls_started: Counter,
    pub crawls_already_running: Counter,
    pub crawl_errors: Counter,

    // Artifact metrics
    pub artifacts_written: Counter,
    pub artifact_errors: Counter,

    // Notification metrics
    pub warnings_reported: Counter,
    pub emails_sent: Counter,
    pub email_errors: Counter,

    // Latency histograms
    pub invocation_latency_ms: Histogram,
    pub load_latency_ms: Histogram,
    pub listing_latency_ms: Histogram,

    // Gauges
    pub in_flight_invocations: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub notifications_received: u64,
    pub invocations: u64,
    pub keys_rejected: u64,
    pub objects_loaded: u64,
    pub rows_loaded: u64,
    pub load_errors: u64,
    pub new_devices: u64,
    pub listing_errors: u64,
    pub crawls_started: u64,
    pub crawls_already_running: u64,
    pub crawl_errors: u64,
    pub artifacts_written: u64,
    pub artifact_errors: u64,
    pub warnings_reported: u64,
    pub emails_sent: u64,
    pub email_errors: u64,
    pub invocation_latency_mean_ms: f64,
    pub load_latency_mean_ms: f64,
    pub listing_latency_mean_ms: f64,
    pub in_flight_invocations: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            notifications_received: self.notifications_received.get(),
            invocations: self.invocations.get(),
            keys_rejected: self.keys_rejected.get(),
            objects_loaded: self.objects_loaded.get(),
            rows_loaded: self.rows_loaded.get(),
            load_errors: self.load_errors.get(),
            new_devices: self.new_devices.get(),
            listing_errors: self.listing_errors.get(),
            crawls_started: self.crawls_started.get(),
            crawls_already_running: self.crawls_already_running.get(),
            crawl_errors: self.crawl_errors.get(),
            artifacts_written: self.artifacts_written.get(),
            artifact_errors: self.artifact_errors.get(),
            warnings_reported: self.warnings_reported.get(),
            emails_sent: self.emails_sent.get(),
            email_errors: self.email_errors.get(),
            invocation_latency_mean_ms: self.invocation_latency_ms.mean(),
            load_latency_mean_ms: self.load_latency_ms.mean(),
            listing_latency_mean_ms: self.listing_latency_ms.mean(),
            in_flight_invocations: self.in_flight_invocations.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
