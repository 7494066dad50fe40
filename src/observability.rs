//! Fetch counters and log setup

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Counters recorded by [`MultiFetcher`](crate::fetch::MultiFetcher)
#[derive(Debug, Default)]
pub struct FetchMetrics {
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
}

impl FetchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "fetch_attempts", "Metric incremented");
    }

    pub fn success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "fetch_successes", "Metric incremented");
    }

    pub fn failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "fetch_failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> FetchMetricsSnapshot {
        FetchMetricsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchMetricsSnapshot {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

/// Install the global fmt subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Logs go to stderr so stdout stays free for fetched content.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
