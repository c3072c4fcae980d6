//! Run counters and tracing setup

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins over `default_level` when set. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Counters for a single downloader run
#[derive(Debug, Default)]
pub struct RunStats {
    total: AtomicUsize,
    completed: AtomicUsize,
    succeeded: AtomicUsize,
    http_errors: AtomicUsize,
    not_found: AtomicUsize,
    failed: AtomicUsize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    /// Record one finished request, returning the new completed count
    pub(crate) fn request_completed(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn request_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn http_error(&self, not_found: bool) {
        self.http_errors.fetch_add(1, Ordering::Relaxed);
        if not_found {
            self.not_found.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn request_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total: self.total(),
            completed: self.completed(),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            http_errors: self.http_errors.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total: usize,
    pub completed: usize,
    pub succeeded: usize,
    /// Non-200 responses, 404s included
    pub http_errors: usize,
    pub not_found: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_snapshot_counts() {
        let stats = RunStats::new();
        stats.set_total(4);
        stats.request_succeeded();
        stats.http_error(true);
        stats.http_error(false);
        stats.request_failed();
        for _ in 0..4 {
            stats.request_completed();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.completed, 4);
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.http_errors, 2);
        assert_eq!(snapshot.not_found, 1);
        assert_eq!(snapshot.failed, 1);
    }

    #[test]
    fn test_completed_values_are_distinct() {
        let stats = Arc::new(RunStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    (0..100).map(|_| stats.request_completed()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "value {} observed twice", value);
            }
        }
        assert_eq!(seen.len(), 800);
        assert_eq!(stats.completed(), 800);
    }
}
