//! Envelope outcome counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::envelope::Status;

/// Counts of envelopes produced, by status
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    successes: AtomicU64,
    errors: AtomicU64,
    failures: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one envelope
    pub fn record(&self, status: Status) {
        let counter = match status {
            Status::Success => &self.successes,
            Status::Error => &self.errors,
            Status::Failure => &self.failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            successes: self.successes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub successes: u64,
    pub errors: u64,
    pub failures: u64,
}

impl MetricsSnapshot {
    pub fn total(&self) -> u64 {
        self.successes + self.errors + self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_zero() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_by_status() {
        let registry = MetricsRegistry::new();
        registry.record(Status::Success);
        registry.record(Status::Error);
        registry.record(Status::Error);
        registry.record(Status::Failure);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.successes, 1);
        assert_eq!(snapshot.errors, 2);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.total(), 4);
    }
}
