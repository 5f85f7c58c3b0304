use schemars::JsonSchema;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing record store activity.
#[derive(Default)]
pub struct StoreMetrics {
    students_inserted: AtomicU64,
    students_updated: AtomicU64,
    students_deleted: AtomicU64,
    lookups_missed: AtomicU64,
}

impl StoreMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful insert.
    pub fn record_insert(&self) {
        self.students_inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful update.
    pub fn record_update(&self) {
        self.students_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful delete.
    pub fn record_delete(&self) {
        self.students_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup, update, or delete that addressed an unknown key.
    pub fn record_miss(&self) {
        self.lookups_missed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            students_inserted: self.students_inserted.load(Ordering::Relaxed),
            students_updated: self.students_updated.load(Ordering::Relaxed),
            students_deleted: self.students_deleted.load(Ordering::Relaxed),
            lookups_missed: self.lookups_missed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of store counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Records inserted since startup.
    pub students_inserted: u64,
    /// Successful partial updates since startup.
    pub students_updated: u64,
    /// Records deleted since startup.
    pub students_deleted: u64,
    /// Calls that addressed a key not present in the store.
    pub lookups_missed: u64,
}
