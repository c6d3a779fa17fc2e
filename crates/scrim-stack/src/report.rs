//! Cross-thread stack usage reporting.
//!
//! Each thread's bundle publishes its stack statistics at construction
//! and teardown — cold paths only, so the shared table never sits on
//! the allocation hot path. [`usage_report`] snapshots the table for
//! diagnostics (e.g. deciding whether `SCRIM_STACK_SIZE` is sized so
//! the grow path never runs).

use std::sync::{Mutex, OnceLock, PoisonError};

use indexmap::IndexMap;

/// A snapshot of one thread's stack statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackUsage {
    /// Thread name, or `<unnamed>`.
    pub thread: String,
    /// Current arena capacity in bytes (0 before first use).
    pub capacity: usize,
    /// High-water mark of the bump offset.
    pub peak: usize,
    /// Number of times the arena grew.
    pub grow_count: u32,
}

/// Usage entries keyed by bundle ID, in creation order.
fn table() -> &'static Mutex<IndexMap<u64, StackUsage>> {
    static TABLE: OnceLock<Mutex<IndexMap<u64, StackUsage>>> = OnceLock::new();
    TABLE.get_or_init(Default::default)
}

/// Insert or update a bundle's usage entry.
pub(crate) fn record(id: u64, usage: StackUsage) {
    let mut entries = table().lock().unwrap_or_else(PoisonError::into_inner);
    entries.insert(id, usage);
}

/// Snapshot all recorded per-thread usage, in bundle creation order.
///
/// Covers live threads (statistics as of their bundle's construction)
/// and terminated ones (final statistics from teardown).
pub fn usage_report() -> Vec<StackUsage> {
    let entries = table().lock().unwrap_or_else(PoisonError::into_inner);
    entries.values().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_then_report_roundtrip() {
        let usage = StackUsage {
            thread: "report-test".into(),
            capacity: 1024,
            peak: 400,
            grow_count: 1,
        };
        record(u64::MAX, usage.clone());
        let report = usage_report();
        assert!(report.contains(&usage));
    }

    #[test]
    fn record_updates_in_place() {
        let before = StackUsage {
            thread: "report-update".into(),
            capacity: 64,
            peak: 0,
            grow_count: 0,
        };
        let after = StackUsage {
            peak: 64,
            ..before.clone()
        };
        record(u64::MAX - 1, before.clone());
        record(u64::MAX - 1, after.clone());
        let report = usage_report();
        assert!(report.contains(&after));
        assert!(!report.contains(&before));
    }
}
