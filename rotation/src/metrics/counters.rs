use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Minimal counters for operational visibility.
#[derive(Clone, Default, Debug)]
pub struct Counters {
    pub clusters_registered: Arc<AtomicU64>,
    pub cluster_register_failures: Arc<AtomicU64>,

    pub windows_processed: Arc<AtomicU64>,
    pub reports_emitted: Arc<AtomicU64>,

    // skip reasons
    pub windows_skip_not_ready: Arc<AtomicU64>,
    pub windows_skip_duplicate: Arc<AtomicU64>,
}

impl Counters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn read(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}
