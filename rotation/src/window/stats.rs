use parking_lot::RwLock;
use tracing::debug;

use crate::cluster::CoreId;

/// Running averages for one core over the last window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreStats {
    /// Tasks running on a core too small for their demand.
    pub misfit_count: u32,
    /// All tasks running on the core.
    pub total_running_count: u32,
}

/// Point-in-time stats for every core, indexed by core id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot(Vec<CoreStats>);

impl StatsSnapshot {
    pub fn new(per_core: Vec<CoreStats>) -> Self {
        Self(per_core)
    }

    /// Stats for `core`; cores beyond the snapshot read as idle.
    pub fn get(&self, core: CoreId) -> CoreStats {
        match self.0.get(core) {
            Some(s) => *s,
            None => {
                debug!(core, slots = self.0.len(), "core missing from stats snapshot");
                CoreStats::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Provider of per-core stats. `snapshot` must be a fast, non-blocking
/// bulk read covering all cores at once.
pub trait StatsSource: Send + Sync {
    fn snapshot(&self) -> StatsSnapshot;
}

/// In-memory stats board written by upstream producers and read by the
/// aggregator. Last write wins.
#[derive(Debug, Default)]
pub struct SharedStatsBoard {
    inner: RwLock<Vec<CoreStats>>,
}

impl SharedStatsBoard {
    pub fn new(core_slots: usize) -> Self {
        Self {
            inner: RwLock::new(vec![CoreStats::default(); core_slots]),
        }
    }

    /// Update one core, growing the board if `core` is past the end.
    pub fn publish(&self, core: CoreId, stats: CoreStats) {
        let mut g = self.inner.write();
        if core >= g.len() {
            g.resize(core + 1, CoreStats::default());
        }
        g[core] = stats;
    }

    /// Replace every core at once.
    pub fn publish_all(&self, per_core: Vec<CoreStats>) {
        *self.inner.write() = per_core;
    }
}

impl StatsSource for SharedStatsBoard {
    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot(self.inner.read().clone())
    }
}
