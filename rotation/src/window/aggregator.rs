//! Window aggregator.
//!
//! Responsibilities:
//! - Gate each boundary notification on readiness and on the last processed window.
//! - Pull one stats snapshot per window and fold it into a single big-task total.
//! - Hand the total to the rotation checkpoint exactly once per distinct window.
//!
//! Counting rule:
//! - The primary cluster (ordinal 0) contributes the misfit count of its cores.
//! - Every other cluster contributes the total running count of its cores.
//!
//! Non-responsibilities:
//! - Deciding or executing rotation (the checkpoint does this).
//! - Producing the per-core stats.

use std::sync::Arc;
use std::time::Duration;

use common::logger::{warn_if_slow, window_span};
use parking_lot::Mutex;
use tracing::debug;

use super::checkpoint::RotationCheckpoint;
use super::stats::{StatsSnapshot, StatsSource};
use super::WindowId;
use crate::cluster::{Cluster, ClusterRegistry};
use crate::context::RotationContext;
use crate::metrics::counters::Counters;

const SLOW_AGGREGATION: Duration = Duration::from_millis(1);

/// Big-task contribution of one cluster.
pub fn cluster_big_tasks(cluster: &Cluster, snapshot: &StatsSnapshot) -> u64 {
    let per_core = cluster.member_cores.iter().map(|core| snapshot.get(core));

    if cluster.id.is_primary() {
        per_core.map(|s| u64::from(s.misfit_count)).sum()
    } else {
        per_core.map(|s| u64::from(s.total_running_count)).sum()
    }
}

/// Sum of [`cluster_big_tasks`] over every active cluster, in registry order.
pub fn big_task_total(registry: &ClusterRegistry, snapshot: &StatsSnapshot) -> u64 {
    registry
        .all_clusters()
        .iter()
        .filter(|c| c.active)
        .map(|c| {
            let nr_big = cluster_big_tasks(c, snapshot);
            debug!(cluster_id = %c.id, first_core = c.representative_core, nr_big, "cluster big tasks");
            nr_big
        })
        .sum()
}

/// Turns window-boundary notifications into rotation reports.
pub struct WindowAggregator {
    ctx: Arc<RotationContext>,
    stats: Arc<dyn StatsSource>,
    checkpoint: Arc<dyn RotationCheckpoint>,

    /// Most recently processed window; `None` until the first one.
    last_window: Mutex<Option<WindowId>>,
}

impl WindowAggregator {
    pub fn new(
        ctx: Arc<RotationContext>,
        stats: Arc<dyn StatsSource>,
        checkpoint: Arc<dyn RotationCheckpoint>,
    ) -> Self {
        Self {
            ctx,
            stats,
            checkpoint,
            last_window: Mutex::new(None),
        }
    }

    /// Handles one window-boundary notification.
    ///
    /// Silently does nothing when the context is not ready yet, or when
    /// `window_id` equals the last processed window. Otherwise the window is
    /// recorded first, then aggregated and reported.
    pub fn on_window_boundary(&self, window_id: WindowId) {
        let counters = self.ctx.counters();

        let Some(registry) = self.ctx.registry() else {
            Counters::bump(&counters.windows_skip_not_ready);
            return;
        };

        {
            let mut last = self.last_window.lock();
            if *last == Some(window_id) {
                Counters::bump(&counters.windows_skip_duplicate);
                return;
            }
            *last = Some(window_id);
        }

        let _span = window_span(window_id).entered();

        let total = warn_if_slow("window_aggregation", SLOW_AGGREGATION, || {
            let snapshot = self.stats.snapshot();
            big_task_total(registry, &snapshot)
        });
        Counters::bump(&counters.windows_processed);

        debug!(big_task_total = total, "rotation checkpoint");
        self.checkpoint.report(total);
        Counters::bump(&counters.reports_emitted);
    }

    /// Last processed window, for diagnostics.
    pub fn last_window(&self) -> Option<WindowId> {
        *self.last_window.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ClusterId, CoreSet, StaticTopology};
    use crate::window::stats::{CoreStats, SharedStatsBoard};

    fn s(misfit: u32, total: u32) -> CoreStats {
        CoreStats {
            misfit_count: misfit,
            total_running_count: total,
        }
    }

    fn two_cluster_registry() -> ClusterRegistry {
        let t = StaticTopology::new(Vec::new(), (0..4).collect());
        let mut reg = ClusterRegistry::new();
        reg.register(&CoreSet::from([0, 1]), &t).unwrap();
        reg.register(&CoreSet::from([2, 3]), &t).unwrap();
        reg
    }

    fn recording() -> (Arc<parking_lot::Mutex<Vec<u64>>>, Arc<dyn RotationCheckpoint>) {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let checkpoint: Arc<dyn RotationCheckpoint> =
            Arc::new(move |total: u64| sink.lock().push(total));
        (seen, checkpoint)
    }

    #[test]
    fn primary_counts_misfits_secondary_counts_running() {
        let reg = two_cluster_registry();
        // Values in the "_" slots must not leak into the total.
        let snap = StatsSnapshot::new(vec![s(3, 100), s(4, 100), s(100, 5), s(100, 6)]);

        assert_eq!(cluster_big_tasks(&reg.all_clusters()[0], &snap), 7);
        assert_eq!(cluster_big_tasks(&reg.all_clusters()[1], &snap), 11);
        assert_eq!(big_task_total(&reg, &snap), 18);
    }

    #[test]
    fn inactive_clusters_contribute_nothing() {
        let mut reg = two_cluster_registry();
        reg.set_active(ClusterId(1), false);

        let snap = StatsSnapshot::new(vec![s(3, 0), s(4, 0), s(0, 5), s(0, 6)]);
        assert_eq!(big_task_total(&reg, &snap), 7);
    }

    #[test]
    fn totals_do_not_overflow_u32() {
        let reg = two_cluster_registry();
        let snap = StatsSnapshot::new(vec![s(0, 0), s(0, 0), s(0, u32::MAX), s(0, u32::MAX)]);
        assert_eq!(big_task_total(&reg, &snap), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn not_ready_context_never_reports() {
        let ctx = Arc::new(RotationContext::default());
        let (seen, checkpoint) = recording();
        let agg = WindowAggregator::new(ctx.clone(), Arc::new(SharedStatsBoard::new(4)), checkpoint);

        agg.on_window_boundary(1);
        agg.on_window_boundary(2);

        assert!(seen.lock().is_empty());
        assert_eq!(agg.last_window(), None);
        assert_eq!(Counters::read(&ctx.counters().windows_skip_not_ready), 2);
    }

    #[test]
    fn same_window_is_reported_once() {
        let ctx = Arc::new(RotationContext::default());
        ctx.initialize(
            &StaticTopology::from_clusters(vec![CoreSet::from([0, 1]), CoreSet::from([2, 3])]),
            None,
        );
        let board = Arc::new(SharedStatsBoard::new(4));
        board.publish_all(vec![s(3, 0), s(4, 0), s(0, 5), s(0, 6)]);
        let (seen, checkpoint) = recording();
        let agg = WindowAggregator::new(ctx.clone(), board, checkpoint);

        agg.on_window_boundary(100);
        agg.on_window_boundary(100);

        assert_eq!(*seen.lock(), vec![18]);
        assert_eq!(agg.last_window(), Some(100));
        assert_eq!(Counters::read(&ctx.counters().windows_skip_duplicate), 1);
        assert_eq!(Counters::read(&ctx.counters().reports_emitted), 1);
    }

    #[test]
    fn window_zero_is_processed() {
        let ctx = Arc::new(RotationContext::default());
        ctx.initialize(&StaticTopology::from_clusters(vec![CoreSet::from([0])]), None);
        let (seen, checkpoint) = recording();
        let agg = WindowAggregator::new(ctx, Arc::new(SharedStatsBoard::new(1)), checkpoint);

        agg.on_window_boundary(0);

        assert_eq!(*seen.lock(), vec![0]);
    }
}
