use std::sync::Arc;
use std::time::Duration;

use common::logger::init_logger;
use rotation::{
    cluster::StaticTopology,
    config::RotationConfig,
    context::RotationContext,
    metrics::counters::Counters,
    time::WindowClock,
    window::{RotationCheckpoint, SharedStatsBoard, WindowAggregator},
};

/// Stand-in for the rotation decision: records the total in the log.
fn log_checkpoint() -> Arc<dyn RotationCheckpoint> {
    Arc::new(|big_task_total: u64| {
        tracing::info!(target: "rotation", big_task_total, "rotation checkpoint");
    })
}

/// Samples the monotonic window clock every `tick` and forwards the current
/// window to the aggregator. Several ticks land in each window; the
/// aggregator keeps only the first.
fn start_window_loop(aggregator: Arc<WindowAggregator>, window_ms: u64, tick: Duration) {
    let clock = WindowClock::new(window_ms);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            aggregator.on_window_boundary(clock.current_window());
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = RotationConfig::from_env()?;
    init_logger("rotation-ctl", cfg.json_logs);

    tracing::info!(
        clusters = cfg.topology.len(),
        window_ms = cfg.window_ms,
        tick_ms = cfg.tick_ms,
        "Starting rotation control..."
    );

    let topology = StaticTopology::from_clusters(cfg.topology.clone());
    let counters = Counters::default();
    let ctx = Arc::new(RotationContext::new(counters.clone()));

    // Upstream stats producers publish into this board.
    let stats = Arc::new(SharedStatsBoard::new(topology.core_slots()));

    let aggregator = Arc::new(WindowAggregator::new(ctx.clone(), stats, log_checkpoint()));

    ctx.initialize(&topology, cfg.primary_core);

    start_window_loop(
        aggregator.clone(),
        cfg.window_ms,
        Duration::from_millis(cfg.tick_ms),
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!(
        windows = Counters::read(&counters.windows_processed),
        duplicates = Counters::read(&counters.windows_skip_duplicate),
        last_window = ?aggregator.last_window(),
        "Shutdown signal received"
    );

    Ok(())
}
