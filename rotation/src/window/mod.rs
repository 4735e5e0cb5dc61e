//! Per-window big-task aggregation.

pub mod aggregator;
pub mod checkpoint;
pub mod stats;

pub use aggregator::{WindowAggregator, big_task_total, cluster_big_tasks};
pub use checkpoint::RotationCheckpoint;
pub use stats::{CoreStats, SharedStatsBoard, StatsSnapshot, StatsSource};

/// Start timestamp (or tick count) identifying a scheduling window.
pub type WindowId = u64;
