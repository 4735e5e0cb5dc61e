mod init;
mod spans;

pub use init::init_logger;
pub use spans::window_span;

use std::time::{Duration, Instant};

/// Runs `f` and emits a `performance` warning when it takes longer than `max`.
///
/// Synchronous on purpose: the callers sit on window-boundary paths that
/// must not yield.
pub fn warn_if_slow<F, T>(label: &'static str, max: Duration, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_us = elapsed.as_micros() as u64,
            "slow operation detected"
        );
    }
    out
}
