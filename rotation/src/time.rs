use std::time::Instant;

use crate::window::WindowId;

/// Start of the window of length `window_ms` that contains `ts_ms`.
pub fn window_start(ts_ms: u64, window_ms: u64) -> u64 {
    let window_ms = window_ms.max(1);
    ts_ms - ts_ms % window_ms
}

/// Maps monotonic time onto window ids.
///
/// Ids are the window start in milliseconds since the clock was created.
/// They never go backwards, whatever happens to the wall clock.
#[derive(Debug, Clone, Copy)]
pub struct WindowClock {
    origin: Instant,
    window_ms: u64,
}

impl WindowClock {
    pub fn new(window_ms: u64) -> Self {
        Self::starting_at(Instant::now(), window_ms)
    }

    pub fn starting_at(origin: Instant, window_ms: u64) -> Self {
        Self { origin, window_ms }
    }

    /// Window containing `now`; instants before the origin map to window 0.
    pub fn window_at(&self, now: Instant) -> WindowId {
        let elapsed_ms = now.saturating_duration_since(self.origin).as_millis() as u64;
        window_start(elapsed_ms, self.window_ms)
    }

    pub fn current_window(&self) -> WindowId {
        self.window_at(Instant::now())
    }
}
