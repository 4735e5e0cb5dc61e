use tracing::{Level, Span};

/// Root span covering one scheduling window.
///
/// Debug level: windows roll over every few milliseconds.
pub fn window_span(window_id: u64) -> Span {
    tracing::span!(Level::DEBUG, "window", window_id = window_id)
}
