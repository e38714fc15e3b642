//! Errors surfaced by the event bus.

use thiserror::Error;

/// Errors raised while draining the event queue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlushError {
    /// The per-flush event cap was hit before the queue drained.
    ///
    /// A handler is almost certainly re-posting unconditionally; the
    /// undispatched remainder is left at the front of the queue for
    /// inspection.
    #[error(
        "flush dispatched {dispatched} events without draining the queue \
         (cap {cap}); a handler is likely re-posting unconditionally"
    )]
    Runaway { dispatched: usize, cap: usize },
}
