//! Tracing hooks for terminal reducers.
//!
//! No-ops unless the `tracing` feature is on; subscribers are the embedding
//! binary's business.

#[cfg(feature = "tracing")]
pub(crate) fn terminal(op: &'static str, pulled: usize) {
    tracing::trace!(op, pulled, "terminal reducer finished");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn terminal(_op: &'static str, _pulled: usize) {}
