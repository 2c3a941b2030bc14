//! Tracing hooks for operator lifecycle events.
//!
//! Compiled to no-ops unless the `tracing` feature is enabled.

#[cfg(feature = "tracing")]
pub(crate) fn materialized(op: &'static str, items: usize) {
    tracing::trace!(op, items, "materialized upstream");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn materialized(_op: &'static str, _items: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn cancelled(op: &'static str, index: usize) {
    tracing::debug!(op, index, "cancelled by callback");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn cancelled(_op: &'static str, _index: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn reset(op: &'static str) {
    tracing::trace!(op, "enumerator reset");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn reset(_op: &'static str) {}
