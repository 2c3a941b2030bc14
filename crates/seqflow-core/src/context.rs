//! Per-item execution context threaded through operator callbacks.
//!
//! Each operator owns one [`ContextThread`]. For every item it pulls it calls
//! [`ContextThread::begin`], hands the fresh [`ItemContext`] to the user
//! callback, then gives it back through [`ContextThread::finish`]. What item
//! `i` left in `next_value`/`value` is exactly what item `i + 1` observes as
//! `previous_value`/`value`.
//!
//! `S` is the caller-chosen scratch payload. Operators invoked without a
//! context-aware callback use `S = ()`.

/// Execution record for one callback invocation.
#[derive(Debug)]
pub struct ItemContext<S = ()> {
    index: usize,
    previous: Option<S>,
    next: Option<S>,
    value: Option<S>,
    cancelled: bool,
}

impl<S> ItemContext<S> {
    /// Zero-based position of the item within this operator's invocations.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// What the previous invocation stored with [`ItemContext::set_next_value`].
    pub fn previous_value(&self) -> Option<&S> {
        self.previous.as_ref()
    }

    pub fn next_value(&self) -> Option<&S> {
        self.next.as_ref()
    }

    /// Carry `value` to the next invocation's `previous_value`.
    pub fn set_next_value(&mut self, value: S) {
        self.next = Some(value);
    }

    /// Scratch value persisted across every invocation of this operator.
    pub fn value(&self) -> Option<&S> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> &mut Option<S> {
        &mut self.value
    }

    pub fn set_value(&mut self, value: S) {
        self.value = Some(value);
    }

    /// Stop the operator: nothing further is pulled and the current item is
    /// not emitted.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Operator-owned state that creates contexts in pull order.
#[derive(Debug)]
pub struct ContextThread<S = ()> {
    index: usize,
    carried: Option<S>,
    value: Option<S>,
}

impl<S> Default for ContextThread<S> {
    fn default() -> Self {
        Self {
            index: 0,
            carried: None,
            value: None,
        }
    }
}

impl<S> ContextThread<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for the next invocation.
    pub fn begin(&mut self) -> ItemContext<S> {
        ItemContext {
            index: self.index,
            previous: self.carried.take(),
            next: None,
            value: self.value.take(),
            cancelled: false,
        }
    }

    /// Take back a context after the callback ran. Returns whether it was
    /// cancelled.
    pub fn finish(&mut self, ctx: ItemContext<S>) -> bool {
        self.index += 1;
        self.carried = ctx.next;
        self.value = ctx.value;
        ctx.cancelled
    }

    /// Invocations completed so far.
    pub fn invocations(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.carried = None;
        self.value = None;
    }
}
