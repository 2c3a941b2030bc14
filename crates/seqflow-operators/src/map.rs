//! Projection. `select` is `select_many` with a one-element projection, so
//! cancellation and context threading are defined once, here.

use std::iter::Once;

use seqflow_core::context::{ContextThread, ItemContext};
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::Result;

use crate::trace;

/// Flattening projection: each upstream item expands into zero or more items.
pub struct SelectMany<E, F, S, I: IntoIterator> {
    upstream: E,
    projector: F,
    thread: ContextThread<S>,
    inner: Option<I::IntoIter>,
    done: bool,
}

impl<E, F, S, I> SelectMany<E, F, S, I>
where
    E: Enumerator,
    I: IntoIterator,
    F: FnMut(E::Item, &mut ItemContext<S>) -> Result<I>,
{
    pub fn new(upstream: E, projector: F) -> Self {
        Self {
            upstream,
            projector,
            thread: ContextThread::new(),
            inner: None,
            done: false,
        }
    }
}

/// One-to-one projection expressed as a singleton `SelectMany`.
pub fn select<E, F, S, U>(
    upstream: E,
    mut projector: F,
) -> SelectMany<E, impl FnMut(E::Item, &mut ItemContext<S>) -> Result<Once<U>>, S, Once<U>>
where
    E: Enumerator,
    F: FnMut(E::Item, &mut ItemContext<S>) -> Result<U>,
{
    SelectMany::new(upstream, move |item: E::Item, ctx: &mut ItemContext<S>| {
        projector(item, ctx).map(std::iter::once)
    })
}

impl<E, F, S, I> Enumerator for SelectMany<E, F, S, I>
where
    E: Enumerator,
    I: IntoIterator,
    F: FnMut(E::Item, &mut ItemContext<S>) -> Result<I>,
{
    type Item = I::Item;

    fn pull(&mut self) -> Result<Option<I::Item>> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if let Some(item) = inner.next() {
                    return Ok(Some(item));
                }
                self.inner = None;
            }
            if self.done {
                return Ok(None);
            }
            let Some(item) = self.upstream.pull()? else {
                self.done = true;
                return Ok(None);
            };
            let mut ctx = self.thread.begin();
            let projected = (self.projector)(item, &mut ctx);
            let cancelled = self.thread.finish(ctx);
            let projected = projected?;
            if cancelled {
                trace::cancelled("select_many", self.thread.invocations() - 1);
                self.done = true;
                return Ok(None);
            }
            self.inner = Some(projected.into_iter());
        }
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.thread.reset();
        self.inner = None;
        self.done = false;
        trace::reset("select_many");
        Ok(())
    }
}
