//! Prefix operators: skip-while, take-while and the counted take.
//!
//! Counted `skip` is a `SkipWhile` over the context index. Counted `take`
//! keeps its own counter so it never pulls the item past the limit.

use seqflow_core::context::{ContextThread, ItemContext};
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::Result;

use crate::trace;

pub struct SkipWhile<E, F, S = ()> {
    upstream: E,
    predicate: F,
    thread: ContextThread<S>,
    skipping: bool,
    done: bool,
}

impl<E, F, S> SkipWhile<E, F, S>
where
    E: Enumerator,
    F: FnMut(&E::Item, &mut ItemContext<S>) -> Result<bool>,
{
    pub fn new(upstream: E, predicate: F) -> Self {
        Self {
            upstream,
            predicate,
            thread: ContextThread::new(),
            skipping: true,
            done: false,
        }
    }
}

/// Counted skip. The context index doubles as the counter, so `reset`
/// rewinds it along with everything else.
pub fn skip<E: Enumerator>(
    upstream: E,
    count: usize,
) -> SkipWhile<E, impl FnMut(&E::Item, &mut ItemContext) -> Result<bool>> {
    SkipWhile::new(upstream, move |_: &E::Item, ctx: &mut ItemContext| {
        Ok(ctx.index() < count)
    })
}

impl<E, F, S> Enumerator for SkipWhile<E, F, S>
where
    E: Enumerator,
    F: FnMut(&E::Item, &mut ItemContext<S>) -> Result<bool>,
{
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<E::Item>> {
        if self.done {
            return Ok(None);
        }
        if self.skipping {
            while let Some(item) = self.upstream.pull()? {
                let mut ctx = self.thread.begin();
                let skip = (self.predicate)(&item, &mut ctx);
                let cancelled = self.thread.finish(ctx);
                let skip = skip?;
                if cancelled {
                    trace::cancelled("skip_while", self.thread.invocations() - 1);
                    self.done = true;
                    return Ok(None);
                }
                if !skip {
                    self.skipping = false;
                    return Ok(Some(item));
                }
            }
            self.done = true;
            return Ok(None);
        }
        match self.upstream.pull()? {
            Some(item) => Ok(Some(item)),
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.thread.reset();
        self.skipping = true;
        self.done = false;
        trace::reset("skip_while");
        Ok(())
    }
}

/// Yields items while the predicate holds; the first failing item ends the
/// sequence and is dropped.
///
/// Counted `take` is not a `TakeWhile` over a counting predicate: the
/// predicate only runs on an item already pulled, so `take(n)` would consume
/// item `n + 1` just to reject it. [`Take`] checks its counter first.
pub struct TakeWhile<E, F, S = ()> {
    upstream: E,
    predicate: F,
    thread: ContextThread<S>,
    done: bool,
}

impl<E, F, S> TakeWhile<E, F, S>
where
    E: Enumerator,
    F: FnMut(&E::Item, &mut ItemContext<S>) -> Result<bool>,
{
    pub fn new(upstream: E, predicate: F) -> Self {
        Self {
            upstream,
            predicate,
            thread: ContextThread::new(),
            done: false,
        }
    }
}

impl<E, F, S> Enumerator for TakeWhile<E, F, S>
where
    E: Enumerator,
    F: FnMut(&E::Item, &mut ItemContext<S>) -> Result<bool>,
{
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<E::Item>> {
        if self.done {
            return Ok(None);
        }
        let Some(item) = self.upstream.pull()? else {
            self.done = true;
            return Ok(None);
        };
        let mut ctx = self.thread.begin();
        let keep = (self.predicate)(&item, &mut ctx);
        let cancelled = self.thread.finish(ctx);
        let keep = keep?;
        if cancelled {
            trace::cancelled("take_while", self.thread.invocations() - 1);
        }
        if cancelled || !keep {
            self.done = true;
            return Ok(None);
        }
        Ok(Some(item))
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.thread.reset();
        self.done = false;
        trace::reset("take_while");
        Ok(())
    }
}

/// Counted take. Checks its counter before pulling, so it stops without
/// consuming anything once `count` items were handed out.
pub struct Take<E> {
    upstream: E,
    count: usize,
    remaining: usize,
    done: bool,
}

impl<E: Enumerator> Take<E> {
    pub fn new(upstream: E, count: usize) -> Self {
        Self {
            upstream,
            count,
            remaining: count,
            done: false,
        }
    }
}

impl<E: Enumerator> Enumerator for Take<E> {
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<E::Item>> {
        if self.done || self.remaining == 0 {
            self.done = true;
            return Ok(None);
        }
        match self.upstream.pull()? {
            Some(item) => {
                self.remaining -= 1;
                Ok(Some(item))
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.remaining = self.count;
        self.done = false;
        trace::reset("take");
        Ok(())
    }
}
