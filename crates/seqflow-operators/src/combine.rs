//! Two-input operators: concat and zip, plus `DefaultIfEmpty`.

use seqflow_core::context::{ContextThread, ItemContext};
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::{Error, Result};

use crate::trace;

/// Everything from `first`, then everything from `second`.
pub struct Concat<A, B> {
    first: A,
    second: B,
    on_second: bool,
}

impl<A, B> Concat<A, B>
where
    A: Enumerator,
    B: Enumerator<Item = A::Item>,
{
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            on_second: false,
        }
    }
}

impl<A, B> Enumerator for Concat<A, B>
where
    A: Enumerator,
    B: Enumerator<Item = A::Item>,
{
    type Item = A::Item;

    fn pull(&mut self) -> Result<Option<A::Item>> {
        if !self.on_second {
            if let Some(item) = self.first.pull()? {
                return Ok(Some(item));
            }
            self.on_second = true;
        }
        self.second.pull()
    }

    fn can_reset(&self) -> bool {
        self.first.can_reset() && self.second.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        if !self.can_reset() {
            return Err(Error::NotSupported("reset of concat over a one-shot input"));
        }
        self.first.reset()?;
        self.second.reset()?;
        self.on_second = false;
        trace::reset("concat");
        Ok(())
    }
}

/// Lockstep pairing; ends as soon as either side is exhausted. Each side has
/// its own context and either one may cancel.
pub struct Zip<A, B, F, S = ()> {
    left: A,
    right: B,
    combiner: F,
    left_thread: ContextThread<S>,
    right_thread: ContextThread<S>,
    done: bool,
}

impl<A, B, F, S, R> Zip<A, B, F, S>
where
    A: Enumerator,
    B: Enumerator,
    F: FnMut(A::Item, B::Item, &mut ItemContext<S>, &mut ItemContext<S>) -> Result<R>,
{
    pub fn new(left: A, right: B, combiner: F) -> Self {
        Self {
            left,
            right,
            combiner,
            left_thread: ContextThread::new(),
            right_thread: ContextThread::new(),
            done: false,
        }
    }
}

impl<A, B, F, S, R> Enumerator for Zip<A, B, F, S>
where
    A: Enumerator,
    B: Enumerator,
    F: FnMut(A::Item, B::Item, &mut ItemContext<S>, &mut ItemContext<S>) -> Result<R>,
{
    type Item = R;

    fn pull(&mut self) -> Result<Option<R>> {
        if self.done {
            return Ok(None);
        }
        let Some(left) = self.left.pull()? else {
            self.done = true;
            return Ok(None);
        };
        let Some(right) = self.right.pull()? else {
            self.done = true;
            return Ok(None);
        };
        let mut left_ctx = self.left_thread.begin();
        let mut right_ctx = self.right_thread.begin();
        let combined = (self.combiner)(left, right, &mut left_ctx, &mut right_ctx);
        let left_cancelled = self.left_thread.finish(left_ctx);
        let right_cancelled = self.right_thread.finish(right_ctx);
        let combined = combined?;
        if left_cancelled || right_cancelled {
            trace::cancelled("zip", self.left_thread.invocations() - 1);
            self.done = true;
            return Ok(None);
        }
        Ok(Some(combined))
    }

    fn can_reset(&self) -> bool {
        self.left.can_reset() && self.right.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        if !self.can_reset() {
            return Err(Error::NotSupported("reset of zip over a one-shot input"));
        }
        self.left.reset()?;
        self.right.reset()?;
        self.left_thread.reset();
        self.right_thread.reset();
        self.done = false;
        trace::reset("zip");
        Ok(())
    }
}

/// Passes items through; yields `default` once if upstream turned out empty.
pub struct DefaultIfEmpty<E: Enumerator> {
    upstream: E,
    default: E::Item,
    produced: bool,
    done: bool,
}

impl<E> DefaultIfEmpty<E>
where
    E: Enumerator,
    E::Item: Clone,
{
    pub fn new(upstream: E, default: E::Item) -> Self {
        Self {
            upstream,
            default,
            produced: false,
            done: false,
        }
    }
}

impl<E> Enumerator for DefaultIfEmpty<E>
where
    E: Enumerator,
    E::Item: Clone,
{
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<E::Item>> {
        if self.done {
            return Ok(None);
        }
        match self.upstream.pull()? {
            Some(item) => {
                self.produced = true;
                Ok(Some(item))
            }
            None => {
                self.done = true;
                if self.produced {
                    Ok(None)
                } else {
                    Ok(Some(self.default.clone()))
                }
            }
        }
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.produced = false;
        self.done = false;
        trace::reset("default_if_empty");
        Ok(())
    }
}
