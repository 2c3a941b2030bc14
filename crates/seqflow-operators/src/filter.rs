//! Predicate filter.

use seqflow_core::context::{ContextThread, ItemContext};
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::Result;

use crate::trace;

/// Yields an item iff the predicate returns `true` and the callback did not
/// cancel. A cancelled item is dropped and nothing further is pulled.
pub struct Filter<E, F, S = ()> {
    upstream: E,
    predicate: F,
    thread: ContextThread<S>,
    done: bool,
}

impl<E, F, S> Filter<E, F, S>
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

impl<E, F, S> Enumerator for Filter<E, F, S>
where
    E: Enumerator,
    F: FnMut(&E::Item, &mut ItemContext<S>) -> Result<bool>,
{
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<E::Item>> {
        if self.done {
            return Ok(None);
        }
        while let Some(item) = self.upstream.pull()? {
            let mut ctx = self.thread.begin();
            let keep = (self.predicate)(&item, &mut ctx);
            let cancelled = self.thread.finish(ctx);
            let keep = keep?;
            if cancelled {
                trace::cancelled("filter", self.thread.invocations() - 1);
                self.done = true;
                return Ok(None);
            }
            if keep {
                return Ok(Some(item));
            }
        }
        self.done = true;
        Ok(None)
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.thread.reset();
        self.done = false;
        trace::reset("filter");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqflow_core::source::Source;

    #[test]
    fn reset_restarts_context_indices() {
        let mut every_other = Filter::new(
            Source::from_vec(vec![10, 11, 12]),
            |_: &i32, ctx: &mut ItemContext| Ok(ctx.index() % 2 == 0),
        );
        assert_eq!(every_other.pull().unwrap(), Some(10));
        assert_eq!(every_other.pull().unwrap(), Some(12));
        every_other.reset().unwrap();
        assert_eq!(every_other.pull().unwrap(), Some(10));
    }
}
