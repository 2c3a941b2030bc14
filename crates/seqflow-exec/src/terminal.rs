//! Terminal reducers.
//!
//! Each one is a plain loop over `pull`; none needs anything beyond the
//! enumerator protocol. They stop pulling as soon as the answer is known.

use seqflow_core::context::{ContextThread, ItemContext};
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::{Error, Result};

use crate::metrics;
use crate::sequence::Sequence;

impl<'a, T: 'a> Sequence<'a, T> {
    pub fn to_vec(mut self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        while let Some(item) = self.pull()? {
            out.push(item);
        }
        metrics::terminal("to_vec", out.len());
        Ok(out)
    }

    pub fn count(mut self) -> Result<usize> {
        let mut n = 0;
        while self.pull()?.is_some() {
            n += 1;
        }
        metrics::terminal("count", n);
        Ok(n)
    }

    pub fn count_where<F>(mut self, mut predicate: F) -> Result<usize>
    where
        F: FnMut(&T) -> bool,
    {
        let mut n = 0;
        while let Some(item) = self.pull()? {
            if predicate(&item) {
                n += 1;
            }
        }
        Ok(n)
    }

    pub fn first(mut self) -> Result<T> {
        self.pull()?.ok_or(Error::Empty("first"))
    }

    pub fn first_where<F>(mut self, mut predicate: F) -> Result<T>
    where
        F: FnMut(&T) -> bool,
    {
        while let Some(item) = self.pull()? {
            if predicate(&item) {
                return Ok(item);
            }
        }
        Err(Error::NoMatch("first_where"))
    }

    pub fn first_or(mut self, default: T) -> Result<T> {
        Ok(self.pull()?.unwrap_or(default))
    }

    pub fn last(mut self) -> Result<T> {
        let mut last = None;
        while let Some(item) = self.pull()? {
            last = Some(item);
        }
        last.ok_or(Error::Empty("last"))
    }

    pub fn last_where<F>(mut self, mut predicate: F) -> Result<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut last = None;
        while let Some(item) = self.pull()? {
            if predicate(&item) {
                last = Some(item);
            }
        }
        last.ok_or(Error::NoMatch("last_where"))
    }

    /// The only item. Fails on an empty sequence and on a second item.
    pub fn single(mut self) -> Result<T> {
        let item = self.pull()?.ok_or(Error::Empty("single"))?;
        if self.pull()?.is_some() {
            return Err(Error::AmbiguousMatch("single"));
        }
        Ok(item)
    }

    pub fn single_where<F>(mut self, mut predicate: F) -> Result<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut found = None;
        while let Some(item) = self.pull()? {
            if predicate(&item) {
                if found.is_some() {
                    return Err(Error::AmbiguousMatch("single_where"));
                }
                found = Some(item);
            }
        }
        found.ok_or(Error::NoMatch("single_where"))
    }

    pub fn element_at(mut self, index: usize) -> Result<T> {
        let mut seen = 0;
        while let Some(item) = self.pull()? {
            if seen == index {
                return Ok(item);
            }
            seen += 1;
        }
        Err(Error::OutOfRange { index, len: seen })
    }

    pub fn element_at_or(self, index: usize, default: T) -> Result<T> {
        match self.element_at(index) {
            Err(Error::OutOfRange { .. }) => Ok(default),
            other => other,
        }
    }

    /// Seedless fold: the first item is the initial accumulator.
    pub fn aggregate<F>(mut self, mut f: F) -> Result<T>
    where
        F: FnMut(T, T) -> T,
    {
        let mut acc = self.pull()?.ok_or(Error::Empty("aggregate"))?;
        while let Some(item) = self.pull()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    pub fn fold<A, F>(mut self, seed: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        let mut acc = seed;
        while let Some(item) = self.pull()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    pub fn any(mut self) -> Result<bool> {
        Ok(self.pull()?.is_some())
    }

    pub fn any_where<F>(mut self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&T) -> bool,
    {
        while let Some(item) = self.pull()? {
            if predicate(&item) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn all<F>(mut self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&T) -> bool,
    {
        while let Some(item) = self.pull()? {
            if !predicate(&item) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn contains(self, value: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        self.any_where(|item| item == value)
    }

    /// Same length and pairwise equal.
    pub fn sequence_equal(mut self, mut other: Sequence<'a, T>) -> Result<bool>
    where
        T: PartialEq,
    {
        loop {
            match (self.pull()?, other.pull()?) {
                (None, None) => return Ok(true),
                (Some(a), Some(b)) if a == b => continue,
                _ => return Ok(false),
            }
        }
    }

    pub fn for_each<F>(mut self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        let mut n = 0;
        while let Some(item) = self.pull()? {
            f(item);
            n += 1;
        }
        metrics::terminal("for_each", n);
        Ok(())
    }

    /// Visit items with a context. Cancelling stops after the current item;
    /// returns how many items were visited.
    pub fn for_each_with<S, F>(mut self, mut f: F) -> Result<usize>
    where
        F: FnMut(T, &mut ItemContext<S>),
    {
        let mut thread = ContextThread::new();
        while let Some(item) = self.pull()? {
            let mut ctx = thread.begin();
            f(item, &mut ctx);
            if thread.finish(ctx) {
                break;
            }
        }
        metrics::terminal("for_each_with", thread.invocations());
        Ok(thread.invocations())
    }
}
