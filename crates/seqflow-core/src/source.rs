//! Source adapters: the two kinds of input a pipeline can start from.
//!
//! The kind is fixed at construction. Indexed sources know their length and
//! rewind by resetting a position; external sources wrap a one-shot iterator
//! and cannot be reset.

use crate::enumerator::Enumerator;
use crate::error::{Error, Result};

type Fetch<'a, T> = Box<dyn Fn(usize) -> Option<T> + 'a>;

pub enum Source<'a, T> {
    Indexed(IndexedSource<'a, T>),
    External(ExternalSource<'a, T>),
}

/// Random-access source; yields `fetch(0)`, `fetch(1)`, ... up to `len`.
pub struct IndexedSource<'a, T> {
    fetch: Fetch<'a, T>,
    len: usize,
    pos: usize,
}

/// One-shot iterator source.
pub struct ExternalSource<'a, T> {
    iter: Box<dyn Iterator<Item = T> + 'a>,
    done: bool,
}

impl<'a, T: 'a> Source<'a, T> {
    /// Resettable source over an owned collection. Items are cloned out so the
    /// collection can be replayed after `reset`.
    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone,
    {
        let len = items.len();
        Self::indexed(len, move |i| items.get(i).cloned())
    }

    /// Resettable source over a fixed-length index space.
    pub fn indexed(len: usize, fetch: impl Fn(usize) -> Option<T> + 'a) -> Self {
        Source::Indexed(IndexedSource {
            fetch: Box::new(fetch),
            len,
            pos: 0,
        })
    }

    /// One-shot source over any iterator.
    pub fn from_iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Source::External(ExternalSource {
            iter: Box::new(iter.into_iter()),
            done: false,
        })
    }

    pub fn empty() -> Self {
        Self::indexed(0, |_| None)
    }

    /// Known length for indexed sources.
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            Source::Indexed(s) => Some(s.len),
            Source::External(_) => None,
        }
    }
}

impl<'a, T> Source<'a, &'a T> {
    /// Resettable source borrowing a slice; yields references, no cloning.
    pub fn from_slice(items: &'a [T]) -> Self {
        Source::Indexed(IndexedSource {
            fetch: Box::new(move |i| items.get(i)),
            len: items.len(),
            pos: 0,
        })
    }
}

impl<'a, T> Enumerator for Source<'a, T> {
    type Item = T;

    fn pull(&mut self) -> Result<Option<T>> {
        match self {
            Source::Indexed(s) => {
                if s.pos >= s.len {
                    return Ok(None);
                }
                let item = (s.fetch)(s.pos);
                s.pos += 1;
                Ok(item)
            }
            Source::External(s) => {
                if s.done {
                    return Ok(None);
                }
                let item = s.iter.next();
                if item.is_none() {
                    s.done = true;
                }
                Ok(item)
            }
        }
    }

    fn can_reset(&self) -> bool {
        matches!(self, Source::Indexed(_))
    }

    fn reset(&mut self) -> Result<()> {
        match self {
            Source::Indexed(s) => {
                s.pos = 0;
                Ok(())
            }
            Source::External(_) => Err(Error::NotSupported("reset of a one-shot iterator source")),
        }
    }
}
