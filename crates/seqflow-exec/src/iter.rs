//! `Iterator` bridge so sequences work with `for` loops and std adapters.

use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::Result;

use crate::sequence::Sequence;

/// Yields `Ok(item)` per item; the first error is yielded once and ends
/// iteration.
pub struct SequenceIter<'a, T> {
    seq: Sequence<'a, T>,
    finished: bool,
}

impl<'a, T> Iterator for SequenceIter<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        if self.finished {
            return None;
        }
        match self.seq.pull() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a, T> std::iter::FusedIterator for SequenceIter<'a, T> {}

impl<'a, T: 'a> IntoIterator for Sequence<'a, T> {
    type Item = Result<T>;
    type IntoIter = SequenceIter<'a, T>;

    fn into_iter(self) -> SequenceIter<'a, T> {
        SequenceIter {
            seq: self,
            finished: false,
        }
    }
}
