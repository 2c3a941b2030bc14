//! Fixed-size buffering.

use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::Result;

use crate::slice::Take;
use crate::trace;

/// Groups upstream items into vectors of `size`; the last one may be shorter.
///
/// Each chunk is a `Take` over a borrowed upstream, which is then handed back
/// for the next chunk.
pub struct Chunk<E> {
    upstream: E,
    size: usize,
    done: bool,
}

impl<E: Enumerator> Chunk<E> {
    /// `size` must be at least 1; callers normalize through `PipelineConfig`.
    pub fn new(upstream: E, size: usize) -> Self {
        Self {
            upstream,
            size: size.max(1),
            done: false,
        }
    }
}

impl<E: Enumerator> Enumerator for Chunk<E> {
    type Item = Vec<E::Item>;

    fn pull(&mut self) -> Result<Option<Vec<E::Item>>> {
        if self.done {
            return Ok(None);
        }
        let mut buf = Vec::with_capacity(self.size);
        let mut window = Take::new(&mut self.upstream, self.size);
        while let Some(item) = window.pull()? {
            buf.push(item);
        }
        if buf.len() < self.size {
            self.done = true;
        }
        if buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(buf))
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.done = false;
        trace::reset("chunk");
        Ok(())
    }
}
