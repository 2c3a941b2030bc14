//! The pull protocol every source and operator implements, and the
//! `move_next`/`current` state machine layered over it.
//!
//! Enumerators are single-consumer. Driving one enumerator from several
//! threads at once is a caller error; nothing here locks.

use crate::error::{Error, Result};

/// Pull-based producer of items.
///
/// Invariants implementors uphold:
/// - `pull` returns `Ok(None)` once the sequence has ended and keeps doing so
///   on every later call, without touching upstream again.
/// - No item is produced twice and no item is fetched before it is asked for.
/// - `can_reset` is `true` only if `reset` will succeed; any non-resettable
///   upstream makes the wrapper non-resettable too.
pub trait Enumerator {
    type Item;

    /// Advance and hand over the next item, or `None` when exhausted.
    fn pull(&mut self) -> Result<Option<Self::Item>>;

    fn can_reset(&self) -> bool {
        false
    }

    /// Rewind to the position before the first item.
    fn reset(&mut self) -> Result<()> {
        Err(Error::NotSupported("reset"))
    }
}

impl<E: Enumerator + ?Sized> Enumerator for Box<E> {
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        (**self).pull()
    }

    fn can_reset(&self) -> bool {
        (**self).can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

impl<E: Enumerator + ?Sized> Enumerator for &mut E {
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        (**self).pull()
    }

    fn can_reset(&self) -> bool {
        (**self).can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

/// `move_next`/`current` view over an [`Enumerator`].
///
/// Tracks `{ index, current, exhausted }`. Once exhausted, `move_next`
/// keeps returning `false` and never pulls again.
pub struct Cursor<E: Enumerator> {
    source: E,
    index: Option<usize>,
    current: Option<E::Item>,
    exhausted: bool,
}

impl<E: Enumerator> Cursor<E> {
    pub fn new(source: E) -> Self {
        Self {
            source,
            index: None,
            current: None,
            exhausted: false,
        }
    }

    /// Advance; `true` when a new item is available through [`Cursor::current`].
    pub fn move_next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        match self.source.pull()? {
            Some(item) => {
                self.current = Some(item);
                self.index = Some(self.index.map_or(0, |i| i + 1));
                Ok(true)
            }
            None => {
                self.current = None;
                self.exhausted = true;
                Ok(false)
            }
        }
    }

    pub fn current(&self) -> Result<&E::Item> {
        match &self.current {
            Some(item) => Ok(item),
            None if self.exhausted => Err(Error::Protocol(
                "current requested after the enumerator was exhausted".into(),
            )),
            None => Err(Error::Protocol(
                "current requested before the first move_next".into(),
            )),
        }
    }

    /// Position of the current item; `None` before the first item.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn can_reset(&self) -> bool {
        self.source.can_reset()
    }

    pub fn reset(&mut self) -> Result<()> {
        if !self.source.can_reset() {
            return Err(Error::NotSupported("reset on a non-resettable sequence"));
        }
        self.source.reset()?;
        self.index = None;
        self.current = None;
        self.exhausted = false;
        Ok(())
    }

    pub fn into_inner(self) -> E {
        self.source
    }
}
