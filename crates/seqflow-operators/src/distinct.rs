//! Distinct and the comparer-driven set operations.
//!
//! No hashing contract is available for an arbitrary equality comparer, so
//! every seen-list is a linear scan. O(n^2), first-seen item wins.

use seqflow_core::compare::EqualityComparer;
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::{Error, Result};

use crate::trace;

pub struct Distinct<'c, E: Enumerator> {
    upstream: E,
    comparer: EqualityComparer<'c, E::Item>,
    seen: Vec<E::Item>,
    done: bool,
}

impl<'c, E> Distinct<'c, E>
where
    E: Enumerator,
    E::Item: Clone,
{
    pub fn new(upstream: E, comparer: EqualityComparer<'c, E::Item>) -> Self {
        Self {
            upstream,
            comparer,
            seen: Vec::new(),
            done: false,
        }
    }
}

impl<'c, E> Enumerator for Distinct<'c, E>
where
    E: Enumerator,
    E::Item: Clone,
{
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<E::Item>> {
        if self.done {
            return Ok(None);
        }
        while let Some(item) = self.upstream.pull()? {
            if !contains(&self.seen, &self.comparer, &item) {
                self.seen.push(item.clone());
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
        self.seen.clear();
        self.done = false;
        trace::reset("distinct");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// Items of the first sequence also present in the second.
    Intersect,
    /// Items of the first sequence absent from the second.
    Except,
}

/// `intersect`/`except`: the second sequence is drained on the first pull,
/// the first is streamed. Output is distinct, in first-sequence order.
pub struct SetFilter<'c, E: Enumerator, B> {
    upstream: E,
    other: B,
    mode: SetMode,
    comparer: EqualityComparer<'c, E::Item>,
    other_items: Option<Vec<E::Item>>,
    seen: Vec<E::Item>,
    done: bool,
}

impl<'c, E, B> SetFilter<'c, E, B>
where
    E: Enumerator,
    E::Item: Clone,
    B: Enumerator<Item = E::Item>,
{
    pub fn new(upstream: E, other: B, mode: SetMode, comparer: EqualityComparer<'c, E::Item>) -> Self {
        Self {
            upstream,
            other,
            mode,
            comparer,
            other_items: None,
            seen: Vec::new(),
            done: false,
        }
    }
}

impl<'c, E, B> Enumerator for SetFilter<'c, E, B>
where
    E: Enumerator,
    E::Item: Clone,
    B: Enumerator<Item = E::Item>,
{
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<E::Item>> {
        if self.done {
            return Ok(None);
        }
        if self.other_items.is_none() {
            let mut items = Vec::new();
            while let Some(item) = self.other.pull()? {
                items.push(item);
            }
            trace::materialized("set_filter", items.len());
            self.other_items = Some(items);
        }
        let other = self.other_items.as_deref().unwrap_or(&[]);
        while let Some(item) = self.upstream.pull()? {
            let in_other = contains(other, &self.comparer, &item);
            let wanted = match self.mode {
                SetMode::Intersect => in_other,
                SetMode::Except => !in_other,
            };
            if wanted && !contains(&self.seen, &self.comparer, &item) {
                self.seen.push(item.clone());
                return Ok(Some(item));
            }
        }
        self.done = true;
        Ok(None)
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset() && self.other.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        if !self.can_reset() {
            return Err(Error::NotSupported("reset of a set filter over a one-shot input"));
        }
        self.upstream.reset()?;
        self.other.reset()?;
        self.other_items = None;
        self.seen.clear();
        self.done = false;
        trace::reset("set_filter");
        Ok(())
    }
}

fn contains<T>(items: &[T], comparer: &EqualityComparer<'_, T>, candidate: &T) -> bool {
    items.iter().any(|seen| comparer.equals(seen, candidate))
}
