//! Ordering engine.
//!
//! Sorting needs every key, so the first pull drains upstream. Each sort
//! level computes its keys once for the whole buffer (the decoration); the
//! buffer is ordered through an index permutation compared level by level,
//! and items are then moved out in that order (the unwrap). Keys are dropped
//! right after the sort.
//!
//! `Vec::sort_by` is stable, so items whose keys tie on every level keep
//! their source order.
//!
//! A key selector that cancels drops its item and every item after it; the
//! sort runs over the items keyed before the cancel.

use std::cmp::Ordering;
use std::marker::PhantomData;

use seqflow_core::compare::Comparer;
use seqflow_core::context::{ContextThread, ItemContext};
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::Result;

use crate::trace;

/// One key of a composite ordering.
pub trait SortLevel<T> {
    /// Compute keys for `items` in buffer order. Returns how many leading
    /// items were keyed; fewer than `items.len()` means the level cancelled.
    fn prepare(&mut self, items: &[T]) -> Result<usize>;

    /// Compare the items at buffer positions `a` and `b`.
    fn compare(&self, items: &[T], a: usize, b: usize) -> Ordering;

    /// Drop the computed keys.
    fn release(&mut self);
}

pub struct KeyLevel<'c, T, K, F, S = ()> {
    selector: F,
    comparer: Comparer<'c, K>,
    descending: bool,
    thread: ContextThread<S>,
    keys: Vec<K>,
    _item: PhantomData<fn(&T)>,
}

impl<'c, T, K, F, S> KeyLevel<'c, T, K, F, S>
where
    F: FnMut(&T, &mut ItemContext<S>) -> Result<K>,
{
    pub fn new(selector: F, comparer: Comparer<'c, K>, descending: bool) -> Self {
        Self {
            selector,
            comparer,
            descending,
            thread: ContextThread::new(),
            keys: Vec::new(),
            _item: PhantomData,
        }
    }
}

impl<'c, T, K, F, S> SortLevel<T> for KeyLevel<'c, T, K, F, S>
where
    F: FnMut(&T, &mut ItemContext<S>) -> Result<K>,
{
    fn prepare(&mut self, items: &[T]) -> Result<usize> {
        // Contexts restart with every sort.
        self.thread.reset();
        self.keys = Vec::with_capacity(items.len());
        for item in items {
            let mut ctx = self.thread.begin();
            let key = (self.selector)(item, &mut ctx);
            let cancelled = self.thread.finish(ctx);
            let key = key?;
            if cancelled {
                trace::cancelled("order_by", self.keys.len());
                break;
            }
            self.keys.push(key);
        }
        Ok(self.keys.len())
    }

    fn compare(&self, _items: &[T], a: usize, b: usize) -> Ordering {
        let ord = self.comparer.compare(&self.keys[a], &self.keys[b]);
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }

    fn release(&mut self) {
        self.keys = Vec::new();
    }
}

/// Orders by the items themselves; no keys to compute.
pub struct ValueLevel<'c, T> {
    comparer: Comparer<'c, T>,
    descending: bool,
}

impl<'c, T> ValueLevel<'c, T> {
    pub fn new(comparer: Comparer<'c, T>, descending: bool) -> Self {
        Self {
            comparer,
            descending,
        }
    }
}

impl<'c, T> SortLevel<T> for ValueLevel<'c, T> {
    fn prepare(&mut self, items: &[T]) -> Result<usize> {
        Ok(items.len())
    }

    fn compare(&self, items: &[T], a: usize, b: usize) -> Ordering {
        let ord = self.comparer.compare(&items[a], &items[b]);
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }

    fn release(&mut self) {}
}

/// Orders by source position; descending gives a reversal.
#[derive(Debug, Clone, Copy)]
pub struct PositionLevel {
    pub descending: bool,
}

impl<T> SortLevel<T> for PositionLevel {
    fn prepare(&mut self, items: &[T]) -> Result<usize> {
        Ok(items.len())
    }

    fn compare(&self, _items: &[T], a: usize, b: usize) -> Ordering {
        if self.descending {
            b.cmp(&a)
        } else {
            a.cmp(&b)
        }
    }

    fn release(&mut self) {}
}

pub struct OrderBy<'l, E: Enumerator> {
    upstream: E,
    levels: Vec<Box<dyn SortLevel<E::Item> + 'l>>,
    capacity: usize,
    sorted: Option<std::vec::IntoIter<E::Item>>,
}

impl<'l, E: Enumerator> OrderBy<'l, E> {
    pub fn new(upstream: E, first: Box<dyn SortLevel<E::Item> + 'l>) -> Self {
        Self {
            upstream,
            levels: vec![first],
            capacity: 0,
            sorted: None,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Add a subordinate key, consulted only when all earlier keys tie.
    /// Takes effect at the next sort (first pull, or the pull after a reset).
    pub fn then_by(mut self, level: Box<dyn SortLevel<E::Item> + 'l>) -> Self {
        self.levels.push(level);
        self
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    fn sort(&mut self) -> Result<Vec<E::Item>> {
        let mut items = Vec::with_capacity(self.capacity);
        while let Some(item) = self.upstream.pull()? {
            items.push(item);
        }
        trace::materialized("order_by", items.len());

        let prepared = self.prepare_levels(&mut items);
        if let Err(err) = prepared {
            self.release_levels();
            return Err(err);
        }
        let mut order: Vec<usize> = (0..items.len()).collect();
        let levels = &self.levels;
        order.sort_by(|&a, &b| {
            levels
                .iter()
                .map(|level| level.compare(&items, a, b))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        self.release_levels();

        let mut slots: Vec<Option<E::Item>> = items.into_iter().map(Some).collect();
        Ok(order.iter().filter_map(|&i| slots[i].take()).collect())
    }

    /// Key the buffer level by level. A level that keys only a prefix
    /// truncates the buffer for itself and every later level.
    fn prepare_levels(&mut self, items: &mut Vec<E::Item>) -> Result<()> {
        for level in self.levels.iter_mut() {
            let keyed = level.prepare(items)?;
            items.truncate(keyed);
        }
        Ok(())
    }

    fn release_levels(&mut self) {
        for level in self.levels.iter_mut() {
            level.release();
        }
    }
}

impl<'l, E: Enumerator> Enumerator for OrderBy<'l, E> {
    type Item = E::Item;

    fn pull(&mut self) -> Result<Option<E::Item>> {
        if self.sorted.is_none() {
            let sorted = self.sort()?;
            self.sorted = Some(sorted.into_iter());
        }
        Ok(self.sorted.as_mut().and_then(|sorted| sorted.next()))
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.sorted = None;
        trace::reset("order_by");
        Ok(())
    }
}
