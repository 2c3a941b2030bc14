//! `OrderedSequence`: an ordering under construction.
//!
//! `then_by*` only appends a subordinate key; the sort itself runs once, on
//! the first pull, over the original items with the whole key chain. Keys
//! compare level by level, so later keys refine earlier ones and never
//! override them.

use std::rc::Rc;

use seqflow_core::compare::Comparer;
use seqflow_core::config::PipelineConfig;
use seqflow_core::context::ItemContext;
use seqflow_core::error::Result;
use seqflow_operators::{KeyLevel, OrderBy, SortLevel};

use crate::sequence::{Sequence, Upstream};

pub struct OrderedSequence<'a, T> {
    order: OrderBy<'a, Upstream<'a, T>>,
    config: Rc<PipelineConfig>,
}

impl<'a, T: 'a> OrderedSequence<'a, T> {
    pub(crate) fn new(source: Sequence<'a, T>, first: Box<dyn SortLevel<T> + 'a>) -> Self {
        let capacity = source.config.materialize_capacity_hint;
        Self {
            order: OrderBy::new(source.inner, first).with_capacity(capacity),
            config: source.config,
        }
    }

    pub fn then_by<K, F>(self, mut key: F) -> Self
    where
        K: PartialOrd + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.then_by_with(
            move |item: &T, _: &mut ItemContext| key(item),
            Comparer::natural(),
        )
    }

    pub fn then_by_descending<K, F>(self, mut key: F) -> Self
    where
        K: PartialOrd + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.then_by_descending_with(
            move |item: &T, _: &mut ItemContext| key(item),
            Comparer::natural(),
        )
    }

    /// Subordinate context-aware key. Each level threads its own context
    /// over the items that reached it.
    pub fn then_by_with<S, K, F>(self, key: F, comparer: Comparer<'a, K>) -> Self
    where
        S: 'a,
        K: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> K + 'a,
    {
        self.push(key_level(key, comparer, false))
    }

    pub fn then_by_descending_with<S, K, F>(self, key: F, comparer: Comparer<'a, K>) -> Self
    where
        S: 'a,
        K: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> K + 'a,
    {
        self.push(key_level(key, comparer, true))
    }

    /// Number of keys in the chain.
    pub fn depth(&self) -> usize {
        self.order.depth()
    }

    pub fn into_sequence(self) -> Sequence<'a, T> {
        Sequence {
            inner: Box::new(self.order),
            config: self.config,
        }
    }

    pub fn to_vec(self) -> Result<Vec<T>> {
        self.into_sequence().to_vec()
    }

    fn push(self, level: Box<dyn SortLevel<T> + 'a>) -> Self {
        Self {
            order: self.order.then_by(level),
            config: self.config,
        }
    }
}

pub(crate) fn key_level<'a, T, S, K, F>(
    mut key: F,
    comparer: Comparer<'a, K>,
    descending: bool,
) -> Box<dyn SortLevel<T> + 'a>
where
    T: 'a,
    S: 'a,
    K: 'a,
    F: FnMut(&T, &mut ItemContext<S>) -> K + 'a,
{
    Box::new(KeyLevel::<T, K, _, S>::new(
        move |item: &T, ctx: &mut ItemContext<S>| Ok(key(item, ctx)),
        comparer,
        descending,
    ))
}

impl<'a, T: 'a> From<OrderedSequence<'a, T>> for Sequence<'a, T> {
    fn from(ordered: OrderedSequence<'a, T>) -> Self {
        ordered.into_sequence()
    }
}
