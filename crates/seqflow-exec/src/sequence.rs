//! `Sequence`: the boxed, fluent pipeline builder.
//!
//! Every builder method consumes the sequence and wraps its enumerator in one
//! operator; nothing is pulled until a terminal reducer, a `Cursor` or the
//! `Iterator` bridge asks for items. The pipeline config travels with each
//! derived sequence.
//!
//! Callback shapes come in three flavours: plain (`filter`), context-aware
//! (`filter_with`, the caller picks the scratch type `S`) and fallible
//! (`try_filter`, errors propagate out of the pulling call).

use std::rc::Rc;

use seqflow_core::compare::{Comparer, EqualityComparer};
use seqflow_core::config::PipelineConfig;
use seqflow_core::context::ItemContext;
use seqflow_core::enumerator::{Cursor, Enumerator};
use seqflow_core::error::{Error, Result};
use seqflow_core::source::Source;
use seqflow_operators::distinct::SetMode;
use seqflow_operators::{
    map, slice, Chunk, Concat, DefaultIfEmpty, Distinct, Filter, GroupBy, GroupJoin, Grouping,
    Join, JoinInputs, PositionLevel, SelectMany, SetFilter, SkipWhile, Take, TakeWhile,
    ValueLevel, Zip,
};

use crate::ordered::{key_level, OrderedSequence};

pub(crate) type Upstream<'a, T> = Box<dyn Enumerator<Item = T> + 'a>;

/// Lazy, single-pass, single-consumer view over items of type `T`.
pub struct Sequence<'a, T> {
    pub(crate) inner: Upstream<'a, T>,
    pub(crate) config: Rc<PipelineConfig>,
}

impl<'a, T> Sequence<'a, &'a T> {
    /// Resettable sequence of references into `items`.
    pub fn from_slice(items: &'a [T]) -> Self {
        Self::from_enumerator(Source::from_slice(items))
    }
}

impl<'a> Sequence<'a, i64> {
    /// `count` consecutive integers starting at `start`. Resettable. Ends
    /// early rather than overflow past `i64::MAX`.
    pub fn range(start: i64, count: usize) -> Self {
        Self::from_enumerator(Source::indexed(count, move |i| {
            i64::try_from(i).ok().and_then(|i| start.checked_add(i))
        }))
    }
}

impl<'a, T: 'a> Sequence<'a, T> {
    pub fn from_enumerator<E>(source: E) -> Self
    where
        E: Enumerator<Item = T> + 'a,
    {
        Self {
            inner: Box::new(source),
            config: Rc::new(PipelineConfig::default()),
        }
    }

    /// Resettable sequence over an owned collection.
    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone,
    {
        Self::from_enumerator(Source::from_vec(items))
    }

    /// One-shot sequence over any iterator; `reset` is not supported.
    pub fn from_iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::from_enumerator(Source::from_iterator(iter))
    }

    /// Infinite one-shot sequence of `generator()` results. Bound it with
    /// `take`/`take_while` before draining.
    pub fn generate<F>(generator: F) -> Self
    where
        F: FnMut() -> T + 'a,
    {
        Self::from_iterator(std::iter::repeat_with(generator))
    }

    pub fn repeat(value: T, count: usize) -> Self
    where
        T: Clone,
    {
        Self::from_enumerator(Source::indexed(count, move |_| Some(value.clone())))
    }

    pub fn empty() -> Self {
        Self::from_enumerator(Source::empty())
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = Rc::new(config);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// `move_next`/`current` view over this sequence.
    pub fn cursor(self) -> Cursor<Self> {
        Cursor::new(self)
    }

    fn chain<U, E>(self, build: impl FnOnce(Upstream<'a, T>) -> E) -> Sequence<'a, U>
    where
        U: 'a,
        E: Enumerator<Item = U> + 'a,
    {
        Sequence {
            inner: Box::new(build(self.inner)),
            config: self.config,
        }
    }

    // ---- filtering ----

    pub fn filter<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool + 'a,
    {
        self.try_filter(move |item: &T, _: &mut ItemContext| Ok(predicate(item)))
    }

    pub fn filter_with<S, F>(self, mut predicate: F) -> Self
    where
        S: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> bool + 'a,
    {
        self.try_filter(move |item: &T, ctx: &mut ItemContext<S>| Ok(predicate(item, ctx)))
    }

    pub fn try_filter<S, F>(self, predicate: F) -> Self
    where
        S: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> Result<bool> + 'a,
    {
        self.chain(|up| Filter::new(up, predicate))
    }

    // ---- projection ----

    pub fn select<U, F>(self, mut projector: F) -> Sequence<'a, U>
    where
        U: 'a,
        F: FnMut(T) -> U + 'a,
    {
        self.try_select(move |item: T, _: &mut ItemContext| Ok(projector(item)))
    }

    pub fn select_with<S, U, F>(self, mut projector: F) -> Sequence<'a, U>
    where
        S: 'a,
        U: 'a,
        F: FnMut(T, &mut ItemContext<S>) -> U + 'a,
    {
        self.try_select(move |item: T, ctx: &mut ItemContext<S>| Ok(projector(item, ctx)))
    }

    pub fn try_select<S, U, F>(self, projector: F) -> Sequence<'a, U>
    where
        S: 'a,
        U: 'a,
        F: FnMut(T, &mut ItemContext<S>) -> Result<U> + 'a,
    {
        self.chain(|up| map::select(up, projector))
    }

    pub fn select_many<U, I, F>(self, mut projector: F) -> Sequence<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: FnMut(T) -> I + 'a,
    {
        self.try_select_many(move |item: T, _: &mut ItemContext| Ok(projector(item)))
    }

    pub fn select_many_with<S, U, I, F>(self, mut projector: F) -> Sequence<'a, U>
    where
        S: 'a,
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: FnMut(T, &mut ItemContext<S>) -> I + 'a,
    {
        self.try_select_many(move |item: T, ctx: &mut ItemContext<S>| Ok(projector(item, ctx)))
    }

    pub fn try_select_many<S, U, I, F>(self, projector: F) -> Sequence<'a, U>
    where
        S: 'a,
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: FnMut(T, &mut ItemContext<S>) -> Result<I> + 'a,
    {
        self.chain(|up| SelectMany::new(up, projector))
    }

    /// Pair each item with its zero-based position.
    pub fn with_index(self) -> Sequence<'a, (usize, T)> {
        self.select_with(|item: T, ctx: &mut ItemContext| (ctx.index(), item))
    }

    // ---- prefixes ----

    /// Drop the first `count` items. Negative counts use the configured default.
    pub fn skip(self, count: i64) -> Self {
        let count = self.config.skip_count(count);
        self.chain(move |up| slice::skip(up, count))
    }

    /// Keep at most `count` items. Negative counts use the configured default.
    pub fn take(self, count: i64) -> Self {
        let count = self.config.take_count(count);
        self.chain(move |up| Take::new(up, count))
    }

    pub fn skip_while<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool + 'a,
    {
        self.skip_while_with(move |item: &T, _: &mut ItemContext| predicate(item))
    }

    pub fn skip_while_with<S, F>(self, mut predicate: F) -> Self
    where
        S: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> bool + 'a,
    {
        self.chain(|up| {
            SkipWhile::new(up, move |item: &T, ctx: &mut ItemContext<S>| {
                Ok(predicate(item, ctx))
            })
        })
    }

    pub fn take_while<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool + 'a,
    {
        self.take_while_with(move |item: &T, _: &mut ItemContext| predicate(item))
    }

    pub fn take_while_with<S, F>(self, mut predicate: F) -> Self
    where
        S: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> bool + 'a,
    {
        self.chain(|up| {
            TakeWhile::new(up, move |item: &T, ctx: &mut ItemContext<S>| {
                Ok(predicate(item, ctx))
            })
        })
    }

    // ---- distinct and set operations ----

    pub fn distinct(self) -> Self
    where
        T: PartialEq + Clone,
    {
        self.distinct_with(EqualityComparer::natural())
    }

    pub fn distinct_by<F>(self, eq: F) -> Self
    where
        T: Clone,
        F: Fn(&T, &T) -> bool + 'a,
    {
        self.distinct_with(EqualityComparer::by(eq))
    }

    pub fn distinct_with(self, comparer: EqualityComparer<'a, T>) -> Self
    where
        T: Clone,
    {
        self.chain(|up| Distinct::new(up, comparer))
    }

    pub fn union(self, other: Sequence<'a, T>) -> Self
    where
        T: PartialEq + Clone,
    {
        self.union_with(other, EqualityComparer::natural())
    }

    pub fn union_with(self, other: Sequence<'a, T>, comparer: EqualityComparer<'a, T>) -> Self
    where
        T: Clone,
    {
        self.concat(other).distinct_with(comparer)
    }

    pub fn intersect(self, other: Sequence<'a, T>) -> Self
    where
        T: PartialEq + Clone,
    {
        self.intersect_with(other, EqualityComparer::natural())
    }

    pub fn intersect_with(self, other: Sequence<'a, T>, comparer: EqualityComparer<'a, T>) -> Self
    where
        T: Clone,
    {
        self.chain(|up| SetFilter::new(up, other.inner, SetMode::Intersect, comparer))
    }

    pub fn except(self, other: Sequence<'a, T>) -> Self
    where
        T: PartialEq + Clone,
    {
        self.except_with(other, EqualityComparer::natural())
    }

    pub fn except_with(self, other: Sequence<'a, T>, comparer: EqualityComparer<'a, T>) -> Self
    where
        T: Clone,
    {
        self.chain(|up| SetFilter::new(up, other.inner, SetMode::Except, comparer))
    }

    // ---- combining ----

    pub fn concat(self, other: Sequence<'a, T>) -> Self {
        self.chain(|up| Concat::new(up, other.inner))
    }

    pub fn append(self, item: T) -> Self
    where
        T: Clone,
    {
        self.chain(|up| Concat::new(up, Source::from_vec(vec![item])))
    }

    pub fn prepend(self, item: T) -> Self
    where
        T: Clone,
    {
        self.chain(|up| Concat::new(Source::from_vec(vec![item]), up))
    }

    pub fn zip<U, R, F>(self, other: Sequence<'a, U>, mut combiner: F) -> Sequence<'a, R>
    where
        U: 'a,
        R: 'a,
        F: FnMut(T, U) -> R + 'a,
    {
        self.zip_with(
            other,
            move |left: T, right: U, _: &mut ItemContext, _: &mut ItemContext| {
                combiner(left, right)
            },
        )
    }

    /// Lockstep pairing with one context per side; cancelling either ends it.
    pub fn zip_with<S, U, R, F>(self, other: Sequence<'a, U>, mut combiner: F) -> Sequence<'a, R>
    where
        S: 'a,
        U: 'a,
        R: 'a,
        F: FnMut(T, U, &mut ItemContext<S>, &mut ItemContext<S>) -> R + 'a,
    {
        self.chain(|up| {
            Zip::new(
                up,
                other.inner,
                move |left: T,
                      right: U,
                      left_ctx: &mut ItemContext<S>,
                      right_ctx: &mut ItemContext<S>| {
                    Ok(combiner(left, right, left_ctx, right_ctx))
                },
            )
        })
    }

    /// Buffer items into vectors of `size`. Non-positive sizes use the
    /// configured default.
    pub fn chunk(self, size: i64) -> Sequence<'a, Vec<T>> {
        let size = self.config.chunk_size(size);
        self.chain(move |up| Chunk::new(up, size))
    }

    pub fn default_if_empty(self, value: T) -> Self
    where
        T: Clone,
    {
        self.chain(|up| DefaultIfEmpty::new(up, value))
    }

    // ---- grouping and joins ----

    pub fn group_by<K, F>(self, mut key_selector: F) -> Sequence<'a, Grouping<K, T>>
    where
        K: PartialEq + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.group_by_with(
            move |item: &T, _: &mut ItemContext| key_selector(item),
            EqualityComparer::natural(),
        )
    }

    pub fn group_by_with<S, K, F>(
        self,
        mut key_selector: F,
        comparer: EqualityComparer<'a, K>,
    ) -> Sequence<'a, Grouping<K, T>>
    where
        S: 'a,
        K: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> K + 'a,
    {
        let capacity = self.config.materialize_capacity_hint;
        self.chain(move |up| {
            GroupBy::new(
                up,
                move |item: &T, ctx: &mut ItemContext<S>| Ok(key_selector(item, ctx)),
                comparer,
            )
            .with_capacity(capacity)
        })
    }

    pub fn join<U, K, R, KO, KI, F>(
        self,
        inner: Sequence<'a, U>,
        mut outer_key: KO,
        mut inner_key: KI,
        mut result: F,
    ) -> Sequence<'a, R>
    where
        U: 'a,
        K: PartialEq + 'a,
        R: 'a,
        KO: FnMut(&T) -> K + 'a,
        KI: FnMut(&U) -> K + 'a,
        F: FnMut(&T, &U) -> R + 'a,
    {
        self.join_with(
            inner,
            move |item: &T, _: &mut ItemContext| outer_key(item),
            move |item: &U, _: &mut ItemContext| inner_key(item),
            move |outer: &T, inner: &U, _: &mut ItemContext, _: &mut ItemContext| {
                result(outer, inner)
            },
            EqualityComparer::natural(),
        )
    }

    /// Join with context-aware key selectors. Each key selector threads its
    /// own context over its side; cancelling drops that item and ends the
    /// grouping of that side.
    pub fn join_with<S, U, K, R, KO, KI, F>(
        self,
        inner: Sequence<'a, U>,
        mut outer_key: KO,
        mut inner_key: KI,
        mut result: F,
        comparer: EqualityComparer<'a, K>,
    ) -> Sequence<'a, R>
    where
        S: 'a,
        U: 'a,
        K: 'a,
        R: 'a,
        KO: FnMut(&T, &mut ItemContext<S>) -> K + 'a,
        KI: FnMut(&U, &mut ItemContext<S>) -> K + 'a,
        F: FnMut(&T, &U, &mut ItemContext<S>, &mut ItemContext<S>) -> R + 'a,
    {
        let capacity = self.config.materialize_capacity_hint;
        self.chain(move |up| {
            let inputs = JoinInputs::new(
                up,
                inner.inner,
                move |item: &T, ctx: &mut ItemContext<S>| Ok(outer_key(item, ctx)),
                move |item: &U, ctx: &mut ItemContext<S>| Ok(inner_key(item, ctx)),
                comparer,
            )
            .with_capacity(capacity);
            Join::new(
                inputs,
                move |outer: &T,
                      inner: &U,
                      outer_ctx: &mut ItemContext<S>,
                      inner_ctx: &mut ItemContext<S>| {
                    Ok(result(outer, inner, outer_ctx, inner_ctx))
                },
            )
        })
    }

    pub fn group_join<U, K, R, KO, KI, F>(
        self,
        inner: Sequence<'a, U>,
        mut outer_key: KO,
        mut inner_key: KI,
        mut result: F,
    ) -> Sequence<'a, R>
    where
        U: 'a,
        K: PartialEq + 'a,
        R: 'a,
        KO: FnMut(&T) -> K + 'a,
        KI: FnMut(&U) -> K + 'a,
        F: FnMut(&T, &[U]) -> R + 'a,
    {
        self.group_join_with(
            inner,
            move |item: &T, _: &mut ItemContext| outer_key(item),
            move |item: &U, _: &mut ItemContext| inner_key(item),
            move |outer: &T, group: &[U], _: &mut ItemContext, _: &mut ItemContext| {
                result(outer, group)
            },
            EqualityComparer::natural(),
        )
    }

    pub fn group_join_with<S, U, K, R, KO, KI, F>(
        self,
        inner: Sequence<'a, U>,
        mut outer_key: KO,
        mut inner_key: KI,
        mut result: F,
        comparer: EqualityComparer<'a, K>,
    ) -> Sequence<'a, R>
    where
        S: 'a,
        U: 'a,
        K: 'a,
        R: 'a,
        KO: FnMut(&T, &mut ItemContext<S>) -> K + 'a,
        KI: FnMut(&U, &mut ItemContext<S>) -> K + 'a,
        F: FnMut(&T, &[U], &mut ItemContext<S>, &mut ItemContext<S>) -> R + 'a,
    {
        let capacity = self.config.materialize_capacity_hint;
        self.chain(move |up| {
            let inputs = JoinInputs::new(
                up,
                inner.inner,
                move |item: &T, ctx: &mut ItemContext<S>| Ok(outer_key(item, ctx)),
                move |item: &U, ctx: &mut ItemContext<S>| Ok(inner_key(item, ctx)),
                comparer,
            )
            .with_capacity(capacity);
            GroupJoin::new(
                inputs,
                move |outer: &T,
                      group: &[U],
                      outer_ctx: &mut ItemContext<S>,
                      inner_ctx: &mut ItemContext<S>| {
                    Ok(result(outer, group, outer_ctx, inner_ctx))
                },
            )
        })
    }

    // ---- ordering ----

    pub fn order_by<K, F>(self, mut key: F) -> OrderedSequence<'a, T>
    where
        K: PartialOrd + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.order_by_with(
            move |item: &T, _: &mut ItemContext| key(item),
            Comparer::natural(),
        )
    }

    pub fn order_by_descending<K, F>(self, mut key: F) -> OrderedSequence<'a, T>
    where
        K: PartialOrd + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.order_by_descending_with(
            move |item: &T, _: &mut ItemContext| key(item),
            Comparer::natural(),
        )
    }

    /// Order by a context-aware key. A key selector that cancels drops its
    /// item and every later one from the ordering.
    pub fn order_by_with<S, K, F>(
        self,
        key: F,
        comparer: Comparer<'a, K>,
    ) -> OrderedSequence<'a, T>
    where
        S: 'a,
        K: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> K + 'a,
    {
        OrderedSequence::new(self, key_level(key, comparer, false))
    }

    pub fn order_by_descending_with<S, K, F>(
        self,
        key: F,
        comparer: Comparer<'a, K>,
    ) -> OrderedSequence<'a, T>
    where
        S: 'a,
        K: 'a,
        F: FnMut(&T, &mut ItemContext<S>) -> K + 'a,
    {
        OrderedSequence::new(self, key_level(key, comparer, true))
    }

    /// Natural ordering of the items themselves.
    pub fn order(self) -> OrderedSequence<'a, T>
    where
        T: PartialOrd,
    {
        OrderedSequence::new(self, Box::new(ValueLevel::<T>::new(Comparer::natural(), false)))
    }

    pub fn order_descending(self) -> OrderedSequence<'a, T>
    where
        T: PartialOrd,
    {
        OrderedSequence::new(self, Box::new(ValueLevel::<T>::new(Comparer::natural(), true)))
    }

    /// Source order, back to front: a descending ordering by position.
    pub fn reverse(self) -> Self {
        OrderedSequence::new(self, Box::new(PositionLevel { descending: true })).into_sequence()
    }
}

impl<'a, T> Enumerator for Sequence<'a, T> {
    type Item = T;

    fn pull(&mut self) -> Result<Option<T>> {
        self.inner.pull()
    }

    fn can_reset(&self) -> bool {
        self.inner.can_reset()
    }

    /// Rewinds the whole pipeline, or fails without touching it when any
    /// input is one-shot.
    fn reset(&mut self) -> Result<()> {
        if !self.inner.can_reset() {
            return Err(Error::NotSupported("reset of a pipeline over a one-shot input"));
        }
        self.inner.reset()
    }
}
