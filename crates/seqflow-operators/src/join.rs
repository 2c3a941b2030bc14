//! Join and group-join on top of the grouping engine.
//!
//! Both sides are grouped by key on the first pull. Every outer group is then
//! matched against every inner group with the key comparer, in inner-group
//! order. For each matched pair the outer members are walked in source order;
//! `Join` nests each inner member under them, `GroupJoin` hands over the
//! whole inner group. Results are produced lazily from that walk.

use seqflow_core::compare::EqualityComparer;
use seqflow_core::context::{ContextThread, ItemContext};
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::{Error, Result};

use crate::group::{collect_groups, Grouping};
use crate::trace;

/// Both input sequences with their key selectors and the key comparer.
///
/// Each key selector gets its own context thread. A cancelled key drops its
/// item and ends grouping of that side; the join proceeds with the groups
/// collected so far.
pub struct JoinInputs<'c, EO: Enumerator, EI: Enumerator, K, KO, KI, S = ()> {
    outer: EO,
    inner: EI,
    outer_key: KO,
    inner_key: KI,
    outer_keys: ContextThread<S>,
    inner_keys: ContextThread<S>,
    comparer: EqualityComparer<'c, K>,
    capacity: usize,
}

impl<'c, EO, EI, K, KO, KI, S> JoinInputs<'c, EO, EI, K, KO, KI, S>
where
    EO: Enumerator,
    EI: Enumerator,
    KO: FnMut(&EO::Item, &mut ItemContext<S>) -> Result<K>,
    KI: FnMut(&EI::Item, &mut ItemContext<S>) -> Result<K>,
{
    pub fn new(
        outer: EO,
        inner: EI,
        outer_key: KO,
        inner_key: KI,
        comparer: EqualityComparer<'c, K>,
    ) -> Self {
        Self {
            outer,
            inner,
            outer_key,
            inner_key,
            outer_keys: ContextThread::new(),
            inner_keys: ContextThread::new(),
            comparer,
            capacity: 0,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    fn materialize(&mut self) -> Result<Matches<K, EO::Item, EI::Item>> {
        let outer = collect_groups(
            &mut self.outer,
            &mut self.outer_key,
            &mut self.outer_keys,
            &self.comparer,
            self.capacity,
        )?;
        let inner = collect_groups(
            &mut self.inner,
            &mut self.inner_key,
            &mut self.inner_keys,
            &self.comparer,
            self.capacity,
        )?;
        let mut pairs = Vec::new();
        for (o, outer_group) in outer.iter().enumerate() {
            for (i, inner_group) in inner.iter().enumerate() {
                if self.comparer.equals(outer_group.key(), inner_group.key()) {
                    pairs.push((o, i));
                }
            }
        }
        trace::materialized("join_pairs", pairs.len());
        Ok(Matches {
            outer,
            inner,
            pairs,
            pair: 0,
            outer_pos: 0,
            inner_pos: 0,
        })
    }

    fn can_reset(&self) -> bool {
        self.outer.can_reset() && self.inner.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        if !self.can_reset() {
            return Err(Error::NotSupported("reset of a join over a one-shot input"));
        }
        self.outer.reset()?;
        self.inner.reset()?;
        self.outer_keys.reset();
        self.inner_keys.reset();
        Ok(())
    }
}

/// Matched group pairs plus the walk position.
struct Matches<K, O, I> {
    outer: Vec<Grouping<K, O>>,
    inner: Vec<Grouping<K, I>>,
    pairs: Vec<(usize, usize)>,
    pair: usize,
    outer_pos: usize,
    inner_pos: usize,
}

/// Inner join: one result per (outer member, inner member) of every
/// key-matched group pair.
pub struct Join<'c, EO: Enumerator, EI: Enumerator, K, KO, KI, F, S = ()> {
    inputs: JoinInputs<'c, EO, EI, K, KO, KI, S>,
    result: F,
    outer_thread: ContextThread<S>,
    inner_thread: ContextThread<S>,
    state: Option<Matches<K, EO::Item, EI::Item>>,
    done: bool,
}

impl<'c, EO, EI, K, KO, KI, F, S, R> Join<'c, EO, EI, K, KO, KI, F, S>
where
    EO: Enumerator,
    EI: Enumerator,
    KO: FnMut(&EO::Item, &mut ItemContext<S>) -> Result<K>,
    KI: FnMut(&EI::Item, &mut ItemContext<S>) -> Result<K>,
    F: FnMut(&EO::Item, &EI::Item, &mut ItemContext<S>, &mut ItemContext<S>) -> Result<R>,
{
    pub fn new(inputs: JoinInputs<'c, EO, EI, K, KO, KI, S>, result: F) -> Self {
        Self {
            inputs,
            result,
            outer_thread: ContextThread::new(),
            inner_thread: ContextThread::new(),
            state: None,
            done: false,
        }
    }
}

impl<'c, EO, EI, K, KO, KI, F, S, R> Enumerator for Join<'c, EO, EI, K, KO, KI, F, S>
where
    EO: Enumerator,
    EI: Enumerator,
    KO: FnMut(&EO::Item, &mut ItemContext<S>) -> Result<K>,
    KI: FnMut(&EI::Item, &mut ItemContext<S>) -> Result<K>,
    F: FnMut(&EO::Item, &EI::Item, &mut ItemContext<S>, &mut ItemContext<S>) -> Result<R>,
{
    type Item = R;

    fn pull(&mut self) -> Result<Option<R>> {
        if self.done {
            return Ok(None);
        }
        if self.state.is_none() {
            self.state = Some(self.inputs.materialize()?);
        }
        let Self {
            result,
            outer_thread,
            inner_thread,
            state,
            done,
            ..
        } = self;
        let Some(state) = state.as_mut() else {
            return Ok(None);
        };
        loop {
            let Some(&(o, i)) = state.pairs.get(state.pair) else {
                *done = true;
                return Ok(None);
            };
            let outer_group = &state.outer[o];
            let inner_group = &state.inner[i];
            if state.outer_pos >= outer_group.len() {
                state.pair += 1;
                state.outer_pos = 0;
                state.inner_pos = 0;
                continue;
            }
            if state.inner_pos >= inner_group.len() {
                state.outer_pos += 1;
                state.inner_pos = 0;
                continue;
            }
            let outer_item = &outer_group.items()[state.outer_pos];
            let inner_item = &inner_group.items()[state.inner_pos];
            state.inner_pos += 1;

            let mut outer_ctx = outer_thread.begin();
            let mut inner_ctx = inner_thread.begin();
            let joined = result(outer_item, inner_item, &mut outer_ctx, &mut inner_ctx);
            let outer_cancelled = outer_thread.finish(outer_ctx);
            let inner_cancelled = inner_thread.finish(inner_ctx);
            let joined = joined?;
            if outer_cancelled || inner_cancelled {
                trace::cancelled("join", outer_thread.invocations() - 1);
                *done = true;
                return Ok(None);
            }
            return Ok(Some(joined));
        }
    }

    fn can_reset(&self) -> bool {
        self.inputs.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.inputs.reset()?;
        self.outer_thread.reset();
        self.inner_thread.reset();
        self.state = None;
        self.done = false;
        trace::reset("join");
        Ok(())
    }
}

/// Group join: one result per outer member of every key-matched group pair,
/// paired with the whole inner group. Outer members without a matching
/// inner group produce nothing.
pub struct GroupJoin<'c, EO: Enumerator, EI: Enumerator, K, KO, KI, F, S = ()> {
    inputs: JoinInputs<'c, EO, EI, K, KO, KI, S>,
    result: F,
    outer_thread: ContextThread<S>,
    inner_thread: ContextThread<S>,
    state: Option<Matches<K, EO::Item, EI::Item>>,
    done: bool,
}

impl<'c, EO, EI, K, KO, KI, F, S, R> GroupJoin<'c, EO, EI, K, KO, KI, F, S>
where
    EO: Enumerator,
    EI: Enumerator,
    KO: FnMut(&EO::Item, &mut ItemContext<S>) -> Result<K>,
    KI: FnMut(&EI::Item, &mut ItemContext<S>) -> Result<K>,
    F: FnMut(&EO::Item, &[EI::Item], &mut ItemContext<S>, &mut ItemContext<S>) -> Result<R>,
{
    pub fn new(inputs: JoinInputs<'c, EO, EI, K, KO, KI, S>, result: F) -> Self {
        Self {
            inputs,
            result,
            outer_thread: ContextThread::new(),
            inner_thread: ContextThread::new(),
            state: None,
            done: false,
        }
    }
}

impl<'c, EO, EI, K, KO, KI, F, S, R> Enumerator for GroupJoin<'c, EO, EI, K, KO, KI, F, S>
where
    EO: Enumerator,
    EI: Enumerator,
    KO: FnMut(&EO::Item, &mut ItemContext<S>) -> Result<K>,
    KI: FnMut(&EI::Item, &mut ItemContext<S>) -> Result<K>,
    F: FnMut(&EO::Item, &[EI::Item], &mut ItemContext<S>, &mut ItemContext<S>) -> Result<R>,
{
    type Item = R;

    fn pull(&mut self) -> Result<Option<R>> {
        if self.done {
            return Ok(None);
        }
        if self.state.is_none() {
            self.state = Some(self.inputs.materialize()?);
        }
        let Self {
            result,
            outer_thread,
            inner_thread,
            state,
            done,
            ..
        } = self;
        let Some(state) = state.as_mut() else {
            return Ok(None);
        };
        loop {
            let Some(&(o, i)) = state.pairs.get(state.pair) else {
                *done = true;
                return Ok(None);
            };
            let outer_group = &state.outer[o];
            if state.outer_pos >= outer_group.len() {
                state.pair += 1;
                state.outer_pos = 0;
                continue;
            }
            let outer_item = &outer_group.items()[state.outer_pos];
            let inner_items = state.inner[i].items();
            state.outer_pos += 1;

            let mut outer_ctx = outer_thread.begin();
            let mut inner_ctx = inner_thread.begin();
            let joined = result(outer_item, inner_items, &mut outer_ctx, &mut inner_ctx);
            let outer_cancelled = outer_thread.finish(outer_ctx);
            let inner_cancelled = inner_thread.finish(inner_ctx);
            let joined = joined?;
            if outer_cancelled || inner_cancelled {
                trace::cancelled("group_join", outer_thread.invocations() - 1);
                *done = true;
                return Ok(None);
            }
            return Ok(Some(joined));
        }
    }

    fn can_reset(&self) -> bool {
        self.inputs.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.inputs.reset()?;
        self.outer_thread.reset();
        self.inner_thread.reset();
        self.state = None;
        self.done = false;
        trace::reset("group_join");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqflow_core::source::Source;

    #[test]
    fn join_replays_after_reset() {
        let inputs = JoinInputs::new(
            Source::from_vec(vec![1, 2]),
            Source::from_vec(vec![(2, 'b'), (1, 'a')]),
            |o: &i32, _: &mut ItemContext| Ok(*o),
            |i: &(i32, char), _: &mut ItemContext| Ok(i.0),
            EqualityComparer::natural(),
        );
        let mut join = Join::new(
            inputs,
            |o: &i32, i: &(i32, char), _: &mut ItemContext, _: &mut ItemContext| Ok((*o, i.1)),
        );
        assert!(join.can_reset());
        assert_eq!(join.pull().unwrap(), Some((1, 'a')));
        assert_eq!(join.pull().unwrap(), Some((2, 'b')));
        assert_eq!(join.pull().unwrap(), None);
        join.reset().unwrap();
        assert_eq!(join.pull().unwrap(), Some((1, 'a')));
    }

    #[test]
    fn group_join_sees_whole_inner_group() {
        let inputs = JoinInputs::new(
            Source::from_vec(vec!["x"]),
            Source::from_vec(vec![1, 2, 3]),
            |_: &&str, _: &mut ItemContext| Ok(()),
            |_: &i32, _: &mut ItemContext| Ok(()),
            EqualityComparer::natural(),
        );
        let mut gj = GroupJoin::new(
            inputs,
            |o: &&str, group: &[i32], _: &mut ItemContext, _: &mut ItemContext| {
                Ok(format!("{o}:{}", group.len()))
            },
        );
        assert_eq!(gj.pull().unwrap().as_deref(), Some("x:3"));
        assert_eq!(gj.pull().unwrap(), None);
    }

    #[test]
    fn inner_key_cancel_keeps_groups_collected_so_far() {
        let inputs = JoinInputs::new(
            Source::from_vec(vec![1, 2, 3]),
            Source::from_vec(vec![3, 1, 2]),
            |o: &i32, _: &mut ItemContext| Ok(*o),
            |i: &i32, ctx: &mut ItemContext| {
                if ctx.index() == 2 {
                    ctx.cancel();
                }
                Ok(*i)
            },
            EqualityComparer::natural(),
        );
        let mut join = Join::new(
            inputs,
            |o: &i32, i: &i32, _: &mut ItemContext, _: &mut ItemContext| Ok(o * 10 + i),
        );
        assert_eq!(join.pull().unwrap(), Some(11));
        assert_eq!(join.pull().unwrap(), Some(33));
        assert_eq!(join.pull().unwrap(), None);
    }

    #[test]
    fn reset_with_one_shot_side_leaves_outer_in_place() {
        let inputs = JoinInputs::new(
            Source::from_vec(vec![1, 2]),
            Source::from_iterator(vec![1, 2]),
            |o: &i32, _: &mut ItemContext| Ok(*o),
            |i: &i32, _: &mut ItemContext| Ok(*i),
            EqualityComparer::natural(),
        );
        let mut join = Join::new(
            inputs,
            |o: &i32, i: &i32, _: &mut ItemContext, _: &mut ItemContext| Ok((*o, *i)),
        );
        assert!(!join.can_reset());
        assert_eq!(join.pull().unwrap(), Some((1, 1)));
        assert!(matches!(join.reset(), Err(Error::NotSupported(_))));
        assert_eq!(join.pull().unwrap(), Some((2, 2)));
        assert_eq!(join.pull().unwrap(), None);
    }
}
