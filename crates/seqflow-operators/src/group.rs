//! Grouping engine.
//!
//! Buckets are kept in a plain vector and probed linearly with the key
//! comparer, so groups come out in first-seen-key order and members keep
//! their original relative order.

use seqflow_core::compare::EqualityComparer;
use seqflow_core::context::{ContextThread, ItemContext};
use seqflow_core::enumerator::Enumerator;
use seqflow_core::error::Result;

use crate::trace;

/// A key and its members, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping<K, T> {
    key: K,
    items: Vec<T>,
}

impl<K, T> Grouping<K, T> {
    pub fn new(key: K, first: T) -> Self {
        Self {
            key,
            items: vec![first],
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_parts(self) -> (K, Vec<T>) {
        (self.key, self.items)
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Append `item` to the first bucket whose key matches, or open a new
/// bucket at the end.
pub fn insert_grouped<K, T>(
    groups: &mut Vec<Grouping<K, T>>,
    comparer: &EqualityComparer<'_, K>,
    key: K,
    item: T,
) {
    match groups.iter_mut().find(|g| comparer.equals(&g.key, &key)) {
        Some(group) => group.items.push(item),
        None => groups.push(Grouping::new(key, item)),
    }
}

/// Drain `upstream` into groups, threading `thread` through the key
/// selector. A cancelled selector drops its item and ends the drain.
pub fn collect_groups<E, K, F, S>(
    upstream: &mut E,
    key_selector: &mut F,
    thread: &mut ContextThread<S>,
    comparer: &EqualityComparer<'_, K>,
    capacity: usize,
) -> Result<Vec<Grouping<K, E::Item>>>
where
    E: Enumerator + ?Sized,
    F: FnMut(&E::Item, &mut ItemContext<S>) -> Result<K>,
{
    let mut groups = Vec::with_capacity(capacity);
    while let Some(item) = upstream.pull()? {
        let mut ctx = thread.begin();
        let key = key_selector(&item, &mut ctx);
        let cancelled = thread.finish(ctx);
        let key = key?;
        if cancelled {
            trace::cancelled("group", thread.invocations() - 1);
            break;
        }
        insert_grouped(&mut groups, comparer, key, item);
    }
    trace::materialized("group", thread.invocations());
    Ok(groups)
}

/// Lazy `group_by`. The first pull drains upstream (a group is not complete
/// until the source is); groups are then handed out one per pull.
///
/// If the key selector cancels, the cancelled item is dropped and grouping
/// finishes with what was consumed so far.
pub struct GroupBy<'c, E: Enumerator, K, F, S = ()> {
    upstream: E,
    key_selector: F,
    comparer: EqualityComparer<'c, K>,
    thread: ContextThread<S>,
    capacity: usize,
    groups: Option<std::vec::IntoIter<Grouping<K, E::Item>>>,
}

impl<'c, E, K, F, S> GroupBy<'c, E, K, F, S>
where
    E: Enumerator,
    F: FnMut(&E::Item, &mut ItemContext<S>) -> Result<K>,
{
    pub fn new(upstream: E, key_selector: F, comparer: EqualityComparer<'c, K>) -> Self {
        Self {
            upstream,
            key_selector,
            comparer,
            thread: ContextThread::new(),
            capacity: 0,
            groups: None,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    fn build(&mut self) -> Result<Vec<Grouping<K, E::Item>>> {
        collect_groups(
            &mut self.upstream,
            &mut self.key_selector,
            &mut self.thread,
            &self.comparer,
            self.capacity,
        )
    }
}

impl<'c, E, K, F, S> Enumerator for GroupBy<'c, E, K, F, S>
where
    E: Enumerator,
    F: FnMut(&E::Item, &mut ItemContext<S>) -> Result<K>,
{
    type Item = Grouping<K, E::Item>;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        if self.groups.is_none() {
            let groups = self.build()?;
            self.groups = Some(groups.into_iter());
        }
        Ok(self.groups.as_mut().and_then(|groups| groups.next()))
    }

    fn can_reset(&self) -> bool {
        self.upstream.can_reset()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.thread.reset();
        self.groups = None;
        trace::reset("group_by");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqflow_core::source::Source;

    #[test]
    fn groups_in_first_seen_order() {
        let mut grouped = GroupBy::new(
            Source::from_vec(vec![3, 4, 5, 6, 8]),
            |x: &i32, _: &mut ItemContext| Ok(x % 2 == 0),
            EqualityComparer::natural(),
        );
        let odd = grouped.pull().unwrap().unwrap();
        assert!(!*odd.key());
        assert_eq!(odd.items(), &[3, 5]);
        let even = grouped.pull().unwrap().unwrap();
        assert_eq!(even.into_parts(), (true, vec![4, 6, 8]));
        assert!(grouped.pull().unwrap().is_none());
    }

    #[test]
    fn cancelled_key_drops_item_and_stops() {
        let mut grouped = GroupBy::new(
            Source::from_vec(vec![1, 2, 3, 4, 5]),
            |x: &i32, ctx: &mut ItemContext| {
                if ctx.index() == 2 {
                    ctx.cancel();
                }
                Ok(x % 2)
            },
            EqualityComparer::natural(),
        );
        assert_eq!(grouped.pull().unwrap().unwrap().into_parts(), (1, vec![1]));
        assert_eq!(grouped.pull().unwrap().unwrap().into_parts(), (0, vec![2]));
        assert!(grouped.pull().unwrap().is_none());
    }

    #[test]
    fn custom_key_comparer_merges_buckets() {
        let mut groups = Vec::new();
        let ci = EqualityComparer::by(|a: &String, b: &String| a.eq_ignore_ascii_case(b));
        insert_grouped(&mut groups, &ci, "A".to_string(), 1);
        insert_grouped(&mut groups, &ci, "b".to_string(), 2);
        insert_grouped(&mut groups, &ci, "a".to_string(), 3);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key(), "A");
        assert_eq!(groups[0].items(), &[1, 3]);
    }
}
