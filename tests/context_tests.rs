//! Item-context threading, cancellation and callback failures.

use std::cell::Cell;

use seqflow::prelude::*;

fn counted(n: i64, pulls: &Cell<usize>) -> Sequence<'_, i64> {
    Sequence::from_iterator((0..n).inspect(move |_| pulls.set(pulls.get() + 1)))
}

#[test]
fn cancel_on_third_item_stops_consuming_the_source() {
    let pulls = Cell::new(0);
    let out = counted(10, &pulls)
        .filter_with(|n, ctx: &mut ItemContext| {
            if ctx.index() == 2 {
                ctx.cancel();
            }
            n % 2 == 0
        })
        .to_vec()
        .unwrap();
    // Item 2 matches the predicate but was cancelled, so it is not emitted.
    assert_eq!(out, vec![0]);
    assert_eq!(pulls.get(), 3);
}

#[test]
fn cancelled_projection_ends_the_sequence() {
    let out = Sequence::range(0, 10)
        .select_with(|n, ctx: &mut ItemContext| {
            if n == 4 {
                ctx.cancel();
            }
            n * 10
        })
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![0, 10, 20, 30]);
}

#[test]
fn cancellation_is_local_to_the_operator() {
    // The inner filter stops; the outer select keeps running over what it got.
    let out = Sequence::range(0, 6)
        .filter_with(|_, ctx: &mut ItemContext| {
            if ctx.index() == 3 {
                ctx.cancel();
            }
            true
        })
        .select(|n| n + 100)
        .concat(Sequence::from_vec(vec![999]))
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![100, 101, 102, 999]);
}

#[test]
fn zip_with_right_context_cancel_ends_the_pairing() {
    let pulls = Cell::new(0);
    let out = Sequence::from_vec(vec!['a', 'b', 'c'])
        .zip_with(
            counted(10, &pulls),
            |c, n, _: &mut ItemContext, right: &mut ItemContext| {
                if right.index() == 1 {
                    right.cancel();
                }
                format!("{c}{n}")
            },
        )
        .to_vec()
        .unwrap();
    assert_eq!(out, vec!["a0"]);
    assert_eq!(pulls.get(), 2);
}

#[test]
fn previous_value_carries_running_totals() {
    let totals = Sequence::from_vec(vec![3, 1, 4, 1, 5])
        .select_with(|n, ctx: &mut ItemContext<i32>| {
            let total = ctx.previous_value().copied().unwrap_or(0) + n;
            ctx.set_next_value(total);
            total
        })
        .to_vec()
        .unwrap();
    assert_eq!(totals, vec![3, 4, 8, 9, 14]);
}

#[test]
fn scratch_value_persists_across_invocations() {
    // Keep strictly increasing items, tracking the running max in `value`.
    let out = Sequence::from_vec(vec![2, 1, 5, 3, 7, 7, 8])
        .filter_with(|n, ctx: &mut ItemContext<i32>| {
            let keep = ctx.value().map_or(true, |max| n > max);
            if keep {
                ctx.set_value(*n);
            }
            keep
        })
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![2, 5, 7, 8]);
}

#[test]
fn context_threads_only_over_invocations_of_the_same_operator() {
    let out = Sequence::range(0, 6)
        .filter(|n| n % 2 == 1)
        .select_with(|n, ctx: &mut ItemContext| (ctx.index(), n))
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![(0, 1), (1, 3), (2, 5)]);
}

#[test]
fn take_while_with_sees_previous_item() {
    // Stop at the first descent.
    let out = Sequence::from_vec(vec![1, 2, 2, 5, 4, 6])
        .take_while_with(|n, ctx: &mut ItemContext<i32>| {
            let rising = ctx.previous_value().map_or(true, |prev| n >= prev);
            ctx.set_next_value(*n);
            rising
        })
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![1, 2, 2, 5]);
}

#[test]
fn failing_callback_aborts_the_pull() {
    let mut seq = Sequence::range(0, 5).try_select(|n, _: &mut ItemContext| {
        if n == 2 {
            Err(Error::callback("two is not allowed"))
        } else {
            Ok(n)
        }
    });
    assert_eq!(seq.pull().unwrap(), Some(0));
    assert_eq!(seq.pull().unwrap(), Some(1));
    let err = seq.pull().unwrap_err();
    assert!(matches!(err, Error::Callback(ref msg) if msg == "two is not allowed"));
}

#[test]
fn iterator_bridge_fuses_after_an_error() {
    let items: Vec<Result<i64>> = Sequence::range(0, 5)
        .try_filter(|n, _: &mut ItemContext| {
            if *n == 1 {
                Err(Error::callback("boom"))
            } else {
                Ok(true)
            }
        })
        .into_iter()
        .collect();
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0], Ok(0)));
    assert!(items[1].is_err());
}

#[test]
fn for_each_with_stops_on_cancel() {
    let mut seen = Vec::new();
    let visited = Sequence::range(0, 10)
        .for_each_with(|n, ctx: &mut ItemContext| {
            seen.push(n);
            if n == 3 {
                ctx.cancel();
            }
        })
        .unwrap();
    assert_eq!(visited, 4);
    assert_eq!(seen, vec![0, 1, 2, 3]);
}
