//! Multi-key ordering.

use std::cmp::Ordering;

use seqflow::prelude::*;

fn words() -> Sequence<'static, &'static str> {
    Sequence::from_vec(vec!["bb", "a", "cc", "b"])
}

#[test]
fn order_by_length_then_by_text() {
    let out = words()
        .order_by(|w| w.len())
        .then_by(|w| *w)
        .to_vec()
        .unwrap();
    assert_eq!(out, vec!["a", "b", "bb", "cc"]);
}

#[test]
fn then_by_refines_instead_of_overriding() {
    let rows = vec![(2, 'b', 1), (1, 'a', 2), (2, 'a', 3), (1, 'a', 1), (2, 'b', 0)];
    let ordered = Sequence::from_vec(rows)
        .order_by(|r| r.0)
        .then_by(|r| r.1)
        .then_by_descending(|r| r.2);
    assert_eq!(ordered.depth(), 3);
    assert_eq!(
        ordered.to_vec().unwrap(),
        vec![(1, 'a', 2), (1, 'a', 1), (2, 'a', 3), (2, 'b', 1), (2, 'b', 0)]
    );
}

#[test]
fn descending_primary_key() {
    let out = words()
        .order_by_descending(|w| w.len())
        .then_by_descending(|w| *w)
        .to_vec()
        .unwrap();
    assert_eq!(out, vec!["cc", "bb", "b", "a"]);
}

#[test]
fn custom_comparer() {
    let by_last_char = Comparer::by(|a: &&str, b: &&str| a.chars().last().cmp(&b.chars().last()));
    let out = Sequence::from_vec(vec!["ax", "bz", "cy"])
        .order_by_with(|w, _: &mut ItemContext| *w, by_last_char)
        .to_vec()
        .unwrap();
    assert_eq!(out, vec!["ax", "cy", "bz"]);
}

#[test]
fn natural_value_ordering() {
    let data = vec![3.5, -1.0, 2.25, 0.0];
    assert_eq!(
        Sequence::from_vec(data.clone()).order().to_vec().unwrap(),
        vec![-1.0, 0.0, 2.25, 3.5]
    );
    assert_eq!(
        Sequence::from_vec(data).order_descending().to_vec().unwrap(),
        vec![3.5, 2.25, 0.0, -1.0]
    );
}

#[test]
fn ties_keep_source_order() {
    let people = vec![("ann", 30), ("bob", 25), ("cy", 30), ("di", 25)];
    let out = Sequence::from_vec(people)
        .order_by(|p| p.1)
        .into_sequence()
        .select(|p| p.0)
        .to_vec()
        .unwrap();
    assert_eq!(out, vec!["bob", "di", "ann", "cy"]);
}

#[test]
fn reverse_flips_source_order() {
    let out = Sequence::from_vec(vec![3, 1, 2]).reverse().to_vec().unwrap();
    assert_eq!(out, vec![2, 1, 3]);
}

#[test]
fn ordering_composes_with_streaming_operators() {
    let out = Sequence::range(0, 20)
        .filter(|n| n % 3 == 0)
        .order_by_descending(|n| *n)
        .into_sequence()
        .take(3)
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![18, 15, 12]);
}

#[test]
fn ordered_sequence_is_resettable_over_indexed_sources() {
    let mut seq: Sequence<'_, i32> = Sequence::from_vec(vec![2, 3, 1]).order().into();
    assert!(seq.can_reset());
    assert_eq!(seq.pull().unwrap(), Some(1));
    seq.reset().unwrap();
    assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
}

#[test]
fn comparer_reversal_matches_descending() {
    let asc = Comparer::<i32>::natural();
    assert_eq!(asc.compare(&1, &2), Ordering::Less);
    let out = Sequence::from_vec(vec![1, 3, 2])
        .order_by_with(|n, _: &mut ItemContext| *n, Comparer::natural().reversed())
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![3, 2, 1]);
}

#[test]
fn key_selector_cancel_orders_the_items_keyed_before_it() {
    let out = Sequence::from_vec(vec![40, 10, 30, 20, 50])
        .order_by_with(
            |n, ctx: &mut ItemContext| {
                if ctx.index() == 3 {
                    ctx.cancel();
                }
                *n
            },
            Comparer::natural(),
        )
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![10, 30, 40]);
}

#[test]
fn then_by_key_sees_its_own_context() {
    // Secondary key is the arrival position, descending: length ties come
    // out latest first.
    let seen = std::cell::Cell::new(0);
    let out = words()
        .order_by(|w| w.len())
        .then_by_descending_with(
            |_, ctx: &mut ItemContext| {
                seen.set(seen.get() + 1);
                ctx.index()
            },
            Comparer::natural(),
        )
        .to_vec()
        .unwrap();
    assert_eq!(out, vec!["b", "a", "cc", "bb"]);
    assert_eq!(seen.get(), 4);
}
