//! Streaming operators: laziness, single-pass pulls, prefixes, set operations,
//! combination and buffering.

use std::cell::Cell;

use seqflow::prelude::*;

/// One-shot source over `0..n` that counts every item handed out.
fn counted(n: i64, pulls: &Cell<usize>) -> Sequence<'_, i64> {
    Sequence::from_iterator((0..n).inspect(move |_| pulls.set(pulls.get() + 1)))
}

#[test]
fn building_a_pipeline_pulls_nothing() {
    let pulls = Cell::new(0);
    let seq = counted(10, &pulls)
        .filter(|n| n % 2 == 0)
        .select(|n| n * 3)
        .skip(1)
        .take(2);
    assert_eq!(pulls.get(), 0);

    let mut cursor = seq.cursor();
    assert!(cursor.move_next().unwrap());
    assert_eq!(*cursor.current().unwrap(), 6);
    // 0 was skipped, 1 filtered out, 2 produced.
    assert_eq!(pulls.get(), 3);
}

#[test]
fn draining_pulls_each_source_item_exactly_once() {
    let pulls = Cell::new(0);
    let out = counted(25, &pulls)
        .select(|n| n + 1)
        .filter(|n| n % 5 != 0)
        .to_vec()
        .unwrap();
    assert_eq!(out.len(), 20);
    assert_eq!(pulls.get(), 25);
}

#[test]
fn exhaustion_is_idempotent() {
    let mut cursor = Sequence::from_vec(vec![1]).select(|n| n * 2).cursor();
    assert!(cursor.move_next().unwrap());
    assert_eq!(*cursor.current().unwrap(), 2);
    assert!(!cursor.move_next().unwrap());
    assert!(!cursor.move_next().unwrap());
    assert!(cursor.current().is_err());
}

#[test]
fn sources() {
    let words = vec!["x".to_string(), "y".to_string()];
    let refs = Sequence::from_slice(&words).to_vec().unwrap();
    assert_eq!(refs, vec![&words[0], &words[1]]);

    assert_eq!(Sequence::range(-2, 4).to_vec().unwrap(), vec![-2, -1, 0, 1]);
    assert_eq!(
        Sequence::range(i64::MAX - 1, 5).to_vec().unwrap(),
        vec![i64::MAX - 1, i64::MAX]
    );
    assert_eq!(Sequence::repeat('z', 3).to_vec().unwrap(), vec!['z', 'z', 'z']);
    assert!(Sequence::<u8>::empty().to_vec().unwrap().is_empty());

    let mut next = 1;
    let powers = Sequence::generate(move || {
        let v = next;
        next *= 2;
        v
    })
    .take(5)
    .to_vec()
    .unwrap();
    assert_eq!(powers, vec![1, 2, 4, 8, 16]);
}

#[test]
fn select_many_flattens_and_skips_empty_expansions() {
    let out = Sequence::from_vec(vec![0usize, 2, 1, 3])
        .select_many(|n| vec![n; n])
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![2, 2, 1, 3, 3, 3]);
}

#[test]
fn with_index_pairs_positions() {
    let out = Sequence::from_vec(vec!["a", "b", "c"])
        .with_index()
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![(0, "a"), (1, "b"), (2, "c")]);
}

#[test]
fn skip_and_take_counts() {
    let seq = || Sequence::range(0, 10);
    assert_eq!(seq().skip(7).to_vec().unwrap(), vec![7, 8, 9]);
    assert_eq!(seq().take(3).to_vec().unwrap(), vec![0, 1, 2]);
    assert_eq!(seq().skip(20).count().unwrap(), 0);
    assert_eq!(seq().take(0).count().unwrap(), 0);
    assert_eq!(seq().skip(3).take(2).to_vec().unwrap(), vec![3, 4]);
}

#[test]
fn negative_counts_use_configured_defaults() {
    assert_eq!(Sequence::range(0, 5).skip(-4).to_vec().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(Sequence::range(0, 5).take(-4).to_vec().unwrap(), vec![0]);

    let cfg = PipelineConfig {
        default_skip_count: 2,
        default_take_count: 3,
        ..PipelineConfig::default()
    };
    let out = Sequence::range(0, 10)
        .with_config(cfg)
        .skip(-1)
        .take(-1)
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![2, 3, 4]);
}

#[test]
fn take_does_not_pull_past_its_limit() {
    let pulls = Cell::new(0);
    let out = counted(100, &pulls).take(4).to_vec().unwrap();
    assert_eq!(out, vec![0, 1, 2, 3]);
    assert_eq!(pulls.get(), 4);
}

#[test]
fn skip_while_and_take_while() {
    let data = vec![1, 3, 5, 6, 7, 9];
    assert_eq!(
        Sequence::from_vec(data.clone())
            .skip_while(|n| n % 2 == 1)
            .to_vec()
            .unwrap(),
        vec![6, 7, 9]
    );
    assert_eq!(
        Sequence::from_vec(data).take_while(|n| *n < 6).to_vec().unwrap(),
        vec![1, 3, 5]
    );
}

#[test]
fn distinct_keeps_first_seen_order() {
    let out = Sequence::from_vec(vec![1, 2, 1, 3, 5, 4, 5])
        .distinct()
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![1, 2, 3, 5, 4]);
}

#[test]
fn distinct_with_parity_comparer() {
    let out = Sequence::from_vec(vec![1, 2, 3, 4])
        .distinct_by(|a, b| a % 2 == b % 2)
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![1, 2]);
}

#[test]
fn distinct_with_case_insensitive_key() {
    let words = vec!["Apple", "apple", "Pear", "APPLE", "pear"];
    let out = Sequence::from_vec(words)
        .distinct_with(EqualityComparer::by_key(|w: &&str| w.to_lowercase()))
        .to_vec()
        .unwrap();
    assert_eq!(out, vec!["Apple", "Pear"]);
}

#[test]
fn set_operations() {
    let left = || Sequence::from_vec(vec![1, 2, 2, 3, 4]);
    let right = || Sequence::from_vec(vec![4, 3, 5, 3]);

    assert_eq!(left().union(right()).to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(left().intersect(right()).to_vec().unwrap(), vec![3, 4]);
    assert_eq!(left().except(right()).to_vec().unwrap(), vec![1, 2]);
}

#[test]
fn concat_append_prepend() {
    let out = Sequence::from_vec(vec![2, 3])
        .concat(Sequence::from_vec(vec![4]))
        .append(5)
        .prepend(1)
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![1, 2, 3, 4, 5]);
}

#[test]
fn zip_stops_at_the_shorter_side() {
    let out = Sequence::range(0, 5)
        .zip(Sequence::from_vec(vec!["a", "b", "c"]), |n, s| format!("{s}{n}"))
        .to_vec()
        .unwrap();
    assert_eq!(out, vec!["a0", "b1", "c2"]);
}

#[test]
fn zip_contexts_are_independent_per_side() {
    let out = Sequence::range(10, 3)
        .zip_with(
            Sequence::range(20, 3),
            |l, r, lctx: &mut ItemContext<i64>, rctx: &mut ItemContext<i64>| {
                let lsum = lctx.previous_value().copied().unwrap_or(0) + l;
                lctx.set_next_value(lsum);
                rctx.set_next_value(r);
                (lsum, rctx.index())
            },
        )
        .to_vec()
        .unwrap();
    assert_eq!(out, vec![(10, 0), (21, 1), (33, 2)]);
}

#[test]
fn chunk_buffers_fixed_sizes() {
    let out = Sequence::range(1, 7).chunk(3).to_vec().unwrap();
    assert_eq!(out, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);

    // Non-positive sizes fall back to the configured chunk size.
    let out = Sequence::range(1, 3).chunk(0).to_vec().unwrap();
    assert_eq!(out, vec![vec![1], vec![2], vec![3]]);
}

#[test]
fn default_if_empty_only_fires_on_empty_input() {
    assert_eq!(
        Sequence::<i32>::empty().default_if_empty(7).to_vec().unwrap(),
        vec![7]
    );
    assert_eq!(
        Sequence::from_vec(vec![1, 2]).default_if_empty(7).to_vec().unwrap(),
        vec![1, 2]
    );
}

#[test]
fn iterator_bridge() {
    let mut total = 0;
    for item in Sequence::range(1, 4) {
        total += item.unwrap();
    }
    assert_eq!(total, 6);

    let collected: Result<Vec<i64>> = Sequence::range(0, 3).into_iter().collect();
    assert_eq!(collected.unwrap(), vec![0, 1, 2]);
}
