use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use splay_collections::{Charmap, Error, RangeChange, Rank, SortedSet};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    RankOf(i64),
    SplayIndex(usize),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        2 => value_strategy().prop_map(SetOp::RankOf),
        2 => (0usize..600).prop_map(SetOp::SplayIndex),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both SortedSet and BTreeSet
    /// and asserts identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut splay_set: SortedSet<i64> = SortedSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(splay_set.insert(*v), bt_set.insert(*v), "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(splay_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(splay_set.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::RankOf(v) => {
                    let expected = bt_set.contains(v).then(|| bt_set.range(..*v).count());
                    prop_assert_eq!(splay_set.rank_of(v), expected, "rank_of({})", v);
                }
                SetOp::SplayIndex(k) => {
                    let expected = bt_set.iter().nth(*k);
                    prop_assert_eq!(splay_set.splay_index(*k), expected, "splay_index({})", k);
                    if expected.is_some() {
                        prop_assert_eq!(splay_set.root(), expected);
                    }
                }
                SetOp::First => prop_assert_eq!(splay_set.first(), bt_set.first()),
                SetOp::Last => prop_assert_eq!(splay_set.last(), bt_set.last()),
                SetOp::PopFirst => prop_assert_eq!(splay_set.pop_first(), bt_set.pop_first()),
                SetOp::PopLast => prop_assert_eq!(splay_set.pop_last(), bt_set.pop_last()),
            }
            prop_assert_eq!(splay_set.len(), bt_set.len());
        }

        prop_assert!(splay_set.iter().eq(bt_set.iter()));
        prop_assert!(splay_set.iter().rev().eq(bt_set.iter().rev()));
    }

    /// Every permutation of 0..16 yields `rank_of(n) == n`.
    #[test]
    fn rank_of_permutations(values in Just((0..16).collect::<Vec<u32>>()).prop_shuffle()) {
        let mut set: SortedSet<u32> = values.into_iter().collect();
        for n in 0..16 {
            prop_assert_eq!(set.rank_of(&n), Some(n as usize));
        }
    }

    /// A listener that applies every change to a plain vector keeps it equal
    /// to the set's contents.
    #[test]
    fn mirror_tracks_contents(ops in proptest::collection::vec(set_op_strategy(), 300)) {
        let mirror = Rc::new(RefCell::new(Vec::new()));
        let mut set: SortedSet<i64> = SortedSet::new();
        let sink = Rc::clone(&mirror);
        set.observe_range_change(move |change, contents| {
            let mut mirror = sink.borrow_mut();
            let end = change.index + change.removed.len();
            assert_eq!(mirror[change.index..end], change.removed[..]);
            mirror.splice(change.index..end, change.added.iter().copied());
            assert_eq!(*mirror, contents.to_vec());
        });

        for op in ops {
            match op {
                SetOp::Insert(v) => { set.insert(v); }
                SetOp::Remove(v) => { set.remove(&v); }
                SetOp::PopFirst => { set.pop_first(); }
                SetOp::PopLast => { set.pop_last(); }
                SetOp::Contains(v) | SetOp::RankOf(v) => { set.contains(&v); }
                SetOp::SplayIndex(k) => { set.splay_index(k); }
                SetOp::First | SetOp::Last => {}
            }
            prop_assert_eq!(&*mirror.borrow(), &set.iter().copied().collect::<Vec<_>>());
        }
        set.clear();
        prop_assert!(mirror.borrow().is_empty());
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────────

#[test]
fn ascending_inserts_build_a_left_chain() {
    let mut set = SortedSet::from([1, 2, 3]);
    assert_eq!(set.log(&Charmap::ASCII, ToString::to_string), ["  .-- 1", ".-+ 2", "+ 3"]);
    assert!(set.contains(&2));
    assert_eq!(set.log(&Charmap::ASCII, ToString::to_string), [".-- 1", "+ 2", "'-- 3"]);
    assert_eq!(set.summary(), "(2 <3 (1 <1), (3 <1))");
}

#[test]
fn long_chains_are_drawn_without_recursion() {
    let set: SortedSet<u32> = (0..2_000).collect();
    let drawn = set.log(&Charmap::ASCII, ToString::to_string);
    assert_eq!(drawn.len(), 2_000);
    assert_eq!(drawn[1_999], "+ 1999");
    assert!(drawn[0].ends_with(".-- 0"));
}

#[test]
fn unicode_charmaps() {
    let set = SortedSet::from([1, 2, 3]);
    assert_eq!(set.log(&Charmap::UNICODE_ROUND, ToString::to_string), ["  ╭── 1", "╭─┴ 2", "┴ 3"]);
    assert_eq!(set.log(&Charmap::UNICODE_SHARP, ToString::to_string), ["  ┌── 1", "┌─┴ 2", "┴ 3"]);
}

#[test]
fn degenerate_tree_is_handled_iteratively() {
    const N: u32 = 50_000;
    let mut set: SortedSet<u32> = (0..N).collect();
    assert_eq!(set.root(), Some(&(N - 1)));
    assert_eq!(set.iter().count(), N as usize);
    assert_eq!(set.nth(0), Some(&0));

    // The deepest node is reached and splayed in one call.
    assert!(set.contains(&0));
    assert_eq!(set.root(), Some(&0));
    assert_eq!(set.rank_of(&(N / 2)), Some((N / 2) as usize));
    let values: Vec<u32> = set.into_iter().collect();
    assert_eq!(values.len(), N as usize);
}

#[test]
fn splay_index_roots_every_rank() {
    let mut set: SortedSet<i32> = (0..16).map(|n| n * 10).collect();
    for k in 0..16 {
        assert_eq!(set.splay_index(k), Some(&(k as i32 * 10)));
        assert_eq!(set.root(), Some(&(k as i32 * 10)));
        assert_eq!(set[Rank(k)], k as i32 * 10);
    }
    assert_eq!(set.splay_index(16), None);
}

// ─── Neighbour queries ───────────────────────────────────────────────────────

fn fixture() -> SortedSet<i32> {
    SortedSet::from([
        22, 23, 1, 34, 19, 5, 26, 12, 27, 30, 21, 20, 6, 7, 2, 32, 10, 9, 33, 3, 11, 17, 28, 15,
    ])
}

#[test]
fn find_existing_values() {
    let mut set = fixture();
    for value in [1, 5, 9, 30, 34] {
        assert_eq!(set.find(&value), Some(&value));
    }
    for value in [4, 13, 31] {
        assert_eq!(set.find(&value), None);
    }
    assert_eq!(set.find_least(), Some(&1));
    assert_eq!(set.find_greatest(), Some(&34));
}

#[test]
fn find_greatest_less_than_or_equal() {
    let mut set = fixture();
    for (probe, expected) in [(5, 5), (7, 7), (9, 9), (14, 12), (24, 23), (31, 30), (4, 3), (29, 28), (25, 23)] {
        assert_eq!(set.find_greatest_less_than_or_equal(&probe), Some(&expected), "{probe}");
    }
    assert_eq!(set.find_greatest_less_than_or_equal(&0), None);
}

#[test]
fn find_greatest_less_than() {
    let mut set = fixture();
    for (probe, expected) in [(5, 3), (7, 6), (9, 7), (26, 23), (14, 12), (24, 23), (31, 30), (4, 3), (29, 28), (25, 23)] {
        assert_eq!(set.find_greatest_less_than(&probe), Some(&expected), "{probe}");
    }
    assert_eq!(set.find_greatest_less_than(&1), None);
}

#[test]
fn find_least_greater_than_or_equal() {
    let mut set = fixture();
    for (probe, expected) in [(5, 5), (7, 7), (9, 9), (13, 15), (24, 26), (31, 32), (4, 5), (29, 30), (25, 26)] {
        assert_eq!(set.find_least_greater_than_or_equal(&probe), Some(&expected), "{probe}");
    }
    assert_eq!(set.find_least_greater_than_or_equal(&36), None);
}

#[test]
fn find_least_greater_than() {
    let mut set = fixture();
    for (probe, expected) in [(5, 6), (7, 9), (9, 10), (26, 27), (14, 15), (24, 26), (31, 32), (4, 5), (29, 30), (25, 26)] {
        assert_eq!(set.find_least_greater_than(&probe), Some(&expected), "{probe}");
    }
    assert_eq!(set.find_least_greater_than(&34), None);
}

// ─── Range-change protocol ───────────────────────────────────────────────────

#[test]
fn before_and_after_listeners_see_both_sides_of_the_edit() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut set = SortedSet::from([1, 3]);

    let before = Rc::clone(&log);
    let will = set.observe_range_will_change(move |change, contents| {
        before.borrow_mut().push(("before", change.clone(), contents.to_vec()));
    });
    let after = Rc::clone(&log);
    set.observe_range_change(move |change, contents| {
        after.borrow_mut().push(("after", change.clone(), contents.to_vec()));
    });

    set.insert(2);
    assert!(set.unobserve(will));
    set.remove(&1);

    assert_eq!(
        *log.borrow(),
        [
            ("before", RangeChange { added: vec![2], removed: vec![], index: 1 }, vec![1, 3]),
            ("after", RangeChange { added: vec![2], removed: vec![], index: 1 }, vec![1, 2, 3]),
            ("after", RangeChange { added: vec![], removed: vec![1], index: 0 }, vec![2, 3]),
        ]
    );
}

// ─── Single-value accessors ──────────────────────────────────────────────────

#[test]
fn one_and_only_errors() {
    let empty: SortedSet<i32> = SortedSet::new();
    assert_eq!(empty.one(), Err(Error::EmptyContainer));
    assert_eq!(empty.only(), Err(Error::EmptyContainer));
    assert_eq!(SortedSet::from([4, 5]).only(), Err(Error::MultipleValues));
    assert_eq!(Error::MultipleValues.to_string(), "can't get the only value of a collection with multiple values");
}

// ─── Iteration ───────────────────────────────────────────────────────────────

#[test]
fn iterate_half_open_ranges() {
    let mut set = fixture();
    assert_eq!(set.iterate(5..10).collect::<Vec<_>>(), [5, 6, 7, 9]);
    assert_eq!(set.iterate(31..).collect::<Vec<_>>(), [32, 33, 34]);
    assert_eq!(set.iterate(..3).collect::<Vec<_>>(), [1, 2]);
    assert_eq!(set.iterate(..).count(), 24);
    assert_eq!(set.len(), 24);
}

// ─── Trait implementations ───────────────────────────────────────────────────

#[test]
fn trait_impls() {
    let mut set: SortedSet<i32> = SortedSet::default();
    set.extend(&[3, 1]);
    set.extend([2]);
    let copy = set.clone();
    assert_eq!(set, copy);
    assert_eq!(format!("{set:?}"), "{1, 2, 3}");
    assert_eq!((&set).into_iter().len(), 3);
    assert_eq!(set.into_iter().rev().collect::<Vec<_>>(), [3, 2, 1]);
}

#[test]
fn reverse_comparator() {
    let mut set = SortedSet::from_iter_with([1, 5, 3], |a: &i32, b: &i32| b.cmp(a));
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [5, 3, 1]);
    assert_eq!(set.rank_of(&1), Some(2));
    assert_eq!(set.find_least_greater_than(&5), Some(&3));
}
