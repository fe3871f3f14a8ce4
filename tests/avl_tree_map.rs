use std::collections::BTreeMap;

use poise_tree::avl_tree_map;
use poise_tree::{AvlTreeMap, Rank, TreeError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i64> {
    // Smaller than TEST_SIZE so that keys collide.
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    Rank(i64),
    Select(usize),
    RemoveByRank(usize),
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        2 => key_strategy().prop_map(MapOp::Rank),
        2 => (0usize..1_200).prop_map(MapOp::Select),
        1 => (0usize..1_200).prop_map(MapOp::RemoveByRank),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

/// One-based position of `key` in `model`, or 0.
fn model_rank(model: &BTreeMap<i64, i64>, key: i64) -> usize {
    if model.contains_key(&key) { model.range(..=key).count() } else { 0 }
}

fn out_of_range(index: usize, len: usize) -> TreeError {
    TreeError::OutOfRange { index, len }
}

// ─── Differential tests ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random operation sequence on both maps, checking results and every tree
    /// invariant after each step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl: AvlTreeMap<i64, i64> = AvlTreeMap::new();
        let mut bt: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(avl.insert(k, v), bt.insert(k, v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl.remove(&k), bt.remove(&k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl.get(&k), bt.get(&k), "get({})", k);
                }
                MapOp::Rank(k) => {
                    prop_assert_eq!(avl.rank(&k), model_rank(&bt, k), "rank({})", k);
                }
                MapOp::Select(i) => {
                    let expected = match i.checked_sub(1).and_then(|at| bt.keys().nth(at)) {
                        Some(key) => Ok(key),
                        None => Err(out_of_range(i, bt.len())),
                    };
                    prop_assert_eq!(avl.select(i), expected, "select({})", i);
                }
                MapOp::RemoveByRank(i) => {
                    let expected = match i.checked_sub(1).and_then(|at| bt.keys().nth(at)).copied() {
                        Some(key) => Ok(bt.remove_entry(&key).expect("key came from the model")),
                        None => Err(out_of_range(i, bt.len())),
                    };
                    prop_assert_eq!(avl.remove_by_rank(i), expected, "remove_by_rank({})", i);
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(avl.pop_first(), bt.pop_first(), "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(avl.pop_last(), bt.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(avl.len(), bt.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(avl.validate(), Ok(()), "invariant broken after {:?}", op);
        }

        prop_assert!(avl.iter().eq(bt.iter()));
    }

    /// Forward, backward and interleaved iteration all agree with BTreeMap.
    #[test]
    fn iter_size_and_double_ended(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let avl: AvlTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert_eq!(avl.iter().len(), bt.len());
        prop_assert!(avl.iter().rev().eq(bt.iter().rev()));
        prop_assert!(avl.keys().eq(bt.keys()));
        prop_assert!(avl.values().eq(bt.values()));

        let mut avl_iter = avl.iter();
        let mut bt_iter = bt.iter();
        loop {
            let front = (avl_iter.next(), bt_iter.next());
            prop_assert_eq!(front.0, front.1);
            let back = (avl_iter.next_back(), bt_iter.next_back());
            prop_assert_eq!(back.0, back.1);
            prop_assert_eq!(avl_iter.len(), bt_iter.len());
            if front.0.is_none() {
                break;
            }
        }
    }

    /// For every position, `rank(select(i)) == i`.
    #[test]
    fn select_and_rank_are_dual(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let avl: AvlTreeMap<i64, i64> = entries.into_iter().collect();
        for index in 1..=avl.len() {
            let key = *avl.select(index).expect("index is in range");
            prop_assert_eq!(avl.rank(&key), index);
            prop_assert_eq!(avl[Rank(index)], avl[&key]);
        }
        prop_assert!(avl.select(avl.len() + 1).is_err());
        prop_assert!(avl.select(0).is_err());
    }

    /// Merging behaves like inserting every entry of the second map into the first, and a
    /// non-empty second map leaves a tree of minimal height.
    #[test]
    fn merge_matches_btreemap_append(
        entries_a in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE / 2),
        entries_b in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE / 2),
    ) {
        let mut avl_a: AvlTreeMap<i64, i64> = entries_a.iter().copied().collect();
        let mut avl_b: AvlTreeMap<i64, i64> = entries_b.iter().copied().collect();
        let mut bt_a: BTreeMap<i64, i64> = entries_a.into_iter().collect();
        let mut bt_b: BTreeMap<i64, i64> = entries_b.into_iter().collect();

        let rebuilt = !avl_b.is_empty();
        avl_a.merge(&mut avl_b);
        bt_a.append(&mut bt_b);

        prop_assert!(avl_b.is_empty());
        prop_assert!(avl_a.iter().eq(bt_a.iter()));
        prop_assert_eq!(avl_a.validate(), Ok(()));
        if rebuilt {
            let minimal = (usize::BITS - bt_a.len().leading_zeros()) as usize;
            prop_assert_eq!(avl_a.height(), minimal);
        }
    }

    /// Removing a key that is not present changes nothing.
    #[test]
    fn removing_absent_key_is_idempotent(
        entries in proptest::collection::vec((0i64..500, value_strategy()), 0..500),
        absent in 500i64..1_000,
    ) {
        let mut avl: AvlTreeMap<i64, i64> = entries.into_iter().collect();
        let before = avl.clone();
        let shape = avl.print_tree();

        prop_assert_eq!(avl.remove(&absent), None);
        prop_assert!(avl == before);
        prop_assert_eq!(avl.print_tree(), shape);
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

const SCENARIO_KEYS: [i32; 11] = [10, 20, 5, 4, 6, 15, 30, 7, 17, 25, 12];

fn scenario_tree() -> AvlTreeMap<i32, ()> {
    let mut map = AvlTreeMap::new();
    for key in SCENARIO_KEYS {
        assert_eq!(map.insert(key, ()), None);
        assert_eq!(map.validate(), Ok(()), "unbalanced after inserting {key}");
    }
    map
}

#[test]
fn inserts_stay_balanced_and_sorted() {
    let map = scenario_tree();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [4, 5, 6, 7, 10, 12, 15, 17, 20, 25, 30]);
    assert_eq!(map.len(), 11);
}

#[test]
fn select_reports_out_of_range() {
    let map = scenario_tree();
    let before = map.print_tree();

    assert_eq!(map.select(1), Ok(&4));
    assert_eq!(map.select(11), Ok(&30));
    assert_eq!(map.select(12), Err(TreeError::OutOfRange { index: 12, len: 11 }));
    assert_eq!(map.select(12).unwrap_err().to_string(), "position 12 is out of range for a tree of 11 elements");

    assert_eq!(map.print_tree(), before);
}

#[test]
fn merge_interleaved_sets() {
    let mut odd: AvlTreeMap<_, _> = [1, 3, 5, 7].into_iter().map(|k| (k, ())).collect();
    let mut even: AvlTreeMap<_, _> = [2, 4, 6, 8].into_iter().map(|k| (k, ())).collect();

    odd.merge(&mut even);

    assert_eq!(odd.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(odd.validate(), Ok(()));
    assert_eq!(odd.height(), 4);
    assert!(even.is_empty());
    assert_eq!(even.validate(), Ok(()));
}

#[test]
fn merge_with_empty_trees() {
    let mut empty: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    let mut full = AvlTreeMap::from([(1, 10), (2, 20)]);

    full.merge(&mut empty);
    assert_eq!(full.len(), 2);

    empty.merge(&mut full);
    assert_eq!(empty.iter().collect::<Vec<_>>(), [(&1, &10), (&2, &20)]);
    assert!(full.is_empty());
}

#[test]
fn ascending_inserts_build_a_perfect_tree() {
    let map: AvlTreeMap<u32, u32> = (1..=1023).map(|k| (k, k)).collect();
    assert_eq!(map.height(), 10);
    assert_eq!(map.validate(), Ok(()));
    assert_eq!(map[Rank(512)], 512);
}

#[test]
fn descending_removal_empties_the_tree() {
    let mut map: AvlTreeMap<u32, u32> = (1..1000).map(|k| (k, k * 2)).collect();
    for key in (1..1000).rev() {
        assert_eq!(map.remove(&key), Some(key * 2));
        assert!(!map.contains_key(&key));
        assert_eq!(map.validate(), Ok(()));
    }
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
}

#[test]
fn get_mut_and_select_entry_mut_write_through() {
    let mut map = AvlTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
    *map.get_mut("a").expect("present") += 10;
    if let Ok((key, value)) = map.select_entry_mut(3) {
        assert_eq!(*key, "c");
        *value *= 100;
    }
    assert_eq!(map.values().copied().collect::<Vec<_>>(), [11, 2, 300]);
}

#[test]
fn debug_and_into_iterators() {
    let map = AvlTreeMap::from([(2, 'b'), (1, 'a'), (3, 'c')]);
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b', 3: 'c'}");
    assert_eq!(format!("{:?}", map.keys()), "[1, 2, 3]");

    let into_iter: avl_tree_map::IntoIter<_, _> = map.clone().into_iter();
    assert_eq!(into_iter.len(), 3);
    assert_eq!(map.clone().into_keys().rev().collect::<Vec<_>>(), [3, 2, 1]);
    assert_eq!(map.into_values().collect::<String>(), "abc");
}

#[test]
fn clear_then_reuse() {
    let mut map: AvlTreeMap<i32, i32> = (0..100).map(|k| (k, k)).collect();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.first_key_value(), None);
    assert_eq!(map.select(1), Err(TreeError::OutOfRange { index: 1, len: 0 }));

    map.extend([(&5, &50), (&1, &10)]);
    assert_eq!(map.first_key_value(), Some((&1, &10)));
    assert_eq!(map.last_key_value(), Some((&5, &50)));
    assert_eq!(map.validate(), Ok(()));
}
