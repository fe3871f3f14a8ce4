use std::collections::BTreeSet;

use poise_tree::{AvlTreeSet, Rank, TreeError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn value_strategy() -> impl Strategy<Value = i32> {
    -1_000i32..1_000i32
}

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i32),
    Remove(i32),
    Contains(i32),
    Take(i32),
    Select(usize),
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => (0usize..1_200).prop_map(SetOp::Select),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut avl: AvlTreeSet<i32> = AvlTreeSet::new();
        let mut bt: BTreeSet<i32> = BTreeSet::new();

        for op in &ops {
            match *op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(avl.insert(v), bt.insert(v), "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(avl.remove(&v), bt.remove(&v), "remove({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(avl.contains(&v), bt.contains(&v), "contains({})", v);
                }
                SetOp::Take(v) => {
                    prop_assert_eq!(avl.take(&v), bt.take(&v), "take({})", v);
                }
                SetOp::Select(i) => {
                    let expected = match i.checked_sub(1).and_then(|at| bt.iter().nth(at)) {
                        Some(value) => Ok(value),
                        None => Err(TreeError::OutOfRange { index: i, len: bt.len() }),
                    };
                    prop_assert_eq!(avl.select(i), expected, "select({})", i);
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(avl.pop_first(), bt.pop_first());
                }
                SetOp::PopLast => {
                    prop_assert_eq!(avl.pop_last(), bt.pop_last());
                }
            }
            prop_assert_eq!(avl.len(), bt.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(avl.validate(), Ok(()), "invariant broken after {:?}", op);
        }

        prop_assert!(avl.iter().eq(bt.iter()));
        prop_assert_eq!(avl.first(), bt.first());
        prop_assert_eq!(avl.last(), bt.last());
    }

    #[test]
    fn merge_is_union(
        a in proptest::collection::btree_set(value_strategy(), 0..TEST_SIZE / 2),
        b in proptest::collection::btree_set(value_strategy(), 0..TEST_SIZE / 2),
    ) {
        let mut avl_a: AvlTreeSet<i32> = a.iter().copied().collect();
        let mut avl_b: AvlTreeSet<i32> = b.iter().copied().collect();

        avl_a.merge(&mut avl_b);

        prop_assert!(avl_b.is_empty());
        prop_assert!(avl_a.iter().eq(a.union(&b)));
        prop_assert_eq!(avl_a.validate(), Ok(()));
        for (position, value) in avl_a.iter().enumerate() {
            prop_assert_eq!(avl_a.rank(value), position + 1);
        }
    }
}

#[test]
fn merge_interleaved_sets() {
    let mut odd = AvlTreeSet::from([1, 3, 5, 7]);
    let mut even = AvlTreeSet::from([2, 4, 6, 8]);

    odd.merge(&mut even);

    assert_eq!(odd.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(odd.validate(), Ok(()));
    assert!(even.is_empty());
}

#[test]
fn order_statistics_on_the_scenario_keys() {
    let set: AvlTreeSet<_> = [10, 20, 5, 4, 6, 15, 30, 7, 17, 25, 12].into_iter().collect();

    assert_eq!(set.select(1), Ok(&4));
    assert_eq!(set.select(11), Ok(&30));
    assert_eq!(set.select(12), Err(TreeError::OutOfRange { index: 12, len: 11 }));
    assert_eq!(set[Rank(5)], 10);
    assert_eq!(set.rank(&17), 8);
    assert_eq!(set.rank(&18), 0);
}

#[test]
fn equality_ignores_insertion_order() {
    let forward: AvlTreeSet<_> = (0..50).collect();
    let backward: AvlTreeSet<_> = (0..50).rev().collect();
    assert_eq!(forward, backward);
    assert_eq!(forward.cmp(&backward), std::cmp::Ordering::Equal);

    let mut extended: AvlTreeSet<i32> = AvlTreeSet::new();
    extended.extend(&[3, 1, 2]);
    assert_eq!(format!("{extended:?}"), "{1, 2, 3}");
    assert_eq!(extended.get(&2), Some(&2));
}
