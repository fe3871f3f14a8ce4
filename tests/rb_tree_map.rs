use std::collections::BTreeMap;

use poise_tree::RbTreeMap;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    GetOrInsert(i64, i64),
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        4 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::GetOrInsert(k, v)),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random operation sequence on both maps, checking the coloring rules
    /// after every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb: RbTreeMap<i64, i64> = RbTreeMap::new();
        let mut bt: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(rb.insert(k, v), bt.insert(k, v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(rb.remove_entry(&k), bt.remove_entry(&k), "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb.get(&k), bt.get(&k), "get({})", k);
                }
                MapOp::GetOrInsert(k, v) => {
                    let expected = *bt.entry(k).or_insert(v);
                    prop_assert_eq!(*rb.get_or_insert_with(k, || v), expected, "get_or_insert_with({})", k);
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(rb.pop_first(), bt.pop_first(), "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(rb.pop_last(), bt.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(rb.len(), bt.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb.validate(), Ok(()), "invariant broken after {:?}", op);
        }

        prop_assert!(rb.iter().eq(bt.iter()));
        prop_assert!(rb.height() <= 2 * rb.black_height());
    }

    #[test]
    fn iteration_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let rb: RbTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt: BTreeMap<i64, i64> = entries.into_iter().collect();

        prop_assert!(rb.iter().eq(bt.iter()));
        prop_assert!(rb.keys().rev().eq(bt.keys().rev()));
        prop_assert_eq!(rb.values().len(), bt.len());
        prop_assert!(rb.clone().into_iter().eq(bt.clone().into_iter()));
    }

    /// Removing a key that is not present changes neither the entries nor the coloring.
    #[test]
    fn removing_absent_key_is_idempotent(
        entries in proptest::collection::vec((0i64..500, value_strategy()), 0..500),
        absent in 500i64..1_000,
    ) {
        let mut rb: RbTreeMap<i64, i64> = entries.into_iter().collect();
        let shape = rb.print_tree();

        prop_assert_eq!(rb.remove(&absent), None);
        prop_assert_eq!(rb.print_tree(), shape);
    }
}

#[test]
fn zig_zag_insert_then_remove() {
    let mut map = RbTreeMap::new();
    for key in [10, 20, 15] {
        map.insert(key, ());
    }
    assert_eq!(map.validate(), Ok(()));
    assert_eq!(map.print_tree(), "RbTreeMap\n15 black\n← 10 red\n→ 20 red");
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [10, 15, 20]);

    assert_eq!(map.remove(&15), Some(()));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [10, 20]);
    assert_eq!(map.validate(), Ok(()));

    let before = map.print_tree();
    assert_eq!(map.remove(&15), None);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [10, 20]);
    assert_eq!(map.print_tree(), before);
}

#[test]
fn ascending_inserts_then_descending_removes() {
    let mut map = RbTreeMap::new();
    for key in 1..=1000 {
        map.insert(key, key);
        assert_eq!(map.validate(), Ok(()));
    }
    assert_eq!(map.len(), 1000);

    for key in (1..=1000).rev() {
        assert_eq!(map.remove(&key), Some(key));
        assert!(!map.contains_key(&key));
        assert_eq!(map.validate(), Ok(()), "invariant broken after removing {key}");
    }
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
    assert_eq!(map.print_tree(), "RbTreeMap\n∅");
}

#[test]
fn string_keys_borrow_as_str() {
    let mut map: RbTreeMap<String, usize> = RbTreeMap::new();
    for word in ["delta", "alpha", "charlie", "bravo"] {
        map.insert(word.to_owned(), word.len());
    }
    assert_eq!(map.get("charlie"), Some(&7));
    assert_eq!(map["alpha"], 5);
    assert_eq!(map.get_key_value("bravo"), Some((&"bravo".to_owned(), &5)));
    assert_eq!(map.remove("delta"), Some(5));
    assert_eq!(map.first_key_value().map(|(k, _)| k.as_str()), Some("alpha"));
    assert_eq!(map.last_key_value().map(|(k, _)| k.as_str()), Some("charlie"));
    assert_eq!(format!("{map:?}"), r#"{"alpha": 5, "bravo": 5, "charlie": 7}"#);
}

#[test]
fn clear_and_capacity() {
    let mut map: RbTreeMap<u32, u32> = RbTreeMap::with_capacity(16);
    assert!(map.capacity() >= 16);
    map.extend((0..16).map(|k| (k, k)));
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.black_height(), 0);
    map.insert(7, 7);
    assert_eq!(map[&7], 7);
    assert_eq!(map.validate(), Ok(()));
}
