use std::collections::BTreeMap;

use access_paths::prelude::*;

fn squares(keys: impl IntoIterator<Item = u32>) -> OrderedIndex<u32, u32> {
    let mut index = OrderedIndex::new();
    for key in keys {
        index.insert(key, key * key).unwrap();
    }
    index
}

#[test]
fn head_and_tail_maps() {
    let index = squares((1..40).step_by(2));

    let head = index.head_map(&9);
    assert_eq!(head.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7]);

    let tail = index.tail_map(&33);
    assert_eq!(
        tail.into_iter().collect::<Vec<_>>(),
        vec![(33, 1089), (35, 1225), (37, 1369), (39, 1521)]
    );

    assert!(index.head_map(&1).is_empty());
    assert!(index.tail_map(&40).is_empty());
    assert_eq!(index.head_map(&100).len(), index.len());
}

#[test]
fn sub_map_boundaries() {
    let index = squares(0..100);

    // Lower bound inclusive, upper bound exclusive.
    let sub = index.sub_map(&10, &20);
    assert_eq!(sub.len(), 10);
    assert!(sub.contains_key(&10));
    assert!(!sub.contains_key(&20));

    assert!(index.sub_map(&50, &50).is_empty());
    assert!(index.sub_map(&60, &40).is_empty());
}

#[test]
fn range_accepts_any_bounds() {
    let index = squares(0..50);

    let keys: Vec<u32> = index.range(10..=12).map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![10, 11, 12]);

    let keys: Vec<u32> = index.range(47..).map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![47, 48, 49]);

    assert_eq!(index.range(..).count(), 50);
}

#[test]
fn iteration_is_ascending() {
    let index = squares([17, 3, 99, 42, 8, 61, 0, 25, 77, 12, 5, 33]);

    let keys: Vec<u32> = index.iter().map(|(k, _)| *k).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
    assert_eq!((&index).into_iter().len(), 12);
}

#[test]
fn entries_are_a_snapshot() {
    let mut index = squares(0..10);
    let snapshot = index.entries();

    index.insert(10, 100).unwrap();

    assert_eq!(snapshot.len(), 10);
    assert_eq!(index.len(), 11);
    assert_eq!(snapshot[3], (3, 9));
}

#[test]
fn string_keys() {
    let mut index = OrderedIndex::new();
    for word in ["pear", "apple", "fig", "kiwi", "banana", "cherry", "date", "grape"] {
        index.insert(word.to_string(), word.len()).unwrap();
    }

    assert_eq!(index.first_key().map(String::as_str), Some("apple"));
    assert_eq!(index.last_key().map(String::as_str), Some("pear"));
    assert_eq!(index.get(&"kiwi".to_string()), Some(&4));
    assert_eq!(index.get(&"mango".to_string()), None);

    let head: BTreeMap<String, usize> = index.head_map(&"c".to_string());
    assert_eq!(head.len(), 2);
}

#[test]
fn duplicate_is_handed_back() {
    let mut index = squares(0..20);

    assert_eq!(index.insert(7, 0), Err((7, 0)));
    assert_eq!(index.get(&7), Some(&49));
    assert_eq!(index.len(), 20);
}

#[test]
fn larger_order_builds_shallower_tree() {
    let mut narrow: OrderedIndex<u32, u32> =
        OrderedIndex::with_config(TreeConfig { order: 3 }).unwrap();
    let mut wide: OrderedIndex<u32, u32> =
        OrderedIndex::with_config(TreeConfig { order: 32 }).unwrap();
    assert_eq!(narrow.order(), 3);
    assert_eq!(wide.order(), 32);
    narrow.extend((0..1000).map(|k| (k, k)));
    wide.extend((0..1000).map(|k| (k, k)));

    assert!(wide.height() < narrow.height());
    assert_eq!(narrow.len(), wide.len());

    narrow.reset_accesses();
    wide.reset_accesses();
    narrow.get(&500);
    wide.get(&500);
    assert!(wide.accesses() < narrow.accesses());
}
