use access_paths::prelude::*;

fn small(slots: usize, initial_buckets: usize) -> ExtendibleHashIndex<u64, String> {
    ExtendibleHashIndex::with_config(HashIndexConfig {
        slots,
        initial_buckets,
    })
    .unwrap()
}

#[test]
fn empty_index() {
    let index: ExtendibleHashIndex<u64, String> = ExtendibleHashIndex::new();
    assert!(index.is_empty());
    assert_eq!(index.get(&1), None);
    assert_eq!(index.directory_len(), 4);
    assert_eq!(index.global_depth(), 2);
    assert_eq!(index.iter().count(), 0);
}

#[test]
fn lookups_after_growth() {
    let mut index = small(2, 1);
    for key in 0..2000u64 {
        index.insert(key, key.to_string()).unwrap();
    }

    assert_eq!(index.len(), 2000);
    for key in 0..2000u64 {
        assert_eq!(index.get(&key), Some(&key.to_string()));
    }
    assert_eq!(index.get(&2000), None);
    assert_eq!(index.directory_len(), 1 << index.global_depth());
    assert!(index.bucket_count() <= index.directory_len());
}

#[test]
fn every_slot_points_at_a_bucket() {
    let mut index = small(3, 2);
    index.extend((0..300u64).map(|k| (k, k.to_string())));

    for slot in 0..index.directory_len() {
        let depth = index.local_depth(slot).unwrap();
        assert!(depth <= index.global_depth());
    }
    assert_eq!(index.local_depth(index.directory_len()), None);
}

#[test]
fn duplicate_keeps_first_value() {
    let mut index = small(4, 4);
    index.insert(9, "first".to_string()).unwrap();

    let rejected = index.insert(9, "second".to_string());
    assert_eq!(rejected, Err((9, "second".to_string())));
    assert_eq!(index.get(&9).map(String::as_str), Some("first"));
    assert_eq!(index.len(), 1);
}

#[test]
fn entries_cover_every_key() {
    let mut index = small(4, 4);
    index.extend((0..64u64).map(|k| (k, k.to_string())));

    let mut keys: Vec<u64> = index.entries().into_iter().map(|(k, _)| k).collect();
    keys.sort_unstable();
    assert_eq!(keys, (0..64).collect::<Vec<_>>());
}

#[test]
fn lookup_probes_a_single_bucket() {
    let mut index = small(2, 1);
    index.extend((0..500u64).map(|k| (k, k.to_string())));
    index.reset_accesses();

    for key in 0..10u64 {
        index.get(&key);
    }
    assert_eq!(index.accesses(), 10);
}

#[test]
fn dump_is_not_empty() {
    let mut index = small(2, 2);
    index.extend((0..10u64).map(|k| (k, k.to_string())));
    let dump = index.dump();
    assert!(dump.contains("local depth"));
    assert!(dump.contains("\"7\""));
}
