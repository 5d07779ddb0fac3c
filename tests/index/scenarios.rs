use access_paths::prelude::*;

#[test]
fn ordered_index_sequential_keys() {
    let mut index = OrderedIndex::with_config(TreeConfig { order: 5 }).unwrap();
    for key in 1..=20u32 {
        index.insert(key, key * 10).unwrap();
    }

    assert_eq!(index.get(&13), Some(&130));
    assert_eq!(index.first_key(), Some(&1));
    assert_eq!(index.last_key(), Some(&20));
    assert_eq!(index.len(), 20);

    let sub = index.sub_map(&5, &15);
    assert_eq!(sub.keys().copied().collect::<Vec<_>>(), (5..15).collect::<Vec<_>>());
    for (key, value) in &sub {
        assert_eq!(*value, key * 10);
    }
}

#[test]
fn extendible_index_ten_keys() {
    let config = HashIndexConfig {
        slots: 4,
        initial_buckets: 4,
    };
    let mut index = ExtendibleHashIndex::with_config(config).unwrap();
    for key in 0..10u32 {
        index.insert(key, key).unwrap();
    }

    for key in 0..10u32 {
        assert_eq!(index.get(&key), Some(&key));
    }
    assert_eq!(index.len(), 10);

    let directory_len = index.directory_len();
    assert!(directory_len.is_power_of_two());
    assert!(directory_len >= 4);
    assert_eq!(directory_len, 1 << index.global_depth());
    // The directory is only as large as the deepest bucket requires.
    let deepest = (0..directory_len)
        .filter_map(|slot| index.local_depth(slot))
        .max();
    assert_eq!(deepest, Some(index.global_depth()));
}

#[test]
fn linear_index_completes_a_round() {
    let config = HashIndexConfig {
        slots: 4,
        initial_buckets: 4,
    };
    let mut index = LinearHashIndex::with_config(config).unwrap();

    let mut wrapped = false;
    let mut previous_pointer = index.split_pointer();
    for key in 0..256u32 {
        index.insert(key, key + 1).unwrap();
        let pointer = index.split_pointer();
        if pointer < previous_pointer {
            wrapped = true;
        }
        previous_pointer = pointer;
    }

    assert!(wrapped, "split pointer never wrapped to 0");
    assert!(index.modulus() >= 8, "N never doubled");
    assert_eq!(index.bucket_count(), index.modulus() + index.split_pointer());
    for key in 0..256u32 {
        assert_eq!(index.get(&key), Some(&(key + 1)));
    }
    assert_eq!(index.len(), 256);
}
