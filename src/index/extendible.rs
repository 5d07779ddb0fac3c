//! Extendible hashing.
//!
//! A directory of `2^global_depth` slots points at buckets. A slot is picked
//! by the low `global_depth` bits of the key hash; a bucket with local depth
//! `d` is shared by every slot agreeing on the low `d` bits. A full bucket is
//! split on bit `d`, doubling the directory first when `d` already equals the
//! global depth. Every directory slot is rewired during the split, so a key is
//! always found in the bucket its current slot points at.

use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};
use std::mem;

use prettytable::{Table, row};

use crate::index::bucket::{Slot, SlotBlock};
use crate::mem_stat::MemStat;
use crate::util::{AccessCounter, DefaultBuildHasher, hash_key};
use crate::{HashIndexConfig, IndexError, KeyValueIndex};

/// Depth at which splitting stops. Keys whose hashes agree on this many low
/// bits cannot be told apart by the directory, so their bucket grows instead.
pub const MAX_GLOBAL_DEPTH: u32 = 20;

fn depth_mask(depth: u32) -> u64 {
    (1u64 << depth) - 1
}

#[derive(Debug, Clone)]
struct Bucket<K, V> {
    local_depth: u32,
    block: SlotBlock<K, V>,
}

impl<K, V> Bucket<K, V> {
    fn new(local_depth: u32, slots: usize) -> Self {
        Self {
            local_depth,
            block: SlotBlock::new(slots),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtendibleHashIndex<K, V, S = DefaultBuildHasher> {
    /// Directory slot → position in `buckets`.
    directory: Vec<usize>,
    /// Buckets in allocation order. Each appears here exactly once.
    buckets: Vec<Bucket<K, V>>,
    global_depth: u32,
    slots: usize,
    len: usize,
    hasher: S,
    /// Buckets probed by lookups.
    accesses: AccessCounter,
}

impl<K, V> Default for ExtendibleHashIndex<K, V>
where
    K: Hash + Eq + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ExtendibleHashIndex<K, V>
where
    K: Hash + Eq + Debug,
{
    /// Creates an index with four buckets of four slots each.
    pub fn new() -> Self {
        Self::from_config(HashIndexConfig::default(), DefaultBuildHasher::default())
    }

    /// `config.initial_buckets` becomes the initial directory size and must
    /// be a power of two.
    pub fn with_config(config: HashIndexConfig) -> Result<Self, IndexError> {
        Self::with_config_and_hasher(config, DefaultBuildHasher::default())
    }
}

impl<K, V, S> ExtendibleHashIndex<K, V, S>
where
    K: Hash + Eq + Debug,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_config(HashIndexConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: HashIndexConfig, hasher: S) -> Result<Self, IndexError> {
        config.validate_directory()?;
        Ok(Self::from_config(config, hasher))
    }

    fn from_config(config: HashIndexConfig, hasher: S) -> Self {
        let global_depth = config.initial_buckets.trailing_zeros();
        Self {
            directory: (0..config.initial_buckets).collect(),
            buckets: (0..config.initial_buckets)
                .map(|_| Bucket::new(global_depth, config.slots))
                .collect(),
            global_depth,
            slots: config.slots,
            len: 0,
            hasher,
            accesses: AccessCounter::new(),
        }
    }

    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    /// Distinct buckets, which is at most the directory length.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Local depth of the bucket behind directory slot `slot`.
    pub fn local_depth(&self, slot: usize) -> Option<u32> {
        let bucket = *self.directory.get(slot)?;
        Some(self.buckets[bucket].local_depth)
    }

    pub fn accesses(&self) -> usize {
        self.accesses.get()
    }

    pub fn reset_accesses(&self) -> usize {
        self.accesses.reset()
    }

    fn directory_slot(&self, hash: u64) -> usize {
        (hash & depth_mask(self.global_depth)) as usize
    }

    /// Whether splitting bucket `bucket` can ever make room for `hash`.
    fn is_splittable(&self, bucket: usize, hash: u64) -> bool {
        let bucket = &self.buckets[bucket];
        if bucket.local_depth >= MAX_GLOBAL_DEPTH {
            return false;
        }
        let mask = depth_mask(MAX_GLOBAL_DEPTH);
        bucket
            .block
            .iter()
            .any(|slot| (slot.hash ^ hash) & mask != 0)
    }

    /// Splits `bucket` on its next hash bit, doubling the directory first if
    /// the bucket already uses every directory bit.
    fn split(&mut self, bucket: usize) {
        let depth = self.buckets[bucket].local_depth;
        if depth == self.global_depth {
            self.directory.extend_from_within(..);
            self.global_depth += 1;
            tracing::debug!(
                global_depth = self.global_depth,
                directory_len = self.directory.len(),
                "Directory doubled"
            );
        }

        let bit = 1u64 << depth;
        let sibling_id = self.buckets.len();
        let mut sibling = Bucket::new(depth + 1, self.slots);
        let original = &mut self.buckets[bucket];
        original.local_depth = depth + 1;
        for slot in original.block.take() {
            if slot.hash & bit == 0 {
                original.block.push_unbounded(slot);
            } else {
                sibling.block.push_unbounded(slot);
            }
        }
        self.buckets.push(sibling);

        for (i, target) in self.directory.iter_mut().enumerate() {
            if *target == bucket && (i as u64) & bit != 0 {
                *target = sibling_id;
            }
        }

        tracing::debug!(
            bucket,
            sibling = sibling_id,
            local_depth = depth + 1,
            "Bucket split"
        );
    }

    /// One row per bucket with its directory slots and entries. The format
    /// is not stable.
    pub fn dump(&self) -> String
    where
        V: Debug,
    {
        let mut table = Table::new();
        table.set_titles(row!["bucket", "local depth", "directory slots", "entries"]);
        for (id, bucket) in self.buckets.iter().enumerate() {
            let slots: Vec<usize> = self
                .directory
                .iter()
                .enumerate()
                .filter(|(_, target)| **target == id)
                .map(|(slot, _)| slot)
                .collect();
            let entries: Vec<String> = bucket
                .block
                .iter()
                .map(|slot| format!("{:?} => {:?}", slot.key, slot.value))
                .collect();
            table.add_row(row![
                id,
                bucket.local_depth,
                format!("{:?}", slots),
                entries.join("\n")
            ]);
        }
        table.to_string()
    }
}

impl<K, V, S> KeyValueIndex<K, V> for ExtendibleHashIndex<K, V, S>
where
    K: Hash + Eq + Debug,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        let hash = hash_key(&self.hasher, &key);
        let bucket = self.directory[self.directory_slot(hash)];
        if self.buckets[bucket].block.find(hash, &key).is_some() {
            tracing::warn!(?key, "Attempt to insert duplicate key into extendible hash index");
            return Err((key, value));
        }

        let mut slot = Slot::new(hash, key, value);
        loop {
            let bucket = self.directory[self.directory_slot(hash)];
            match self.buckets[bucket].block.push(slot) {
                Ok(()) => break,
                Err(rejected) => slot = rejected,
            }
            if !self.is_splittable(bucket, hash) {
                tracing::warn!(
                    bucket,
                    local_depth = self.buckets[bucket].local_depth,
                    "Colliding hashes, bucket grows past its slots"
                );
                self.buckets[bucket].block.push_unbounded(slot);
                break;
            }
            self.split(bucket);
        }

        self.len += 1;
        Ok(())
    }

    fn get(&self, key: &K) -> Option<&V> {
        let hash = hash_key(&self.hasher, key);
        let bucket = self.directory[self.directory_slot(hash)];
        self.accesses.hit();
        self.buckets[bucket]
            .block
            .find(hash, key)
            .map(|slot| &slot.value)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.block.iter())
            .map(|slot| (&slot.key, &slot.value))
    }
}

impl<K, V, S> Extend<(K, V)> for ExtendibleHashIndex<K, V, S>
where
    K: Hash + Eq + Debug,
    S: BuildHasher,
{
    /// Inserts every pair; pairs with an already present key are dropped.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

impl<K, V, S> MemStat for ExtendibleHashIndex<K, V, S>
where
    K: MemStat,
    V: MemStat,
{
    fn heap_size(&self) -> usize {
        let directory = self.directory.capacity() * mem::size_of::<usize>();
        let buckets = self.buckets.capacity() * mem::size_of::<Bucket<K, V>>();
        let slots: usize = self
            .buckets
            .iter()
            .map(|bucket| {
                bucket.block.allocated() * mem::size_of::<Slot<K, V>>()
                    + bucket
                        .block
                        .iter()
                        .map(|slot| slot.key.heap_size() + slot.value.heap_size())
                        .sum::<usize>()
            })
            .sum();
        directory + buckets + slots
    }

    fn used_size(&self) -> usize {
        let directory = self.directory.len() * mem::size_of::<usize>();
        let buckets = self.buckets.len() * mem::size_of::<Bucket<K, V>>();
        let slots: usize = self
            .buckets
            .iter()
            .flat_map(|bucket| bucket.block.iter())
            .map(|slot| {
                mem::size_of::<Slot<K, V>>() + slot.key.used_size() + slot.value.used_size()
            })
            .sum();
        directory + buckets + slots
    }
}
