//! Linear hashing.
//!
//! The table starts with `N` buckets and grows one bucket at a time. Each
//! time an insert has to chain a new overflow block, the bucket under the
//! split pointer `s` is split, whichever bucket overflowed: its entries are
//! rehashed modulo `2N` and those landing on `N + s` move to a new bucket.
//! Once `s` reaches `N` the round is over, `s` returns to 0 and `N` doubles.
//!
//! A key addressed to `i = hash mod N` with `i < s` has already been split
//! this round and is looked up at `hash mod 2N` instead.

use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};
use std::mem;

use prettytable::{Table, row};

use crate::index::bucket::{Slot, SlotBlock};
use crate::mem_stat::MemStat;
use crate::util::{AccessCounter, DefaultBuildHasher, hash_key};
use crate::{HashIndexConfig, IndexError, KeyValueIndex};

/// Primary block followed by its overflow blocks. Never empty.
#[derive(Debug, Clone)]
struct Chain<K, V> {
    blocks: Vec<SlotBlock<K, V>>,
}

impl<K, V> Chain<K, V> {
    fn new(slots: usize) -> Self {
        Self {
            blocks: vec![SlotBlock::new(slots)],
        }
    }

    fn len(&self) -> usize {
        self.blocks.iter().map(SlotBlock::len).sum()
    }

    fn overflow_blocks(&self) -> usize {
        self.blocks.len() - 1
    }

    fn find(&self, hash: u64, key: &K, accesses: &AccessCounter) -> Option<&Slot<K, V>>
    where
        K: Eq,
    {
        self.blocks.iter().find_map(|block| {
            accesses.hit();
            block.find(hash, key)
        })
    }

    /// Stores `slot` in the first block with room. Returns `true` if a new
    /// overflow block had to be chained for it.
    fn push(&mut self, mut slot: Slot<K, V>, slots: usize) -> bool {
        for block in &mut self.blocks {
            match block.push(slot) {
                Ok(()) => return false,
                Err(rejected) => slot = rejected,
            }
        }
        let mut block = SlotBlock::new(slots);
        block.push_unbounded(slot);
        self.blocks.push(block);
        true
    }

    fn iter(&self) -> impl Iterator<Item = &Slot<K, V>> {
        self.blocks.iter().flat_map(|block| block.iter())
    }

    fn into_slots(self) -> impl Iterator<Item = Slot<K, V>> {
        self.blocks.into_iter().flat_map(|mut block| block.take())
    }
}

#[derive(Debug, Clone)]
pub struct LinearHashIndex<K, V, S = DefaultBuildHasher> {
    /// Always `modulus + split` chains.
    buckets: Vec<Chain<K, V>>,
    /// `N`, the bucket count at the start of the current round.
    modulus: usize,
    /// Next bucket to split, in `[0, N)`.
    split: usize,
    slots: usize,
    len: usize,
    hasher: S,
    /// Blocks probed by lookups.
    accesses: AccessCounter,
}

impl<K, V> Default for LinearHashIndex<K, V>
where
    K: Hash + Eq + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LinearHashIndex<K, V>
where
    K: Hash + Eq + Debug,
{
    /// Creates an index with four buckets of four slots each.
    pub fn new() -> Self {
        Self::from_config(HashIndexConfig::default(), DefaultBuildHasher::default())
    }

    pub fn with_config(config: HashIndexConfig) -> Result<Self, IndexError> {
        Self::with_config_and_hasher(config, DefaultBuildHasher::default())
    }
}

impl<K, V, S> LinearHashIndex<K, V, S>
where
    K: Hash + Eq + Debug,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_config(HashIndexConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: HashIndexConfig, hasher: S) -> Result<Self, IndexError> {
        config.validate()?;
        Ok(Self::from_config(config, hasher))
    }

    fn from_config(config: HashIndexConfig, hasher: S) -> Self {
        Self {
            buckets: (0..config.initial_buckets)
                .map(|_| Chain::new(config.slots))
                .collect(),
            modulus: config.initial_buckets,
            split: 0,
            slots: config.slots,
            len: 0,
            hasher,
            accesses: AccessCounter::new(),
        }
    }

    /// `N`, the low-resolution modulus.
    pub fn modulus(&self) -> usize {
        self.modulus
    }

    /// `2N`, the high-resolution modulus.
    pub fn next_modulus(&self) -> usize {
        self.modulus * 2
    }

    pub fn split_pointer(&self) -> usize {
        self.split
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Overflow blocks chained across all buckets.
    pub fn overflow_blocks(&self) -> usize {
        self.buckets.iter().map(Chain::overflow_blocks).sum()
    }

    pub fn accesses(&self) -> usize {
        self.accesses.get()
    }

    pub fn reset_accesses(&self) -> usize {
        self.accesses.reset()
    }

    fn address(&self, hash: u64) -> usize {
        let low = (hash % self.modulus as u64) as usize;
        if low < self.split {
            (hash % self.next_modulus() as u64) as usize
        } else {
            low
        }
    }

    /// Splits the bucket under the split pointer and advances the pointer,
    /// closing the round when it reaches `N`.
    fn split_next(&mut self) {
        let split = self.split;
        let wide = self.next_modulus() as u64;
        debug_assert_eq!(self.buckets.len(), self.modulus + split);

        let old = mem::replace(&mut self.buckets[split], Chain::new(self.slots));
        let mut moved = Chain::new(self.slots);
        for slot in old.into_slots() {
            if (slot.hash % wide) as usize == split {
                self.buckets[split].push(slot, self.slots);
            } else {
                debug_assert_eq!((slot.hash % wide) as usize, self.modulus + split);
                moved.push(slot, self.slots);
            }
        }
        tracing::debug!(
            bucket = split,
            new_bucket = self.buckets.len(),
            stayed = self.buckets[split].len(),
            moved = moved.len(),
            "Bucket split"
        );
        self.buckets.push(moved);

        self.split += 1;
        if self.split == self.modulus {
            self.split = 0;
            self.modulus *= 2;
            tracing::debug!(modulus = self.modulus, "Linear hashing round complete");
        }
    }

    /// One row per bucket with its chain length and entries. The format is
    /// not stable.
    pub fn dump(&self) -> String
    where
        V: Debug,
    {
        let mut table = Table::new();
        table.set_titles(row!["bucket", "blocks", "entries"]);
        for (id, chain) in self.buckets.iter().enumerate() {
            let entries: Vec<String> = chain
                .iter()
                .map(|slot| format!("{:?} => {:?}", slot.key, slot.value))
                .collect();
            let marker = if id == self.split { " <- split" } else { "" };
            table.add_row(row![
                format!("{}{}", id, marker),
                chain.blocks.len(),
                entries.join("\n")
            ]);
        }
        table.to_string()
    }
}

impl<K, V, S> KeyValueIndex<K, V> for LinearHashIndex<K, V, S>
where
    K: Hash + Eq + Debug,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        let hash = hash_key(&self.hasher, &key);
        let bucket = self.address(hash);
        if self.buckets[bucket].iter().any(|slot| slot.hash == hash && slot.key == key) {
            tracing::warn!(?key, "Attempt to insert duplicate key into linear hash index");
            return Err((key, value));
        }

        let overflowed = self.buckets[bucket].push(Slot::new(hash, key, value), self.slots);
        self.len += 1;
        if overflowed {
            self.split_next();
        }
        Ok(())
    }

    fn get(&self, key: &K) -> Option<&V> {
        let hash = hash_key(&self.hasher, key);
        self.buckets[self.address(hash)]
            .find(hash, key, &self.accesses)
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
            .flat_map(|chain| chain.iter())
            .map(|slot| (&slot.key, &slot.value))
    }
}

impl<K, V, S> Extend<(K, V)> for LinearHashIndex<K, V, S>
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

impl<K, V, S> MemStat for LinearHashIndex<K, V, S>
where
    K: MemStat,
    V: MemStat,
{
    fn heap_size(&self) -> usize {
        let chains = self.buckets.capacity() * mem::size_of::<Chain<K, V>>();
        let blocks: usize = self
            .buckets
            .iter()
            .map(|chain| {
                chain.blocks.capacity() * mem::size_of::<SlotBlock<K, V>>()
                    + chain
                        .blocks
                        .iter()
                        .map(|block| block.allocated() * mem::size_of::<Slot<K, V>>())
                        .sum::<usize>()
                    + chain
                        .iter()
                        .map(|slot| slot.key.heap_size() + slot.value.heap_size())
                        .sum::<usize>()
            })
            .sum();
        chains + blocks
    }

    fn used_size(&self) -> usize {
        let chains = self.buckets.len() * mem::size_of::<Chain<K, V>>();
        let blocks: usize = self
            .buckets
            .iter()
            .map(|chain| chain.blocks.len() * mem::size_of::<SlotBlock<K, V>>())
            .sum();
        let slots: usize = self
            .buckets
            .iter()
            .flat_map(|chain| chain.iter())
            .map(|slot| {
                mem::size_of::<Slot<K, V>>() + slot.key.used_size() + slot.value.used_size()
            })
            .sum();
        chains + blocks + slots
    }
}
