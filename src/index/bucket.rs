//! Fixed-capacity block of key/value slots shared by the hash indexes.
//!
//! Each [`Slot`] keeps the full 64-bit hash of its key next to the pair, so
//! redistributing a block during a split never hashes a key twice.

use std::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<K, V> {
    pub hash: u64,
    pub key: K,
    pub value: V,
}

impl<K, V> Slot<K, V> {
    pub fn new(hash: u64, key: K, value: V) -> Self {
        Self { hash, key, value }
    }
}

/// Unordered block of at most `capacity` slots.
#[derive(Debug, Clone)]
pub struct SlotBlock<K, V> {
    slots: Vec<Slot<K, V>>,
    capacity: usize,
}

impl<K, V> SlotBlock<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Stores `slot` in the first free position, or returns it if the block
    /// is full.
    pub fn push(&mut self, slot: Slot<K, V>) -> Result<(), Slot<K, V>> {
        if self.is_full() {
            return Err(slot);
        }
        self.slots.push(slot);
        Ok(())
    }

    /// Stores `slot` even if it takes the block past its capacity.
    pub(crate) fn push_unbounded(&mut self, slot: Slot<K, V>) {
        self.slots.push(slot);
    }

    pub fn find(&self, hash: u64, key: &K) -> Option<&Slot<K, V>>
    where
        K: Eq,
    {
        self.slots
            .iter()
            .find(|slot| slot.hash == hash && slot.key == *key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot<K, V>> {
        self.slots.iter()
    }

    /// Empties the block, returning its slots. Capacity is kept.
    pub fn take(&mut self) -> Vec<Slot<K, V>> {
        mem::replace(&mut self.slots, Vec::with_capacity(self.capacity))
    }

    pub(crate) fn allocated(&self) -> usize {
        self.slots.capacity()
    }
}
