//! Shared access to an index from several threads.
//!
//! The index structures themselves are plain single-writer data structures.
//! [`SharedIndex`] puts one behind a readers-writer lock: any number of
//! concurrent lookups, or a single insert.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::KeyValueIndex;

#[derive(Debug)]
pub struct SharedIndex<I> {
    inner: Arc<RwLock<I>>,
}

impl<I> Clone for SharedIndex<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: Default> Default for SharedIndex<I> {
    fn default() -> Self {
        Self::new(I::default())
    }
}

impl<I> SharedIndex<I> {
    pub fn new(index: I) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Blocks until no writer holds the lock.
    pub fn read(&self) -> RwLockReadGuard<'_, I> {
        self.inner.read()
    }

    /// Blocks until the lock is free.
    pub fn write(&self) -> RwLockWriteGuard<'_, I> {
        self.inner.write()
    }

    pub fn insert<K, V>(&self, key: K, value: V) -> Result<(), (K, V)>
    where
        I: KeyValueIndex<K, V>,
    {
        self.inner.write().insert(key, value)
    }

    /// Looks `key` up and clones the value out before releasing the lock.
    pub fn get_cloned<K, V>(&self, key: &K) -> Option<V>
    where
        I: KeyValueIndex<K, V>,
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn len<K, V>(&self) -> usize
    where
        I: KeyValueIndex<K, V>,
    {
        self.inner.read().len()
    }

    pub fn is_empty<K, V>(&self) -> bool
    where
        I: KeyValueIndex<K, V>,
    {
        self.inner.read().is_empty()
    }

    /// Takes the index back if this is the last handle.
    pub fn into_inner(self) -> Result<I, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => Ok(lock.into_inner()),
            Err(inner) => Err(Self { inner }),
        }
    }
}
