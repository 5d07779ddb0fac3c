mod bucket;
mod config;
mod extendible;
mod linear;
mod ordered;

use derive_more::{Display, Error};

pub use config::{HashIndexConfig, MIN_ORDER, TreeConfig};
pub use extendible::{ExtendibleHashIndex, MAX_GLOBAL_DEPTH};
pub use linear::LinearHashIndex;
pub use ordered::{Iter, OrderedIndex};

/// Key → value map contract shared by all index structures.
///
/// Lookups never fail: a miss is `None`. Inserting a key that is already
/// present leaves the index untouched and hands the pair back as `Err`.
pub trait KeyValueIndex<K, V> {
    fn insert(&mut self, key: K, value: V) -> Result<(), (K, V)>;
    fn get(&self, key: &K) -> Option<&V>;
    /// Count of resident entries.
    fn len(&self) -> usize;
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Owned snapshot of all entries. Later mutations are not reflected.
    fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    #[display("tree order must be at least 3, got {}", _0)]
    OrderTooSmall(#[error(not(source))] usize),
    #[display("bucket must have at least one slot")]
    ZeroSlots,
    #[display("initial bucket count must be non-zero")]
    ZeroBuckets,
    #[display("initial directory size must be a power of two, got {}", _0)]
    DirectoryNotPowerOfTwo(#[error(not(source))] usize),
}
