use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// SipHash with fixed keys. Bucket placement is the same on every run.
pub type DefaultBuildHasher = BuildHasherDefault<DefaultHasher>;

pub fn hash_key<K, S>(build_hasher: &S, key: &K) -> u64
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    build_hasher.hash_one(key)
}
