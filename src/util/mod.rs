mod access_counter;
mod hash;

pub use access_counter::AccessCounter;
pub use hash::{DefaultBuildHasher, hash_key};
