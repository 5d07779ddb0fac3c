//! In-memory access paths for database-style lookups.
//!
//! Three independent key → value index structures:
//!
//! - [`OrderedIndex`], a B+Tree with point lookups, range queries and
//!   min/max keys.
//! - [`ExtendibleHashIndex`], a directory of pointers over variable-depth
//!   buckets. Full buckets split and the directory doubles on demand.
//! - [`LinearHashIndex`], a table that grows one bucket per overflow by
//!   splitting the bucket under a rotating split pointer.
//!
//! All of them implement [`KeyValueIndex`]. None supports removal, and none
//! is internally synchronized; wrap one in [`lock::SharedIndex`] to share it
//! between threads.

mod index;
pub mod lock;
pub mod mem_stat;
pub mod util;

pub use index::*;

pub mod prelude {
    pub use crate::lock::SharedIndex;
    pub use crate::mem_stat::MemStat;
    pub use crate::{
        ExtendibleHashIndex, HashIndexConfig, IndexError, KeyValueIndex, LinearHashIndex,
        OrderedIndex, TreeConfig,
    };
}
