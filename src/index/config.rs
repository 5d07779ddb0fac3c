use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::IndexError;

/// Smallest fan-out for which a split leaves both halves non-empty.
pub const MIN_ORDER: usize = 3;

/// Configuration for [`OrderedIndex`].
///
/// [`OrderedIndex`]: crate::OrderedIndex
#[derive(Debug, Clone, Copy, PartialEq, Eq, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum fan-out of a node. A node holds at most `order - 1` keys.
    #[default(5)]
    pub order: usize,
}

impl TreeConfig {
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.order < MIN_ORDER {
            return Err(IndexError::OrderTooSmall(self.order));
        }
        Ok(())
    }

    pub(crate) fn max_keys(&self) -> usize {
        self.order - 1
    }
}

/// Configuration for [`ExtendibleHashIndex`] and [`LinearHashIndex`].
///
/// [`ExtendibleHashIndex`]: crate::ExtendibleHashIndex
/// [`LinearHashIndex`]: crate::LinearHashIndex
#[derive(Debug, Clone, Copy, PartialEq, Eq, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct HashIndexConfig {
    /// Key/value pairs per bucket block.
    #[default(4)]
    pub slots: usize,
    /// Buckets allocated up front. The extendible index also uses it as the
    /// initial directory size, so there it must be a power of two.
    #[default(4)]
    pub initial_buckets: usize,
}

impl HashIndexConfig {
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.slots == 0 {
            return Err(IndexError::ZeroSlots);
        }
        if self.initial_buckets == 0 {
            return Err(IndexError::ZeroBuckets);
        }
        Ok(())
    }

    pub(crate) fn validate_directory(&self) -> Result<(), IndexError> {
        self.validate()?;
        if !self.initial_buckets.is_power_of_two() {
            return Err(IndexError::DirectoryNotPowerOfTwo(self.initial_buckets));
        }
        Ok(())
    }
}
