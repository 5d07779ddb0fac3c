//! Counter of nodes or buckets touched by lookups.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Relaxed atomic counter, so lookups can stay `&self`.
#[derive(Debug, Default)]
pub struct AccessCounter(AtomicUsize);

impl AccessCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns the count accumulated so far and starts again from zero.
    pub fn reset(&self) -> usize {
        self.0.swap(0, Ordering::Relaxed)
    }
}

impl Clone for AccessCounter {
    fn clone(&self) -> Self {
        Self(AtomicUsize::new(self.get()))
    }
}
