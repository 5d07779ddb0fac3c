use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use access_paths::prelude::*;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

/// Counts events of one level seen while installed as the thread's
/// subscriber.
#[derive(Clone)]
struct LevelCounter {
    level: Level,
    hits: Arc<AtomicUsize>,
}

impl Subscriber for LevelCounter {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == self.level {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

fn events_during(level: Level, f: impl FnOnce()) -> usize {
    let counter = LevelCounter {
        level,
        hits: Arc::new(AtomicUsize::new(0)),
    };
    tracing::subscriber::with_default(counter.clone(), f);
    counter.hits.load(Ordering::SeqCst)
}

fn warnings_during(f: impl FnOnce()) -> usize {
    events_during(Level::WARN, f)
}

fn check_duplicate_warns<I>(mut index: I)
where
    I: KeyValueIndex<u32, u32>,
{
    let fresh = warnings_during(|| {
        for key in 0..50 {
            index.insert(key, key).unwrap();
        }
    });
    assert_eq!(fresh, 0);

    let rejected = warnings_during(|| {
        assert_eq!(index.insert(25, 0), Err((25, 0)));
    });
    assert_eq!(rejected, 1);
    assert_eq!(index.get(&25), Some(&25));
}

#[test]
fn ordered_duplicate_emits_warning() {
    check_duplicate_warns(OrderedIndex::new());
}

#[test]
fn extendible_duplicate_emits_warning() {
    check_duplicate_warns(ExtendibleHashIndex::new());
}

#[test]
fn linear_duplicate_emits_warning() {
    check_duplicate_warns(LinearHashIndex::new());
}

#[test]
fn ordered_split_logs_at_debug() {
    let mut index: OrderedIndex<u32, u32> =
        OrderedIndex::with_config(TreeConfig { order: 3 }).unwrap();

    let before_split = events_during(Level::DEBUG, || {
        index.insert(0, 0).unwrap();
        index.insert(1, 1).unwrap();
    });
    assert_eq!(before_split, 0);

    // Third key overflows the root leaf: one leaf split, one root split.
    let split = events_during(Level::DEBUG, || {
        index.insert(2, 2).unwrap();
    });
    assert_eq!(split, 2);
    assert_eq!(index.height(), 2);
}
