use std::fmt::Debug;
use std::mem;
use std::ops::{Bound, RangeBounds};

use crate::mem_stat::MemStat;

/// B+Tree node. Leaves hold the entries, internal nodes hold separators and
/// exactly `keys.len() + 1` children.
#[derive(Debug, Clone)]
pub(super) enum Node<K, V> {
    Leaf(Leaf<K, V>),
    Internal(Internal<K, V>),
}

#[derive(Debug, Clone)]
pub(super) struct Leaf<K, V> {
    pub keys: Vec<K>,
    pub values: Vec<V>,
}

#[derive(Debug, Clone)]
pub(super) struct Internal<K, V> {
    pub keys: Vec<K>,
    pub children: Vec<Node<K, V>>,
}

/// Outcome of inserting into a subtree.
pub(super) enum Insertion<K, V> {
    Inserted,
    Duplicate(K, V),
    /// The subtree root overflowed and was cut in two. `right` must be placed
    /// next to it in the parent under `separator`.
    Split { separator: K, right: Node<K, V> },
}

/// Index of the child whose key interval contains `key`. A key equal to a
/// separator lives to the right of it.
pub(super) fn child_index<K: Ord>(keys: &[K], key: &K) -> usize {
    keys.partition_point(|k| k <= key)
}

impl<K, V> Node<K, V> {
    pub fn empty_leaf(max_keys: usize) -> Self {
        Node::Leaf(Leaf {
            keys: Vec::with_capacity(max_keys + 1),
            values: Vec::with_capacity(max_keys + 1),
        })
    }

    pub fn keys(&self) -> &[K] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Internal(internal) => &internal.keys,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

impl<K, V> Node<K, V>
where
    K: Ord + Clone + Debug,
{
    pub fn insert(&mut self, key: K, value: V, max_keys: usize) -> Insertion<K, V> {
        match self {
            Node::Leaf(leaf) => leaf.insert(key, value, max_keys),
            Node::Internal(internal) => internal.insert(key, value, max_keys),
        }
    }

    /// Appends every entry of this subtree that falls in `range`, in key order.
    /// Children whose key interval cannot intersect `range` are skipped.
    pub fn collect_range<'a, R>(&'a self, range: &R, out: &mut Vec<(&'a K, &'a V)>)
    where
        R: RangeBounds<K>,
    {
        match self {
            Node::Leaf(leaf) => out.extend(
                leaf.keys
                    .iter()
                    .zip(leaf.values.iter())
                    .filter(|(k, _)| range.contains(*k)),
            ),
            Node::Internal(internal) => {
                for (i, child) in internal.children.iter().enumerate() {
                    let lower = i.checked_sub(1).map(|j| &internal.keys[j]);
                    let upper = internal.keys.get(i);
                    if ends_before_start(upper, range.start_bound()) {
                        continue;
                    }
                    if starts_after_end(lower, range.end_bound()) {
                        break;
                    }
                    child.collect_range(range, out);
                }
            }
        }
    }
}

/// Child keys are all `< upper`.
fn ends_before_start<K: Ord>(upper: Option<&K>, start: Bound<&K>) -> bool {
    match (upper, start) {
        (Some(upper), Bound::Included(start) | Bound::Excluded(start)) => upper <= start,
        _ => false,
    }
}

/// Child keys are all `>= lower`.
fn starts_after_end<K: Ord>(lower: Option<&K>, end: Bound<&K>) -> bool {
    match (lower, end) {
        (Some(lower), Bound::Included(end)) => lower > end,
        (Some(lower), Bound::Excluded(end)) => lower >= end,
        _ => false,
    }
}

impl<K, V> Leaf<K, V>
where
    K: Ord + Clone + Debug,
{
    fn insert(&mut self, key: K, value: V, max_keys: usize) -> Insertion<K, V> {
        match self.keys.binary_search(&key) {
            Ok(_) => Insertion::Duplicate(key, value),
            Err(pos) => {
                self.keys.insert(pos, key);
                self.values.insert(pos, value);
                if self.keys.len() > max_keys {
                    self.split(max_keys)
                } else {
                    Insertion::Inserted
                }
            }
        }
    }

    /// Left keeps the keys below the median, right gets the median and
    /// everything above it. The median is copied up as separator.
    fn split(&mut self, max_keys: usize) -> Insertion<K, V> {
        let mid = self.keys.len() / 2;
        let mut right_keys = Vec::with_capacity(max_keys + 1);
        let mut right_values = Vec::with_capacity(max_keys + 1);
        right_keys.extend(self.keys.drain(mid..));
        right_values.extend(self.values.drain(mid..));
        let separator = right_keys[0].clone();

        tracing::debug!(?separator, "Leaf split");

        Insertion::Split {
            separator,
            right: Node::Leaf(Leaf {
                keys: right_keys,
                values: right_values,
            }),
        }
    }
}

impl<K, V> Internal<K, V>
where
    K: Ord + Clone + Debug,
{
    fn insert(&mut self, key: K, value: V, max_keys: usize) -> Insertion<K, V> {
        let idx = child_index(&self.keys, &key);
        match self.children[idx].insert(key, value, max_keys) {
            Insertion::Split { separator, right } => {
                self.keys.insert(idx, separator);
                self.children.insert(idx + 1, right);
                if self.keys.len() > max_keys {
                    self.split(max_keys)
                } else {
                    Insertion::Inserted
                }
            }
            other => other,
        }
    }

    /// The median moves up; it stays in neither half.
    fn split(&mut self, max_keys: usize) -> Insertion<K, V> {
        let mid = self.keys.len() / 2;
        let mut right_keys = Vec::with_capacity(max_keys + 1);
        let mut right_children = Vec::with_capacity(max_keys + 2);
        right_keys.extend(self.keys.drain(mid + 1..));
        right_children.extend(self.children.drain(mid + 1..));
        let separator = self.keys.remove(mid);

        tracing::debug!(?separator, "Internal node split");

        Insertion::Split {
            separator,
            right: Node::Internal(Internal {
                keys: right_keys,
                children: right_children,
            }),
        }
    }
}

impl<K, V> Node<K, V> {
    /// Replaces `self` with an internal node over `self` and `right`.
    pub fn grow(&mut self, separator: K, right: Node<K, V>) {
        let left = mem::replace(
            self,
            Node::Leaf(Leaf {
                keys: Vec::new(),
                values: Vec::new(),
            }),
        );
        *self = Node::Internal(Internal {
            keys: vec![separator],
            children: vec![left, right],
        });
    }
}

impl<K, V> MemStat for Node<K, V>
where
    K: MemStat,
    V: MemStat,
{
    fn heap_size(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.keys.heap_size() + leaf.values.heap_size(),
            Node::Internal(internal) => internal.keys.heap_size() + internal.children.heap_size(),
        }
    }

    fn used_size(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.keys.used_size() + leaf.values.used_size(),
            Node::Internal(internal) => internal.keys.used_size() + internal.children.used_size(),
        }
    }
}
