//! In-memory B+Tree map.
//!
//! [`OrderedIndex`] keeps every entry in its leaves, all of which sit at the
//! same depth. Internal nodes only route: a node with `k` separator keys has
//! `k + 1` children, and the child at position `i` holds keys in
//! `[keys[i - 1], keys[i])`.
//!
//! A full node is cut at its median when one more key arrives. The median is
//! promoted into the parent, and the split can cascade up to the root, which
//! then grows the tree by one level. The insert path is the recursion stack,
//! so promotion walks straight back up without searching from the root again.

mod iter;
mod node;

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::ops::{Bound, RangeBounds};

use prettytable::{Table, row};

use crate::mem_stat::MemStat;
use crate::util::AccessCounter;
use crate::{IndexError, KeyValueIndex, TreeConfig};

pub use iter::Iter;
use node::{Insertion, Node, child_index};

#[derive(Debug, Clone)]
pub struct OrderedIndex<K, V> {
    root: Node<K, V>,
    config: TreeConfig,
    /// Count of resident entries.
    len: usize,
    /// Nodes visited by lookups.
    accesses: AccessCounter,
}

impl<K, V> Default for OrderedIndex<K, V>
where
    K: Ord + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderedIndex<K, V>
where
    K: Ord + Clone + Debug,
{
    /// Creates an empty tree with the default order of 5.
    pub fn new() -> Self {
        Self::from_config(TreeConfig::default())
    }

    /// Creates an empty tree with the given configuration.
    pub fn with_config(config: TreeConfig) -> Result<Self, IndexError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: TreeConfig) -> Self {
        Self {
            root: Node::empty_leaf(config.max_keys()),
            config,
            len: 0,
            accesses: AccessCounter::new(),
        }
    }

    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Number of levels. A tree that is a single leaf has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while let Node::Internal(internal) = node {
            height += 1;
            node = &internal.children[0];
        }
        height
    }

    /// Smallest key, or `None` if the tree is empty.
    pub fn first_key(&self) -> Option<&K> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Internal(internal) => node = internal.children.first()?,
                Node::Leaf(leaf) => return leaf.keys.first(),
            }
        }
    }

    /// Largest key, or `None` if the tree is empty.
    pub fn last_key(&self) -> Option<&K> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Internal(internal) => node = internal.children.last()?,
                Node::Leaf(leaf) => return leaf.keys.last(),
            }
        }
    }

    /// Entries with keys in `range`, ascending.
    ///
    /// Only subtrees whose key interval intersects `range` are visited. An
    /// empty or inverted range yields nothing.
    pub fn range<R>(&self, range: R) -> std::vec::IntoIter<(&K, &V)>
    where
        R: RangeBounds<K>,
    {
        let mut out = Vec::new();
        self.root.collect_range(&range, &mut out);
        out.into_iter()
    }

    /// Snapshot of entries with `key < to_key`.
    pub fn head_map(&self, to_key: &K) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        self.snapshot((Bound::Unbounded, Bound::Excluded(to_key)))
    }

    /// Snapshot of entries with `from_key <= key`.
    pub fn tail_map(&self, from_key: &K) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        self.snapshot((Bound::Included(from_key), Bound::Unbounded))
    }

    /// Snapshot of entries with `from_key <= key < to_key`.
    pub fn sub_map(&self, from_key: &K, to_key: &K) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        self.snapshot((Bound::Included(from_key), Bound::Excluded(to_key)))
    }

    fn snapshot(&self, range: (Bound<&K>, Bound<&K>)) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        self.range(range)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn accesses(&self) -> usize {
        self.accesses.get()
    }

    pub fn reset_accesses(&self) -> usize {
        self.accesses.reset()
    }

    /// Pre-order listing of nodes for debugging. The format is not stable.
    pub fn dump(&self) -> String {
        let mut table = Table::new();
        table.set_titles(row!["level", "kind", "keys"]);
        dump_node(&self.root, 0, &mut table);
        table.to_string()
    }
}

fn dump_node<K: Debug, V>(node: &Node<K, V>, level: usize, table: &mut Table) {
    let kind = if node.is_leaf() { "leaf" } else { "internal" };
    table.add_row(row![level, kind, format!("{:?}", node.keys())]);
    if let Node::Internal(internal) = node {
        for child in &internal.children {
            dump_node(child, level + 1, table);
        }
    }
}

impl<K, V> KeyValueIndex<K, V> for OrderedIndex<K, V>
where
    K: Ord + Clone + Debug,
{
    fn insert(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        match self.root.insert(key, value, self.config.max_keys()) {
            Insertion::Inserted => {}
            Insertion::Duplicate(key, value) => {
                tracing::warn!(?key, "Attempt to insert duplicate key into ordered index");
                return Err((key, value));
            }
            Insertion::Split { separator, right } => {
                tracing::debug!(?separator, height = self.height() + 1, "Root split");
                self.root.grow(separator, right);
            }
        }
        self.len += 1;
        Ok(())
    }

    fn get(&self, key: &K) -> Option<&V> {
        let mut node = &self.root;
        loop {
            self.accesses.hit();
            match node {
                Node::Internal(internal) => {
                    node = &internal.children[child_index(&internal.keys, key)];
                }
                Node::Leaf(leaf) => {
                    return leaf
                        .keys
                        .binary_search(key)
                        .ok()
                        .map(|pos| &leaf.values[pos]);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        Iter::new(&self.root, self.len)
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedIndex<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(&self.root, self.len)
    }
}

impl<K, V> Extend<(K, V)> for OrderedIndex<K, V>
where
    K: Ord + Clone + Debug,
{
    /// Inserts every pair; pairs with an already present key are dropped.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedIndex<K, V>
where
    K: Ord + Clone + Debug,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<K, V> MemStat for OrderedIndex<K, V>
where
    K: MemStat,
    V: MemStat,
{
    fn heap_size(&self) -> usize {
        self.root.heap_size()
    }

    fn used_size(&self) -> usize {
        self.root.used_size()
    }
}
