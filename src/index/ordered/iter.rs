use std::iter::{FusedIterator, Zip};
use std::slice;

use super::node::Node;

/// Ascending-key iterator over an [`OrderedIndex`].
///
/// [`OrderedIndex`]: crate::OrderedIndex
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Children still to visit, one iterator per internal level.
    stack: Vec<slice::Iter<'a, Node<K, V>>>,
    leaf: Option<Zip<slice::Iter<'a, K>, slice::Iter<'a, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(root: &'a Node<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            leaf: None,
            remaining: len,
        };
        iter.descend(root);
        iter
    }

    fn descend(&mut self, node: &'a Node<K, V>) {
        match node {
            Node::Leaf(leaf) => self.leaf = Some(leaf.keys.iter().zip(leaf.values.iter())),
            Node::Internal(internal) => self.stack.push(internal.children.iter()),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(leaf) = &mut self.leaf {
                if let Some(entry) = leaf.next() {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some(entry);
                }
                self.leaf = None;
            }
            match self.stack.last_mut()?.next() {
                Some(child) => self.descend(child),
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
