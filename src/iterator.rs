//! Provides Trie iterators.
//!
//! Iteration walks the node links directly and keeps no stack: from a value
//! node, climb until some ancestor has a next sibling, then follow first
//! children down from that sibling to the next value node.
use slab::Slab;
use std::iter::FusedIterator;

use crate::node::{Node, NodeId, Payload};
use crate::trie::{Trie, TrieAtom};

/// Iterator Item
#[derive(Debug, PartialEq, Eq)]
pub struct KeyValue<A, V> {
    pub key: Vec<A>,
    pub value: V,
}

/// Iterator Item
#[derive(Debug, PartialEq, Eq)]
pub struct KeyValueRef<'a, A, V> {
    pub key: &'a [A],
    pub value: &'a V,
}

/// Identifies a stored entry.
///
/// Positions are handed out by [`Trie::insert`] and [`Trie::find`] and stay
/// valid until the trie is next mutated. Resolving a stale position never
/// panics; it yields `None` or some other entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position(pub(crate) NodeId);

/// Follow first-child links from `id` down to a node with no children.
pub(crate) fn first_leaf<A, V>(nodes: &Slab<Node<A, V>>, mut id: NodeId) -> NodeId {
    while let Some(kid) = nodes.get(id).and_then(|node| node.kid) {
        id = kid;
    }
    id
}

/// The value node following `id` in key order, if any.
pub(crate) fn successor<A, V>(nodes: &Slab<Node<A, V>>, mut id: NodeId) -> Option<NodeId> {
    loop {
        let node = nodes.get(id)?;
        if let Some(next) = node.next {
            return Some(first_leaf(nodes, next));
        }
        id = node.parent?;
    }
}

/// Forward iterator over a Trie, in ascending key order.
#[derive(Debug)]
pub struct Iter<'a, A, V> {
    nodes: &'a Slab<Node<A, V>>,
    cursor: Option<NodeId>,
}

impl<'a, A, V> Iter<'a, A, V> {
    pub(crate) fn new(nodes: &'a Slab<Node<A, V>>, cursor: Option<NodeId>) -> Self {
        Self { nodes, cursor }
    }

    /// The entry the next call to `next` will yield. `None` is the end.
    pub fn position(&self) -> Option<Position> {
        self.cursor.map(Position)
    }
}

impl<A, V> Clone for Iter<'_, A, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            cursor: self.cursor,
        }
    }
}

/// Two iterators are equal when they walk the same trie and sit on the
/// same entry.
impl<A, V> PartialEq for Iter<'_, A, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.nodes, other.nodes) && self.cursor == other.cursor
    }
}

impl<A, V> Eq for Iter<'_, A, V> {}

impl<'a, A, V> Iterator for Iter<'a, A, V> {
    type Item = KeyValueRef<'a, A, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let nodes = self.nodes;
        match nodes.get(id).map(|node| &node.payload) {
            Some(Payload::Value { key, value }) => {
                self.cursor = successor(nodes, id);
                Some(KeyValueRef { key, value })
            }
            _ => {
                self.cursor = None;
                None
            }
        }
    }
}

impl<A, V> FusedIterator for Iter<'_, A, V> {}

/// Consuming iterator over a Trie, in ascending key order.
#[derive(Debug)]
pub struct TrieIntoIterator<A, V> {
    nodes: Slab<Node<A, V>>,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<A: TrieAtom, V> IntoIterator for Trie<A, V> {
    type Item = KeyValue<A, V>;
    type IntoIter = TrieIntoIterator<A, V>;

    fn into_iter(self) -> Self::IntoIter {
        let cursor = self.begin();
        let remaining = self.count();
        TrieIntoIterator {
            nodes: self.nodes,
            cursor,
            remaining,
        }
    }
}

impl<A, V> Iterator for TrieIntoIterator<A, V> {
    type Item = KeyValue<A, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        // The successor must be found while `id` is still linked in.
        self.cursor = successor(&self.nodes, id);
        match self.nodes.try_remove(id).map(|node| node.payload) {
            Some(Payload::Value { key, value }) => {
                self.remaining = self.remaining.saturating_sub(1);
                Some(KeyValue { key, value })
            }
            _ => {
                self.cursor = None;
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<A, V> ExactSizeIterator for TrieIntoIterator<A, V> {}

impl<A, V> FusedIterator for TrieIntoIterator<A, V> {}

// Iterator
impl<'a, A: TrieAtom, V> IntoIterator for &'a Trie<A, V> {
    type Item = KeyValueRef<'a, A, V>;
    type IntoIter = Iter<'a, A, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
