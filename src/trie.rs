//! Provides an ordered Trie for storing keys composed of sequences of atoms,
//! each key mapped to a value.
//!
//! Atoms must support the TrieAtom trait. Any `IntoIterator<Item = A>` can
//! be used as a key, so it is up to the user to pick the atom granularity
//! that makes most sense of the keys being stored:
//!  - chars
//!  - bytes or UTF-16 code units
//!  - grapheme clusters
//!  - &str ('words')
//!
//! Every node keeps its children in a singly linked sibling list sorted by
//! atom, and a key ends in a delimiter node whose only child holds the full
//! key and its value. The delimiter sorts before every atom, so iteration
//! always yields a key before the longer keys that extend it.
//!
//! Example 1
//! ```
//! use symtrie::trie::Trie;
//!
//! let mut trie = Trie::new();
//! let input = "abcdef".chars();
//! trie.insert(input.clone(), "abcdef".len()).unwrap();
//!
//! // Anything which implements IntoIterator<Item=char> can now be used
//! // to interact with our Trie
//! assert!(trie.contains(input.clone())); // Clone the original iterator
//! assert!(trie.contains("abcdef".chars())); // Create a new iterator
//! assert!(trie.contains(['a', 'b', 'c', 'd', 'e', 'f'])); // Build an array, etc...
//! assert_eq!(trie.get(['a', 'b', 'c', 'd', 'e', 'f']), Some(&"abcdef".len())); // Get our value back
//! assert_eq!(trie.remove(input.clone()), Some("abcdef".len()));
//! assert!(!trie.contains(input));
//! ```
//!
//! Example 2
//! ```
//! use symtrie::trie::Trie;
//! use unicode_segmentation::UnicodeSegmentation;
//!
//! let mut trie: Trie<&str, usize> = Trie::new();
//! let s = "a̐éö̲\r\n";
//! let input = s.graphemes(true);
//! trie.insert(input.clone(), 4).unwrap();
//! assert!(trie.contains(input.clone()));
//! assert_eq!(trie.remove(input.clone()), Some(4));
//! assert!(!trie.contains(input));
//! ```
//!
//! Example 3
//! ```
//! use symtrie::trie::Trie;
//!
//! let mut trie = Trie::new();
//! let input = "the quick brown fox".split_whitespace();
//! trie.insert(input.clone(), 4).unwrap();
//!
//! assert!(trie.contains(input.clone()));
//! assert!(!trie.contains("the quick brown".split_whitespace()));
//! assert!(trie.erase(input.clone()));
//! assert!(!trie.contains(input));
//! ```
//!
//! Inserting a key twice keeps the first value, and the empty key is
//! reserved.
//!
//! Example 4
//! ```
//! use symtrie::error::TrieError;
//! use symtrie::trie::{Trie, TrieString};
//!
//! let mut trie: TrieString<i32> = Trie::new();
//! let (inserted, first) = trie.insert("key".chars(), 1).unwrap();
//! assert!(inserted);
//! let (inserted, again) = trie.insert("key".chars(), 2).unwrap();
//! assert!(!inserted);
//! assert_eq!(first, again);
//! assert_eq!(trie.get("key".chars()), Some(&1));
//! assert_eq!(trie.insert("".chars(), 3), Err(TrieError::EmptyKey));
//! ```
//!
//! Iteration yields keys in ascending order.
//!
//! Example 5
//! ```
//! use std::iter::FromIterator;
//! use symtrie::trie::Trie;
//!
//! let trie: Trie<char, usize> = ["b", "a", "ac"]
//!     .into_iter()
//!     .map(|word| (word.chars(), word.len()))
//!     .collect();
//!
//! let keys: Vec<String> = trie.iter().map(|kv| String::from_iter(kv.key)).collect();
//! assert_eq!(keys, ["a", "ac", "b"]);
//! ```

use slab::Slab;
use std::fmt;
use tracing::{debug, trace};

use crate::error::{Result, TrieError};
use crate::iterator::{first_leaf, Iter, KeyValueRef, Position};
use crate::node::{Label, Node, NodeId, Payload};

#[cfg(feature = "serde")]
use serde_crate::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Atoms which we wish to store in a Trie must implement
/// TrieAtom.
pub trait TrieAtom: Copy + Ord {}

// Blanket implementation which satisfies the compiler
impl<A> TrieAtom for A
where
    A: Copy + Ord,
{
    // Nothing to implement, since A already supports the other traits.
    // It has the functions it needs already
}

/// Stores a key of atoms as individual nodes.
pub struct Trie<A, V> {
    pub(crate) nodes: Slab<Node<A, V>>,
    pub(crate) root: NodeId,
    count: usize,
}

/// A Trie keyed by the chars of a string.
pub type TrieString<V> = Trie<char, V>;

/// A Trie keyed by bytes.
pub type TrieBytes<V> = Trie<u8, V>;

/// A Trie keyed by UTF-16 code units.
pub type TrieUtf16<V> = Trie<u16, V>;

impl<A, V> Trie<A, V> {
    /// Create a new Trie.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new Trie with room for `capacity` nodes before the node
    /// arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Slab::with_capacity(capacity.saturating_add(1));
        let root = nodes.insert(Node::root());
        Self {
            nodes,
            root,
            count: 0,
        }
    }

    /// How many keys does the Trie contain?
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Is the Trie empty?
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Clear the Trie.
    ///
    /// Nodes are released bottom up without recursion: descend through first
    /// children to a node with none, release it, promote its next sibling to
    /// its parent's first child, and carry on from the parent.
    pub fn clear(&mut self) {
        let mut released = 0usize;
        let mut cursor = self.root;
        loop {
            let Some(node) = self.nodes.get(cursor) else {
                break;
            };
            if let Some(kid) = node.kid {
                cursor = kid;
                continue;
            }
            let Some(parent) = node.parent else {
                break;
            };
            let node = self.nodes.remove(cursor);
            self.nodes[parent].kid = node.next;
            released += 1;
            cursor = parent;
        }
        self.count = 0;
        trace!(released, "cleared trie");
    }

    /// Create an iterator over the Trie, in ascending key order.
    pub fn iter(&self) -> Iter<'_, A, V> {
        Iter::new(&self.nodes, self.begin())
    }

    /// Create an iterator starting at `position`. A stale position gives an
    /// empty iterator.
    pub fn iter_from(&self, position: Position) -> Iter<'_, A, V> {
        let cursor = self.at(position).map(|_| position.0);
        Iter::new(&self.nodes, cursor)
    }

    /// Get the entry at `position`, if it still names one.
    pub fn at(&self, position: Position) -> Option<KeyValueRef<'_, A, V>> {
        match &self.nodes.get(position.0)?.payload {
            Payload::Value { key, value } => Some(KeyValueRef { key, value }),
            Payload::Root | Payload::Path(_) => None,
        }
    }

    /// Get a mutable reference to the value at `position`, if it still
    /// names one.
    pub fn at_mut(&mut self, position: Position) -> Option<&mut V> {
        match &mut self.nodes.get_mut(position.0)?.payload {
            Payload::Value { value, .. } => Some(value),
            Payload::Root | Payload::Path(_) => None,
        }
    }

    /// The first value node in key order.
    pub(crate) fn begin(&self) -> Option<NodeId> {
        let kid = self.nodes.get(self.root)?.kid?;
        Some(first_leaf(&self.nodes, kid))
    }
}

impl<A: TrieAtom, V> Trie<A, V> {
    /// Does the Trie contain the supplied key?
    pub fn contains<K: IntoIterator<Item = A>>(&self, key: K) -> bool {
        self.search(key).is_some()
    }

    /// Find the position of a key's entry.
    pub fn find<K: IntoIterator<Item = A>>(&self, key: K) -> Option<Position> {
        self.search(key).map(Position)
    }

    /// Get a reference to a key's associated value.
    pub fn get<K: IntoIterator<Item = A>>(&self, key: K) -> Option<&V> {
        self.get_key_value(key).map(|kv| kv.value)
    }

    /// Get a mutable reference to a key's associated value.
    pub fn get_mut<K: IntoIterator<Item = A>>(&mut self, key: K) -> Option<&mut V> {
        let id = self.search(key)?;
        self.at_mut(Position(id))
    }

    /// Get the stored key and value for a key.
    pub fn get_key_value<K: IntoIterator<Item = A>>(&self, key: K) -> Option<KeyValueRef<'_, A, V>> {
        self.at(Position(self.search(key)?))
    }

    /// Like [`Trie::get_key_value`], but absence is an error.
    pub fn lookup<K: IntoIterator<Item = A>>(&self, key: K) -> Result<KeyValueRef<'_, A, V>> {
        self.get_key_value(key).ok_or(TrieError::KeyNotFound)
    }

    /// Insert the key and value into the Trie.
    ///
    /// Returns `(true, position)` for a new key. If the key is already
    /// present nothing changes: the supplied value is dropped and
    /// `(false, position)` of the existing entry is returned. The empty key
    /// is rejected with [`TrieError::EmptyKey`].
    pub fn insert<K: IntoIterator<Item = A>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<(bool, Position)> {
        let key: Vec<A> = key.into_iter().collect();
        if key.is_empty() {
            debug!("rejected insert of the empty key");
            return Err(TrieError::EmptyKey);
        }

        let mut parent = self.root;
        for &atom in &key {
            parent = self.child_or_insert(parent, Label::Symbol(atom));
        }
        let delim = self.child_or_insert(parent, Label::End);
        if let Some(existing) = self.nodes[delim].kid {
            trace!(len = key.len(), "key already present, insert ignored");
            return Ok((false, Position(existing)));
        }

        let len = key.len();
        let leaf = self.nodes.insert(Node::value(delim, key, value));
        self.nodes[delim].kid = Some(leaf);
        self.count += 1;
        trace!(len, count = self.count, "inserted key");
        Ok((true, Position(leaf)))
    }

    /// Remove the key from the Trie, returning its value if it was present.
    ///
    /// Ancestors left without children are pruned, up to the first node
    /// still shared with another key.
    pub fn remove<K: IntoIterator<Item = A>>(&mut self, key: K) -> Option<V> {
        let leaf = self.search(key)?;
        let mut removed = None;
        let mut pruned = 0usize;
        let mut cursor = leaf;
        while cursor != self.root {
            let node = &self.nodes[cursor];
            if node.kid.is_some() {
                break;
            }
            let Some(parent) = node.parent else {
                break;
            };
            self.unlink(parent, cursor);
            if let Payload::Value { value, .. } = self.nodes.remove(cursor).payload {
                removed = Some(value);
            }
            pruned += 1;
            cursor = parent;
        }
        if removed.is_some() {
            self.count -= 1;
        }
        trace!(pruned, count = self.count, "removed key");
        removed
    }

    /// Remove the key from the Trie. Returns whether it was present.
    pub fn erase<K: IntoIterator<Item = A>>(&mut self, key: K) -> bool {
        self.remove(key).is_some()
    }

    /// Walk the sibling lists one atom at a time and return the value node
    /// for `key`.
    fn search<K: IntoIterator<Item = A>>(&self, key: K) -> Option<NodeId> {
        let mut cursor = self.nodes.get(self.root)?.kid;
        for atom in key {
            let wanted = Label::Symbol(atom);
            let id = self.scan(cursor, wanted)?;
            if self.nodes[id].label() != Some(wanted) {
                return None;
            }
            cursor = self.nodes[id].kid;
        }
        let id = self.scan(cursor, Label::End)?;
        let delim = &self.nodes[id];
        if delim.is_delimiter() {
            delim.kid
        } else {
            None
        }
    }

    /// First sibling from `cursor` onwards whose label is not below `wanted`.
    fn scan(&self, mut cursor: Option<NodeId>, wanted: Label<A>) -> Option<NodeId> {
        while let Some(id) = cursor {
            let node = self.nodes.get(id)?;
            match node.label() {
                Some(label) if label < wanted => cursor = node.next,
                _ => return Some(id),
            }
        }
        None
    }

    /// Find the child of `parent` with `label`, splicing a new path node into
    /// its sorted slot if there is none.
    fn child_or_insert(&mut self, parent: NodeId, label: Label<A>) -> NodeId {
        let mut prev = None;
        let mut cursor = self.nodes[parent].kid;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            match node.label() {
                Some(existing) if existing == label => return id,
                Some(existing) if existing < label => {
                    prev = Some(id);
                    cursor = node.next;
                }
                _ => break,
            }
        }
        let id = self.nodes.insert(Node::path(parent, label, cursor));
        match prev {
            Some(prev) => self.nodes[prev].next = Some(id),
            None => self.nodes[parent].kid = Some(id),
        }
        id
    }

    /// Splice `id` out of `parent`'s sibling list.
    fn unlink(&mut self, parent: NodeId, id: NodeId) {
        let next = self.nodes[id].next;
        if self.nodes[parent].kid == Some(id) {
            self.nodes[parent].kid = next;
            return;
        }
        let mut cursor = self.nodes[parent].kid;
        while let Some(sibling) = cursor {
            if self.nodes[sibling].next == Some(id) {
                self.nodes[sibling].next = next;
                return;
            }
            cursor = self.nodes[sibling].next;
        }
    }
}

impl<A: Clone, V: Clone> Trie<A, V> {
    /// Copy every node of `source` into this (empty) Trie.
    ///
    /// Both trees are walked in lockstep: go down if we did not just come up,
    /// otherwise go sideways, otherwise climb. Each node is duplicated before
    /// it is linked into the copy.
    fn mirror(&mut self, source: &Self) {
        let mut cursor = self.root;
        let mut other = source.root;
        let mut from_below = false;
        while let Some(node) = source.nodes.get(other) {
            match (node.kid, node.next) {
                (Some(kid), _) if !from_below => {
                    let id = self.nodes.insert(source.nodes[kid].detached(Some(cursor)));
                    self.nodes[cursor].kid = Some(id);
                    other = kid;
                    cursor = id;
                }
                (_, Some(next)) => {
                    let parent = self.nodes[cursor].parent;
                    let id = self.nodes.insert(source.nodes[next].detached(parent));
                    self.nodes[cursor].next = Some(id);
                    other = next;
                    cursor = id;
                    from_below = false;
                }
                _ => match (node.parent, self.nodes[cursor].parent) {
                    (Some(up), Some(mine)) => {
                        other = up;
                        cursor = mine;
                        from_below = true;
                    }
                    _ => break,
                },
            }
        }
        self.count = source.count;
        trace!(nodes = self.nodes.len(), "cloned trie");
    }
}

impl<A, V> Default for Trie<A, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone, V: Clone> Clone for Trie<A, V> {
    fn clone(&self) -> Self {
        let mut trie = Self::with_capacity(self.nodes.len());
        trie.mirror(self);
        trie
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.mirror(source);
    }
}

impl<A: fmt::Debug, V: fmt::Debug> fmt::Debug for Trie<A, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|kv| (kv.key, kv.value)))
            .finish()
    }
}

impl<A: PartialEq, V: PartialEq> PartialEq for Trie<A, V> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.iter().eq(other.iter())
    }
}

impl<A: Eq, V: Eq> Eq for Trie<A, V> {}

/// Empty keys are skipped and duplicate keys keep their first value, as
/// with [`Trie::insert`].
impl<A: TrieAtom, V, K: IntoIterator<Item = A>> Extend<(K, V)> for Trie<A, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

impl<A: TrieAtom, V, K: IntoIterator<Item = A>> FromIterator<(K, V)> for Trie<A, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

#[cfg(feature = "serde")]
impl<A: TrieAtom + Serialize, V: Serialize> Serialize for Trie<A, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|kv| (kv.key, kv.value)))
    }
}

#[cfg(feature = "serde")]
impl<'de, A, V> Deserialize<'de> for Trie<A, V>
where
    A: TrieAtom + Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pairs = Vec::<(Vec<A>, V)>::deserialize(deserializer)?;
        let mut trie = Self::with_capacity(pairs.len());
        for (key, value) in pairs {
            trie.insert(key, value).map_err(D::Error::custom)?;
        }
        Ok(trie)
    }
}
