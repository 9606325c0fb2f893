//! Provides a binary Trie keyed by the raw bits of byte strings.
//!
//! Every byte contributes eight levels to the tree, least significant bit
//! first, and each node has exactly two child slots. Once every bit of a key
//! has been consumed, the node reached holds the key and its value. Lookups
//! are exact match only: this Trie does not keep keys in any useful order.
//!
//! ```
//! use symtrie::bitwise::BitwiseTrie;
//!
//! let mut trie = BitwiseTrie::new();
//! assert!(trie.insert("AB", 1));
//! assert!(!trie.insert("AB", 2));
//! assert_eq!(trie.get("AB"), Some(&1));
//! assert_eq!(trie.get("AC"), None);
//! assert_eq!(trie.remove(b"AB"), Some(1));
//! assert!(trie.is_empty());
//! ```

use slab::Slab;
use std::fmt;
use std::iter::FusedIterator;
use tracing::trace;

use crate::error::{Result, TrieError};
use crate::iterator::KeyValueRef;
use crate::node::NodeId;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Debug)]
struct Leaf<V> {
    key: Vec<u8>,
    value: V,
}

#[derive(Debug)]
pub(crate) struct BitNode<V> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kids: [Option<NodeId>; 2],
    delim: Option<Leaf<V>>,
}

impl<V> BitNode<V> {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            kids: [None, None],
            delim: None,
        }
    }

    /// No children and no stored key.
    pub(crate) fn is_bare(&self) -> bool {
        self.kids == [None, None] && self.delim.is_none()
    }

    /// Drop the link to `kid`, whichever slot it is in.
    fn detach(&mut self, kid: NodeId) {
        for slot in self.kids.iter_mut() {
            if *slot == Some(kid) {
                *slot = None;
            }
        }
    }
}

/// The bits of `key`, least significant bit of each byte first.
fn bits(key: &[u8]) -> impl Iterator<Item = usize> + '_ {
    key.iter()
        .flat_map(|&byte| (0..u8::BITS).map(move |shift| usize::from((byte >> shift) & 1)))
}

/// Stores byte string keys one bit per node.
pub struct BitwiseTrie<V> {
    pub(crate) nodes: Slab<BitNode<V>>,
    pub(crate) root: NodeId,
    count: usize,
}

impl<V> BitwiseTrie<V> {
    /// Create a new BitwiseTrie.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new BitwiseTrie with room for `capacity` nodes before the
    /// node arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Slab::with_capacity(capacity.saturating_add(1));
        let root = nodes.insert(BitNode::new(None));
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

    /// Insert the key and value. Returns `false`, leaving the stored value
    /// untouched, if the key is already present.
    ///
    /// The empty key is allowed and is stored on the root.
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K, value: V) -> bool {
        let key = key.as_ref();
        let mut cursor = self.root;
        for bit in bits(key) {
            cursor = match self.nodes[cursor].kids[bit] {
                Some(kid) => kid,
                None => {
                    let kid = self.nodes.insert(BitNode::new(Some(cursor)));
                    self.nodes[cursor].kids[bit] = Some(kid);
                    kid
                }
            };
        }
        let node = &mut self.nodes[cursor];
        if node.delim.is_some() {
            trace!(len = key.len(), "key already present, insert ignored");
            return false;
        }
        node.delim = Some(Leaf {
            key: key.to_vec(),
            value,
        });
        self.count += 1;
        trace!(len = key.len(), count = self.count, "inserted key");
        true
    }

    /// Find the stored key and value for `key`.
    pub fn find<K: AsRef<[u8]>>(&self, key: K) -> Option<KeyValueRef<'_, u8, V>> {
        let leaf = self.nodes.get(self.terminal(key.as_ref())?)?.delim.as_ref()?;
        Some(KeyValueRef {
            key: &leaf.key,
            value: &leaf.value,
        })
    }

    /// Like [`BitwiseTrie::find`], but absence is an error.
    pub fn lookup<K: AsRef<[u8]>>(&self, key: K) -> Result<KeyValueRef<'_, u8, V>> {
        self.find(key).ok_or(TrieError::KeyNotFound)
    }

    /// Does the Trie contain the supplied key?
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.find(key).is_some()
    }

    /// Get a reference to a key's associated value.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&V> {
        self.find(key).map(|kv| kv.value)
    }

    /// Get a mutable reference to a key's associated value.
    pub fn get_mut<K: AsRef<[u8]>>(&mut self, key: K) -> Option<&mut V> {
        let terminal = self.terminal(key.as_ref())?;
        let leaf = self.nodes.get_mut(terminal)?.delim.as_mut()?;
        Some(&mut leaf.value)
    }

    /// Remove the key, returning its value if it was present. Nodes left
    /// with no children and no key are pruned on the way back to the root.
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> Option<V> {
        let terminal = self.terminal(key.as_ref())?;
        let leaf = self.nodes.get_mut(terminal)?.delim.take()?;
        self.count -= 1;

        let mut pruned = 0usize;
        let mut cursor = terminal;
        while cursor != self.root && self.nodes[cursor].is_bare() {
            let Some(parent) = self.nodes[cursor].parent else {
                break;
            };
            self.nodes[parent].detach(cursor);
            self.nodes.remove(cursor);
            pruned += 1;
            cursor = parent;
        }
        trace!(pruned, count = self.count, "removed key");
        Some(leaf.value)
    }

    /// Remove the key. Returns whether it was present.
    pub fn erase<K: AsRef<[u8]>>(&mut self, key: K) -> bool {
        self.remove(key).is_some()
    }

    /// Clear the Trie.
    ///
    /// Walks down the 0 side first, then the 1 side, drops a node's key once
    /// both sides are gone, and then releases the node.
    pub fn clear(&mut self) {
        let mut released = 0usize;
        let mut cursor = self.root;
        loop {
            let Some(node) = self.nodes.get_mut(cursor) else {
                break;
            };
            if let Some(kid) = node.kids[0] {
                cursor = kid;
                continue;
            }
            if let Some(kid) = node.kids[1] {
                cursor = kid;
                continue;
            }
            node.delim = None;
            let Some(parent) = node.parent else {
                break;
            };
            self.nodes.remove(cursor);
            self.nodes[parent].detach(cursor);
            released += 1;
            cursor = parent;
        }
        self.count = 0;
        trace!(released, "cleared bitwise trie");
    }

    /// Create an iterator over the Trie. The order is unspecified.
    pub fn iter(&self) -> BitwiseIter<'_, V> {
        BitwiseIter {
            nodes: &self.nodes,
            pending: vec![self.root],
        }
    }

    /// The node reached after consuming every bit of `key`.
    fn terminal(&self, key: &[u8]) -> Option<NodeId> {
        let mut cursor = self.root;
        for bit in bits(key) {
            cursor = self.nodes.get(cursor)?.kids[bit]?;
        }
        Some(cursor)
    }
}

/// Iterator over a BitwiseTrie.
#[derive(Debug)]
pub struct BitwiseIter<'a, V> {
    nodes: &'a Slab<BitNode<V>>,
    pending: Vec<NodeId>,
}

impl<'a, V> Iterator for BitwiseIter<'a, V> {
    type Item = KeyValueRef<'a, u8, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        loop {
            let node = nodes.get(self.pending.pop()?)?;
            self.pending
                .extend(node.kids.iter().rev().filter_map(|kid| *kid));
            if let Some(leaf) = &node.delim {
                return Some(KeyValueRef {
                    key: &leaf.key,
                    value: &leaf.value,
                });
            }
        }
    }
}

impl<V> FusedIterator for BitwiseIter<'_, V> {}

impl<'a, V> IntoIterator for &'a BitwiseTrie<V> {
    type Item = KeyValueRef<'a, u8, V>;
    type IntoIter = BitwiseIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> Default for BitwiseTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for BitwiseTrie<V> {
    fn clone(&self) -> Self {
        let mut trie = Self::with_capacity(self.nodes.len());
        let mut pending = vec![(self.root, trie.root)];
        while let Some((from, to)) = pending.pop() {
            let Some(source) = self.nodes.get(from) else {
                continue;
            };
            trie.nodes[to].delim = source.delim.clone();
            for (bit, kid) in source.kids.iter().enumerate() {
                if let Some(kid) = *kid {
                    let copy = trie.nodes.insert(BitNode::new(Some(to)));
                    trie.nodes[to].kids[bit] = Some(copy);
                    pending.push((kid, copy));
                }
            }
        }
        trie.count = self.count;
        trace!(nodes = trie.nodes.len(), "cloned bitwise trie");
        trie
    }
}

impl<V: fmt::Debug> fmt::Debug for BitwiseTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|kv| (kv.key, kv.value)))
            .finish()
    }
}

/// The tree shape depends only on the set of keys, so equal tries iterate
/// in the same order.
impl<V: PartialEq> PartialEq for BitwiseTrie<V> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for BitwiseTrie<V> {}

impl<V, K: AsRef<[u8]>> Extend<(K, V)> for BitwiseTrie<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V, K: AsRef<[u8]>> FromIterator<(K, V)> for BitwiseTrie<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

#[cfg(feature = "serde")]
impl<V: Serialize> Serialize for BitwiseTrie<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|kv| (kv.key, kv.value)))
    }
}

#[cfg(feature = "serde")]
impl<'de, V: Deserialize<'de>> Deserialize<'de> for BitwiseTrie<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pairs = Vec::<(Vec<u8>, V)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
