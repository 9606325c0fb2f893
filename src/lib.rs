//! Provides two in-memory Tries mapping keys to values.
//!
//! [`crate::trie::Trie`] stores keys composed of a sequence of atoms. Each
//! node keeps its children in a sibling list sorted by atom, so iteration
//! yields keys in ascending order. Atoms must support the
//! [`crate::trie::TrieAtom`] trait; values can be anything.
//!
//! [`crate::bitwise::BitwiseTrie`] stores byte string keys one bit per node
//! and is meant for exact-match lookups only.
//!
//! The interface relies on iterators to insert, remove, check for existence
//! of keys. Because the trie is based on the concept of atoms, then it
//! is up to the user to decide what kind of atoms to use to make most sense
//! of the keys we are storing (`char`, `u8`, `u16`, grapheme `&str`s, ...).
//!
//! Since the most common use of a tries is to store the chars of a String,
//! a convenience type, [`crate::trie::TrieString`] is provided, along with
//! [`crate::trie::TrieBytes`] and [`crate::trie::TrieUtf16`].
//!
//! Nodes live in an arena and link to each other by index. Every traversal
//! (lookup, insertion, removal, clearing, cloning and iteration) is a loop,
//! so very long keys cannot overflow the stack.
//!
//! Examples:
//! * trie : [`crate::trie`]
//! * iterator : [`crate::iterator`]
//! * bitwise : [`crate::bitwise`]
//!
//! Enable the `serde` feature to serialize either Trie as a sequence of
//! `(key, value)` pairs.

#[cfg(feature = "serde")]
extern crate serde_crate;

pub mod bitwise;

pub mod error;

pub mod iterator;

mod node;

pub mod trie;

#[cfg(test)]
mod proptests;
