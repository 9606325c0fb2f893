//! Error type shared by both tries.

use thiserror::Error;

/// Failures reported by trie operations.
///
/// Inserting a key that is already present is not an error: the insert is a
/// no-op that reports `false` alongside the existing entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TrieError {
    /// The empty key marks end-of-key inside a [`crate::trie::Trie`] and
    /// cannot be inserted.
    #[error("the empty key is reserved and cannot be inserted")]
    EmptyKey,
    /// The requested key is not stored in the trie.
    #[error("trie does not contain the requested key")]
    KeyNotFound,
}

pub type Result<T> = std::result::Result<T, TrieError>;
