//! Node model shared by the ordered trie and its iterators.
//!
//! Nodes are stored in a [`slab::Slab`] and refer to each other by index.
//! The `kid` (first child) and `next` (next sibling) links are the owning
//! edges of the tree; `parent` is only ever used to walk upwards.

/// Index of a node within a trie's arena.
pub(crate) type NodeId = usize;

/// The sibling ordering key of a path node.
///
/// `End` is the end-of-key delimiter. Variant order makes it sort before
/// every symbol, so a delimiter is always the head of its sibling list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Label<A> {
    End,
    Symbol(A),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Payload<A, V> {
    Root,
    Path(Label<A>),
    Value { key: Vec<A>, value: V },
}

#[derive(Debug)]
pub(crate) struct Node<A, V> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) kid: Option<NodeId>,
    pub(crate) payload: Payload<A, V>,
}

impl<A, V> Node<A, V> {
    pub(crate) fn root() -> Self {
        Self::with_payload(None, Payload::Root)
    }

    pub(crate) fn path(parent: NodeId, label: Label<A>, next: Option<NodeId>) -> Self {
        Self {
            next,
            ..Self::with_payload(Some(parent), Payload::Path(label))
        }
    }

    pub(crate) fn value(parent: NodeId, key: Vec<A>, value: V) -> Self {
        Self::with_payload(Some(parent), Payload::Value { key, value })
    }

    fn with_payload(parent: Option<NodeId>, payload: Payload<A, V>) -> Self {
        Self {
            parent,
            next: None,
            kid: None,
            payload,
        }
    }

    pub(crate) fn is_delimiter(&self) -> bool {
        matches!(self.payload, Payload::Path(Label::End))
    }
}

impl<A: Copy, V> Node<A, V> {
    /// The label used to order this node among its siblings. Only path
    /// nodes (including delimiters) take part in sibling ordering.
    pub(crate) fn label(&self) -> Option<Label<A>> {
        match self.payload {
            Payload::Path(label) => Some(label),
            Payload::Root | Payload::Value { .. } => None,
        }
    }
}

impl<A: Clone, V: Clone> Node<A, V> {
    /// Duplicate the payload into a fresh, unlinked node under `parent`.
    pub(crate) fn detached(&self, parent: Option<NodeId>) -> Self {
        Self::with_payload(parent, self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_orders_delimiter_before_every_symbol() {
        assert!(Label::End < Label::Symbol('\0'));
        assert!(Label::End < Label::Symbol(0u8));
        assert!(Label::Symbol('a') < Label::Symbol('b'));
    }

    #[test]
    fn it_only_labels_path_nodes() {
        let root: Node<char, ()> = Node::root();
        assert_eq!(root.label(), None);
        assert!(!root.is_delimiter());

        let delim: Node<char, ()> = Node::path(0, Label::End, None);
        assert_eq!(delim.label(), Some(Label::End));
        assert!(delim.is_delimiter());

        let leaf = Node::value(1, vec!['a'], 7);
        assert_eq!(leaf.label(), None);
        assert!(!leaf.is_delimiter());
    }

    #[test]
    fn it_detaches_a_clone_from_its_links() {
        let node: Node<char, usize> = Node {
            parent: Some(3),
            next: Some(4),
            kid: Some(5),
            payload: Payload::Value {
                key: vec!['x'],
                value: 9,
            },
        };
        let copy = node.detached(Some(1));
        assert_eq!(copy.parent, Some(1));
        assert_eq!(copy.next, None);
        assert_eq!(copy.kid, None);
        assert_eq!(copy.payload, node.payload);
    }
}
