use crate::bitwise::BitwiseTrie;
use crate::error::TrieError;
use crate::node::{Label, Payload};
use crate::trie::{Trie, TrieAtom};

use proptest::prelude::*;
use std::collections::BTreeMap;

fn validate_trie<A: TrieAtom, V>(t: &Trie<A, V>) {
    let mut reachable = 0usize;
    let mut values = 0usize;
    let mut stack = vec![t.root];

    while let Some(id) = stack.pop() {
        reachable += 1;
        let node = &t.nodes[id];

        let mut prev: Option<Label<A>> = None;
        let mut kid = node.kid;
        while let Some(k) = kid {
            let child = &t.nodes[k];
            assert_eq!(child.parent, Some(id), "child must point back at its parent");
            if let (Some(prev), Some(label)) = (prev, child.label()) {
                assert!(prev < label, "siblings must be strictly ascending");
            }
            prev = child.label();
            stack.push(k);
            kid = child.next;
        }

        match &node.payload {
            Payload::Root => {
                assert_eq!(id, t.root);
                assert_eq!(node.parent, None, "root has no parent");
                assert_eq!(node.next, None, "root has no siblings");
            }
            Payload::Path(label) => {
                assert!(node.parent.is_some(), "non-root node without a parent");
                let kid = node.kid.expect("empty path nodes must be pruned");
                let child = &t.nodes[kid];
                match label {
                    Label::End => {
                        assert!(
                            matches!(child.payload, Payload::Value { .. }),
                            "delimiter must hold a value"
                        );
                        assert_eq!(child.next, None, "value must be the only child");
                    }
                    Label::Symbol(_) => assert!(
                        !matches!(child.payload, Payload::Value { .. }),
                        "values hang off delimiters only"
                    ),
                }
            }
            Payload::Value { key, .. } => {
                values += 1;
                assert!(!key.is_empty(), "the empty key is never stored");
                assert_eq!(node.kid, None, "values have no children");
                let parent = node.parent.expect("value without a parent");
                assert!(t.nodes[parent].is_delimiter());
            }
        }
    }

    assert_eq!(reachable, t.nodes.len(), "every arena slot must be reachable");
    assert_eq!(values, t.count(), "value count must match Trie::count");
}

fn validate_bitwise<V>(t: &BitwiseTrie<V>) {
    let mut reachable = 0usize;
    let mut stack = vec![t.root];
    while let Some(id) = stack.pop() {
        reachable += 1;
        let node = &t.nodes[id];
        if id != t.root {
            assert!(!node.is_bare(), "bare nodes must be pruned");
        }
        for kid in node.kids.iter().flatten() {
            assert_eq!(t.nodes[*kid].parent, Some(id));
            stack.push(*kid);
        }
    }
    assert_eq!(reachable, t.nodes.len(), "every arena slot must be reachable");
    assert_eq!(t.iter().count(), t.count());
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>, u64),
    Remove(Vec<u8>),
    Get(Vec<u8>),
    Clear,
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A small alphabet so that keys share prefixes and collide often.
    prop::collection::vec(0u8..4, 0..=6)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        24 => key.prop_map(Op::Get),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=300)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_trie_equivalence(ops in ops_strategy()) {
        let mut t: Trie<u8, u64> = Trie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => match t.insert(key.clone(), value) {
                    Err(err) => {
                        prop_assert!(key.is_empty());
                        prop_assert_eq!(err, TrieError::EmptyKey);
                    }
                    Ok((inserted, position)) => {
                        prop_assert_eq!(inserted, !m.contains_key(&key));
                        let kept = *m.entry(key.clone()).or_insert(value);
                        let entry = t.at(position).expect("insert returns a live position");
                        prop_assert_eq!(entry.key, key.as_slice());
                        prop_assert_eq!(*entry.value, kept);
                    }
                },
                Op::Remove(key) => {
                    let old_t = t.remove(key.clone());
                    let old_m = m.remove(&key);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(key.clone()), m.get(&key));
                    prop_assert_eq!(t.contains(key.clone()), m.contains_key(&key));
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }

            validate_trie(&t);
            prop_assert_eq!(t.count(), m.len());
        }

        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|kv| (kv.key.to_vec(), *kv.value)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&got, &expected);

        let copy = t.clone();
        validate_trie(&copy);
        prop_assert_eq!(&copy, &t);
        let owned: Vec<(Vec<u8>, u64)> = copy.into_iter().map(|kv| (kv.key, kv.value)).collect();
        prop_assert_eq!(owned, expected);
    }

    #[test]
    fn prop_clone_independence(keys in prop::collection::vec(key_strategy(), 1..=40), extra in key_strategy()) {
        let original: Trie<u8, usize> = keys.iter().cloned().zip(0..).collect();
        let before: Vec<(Vec<u8>, usize)> = original.iter().map(|kv| (kv.key.to_vec(), *kv.value)).collect();

        let mut copy = original.clone();
        for key in &keys {
            copy.erase(key.clone());
        }
        let _ = copy.insert(extra, usize::MAX);
        validate_trie(&copy);

        let after: Vec<(Vec<u8>, usize)> = original.iter().map(|kv| (kv.key.to_vec(), *kv.value)).collect();
        prop_assert_eq!(before, after);
        validate_trie(&original);
    }

    #[test]
    fn prop_bitwise_equivalence(ops in ops_strategy()) {
        let mut t: BitwiseTrie<u64> = BitwiseTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let inserted = t.insert(&key, value);
                    prop_assert_eq!(inserted, !m.contains_key(&key));
                    m.entry(key).or_insert(value);
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }

            validate_bitwise(&t);
            prop_assert_eq!(t.count(), m.len());
        }

        let got: BTreeMap<Vec<u8>, u64> = t.iter().map(|kv| (kv.key.to_vec(), *kv.value)).collect();
        prop_assert_eq!(&got, &m);

        let copy = t.clone();
        validate_bitwise(&copy);
        prop_assert_eq!(&copy, &t);
    }
}
