/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Daciuk-style incremental minimization: builds a minimal DAWG from a
//! stream of sorted, deduplicated `(key, value?)` pairs.

use std::collections::HashMap;

use log::debug;

use crate::dawg::node::{BuildNode, FinalizedNode, NodeId, Signature};
use crate::error::{Error, Result};

/// Maximum number of transitions the builder will create before refusing to
/// continue. Matches the 32-bit `target` field of the serialized format: a
/// dictionary with more transitions than this could never round-trip
/// through `to_bytes`/`from_bytes` anyway.
const MAX_TRANSITIONS: u64 = (u32::MAX - 1) as u64;

/// One entry on the builder's current path: the byte that led to this node
/// from its (still open) parent, and the node itself. The root's entry has
/// no incoming byte.
struct PathEntry {
    incoming_byte: Option<u8>,
    node: BuildNode,
}

/// Incrementally minimizes a DAWG from keys delivered in ascending byte
/// order. Not reentrant and not meant to be shared across threads: build
/// one dictionary, then discard the builder.
pub struct Builder {
    path: Vec<PathEntry>,
    previous_key: Option<Vec<u8>>,
    register: HashMap<Signature, NodeId>,
    arena: Vec<FinalizedNode>,
    has_values: bool,
    transitions_created: u64,
}

/// Output of a completed build: the finalized node arena plus the id of the
/// root. Handed to the encoder, which never needs to see the register or
/// any in-progress [`BuildNode`] again.
pub struct BuiltDawg {
    pub arena: Vec<FinalizedNode>,
    pub root: NodeId,
    pub has_values: bool,
}

impl Builder {
    pub fn new(has_values: bool) -> Self {
        Builder {
            path: vec![PathEntry {
                incoming_byte: None,
                node: BuildNode::default(),
            }],
            previous_key: None,
            register: HashMap::new(),
            arena: Vec::new(),
            has_values,
            transitions_created: 0,
        }
    }

    /// Inserts the next `(key, value)` pair. Keys must arrive in strictly
    /// ascending byte order with no duplicates; violating that is an
    /// [`Error::InvalidInput`], not a panic, since callers with unsorted data
    /// are expected to hit this during development.
    pub fn insert(&mut self, key: &[u8], value: Option<Vec<u8>>) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidInput(
                "empty keys are not permitted".to_string(),
            ));
        }
        if key.contains(&0) {
            return Err(Error::InvalidInput(
                "keys must not contain a null byte".to_string(),
            ));
        }
        if value.is_some() != self.has_values {
            return Err(Error::InvalidInput(
                "value presence must be consistent across all inserted keys".to_string(),
            ));
        }

        let common_prefix_len = match &self.previous_key {
            None => 0,
            Some(prev) => {
                let p = common_prefix_len(prev, key);
                match prev.as_slice().cmp(key) {
                    std::cmp::Ordering::Equal => {
                        return Err(Error::InvalidInput(format!(
                            "duplicate key: {:?}",
                            key
                        )))
                    }
                    std::cmp::Ordering::Greater => {
                        return Err(Error::InvalidInput(
                            "keys must be inserted in strictly ascending byte order".to_string(),
                        ))
                    }
                    std::cmp::Ordering::Less => {}
                }
                p
            }
        };

        self.freeze_to(common_prefix_len)?;

        for &b in &key[common_prefix_len..] {
            self.path.push(PathEntry {
                incoming_byte: Some(b),
                node: BuildNode::default(),
            });
        }

        let leaf = self.path.last_mut().expect("path always has the leaf");
        leaf.node.is_final = true;
        leaf.node.value = value;

        self.previous_key = Some(key.to_vec());
        Ok(())
    }

    /// Finalizes the remainder of the path (including the root) and returns
    /// the built automaton.
    pub fn finish(mut self) -> Result<BuiltDawg> {
        self.freeze_to(0)?;
        let root_entry = self.path.pop().expect("root always present");
        debug_assert!(self.path.is_empty());
        let root_finalized = root_entry.node.into_finalized();
        let root_id = self.register_or_insert(root_finalized)?;
        debug!(
            "dawg build finished: {} distinct states, {} transitions",
            self.arena.len(),
            self.transitions_created
        );
        Ok(BuiltDawg {
            arena: self.arena,
            root: root_id,
            has_values: self.has_values,
        })
    }

    /// Pops and finalizes every path entry deeper than `depth`, attaching
    /// each resulting id as the next transition of its (now top-of-stack)
    /// parent.
    fn freeze_to(&mut self, depth: usize) -> Result<()> {
        while self.path.len() > depth + 1 {
            let entry = self.path.pop().expect("loop guard ensures len > depth+1 >= 1");
            let byte = entry
                .incoming_byte
                .expect("only the root lacks an incoming byte, and it is never popped here");
            let finalized = entry.node.into_finalized();
            let id = self.register_or_insert(finalized)?;
            let parent = self.path.last_mut().expect("root always remains");
            parent.node.children.push((byte, id));
            self.transitions_created += 1;
            if self.transitions_created > MAX_TRANSITIONS {
                return Err(Error::InvalidInput(
                    "dictionary would exceed the maximum representable number of transitions"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    fn register_or_insert(&mut self, node: FinalizedNode) -> Result<NodeId> {
        let signature = Signature::of(&node);
        if let Some(&id) = self.register.get(&signature) {
            return Ok(id);
        }
        let id = NodeId(self.arena.len() as u32);
        self.arena.push(node);
        self.register.insert(signature, id);
        Ok(id)
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Builds from an already-sorted, deduplicated iterator of `(key, value?)`
/// pairs. Equivalent to calling [`Builder::insert`] in a loop followed by
/// [`Builder::finish`]; provided for convenience and to match the `sorted =
/// true` fast path described in the component design.
pub fn build_sorted<I>(has_values: bool, pairs: I) -> Result<BuiltDawg>
where
    I: IntoIterator<Item = (Vec<u8>, Option<Vec<u8>>)>,
{
    let mut builder = Builder::new(has_values);
    for (key, value) in pairs {
        builder.insert(&key, value)?;
    }
    builder.finish()
}

/// Builds from an iterator of `(key, value?)` pairs that may be unsorted.
/// The whole batch is buffered, sorted, and checked for duplicates before
/// insertion, matching the `sorted = false` caller option.
pub fn build_unsorted<I>(has_values: bool, pairs: I) -> Result<BuiltDawg>
where
    I: IntoIterator<Item = (Vec<u8>, Option<Vec<u8>>)>,
{
    let mut items: Vec<(Vec<u8>, Option<Vec<u8>>)> = pairs.into_iter().collect();
    items.sort_by(|a, b| a.0.cmp(&b.0));
    if items.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(Error::InvalidInput(
            "duplicate key in input batch".to_string(),
        ));
    }
    build_sorted(has_values, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(b: &BuiltDawg, id: NodeId, prefix: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        let node = &b.arena[id.0 as usize];
        if node.is_final {
            out.push(prefix.clone());
        }
        for &(byte, child) in &node.children {
            prefix.push(byte);
            keys(b, child, prefix, out);
            prefix.pop();
        }
    }

    fn built_keys(b: &BuiltDawg) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        keys(b, b.root, &mut Vec::new(), &mut out);
        out
    }

    #[test]
    fn accepts_exactly_the_input_set() {
        let built = build_sorted(
            false,
            [b"bar".to_vec(), b"f".to_vec(), b"foo".to_vec(), b"foobar".to_vec()]
                .into_iter()
                .map(|k| (k, None)),
        )
        .unwrap();
        let mut got = built_keys(&built);
        got.sort();
        assert_eq!(got, vec![b"bar".to_vec(), b"f".to_vec(), b"foo".to_vec(), b"foobar".to_vec()]);
    }

    #[test]
    fn shares_common_suffixes() {
        // "ab" and "cb" share the suffix state for trailing "b".
        let built = build_sorted(
            false,
            [b"ab".to_vec(), b"cb".to_vec()].into_iter().map(|k| (k, None)),
        )
        .unwrap();
        // Fewer states than a naive (non-minimized) trie would need (1 root + 2 + 2 = 5).
        assert!(built.arena.len() < 5);
    }

    #[test]
    fn rejects_null_byte() {
        let err = build_sorted(false, [(b"foo\x00bar".to_vec(), None)]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn rejects_duplicate() {
        let err = build_sorted(
            false,
            [b"bar".to_vec(), b"bar".to_vec()].into_iter().map(|k| (k, None)),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn rejects_unsorted_when_sorted_requested() {
        let err = build_sorted(
            false,
            [b"foo".to_vec(), b"bar".to_vec()].into_iter().map(|k| (k, None)),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn rejects_empty_key() {
        let err = build_sorted(false, [(Vec::new(), None)]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn build_unsorted_sorts_and_dedups_check() {
        let built = build_unsorted(
            false,
            [b"foo".to_vec(), b"bar".to_vec()].into_iter().map(|k| (k, None)),
        )
        .unwrap();
        let mut got = built_keys(&built);
        got.sort();
        assert_eq!(got, vec![b"bar".to_vec(), b"foo".to_vec()]);
    }
}
