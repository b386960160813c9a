/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Exact and prefix queries over an [`EncodedDawg`]: membership, value
//! lookup, enumerating keys/items under a prefix, and enumerating the
//! prefixes of a string that are themselves keys.
//!
//! The enumeration iterators are explicit-stack depth-first walks rather
//! than recursive ones, so a dictionary with keys far longer than the call
//! stack's comfortable recursion depth is still safe to enumerate.

use crate::dawg::navigator::{Outgoing, StateId};
use crate::dawg::EncodedDawg;

/// Follows `key` from the root, byte by byte. Returns `None` as soon as a
/// byte has no transition, without needing to know whether the eventual
/// state (if any) is accepting.
fn walk(dawg: &EncodedDawg, key: &[u8]) -> Option<StateId> {
    let mut state = dawg.root();
    for &b in key {
        state = dawg.transition(state, b)?;
    }
    Some(state)
}

pub fn contains(dawg: &EncodedDawg, key: &[u8]) -> bool {
    walk(dawg, key).is_some_and(|s| dawg.is_final(s))
}

pub fn get(dawg: &EncodedDawg, key: &[u8]) -> Option<Vec<u8>> {
    let state = walk(dawg, key)?;
    if !dawg.is_final(state) {
        return None;
    }
    dawg.value_of(state).map(|v| v.to_vec())
}

/// Every prefix of `s` (including `s` itself) that names a key, shortest
/// first.
pub fn prefixes(dawg: &EncodedDawg, s: &[u8]) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut state = dawg.root();
    for (i, &b) in s.iter().enumerate() {
        match dawg.transition(state, b) {
            Some(next) => {
                state = next;
                if dawg.is_final(state) {
                    out.push(s[..=i].to_vec());
                }
            }
            None => break,
        }
    }
    out
}

/// Depth-first enumeration of every key reachable below `prefix`, in
/// ascending byte order (which, since a prefix always sorts before its
/// extensions, is lexicographic order).
pub fn keys<'a>(dawg: &'a EncodedDawg, prefix: &[u8]) -> Keys<'a> {
    match walk(dawg, prefix) {
        Some(state) => Keys {
            dawg,
            stack: vec![dawg.outgoing(state)],
            path: prefix.to_vec(),
            pending_root: dawg.is_final(state).then(|| prefix.to_vec()),
        },
        None => Keys {
            dawg,
            stack: Vec::new(),
            path: Vec::new(),
            pending_root: None,
        },
    }
}

pub struct Keys<'a> {
    dawg: &'a EncodedDawg,
    stack: Vec<Outgoing<'a>>,
    path: Vec<u8>,
    /// `Some(prefix)` exactly once, when `prefix` itself is a key: the DFS
    /// below only emits on *descending into* a final child, so the walk's
    /// own starting state needs this separate nudge.
    pending_root: Option<Vec<u8>>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root_key) = self.pending_root.take() {
            return Some(root_key);
        }
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some((label, child)) => {
                    self.path.push(label);
                    self.stack.push(self.dawg.outgoing(child));
                    if self.dawg.is_final(child) {
                        return Some(self.path.clone());
                    }
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
            }
        }
        None
    }
}

/// Depth-first enumeration of every `(key, value)` pair reachable below
/// `prefix`. Mirrors [`keys`]; only returns values for dictionaries that
/// carry them (`has_values`), otherwise every value is empty.
pub fn items<'a>(dawg: &'a EncodedDawg, prefix: &[u8]) -> Items<'a> {
    match walk(dawg, prefix) {
        Some(state) => Items {
            dawg,
            stack: vec![dawg.outgoing(state)],
            path: prefix.to_vec(),
            pending_root: dawg
                .is_final(state)
                .then(|| (prefix.to_vec(), dawg.value_of(state).map(|v| v.to_vec()).unwrap_or_default())),
        },
        None => Items {
            dawg,
            stack: Vec::new(),
            path: Vec::new(),
            pending_root: None,
        },
    }
}

pub struct Items<'a> {
    dawg: &'a EncodedDawg,
    stack: Vec<Outgoing<'a>>,
    path: Vec<u8>,
    pending_root: Option<(Vec<u8>, Vec<u8>)>,
}

impl<'a> Iterator for Items<'a> {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pair) = self.pending_root.take() {
            return Some(pair);
        }
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some((label, child)) => {
                    self.path.push(label);
                    self.stack.push(self.dawg.outgoing(child));
                    if self.dawg.is_final(child) {
                        let value = self.dawg.value_of(child).map(|v| v.to_vec()).unwrap_or_default();
                        return Some((self.path.clone(), value));
                    }
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
            }
        }
        None
    }
}
