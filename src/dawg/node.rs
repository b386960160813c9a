/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Builder-side node representations: the finalized arena and the
//! structural signature used to hash-cons equivalent subautomata.

/// Id of a finalized node within the builder's arena. Stable for the
/// lifetime of the build; consumed by the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// A node that has been finalized: its transition list is complete and will
/// never change again. Equal (final, value, children) tuples are shared via
/// the register, so distinct `NodeId`s always denote structurally distinct
/// subautomata.
#[derive(Clone, Debug)]
pub struct FinalizedNode {
    pub is_final: bool,
    pub value: Option<Vec<u8>>,
    /// Ascending by byte label, each pointing at an already-finalized child.
    pub children: Vec<(u8, NodeId)>,
}

/// Canonical structural signature of a finalized node, used as the register
/// key. Two nodes with equal signatures are interchangeable, which is
/// exactly the minimization invariant from the data model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    is_final: bool,
    value: Option<Vec<u8>>,
    children: Vec<(u8, NodeId)>,
}

impl Signature {
    pub fn of(node: &FinalizedNode) -> Self {
        Signature {
            is_final: node.is_final,
            value: node.value.clone(),
            children: node.children.clone(),
        }
    }
}

/// A node still under construction: the path from the root to the key
/// currently being inserted is made of these. Its children list grows by
/// appending already-finalized ids (in increasing byte order, because the
/// builder only ever freezes the previous sibling before opening the next).
#[derive(Debug, Default)]
pub struct BuildNode {
    pub is_final: bool,
    pub value: Option<Vec<u8>>,
    pub children: Vec<(u8, NodeId)>,
}

impl BuildNode {
    pub fn into_finalized(self) -> FinalizedNode {
        FinalizedNode {
            is_final: self.is_final,
            value: self.value,
            children: self.children,
        }
    }
}
