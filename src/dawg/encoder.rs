/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Linearizes a finalized node arena into the flat record array + value
//! table that the navigator reads.
//!
//! Two passes over a breadth-first traversal: first an *offset pass*
//! computes, for every reachable node, the base record index of its
//! children's run; then an *emission pass* walks the same order again and
//! writes the records, now that every child's base offset is known. This is
//! the same "compute offsets first, then encode using them" shape this
//! codebase already uses to give random access into a sequentially
//! discovered structure (see `cli::build::offsets` for the analogous
//! two-pass treatment of a different compact structure).

use std::collections::{HashMap, VecDeque};

use crate::dawg::builder::BuiltDawg;
use crate::dawg::node::NodeId;
use crate::dawg::record::{Record, NO_CHILDREN};
use crate::error::{Error, Result};

pub struct EncodedDawg {
    pub records: Vec<Record>,
    pub value_table: Vec<Vec<u8>>,
    pub has_values: bool,
}

pub fn encode(built: BuiltDawg) -> Result<EncodedDawg> {
    let BuiltDawg {
        arena,
        root,
        has_values,
    } = built;

    if arena.is_empty() {
        // Can only happen if `finish` were called without ever inserting a
        // key and without finalizing a root; `Builder::finish` always
        // produces at least the root node, so this is unreachable in
        // practice but kept as a defensive guard rather than an unwrap.
        return Ok(EncodedDawg {
            records: Vec::new(),
            value_table: Vec::new(),
            has_values,
        });
    }

    // Pass 1: breadth-first traversal assigning base offsets.
    let mut visited = vec![false; arena.len()];
    let mut base_offset: Vec<u32> = vec![0; arena.len()];
    let mut order: Vec<NodeId> = Vec::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    visited[root.0 as usize] = true;
    queue.push_back(root);
    let mut running_total: u64 = 0;

    while let Some(node_id) = queue.pop_front() {
        order.push(node_id);
        base_offset[node_id.0 as usize] = running_total as u32;
        let node = &arena[node_id.0 as usize];
        running_total += node.children.len() as u64;
        if running_total > (u32::MAX - 1) as u64 {
            return Err(Error::InvalidInput(
                "dictionary would exceed the maximum representable number of transitions"
                    .to_string(),
            ));
        }
        for &(_, child) in &node.children {
            if !visited[child.0 as usize] {
                visited[child.0 as usize] = true;
                queue.push_back(child);
            }
        }
    }

    let total_records = running_total as usize;
    let mut records = Vec::with_capacity(total_records);
    let mut value_table: Vec<Vec<u8>> = Vec::new();
    let mut value_cache: HashMap<Vec<u8>, u32> = HashMap::new();

    // Pass 2: emit records in the same order, now that every base offset is known.
    for node_id in order {
        let node = &arena[node_id.0 as usize];
        let last_ix = node.children.len().saturating_sub(1);
        for (ix, &(label, child)) in node.children.iter().enumerate() {
            let child_node = &arena[child.0 as usize];
            let target = if child_node.children.is_empty() {
                NO_CHILDREN
            } else {
                base_offset[child.0 as usize]
            };
            let value_ix = if has_values && child_node.is_final {
                let bytes = child_node
                    .value
                    .clone()
                    .expect("a final value-carrying node always has a value");
                *value_cache.entry(bytes.clone()).or_insert_with(|| {
                    let ix = value_table.len() as u32;
                    value_table.push(bytes);
                    ix
                })
            } else {
                0
            };
            records.push(Record::new(
                label,
                ix == last_ix,
                child_node.is_final,
                target,
                value_ix,
            ));
        }
    }

    Ok(EncodedDawg {
        records,
        value_table,
        has_values,
    })
}
