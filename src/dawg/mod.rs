/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The compact acyclic deterministic finite-state automaton (DAWG) at the
//! core of this crate: construction ([`builder`]), serialization layout
//! ([`encoder`], [`record`]), and read-only traversal ([`navigator`]).

pub mod builder;
pub mod encoder;
pub mod navigator;
pub mod node;
pub mod record;

pub use encoder::EncodedDawg;
pub use navigator::StateId;
