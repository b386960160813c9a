/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Caller-observable error kinds for building, loading, and querying a
//! [`crate::Set`]/[`crate::Dict`].

use thiserror::Error;

/// Everything that can go wrong at the public boundary of this crate.
///
/// Variants are deliberately distinct (rather than a single opaque string) so
/// that callers can match on the kind of failure, per the error-handling
/// design: build failures, a missing key on lookup, a malformed serialized
/// image, and a contradictory metric specification are different situations
/// that warrant different recovery.
#[derive(Debug, Error)]
pub enum Error {
    /// The input to a builder violated one of its contracts: unsorted keys
    /// under `sorted = true`, a duplicate key, a null byte in a key, an
    /// empty key, or a value that doesn't fit the encoding.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// [`get`](crate::Dict::get) was called with a key not present in the dictionary.
    #[error("missing key")]
    MissingKey,

    /// A serialized image was structurally malformed (bad magic, unknown
    /// version, or an out-of-range index).
    #[error("malformed dictionary image: {0}")]
    Parse(String),

    /// I/O failure while reading or writing a serialized image.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A metric rule set contained an overlapping or contradictory
    /// specification (e.g. two different costs for the same substitution).
    #[error("malformed metric: {0}")]
    MalformedMetric(String),
}

pub type Result<T> = std::result::Result<T, Error>;
