/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Public dictionary types: [`Set`] (keys only) and [`Dict`] (keys with
//! attached [`Value`]s). Both are thin wrappers around an [`EncodedDawg`]
//! that present the same query surface over the same underlying automaton.

use std::io::{Read, Write};

use crate::dawg::builder::{build_sorted, build_unsorted};
use crate::dawg::encoder::encode;
use crate::dawg::EncodedDawg;
use crate::error::{Error, Result};
use crate::format;
use crate::metric::Metric;
use crate::query;
use crate::search;
use crate::value::Value;

/// A static set of byte-string keys backed by a minimized DAWG.
pub struct Set {
    encoded: EncodedDawg,
}

impl Set {
    /// Builds a set from an iterable of keys.
    ///
    /// When `sorted` is `true`, `keys` MUST already be in strictly ascending
    /// byte order with no duplicates; violating that is an
    /// [`Error::InvalidInput`]. When `false`, the whole batch is buffered
    /// and sorted internally.
    pub fn build<I>(keys: I, sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let pairs = keys.into_iter().map(|k| (k, None));
        let built = if sorted {
            build_sorted(false, pairs)?
        } else {
            build_unsorted(false, pairs)?
        };
        Ok(Set {
            encoded: encode(built)?,
        })
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        query::contains(&self.encoded, key)
    }

    /// All keys in the set with the given prefix, lexicographically.
    /// An empty prefix enumerates every key.
    pub fn keys(&self, prefix: &[u8]) -> impl Iterator<Item = Vec<u8>> + '_ {
        query::keys(&self.encoded, prefix)
    }

    /// Every prefix of `s` (shortest first) that is itself a member.
    pub fn prefixes(&self, s: &[u8]) -> Vec<Vec<u8>> {
        query::prefixes(&self.encoded, s)
    }

    /// Every member within `budget` edit cost of `query`, under `metric`.
    pub fn similar(
        &self,
        query: &[u8],
        budget: f64,
        metric: &Metric,
        allow_transpose: bool,
        k: Option<usize>,
    ) -> Vec<(Vec<u8>, f64)> {
        search::similar(&self.encoded, query, metric, budget, allow_transpose, k)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format::to_bytes(&self.encoded)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let encoded = format::from_bytes(bytes)?;
        reject_values(&encoded)?;
        Ok(Set { encoded })
    }

    pub fn dump(&self, writer: impl Write) -> Result<()> {
        format::dump(&self.encoded, writer)
    }

    pub fn load(reader: impl Read) -> Result<Self> {
        let encoded = format::load(reader)?;
        reject_values(&encoded)?;
        Ok(Set { encoded })
    }

    /// Number of encoded transition records; exposed for diagnostics (the
    /// `check` CLI subcommand reports it).
    pub fn record_count(&self) -> usize {
        self.encoded.records.len()
    }
}

/// A static map from byte-string keys to non-negative integer [`Value`]s,
/// backed by a minimized DAWG.
pub struct Dict {
    encoded: EncodedDawg,
}

impl Dict {
    /// Builds a dictionary from an iterable of `(key, value)` pairs. See
    /// [`Set::build`] for the `sorted` contract.
    pub fn build<I>(pairs: I, sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<u8>, Value)>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k, Some(v.as_be_bytes().to_vec())));
        let built = if sorted {
            build_sorted(true, pairs)?
        } else {
            build_unsorted(true, pairs)?
        };
        Ok(Dict {
            encoded: encode(built)?,
        })
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        query::contains(&self.encoded, key)
    }

    /// Looks up `key`'s value. `Err(Error::MissingKey)` if absent.
    pub fn get(&self, key: &[u8]) -> Result<Value> {
        query::get(&self.encoded, key)
            .map(|bytes| Value::from_be_bytes(&bytes))
            .ok_or(Error::MissingKey)
    }

    pub fn keys(&self, prefix: &[u8]) -> impl Iterator<Item = Vec<u8>> + '_ {
        query::keys(&self.encoded, prefix)
    }

    /// All `(key, value)` pairs with the given prefix, lexicographically by key.
    pub fn items(&self, prefix: &[u8]) -> impl Iterator<Item = (Vec<u8>, Value)> + '_ {
        query::items(&self.encoded, prefix).map(|(k, v)| (k, Value::from_be_bytes(&v)))
    }

    pub fn prefixes(&self, s: &[u8]) -> Vec<Vec<u8>> {
        query::prefixes(&self.encoded, s)
    }

    pub fn similar(
        &self,
        query: &[u8],
        budget: f64,
        metric: &Metric,
        allow_transpose: bool,
        k: Option<usize>,
    ) -> Vec<(Vec<u8>, f64)> {
        search::similar(&self.encoded, query, metric, budget, allow_transpose, k)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format::to_bytes(&self.encoded)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let encoded = format::from_bytes(bytes)?;
        require_values(&encoded)?;
        Ok(Dict { encoded })
    }

    pub fn dump(&self, writer: impl Write) -> Result<()> {
        format::dump(&self.encoded, writer)
    }

    pub fn load(reader: impl Read) -> Result<Self> {
        let encoded = format::load(reader)?;
        require_values(&encoded)?;
        Ok(Dict { encoded })
    }

    pub fn record_count(&self) -> usize {
        self.encoded.records.len()
    }

    pub fn value_count(&self) -> usize {
        self.encoded.value_table.len()
    }
}

fn reject_values(encoded: &EncodedDawg) -> Result<()> {
    if encoded.has_values {
        return Err(Error::Parse(
            "image carries values but was loaded as a value-less Set".to_string(),
        ));
    }
    Ok(())
}

fn require_values(encoded: &EncodedDawg) -> Result<()> {
    if !encoded.has_values {
        return Err(Error::Parse(
            "image carries no values but was loaded as a Dict".to_string(),
        ));
    }
    Ok(())
}
