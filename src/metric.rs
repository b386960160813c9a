/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Weighted edit-distance metrics: a user-supplied rule set compiled into
//! flat lookup tables for the approximate search's hot inner loop.

use crate::error::{Error, Result};

/// One user-supplied rule contributing to a [`Metric`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rule {
    /// Inserting `byte` into the source side costs `cost`.
    Insert(u8, f64),
    /// Deleting `byte` from the source side costs `cost`.
    Delete(u8, f64),
    /// Substituting `from` with `to` costs `cost`.
    Substitute(u8, u8, f64),
    /// Transposing adjacent bytes `first` then `second` into `second` then
    /// `first` costs `cost`. Only meaningful when the search is run with
    /// `allow_transpose = true`.
    Transpose(u8, u8, f64),
}

const DEFAULT_COST: f64 = 1.0;

/// Compiled weighted Damerau–Levenshtein cost tables.
///
/// Immutable and cheap to share (e.g. behind an `Arc`) across many
/// [`crate::Set::similar`]/[`crate::Dict::similar`] calls once compiled.
#[derive(Clone)]
pub struct Metric {
    sub_cost: Box<[[f64; 256]; 256]>,
    insert_cost: Box<[f64; 256]>,
    delete_cost: Box<[f64; 256]>,
    transpose_cost: Box<[[f64; 256]; 256]>,
}

impl Metric {
    /// The metric where every non-identity edit costs exactly 1, matching
    /// the "unspecified operations default to cost 1" rule with no
    /// user-supplied overrides.
    pub fn uniform() -> Self {
        Metric::compile(&[]).expect("the empty rule set can never be malformed")
    }

    /// Compiles a rule set into lookup tables.
    ///
    /// Returns [`Error::MalformedMetric`] if the same `(from, to)` pair is
    /// given two different costs, or if a rule assigns a nonzero cost to an
    /// identity substitution (`a -> a`), which must always be free.
    pub fn compile(rules: &[Rule]) -> Result<Self> {
        let mut sub_cost = Box::new([[DEFAULT_COST; 256]; 256]);
        for i in 0..256 {
            sub_cost[i][i] = 0.0;
        }
        let mut insert_cost = Box::new([DEFAULT_COST; 256]);
        let mut delete_cost = Box::new([DEFAULT_COST; 256]);

        let mut explicit_sub: [[bool; 256]; 256] = [[false; 256]; 256];
        let mut explicit_insert = [false; 256];
        let mut explicit_delete = [false; 256];
        let mut explicit_transpose_costs: Vec<((u8, u8), f64)> = Vec::new();

        for rule in rules {
            match *rule {
                Rule::Insert(b, cost) => {
                    check_cost(cost)?;
                    if explicit_insert[b as usize] && insert_cost[b as usize] != cost {
                        return Err(Error::MalformedMetric(format!(
                            "conflicting insertion costs for byte {b}"
                        )));
                    }
                    insert_cost[b as usize] = cost;
                    explicit_insert[b as usize] = true;
                }
                Rule::Delete(b, cost) => {
                    check_cost(cost)?;
                    if explicit_delete[b as usize] && delete_cost[b as usize] != cost {
                        return Err(Error::MalformedMetric(format!(
                            "conflicting deletion costs for byte {b}"
                        )));
                    }
                    delete_cost[b as usize] = cost;
                    explicit_delete[b as usize] = true;
                }
                Rule::Substitute(from, to, cost) => {
                    check_cost(cost)?;
                    if from == to {
                        if cost != 0.0 {
                            return Err(Error::MalformedMetric(format!(
                                "identity substitution for byte {from} must cost 0"
                            )));
                        }
                        continue;
                    }
                    if explicit_sub[from as usize][to as usize]
                        && sub_cost[from as usize][to as usize] != cost
                    {
                        return Err(Error::MalformedMetric(format!(
                            "conflicting substitution costs for {from} -> {to}"
                        )));
                    }
                    sub_cost[from as usize][to as usize] = cost;
                    explicit_sub[from as usize][to as usize] = true;
                }
                Rule::Transpose(a, b, cost) => {
                    check_cost(cost)?;
                    if let Some(&(_, existing)) =
                        explicit_transpose_costs.iter().find(|((x, y), _)| *x == a && *y == b)
                    {
                        if existing != cost {
                            return Err(Error::MalformedMetric(format!(
                                "conflicting transposition costs for ({a}, {b})"
                            )));
                        }
                    } else {
                        explicit_transpose_costs.push(((a, b), cost));
                    }
                }
            }
        }

        // Transposition cost defaults to the sum of the two underlying
        // substitutions for every pair without an explicit rule. This is
        // the same fallback whether or not *any* transposition rules were
        // supplied, so no bookkeeping is needed to distinguish those cases.
        let mut transpose_cost = Box::new([[0.0; 256]; 256]);
        for a in 0..256usize {
            for b in 0..256usize {
                transpose_cost[a][b] = sub_cost[a][b] + sub_cost[b][a];
            }
        }
        for ((a, b), cost) in explicit_transpose_costs {
            transpose_cost[a as usize][b as usize] = cost;
        }

        Ok(Metric {
            sub_cost,
            insert_cost,
            delete_cost,
            transpose_cost,
        })
    }

    #[inline]
    pub fn sub_cost(&self, from: u8, to: u8) -> f64 {
        self.sub_cost[from as usize][to as usize]
    }

    #[inline]
    pub fn insert_cost(&self, byte: u8) -> f64 {
        self.insert_cost[byte as usize]
    }

    #[inline]
    pub fn delete_cost(&self, byte: u8) -> f64 {
        self.delete_cost[byte as usize]
    }

    #[inline]
    pub fn transpose_cost(&self, first: u8, second: u8) -> f64 {
        self.transpose_cost[first as usize][second as usize]
    }
}

fn check_cost(cost: f64) -> Result<()> {
    if !(cost >= 0.0) || !cost.is_finite() {
        return Err(Error::MalformedMetric(format!(
            "edit costs must be finite and non-negative, got {cost}"
        )));
    }
    Ok(())
}
