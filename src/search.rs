/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Weighted approximate search: a depth-first walk of the DAWG in lockstep
//! with an incrementally extended edit-distance DP row, pruned whenever a
//! subtree's best achievable cost already exceeds the budget.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::dawg::navigator::Outgoing;
use crate::dawg::EncodedDawg;
use crate::metric::Metric;

/// Runs a weighted approximate search against `dawg`.
///
/// Emits every `(key, cost)` with `cost <= budget`. When `cap` is `Some(k)`,
/// the result is the `k` lowest-cost matches (ties broken lexicographically
/// by key), sorted ascending by `(cost, key)`. When `cap` is `None`, results
/// come back in raw depth-first order (ascending byte order at each branch)
/// and are *not* guaranteed sorted by cost (sorting, if wanted, is the
/// caller's job).
pub fn similar(
    dawg: &EncodedDawg,
    query: &[u8],
    metric: &Metric,
    budget: f64,
    allow_transpose: bool,
    cap: Option<usize>,
) -> Vec<(Vec<u8>, f64)> {
    let qlen = query.len();
    let mut row0 = vec![0.0; qlen + 1];
    for j in 1..=qlen {
        row0[j] = row0[j - 1] + metric.insert_cost(query[j - 1]);
    }

    let mut search = Search {
        dawg,
        query,
        metric,
        budget,
        allow_transpose,
        rows: vec![row0],
        stack: vec![dawg.outgoing(dawg.root())],
        path: Vec::new(),
        sink: match cap {
            Some(k) => Sink::Capped {
                k,
                heap: BinaryHeap::with_capacity(k + 1),
            },
            None => Sink::Stream(Vec::new()),
        },
    };
    search.walk();
    search.sink.into_results()
}

struct Search<'a> {
    dawg: &'a EncodedDawg,
    query: &'a [u8],
    metric: &'a Metric,
    budget: f64,
    allow_transpose: bool,
    /// `rows[d]` is the DP row for the state at depth `d` of the current
    /// path. Pooled and overwritten in place as the DFS backtracks and
    /// re-descends, so at most `longest path explored + 1` rows are ever
    /// allocated, and no row is reallocated per edge.
    rows: Vec<Vec<f64>>,
    /// `stack[d]` is the outgoing-transition iterator of the state at depth
    /// `d` of the current path, not yet exhausted. `stack.len()` is the
    /// current depth plus one. An explicit stack (mirroring `query::Keys`/
    /// `query::Items`) bounds recursion depth to the DFS's own frame, not the
    /// native call stack, so a dictionary with very long keys can't blow it.
    stack: Vec<Outgoing<'a>>,
    path: Vec<u8>,
    sink: Sink,
}

impl<'a> Search<'a> {
    fn walk(&mut self) {
        let qlen = self.query.len();
        while let Some(top) = self.stack.last_mut() {
            let Some((label, child)) = top.next() else {
                self.stack.pop();
                self.path.pop();
                continue;
            };

            let depth = self.stack.len() - 1;
            let prev_label = depth.checked_sub(1).map(|i| self.path[i]);

            // Compute the child's row from `rows[depth]` into `rows[depth +
            // 1]`, reusing that row's existing allocation when one is
            // already pooled there from an earlier, now-backtracked visit.
            let mut new_row = match self.rows.get_mut(depth + 1) {
                Some(row) => std::mem::take(row),
                None => vec![0.0; qlen + 1],
            };
            {
                let r = &self.rows[depth];
                new_row[0] = r[0] + self.metric.delete_cost(label);
                for j in 1..=qlen {
                    let sub = r[j - 1] + self.metric.sub_cost(label, self.query[j - 1]);
                    let ins = new_row[j - 1] + self.metric.insert_cost(self.query[j - 1]);
                    let del = r[j] + self.metric.delete_cost(label);
                    let mut best = sub.min(ins).min(del);
                    if self.allow_transpose && depth >= 1 && j >= 2 {
                        if let Some(pl) = prev_label {
                            if label == self.query[j - 2] && pl == self.query[j - 1] {
                                let r_prev = &self.rows[depth - 1];
                                best = best.min(r_prev[j - 2] + self.metric.transpose_cost(pl, label));
                            }
                        }
                    }
                    new_row[j] = best;
                }
            }

            let lo = new_row.iter().cloned().fold(f64::INFINITY, f64::min);
            if lo > self.budget {
                // Pool the row back (rather than dropping it) so the next
                // visit to this depth can reuse its allocation too.
                self.store_row(depth + 1, new_row);
                continue;
            }

            let final_cost = new_row[qlen];
            self.store_row(depth + 1, new_row);

            self.path.push(label);
            if self.dawg.is_final(child) && final_cost <= self.budget {
                self.sink.emit(self.path.clone(), final_cost);
            }
            self.stack.push(self.dawg.outgoing(child));
        }
    }

    /// Stores `row` as `rows[depth]`, extending the pool by one slot if this
    /// is the first time this depth has been reached.
    fn store_row(&mut self, depth: usize, row: Vec<f64>) {
        if depth < self.rows.len() {
            self.rows[depth] = row;
        } else {
            self.rows.push(row);
        }
    }
}

enum Sink {
    Stream(Vec<(Vec<u8>, f64)>),
    Capped { k: usize, heap: BinaryHeap<HeapItem> },
}

impl Sink {
    fn emit(&mut self, key: Vec<u8>, cost: f64) {
        match self {
            Sink::Stream(v) => v.push((key, cost)),
            Sink::Capped { k, heap } => {
                heap.push(HeapItem { cost, key });
                if heap.len() > *k {
                    heap.pop();
                }
            }
        }
    }

    fn into_results(self) -> Vec<(Vec<u8>, f64)> {
        match self {
            Sink::Stream(v) => v,
            Sink::Capped { heap, .. } => {
                let mut items: Vec<HeapItem> = heap.into_vec();
                items.sort_by(|a, b| a.cmp(b));
                items.into_iter().map(|i| (i.key, i.cost)).collect()
            }
        }
    }
}

#[derive(Clone)]
struct HeapItem {
    cost: f64,
    key: Vec<u8>,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.key == other.key
    }
}
impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .partial_cmp(&other.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.key.cmp(&other.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dawg::builder::build_sorted;
    use crate::dawg::encoder::encode;

    fn dawg(keys: &[&[u8]]) -> EncodedDawg {
        encode(build_sorted(false, keys.iter().map(|k| (k.to_vec(), None))).unwrap()).unwrap()
    }

    fn cost_of(keys: &[&str], query: &str, budget: f64, metric: &Metric, allow_transpose: bool) -> Option<f64> {
        let keys_b: Vec<&[u8]> = keys.iter().map(|s| s.as_bytes()).collect();
        let d = dawg(&keys_b);
        let results = similar(&d, query.as_bytes(), metric, budget, allow_transpose, None);
        assert!(results.len() <= 1, "expected at most one matching key in this harness");
        results.first().map(|(_, c)| *c)
    }

    #[test]
    fn exact_match_at_zero_budget() {
        let d = dawg(&[b"1234"]);
        let uniform = Metric::uniform();
        let results = similar(&d, b"1234", &uniform, 0.0, false, None);
        assert_eq!(results, vec![(b"1234".to_vec(), 0.0)]);
    }

    #[test]
    fn levenshtein_scenarios() {
        let m = Metric::uniform();
        assert_eq!(cost_of(&["1234"], "1234", 10.0, &m, false), Some(0.0));
        assert_eq!(cost_of(&["1234"], "1", 10.0, &m, false), Some(3.0));
        assert_eq!(cost_of(&["1234"], "", 10.0, &m, false), Some(4.0));
    }

    #[test]
    fn transposition_never_increases_cost() {
        let m = Metric::uniform();
        let without = cost_of(&["ab"], "ba", 10.0, &m, false).unwrap();
        let with = cost_of(&["ab"], "ba", 10.0, &m, true).unwrap();
        assert!(with <= without);
        assert_eq!(without, 2.0);
        assert_eq!(with, 1.0);
    }

    #[test]
    fn custom_insertion_rule() {
        use crate::metric::Rule;
        let m = Metric::compile(&[Rule::Insert(b'a', 5.0)]).unwrap();
        assert_eq!(cost_of(&["a"], "aa", 10.0, &m, false), Some(5.0));
        assert_eq!(cost_of(&["a"], "", 10.0, &m, false), Some(1.0));
    }

    #[test]
    fn budget_zero_behaves_like_membership() {
        let d = dawg(&[b"foo"]);
        let m = Metric::uniform();
        assert_eq!(similar(&d, b"foo", &m, 0.0, false, None), vec![(b"foo".to_vec(), 0.0)]);
        assert_eq!(similar(&d, b"fo", &m, 0.0, false, None), Vec::<(Vec<u8>, f64)>::new());
    }

    #[test]
    fn result_cap_keeps_lowest_cost() {
        let d = dawg(&[b"aa", b"ab", b"ac", b"ad"]);
        let m = Metric::uniform();
        let results = similar(&d, b"aa", &m, 10.0, false, Some(2));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], (b"aa".to_vec(), 0.0));
        // Second place is a three-way tie at cost 1.0; lexicographic tiebreak picks "ab".
        assert_eq!(results[1], (b"ab".to_vec(), 1.0));
    }

    #[test]
    fn empty_dictionary_yields_no_results() {
        let d = dawg(&[]);
        let m = Metric::uniform();
        assert_eq!(similar(&d, b"anything", &m, 100.0, false, None), Vec::new());
    }
}
