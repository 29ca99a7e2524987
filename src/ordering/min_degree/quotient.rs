//! The mutable elimination graph used by the minimum-degree orderer.
//!
//! Vertices live in a flat arena of records; all relations are index lookups, so
//! eliminating a vertex never involves shared ownership. Eliminating `p` turns its
//! live neighborhood into a clique and removes `p` from every neighbor's row.
//!
//! Degrees are refreshed lazily: an elimination only marks the touched vertices dirty,
//! and the next minimum search recomputes their degrees and re-queues them. Stale heap
//! entries are skipped on pop.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{ReorderError, ReorderResult};
use crate::graph::SparseGraph;

/// Per-vertex record of the quotient graph.
#[derive(Clone, Debug, Default)]
struct VertexRecord {
    /// Live neighbors, sorted ascending.
    neighbors: Vec<usize>,
    /// Degree as last published to the heap.
    degree: usize,
    eliminated: bool,
    dirty: bool,
}

/// A mutable working copy of a component graph for greedy elimination.
///
/// Errors carry local vertex ids and component `0`; callers relabel them.
///
/// ### Performance Characteristics
/// | Operation | Complexity | Notes |
/// |-----------|------------|-------|
/// | `new` | \(O(n + m)\) | Copies rows, heapifies degrees |
/// | `select_min` | \(O(d \log n)\) amortized | Refreshes `d` dirty vertices first |
/// | `eliminate` | \(O(\sum_{u \in N(p)} (|N(u)| + |N(p)|))\) | Clique merge per neighbor |
///
/// Dense clique growth makes the whole elimination \(O(n^3)\) in the worst case.
#[derive(Clone, Debug)]
pub struct QuotientGraph {
    records: Vec<VertexRecord>,
    heap: BinaryHeap<Reverse<(usize, usize)>>,
    dirty: Vec<usize>,
    remaining: usize,
    fill_edges: usize,
}

impl QuotientGraph {
    /// Copies `graph` into a fresh quotient graph with every vertex live.
    pub fn new(graph: &SparseGraph) -> Self {
        let n = graph.node_count();
        let mut records = Vec::with_capacity(n);
        let mut entries = Vec::with_capacity(n);
        for v in 0..n {
            let neighbors = graph.neighbors(v).to_vec();
            let degree = neighbors.len();
            entries.push(Reverse((degree, v)));
            records.push(VertexRecord {
                neighbors,
                degree,
                eliminated: false,
                dirty: false,
            });
        }
        Self {
            records,
            heap: BinaryHeap::from(entries),
            dirty: Vec::new(),
            remaining: n,
            fill_edges: 0,
        }
    }

    /// Number of vertices not yet eliminated.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Number of fill edges introduced so far.
    pub fn fill_edges(&self) -> usize {
        self.fill_edges
    }

    /// Returns `true` if `v` has been eliminated.
    pub fn is_eliminated(&self, v: usize) -> bool {
        self.records[v].eliminated
    }

    /// Live neighbors of `v` (empty once `v` is eliminated).
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.records[v].neighbors
    }

    /// Current degree of a live vertex, `None` once eliminated.
    pub fn degree(&self, v: usize) -> Option<usize> {
        let record = &self.records[v];
        (!record.eliminated).then_some(record.neighbors.len())
    }

    /// Pops the live vertex of smallest degree, ties broken by smallest id.
    ///
    /// Returns `Ok(None)` once every vertex is eliminated.
    ///
    /// # Errors
    /// Returns [`ReorderError::InternalInvariantViolation`] if a selected vertex's
    /// published degree disagrees with its row, or if the queue runs dry while
    /// vertices remain.
    pub fn select_min(&mut self) -> ReorderResult<Option<usize>> {
        self.refresh_degrees();
        while let Some(Reverse((degree, v))) = self.heap.pop() {
            let record = &self.records[v];
            if record.eliminated || record.degree != degree {
                continue;
            }
            if record.degree != record.neighbors.len() {
                return Err(ReorderError::invariant(
                    0,
                    v,
                    format!(
                        "published degree {} but {} live neighbors",
                        record.degree,
                        record.neighbors.len()
                    ),
                ));
            }
            return Ok(Some(v));
        }
        if self.remaining > 0 {
            let v = self
                .records
                .iter()
                .position(|r| !r.eliminated)
                .unwrap_or_default();
            return Err(ReorderError::invariant(
                0,
                v,
                format!("degree queue empty with {} vertices remaining", self.remaining),
            ));
        }
        Ok(None)
    }

    /// Eliminates `p`: its live neighbors become a clique and `p` leaves every row.
    ///
    /// # Errors
    /// Returns [`ReorderError::InternalInvariantViolation`] if `p` is already
    /// eliminated, if a neighbor of `p` is eliminated, or if a neighbor's row does not
    /// contain `p`.
    pub fn eliminate(&mut self, p: usize) -> ReorderResult<()> {
        if self.records[p].eliminated {
            return Err(ReorderError::invariant(0, p, "vertex eliminated twice"));
        }
        let clique = std::mem::take(&mut self.records[p].neighbors);
        {
            let record = &mut self.records[p];
            record.eliminated = true;
            record.degree = 0;
        }
        self.remaining -= 1;

        let mut added = 0;
        for &u in &clique {
            let record = &mut self.records[u];
            if record.eliminated {
                return Err(ReorderError::invariant(
                    0,
                    u,
                    format!("eliminated vertex still adjacent to {p}"),
                ));
            }
            match record.neighbors.binary_search(&p) {
                Ok(pos) => {
                    record.neighbors.remove(pos);
                }
                Err(_) => {
                    return Err(ReorderError::invariant(
                        0,
                        u,
                        format!("row does not contain neighbor {p}"),
                    ));
                }
            }
            added += merge_into(&mut record.neighbors, &clique, u);
            if !record.dirty {
                record.dirty = true;
                self.dirty.push(u);
            }
        }
        // each fill edge was inserted into both endpoint rows
        self.fill_edges += added / 2;
        Ok(())
    }

    /// Full structural audit: symmetric rows, no eliminated neighbors, no self-loops.
    ///
    /// # Errors
    /// Returns [`ReorderError::InternalInvariantViolation`] describing the first
    /// inconsistency found.
    pub fn check_invariants(&self) -> ReorderResult<()> {
        for (v, record) in self.records.iter().enumerate() {
            if record.eliminated {
                if !record.neighbors.is_empty() {
                    return Err(ReorderError::invariant(0, v, "eliminated vertex keeps neighbors"));
                }
                continue;
            }
            if record.neighbors.windows(2).any(|w| w[0] >= w[1]) {
                return Err(ReorderError::invariant(0, v, "row is not strictly ascending"));
            }
            for &u in &record.neighbors {
                if u == v {
                    return Err(ReorderError::invariant(0, v, "self-loop"));
                }
                let other = &self.records[u];
                if other.eliminated {
                    return Err(ReorderError::invariant(
                        0,
                        v,
                        format!("adjacent to eliminated vertex {u}"),
                    ));
                }
                if other.neighbors.binary_search(&v).is_err() {
                    return Err(ReorderError::invariant(
                        0,
                        v,
                        format!("edge to {u} has no mirror"),
                    ));
                }
            }
            if !record.dirty && record.degree != record.neighbors.len() {
                return Err(ReorderError::invariant(0, v, "degree drifted without dirty mark"));
            }
        }
        Ok(())
    }

    fn refresh_degrees(&mut self) {
        for v in self.dirty.drain(..) {
            let record = &mut self.records[v];
            record.dirty = false;
            if record.eliminated {
                continue;
            }
            record.degree = record.neighbors.len();
            self.heap.push(Reverse((record.degree, v)));
        }
    }
}

/// Merges sorted `other` (minus `skip`) into sorted `row`; returns how many ids were new.
fn merge_into(row: &mut Vec<usize>, other: &[usize], skip: usize) -> usize {
    let mut merged = Vec::with_capacity(row.len() + other.len());
    let mut added = 0;
    let (mut i, mut j) = (0, 0);
    while i < row.len() || j < other.len() {
        if j < other.len() && other[j] == skip {
            j += 1;
            continue;
        }
        match (row.get(i), other.get(j)) {
            (Some(&a), Some(&b)) if a == b => {
                merged.push(a);
                i += 1;
                j += 1;
            }
            (Some(&a), Some(&b)) if a < b => {
                merged.push(a);
                i += 1;
            }
            (_, Some(&b)) => {
                merged.push(b);
                added += 1;
                j += 1;
            }
            (Some(&a), None) => {
                merged.push(a);
                i += 1;
            }
            (None, None) => break,
        }
    }
    *row = merged;
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_into_counts_new_ids() {
        let mut row = vec![1, 4, 7];
        let added = merge_into(&mut row, &[0, 3, 4, 9], 3);
        assert_eq!(row, vec![0, 1, 4, 7, 9]);
        assert_eq!(added, 2);
    }

    #[test]
    fn test_merge_into_empty_row() {
        let mut row = Vec::new();
        assert_eq!(merge_into(&mut row, &[2, 5], 5), 1);
        assert_eq!(row, vec![2]);
    }
}
