//! The undirected adjacency pattern of a sparse matrix, stored in CSR form.
//!
//! Memory layout:
//! - `offsets`: `Vec<usize>` of length `n + 1` (row offsets)
//! - `targets`: contiguous neighbor ids, sorted ascending within each row
//!
//! Every undirected edge `{u, v}` is stored twice (`u -> v` and `v -> u`), self-loops
//! and duplicates are never stored.

use crate::error::{ReorderError, ReorderResult};
use crate::graph::coo::CooMatrix;

/// How the builder interprets the coordinate list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symmetry {
    /// The source stores one triangle (or both); every entry is mirrored.
    Mirror,
    /// The source is a general pattern; the adjacency is the pattern of `A + Aᵗ`.
    Union,
}

impl Symmetry {
    /// Maps the `symmetric` flag of the input contract onto a build mode.
    pub fn from_flag(symmetric: bool) -> Self {
        if symmetric {
            Self::Mirror
        } else {
            Self::Union
        }
    }
}

/// Counters collected while building a [`SparseGraph`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Diagonal entries dropped.
    pub self_loops: usize,
    /// Off-diagonal input entries that repeat an earlier coordinate.
    pub duplicates: usize,
    /// Distinct off-diagonal entries whose transpose is absent from the input.
    pub unmatched: usize,
}

/// An immutable undirected graph in CSR layout.
///
/// ### Performance Characteristics
/// | Operation | Complexity | Notes |
/// |-----------|------------|-------|
/// | `from_coo` | \(O(m \log m)\) | Sorts mirrored coordinates once |
/// | `neighbors` | \(O(1)\) | Returns a sorted slice |
/// | `degree` | \(O(1)\) | Difference of offsets |
/// | `has_edge` | \(O(\log \text{degree})\) | Binary search in the sorted row |
/// | `induced` | \(O(n_s + m_s)\) | Relabels a vertex subset |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseGraph {
    offsets: Vec<usize>,
    targets: Vec<usize>,
}

impl SparseGraph {
    /// Builds the adjacency pattern of `matrix`.
    ///
    /// Both [`Symmetry`] modes yield the same undirected graph. An entry without its
    /// transpose is expected under `Mirror` and a structural asymmetry under `Union`;
    /// either way it is counted in [`BuildStats::unmatched`] for the caller to report.
    pub fn from_coo(matrix: &CooMatrix, symmetry: Symmetry) -> Self {
        Self::from_coo_with_stats(matrix, symmetry).0
    }

    /// Like [`SparseGraph::from_coo`], also returning build counters.
    pub fn from_coo_with_stats(matrix: &CooMatrix, _symmetry: Symmetry) -> (Self, BuildStats) {
        let n = matrix.dimension();
        let mut stats = BuildStats::default();

        let mut input: Vec<(usize, usize)> = Vec::with_capacity(matrix.nnz());
        for (r, c) in matrix.coordinates() {
            if r == c {
                stats.self_loops += 1;
            } else {
                input.push((r, c));
            }
        }
        let off_diagonal = input.len();
        input.sort_unstable();
        input.dedup();
        stats.duplicates = off_diagonal - input.len();
        stats.unmatched = input
            .iter()
            .filter(|&&(r, c)| input.binary_search(&(c, r)).is_err())
            .count();

        let mut pairs = Vec::with_capacity(input.len() * 2);
        for &(r, c) in &input {
            pairs.push((r, c));
            pairs.push((c, r));
        }
        pairs.sort_unstable();
        pairs.dedup();

        (Self::from_sorted_pairs(n, &pairs), stats)
    }

    /// Builds the graph from an adjacency list, symmetrizing and normalizing it.
    ///
    /// # Panics
    ///
    /// Panics if any neighbor references a node index out of bounds.
    pub fn from_adjacency(adjacency: &[Vec<usize>]) -> Self {
        match Self::try_from_adjacency(adjacency) {
            Ok(graph) => graph,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible twin of [`SparseGraph::from_adjacency`].
    ///
    /// # Errors
    /// Returns [`ReorderError::MalformedInput`] if a neighbor id is `>= adjacency.len()`.
    pub fn try_from_adjacency(adjacency: &[Vec<usize>]) -> ReorderResult<Self> {
        let n = adjacency.len();
        let mut pairs = Vec::new();
        for (u, nbrs) in adjacency.iter().enumerate() {
            for &v in nbrs {
                if v >= n {
                    return Err(ReorderError::malformed(format!(
                        "edge {u}->{v} is out of bounds for n={n}"
                    )));
                }
                if u != v {
                    pairs.push((u, v));
                    pairs.push((v, u));
                }
            }
        }
        pairs.sort_unstable();
        pairs.dedup();
        Ok(Self::from_sorted_pairs(n, &pairs))
    }

    /// Builds a graph directly from CSR parts.
    ///
    /// # Errors
    /// Returns [`ReorderError::MalformedInput`] if offsets are not monotone, do not end
    /// at `targets.len()`, if a row is unsorted or contains a self-loop, a duplicate or
    /// an out-of-range id, or if the pattern is not symmetric.
    pub fn from_csr_parts(offsets: Vec<usize>, targets: Vec<usize>) -> ReorderResult<Self> {
        if offsets.is_empty() || offsets[0] != 0 {
            return Err(ReorderError::malformed("offsets must have length n+1 and start at 0"));
        }
        let n = offsets.len() - 1;
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(ReorderError::malformed("offsets must be monotone"));
        }
        if offsets[n] != targets.len() {
            return Err(ReorderError::malformed(format!(
                "offsets end at {} but there are {} targets",
                offsets[n],
                targets.len()
            )));
        }
        let graph = Self { offsets, targets };
        for u in 0..n {
            let row = graph.neighbors(u);
            if row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(ReorderError::malformed(format!(
                    "row {u} is not strictly ascending"
                )));
            }
            for &v in row {
                if v >= n || v == u {
                    return Err(ReorderError::malformed(format!("row {u} has invalid neighbor {v}")));
                }
                if !graph.has_edge(v, u) {
                    return Err(ReorderError::malformed(format!(
                        "edge {u}->{v} has no mirror {v}->{u}"
                    )));
                }
            }
        }
        Ok(graph)
    }

    /// `pairs` must be sorted, deduplicated, symmetric, and free of self-loops.
    fn from_sorted_pairs(n: usize, pairs: &[(usize, usize)]) -> Self {
        let mut offsets = vec![0usize; n + 1];
        for &(u, _) in pairs {
            offsets[u + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }
        let targets = pairs.iter().map(|&(_, v)| v).collect();
        Self { offsets, targets }
    }

    /// Number of vertices.
    #[inline]
    pub fn node_count(&self) -> usize {
        // `offsets` is length `n + 1` by construction.
        self.offsets.len().saturating_sub(1)
    }

    /// Number of undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Sorted neighbors of `node`.
    ///
    /// # Panics
    /// Panics if `node >= node_count()`.
    #[inline]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        assert!(node < self.node_count(), "node {node} out of bounds");
        &self.targets[self.offsets[node]..self.offsets[node + 1]]
    }

    /// Degree of `node`.
    ///
    /// # Panics
    /// Panics if `node >= node_count()`.
    #[inline]
    pub fn degree(&self, node: usize) -> usize {
        assert!(node < self.node_count(), "node index out of bounds");
        self.offsets[node + 1] - self.offsets[node]
    }

    /// Checks whether `{from, to}` is an edge.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        to < self.node_count() && self.neighbors(from).binary_search(&to).is_ok()
    }

    /// The vertex of smallest degree, ties broken by smallest id.
    pub fn min_degree_vertex(&self) -> Option<usize> {
        (0..self.node_count()).min_by_key(|&v| (self.degree(v), v))
    }

    /// Largest vertex degree (0 for an edgeless graph).
    pub fn max_degree(&self) -> usize {
        (0..self.node_count()).map(|v| self.degree(v)).max().unwrap_or(0)
    }

    /// Builds the subgraph induced by `vertices`, relabelled `0..vertices.len()`.
    ///
    /// `vertices` must be strictly ascending; vertex `vertices[i]` becomes local `i`
    /// and edges leaving the subset are dropped. Because the relabelling is monotone,
    /// local rows stay sorted.
    ///
    /// # Panics
    /// Panics if a member is out of bounds.
    pub fn induced(&self, vertices: &[usize]) -> Self {
        debug_assert!(vertices.windows(2).all(|w| w[0] < w[1]), "vertices must be ascending");
        let mut offsets = Vec::with_capacity(vertices.len() + 1);
        offsets.push(0);
        let mut targets = Vec::new();
        for &u in vertices {
            for &v in self.neighbors(u) {
                if let Ok(local) = vertices.binary_search(&v) {
                    targets.push(local);
                }
            }
            offsets.push(targets.len());
        }
        Self { offsets, targets }
    }

    /// Raw CSR offsets.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Raw CSR targets.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }
}
