//! Breadth-first traversal and rooted level structures.
//!
//! A rooted level structure partitions the vertices reachable from a root by their
//! BFS distance. Its depth is the root's eccentricity, which drives the
//! pseudo-peripheral seed search of the bandwidth orderer.

use std::collections::VecDeque;

use crate::graph::SparseGraph;

/// An iterator for Breadth-First Search (BFS).
///
/// Yields `(vertex, depth)` pairs in BFS order, visiting neighbors in ascending id
/// order.
pub struct Bfs<'a> {
    graph: &'a SparseGraph,
    visited: Vec<bool>,
    queue: VecDeque<(usize, usize)>,
}

impl<'a> Bfs<'a> {
    /// Creates a new BFS iterator starting from `start`.
    pub fn new(graph: &'a SparseGraph, start: usize) -> Self {
        let len = graph.node_count();
        let mut visited = vec![false; len];
        let mut queue = VecDeque::new();

        if start < len {
            visited[start] = true;
            queue.push_back((start, 0));
        }

        Self {
            graph,
            visited,
            queue,
        }
    }
}

impl Iterator for Bfs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (u, depth) = self.queue.pop_front()?;

        for &v in self.graph.neighbors(u) {
            if !self.visited[v] {
                self.visited[v] = true;
                self.queue.push_back((v, depth + 1));
            }
        }

        Some((u, depth))
    }
}

/// The BFS levels of a graph seen from one root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelStructure {
    root: usize,
    order: Vec<usize>,
    /// `level_offsets[k]..level_offsets[k + 1]` indexes level `k` in `order`.
    level_offsets: Vec<usize>,
}

impl LevelStructure {
    /// Runs a BFS from `root` and records its levels.
    pub fn rooted(graph: &SparseGraph, root: usize) -> Self {
        let mut order = Vec::with_capacity(graph.node_count());
        let mut level_offsets = vec![0];
        for (v, depth) in Bfs::new(graph, root) {
            if depth + 1 > level_offsets.len() {
                level_offsets.push(order.len());
            }
            order.push(v);
        }
        level_offsets.push(order.len());
        Self {
            root,
            order,
            level_offsets,
        }
    }

    /// The root vertex.
    pub fn root(&self) -> usize {
        self.root
    }

    /// Number of levels minus one, i.e. the root's eccentricity.
    pub fn eccentricity(&self) -> usize {
        self.level_offsets.len().saturating_sub(2)
    }

    /// Number of reachable vertices, root included.
    pub fn reached(&self) -> usize {
        self.order.len()
    }

    /// Size of the widest level.
    pub fn width(&self) -> usize {
        self.level_offsets
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    /// Vertices at distance `k` from the root.
    pub fn level(&self, k: usize) -> &[usize] {
        &self.order[self.level_offsets[k]..self.level_offsets[k + 1]]
    }

    /// The vertex visited last, which lies in the deepest level.
    pub fn last_visited(&self) -> usize {
        self.order.last().copied().unwrap_or(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> SparseGraph {
        let adjacency: Vec<Vec<usize>> = (0..n)
            .map(|i| if i + 1 < n { vec![i + 1] } else { vec![] })
            .collect();
        SparseGraph::from_adjacency(&adjacency)
    }

    #[test]
    fn test_bfs_yields_depths() {
        // 0 - 1, 0 - 2, 2 - 3
        let g = SparseGraph::from_adjacency(&[vec![1, 2], vec![], vec![3], vec![]]);
        let visited: Vec<_> = Bfs::new(&g, 0).collect();
        assert_eq!(visited, vec![(0, 0), (1, 1), (2, 1), (3, 2)]);
    }

    #[test]
    fn test_bfs_out_of_range_start_is_empty() {
        let g = path(3);
        assert_eq!(Bfs::new(&g, 7).count(), 0);
    }

    #[test]
    fn test_level_structure_of_path() {
        let g = path(5);
        let from_middle = LevelStructure::rooted(&g, 2);
        assert_eq!(from_middle.eccentricity(), 2);
        assert_eq!(from_middle.level(0), &[2]);
        assert_eq!(from_middle.level(1), &[1, 3]);
        assert_eq!(from_middle.level(2), &[0, 4]);
        assert_eq!(from_middle.width(), 2);
        assert_eq!(from_middle.last_visited(), 4);

        let from_end = LevelStructure::rooted(&g, 0);
        assert_eq!(from_end.eccentricity(), 4);
        assert_eq!(from_end.reached(), 5);
        assert_eq!(from_end.width(), 1);
    }

    #[test]
    fn test_isolated_root() {
        let g = SparseGraph::from_adjacency(&[vec![], vec![]]);
        let levels = LevelStructure::rooted(&g, 1);
        assert_eq!(levels.eccentricity(), 0);
        assert_eq!(levels.reached(), 1);
        assert_eq!(levels.last_visited(), 1);
    }
}
