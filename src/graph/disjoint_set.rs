//! Disjoint Set (Union-Find) over dense vertex ids.
//!
//! # Performance
//!
//! - Parent and rank live in two flat vectors indexed by vertex id.
//! - Path compression and union-by-rank ensure nearly constant time operations.

/// A Disjoint Set (Union-Find) data structure over `0..len`.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    /// Parent pointers.
    parent: Vec<usize>,
    /// Rank (depth upper bound) for union-by-rank.
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Creates `len` singleton sets.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    /// Finds the representative of the set containing `id`, with path compression.
    ///
    /// # Panics
    /// Panics if `id >= len()`.
    pub fn find(&mut self, id: usize) -> usize {
        // 1. Find root
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // 2. Compress path
        let mut curr = id;
        while curr != root {
            let next = self.parent[curr];
            self.parent[curr] = root;
            curr = next;
        }

        root
    }

    /// Unites the sets containing `a` and `b`.
    /// Returns `true` if they were in different sets, `false` otherwise.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);

        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            core::cmp::Ordering::Less => self.parent[root_a] = root_b,
            core::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            core::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] = self.rank[root_a].saturating_add(1);
            }
        }

        true
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
