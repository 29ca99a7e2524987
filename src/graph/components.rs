//! Connected-component splitting.
//!
//! Components are numbered deterministically: ordered by their smallest member, with
//! members listed in ascending vertex id. Orderings run per component on a relabelled
//! subgraph, so equal inputs always produce equal permutations.

use crate::graph::disjoint_set::DisjointSet;
use crate::graph::SparseGraph;

/// A vertex → component mapping plus per-component member lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentLabeling {
    labels: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl ComponentLabeling {
    /// Labels every vertex of `graph` with its component id.
    ///
    /// Runs union-find over the edge list, then numbers the roots in order of first
    /// appearance while scanning vertex ids upward.
    pub fn new(graph: &SparseGraph) -> Self {
        let n = graph.node_count();
        let mut ds = DisjointSet::new(n);
        for u in 0..n {
            for &v in graph.neighbors(u) {
                if u < v {
                    ds.union(u, v);
                }
            }
        }

        let mut root_label = vec![usize::MAX; n];
        let mut labels = Vec::with_capacity(n);
        let mut members: Vec<Vec<usize>> = Vec::new();
        for v in 0..n {
            let root = ds.find(v);
            if root_label[root] == usize::MAX {
                root_label[root] = members.len();
                members.push(Vec::new());
            }
            let id = root_label[root];
            labels.push(id);
            members[id].push(v);
        }

        debug!("split {} vertices into {} components", n, members.len());
        Self { labels, members }
    }

    /// Number of components.
    pub fn component_count(&self) -> usize {
        self.members.len()
    }

    /// Component id of `vertex`.
    ///
    /// # Panics
    /// Panics if `vertex` is out of bounds.
    pub fn component_of(&self, vertex: usize) -> usize {
        self.labels[vertex]
    }

    /// Ascending member list of component `id`.
    ///
    /// # Panics
    /// Panics if `id >= component_count()`.
    pub fn members(&self, id: usize) -> &[usize] {
        &self.members[id]
    }

    /// Vertex → component labels.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Size of the largest component (0 for an empty labeling).
    pub fn largest(&self) -> usize {
        self.members.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Extracts every component as a relabelled subgraph, in component order.
    pub fn components<'a>(&'a self, graph: &SparseGraph) -> Vec<Component<'a>> {
        self.members
            .iter()
            .enumerate()
            .map(|(id, vertices)| Component::extract(graph, id, vertices))
            .collect()
    }
}

/// One connected component, relabelled to `0..len()`.
#[derive(Clone, Debug)]
pub struct Component<'a> {
    id: usize,
    graph: SparseGraph,
    vertices: &'a [usize],
}

impl<'a> Component<'a> {
    /// Extracts the subgraph induced by `vertices` (ascending) as component `id`.
    pub fn extract(graph: &SparseGraph, id: usize, vertices: &'a [usize]) -> Self {
        let graph = if vertices.len() == graph.node_count() {
            graph.clone()
        } else {
            graph.induced(vertices)
        };
        Self { id, graph, vertices }
    }

    /// Component id in the splitter's numbering.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The relabelled subgraph.
    pub fn graph(&self) -> &SparseGraph {
        &self.graph
    }

    /// Original vertex ids, indexed by local id.
    pub fn vertices(&self) -> &'a [usize] {
        self.vertices
    }

    /// Original id of local vertex `local`.
    pub fn global(&self, local: usize) -> usize {
        self.vertices[local]
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` for a component without vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
