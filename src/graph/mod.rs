//! Sparse-matrix adjacency graphs and the traversals the orderings are built on.
//!
//! Modules are organized leaves first:
//! - `coo`: validated coordinate input
//! - `sparse_graph`: the immutable CSR adjacency pattern
//! - `disjoint_set`, `components`: connected-component splitting
//! - `level`: BFS and rooted level structures

pub mod components;
pub mod coo;
pub mod disjoint_set;
pub mod level;
pub mod sparse_graph;

pub use components::{Component, ComponentLabeling};
pub use coo::CooMatrix;
pub use disjoint_set::DisjointSet;
pub use level::{Bfs, LevelStructure};
pub use sparse_graph::{BuildStats, SparseGraph, Symmetry};
