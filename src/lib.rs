//! # `sparse_reorder` - Sparse Matrix Reordering
//!
//! Computes vertex permutations of a square sparse matrix's adjacency graph that
//! reduce bandwidth (Reverse Cuthill–McKee) or elimination fill-in (greedy minimum
//! degree), and measures the result with structural metrics.
//!
//! ## Pipeline
//!
//! 1. **Graph Builder** ([`SparseGraph`]): coordinate list → undirected CSR pattern,
//!    self-loops and duplicates removed.
//! 2. **Component Splitter** ([`ComponentLabeling`]): deterministic connected components,
//!    numbered by smallest member.
//! 3. **Orderers** ([`Orderer`]): [`Identity`], [`ReverseCuthillMcKee`],
//!    [`MinimumDegree`], each run independently per component.
//! 4. **Concatenation** ([`Permutation`]): component fragments in component order.
//! 5. **Structural Metrics** ([`StructuralMetrics`]): bandwidth and block density.
//! 6. **Output Adapter** ([`OutputAdapter`]): index-base remapping and result records.
//!
//! [`Reorderer`] drives all of it from a [`ReorderConfig`].
//!
//! ## Features
//!
//! - `parallel`: order components on the rayon pool when [`ReorderConfig::parallel`] is set
//! - `tracing`: emit `tracing` events for build statistics, seeds, fill counts and metrics
//!
//! ## Example
//!
//! ```rust
//! use sparse_reorder::{CooMatrix, OrderingKind, ReorderConfig, Reorderer, StructuralMetrics};
//!
//! // diagonal plus one corner-to-corner pair
//! let matrix = CooMatrix::from_pattern(
//!     4,
//!     [(0, 0), (1, 1), (2, 2), (3, 3), (0, 3), (3, 0)],
//! )
//! .unwrap();
//!
//! let config = ReorderConfig::with_ordering(OrderingKind::Bandwidth);
//! let reordering = Reorderer::new(config.clone()).reorder(&matrix).unwrap();
//! assert_eq!(reordering.permutation.order(), &[3, 0, 1, 2]);
//!
//! let metrics =
//!     StructuralMetrics::new(&matrix, &reordering.permutation, config.reorder_type).unwrap();
//! assert_eq!(metrics.bandwidth(), 1);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod ordering;
pub mod output;
pub mod permutation;
pub mod pipeline;

pub use config::{OrderingKind, ReorderConfig, ReorderType, DEFAULT_BLOCK_SIZES};
pub use error::{ReorderError, ReorderResult};
pub use graph::{Component, ComponentLabeling, CooMatrix, SparseGraph, Symmetry};
pub use metrics::{BandwidthChange, BlockDensityReport, DensityNormalization, StructuralMetrics};
pub use ordering::{ComponentOrder, Identity, MinimumDegree, Orderer, QuotientGraph, ReverseCuthillMcKee};
pub use output::{MemorySink, OutputAdapter, ReorderRecord, ResultSink};
pub use permutation::{IndexBase, Permutation};
pub use pipeline::{ReorderStats, Reorderer, Reordering};
