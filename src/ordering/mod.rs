//! Per-component ordering algorithms.
//!
//! Every orderer works on one connected [`Component`], relabelled `0..len`, and
//! returns the local vertices in their new order. The pipeline maps local ids back
//! to original ids and concatenates components.
//!
//! - `identity`: the natural order, a baseline
//! - `rcm`: Reverse Cuthill–McKee, bandwidth reduction
//! - `min_degree`: greedy minimum-degree elimination, fill reduction
//!
//! Any other ordering (for example one computed by an external library) plugs in by
//! implementing [`Orderer`].

pub mod identity;
pub mod min_degree;
pub mod rcm;

pub use identity::Identity;
pub use min_degree::{MinimumDegree, QuotientGraph};
pub use rcm::ReverseCuthillMcKee;

use crate::config::OrderingKind;
use crate::error::ReorderResult;
use crate::graph::Component;

/// The ordering of one component, in local vertex ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentOrder {
    /// Local vertex ids in their new order.
    pub order: Vec<usize>,
    /// Fill edges the elimination introduced (0 for non-eliminating orderers).
    pub fill_edges: usize,
}

impl ComponentOrder {
    /// Wraps a plain order without fill information.
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order,
            fill_edges: 0,
        }
    }
}

/// A component-level ordering algorithm.
///
/// Implementations must be deterministic: the same component always yields the same
/// order, independent of which thread runs it.
pub trait Orderer: Send + Sync {
    /// Short technique name, as recorded in results.
    fn name(&self) -> &'static str;

    /// Orders the vertices of `component`.
    ///
    /// # Errors
    /// Returns [`crate::ReorderError::InternalInvariantViolation`] if the algorithm's
    /// bookkeeping becomes inconsistent.
    fn order(&self, component: &Component<'_>) -> ReorderResult<ComponentOrder>;

    /// Returns `true` if this orderer never moves a vertex.
    ///
    /// The pipeline then skips per-component work and emits the global identity.
    fn is_identity(&self) -> bool {
        false
    }
}

/// Returns the built-in orderer for `kind`.
pub fn orderer_for(kind: OrderingKind) -> Box<dyn Orderer> {
    match kind {
        OrderingKind::Identity => Box::new(Identity),
        OrderingKind::Bandwidth => Box::new(ReverseCuthillMcKee::default()),
        OrderingKind::Fill => Box::new(MinimumDegree::default()),
    }
}
