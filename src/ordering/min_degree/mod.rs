//! Greedy minimum-degree elimination.
//!
//! Repeatedly eliminates the live vertex of smallest degree (ties by smallest id),
//! connecting its remaining neighbors into a clique. This is the plain reference
//! algorithm: no supervariables, no approximate external degrees. A native AMD
//! implementation can replace it behind the same [`Orderer`] interface.

mod quotient;


pub use quotient::QuotientGraph;

use crate::error::{ReorderError, ReorderResult};
use crate::graph::{Component, SparseGraph};
use crate::ordering::{ComponentOrder, Orderer};

/// Minimum-degree fill-reducing orderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimumDegree {
    /// Run a full quotient-graph audit after every elimination.
    ///
    /// Quadratic overhead; intended for tests and debugging.
    pub audit: bool,
}

impl MinimumDegree {
    /// An orderer that checks every quotient-graph invariant after each step.
    pub fn with_audit() -> Self {
        Self { audit: true }
    }

    /// Elimination order of `graph` in local ids, plus the number of fill edges.
    ///
    /// Errors carry local vertex ids and component `0`.
    ///
    /// # Errors
    /// Returns [`ReorderError::InternalInvariantViolation`] if the quotient graph's
    /// bookkeeping drifts.
    pub fn eliminate_all(&self, graph: &SparseGraph) -> ReorderResult<ComponentOrder> {
        let n = graph.node_count();
        let mut quotient = QuotientGraph::new(graph);
        let mut order = Vec::with_capacity(n);

        while let Some(v) = quotient.select_min()? {
            quotient.eliminate(v)?;
            order.push(v);
            if self.audit {
                quotient.check_invariants()?;
            }
        }

        if order.len() != n {
            let v = order.last().copied().unwrap_or_default();
            return Err(ReorderError::invariant(
                0,
                v,
                format!("elimination stopped after {} of {n} vertices", order.len()),
            ));
        }
        Ok(ComponentOrder {
            order,
            fill_edges: quotient.fill_edges(),
        })
    }
}

impl Orderer for MinimumDegree {
    fn name(&self) -> &'static str {
        "amd"
    }

    fn order(&self, component: &Component<'_>) -> ReorderResult<ComponentOrder> {
        let result = self.eliminate_all(component.graph()).map_err(|err| match err {
            ReorderError::InternalInvariantViolation { vertex, detail, .. } => {
                ReorderError::InternalInvariantViolation {
                    component: component.id(),
                    vertex: component.global(vertex),
                    detail,
                }
            }
            other => other,
        })?;
        trace!(
            "minimum degree on component {} ({} vertices): {} fill edges",
            component.id(),
            component.len(),
            result.fill_edges
        );
        Ok(result)
    }
}
