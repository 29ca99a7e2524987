//! The end-to-end reordering driver.
//!
//! ```text
//! CooMatrix -> SparseGraph -> components -> per-component order -> Permutation
//!                                                                      |
//!                                         StructuralMetrics <----------+
//!                                                |
//!                                         OutputAdapter -> ResultSink
//! ```
//!
//! Components are independent, so with the `parallel` feature and
//! [`ReorderConfig::parallel`] they are ordered on the rayon pool. Results are gathered
//! in component order; the output is identical either way.

use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ReorderConfig;
use crate::error::{ReorderError, ReorderResult};
use crate::graph::{BuildStats, Component, ComponentLabeling, CooMatrix, SparseGraph, Symmetry};
use crate::metrics::StructuralMetrics;
use crate::ordering::{orderer_for, ComponentOrder, Orderer};
use crate::output::{OutputAdapter, ReorderRecord, ResultSink};
use crate::permutation::Permutation;

/// Counters describing one reordering run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReorderStats {
    /// Graph builder counters.
    pub build: BuildStats,
    /// Number of undirected edges in the adjacency graph.
    pub edges: usize,
    /// Number of connected components.
    pub components: usize,
    /// Vertex count of the largest component.
    pub largest_component: usize,
    /// Fill edges introduced by an eliminating orderer, summed over components.
    pub fill_edges: usize,
    /// Wall-clock time spent ordering, in milliseconds.
    pub elapsed_ms: f64,
}

/// A permutation together with the statistics of the run that produced it.
#[derive(Clone, Debug)]
pub struct Reordering {
    /// The global permutation, components concatenated in splitter order.
    pub permutation: Permutation,
    /// Run statistics.
    pub stats: ReorderStats,
}

/// Drives build, split, order and concatenate for one configuration.
pub struct Reorderer {
    config: ReorderConfig,
    orderer: Box<dyn Orderer>,
}

impl std::fmt::Debug for Reorderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reorderer")
            .field("config", &self.config)
            .field("orderer", &self.orderer.name())
            .finish()
    }
}

impl Reorderer {
    /// Uses the built-in orderer selected by `config.ordering`.
    pub fn new(config: ReorderConfig) -> Self {
        let orderer = orderer_for(config.ordering);
        Self { config, orderer }
    }

    /// Uses a caller-supplied orderer, e.g. a binding to a native ordering library.
    pub fn with_orderer(config: ReorderConfig, orderer: Box<dyn Orderer>) -> Self {
        Self { config, orderer }
    }

    /// The active configuration.
    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// The active orderer.
    pub fn orderer(&self) -> &dyn Orderer {
        self.orderer.as_ref()
    }

    /// Computes the permutation of `matrix`.
    ///
    /// # Errors
    /// - [`ReorderError::InternalInvariantViolation`] if an orderer's bookkeeping drifts
    ///   or it returns something other than a permutation of its component
    /// - [`ReorderError::BudgetExceeded`] if the wall-clock budget runs out between
    ///   components
    pub fn reorder(&self, matrix: &CooMatrix) -> ReorderResult<Reordering> {
        let start = Instant::now();
        let n = matrix.dimension();

        let (graph, build) =
            SparseGraph::from_coo_with_stats(matrix, Symmetry::from_flag(self.config.symmetric));
        debug!(
            "built graph: n={} edges={} self_loops={} duplicates={} unmatched={}",
            n,
            graph.edge_count(),
            build.self_loops,
            build.duplicates,
            build.unmatched
        );
        if !self.config.symmetric && build.unmatched > 0 {
            warn!(
                "{} structurally unsymmetric entries; ordering the pattern of A + A^T",
                build.unmatched
            );
        }

        let labeling = ComponentLabeling::new(&graph);
        let mut stats = ReorderStats {
            build,
            edges: graph.edge_count(),
            components: labeling.component_count(),
            largest_component: labeling.largest(),
            ..ReorderStats::default()
        };

        if self.orderer.is_identity() {
            stats.elapsed_ms = millis(start.elapsed());
            return Ok(Reordering {
                permutation: Permutation::identity(n),
                stats,
            });
        }

        let components = labeling.components(&graph);
        let orders = self.order_all(&components, start)?;

        let mut fragments = Vec::with_capacity(orders.len());
        for (component, local) in components.iter().zip(orders) {
            stats.fill_edges += local.fill_edges;
            fragments.push(to_global(component, &local.order));
        }
        let permutation = Permutation::concatenate(n, fragments)?;
        stats.elapsed_ms = millis(start.elapsed());
        debug!(
            "{} ordered {} vertices in {:.3} ms ({} fill edges)",
            self.orderer.name(),
            n,
            stats.elapsed_ms,
            stats.fill_edges
        );
        Ok(Reordering { permutation, stats })
    }

    /// Reorders `matrix`, measures it and emits one record to `sink`.
    ///
    /// With [`ReorderConfig::symmetric`] set, a matrix stored as one triangle is measured
    /// as the full symmetric matrix.
    ///
    /// Nothing reaches the sink unless every step succeeded.
    ///
    /// # Errors
    /// Any error of [`Reorderer::reorder`], of the metrics engine, or of the sink.
    pub fn run<S>(&self, matrix: &CooMatrix, sink: &mut S) -> ReorderResult<ReorderRecord>
    where
        S: ResultSink + ?Sized,
    {
        let reordering = self.reorder(matrix)?;
        let mut metrics =
            StructuralMetrics::new(matrix, &reordering.permutation, self.config.reorder_type)?;
        if self.config.symmetric {
            metrics = metrics.mirrored();
        }
        let report = metrics.report(&self.config.block_sizes, self.config.density)?;
        let adapter = OutputAdapter::new(&self.config);
        let record = adapter.package(matrix, &reordering, &report, self.orderer.name());
        adapter.emit(sink, &record, &reordering.permutation)?;
        Ok(record)
    }

    fn order_all(
        &self,
        components: &[Component<'_>],
        start: Instant,
    ) -> ReorderResult<Vec<ComponentOrder>> {
        #[cfg(feature = "parallel")]
        if self.config.parallel && components.len() > 1 {
            return self.order_parallel(components, start);
        }
        self.order_sequential(components, start)
    }

    fn order_sequential(
        &self,
        components: &[Component<'_>],
        start: Instant,
    ) -> ReorderResult<Vec<ComponentOrder>> {
        let total = components.len();
        let mut orders = Vec::with_capacity(total);
        for component in components {
            if self.over_budget(start) {
                return Err(self.budget_exceeded(orders.len(), total));
            }
            orders.push(self.order_one(component)?);
        }
        Ok(orders)
    }

    #[cfg(feature = "parallel")]
    fn order_parallel(
        &self,
        components: &[Component<'_>],
        start: Instant,
    ) -> ReorderResult<Vec<ComponentOrder>> {
        let total = components.len();
        let results: Vec<Option<ReorderResult<ComponentOrder>>> = components
            .par_iter()
            .map(|component| (!self.over_budget(start)).then(|| self.order_one(component)))
            .collect();

        let mut orders = Vec::with_capacity(total);
        let mut skipped = 0;
        for result in results {
            match result {
                Some(order) => orders.push(order?),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            return Err(self.budget_exceeded(total - skipped, total));
        }
        Ok(orders)
    }

    fn order_one(&self, component: &Component<'_>) -> ReorderResult<ComponentOrder> {
        trace!(
            "ordering component {} ({} vertices) with {}",
            component.id(),
            component.len(),
            self.orderer.name()
        );
        let local = self.orderer.order(component)?;
        check_local_order(component, &local.order)?;
        Ok(local)
    }

    fn over_budget(&self, start: Instant) -> bool {
        self.config
            .time_budget_ms
            .is_some_and(|budget| start.elapsed() >= Duration::from_millis(budget))
    }

    fn budget_exceeded(&self, completed: usize, total: usize) -> ReorderError {
        warn!(
            "time budget of {:?} ms exceeded after {} of {} components",
            self.config.time_budget_ms, completed, total
        );
        ReorderError::BudgetExceeded { completed, total }
    }
}

/// Rejects a local order that is not a permutation of `0..component.len()`.
fn check_local_order(component: &Component<'_>, order: &[usize]) -> ReorderResult<()> {
    let len = component.len();
    if order.len() != len {
        return Err(ReorderError::invariant(
            component.id(),
            component.vertices().first().copied().unwrap_or_default(),
            format!("orderer returned {} positions for {len} vertices", order.len()),
        ));
    }
    let mut seen = vec![false; len];
    for &local in order {
        if local >= len {
            return Err(ReorderError::invariant(
                component.id(),
                component.vertices().first().copied().unwrap_or_default(),
                format!("local id {local} out of range for {len} vertices"),
            ));
        }
        if std::mem::replace(&mut seen[local], true) {
            return Err(ReorderError::invariant(
                component.id(),
                component.global(local),
                "vertex ordered twice",
            ));
        }
    }
    Ok(())
}

fn to_global(component: &Component<'_>, order: &[usize]) -> Vec<usize> {
    order.iter().map(|&local| component.global(local)).collect()
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrderingKind;
    use crate::ordering::ReverseCuthillMcKee;
    use crate::output::MemorySink;

    fn matrix(n: usize, entries: &[(usize, usize)]) -> CooMatrix {
        CooMatrix::from_pattern(n, entries.iter().copied()).unwrap()
    }

    struct Broken;

    impl Orderer for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn order(&self, component: &Component<'_>) -> ReorderResult<ComponentOrder> {
            Ok(ComponentOrder::new(vec![0; component.len()]))
        }
    }

    #[test]
    fn test_identity_is_global_identity() {
        // components {0, 2} and {1, 3} are interleaved
        let m = matrix(4, &[(0, 2), (1, 3)]);
        let out = Reorderer::new(ReorderConfig::default()).reorder(&m).unwrap();
        assert!(out.permutation.is_identity());
        assert_eq!(out.stats.components, 2);
    }

    #[test]
    fn test_components_are_concatenated_in_splitter_order() {
        let m = matrix(4, &[(0, 2), (1, 3)]);
        let out = Reorderer::new(ReorderConfig::with_ordering(OrderingKind::Bandwidth))
            .reorder(&m)
            .unwrap();
        // each edge is reversed: RCM ties with the natural order and is kept
        assert_eq!(out.permutation.order(), &[2, 0, 3, 1]);
    }

    #[test]
    fn test_fill_edges_are_reported() {
        // 4-cycle
        let m = matrix(4, &[(1, 0), (2, 1), (3, 2), (3, 0)]);
        let out = Reorderer::new(ReorderConfig::with_ordering(OrderingKind::Fill))
            .reorder(&m)
            .unwrap();
        assert_eq!(out.stats.fill_edges, 1);
        assert_eq!(out.stats.largest_component, 4);
    }

    #[test]
    fn test_invalid_local_order_aborts_the_run() {
        let m = matrix(3, &[(1, 0), (2, 1)]);
        let reorderer = Reorderer::with_orderer(ReorderConfig::default(), Box::new(Broken));
        let err = reorderer.reorder(&m).unwrap_err();
        assert!(matches!(
            err,
            ReorderError::InternalInvariantViolation { component: 0, vertex: 0, .. }
        ));
    }

    #[test]
    fn test_zero_budget_aborts_before_first_component() {
        let config = ReorderConfig {
            time_budget_ms: Some(0),
            ..ReorderConfig::with_ordering(OrderingKind::Bandwidth)
        };
        let err = Reorderer::new(config).reorder(&matrix(3, &[(1, 0)])).unwrap_err();
        assert!(matches!(
            err,
            ReorderError::BudgetExceeded { completed: 0, total: 2 }
        ));
    }

    #[test]
    fn test_triangle_and_full_storage_report_the_same_metrics() {
        let lower = matrix(8, &[(4, 0), (6, 2)]);
        let full = matrix(8, &[(4, 0), (0, 4), (6, 2), (2, 6)]);
        for ordering in [OrderingKind::Identity, OrderingKind::Bandwidth, OrderingKind::Fill] {
            let config = ReorderConfig {
                block_sizes: vec![4, 2],
                ..ReorderConfig::with_ordering(ordering)
            };
            let reorderer = Reorderer::new(config);
            let mut sink = MemorySink::new();
            let from_lower = reorderer.run(&lower, &mut sink).unwrap();
            let from_full = reorderer.run(&full, &mut sink).unwrap();
            assert_eq!(from_lower.bandwidth, from_full.bandwidth);
            assert_eq!(from_lower.block_density, from_full.block_density);
        }
    }

    #[test]
    fn test_unsymmetric_input_is_measured_as_stored() {
        let config = ReorderConfig {
            symmetric: false,
            block_sizes: vec![4],
            ..ReorderConfig::default()
        };
        let mut sink = MemorySink::new();
        let record = Reorderer::new(config).run(&matrix(8, &[(4, 0)]), &mut sink).unwrap();
        assert_eq!(record.block_density[&4], 0.25);
    }

    #[test]
    fn test_custom_orderer_is_used() {
        let reorderer = Reorderer::with_orderer(
            ReorderConfig::default(),
            Box::new(ReverseCuthillMcKee::strict()),
        );
        assert_eq!(reorderer.orderer().name(), "rcm");
        let out = reorderer.reorder(&matrix(3, &[(1, 0), (2, 1)])).unwrap();
        assert_eq!(out.permutation.order(), &[2, 1, 0]);
    }
}
