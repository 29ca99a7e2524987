use petgraph::graph::{NodeIndex, UnGraph};
use sparse_reorder::{
    ComponentLabeling, CooMatrix, DensityNormalization, MemorySink, OrderingKind, ReorderConfig,
    ReorderError, Reorderer, SparseGraph, StructuralMetrics, Symmetry,
};

fn diagonal_plus(n: usize, extra: &[(usize, usize)]) -> CooMatrix {
    let entries = (0..n).map(|i| (i, i)).chain(extra.iter().copied());
    CooMatrix::from_pattern(n, entries).unwrap()
}

fn petgraph_components(matrix: &CooMatrix) -> usize {
    let mut g = UnGraph::<(), ()>::with_capacity(matrix.dimension(), matrix.nnz());
    for _ in 0..matrix.dimension() {
        g.add_node(());
    }
    for (r, c) in matrix.coordinates() {
        g.add_edge(NodeIndex::new(r), NodeIndex::new(c), ());
    }
    petgraph::algo::connected_components(&g)
}

#[test]
fn diagonal_matrix_under_identity() {
    let matrix = diagonal_plus(4, &[]);
    let config = ReorderConfig::default();
    let reordering = Reorderer::new(config.clone()).reorder(&matrix).unwrap();

    assert_eq!(reordering.permutation.order(), &[0, 1, 2, 3]);
    let metrics =
        StructuralMetrics::new(&matrix, &reordering.permutation, config.reorder_type).unwrap();
    assert_eq!(metrics.bandwidth(), 0);
    assert_eq!(metrics.block_density(4, DensityNormalization::Grid).unwrap(), 1.0);
}

#[test]
fn corner_pair_is_made_adjacent_by_rcm() {
    let matrix = diagonal_plus(4, &[(0, 3), (3, 0)]);
    let config = ReorderConfig::with_ordering(OrderingKind::Bandwidth);
    let reordering = Reorderer::new(config.clone()).reorder(&matrix).unwrap();

    // components {0, 3}, {1}, {2}; the edge is reversed in place
    assert_eq!(reordering.permutation.order(), &[3, 0, 1, 2]);
    let metrics =
        StructuralMetrics::new(&matrix, &reordering.permutation, config.reorder_type).unwrap();
    let change = metrics.bandwidth_reduction();
    assert_eq!(change.before, 3);
    assert_eq!(change.after, 1);
}

#[test]
fn empty_matrix_reports_zero_density() {
    let matrix = CooMatrix::from_pattern(6, std::iter::empty()).unwrap();
    for ordering in [OrderingKind::Identity, OrderingKind::Bandwidth, OrderingKind::Fill] {
        let mut sink = MemorySink::new();
        let record = Reorderer::new(ReorderConfig::with_ordering(ordering))
            .run(&matrix, &mut sink)
            .unwrap();
        assert_eq!(record.bandwidth, 0);
        assert_eq!(record.block_density.len(), 5);
        assert!(record.block_density.values().all(|&d| d == 0.0));
        assert_eq!(record.components, 6);
    }
}

#[test]
fn two_diagonal_blocks_split_into_two_components() {
    let matrix = diagonal_plus(4, &[(0, 1), (1, 0), (2, 3), (3, 2)]);
    let graph = SparseGraph::from_coo(&matrix, Symmetry::Mirror);
    let labeling = ComponentLabeling::new(&graph);
    assert_eq!(labeling.component_count(), 2);
    assert_eq!(labeling.members(0), &[0, 1]);
    assert_eq!(labeling.members(1), &[2, 3]);
    assert_eq!(petgraph_components(&matrix), 2);

    let rcm = Reorderer::new(ReorderConfig::with_ordering(OrderingKind::Bandwidth))
        .reorder(&matrix)
        .unwrap();
    assert_eq!(rcm.permutation.order(), &[1, 0, 3, 2]);

    let md = Reorderer::new(ReorderConfig::with_ordering(OrderingKind::Fill))
        .reorder(&matrix)
        .unwrap();
    assert_eq!(md.permutation.order(), &[0, 1, 2, 3]);
    assert_eq!(md.stats.components, 2);
}

#[test]
fn fully_diagonal_matrix_has_one_component_per_vertex() {
    let matrix = diagonal_plus(4, &[]);
    let graph = SparseGraph::from_coo(&matrix, Symmetry::Mirror);
    assert_eq!(ComponentLabeling::new(&graph).component_count(), 4);
    assert_eq!(petgraph_components(&matrix), 4);
}

#[test]
fn component_counts_match_petgraph() {
    // three chains of different lengths, interleaved ids, plus isolated vertices
    let edges = [(0, 3), (3, 6), (1, 4), (7, 10), (10, 11), (11, 2)];
    let matrix = CooMatrix::from_pattern(13, edges).unwrap();
    let graph = SparseGraph::from_coo(&matrix, Symmetry::Union);
    assert_eq!(
        ComponentLabeling::new(&graph).component_count(),
        petgraph_components(&matrix)
    );
}

#[test]
fn unsymmetric_input_orders_the_symmetrized_pattern() {
    let upper = CooMatrix::from_pattern(5, [(0, 4), (1, 3), (3, 4)]).unwrap();
    let lower = CooMatrix::from_pattern(5, [(4, 0), (3, 1), (4, 3)]).unwrap();
    let mut config = ReorderConfig::with_ordering(OrderingKind::Fill);
    config.apply_param_set("symmetric=false").unwrap();

    let a = Reorderer::new(config.clone()).reorder(&upper).unwrap();
    let b = Reorderer::new(config).reorder(&lower).unwrap();
    assert_eq!(a.permutation, b.permutation);
    assert_eq!(a.stats.build.unmatched, 3);
}

#[test]
fn raw_input_errors_surface_from_the_builder() {
    assert!(matches!(
        CooMatrix::from_raw(&[0, 5], &[0, 1], &[1.0, 1.0], 3),
        Err(ReorderError::MalformedInput { .. })
    ));
    assert!(matches!(
        CooMatrix::from_raw(&[0], &[0], &[1.0], 0),
        Err(ReorderError::MalformedInput { .. })
    ));
    assert!(matches!(
        CooMatrix::from_raw(&[0, 1], &[0], &[1.0], 2),
        Err(ReorderError::MalformedInput { .. })
    ));
}
