use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sparse_reorder::{
    CooMatrix, DensityNormalization, OrderingKind, ReorderConfig, Reorderer, StructuralMetrics,
    DEFAULT_BLOCK_SIZES,
};

fn bench_metrics(c: &mut Criterion) {
    // random symmetric pattern, ~8 entries per row
    let n = 20_000;
    let mut state = 0x9e37_79b9_u64;
    let mut entries = Vec::with_capacity(n * 9);
    for r in 0..n {
        entries.push((r, r));
        for _ in 0..4 {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let col = (state >> 33) as usize % n;
            entries.push((r, col));
            entries.push((col, r));
        }
    }
    let matrix = CooMatrix::from_pattern(n, entries).unwrap();
    let config = ReorderConfig::with_ordering(OrderingKind::Bandwidth);
    let permutation = Reorderer::new(config.clone())
        .reorder(&matrix)
        .unwrap()
        .permutation;
    let metrics = StructuralMetrics::new(&matrix, &permutation, config.reorder_type).unwrap();

    c.bench_function("metrics_bandwidth", |b| {
        b.iter(|| black_box(metrics.bandwidth()));
    });

    for normalization in [DensityNormalization::Grid, DensityNormalization::NonEmptyFill] {
        c.bench_function(&format!("metrics_report_{}", normalization.as_str()), |b| {
            b.iter(|| black_box(metrics.report(&DEFAULT_BLOCK_SIZES, normalization).unwrap()));
        });
    }
}

criterion_group!(benches, bench_metrics);
criterion_main!(benches);
