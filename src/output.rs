//! Packaging results for external consumers.
//!
//! The adapter performs no algorithmic work: it remaps the permutation to the
//! configured index base and flattens the metrics report into a [`ReorderRecord`].
//! Where the data ends up (a CSV row, a database, a test vector) is the sink's concern.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::config::{ReorderConfig, ReorderType};
use crate::error::ReorderResult;
use crate::graph::CooMatrix;
use crate::metrics::BlockDensityReport;
use crate::permutation::{IndexBase, Permutation};
use crate::pipeline::Reordering;

/// One result row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReorderRecord {
    /// Matrix rows.
    pub n_rows: usize,
    /// Matrix columns.
    pub n_cols: usize,
    /// Stored entries, duplicates included.
    pub nnz: usize,
    /// `1D` or `2D`.
    pub reorder_type: ReorderType,
    /// Name of the orderer.
    pub reorder_tech: String,
    /// Parameter-set id, `default` when nothing was overridden.
    pub reord_param_set: String,
    /// Ordering wall-clock time in milliseconds.
    pub reorder_time_ms: f64,
    /// Half-bandwidth after reordering.
    pub bandwidth: usize,
    /// Block size to density.
    pub block_density: BTreeMap<usize, f64>,
    /// Connected components of the adjacency graph.
    pub components: usize,
    /// Fill edges introduced by an eliminating orderer.
    pub fill_edges: usize,
    /// Index base of the emitted permutation.
    pub index_base: IndexBase,
    /// `0` on success.
    pub exit_code: i32,
}

/// Destination for finished results.
pub trait ResultSink {
    /// Accepts one record plus its permutation in the configured index base.
    ///
    /// # Errors
    /// Implementation-defined; the error is returned from the pipeline unchanged.
    fn emit(&mut self, record: &ReorderRecord, permutation: &[usize]) -> ReorderResult<()>;
}

/// A sink that keeps everything in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    /// Received records with their permutations, in arrival order.
    pub results: Vec<(ReorderRecord, Vec<usize>)>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records received.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl ResultSink for MemorySink {
    fn emit(&mut self, record: &ReorderRecord, permutation: &[usize]) -> ReorderResult<()> {
        self.results.push((record.clone(), permutation.to_vec()));
        Ok(())
    }
}

/// Converts pipeline results into the external result shape.
#[derive(Clone, Debug)]
pub struct OutputAdapter {
    index_base: IndexBase,
    reorder_type: ReorderType,
    param_set: String,
}

impl OutputAdapter {
    /// An adapter for the given run configuration.
    pub fn new(config: &ReorderConfig) -> Self {
        Self {
            index_base: config.index_base,
            reorder_type: config.reorder_type,
            param_set: config.param_set_id(),
        }
    }

    /// Index base used for emitted permutations.
    pub fn index_base(&self) -> IndexBase {
        self.index_base
    }

    /// Builds the result record of one run.
    pub fn package(
        &self,
        matrix: &CooMatrix,
        reordering: &Reordering,
        report: &BlockDensityReport,
        technique: &str,
    ) -> ReorderRecord {
        ReorderRecord {
            n_rows: matrix.dimension(),
            n_cols: matrix.dimension(),
            nnz: matrix.nnz(),
            reorder_type: self.reorder_type,
            reorder_tech: technique.to_string(),
            reord_param_set: self.param_set.clone(),
            reorder_time_ms: reordering.stats.elapsed_ms,
            bandwidth: report.bandwidth,
            block_density: report.densities.clone(),
            components: reordering.stats.components,
            fill_edges: reordering.stats.fill_edges,
            index_base: self.index_base,
            exit_code: 0,
        }
    }

    /// The permutation in the configured index base.
    pub fn external(&self, permutation: &Permutation) -> Vec<usize> {
        permutation.to_external(self.index_base)
    }

    /// One index per line in the configured base, newline-terminated.
    pub fn permutation_text(&self, permutation: &Permutation) -> String {
        let mut text = String::with_capacity(permutation.len() * 4);
        for v in self.external(permutation) {
            // writing to a String cannot fail
            let _ = writeln!(text, "{v}");
        }
        text
    }

    /// The density map as a JSON object keyed by block size.
    ///
    /// # Errors
    /// Returns [`crate::ReorderError::Serialization`] if serialization fails.
    pub fn block_density_json(&self, report: &BlockDensityReport) -> ReorderResult<String> {
        Ok(serde_json::to_string(&report.densities)?)
    }

    /// The full record as JSON.
    ///
    /// # Errors
    /// Returns [`crate::ReorderError::Serialization`] if serialization fails.
    pub fn record_json(&self, record: &ReorderRecord) -> ReorderResult<String> {
        Ok(serde_json::to_string(record)?)
    }

    /// Hands the record and the rebased permutation to `sink`.
    ///
    /// # Errors
    /// Whatever the sink returns.
    pub fn emit<S>(
        &self,
        sink: &mut S,
        record: &ReorderRecord,
        permutation: &Permutation,
    ) -> ReorderResult<()>
    where
        S: ResultSink + ?Sized,
    {
        sink.emit(record, &self.external(permutation))
    }
}
