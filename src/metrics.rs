//! Structural quality metrics of a reordered matrix.
//!
//! Both metrics are computed from the nonzero coordinates mapped through the inverse
//! permutation; the permuted matrix is never materialized. Block density buckets each
//! permuted nonzero into `(row / b, col / b)` and counts distinct buckets, so memory is
//! bounded by the number of nonempty blocks rather than by `(n / b)²`.
//!
//! A matrix stored as a single triangle is measured as the full matrix via
//! [`StructuralMetrics::mirrored`].

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::ReorderType;
use crate::error::{ReorderError, ReorderResult};
use crate::graph::CooMatrix;
use crate::permutation::Permutation;

/// Denominator used for block density.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityNormalization {
    /// Nonempty blocks over the full `⌈n/b⌉ × ⌈n/b⌉` grid.
    #[default]
    Grid,
    /// Nonempty blocks over the block grid spanned by the nonzeros' bounding box.
    BoundingBox,
    /// Nonzeros over the cell capacity of the nonempty blocks, `nnz / (blocks · b²)`.
    #[serde(rename = "nonempty_fill")]
    NonEmptyFill,
}

impl DensityNormalization {
    /// Snake-case name, as used in parameter sets.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::BoundingBox => "bounding_box",
            Self::NonEmptyFill => "nonempty_fill",
        }
    }
}

/// Bandwidth plus block density per requested block size.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDensityReport {
    /// Half-bandwidth under the permutation.
    pub bandwidth: usize,
    /// Block size to density.
    pub densities: BTreeMap<usize, f64>,
}

/// Bandwidth of the natural order and of a permutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandwidthChange {
    /// Bandwidth under the identity permutation.
    pub before: usize,
    /// Bandwidth under the evaluated permutation.
    pub after: usize,
}

impl BandwidthChange {
    /// `before - after`, negative when the permutation widened the band.
    pub fn reduction(&self) -> i64 {
        let before = i64::try_from(self.before).unwrap_or(i64::MAX);
        let after = i64::try_from(self.after).unwrap_or(i64::MAX);
        before - after
    }
}

/// Metrics of `matrix` under a permutation.
///
/// ### Performance Characteristics
/// | Operation | Time | Space |
/// |-----------|------|-------|
/// | `bandwidth` | \(O(\text{nnz})\) | \(O(1)\) |
/// | `block_density` | \(O(\text{nnz})\) expected | \(O(\text{nonempty blocks})\) |
#[derive(Clone, Debug)]
pub struct StructuralMetrics<'a> {
    matrix: &'a CooMatrix,
    permutation: &'a Permutation,
    reorder_type: ReorderType,
    /// Transposes of off-diagonal entries whose mirror is not stored.
    implied: Vec<(usize, usize)>,
}

impl<'a> StructuralMetrics<'a> {
    /// Binds a matrix to a permutation of the same dimension.
    ///
    /// # Errors
    /// Returns [`ReorderError::InvalidPermutation`] if the lengths differ.
    pub fn new(
        matrix: &'a CooMatrix,
        permutation: &'a Permutation,
        reorder_type: ReorderType,
    ) -> ReorderResult<Self> {
        if matrix.dimension() != permutation.len() {
            return Err(ReorderError::invalid_permutation(format!(
                "permutation of length {} measured against a matrix of dimension {}",
                permutation.len(),
                matrix.dimension()
            )));
        }
        Ok(Self {
            matrix,
            permutation,
            reorder_type,
            implied: Vec::new(),
        })
    }

    /// Treats the matrix as symmetric: every stored off-diagonal `(r, c)` also implies
    /// `(c, r)`, so a matrix stored as one triangle measures the same as its full form.
    #[must_use]
    pub fn mirrored(mut self) -> Self {
        let stored: HashSet<(usize, usize)> = self.matrix.coordinates().collect();
        let mut implied: Vec<(usize, usize)> = stored
            .iter()
            .filter(|&&(r, c)| r != c && !stored.contains(&(c, r)))
            .map(|&(r, c)| (c, r))
            .collect();
        implied.sort_unstable();
        self.implied = implied;
        self
    }

    /// Original `(row, col)` coordinates, implied transposes included.
    fn coordinates(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.matrix.coordinates().chain(self.implied.iter().copied())
    }

    /// Permuted `(row, col)` coordinates.
    fn permuted(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let inverse = self.permutation.inverse();
        let reorder_type = self.reorder_type;
        self.coordinates().map(move |(r, c)| match reorder_type {
            ReorderType::Rows => (inverse[r], c),
            ReorderType::Symmetric => (inverse[r], inverse[c]),
        })
    }

    /// Largest `|row - col|` over all permuted nonzeros; 0 for an empty or diagonal matrix.
    pub fn bandwidth(&self) -> usize {
        self.permuted().map(|(r, c)| r.abs_diff(c)).max().unwrap_or(0)
    }

    /// Block density for block size `block_size`.
    ///
    /// An empty matrix has density 0 under every normalization.
    ///
    /// # Errors
    /// Returns [`ReorderError::InvalidBlockSize`] if `block_size == 0`.
    pub fn block_density(
        &self,
        block_size: usize,
        normalization: DensityNormalization,
    ) -> ReorderResult<f64> {
        if block_size == 0 {
            return Err(ReorderError::InvalidBlockSize { block_size });
        }
        let blocks: HashSet<(usize, usize)> = self
            .permuted()
            .map(|(r, c)| (r / block_size, c / block_size))
            .collect();
        if blocks.is_empty() {
            return Ok(0.0);
        }

        let nonempty = blocks.len() as f64;
        let density = match normalization {
            DensityNormalization::Grid => {
                let side = self.matrix.dimension().div_ceil(block_size) as f64;
                nonempty / (side * side)
            }
            DensityNormalization::BoundingBox => {
                let (mut r0, mut r1, mut c0, mut c1) = (usize::MAX, 0, usize::MAX, 0);
                for &(br, bc) in &blocks {
                    r0 = r0.min(br);
                    r1 = r1.max(br);
                    c0 = c0.min(bc);
                    c1 = c1.max(bc);
                }
                nonempty / (((r1 - r0 + 1) * (c1 - c0 + 1)) as f64)
            }
            DensityNormalization::NonEmptyFill => {
                let distinct: HashSet<(usize, usize)> = self.permuted().collect();
                let capacity = nonempty * (block_size * block_size) as f64;
                distinct.len() as f64 / capacity
            }
        };
        Ok(density)
    }

    /// Bandwidth plus density for every size in `block_sizes`.
    ///
    /// # Errors
    /// Returns [`ReorderError::InvalidBlockSize`] if any size is zero.
    pub fn report(
        &self,
        block_sizes: &[usize],
        normalization: DensityNormalization,
    ) -> ReorderResult<BlockDensityReport> {
        let densities = block_sizes
            .iter()
            .map(|&b| Ok((b, self.block_density(b, normalization)?)))
            .collect::<ReorderResult<BTreeMap<_, _>>>()?;
        let report = BlockDensityReport {
            bandwidth: self.bandwidth(),
            densities,
        };
        debug!(
            "metrics: n={} nnz={} bandwidth={} densities={:?}",
            self.matrix.dimension(),
            self.matrix.nnz(),
            report.bandwidth,
            report.densities
        );
        Ok(report)
    }

    /// Bandwidth under the natural order versus under this permutation.
    pub fn bandwidth_reduction(&self) -> BandwidthChange {
        let before = self
            .coordinates()
            .map(|(r, c)| r.abs_diff(c))
            .max()
            .unwrap_or(0);
        BandwidthChange {
            before,
            after: self.bandwidth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal(n: usize) -> CooMatrix {
        CooMatrix::from_pattern(n, (0..n).map(|i| (i, i))).unwrap()
    }

    #[test]
    fn test_diagonal_bandwidth_and_density() {
        let m = diagonal(4);
        let p = Permutation::identity(4);
        let metrics = StructuralMetrics::new(&m, &p, ReorderType::Symmetric).unwrap();
        assert_eq!(metrics.bandwidth(), 0);
        assert_eq!(metrics.block_density(4, DensityNormalization::Grid).unwrap(), 1.0);
        assert_eq!(metrics.block_density(2, DensityNormalization::Grid).unwrap(), 0.5);
        assert_eq!(metrics.block_density(1, DensityNormalization::Grid).unwrap(), 0.25);
    }

    #[test]
    fn test_empty_matrix_density_is_zero() {
        let m = CooMatrix::from_pattern(5, std::iter::empty()).unwrap();
        let p = Permutation::identity(5);
        let metrics = StructuralMetrics::new(&m, &p, ReorderType::Symmetric).unwrap();
        assert_eq!(metrics.bandwidth(), 0);
        for norm in [
            DensityNormalization::Grid,
            DensityNormalization::BoundingBox,
            DensityNormalization::NonEmptyFill,
        ] {
            assert_eq!(metrics.block_density(2, norm).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_permutation_moves_corner_entry() {
        let m = CooMatrix::from_pattern(4, [(0, 3), (3, 0)]).unwrap();
        let p = Permutation::from_order(vec![3, 0, 1, 2]).unwrap();
        let metrics = StructuralMetrics::new(&m, &p, ReorderType::Symmetric).unwrap();
        assert_eq!(metrics.bandwidth(), 1);
        assert_eq!(
            metrics.bandwidth_reduction(),
            BandwidthChange { before: 3, after: 1 }
        );
        assert_eq!(metrics.bandwidth_reduction().reduction(), 2);
    }

    #[test]
    fn test_row_only_permutation_keeps_columns() {
        let m = CooMatrix::from_pattern(3, [(0, 0), (2, 2)]).unwrap();
        let p = Permutation::from_order(vec![2, 1, 0]).unwrap();
        let rows = StructuralMetrics::new(&m, &p, ReorderType::Rows).unwrap();
        assert_eq!(rows.bandwidth(), 2);
        let both = StructuralMetrics::new(&m, &p, ReorderType::Symmetric).unwrap();
        assert_eq!(both.bandwidth(), 0);
    }

    #[test]
    fn test_alternative_normalizations() {
        // 2x2 dense block in the top-left corner of an 8x8 matrix
        let m = CooMatrix::from_pattern(8, [(0, 0), (0, 1), (1, 0), (1, 1)]).unwrap();
        let p = Permutation::identity(8);
        let metrics = StructuralMetrics::new(&m, &p, ReorderType::Symmetric).unwrap();
        assert_eq!(metrics.block_density(2, DensityNormalization::Grid).unwrap(), 1.0 / 16.0);
        assert_eq!(metrics.block_density(2, DensityNormalization::BoundingBox).unwrap(), 1.0);
        assert_eq!(metrics.block_density(4, DensityNormalization::NonEmptyFill).unwrap(), 0.25);
    }

    #[test]
    fn test_zero_block_size_is_rejected() {
        let m = diagonal(2);
        let p = Permutation::identity(2);
        let metrics = StructuralMetrics::new(&m, &p, ReorderType::Symmetric).unwrap();
        assert!(matches!(
            metrics.report(&[4, 0], DensityNormalization::Grid),
            Err(ReorderError::InvalidBlockSize { block_size: 0 })
        ));
    }

    #[test]
    fn test_report_collects_sizes() {
        let m = diagonal(8);
        let p = Permutation::identity(8);
        let report = StructuralMetrics::new(&m, &p, ReorderType::Symmetric)
            .unwrap()
            .report(&[8, 4], DensityNormalization::Grid)
            .unwrap();
        assert_eq!(report.bandwidth, 0);
        assert_eq!(report.densities[&8], 1.0);
        assert_eq!(report.densities[&4], 0.5);
    }

    #[test]
    fn test_mirrored_triangle_measures_like_full_storage() {
        let lower = CooMatrix::from_pattern(8, [(0, 0), (4, 0), (5, 1)]).unwrap();
        let full = CooMatrix::from_pattern(8, [(0, 0), (4, 0), (0, 4), (5, 1), (1, 5)]).unwrap();
        let p = Permutation::identity(8);
        let sizes = [4, 2, 1];
        for norm in [
            DensityNormalization::Grid,
            DensityNormalization::BoundingBox,
            DensityNormalization::NonEmptyFill,
        ] {
            let from_lower = StructuralMetrics::new(&lower, &p, ReorderType::Rows)
                .unwrap()
                .mirrored()
                .report(&sizes, norm)
                .unwrap();
            let from_full = StructuralMetrics::new(&full, &p, ReorderType::Rows)
                .unwrap()
                .report(&sizes, norm)
                .unwrap();
            assert_eq!(from_lower, from_full);
        }
        let plain = StructuralMetrics::new(&lower, &p, ReorderType::Symmetric).unwrap();
        assert_eq!(plain.block_density(4, DensityNormalization::Grid).unwrap(), 0.5);
        assert_eq!(plain.mirrored().block_density(4, DensityNormalization::Grid).unwrap(), 0.75);
    }

    #[test]
    fn test_mirrored_full_storage_is_unchanged() {
        let full = CooMatrix::from_pattern(4, [(0, 3), (3, 0), (1, 1)]).unwrap();
        let p = Permutation::identity(4);
        let plain = StructuralMetrics::new(&full, &p, ReorderType::Symmetric).unwrap();
        let mirrored = plain.clone().mirrored();
        assert_eq!(
            plain.report(&[2, 1], DensityNormalization::NonEmptyFill).unwrap(),
            mirrored.report(&[2, 1], DensityNormalization::NonEmptyFill).unwrap()
        );
        assert_eq!(mirrored.bandwidth_reduction().before, 3);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let m = diagonal(3);
        let p = Permutation::identity(2);
        assert!(StructuralMetrics::new(&m, &p, ReorderType::Symmetric).is_err());
    }
}
