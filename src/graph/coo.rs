//! Validated coordinate (COO) nonzero lists.
//!
//! A `CooMatrix` is what an external matrix loader hands to the core: an `n × n`
//! pattern as parallel `rows` / `cols` / `values` arrays. Values are carried through
//! untouched; the orderings only look at the pattern.

use crate::error::{ReorderError, ReorderResult};

/// A square sparse matrix in coordinate form.
///
/// Construction validates that the three arrays have equal length and that every
/// index lies in `0..n`. Duplicate coordinates and diagonal entries are allowed here;
/// the graph builder is responsible for suppressing them.
#[derive(Clone, Debug, PartialEq)]
pub struct CooMatrix {
    n: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl CooMatrix {
    /// Builds a matrix from unsigned coordinate arrays.
    ///
    /// # Errors
    /// Returns [`ReorderError::MalformedInput`] if `n == 0`, if the arrays differ in
    /// length, or if any index is outside `0..n`.
    pub fn new(n: usize, rows: Vec<usize>, cols: Vec<usize>, values: Vec<f64>) -> ReorderResult<Self> {
        if n == 0 {
            return Err(ReorderError::malformed("matrix dimension must be positive"));
        }
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(ReorderError::malformed(format!(
                "coordinate arrays differ in length (rows={}, cols={}, values={})",
                rows.len(),
                cols.len(),
                values.len()
            )));
        }
        for (k, (&r, &c)) in rows.iter().zip(&cols).enumerate() {
            if r >= n || c >= n {
                return Err(ReorderError::malformed(format!(
                    "entry {k} at ({r}, {c}) is out of range for n={n}"
                )));
            }
        }
        Ok(Self { n, rows, cols, values })
    }

    /// Builds a matrix from the signed arrays of the external input contract.
    ///
    /// # Errors
    /// Same conditions as [`CooMatrix::new`]; negative indices and non-positive `n`
    /// are reported as [`ReorderError::MalformedInput`].
    pub fn from_raw(rows: &[i64], cols: &[i64], values: &[f64], n: i64) -> ReorderResult<Self> {
        if n <= 0 {
            return Err(ReorderError::malformed(format!(
                "matrix dimension must be positive, got {n}"
            )));
        }
        let n = usize::try_from(n)
            .map_err(|_| ReorderError::malformed(format!("matrix dimension {n} does not fit in usize")))?;
        let convert = |axis: &str, raw: &[i64]| -> ReorderResult<Vec<usize>> {
            raw.iter()
                .enumerate()
                .map(|(k, &idx)| {
                    usize::try_from(idx).map_err(|_| {
                        ReorderError::malformed(format!("entry {k} has negative {axis} index {idx}"))
                    })
                })
                .collect()
        };
        Self::new(n, convert("row", rows)?, convert("column", cols)?, values.to_vec())
    }

    /// Builds a pattern-only matrix; every entry gets the value `1.0`.
    ///
    /// # Errors
    /// Same conditions as [`CooMatrix::new`].
    pub fn from_pattern<I>(n: usize, entries: I) -> ReorderResult<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let (rows, cols): (Vec<usize>, Vec<usize>) = entries.into_iter().unzip();
        let values = vec![1.0; rows.len()];
        Self::new(n, rows, cols, values)
    }

    /// Matrix dimension `n`.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.n
    }

    /// Number of stored entries, duplicates included.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no entries are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indices.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Column indices.
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Stored values, parallel to `rows()` and `cols()`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates over `(row, col)` coordinates.
    pub fn coordinates(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }

    /// Iterates over `(row, col, value)` triples.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.coordinates().zip(self.values.iter().copied()).map(|((r, c), v)| (r, c, v))
    }

    /// Consumes the matrix and returns its parts.
    pub fn into_parts(self) -> (usize, Vec<usize>, Vec<usize>, Vec<f64>) {
        (self.n, self.rows, self.cols, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimension() {
        let err = CooMatrix::new(0, vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, ReorderError::MalformedInput { .. }));
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let err = CooMatrix::new(3, vec![0, 1], vec![0], vec![1.0, 1.0]).unwrap_err();
        assert!(err.to_string().contains("differ in length"));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = CooMatrix::new(3, vec![0, 3], vec![0, 1], vec![1.0, 1.0]).unwrap_err();
        assert!(err.to_string().contains("(3, 1)"));
    }

    #[test]
    fn test_from_raw_rejects_negative_values() {
        assert!(CooMatrix::from_raw(&[0], &[-1], &[1.0], 2).is_err());
        assert!(CooMatrix::from_raw(&[], &[], &[], 0).is_err());
        assert!(CooMatrix::from_raw(&[], &[], &[], -4).is_err());
    }

    #[test]
    fn test_from_raw_keeps_values() {
        let m = CooMatrix::from_raw(&[0, 1], &[1, 0], &[2.5, -1.0], 2).unwrap();
        let triples: Vec<_> = m.entries().collect();
        assert_eq!(triples, vec![(0, 1, 2.5), (1, 0, -1.0)]);
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.dimension(), 2);
    }

    #[test]
    fn test_from_pattern_fills_unit_values() {
        let m = CooMatrix::from_pattern(4, [(0, 0), (3, 2)]).unwrap();
        assert_eq!(m.values(), &[1.0, 1.0]);
        assert_eq!(m.coordinates().collect::<Vec<_>>(), vec![(0, 0), (3, 2)]);
    }
}
