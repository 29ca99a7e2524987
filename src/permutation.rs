//! Vertex permutations.
//!
//! A [`Permutation`] stores both directions: `order[new_position] = old_vertex` and
//! `inverse[old_vertex] = new_position`. Internally everything is 0-based; the 1-based
//! convention of external consumers only appears at the boundary via [`IndexBase`].

use serde::{Deserialize, Serialize};

use crate::config::ReorderType;
use crate::error::{ReorderError, ReorderResult};
use crate::graph::CooMatrix;

/// Index base used when exchanging permutations with external code.
///
/// Defaults to `One`, the convention of the result files consumers read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBase {
    /// First index is `0`.
    Zero,
    /// First index is `1`.
    #[default]
    One,
}

impl IndexBase {
    /// The offset added to 0-based indices.
    pub fn offset(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// A bijection on `0..n`.
///
/// ### Performance Characteristics
/// | Operation | Complexity |
/// |-----------|------------|
/// | `from_order` | \(O(n)\) |
/// | `position_of`, `vertex_at` | \(O(1)\) |
/// | `apply` | \(O(\text{nnz})\) |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    order: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// The identity permutation of length `n`.
    pub fn identity(n: usize) -> Self {
        let order: Vec<usize> = (0..n).collect();
        Self {
            inverse: order.clone(),
            order,
        }
    }

    /// Builds a permutation from `order[new_position] = old_vertex`.
    ///
    /// # Errors
    /// Returns [`ReorderError::InvalidPermutation`] if `order` is not a bijection on
    /// `0..order.len()`.
    pub fn from_order(order: Vec<usize>) -> ReorderResult<Self> {
        let n = order.len();
        let mut inverse = vec![usize::MAX; n];
        for (pos, &v) in order.iter().enumerate() {
            if v >= n {
                return Err(ReorderError::invalid_permutation(format!(
                    "entry {v} at position {pos} is out of range for length {n}"
                )));
            }
            if inverse[v] != usize::MAX {
                return Err(ReorderError::invalid_permutation(format!(
                    "vertex {v} appears at positions {} and {pos}",
                    inverse[v]
                )));
            }
            inverse[v] = pos;
        }
        Ok(Self { order, inverse })
    }

    /// Validates a permutation produced outside this crate, in the given index base.
    ///
    /// # Errors
    /// Returns [`ReorderError::InvalidPermutation`] for entries below the base, out of
    /// range, or repeated.
    pub fn from_external(entries: &[i64], base: IndexBase) -> ReorderResult<Self> {
        let offset: i64 = match base {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        };
        let order = entries
            .iter()
            .enumerate()
            .map(|(pos, &e)| {
                e.checked_sub(offset)
                    .and_then(|v| usize::try_from(v).ok())
                    .ok_or_else(|| {
                        ReorderError::invalid_permutation(format!(
                            "entry {e} at position {pos} is below index base {offset}"
                        ))
                    })
            })
            .collect::<ReorderResult<Vec<_>>>()?;
        Self::from_order(order)
    }

    /// Concatenates per-component fragments of original vertex ids.
    ///
    /// # Errors
    /// Returns [`ReorderError::InvalidPermutation`] unless the fragments together
    /// cover `0..n` exactly once.
    pub fn concatenate<I>(n: usize, fragments: I) -> ReorderResult<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[usize]>,
    {
        let mut order = Vec::with_capacity(n);
        for fragment in fragments {
            order.extend_from_slice(fragment.as_ref());
        }
        if order.len() != n {
            return Err(ReorderError::invalid_permutation(format!(
                "fragments cover {} of {n} vertices",
                order.len()
            )));
        }
        Self::from_order(order)
    }

    /// Length of the permutation.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` for the empty permutation.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Old vertex ids in their new order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// New position of every old vertex.
    pub fn inverse(&self) -> &[usize] {
        &self.inverse
    }

    /// New position of old vertex `vertex`.
    pub fn position_of(&self, vertex: usize) -> usize {
        self.inverse[vertex]
    }

    /// Old vertex placed at `position`.
    pub fn vertex_at(&self, position: usize) -> usize {
        self.order[position]
    }

    /// Returns `true` if every vertex stays in place.
    pub fn is_identity(&self) -> bool {
        self.order.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// The order in the given index base.
    pub fn to_external(&self, base: IndexBase) -> Vec<usize> {
        let offset = base.offset();
        self.order.iter().map(|&v| v + offset).collect()
    }

    /// Consumes the permutation, returning the order vector.
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Relabels the coordinates of `matrix`: rows only for [`ReorderType::Rows`], rows
    /// and columns for [`ReorderType::Symmetric`]. Values travel with their entry.
    ///
    /// # Errors
    /// Returns [`ReorderError::InvalidPermutation`] if the lengths differ.
    pub fn apply(&self, matrix: &CooMatrix, reorder_type: ReorderType) -> ReorderResult<CooMatrix> {
        if matrix.dimension() != self.len() {
            return Err(ReorderError::invalid_permutation(format!(
                "permutation of length {} applied to a {n}x{n} matrix",
                self.len(),
                n = matrix.dimension()
            )));
        }
        let rows = matrix.rows().iter().map(|&r| self.inverse[r]).collect();
        let cols = match reorder_type {
            ReorderType::Rows => matrix.cols().to_vec(),
            ReorderType::Symmetric => matrix.cols().iter().map(|&c| self.inverse[c]).collect(),
        };
        CooMatrix::new(matrix.dimension(), rows, cols, matrix.values().to_vec())
    }
}
