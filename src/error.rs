//! Error types for the reordering core.
//!
//! Every fallible operation returns [`ReorderResult<T>`]. Input problems are caught
//! eagerly at the graph-building boundary; bookkeeping drift inside an orderer is
//! reported as [`ReorderError::InternalInvariantViolation`] and aborts the whole run.

use thiserror::Error;

/// Unified error type for graph building, ordering, metrics and output.
#[derive(Debug, Error)]
pub enum ReorderError {
    /// The coordinate list or dimension handed to the builder is unusable.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// Human-readable description, including offending indices.
        reason: String,
    },

    /// An orderer's internal bookkeeping no longer matches its live structure.
    ///
    /// This is an implementation bug, never a data problem.
    #[error("internal invariant violated in component {component} at vertex {vertex}: {detail}")]
    InternalInvariantViolation {
        /// Component id in the splitter's deterministic numbering.
        component: usize,
        /// Original (global) vertex id where the drift was detected.
        vertex: usize,
        /// What was inconsistent.
        detail: String,
    },

    /// A permutation is not a bijection on `0..n`, or has the wrong length.
    #[error("invalid permutation: {reason}")]
    InvalidPermutation {
        /// Human-readable description.
        reason: String,
    },

    /// A block size of zero was requested from the metrics engine.
    #[error("invalid block size {block_size}: block sizes must be positive")]
    InvalidBlockSize {
        /// The rejected block size.
        block_size: usize,
    },

    /// The ordering selector named an unknown technique.
    #[error("unknown ordering technique '{0}' (expected identity, bandwidth or fill)")]
    UnknownOrdering(String),

    /// A `key=value` parameter could not be applied to the configuration.
    #[error("invalid parameter {key}={value}")]
    InvalidParameter {
        /// Parameter name.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// The caller's wall-clock budget ran out between two components.
    #[error("time budget exceeded after {completed} of {total} components")]
    BudgetExceeded {
        /// Components fully ordered before the abort.
        completed: usize,
        /// Total number of components.
        total: usize,
    },

    /// The output adapter failed to serialize a record.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReorderError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_permutation(reason: impl Into<String>) -> Self {
        Self::InvalidPermutation {
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(component: usize, vertex: usize, detail: impl Into<String>) -> Self {
        Self::InternalInvariantViolation {
            component,
            vertex,
            detail: detail.into(),
        }
    }
}

/// Convenience alias for `Result<T, ReorderError>`.
pub type ReorderResult<T> = Result<T, ReorderError>;
