//! Error types.
//!
//! Three families of failure exist, and only the first two are errors:
//!
//! - [`ConfigError`]: the learned state does not match its declared layout
//!   (eigenvector shape, table dimensions, permutation, missing columns).
//!   Detected before any row is scored and always fatal.
//! - [`UnsupportedMetricError`]: a metric builder was asked for a model
//!   category it has no definition for.
//! - Data-quality conditions (missing values, unseen levels, degenerate
//!   deviations) are recovered inside the kernels and never surface here.
//!
//! [`ScoringError`] rolls these up, together with
//! [`ParamValidationError`](crate::model::ParamValidationError), for the
//! pass-level API.

use crate::model::{ModelCategory, ParamValidationError};

/// Mismatch between learned state and its declared layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Eigenvector row count does not match the expanded column width.
    #[error("eigenvector matrix has {actual} rows, layout expands to {expected}")]
    EigenRowMismatch { expected: usize, actual: usize },

    /// Eigenvector column count does not match the configured `k`.
    #[error("eigenvector matrix has {actual} columns, k = {expected}")]
    EigenWidthMismatch { expected: usize, actual: usize },

    /// Generic length mismatch between two pieces of learned state.
    #[error("{what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Categorical offsets must start at zero and be strictly increasing.
    #[error("categorical offsets are not strictly increasing at column {column}")]
    InvalidOffsets { column: usize },

    /// The column permutation is not a bijection over the row width.
    #[error("permutation is not a bijection over {width} columns")]
    InvalidPermutation { width: usize },

    /// A predictor table has the wrong kind for its position in the row.
    #[error("predictor {column} should be {expected}")]
    PredictorKind {
        column: usize,
        expected: &'static str,
    },

    /// A model must have at least one response level.
    #[error("model has no response levels")]
    NoResponseLevels,

    /// Prior probabilities must be finite and strictly positive.
    #[error("prior of response level {level} is {value}")]
    InvalidPrior { level: usize, value: f64 },

    /// A required column is absent from the frame being scored.
    #[error("frame has no column named `{0}`")]
    MissingColumn(String),

    /// Column lengths within one frame disagree.
    #[error("column `{name}` has {actual} rows, frame has {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A column range outside the frame.
    #[error("column range {start}..{end} is out of bounds for {n_cols} columns")]
    ColumnRange { start: usize, end: usize, n_cols: usize },

    /// A categorical training column was given numeric data, or vice versa.
    #[error("column `{name}` is {actual}, model expects {expected}")]
    ColumnKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Partition-local accumulators of different kinds cannot be merged.
    #[error("cannot merge a {left} accumulator with a {right} accumulator")]
    AccumulatorMismatch {
        left: &'static str,
        right: &'static str,
    },
}

/// A metric that has no definition for the given model category.
///
/// This is not a bug: some model categories have no meaningful per-row metric
/// (e.g. a constant-response classifier, or an auto-encoder), and callers are
/// expected to handle it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("metric `{metric}` is not implemented for {category:?} models")]
pub struct UnsupportedMetricError {
    /// Name of the metric builder that refused.
    pub metric: &'static str,
    /// Category of the model it was requested for.
    pub category: ModelCategory,
}

impl UnsupportedMetricError {
    pub fn new(metric: &'static str, category: ModelCategory) -> Self {
        Self { metric, category }
    }
}

/// Any failure of a scoring pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    UnsupportedMetric(#[from] UnsupportedMetricError),

    #[error(transparent)]
    Param(#[from] ParamValidationError),
}
