//! scorekit: model-scoring kernels for Rust.
//!
//! Given the learned state of a fitted model, scorekit computes per-row
//! predictions over a column-oriented frame and accumulates quality metrics
//! in the same pass.
//!
//! # Key Types
//!
//! - [`NaiveBayesModel`] - Naive Bayes classifier with log-space stabilized posteriors
//! - [`PcaModel`] - Mixed categorical/numeric linear projection
//! - [`Model`] - Either of the above, with frame-level [`score`](Model::score)
//! - [`Scorer`] - Per-row scoring capability implemented by every model
//! - [`MetricBuilder`] / [`ModelMetrics`] - Metric accumulation and results
//! - [`Frame`] - Minimal named column store used as the row source
//!
//! # Scoring
//!
//! Build a model from its learned state, then score a [`Frame`] with a
//! [`ScoringConfig`]. The frame is adapted to the training schema, scored in
//! parallel row blocks and, when the model supports it, evaluated.

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod model;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Models
pub use model::{
    Model, ModelCategory, ModelKind, ModelMeta, NaiveBayesModel, NaiveBayesOutput, NaiveBayesParams, PcaModel,
    PcaOutput, PcaParams, ScoreResult,
};

// Scoring
pub use inference::{DecisionRule, Scorer, ScoringConfig};

// Metrics
pub use metrics::{MetricAccumulator, MetricBuilder, MetricsIdentity, ModelMetrics};

// Data
pub use data::{Column, ColumnLayout, Frame, TransformType};

// Errors
pub use error::{ConfigError, ScoringError, UnsupportedMetricError};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
