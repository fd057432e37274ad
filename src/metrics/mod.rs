//! Metric accumulation for scoring passes.
//!
//! Every accumulator follows the same lifecycle:
//!
//! 1. construct with a fixed shape (number of classes, expanded width)
//! 2. [`per_row`](MetricBuilder::per_row) once per scored row
//! 3. [`merge`](MetricBuilder::merge) partition-local instances together
//! 4. [`finalize`](MetricBuilder::finalize) exactly once
//!
//! `finalize` consumes the accumulator, so a finished accumulator cannot be
//! fed more rows. Merging only adds counts and sums, so the order in which
//! partitions are merged does not change the result beyond floating-point
//! rounding of the sums.
//!
//! # Available Accumulators
//!
//! - [`BinomialBuilder`]: MSE, log loss, AUC, confusion matrix
//! - [`MultinomialBuilder`]: MSE, log loss, confusion matrix, top-k hit ratios
//! - [`DimReductionBuilder`]: reconstruction error of a projector
//! - [`AutoEncoderBuilder`]: refuses every row

mod auc;
mod auto_encoder;
mod binomial;
mod dim_reduction;
mod model_metrics;
mod multinomial;

pub use auc::{AucHistogram, AUC_BINS};
pub use auto_encoder::AutoEncoderBuilder;
pub use binomial::BinomialBuilder;
pub use dim_reduction::DimReductionBuilder;
pub use model_metrics::{
    BinomialMetrics, ConfusionMatrix, MetricsIdentity, ModelMetrics, MultinomialMetrics,
    ReconstructionMetrics,
};
pub use multinomial::{MultinomialBuilder, MAX_HIT_RATIOS};

use crate::error::{ConfigError, UnsupportedMetricError};

/// Probabilities are clamped to this before taking logs.
pub const LOGLOSS_EPS: f64 = 1e-15;

// =============================================================================
// MetricBuilder
// =============================================================================

/// Running sufficient statistics over a stream of (prediction, actual) pairs.
pub trait MetricBuilder: Send + Sized {
    /// Name of the accumulator (for logging and errors).
    fn name(&self) -> &'static str;

    /// Rows accumulated so far.
    fn nobs(&self) -> u64;

    /// An empty accumulator of the same shape.
    fn fresh(&self) -> Self;

    /// Accumulate one row.
    ///
    /// `preds` is the kernel's prediction vector. `actual` is the response
    /// code for classifiers and the encoded input row for projectors.
    fn per_row(&mut self, preds: &[f64], actual: &[f64]) -> Result<(), UnsupportedMetricError>;

    /// Fold a partition-local accumulator into this one.
    fn merge(&mut self, other: Self) -> Result<(), ConfigError>;

    /// Produce the final metrics.
    fn finalize(self, identity: MetricsIdentity) -> ModelMetrics;
}

// =============================================================================
// MetricAccumulator
// =============================================================================

/// Any metric accumulator, selected by model category.
#[derive(Debug, Clone)]
pub enum MetricAccumulator {
    Binomial(BinomialBuilder),
    Multinomial(MultinomialBuilder),
    DimReduction(DimReductionBuilder),
    AutoEncoder(AutoEncoderBuilder),
}

impl MetricBuilder for MetricAccumulator {
    fn name(&self) -> &'static str {
        match self {
            Self::Binomial(b) => b.name(),
            Self::Multinomial(b) => b.name(),
            Self::DimReduction(b) => b.name(),
            Self::AutoEncoder(b) => b.name(),
        }
    }

    fn nobs(&self) -> u64 {
        match self {
            Self::Binomial(b) => b.nobs(),
            Self::Multinomial(b) => b.nobs(),
            Self::DimReduction(b) => b.nobs(),
            Self::AutoEncoder(b) => b.nobs(),
        }
    }

    fn fresh(&self) -> Self {
        match self {
            Self::Binomial(b) => Self::Binomial(b.fresh()),
            Self::Multinomial(b) => Self::Multinomial(b.fresh()),
            Self::DimReduction(b) => Self::DimReduction(b.fresh()),
            Self::AutoEncoder(b) => Self::AutoEncoder(b.fresh()),
        }
    }

    #[inline]
    fn per_row(&mut self, preds: &[f64], actual: &[f64]) -> Result<(), UnsupportedMetricError> {
        match self {
            Self::Binomial(b) => b.per_row(preds, actual),
            Self::Multinomial(b) => b.per_row(preds, actual),
            Self::DimReduction(b) => b.per_row(preds, actual),
            Self::AutoEncoder(b) => b.per_row(preds, actual),
        }
    }

    fn merge(&mut self, other: Self) -> Result<(), ConfigError> {
        match (self, other) {
            (Self::Binomial(a), Self::Binomial(b)) => a.merge(b),
            (Self::Multinomial(a), Self::Multinomial(b)) => a.merge(b),
            (Self::DimReduction(a), Self::DimReduction(b)) => a.merge(b),
            (Self::AutoEncoder(a), Self::AutoEncoder(b)) => a.merge(b),
            (a, b) => Err(ConfigError::AccumulatorMismatch {
                left: a.name(),
                right: b.name(),
            }),
        }
    }

    fn finalize(self, identity: MetricsIdentity) -> ModelMetrics {
        match self {
            Self::Binomial(b) => b.finalize(identity),
            Self::Multinomial(b) => b.finalize(identity),
            Self::DimReduction(b) => b.finalize(identity),
            Self::AutoEncoder(b) => b.finalize(identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_requires_same_kind() {
        let mut a = MetricAccumulator::Binomial(BinomialBuilder::new(vec!["n".into(), "y".into()]));
        let b = MetricAccumulator::AutoEncoder(AutoEncoderBuilder::new(2));
        assert_eq!(
            a.merge(b).unwrap_err(),
            ConfigError::AccumulatorMismatch { left: "binomial", right: "auto_encoder" }
        );
    }

    #[test]
    fn fresh_keeps_shape_and_drops_counts() {
        let mut a = MetricAccumulator::Multinomial(MultinomialBuilder::new(vec![
            "a".into(),
            "b".into(),
            "c".into(),
        ]));
        a.per_row(&[0.0, 0.5, 0.3, 0.2], &[0.0]).unwrap();
        assert_eq!(a.nobs(), 1);

        let mut f = a.fresh();
        assert_eq!(f.nobs(), 0);
        f.per_row(&[2.0, 0.1, 0.1, 0.8], &[2.0]).unwrap();
        a.merge(f).unwrap();
        assert_eq!(a.nobs(), 2);
    }
}
