//! Auto-encoder metrics.
//!
//! No per-row metric is defined for auto-encoders; the builder exists so the
//! protocol is total over model categories and refuses every row.

use super::model_metrics::{MetricsIdentity, ModelMetrics, ReconstructionMetrics};
use super::MetricBuilder;
use crate::error::{ConfigError, UnsupportedMetricError};
use crate::model::ModelCategory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoEncoderBuilder {
    dims: usize,
}

impl AutoEncoderBuilder {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }

    /// Width of the reconstructed row.
    pub fn dims(&self) -> usize {
        self.dims
    }
}

impl MetricBuilder for AutoEncoderBuilder {
    fn name(&self) -> &'static str {
        "auto_encoder"
    }

    fn nobs(&self) -> u64 {
        0
    }

    fn fresh(&self) -> Self {
        self.clone()
    }

    fn per_row(&mut self, _preds: &[f64], _actual: &[f64]) -> Result<(), UnsupportedMetricError> {
        Err(UnsupportedMetricError::new(self.name(), ModelCategory::AutoEncoder))
    }

    fn merge(&mut self, _other: Self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn finalize(self, identity: MetricsIdentity) -> ModelMetrics {
        ModelMetrics::AutoEncoder(ReconstructionMetrics {
            identity,
            nobs: 0,
            mse: f64::NAN,
        })
    }
}
