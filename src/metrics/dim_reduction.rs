//! Reconstruction error of a projector.

use std::sync::Arc;

use super::model_metrics::{mean_or_nan, MetricsIdentity, ModelMetrics, ReconstructionMetrics};
use super::MetricBuilder;
use crate::error::{ConfigError, UnsupportedMetricError};
use crate::model::PcaOutput;

/// Accumulates the squared distance between each expanded, normalized row
/// and its reconstruction `V · c` from the projected coordinates `c`.
///
/// The actual passed to [`per_row`](MetricBuilder::per_row) is the encoded
/// input row itself.
#[derive(Debug, Clone)]
pub struct DimReductionBuilder {
    output: Arc<PcaOutput>,
    nobs: u64,
    sumsqe: f64,
    expanded: Vec<f64>,
}

impl DimReductionBuilder {
    pub fn new(output: Arc<PcaOutput>) -> Self {
        let width = output.layout.expanded_width();
        Self {
            output,
            nobs: 0,
            sumsqe: 0.0,
            expanded: vec![0.0; width],
        }
    }
}

impl MetricBuilder for DimReductionBuilder {
    fn name(&self) -> &'static str {
        "dim_reduction"
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }

    fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.output))
    }

    fn per_row(&mut self, preds: &[f64], actual: &[f64]) -> Result<(), UnsupportedMetricError> {
        self.output.layout.expand_into(actual, &mut self.expanded);
        let eigen = &self.output.eigenvectors;

        let mut sq = 0.0;
        for (e, &z) in self.expanded.iter().enumerate() {
            let recon: f64 = eigen.row(e).iter().zip(preds).map(|(v, c)| v * c).sum();
            let d = z - recon;
            sq += d * d;
        }
        self.sumsqe += sq;
        self.nobs += 1;
        Ok(())
    }

    fn merge(&mut self, other: Self) -> Result<(), ConfigError> {
        if other.expanded.len() != self.expanded.len() {
            return Err(ConfigError::LengthMismatch {
                what: "expanded width",
                expected: self.expanded.len(),
                actual: other.expanded.len(),
            });
        }
        self.nobs += other.nobs;
        self.sumsqe += other.sumsqe;
        Ok(())
    }

    fn finalize(self, identity: MetricsIdentity) -> ModelMetrics {
        ModelMetrics::DimReduction(ReconstructionMetrics {
            identity,
            nobs: self.nobs,
            mse: mean_or_nan(self.sumsqe, self.nobs),
        })
    }
}
