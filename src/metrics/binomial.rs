//! Two-class classification metrics.

use super::auc::AucHistogram;
use super::model_metrics::{mean_or_nan, BinomialMetrics, ConfusionMatrix, MetricsIdentity, ModelMetrics};
use super::{MetricBuilder, LOGLOSS_EPS};
use crate::error::{ConfigError, UnsupportedMetricError};

/// Accumulates MSE, log loss, AUC and the confusion matrix of a binary
/// classifier.
///
/// Predictions are `[class, p0, p1]`; the actual is the response code. Rows
/// with a missing (or out of range) response are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct BinomialBuilder {
    domain: Vec<String>,
    nobs: u64,
    sumsqe: f64,
    logloss: f64,
    auc: AucHistogram,
    confusion: ConfusionMatrix,
}

impl BinomialBuilder {
    pub fn new(domain: Vec<String>) -> Self {
        Self {
            domain,
            nobs: 0,
            sumsqe: 0.0,
            logloss: 0.0,
            auc: AucHistogram::new(),
            confusion: ConfusionMatrix::zeros(2),
        }
    }
}

impl MetricBuilder for BinomialBuilder {
    fn name(&self) -> &'static str {
        "binomial"
    }

    fn nobs(&self) -> u64 {
        self.nobs
    }

    fn fresh(&self) -> Self {
        Self::new(self.domain.clone())
    }

    fn per_row(&mut self, preds: &[f64], actual: &[f64]) -> Result<(), UnsupportedMetricError> {
        let y = actual[0];
        if y.is_nan() || !(y == 0.0 || y == 1.0) {
            return Ok(());
        }
        let y = y as usize;
        let p = preds[1 + y];

        let err = 1.0 - p;
        self.sumsqe += err * err;
        self.logloss -= p.max(LOGLOSS_EPS).ln();
        self.auc.add(preds[2], y == 1);
        self.confusion.add(y, preds[0] as usize);
        self.nobs += 1;
        Ok(())
    }

    fn merge(&mut self, other: Self) -> Result<(), ConfigError> {
        self.nobs += other.nobs;
        self.sumsqe += other.sumsqe;
        self.logloss += other.logloss;
        self.auc.merge(&other.auc);
        self.confusion.merge(&other.confusion);
        Ok(())
    }

    fn finalize(self, identity: MetricsIdentity) -> ModelMetrics {
        let mse = mean_or_nan(self.sumsqe, self.nobs);
        ModelMetrics::Binomial(BinomialMetrics {
            identity,
            nobs: self.nobs,
            mse,
            rmse: mse.sqrt(),
            logloss: mean_or_nan(self.logloss, self.nobs),
            auc: self.auc.auc(),
            accuracy: self.confusion.accuracy(),
            confusion: self.confusion.with_domain(self.domain),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn builder() -> BinomialBuilder {
        BinomialBuilder::new(vec!["no".into(), "yes".into()])
    }

    #[test]
    fn accumulates_row_errors() {
        let mut b = builder();
        b.per_row(&[1.0, 0.2, 0.8], &[1.0]).unwrap();
        b.per_row(&[0.0, 0.6, 0.4], &[1.0]).unwrap();
        b.per_row(&[0.0, 0.9, 0.1], &[0.0]).unwrap();
        b.per_row(&[0.0, 0.9, 0.1], &[f64::NAN]).unwrap();

        let ModelMetrics::Binomial(m) = b.finalize(MetricsIdentity::new("nb", "f")) else {
            panic!("expected binomial metrics");
        };
        assert_eq!(m.nobs, 3);
        assert_abs_diff_eq!(m.mse, (0.04 + 0.36 + 0.01) / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.rmse, m.mse.sqrt(), epsilon = 1e-15);
        assert_abs_diff_eq!(
            m.logloss,
            -(0.8f64.ln() + 0.4f64.ln() + 0.9f64.ln()) / 3.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(m.accuracy, 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(m.confusion.counts, vec![vec![1, 0], vec![1, 1]]);
        assert_eq!(m.confusion.domain, vec!["no", "yes"]);
        assert_eq!(m.auc, 1.0);
    }

    #[test]
    fn logloss_is_clamped() {
        let mut b = builder();
        b.per_row(&[0.0, 1.0, 0.0], &[1.0]).unwrap();
        let m = b.finalize(MetricsIdentity::default());
        let ModelMetrics::Binomial(m) = m else { unreachable!() };
        assert_abs_diff_eq!(m.logloss, -(1e-15f64).ln(), epsilon = 1e-9);
    }

    #[test]
    fn empty_builder_is_nan() {
        let m = builder().finalize(MetricsIdentity::default());
        assert_eq!(m.nobs(), 0);
        assert!(m.mse().is_nan());
    }
}
