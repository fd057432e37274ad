//! Finalized metric values.
//!
//! A [`ModelMetrics`] is produced exactly once per pass by
//! [`MetricBuilder::finalize`](super::MetricBuilder::finalize) and is
//! immutable afterwards.

use serde::{Deserialize, Serialize};

/// Which model scored which frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MetricsIdentity {
    pub model: String,
    pub frame: String,
}

impl MetricsIdentity {
    pub fn new(model: impl Into<String>, frame: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            frame: frame.into(),
        }
    }
}

/// Square confusion matrix: `counts[actual][predicted]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub domain: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Empty matrix over `n` classes.
    pub fn zeros(n: usize) -> Self {
        Self {
            domain: (0..n).map(|i| i.to_string()).collect(),
            counts: vec![vec![0; n]; n],
        }
    }

    #[inline]
    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn add(&mut self, actual: usize, predicted: usize) {
        self.counts[actual][predicted] += 1;
    }

    pub fn merge(&mut self, other: &Self) {
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            for (x, y) in a.iter_mut().zip(b) {
                *x += y;
            }
        }
    }

    /// Total number of counted rows.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Fraction of rows on the diagonal, `NaN` when empty.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return f64::NAN;
        }
        let correct: u64 = (0..self.n_classes()).map(|i| self.counts[i][i]).sum();
        correct as f64 / total as f64
    }

    /// Attach level names.
    pub fn with_domain(mut self, domain: Vec<String>) -> Self {
        if domain.len() == self.n_classes() {
            self.domain = domain;
        }
        self
    }
}

/// Two-class classification metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinomialMetrics {
    pub identity: MetricsIdentity,
    pub nobs: u64,
    pub mse: f64,
    pub rmse: f64,
    pub logloss: f64,
    pub auc: f64,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// Multi-class classification metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialMetrics {
    pub identity: MetricsIdentity,
    pub nobs: u64,
    pub mse: f64,
    pub rmse: f64,
    pub logloss: f64,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    /// `hit_ratios[i]` is the fraction of rows whose actual class is among
    /// the `i + 1` most probable classes.
    pub hit_ratios: Vec<f64>,
}

/// Reconstruction metrics of a projector or auto-encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionMetrics {
    pub identity: MetricsIdentity,
    pub nobs: u64,
    /// Mean squared reconstruction error per row, `NaN` without rows.
    pub mse: f64,
}

/// Finalized metrics of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelMetrics {
    Binomial(BinomialMetrics),
    Multinomial(MultinomialMetrics),
    DimReduction(ReconstructionMetrics),
    AutoEncoder(ReconstructionMetrics),
}

impl ModelMetrics {
    pub fn identity(&self) -> &MetricsIdentity {
        match self {
            Self::Binomial(m) => &m.identity,
            Self::Multinomial(m) => &m.identity,
            Self::DimReduction(m) | Self::AutoEncoder(m) => &m.identity,
        }
    }

    /// Number of rows that contributed.
    pub fn nobs(&self) -> u64 {
        match self {
            Self::Binomial(m) => m.nobs,
            Self::Multinomial(m) => m.nobs,
            Self::DimReduction(m) | Self::AutoEncoder(m) => m.nobs,
        }
    }

    /// Mean squared error, the one metric every variant defines.
    pub fn mse(&self) -> f64 {
        match self {
            Self::Binomial(m) => m.mse,
            Self::Multinomial(m) => m.mse,
            Self::DimReduction(m) | Self::AutoEncoder(m) => m.mse,
        }
    }
}

/// `sum / n`, or `NaN` when nothing was observed.
#[inline]
pub(crate) fn mean_or_nan(sum: f64, n: u64) -> f64 {
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}
