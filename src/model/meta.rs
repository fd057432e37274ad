//! Model metadata.
//!
//! Shared metadata types for model introspection.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which family a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Naive Bayes classifier.
    NaiveBayes,
    /// Principal component analysis projector.
    Pca,
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NaiveBayes => "naive_bayes",
            Self::Pca => "pca",
        }
    }
}

/// What kind of predictions a model produces, and therefore which metrics
/// are defined for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelCategory {
    /// Two response levels.
    Binomial,
    /// Three or more response levels.
    Multinomial,
    /// Continuous (or constant) response.
    Regression,
    /// Projection into a lower-dimensional space.
    DimReduction,
    /// Reconstruction of the input row.
    AutoEncoder,
}

impl ModelCategory {
    /// Category of a classifier with `n_levels` response levels.
    ///
    /// A single-level (constant) response has nothing to classify and is
    /// treated as regression.
    pub fn for_classifier(n_levels: usize) -> Self {
        match n_levels {
            0 | 1 => Self::Regression,
            2 => Self::Binomial,
            _ => Self::Multinomial,
        }
    }

    /// Returns true for supervised categories that consume a response column.
    pub fn is_supervised(&self) -> bool {
        matches!(self, Self::Binomial | Self::Multinomial | Self::Regression)
    }

    /// Returns true if this is a classification category.
    pub fn is_classification(&self) -> bool {
        matches!(self, Self::Binomial | Self::Multinomial)
    }
}

/// Shared metadata for all model types.
///
/// `feature_names` is the training column order: the order in which an
/// encoded row presents its values to the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Model name, used as the model half of a metrics identity.
    pub name: String,
    /// Model family.
    pub kind: ModelKind,
    /// Prediction category.
    pub category: ModelCategory,
    /// Predictor column names in training order.
    pub feature_names: Vec<String>,
    /// Training domain per predictor; `None` for numeric columns.
    pub domains: Vec<Option<Vec<String>>>,
    /// Response column name (supervised models only).
    pub response_name: Option<String>,
    /// Response domain (classifiers only).
    pub response_domain: Option<Vec<String>>,
}

impl ModelMeta {
    /// Number of predictor columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Number of categorical predictor columns.
    pub fn n_categorical(&self) -> usize {
        self.domains.iter().filter(|d| d.is_some()).count()
    }

    /// Training cardinality of predictor `col`, if categorical.
    pub fn cardinality(&self, col: usize) -> Option<usize> {
        self.domains.get(col)?.as_ref().map(Vec::len)
    }

    /// Check that every predictor has exactly one domain entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domains.len() != self.feature_names.len() {
            return Err(ConfigError::LengthMismatch {
                what: "feature domains",
                expected: self.feature_names.len(),
                actual: self.domains.len(),
            });
        }
        Ok(())
    }

    /// Set the model name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
