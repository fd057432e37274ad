//! Naive Bayes classifier model.
//!
//! Holds the learned state of a fitted naive Bayes classifier as an immutable
//! [`NaiveBayesOutput`] snapshot. Scoring lives in
//! [`inference::naive_bayes`](crate::inference::naive_bayes).

use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::meta::{ModelCategory, ModelKind, ModelMeta};
use super::params::NaiveBayesParams;
use crate::error::{ConfigError, ScoringError};
use crate::inference::DecisionRule;

// =============================================================================
// Learned state
// =============================================================================

/// Conditional distribution of one predictor given the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredictorTable {
    /// `probs[[r, level]]` is `p(level | r)` for the levels observed during
    /// training. Rows need not sum to one.
    Categorical {
        probs: Array2<f64>,
        /// Size of the training domain, used for Laplace smoothing.
        cardinality: usize,
    },
    /// Per response level Gaussian parameters.
    Numeric { mean: Vec<f64>, sdev: Vec<f64> },
}

impl PredictorTable {
    /// Returns true for a categorical predictor.
    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Categorical { .. })
    }
}

/// Everything a fitted naive Bayes classifier learned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesOutput {
    /// Prior probability of each response level.
    pub apriori: Vec<f64>,
    /// Training row count of each response level.
    pub rescnt: Vec<f64>,
    /// One table per predictor, categorical predictors first.
    pub tables: Vec<PredictorTable>,
}

impl NaiveBayesOutput {
    /// Number of response levels.
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.apriori.len()
    }

    /// Number of categorical predictors.
    pub fn n_cats(&self) -> usize {
        self.tables.iter().take_while(|t| t.is_categorical()).count()
    }

    fn validate(&self, meta: &ModelMeta) -> Result<(), ConfigError> {
        let n_levels = self.n_levels();
        if n_levels == 0 {
            return Err(ConfigError::NoResponseLevels);
        }
        if let Some(domain) = &meta.response_domain {
            if domain.len() != n_levels {
                return Err(ConfigError::LengthMismatch {
                    what: "response domain",
                    expected: n_levels,
                    actual: domain.len(),
                });
            }
        }
        if self.rescnt.len() != n_levels {
            return Err(ConfigError::LengthMismatch {
                what: "response counts",
                expected: n_levels,
                actual: self.rescnt.len(),
            });
        }
        for (level, &value) in self.apriori.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidPrior { level, value });
            }
        }

        if self.tables.len() != meta.n_features() {
            return Err(ConfigError::LengthMismatch {
                what: "predictor tables",
                expected: meta.n_features(),
                actual: self.tables.len(),
            });
        }

        let n_cats = self.n_cats();
        for (column, (table, domain)) in self.tables.iter().zip(&meta.domains).enumerate() {
            match table {
                PredictorTable::Categorical { probs, cardinality } => {
                    if column >= n_cats || domain.is_none() {
                        return Err(ConfigError::PredictorKind {
                            column,
                            expected: "numeric",
                        });
                    }
                    let domain_len = domain.as_ref().map_or(0, Vec::len);
                    if *cardinality != domain_len {
                        return Err(ConfigError::LengthMismatch {
                            what: "categorical cardinality",
                            expected: domain_len,
                            actual: *cardinality,
                        });
                    }
                    if probs.nrows() != n_levels {
                        return Err(ConfigError::LengthMismatch {
                            what: "categorical table rows",
                            expected: n_levels,
                            actual: probs.nrows(),
                        });
                    }
                    if probs.ncols() > *cardinality {
                        return Err(ConfigError::LengthMismatch {
                            what: "observed levels",
                            expected: *cardinality,
                            actual: probs.ncols(),
                        });
                    }
                }
                PredictorTable::Numeric { mean, sdev } => {
                    if domain.is_some() {
                        return Err(ConfigError::PredictorKind {
                            column,
                            expected: "categorical",
                        });
                    }
                    for (what, v) in [("numeric means", mean), ("numeric deviations", sdev)] {
                        if v.len() != n_levels {
                            return Err(ConfigError::LengthMismatch {
                                what,
                                expected: n_levels,
                                actual: v.len(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// NaiveBayesModel
// =============================================================================

/// A validated naive Bayes classifier ready for scoring.
///
/// Access components via [`meta()`](Self::meta), [`params()`](Self::params)
/// and [`output()`](Self::output).
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    meta: ModelMeta,
    params: NaiveBayesParams,
    output: Arc<NaiveBayesOutput>,
    rule: DecisionRule,
}

impl NaiveBayesModel {
    /// Validate the learned state against `meta` and build a model.
    ///
    /// The model kind and category in `meta` are derived from the output.
    pub fn new(
        mut meta: ModelMeta,
        params: NaiveBayesParams,
        output: NaiveBayesOutput,
    ) -> Result<Self, ScoringError> {
        params.validate()?;
        meta.validate()?;
        output.validate(&meta)?;

        meta.kind = ModelKind::NaiveBayes;
        meta.category = ModelCategory::for_classifier(output.n_levels());

        tracing::debug!(
            model = %meta.name,
            levels = output.n_levels(),
            categorical = output.n_cats(),
            numeric = output.tables.len() - output.n_cats(),
            "built naive bayes model"
        );

        Ok(Self {
            meta,
            params,
            output: Arc::new(output),
            rule: DecisionRule::default(),
        })
    }

    /// Use a binary decision threshold instead of argmax.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.rule = DecisionRule::with_threshold(threshold);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn params(&self) -> &NaiveBayesParams {
        &self.params
    }

    pub fn output(&self) -> &NaiveBayesOutput {
        &self.output
    }

    /// Shared handle to the learned state.
    pub fn shared_output(&self) -> Arc<NaiveBayesOutput> {
        Arc::clone(&self.output)
    }

    pub fn rule(&self) -> DecisionRule {
        self.rule
    }

    /// Response level names, falling back to level indices.
    pub fn levels(&self) -> Vec<String> {
        match &self.meta.response_domain {
            Some(domain) => domain.clone(),
            None => (0..self.output.n_levels()).map(|r| r.to_string()).collect(),
        }
    }
}
