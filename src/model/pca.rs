//! PCA projection model.
//!
//! The learned state is an eigenvector matrix over the expanded row space
//! (one-hot categorical blocks followed by normalized numerics) together with
//! the [`ColumnLayout`] that describes that space. Scoring lives in
//! [`inference::pca`](crate::inference::pca).

use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::meta::{ModelCategory, ModelKind, ModelMeta};
use super::params::PcaParams;
use crate::data::{ColumnLayout, NumericStats};
use crate::error::{ConfigError, ScoringError};

// =============================================================================
// Learned state
// =============================================================================

/// Everything a fitted PCA model learned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaOutput {
    /// Shape `[expanded_width, k]`.
    pub eigenvectors: Array2<f64>,
    /// Standard deviation of each principal component.
    pub std_deviation: Vec<f64>,
    pub layout: ColumnLayout,
}

/// Variance explained by one principal component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentImportance {
    pub std_deviation: f64,
    pub proportion: f64,
    pub cumulative: f64,
}

impl PcaOutput {
    /// Number of principal components.
    #[inline]
    pub fn k(&self) -> usize {
        self.eigenvectors.ncols()
    }

    /// Proportion of variance explained by each component.
    pub fn importance(&self) -> Vec<ComponentImportance> {
        let total: f64 = self.std_deviation.iter().map(|s| s * s).sum();
        let mut cumulative = 0.0;
        self.std_deviation
            .iter()
            .map(|&sd| {
                let proportion = if total > 0.0 { sd * sd / total } else { 0.0 };
                cumulative += proportion;
                ComponentImportance {
                    std_deviation: sd,
                    proportion,
                    cumulative,
                }
            })
            .collect()
    }

    fn validate(&self, meta: &ModelMeta, params: &PcaParams) -> Result<(), ConfigError> {
        let layout = &self.layout;
        layout.validate()?;

        if self.eigenvectors.ncols() != params.k {
            return Err(ConfigError::EigenWidthMismatch {
                expected: params.k,
                actual: self.eigenvectors.ncols(),
            });
        }
        if self.eigenvectors.nrows() != layout.expanded_width() {
            return Err(ConfigError::EigenRowMismatch {
                expected: layout.expanded_width(),
                actual: self.eigenvectors.nrows(),
            });
        }
        if layout.row_width() != meta.n_features() {
            return Err(ConfigError::LengthMismatch {
                what: "row width",
                expected: meta.n_features(),
                actual: layout.row_width(),
            });
        }
        if self.std_deviation.len() != params.k {
            return Err(ConfigError::LengthMismatch {
                what: "component deviations",
                expected: params.k,
                actual: self.std_deviation.len(),
            });
        }

        let perm = layout.permutation();
        for j in 0..layout.n_cats() {
            let column = perm[j];
            let Some(card) = meta.cardinality(column) else {
                return Err(ConfigError::PredictorKind {
                    column,
                    expected: "categorical",
                });
            };
            let expected = if params.use_all_factor_levels { card } else { card.saturating_sub(1) };
            if layout.cat_block(j) != expected {
                return Err(ConfigError::LengthMismatch {
                    what: "categorical block",
                    expected,
                    actual: layout.cat_block(j),
                });
            }
        }
        for &column in &perm[layout.n_cats()..] {
            if meta.cardinality(column).is_some() {
                return Err(ConfigError::PredictorKind {
                    column,
                    expected: "numeric",
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// PcaModel
// =============================================================================

/// A validated PCA projector ready for scoring.
#[derive(Debug, Clone)]
pub struct PcaModel {
    meta: ModelMeta,
    params: PcaParams,
    output: Arc<PcaOutput>,
}

impl PcaModel {
    /// Validate the learned state against `meta` and `params` and build a model.
    pub fn new(mut meta: ModelMeta, params: PcaParams, output: PcaOutput) -> Result<Self, ScoringError> {
        params.validate()?;
        meta.validate()?;
        output.validate(&meta, &params)?;

        meta.kind = ModelKind::Pca;
        meta.category = ModelCategory::DimReduction;

        tracing::debug!(
            model = %meta.name,
            k = params.k,
            expanded_width = output.layout.expanded_width(),
            transform = ?params.transform,
            "built pca model"
        );

        Ok(Self {
            meta,
            params,
            output: Arc::new(output),
        })
    }

    /// Build a model from an eigenvector matrix and per-numeric training
    /// statistics, deriving the layout from `meta`.
    ///
    /// Categorical columns are moved ahead of numeric ones (keeping their
    /// relative order) and `stats` holds one entry per numeric column in
    /// training order.
    pub fn from_eigenvectors(
        meta: ModelMeta,
        params: PcaParams,
        eigenvectors: Array2<f64>,
        std_deviation: Vec<f64>,
        stats: &[NumericStats],
    ) -> Result<Self, ScoringError> {
        meta.validate()?;
        let (cats, nums): (Vec<usize>, Vec<usize>) =
            (0..meta.n_features()).partition(|&c| meta.cardinality(c).is_some());
        let cardinalities: Vec<usize> = cats.iter().filter_map(|&c| meta.cardinality(c)).collect();
        let permutation = cats.iter().chain(&nums).copied().collect();

        let layout = ColumnLayout::new(&cardinalities, nums.len(), params.use_all_factor_levels)
            .with_permutation(permutation)?
            .with_transform(params.transform, stats)?;

        let output = PcaOutput {
            eigenvectors,
            std_deviation,
            layout,
        };
        Self::new(meta, params, output)
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn params(&self) -> &PcaParams {
        &self.params
    }

    pub fn output(&self) -> &PcaOutput {
        &self.output
    }

    /// Shared handle to the learned state.
    pub fn shared_output(&self) -> Arc<PcaOutput> {
        Arc::clone(&self.output)
    }

    /// Names of the projected columns: `PC1..PCk`.
    pub fn component_names(&self) -> Vec<String> {
        (1..=self.params.k).map(|i| format!("PC{i}")).collect()
    }
}
