//! Hyperparameter groups for the supported model families.
//!
//! These control the numeric behaviour of the scoring kernels only; nothing
//! here affects how a model was fitted.
//!
//! Both groups use `bon` builders that validate on `build()`:
//!
//! ```
//! use scorekit::model::{NaiveBayesParams, PcaParams};
//!
//! let nb = NaiveBayesParams::builder().laplace(1.0).build().unwrap();
//! assert_eq!(nb.min_prob, 0.001);
//!
//! let pca = PcaParams::builder().k(3).build().unwrap();
//! assert!(!pca.use_all_factor_levels);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::data::TransformType;

// =============================================================================
// NaiveBayesParams
// =============================================================================

/// Smoothing and stability parameters for the naive Bayes kernel.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct NaiveBayesParams {
    /// Laplace smoothing constant for levels unseen at training time. Default: 0.
    #[builder(default = 0.0)]
    pub laplace: f64,

    /// Probabilities at or below this cutoff are replaced by `min_prob`. Default: 0.
    #[builder(default = 0.0)]
    pub eps_prob: f64,

    /// Floor used in place of probabilities at or below `eps_prob`. Default: 0.001.
    #[builder(default = 0.001)]
    pub min_prob: f64,

    /// Standard deviations at or below this cutoff are replaced by `min_sdev`. Default: 0.
    #[builder(default = 0.0)]
    pub eps_sdev: f64,

    /// Floor used in place of standard deviations at or below `eps_sdev`. Default: 0.001.
    #[builder(default = 0.001)]
    pub min_sdev: f64,

    /// Accumulate quality metrics during a scoring pass. Default: true.
    #[builder(default = true)]
    pub compute_metrics: bool,
}

impl<S: naive_bayes_params_builder::IsComplete> NaiveBayesParamsBuilder<S> {
    /// Build and validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamValidationError`] if a constant is negative, non-finite,
    /// or a floor is not strictly positive.
    pub fn build(self) -> Result<NaiveBayesParams, ParamValidationError> {
        let params = self.__build_internal();
        params.validate()?;
        Ok(params)
    }
}

impl Default for NaiveBayesParams {
    fn default() -> Self {
        Self::builder().build().expect("default params are valid")
    }
}

impl NaiveBayesParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if !(self.laplace >= 0.0 && self.laplace.is_finite()) {
            return Err(ParamValidationError::InvalidLaplace(self.laplace));
        }
        if !(self.eps_prob >= 0.0 && self.eps_prob.is_finite()) {
            return Err(ParamValidationError::InvalidCutoff {
                field: "eps_prob",
                value: self.eps_prob,
            });
        }
        if !(self.eps_sdev >= 0.0 && self.eps_sdev.is_finite()) {
            return Err(ParamValidationError::InvalidCutoff {
                field: "eps_sdev",
                value: self.eps_sdev,
            });
        }
        if !(self.min_prob > 0.0 && self.min_prob <= 1.0) {
            return Err(ParamValidationError::InvalidFloor {
                field: "min_prob",
                value: self.min_prob,
            });
        }
        if !(self.min_sdev > 0.0 && self.min_sdev.is_finite()) {
            return Err(ParamValidationError::InvalidFloor {
                field: "min_sdev",
                value: self.min_sdev,
            });
        }
        Ok(())
    }
}

// =============================================================================
// PcaParams
// =============================================================================

/// Parameters of the PCA projector.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct PcaParams {
    /// Number of principal components. Default: 1.
    #[builder(default = 1)]
    pub k: usize,

    /// Transformation applied to numeric columns before projection. Default: none.
    #[builder(default)]
    pub transform: TransformType,

    /// Keep every level of each categorical when expanding. When false, the
    /// last level is dropped and contributes nothing. Default: false.
    #[builder(default = false)]
    pub use_all_factor_levels: bool,

    /// Keep the projection of the training frame under `loading_name`. Default: true.
    #[builder(default = true)]
    pub keep_loading: bool,

    /// Name of the projection frame kept when `keep_loading` is set.
    #[builder(into)]
    pub loading_name: Option<String>,
}

impl<S: pca_params_builder::IsComplete> PcaParamsBuilder<S> {
    /// Build and validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamValidationError::InvalidK`] if `k == 0`.
    pub fn build(self) -> Result<PcaParams, ParamValidationError> {
        let params = self.__build_internal();
        params.validate()?;
        Ok(params)
    }
}

impl Default for PcaParams {
    fn default() -> Self {
        Self::builder().build().expect("default params are valid")
    }
}

impl PcaParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if self.k == 0 {
            return Err(ParamValidationError::InvalidK(self.k));
        }
        Ok(())
    }

    /// Default destination name for whole-frame projections, if any.
    pub fn loading_destination(&self) -> Option<&str> {
        if self.keep_loading {
            self.loading_name.as_deref()
        } else {
            None
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Parameter validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamValidationError {
    /// Laplace smoothing must be a finite value >= 0.
    #[error("laplace must be >= 0, got {0}")]
    InvalidLaplace(f64),

    /// Cutoffs must be finite values >= 0.
    #[error("{field} must be >= 0, got {value}")]
    InvalidCutoff { field: &'static str, value: f64 },

    /// Floors must be strictly positive.
    #[error("{field} must be > 0, got {value}")]
    InvalidFloor { field: &'static str, value: f64 },

    /// At least one principal component is required.
    #[error("k must be >= 1, got {0}")]
    InvalidK(usize),

    /// A scoring pass needs at least one row per block.
    #[error("row_block must be >= 1, got {0}")]
    InvalidRowBlock(usize),
}
