//! Scoring models.
//!
//! # Overview
//!
//! - [`NaiveBayesModel`]: naive Bayes classifier
//! - [`PcaModel`]: principal component projector
//! - [`Model`]: either of the above, with frame-level scoring
//! - [`ModelMeta`]: shared metadata for all model types
//!
//! # Example
//!
//! ```ignore
//! use scorekit::inference::ScoringConfig;
//! use scorekit::model::Model;
//!
//! let model = Model::from(naive_bayes_model);
//! let result = model.score(&test_frame, &ScoringConfig::default())?;
//! println!("{:?}", result.metrics);
//! ```

mod meta;
pub mod naive_bayes;
mod params;
pub mod pca;

pub use meta::{ModelCategory, ModelKind, ModelMeta};
pub use naive_bayes::{NaiveBayesModel, NaiveBayesOutput, PredictorTable};
pub use params::{NaiveBayesParams, ParamValidationError, PcaParams};
pub use pca::{ComponentImportance, PcaModel, PcaOutput};

use ndarray::ArrayView2;

use crate::data::{adapt, AdaptedFrame, Column, Frame};
use crate::error::{ScoringError, UnsupportedMetricError};
use crate::inference::{run_pass, Actuals, Scorer, ScoringConfig};
use crate::metrics::{
    BinomialBuilder, DimReductionBuilder, MetricAccumulator, MetricBuilder, MetricsIdentity,
    ModelMetrics, MultinomialBuilder,
};

// =============================================================================
// Model
// =============================================================================

/// A validated model of any supported kind.
#[derive(Debug, Clone)]
pub enum Model {
    NaiveBayes(NaiveBayesModel),
    Pca(PcaModel),
}

/// Output of [`Model::score`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Predictions (classifier) or projections (PCA) as a named frame.
    pub predictions: Frame,
    /// Metrics of the pass, when computed.
    pub metrics: Option<ModelMetrics>,
}

impl From<NaiveBayesModel> for Model {
    fn from(model: NaiveBayesModel) -> Self {
        Self::NaiveBayes(model)
    }
}

impl From<PcaModel> for Model {
    fn from(model: PcaModel) -> Self {
        Self::Pca(model)
    }
}

impl Model {
    pub fn meta(&self) -> &ModelMeta {
        match self {
            Self::NaiveBayes(m) => m.meta(),
            Self::Pca(m) => m.meta(),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.meta().kind
    }

    pub fn category(&self) -> ModelCategory {
        self.meta().category
    }

    /// Whether the model's own parameters ask for metrics.
    fn wants_metrics(&self) -> bool {
        match self {
            Self::NaiveBayes(m) => m.params().compute_metrics,
            Self::Pca(_) => true,
        }
    }

    /// A fresh metric accumulator for this model's category.
    pub fn make_metric_builder(&self) -> Result<MetricAccumulator, UnsupportedMetricError> {
        match self {
            Self::NaiveBayes(m) => match m.meta().category {
                ModelCategory::Binomial => Ok(MetricAccumulator::Binomial(BinomialBuilder::new(m.levels()))),
                ModelCategory::Multinomial => {
                    Ok(MetricAccumulator::Multinomial(MultinomialBuilder::new(m.levels())))
                }
                category => Err(UnsupportedMetricError::new(ModelKind::NaiveBayes.name(), category)),
            },
            Self::Pca(m) => Ok(MetricAccumulator::DimReduction(DimReductionBuilder::new(
                m.shared_output(),
            ))),
        }
    }

    /// Adapt `frame` to the training schema and score it.
    pub fn score(&self, frame: &Frame, config: &ScoringConfig) -> Result<ScoreResult, ScoringError> {
        let adapted = adapt(frame, self.meta())?;
        self.score_adapted(&adapted, config)
    }

    /// Score an already adapted frame.
    pub fn score_adapted(&self, frame: &AdaptedFrame, config: &ScoringConfig) -> Result<ScoreResult, ScoringError> {
        let meta = self.meta();
        let (metrics, actuals) = if config.compute_metrics && self.wants_metrics() {
            match (meta.category.is_supervised(), frame.response()) {
                (false, _) => (Some(self.make_metric_builder()?), Actuals::Row),
                (true, Some(response)) => (Some(self.make_metric_builder()?), Actuals::Response(response)),
                (true, None) => {
                    tracing::debug!(model = %meta.name, frame = %frame.name(), "no response column, skipping metrics");
                    (None, Actuals::None)
                }
            }
        } else {
            (None, Actuals::None)
        };

        let out = run_pass(self, frame, actuals, metrics, config)?;

        let identity = MetricsIdentity::new(meta.name.clone(), frame.name());
        let metrics = out.metrics.map(|m| m.finalize(identity));
        let destination = self.destination(frame, config);
        let predictions = self.predictions_frame(destination, out.predictions.view())?;

        tracing::info!(
            model = %meta.name,
            frame = %frame.name(),
            destination = %predictions.name(),
            rows = frame.n_rows(),
            "scored frame"
        );
        Ok(ScoreResult { predictions, metrics })
    }

    fn destination(&self, frame: &AdaptedFrame, config: &ScoringConfig) -> String {
        let loading = match self {
            Self::Pca(m) => m.params().loading_destination(),
            Self::NaiveBayes(_) => None,
        };
        config
            .destination
            .as_deref()
            .or(loading)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}_on_{}", self.meta().name, frame.name()))
    }

    /// Wrap a `[n_rows, n_outputs]` prediction matrix as a named frame.
    fn predictions_frame(&self, name: String, preds: ArrayView2<'_, f64>) -> Result<Frame, ScoringError> {
        let names = self.output_names();
        let mut frame = Frame::new(name);
        for (j, (col_name, values)) in names.into_iter().zip(preds.columns()).enumerate() {
            let values = values.to_vec();
            let column = match self {
                Self::NaiveBayes(m) if j == 0 => Column::categorical(col_name, values, m.levels()),
                _ => Column::numeric(col_name, values),
            };
            frame.push(column)?;
        }
        Ok(frame)
    }
}

impl Scorer for Model {
    fn n_features(&self) -> usize {
        match self {
            Self::NaiveBayes(m) => m.n_features(),
            Self::Pca(m) => m.n_features(),
        }
    }

    fn n_outputs(&self) -> usize {
        match self {
            Self::NaiveBayes(m) => m.n_outputs(),
            Self::Pca(m) => m.n_outputs(),
        }
    }

    fn scratch_len(&self) -> usize {
        match self {
            Self::NaiveBayes(m) => m.scratch_len(),
            Self::Pca(m) => m.scratch_len(),
        }
    }

    #[inline]
    fn score0(&self, row: &[f64], scratch: &mut [f64], preds: &mut [f64]) {
        match self {
            Self::NaiveBayes(m) => m.score0(row, scratch, preds),
            Self::Pca(m) => m.score0(row, scratch, preds),
        }
    }

    fn output_names(&self) -> Vec<String> {
        match self {
            Self::NaiveBayes(m) => m.output_names(),
            Self::Pca(m) => m.output_names(),
        }
    }
}
