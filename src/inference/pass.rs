//! Whole-frame scoring pass.
//!
//! Rows are split into disjoint blocks of [`ScoringConfig::row_block`] rows.
//! Each block owns its row buffer, kernel scratch, slice of the output
//! matrix and a fresh metric accumulator, so blocks score independently
//! (in parallel when allowed). Block accumulators are then merged in block
//! order on the calling thread.
//!
//! A pass is all-or-nothing: either every row is scored and the merged
//! accumulator is returned, or the first error is.

use bon::Builder;
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Scorer;
use crate::data::AdaptedFrame;
use crate::error::{ConfigError, ScoringError, UnsupportedMetricError};
use crate::metrics::{MetricAccumulator, MetricBuilder};
use crate::model::ParamValidationError;
use crate::utils::run_with_threads;

// =============================================================================
// ScoringConfig
// =============================================================================

/// Settings of one scoring pass.
///
/// ```
/// use scorekit::inference::ScoringConfig;
///
/// let config = ScoringConfig::builder().n_threads(1).destination("scored").build().unwrap();
/// assert_eq!(config.row_block, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct ScoringConfig {
    /// Thread count: 0 = auto, 1 = sequential, >1 = exact count. Default: 0.
    #[builder(default = 0)]
    pub n_threads: usize,

    /// Rows per block. Default: 4096.
    #[builder(default = 4096)]
    pub row_block: usize,

    /// Name of the output frame. Default: derived from model and frame names.
    #[builder(into)]
    pub destination: Option<String>,

    /// Accumulate metrics when the model supports them. Default: true.
    #[builder(default = true)]
    pub compute_metrics: bool,
}

impl<S: scoring_config_builder::IsComplete> ScoringConfigBuilder<S> {
    /// Build and validate the configuration.
    pub fn build(self) -> Result<ScoringConfig, ParamValidationError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if self.row_block == 0 {
            return Err(ParamValidationError::InvalidRowBlock(self.row_block));
        }
        Ok(())
    }
}

// =============================================================================
// Pass
// =============================================================================

/// What the metric accumulator receives as the actual of each row.
#[derive(Debug, Clone, Copy)]
pub enum Actuals<'a> {
    /// No metrics.
    None,
    /// One response code per row.
    Response(ArrayView1<'a, f64>),
    /// The encoded input row itself.
    Row,
}

/// Predictions and the merged accumulator of a pass.
#[derive(Debug, Clone)]
pub struct PassOutput {
    /// Shape `[n_rows, n_outputs]`.
    pub predictions: Array2<f64>,
    pub metrics: Option<MetricAccumulator>,
}

/// Score every row of `frame`, feeding `metrics` (if any) along the way.
///
/// Predictions are bitwise identical whatever the thread count or block size.
pub fn run_pass<S: Scorer + ?Sized>(
    scorer: &S,
    frame: &AdaptedFrame,
    actuals: Actuals<'_>,
    metrics: Option<MetricAccumulator>,
    config: &ScoringConfig,
) -> Result<PassOutput, ScoringError> {
    config.validate()?;
    let n_rows = frame.n_rows();
    let n_features = scorer.n_features();
    let n_outputs = scorer.n_outputs();

    if frame.n_features() != n_features {
        return Err(ConfigError::LengthMismatch {
            what: "row width",
            expected: n_features,
            actual: frame.n_features(),
        }
        .into());
    }
    if let Actuals::Response(response) = actuals {
        if response.len() != n_rows {
            return Err(ConfigError::LengthMismatch {
                what: "response length",
                expected: n_rows,
                actual: response.len(),
            }
            .into());
        }
    }
    let metrics = match actuals {
        Actuals::None => None,
        _ => metrics,
    };

    let block = config.row_block;
    let chunk_len = (block * n_outputs).max(1);
    let n_blocks = n_rows.div_ceil(block);
    tracing::info!(
        frame = %frame.name(),
        rows = n_rows,
        blocks = n_blocks,
        threads = config.n_threads,
        outputs = n_outputs,
        metrics = metrics.as_ref().map(MetricBuilder::name),
        "scoring pass"
    );

    let mut preds = vec![0.0; n_rows * n_outputs];
    let template = metrics.as_ref();

    let score_block = |(b, chunk): (usize, &mut [f64])| -> Result<Option<MetricAccumulator>, UnsupportedMetricError> {
        let mut row = vec![0.0; n_features];
        let mut scratch = vec![0.0; scorer.scratch_len()];
        let mut local = template.map(MetricBuilder::fresh);
        let start = b * block;

        for (i, out) in chunk.chunks_mut(n_outputs.max(1)).enumerate() {
            let r = start + i;
            frame.gather_row(r, &mut row);
            scorer.score0(&row, &mut scratch, out);
            if let Some(acc) = local.as_mut() {
                match actuals {
                    Actuals::Response(response) => acc.per_row(out, &[response[r]])?,
                    Actuals::Row => acc.per_row(out, &row)?,
                    Actuals::None => {}
                }
            }
        }
        Ok(local)
    };

    let partials: Vec<Result<Option<MetricAccumulator>, UnsupportedMetricError>> =
        run_with_threads(config.n_threads, |parallelism| {
            if parallelism.is_parallel() {
                preds.par_chunks_mut(chunk_len).enumerate().map(score_block).collect()
            } else {
                preds.chunks_mut(chunk_len).enumerate().map(score_block).collect()
            }
        });

    let mut merged = metrics;
    for partial in partials {
        if let (Some(acc), Some(part)) = (merged.as_mut(), partial?) {
            acc.merge(part)?;
        }
    }

    if let Some(acc) = &merged {
        tracing::debug!(nobs = acc.nobs(), "metrics accumulated");
    }

    let predictions =
        Array2::from_shape_vec((n_rows, n_outputs), preds).expect("prediction buffer is n_rows * n_outputs");
    Ok(PassOutput {
        predictions,
        metrics: merged,
    })
}
