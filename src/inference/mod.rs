//! Scoring kernels and the pass driver.
//!
//! # Module Structure
//!
//! - [`Scorer`]: the capability every model variant implements
//! - [`naive_bayes`]: log-space naive Bayes classifier kernel
//! - [`pca`]: mixed categorical/numeric linear projection kernel
//! - [`DecisionRule`]: argmax / binary threshold over class probabilities
//! - [`pass`]: parallel scoring of a whole frame with metric accumulation
//!
//! Kernels are pure: given the same row and model they write the same
//! prediction vector, touch no shared mutable state and never allocate. Any
//! scratch space they need is declared by [`Scorer::scratch_len`] and owned
//! by the caller, one buffer per worker.

mod decision;
pub mod naive_bayes;
pub mod pass;
pub mod pca;

pub use decision::{first_argmax, DecisionRule};
pub use naive_bayes::gaussian_density;
pub use pass::{run_pass, Actuals, PassOutput, ScoringConfig};

/// Per-row scoring capability.
pub trait Scorer: Send + Sync {
    /// Width of the encoded row the kernel reads.
    fn n_features(&self) -> usize;

    /// Length of the prediction vector the kernel writes.
    fn n_outputs(&self) -> usize;

    /// Scratch floats needed by [`score0`](Self::score0).
    fn scratch_len(&self) -> usize {
        0
    }

    /// Score one encoded row into `preds`.
    ///
    /// `row.len() == n_features()`, `scratch.len() >= scratch_len()` and
    /// `preds.len() == n_outputs()`. Missing values are `NaN`. Once the model
    /// has been validated this cannot fail.
    fn score0(&self, row: &[f64], scratch: &mut [f64], preds: &mut [f64]);

    /// Names of the prediction columns.
    fn output_names(&self) -> Vec<String>;

    /// Allocating convenience wrapper around [`score0`](Self::score0).
    fn score_row(&self, row: &[f64]) -> Vec<f64> {
        let mut scratch = vec![0.0; self.scratch_len()];
        let mut preds = vec![0.0; self.n_outputs()];
        self.score0(row, &mut scratch, &mut preds);
        preds
    }
}
