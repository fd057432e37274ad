//! Column layout of an expanded (one-hot + numeric) row space.
//!
//! A projector sees each row as a block of one-hot indicator slots (one block
//! per categorical column, in order) followed by one slot per numeric column:
//!
//! ```text
//! cat_offsets = [0, 3, 5]        two categoricals with 3 and 2 expanded levels
//! slots       = [c0 c0 c0 | c1 c1 | n0 n1 ...]
//!                             ^ numeric block starts at cat_offsets[n_cats]
//! ```
//!
//! The layout also carries the permutation from the scoring row order to the
//! categorical-first order and the per-numeric `(sub, mul)` normalization.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// =============================================================================
// TransformType
// =============================================================================

/// Transformation applied to numeric columns before projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransformType {
    /// Use raw values.
    #[default]
    None,
    /// Subtract the mean.
    Demean,
    /// Divide by the standard deviation.
    Descale,
    /// Subtract the mean and divide by the standard deviation.
    Standardize,
    /// Subtract the minimum and divide by the range.
    Normalize,
}

/// Training statistics of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub mean: f64,
    pub sigma: f64,
    pub min: f64,
    pub max: f64,
}

impl TransformType {
    /// The `(sub, mul)` pair for a column with the given statistics.
    ///
    /// A zero spread yields a multiplier of 1.
    pub fn norm_pair(self, stats: &NumericStats) -> (f64, f64) {
        let inv = |spread: f64| if spread != 0.0 { 1.0 / spread } else { 1.0 };
        match self {
            Self::None => (0.0, 1.0),
            Self::Demean => (stats.mean, 1.0),
            Self::Descale => (0.0, inv(stats.sigma)),
            Self::Standardize => (stats.mean, inv(stats.sigma)),
            Self::Normalize => (stats.min, inv(stats.max - stats.min)),
        }
    }
}

// =============================================================================
// ColumnLayout
// =============================================================================

/// Layout of categorical and numeric columns in the expanded row space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// `n_cats + 1` offsets; the last one is the start of the numeric block.
    cat_offsets: Vec<usize>,
    n_nums: usize,
    /// `permutation[j]` is the position in the scoring row of the j-th column
    /// in categorical-first order.
    permutation: Vec<usize>,
    norm_sub: Vec<f64>,
    norm_mul: Vec<f64>,
}

impl ColumnLayout {
    /// Layout for categoricals with the given training cardinalities followed
    /// by `n_nums` numeric columns, identity permutation, no normalization.
    ///
    /// With `use_all_factor_levels == false` every categorical block drops
    /// its last level.
    pub fn new(cardinalities: &[usize], n_nums: usize, use_all_factor_levels: bool) -> Self {
        let mut cat_offsets = Vec::with_capacity(cardinalities.len() + 1);
        let mut offset = 0;
        cat_offsets.push(offset);
        for &card in cardinalities {
            offset += if use_all_factor_levels {
                card
            } else {
                card.saturating_sub(1)
            };
            cat_offsets.push(offset);
        }

        let width = cardinalities.len() + n_nums;
        Self {
            cat_offsets,
            n_nums,
            permutation: (0..width).collect(),
            norm_sub: vec![0.0; n_nums],
            norm_mul: vec![1.0; n_nums],
        }
    }

    /// Build from raw parts, validating every invariant.
    pub fn from_parts(
        cat_offsets: Vec<usize>,
        n_nums: usize,
        permutation: Vec<usize>,
        norm_sub: Vec<f64>,
        norm_mul: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        let layout = Self {
            cat_offsets,
            n_nums,
            permutation,
            norm_sub,
            norm_mul,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Set the row permutation.
    pub fn with_permutation(mut self, permutation: Vec<usize>) -> Result<Self, ConfigError> {
        self.permutation = permutation;
        self.validate()?;
        Ok(self)
    }

    /// Set the numeric normalization pairs directly.
    pub fn with_normalization(mut self, sub: Vec<f64>, mul: Vec<f64>) -> Result<Self, ConfigError> {
        self.norm_sub = sub;
        self.norm_mul = mul;
        self.validate()?;
        Ok(self)
    }

    /// Derive the normalization pairs from training statistics.
    pub fn with_transform(
        self,
        transform: TransformType,
        stats: &[NumericStats],
    ) -> Result<Self, ConfigError> {
        let (sub, mul) = stats.iter().map(|s| transform.norm_pair(s)).unzip();
        self.with_normalization(sub, mul)
    }

    /// Check every layout invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.cat_offsets.first() {
            Some(0) => {}
            _ => return Err(ConfigError::InvalidOffsets { column: 0 }),
        }
        for (j, pair) in self.cat_offsets.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::InvalidOffsets { column: j });
            }
        }

        let width = self.n_cats() + self.n_nums;
        if self.permutation.len() != width {
            return Err(ConfigError::LengthMismatch {
                what: "permutation length",
                expected: width,
                actual: self.permutation.len(),
            });
        }
        let mut seen = vec![false; width];
        for &p in &self.permutation {
            if p >= width || std::mem::replace(&mut seen[p], true) {
                return Err(ConfigError::InvalidPermutation { width });
            }
        }

        for (what, v) in [("norm_sub length", &self.norm_sub), ("norm_mul length", &self.norm_mul)] {
            if v.len() != self.n_nums {
                return Err(ConfigError::LengthMismatch {
                    what,
                    expected: self.n_nums,
                    actual: v.len(),
                });
            }
        }
        Ok(())
    }

    /// Number of categorical columns.
    #[inline]
    pub fn n_cats(&self) -> usize {
        self.cat_offsets.len() - 1
    }

    /// Number of numeric columns.
    #[inline]
    pub fn n_nums(&self) -> usize {
        self.n_nums
    }

    /// Width of a scoring row.
    #[inline]
    pub fn row_width(&self) -> usize {
        self.n_cats() + self.n_nums
    }

    /// Start of the numeric block in the expanded space.
    #[inline]
    pub fn num_start(&self) -> usize {
        self.cat_offsets[self.n_cats()]
    }

    /// Total width of the expanded space.
    #[inline]
    pub fn expanded_width(&self) -> usize {
        self.num_start() + self.n_nums
    }

    /// Offset of categorical column `j` in the expanded space.
    #[inline]
    pub fn cat_offset(&self, j: usize) -> usize {
        self.cat_offsets[j]
    }

    /// Number of expanded slots of categorical column `j`.
    #[inline]
    pub fn cat_block(&self, j: usize) -> usize {
        self.cat_offsets[j + 1] - self.cat_offsets[j]
    }

    #[inline]
    pub fn cat_offsets(&self) -> &[usize] {
        &self.cat_offsets
    }

    #[inline]
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    #[inline]
    pub fn norm_sub(&self) -> &[f64] {
        &self.norm_sub
    }

    #[inline]
    pub fn norm_mul(&self) -> &[f64] {
        &self.norm_mul
    }

    /// Expanded-space slot for level `value` of categorical column `j`.
    ///
    /// `None` for missing values and for levels outside the column's block
    /// (unseen levels, or the dropped last level).
    #[inline]
    pub fn cat_slot(&self, j: usize, value: f64) -> Option<usize> {
        if value.is_nan() || value < 0.0 {
            return None;
        }
        let level = value as usize;
        (level < self.cat_block(j)).then(|| self.cat_offsets[j] + level)
    }

    /// Write the expanded, normalized encoding of `row` into `out`.
    ///
    /// Missing numerics and unrepresented levels leave zeros.
    pub fn expand_into(&self, row: &[f64], out: &mut [f64]) {
        debug_assert_eq!(row.len(), self.row_width());
        debug_assert_eq!(out.len(), self.expanded_width());
        out.fill(0.0);
        let n_cats = self.n_cats();
        for j in 0..n_cats {
            if let Some(slot) = self.cat_slot(j, row[self.permutation[j]]) {
                out[slot] = 1.0;
            }
        }
        let num_start = self.num_start();
        for j in 0..self.n_nums {
            let x = row[self.permutation[n_cats + j]];
            if !x.is_nan() {
                out[num_start + j] = (x - self.norm_sub[j]) * self.norm_mul[j];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_from_cardinalities() {
        let layout = ColumnLayout::new(&[3, 2], 2, true);
        assert_eq!(layout.cat_offsets(), &[0, 3, 5]);
        assert_eq!(layout.num_start(), 5);
        assert_eq!(layout.expanded_width(), 7);
        assert_eq!(layout.row_width(), 4);

        let dropped = ColumnLayout::new(&[3, 2], 2, false);
        assert_eq!(dropped.cat_offsets(), &[0, 2, 3]);
        assert_eq!(dropped.expanded_width(), 5);
    }

    #[test]
    fn cat_slot_skips_missing_and_out_of_block() {
        let layout = ColumnLayout::new(&[3], 0, false);
        assert_eq!(layout.cat_slot(0, 0.0), Some(0));
        assert_eq!(layout.cat_slot(0, 1.0), Some(1));
        // Dropped last level.
        assert_eq!(layout.cat_slot(0, 2.0), None);
        assert_eq!(layout.cat_slot(0, f64::NAN), None);
        assert_eq!(layout.cat_slot(0, 7.0), None);
    }

    #[test]
    fn validation_rejects_bad_parts() {
        let err = ColumnLayout::from_parts(vec![0, 2, 2], 0, vec![0, 1], vec![], vec![]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidOffsets { column: 1 });

        let err = ColumnLayout::new(&[2], 1, true)
            .with_permutation(vec![0, 0])
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPermutation { width: 2 });

        let err = ColumnLayout::new(&[], 2, true)
            .with_normalization(vec![0.0], vec![1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, ConfigError::LengthMismatch { what: "norm_sub length", .. }));
    }

    #[test]
    fn transform_pairs() {
        let stats = NumericStats { mean: 2.0, sigma: 4.0, min: -1.0, max: 3.0 };
        assert_eq!(TransformType::None.norm_pair(&stats), (0.0, 1.0));
        assert_eq!(TransformType::Demean.norm_pair(&stats), (2.0, 1.0));
        assert_eq!(TransformType::Descale.norm_pair(&stats), (0.0, 0.25));
        assert_eq!(TransformType::Standardize.norm_pair(&stats), (2.0, 0.25));
        assert_eq!(TransformType::Normalize.norm_pair(&stats), (-1.0, 0.25));

        let constant = NumericStats { mean: 1.0, sigma: 0.0, min: 1.0, max: 1.0 };
        assert_eq!(TransformType::Standardize.norm_pair(&constant), (1.0, 1.0));
    }

    #[test]
    fn expand_applies_permutation_and_normalization() {
        // Scoring row order: [num, cat]; categorical-first order: [cat, num].
        let layout = ColumnLayout::new(&[2], 1, true)
            .with_permutation(vec![1, 0])
            .unwrap()
            .with_normalization(vec![1.0], vec![0.5])
            .unwrap();
        let mut out = vec![9.0; layout.expanded_width()];
        layout.expand_into(&[5.0, 1.0], &mut out);
        assert_eq!(out, vec![0.0, 1.0, 2.0]);

        layout.expand_into(&[f64::NAN, f64::NAN], &mut out);
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
    }
}
