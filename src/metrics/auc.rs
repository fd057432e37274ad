//! Mergeable AUC estimate.
//!
//! Exact rank-based AUC needs every score in one place. A scoring pass only
//! has partition-local state, so positives and negatives are counted in fixed
//! probability bins instead; merging two histograms is a bin-wise sum and the
//! result does not depend on how the rows were partitioned.

use serde::{Deserialize, Serialize};

/// Number of probability bins.
pub const AUC_BINS: usize = 1024;

/// Class-conditional score histograms over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AucHistogram {
    pos: Vec<u64>,
    neg: Vec<u64>,
}

impl Default for AucHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl AucHistogram {
    pub fn new() -> Self {
        Self {
            pos: vec![0; AUC_BINS],
            neg: vec![0; AUC_BINS],
        }
    }

    #[inline]
    fn bin(score: f64) -> usize {
        ((score.clamp(0.0, 1.0) * AUC_BINS as f64) as usize).min(AUC_BINS - 1)
    }

    /// Record the positive-class probability of one row.
    #[inline]
    pub fn add(&mut self, score: f64, positive: bool) {
        if score.is_nan() {
            return;
        }
        let b = Self::bin(score);
        if positive {
            self.pos[b] += 1;
        } else {
            self.neg[b] += 1;
        }
    }

    pub fn merge(&mut self, other: &Self) {
        for (a, b) in self.pos.iter_mut().zip(&other.pos) {
            *a += b;
        }
        for (a, b) in self.neg.iter_mut().zip(&other.neg) {
            *a += b;
        }
    }

    /// Probability that a random positive outranks a random negative, with
    /// same-bin pairs counted as ties.
    ///
    /// Returns 0.5 when either class is absent.
    pub fn auc(&self) -> f64 {
        let n_pos: u64 = self.pos.iter().sum();
        let n_neg: u64 = self.neg.iter().sum();
        if n_pos == 0 || n_neg == 0 {
            return 0.5;
        }

        let mut neg_below = 0u64;
        let mut area = 0.0f64;
        for (&p, &n) in self.pos.iter().zip(&self.neg) {
            area += p as f64 * (neg_below as f64 + 0.5 * n as f64);
            neg_below += n;
        }
        area / (n_pos as f64 * n_neg as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_and_inverted_ranking() {
        let mut h = AucHistogram::new();
        for s in [0.9, 0.8, 0.7] {
            h.add(s, true);
        }
        for s in [0.1, 0.2] {
            h.add(s, false);
        }
        assert_eq!(h.auc(), 1.0);

        let mut h = AucHistogram::new();
        h.add(0.1, true);
        h.add(0.9, false);
        assert_eq!(h.auc(), 0.0);
    }

    #[test]
    fn ties_count_half() {
        let mut h = AucHistogram::new();
        h.add(0.5, true);
        h.add(0.5, false);
        assert_eq!(h.auc(), 0.5);
    }

    #[test]
    fn single_class_is_uninformative() {
        let mut h = AucHistogram::new();
        h.add(0.3, true);
        assert_eq!(h.auc(), 0.5);
    }

    #[test]
    fn merge_is_partition_independent() {
        let scores = [(0.1, false), (0.35, true), (0.6, false), (0.8, true), (0.95, true)];
        let mut whole = AucHistogram::new();
        let mut left = AucHistogram::new();
        let mut right = AucHistogram::new();
        for (i, &(s, y)) in scores.iter().enumerate() {
            whole.add(s, y);
            if i % 2 == 0 { left.add(s, y) } else { right.add(s, y) }
        }
        left.merge(&right);
        assert_eq!(left, whole);
        // 5 of 6 positive/negative pairs are ordered correctly.
        assert!((whole.auc() - 5.0 / 6.0).abs() < 1e-12);
    }
}
