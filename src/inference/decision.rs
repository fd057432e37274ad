//! Choosing a class from posterior probabilities.

use serde::{Deserialize, Serialize};

/// Decision rule applied to a classifier's class probabilities.
///
/// Without a threshold the rule is argmax, with ties going to the lowest
/// class index. A threshold only applies to two-class problems, where class 1
/// is chosen when `p(class 1) >= threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DecisionRule {
    pub threshold: Option<f64>,
}

impl DecisionRule {
    /// Plain argmax.
    pub fn argmax() -> Self {
        Self { threshold: None }
    }

    /// Binary threshold on the probability of class 1.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: Some(threshold),
        }
    }

    /// Predicted class index for `probs` (one entry per class).
    #[inline]
    pub fn predict(&self, probs: &[f64]) -> usize {
        if let (Some(threshold), 2) = (self.threshold, probs.len()) {
            return usize::from(probs[1] >= threshold);
        }
        first_argmax(probs)
    }
}

/// Index of the largest value; the first one wins on ties.
#[inline]
pub fn first_argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_first_index_wins() {
        assert_eq!(first_argmax(&[0.2, 0.5, 0.3]), 1);
        assert_eq!(first_argmax(&[0.4, 0.4, 0.2]), 0);
        assert_eq!(first_argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(DecisionRule::argmax().predict(&[0.5, 0.5]), 0);
    }

    #[test]
    fn threshold_applies_to_binary_only() {
        let rule = DecisionRule::with_threshold(0.3);
        assert_eq!(rule.predict(&[0.65, 0.35]), 1);
        assert_eq!(rule.predict(&[0.75, 0.25]), 0);
        assert_eq!(rule.predict(&[0.7, 0.3]), 1);

        // Multinomial ignores the threshold.
        assert_eq!(rule.predict(&[0.6, 0.35, 0.05]), 0);
    }
}
