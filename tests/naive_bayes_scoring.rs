//! Naive Bayes kernel behaviour on hand-written models.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rstest::rstest;

use scorekit::inference::gaussian_density;
use scorekit::testing::{
    binary_naive_bayes, binary_naive_bayes_with, multiclass_naive_bayes, two_class_scenario, DEFAULT_TOLERANCE,
};
use scorekit::{NaiveBayesModel, NaiveBayesParams, Scorer};

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn observed_level_gives_two_thirds() {
    let model = two_class_scenario();
    let preds = model.score_row(&[0.0]);

    let expected = 1.0 / (1.0 + ((0.3f64 * 0.5).ln() - (0.6f64 * 0.5).ln()).exp());
    assert_abs_diff_eq!(expected, 2.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(preds[1], 2.0 / 3.0, epsilon = 1e-12);
    assert!(preds[1] > preds[2]);
    assert_eq!(preds[0], 0.0);
}

#[rstest]
#[case::binary(binary_naive_bayes())]
#[case::multiclass(multiclass_naive_bayes())]
#[case::scenario(two_class_scenario())]
fn all_missing_row_returns_prior(#[case] model: NaiveBayesModel) {
    let row = vec![f64::NAN; model.n_features()];
    let preds = model.score_row(&row);

    let prior = &model.output().apriori;
    let total: f64 = prior.iter().sum();
    for (p, a) in preds[1..].iter().zip(prior) {
        assert_abs_diff_eq!(*p, a / total, epsilon = DEFAULT_TOLERANCE);
    }
}

#[test]
fn unseen_level_uses_laplace_value() {
    // `red` (code 2) has no observed column in the table.
    let model = binary_naive_bayes();
    let preds = model.score_row(&[2.0, f64::NAN]);

    let no = 0.7 * (1.0 / (70.0 + 3.0));
    let yes = 0.3 * (1.0 / (30.0 + 3.0));
    assert_abs_diff_eq!(preds[1], no / (no + yes), epsilon = 1e-12);
    assert_abs_diff_eq!(preds[2], yes / (no + yes), epsilon = 1e-12);
}

#[test]
fn level_past_training_domain_uses_laplace_value() {
    // Codes beyond the domain come from test-frame adaptation of unseen levels.
    let model = binary_naive_bayes();
    assert_eq!(model.score_row(&[2.0, 1.0]), model.score_row(&[7.0, 1.0]));
}

#[rstest]
#[case(1.0, 0.25)]
#[case(0.9, 0.5)]
#[case(1.5, 2.0)]
fn small_deviation_is_floored(#[case] eps_sdev: f64, #[case] min_sdev: f64) {
    let params = NaiveBayesParams::builder()
        .laplace(1.0)
        .eps_sdev(eps_sdev)
        .min_sdev(min_sdev)
        .build()
        .unwrap();
    let model = binary_naive_bayes_with(params);
    let preds = model.score_row(&[f64::NAN, 2.0]);

    let sd = |s: f64| if s <= eps_sdev { min_sdev } else { s };
    let no = 0.7 * gaussian_density(2.0, 1.0, sd(0.8));
    let yes = 0.3 * gaussian_density(2.0, 3.0, sd(1.2));
    assert_abs_diff_eq!(preds[1], no / (no + yes), epsilon = 1e-12);
}

#[test]
fn nan_parameters_fall_back_to_standard_normal() {
    let model = multiclass_naive_bayes();
    // Only `height` observed: class c has a NaN mean, class b a zero deviation.
    let preds = model.score_row(&[f64::NAN, f64::NAN, 1.0]);

    let a = 0.5 * gaussian_density(1.0, 5.0, 2.0);
    let b = 0.3 * gaussian_density(1.0, 4.0, 0.001).max(0.001);
    let c = 0.2 * gaussian_density(1.0, 0.0, 1.0);
    let total = a + b + c;
    assert_abs_diff_eq!(preds[1], a / total, epsilon = 1e-9);
    assert_abs_diff_eq!(preds[2], b / total, epsilon = 1e-9);
    assert_abs_diff_eq!(preds[3], c / total, epsilon = 1e-9);
    assert_eq!(preds[0], 2.0);
}

#[test]
fn extreme_evidence_does_not_overflow() {
    let model = binary_naive_bayes();
    let preds = model.score_row(&[0.0, 1e6]);
    assert!(preds[1..].iter().all(|p| p.is_finite()));
    assert_abs_diff_eq!(preds[1] + preds[2], 1.0, epsilon = DEFAULT_TOLERANCE);
}

// =============================================================================
// Properties
// =============================================================================

/// A predictor value, missing one time in five.
fn arb_value(categorical: bool) -> impl Strategy<Value = f64> {
    let value = if categorical {
        (0u8..5).prop_map(f64::from).boxed()
    } else {
        (-1e3f64..1e3).boxed()
    };
    prop_oneof![
        4 => value,
        1 => Just(f64::NAN),
    ]
}

proptest! {
    #[test]
    fn posteriors_form_a_distribution(
        shape in arb_value(true),
        width in arb_value(false),
        height in arb_value(false),
    ) {
        let model = multiclass_naive_bayes();
        let preds = model.score_row(&[shape, width, height]);
        let probs = &preds[1..];

        prop_assert!(probs.iter().all(|&p| p > 0.0 && p <= 1.0));
        prop_assert!((probs.iter().sum::<f64>() - 1.0).abs() < DEFAULT_TOLERANCE);
        prop_assert!(preds[0] >= 0.0 && preds[0] < 3.0);
    }

    #[test]
    fn scoring_is_bitwise_idempotent(
        color in arb_value(true),
        size in arb_value(false),
    ) {
        let model = binary_naive_bayes();
        let first = model.score_row(&[color, size]);
        let second = model.score_row(&[color, size]);
        prop_assert_eq!(
            first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }
}
