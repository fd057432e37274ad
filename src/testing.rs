//! Fixtures and synthetic data for tests and benchmarks.
//!
//! Models here are small, hand-written and validated; frames are generated
//! from a seeded [`StdRng`] so every run sees the same rows.

use ndarray::{array, Array2};
use rand::prelude::*;

use crate::data::{Column, Frame, NumericStats, TransformType};
use crate::model::{
    ModelCategory, ModelKind, ModelMeta, NaiveBayesModel, NaiveBayesOutput, NaiveBayesParams, PcaModel,
    PcaParams, PredictorTable,
};

/// Default tolerance for floating point comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn classifier_meta(name: &str, features: &[(&str, Option<&[&str]>)], levels: &[&str]) -> ModelMeta {
    ModelMeta {
        name: name.into(),
        kind: ModelKind::NaiveBayes,
        category: ModelCategory::for_classifier(levels.len()),
        feature_names: features.iter().map(|(n, _)| n.to_string()).collect(),
        domains: features.iter().map(|(_, d)| d.map(strings)).collect(),
        response_name: Some("label".into()),
        response_domain: Some(strings(levels)),
    }
}

// =============================================================================
// Naive Bayes
// =============================================================================

/// Levels `{A, B}` with equal priors and one two-level categorical predictor
/// where `p(l0 | A) = 0.6` and `p(l0 | B) = 0.3`.
pub fn two_class_scenario() -> NaiveBayesModel {
    let meta = classifier_meta("scenario", &[("level", Some(&["l0", "l1"][..]))], &["A", "B"]);
    let output = NaiveBayesOutput {
        apriori: vec![0.5, 0.5],
        rescnt: vec![50.0, 50.0],
        tables: vec![PredictorTable::Categorical {
            probs: array![[0.6, 0.4], [0.3, 0.7]],
            cardinality: 2,
        }],
    };
    NaiveBayesModel::new(meta, NaiveBayesParams::default(), output).expect("valid fixture")
}

/// Binary classifier over `color` (blue, green, red) and `size`.
///
/// `red` was never observed with a response during training, so its
/// conditional probability comes from Laplace smoothing.
pub fn binary_naive_bayes() -> NaiveBayesModel {
    binary_naive_bayes_with(NaiveBayesParams::builder().laplace(1.0).build().expect("valid params"))
}

/// [`binary_naive_bayes`] with custom parameters.
pub fn binary_naive_bayes_with(params: NaiveBayesParams) -> NaiveBayesModel {
    let meta = classifier_meta(
        "nb",
        &[("color", Some(&["blue", "green", "red"][..])), ("size", None)],
        &["no", "yes"],
    );
    let output = NaiveBayesOutput {
        apriori: vec![0.7, 0.3],
        rescnt: vec![70.0, 30.0],
        tables: vec![
            PredictorTable::Categorical {
                probs: array![[0.8, 0.2], [0.1, 0.9]],
                cardinality: 3,
            },
            PredictorTable::Numeric {
                mean: vec![1.0, 3.0],
                sdev: vec![0.8, 1.2],
            },
        ],
    };
    NaiveBayesModel::new(meta, params, output).expect("valid fixture")
}

/// Three-class classifier over `shape` (circle, square) and two numerics.
pub fn multiclass_naive_bayes() -> NaiveBayesModel {
    let meta = classifier_meta(
        "nb3",
        &[("shape", Some(&["circle", "square"][..])), ("width", None), ("height", None)],
        &["a", "b", "c"],
    );
    let output = NaiveBayesOutput {
        apriori: vec![0.5, 0.3, 0.2],
        rescnt: vec![50.0, 30.0, 20.0],
        tables: vec![
            PredictorTable::Categorical {
                probs: array![[0.9, 0.1], [0.5, 0.5], [0.2, 0.8]],
                cardinality: 2,
            },
            PredictorTable::Numeric {
                mean: vec![0.0, 1.0, 2.0],
                sdev: vec![1.0, 1.0, 0.5],
            },
            PredictorTable::Numeric {
                mean: vec![5.0, 4.0, f64::NAN],
                sdev: vec![2.0, 0.0, 1.0],
            },
        ],
    };
    NaiveBayesModel::new(meta, NaiveBayesParams::default(), output).expect("valid fixture")
}

/// A classifier trained on a constant response.
pub fn constant_response_naive_bayes() -> NaiveBayesModel {
    let meta = classifier_meta("constant", &[("size", None)], &["only"]);
    let output = NaiveBayesOutput {
        apriori: vec![1.0],
        rescnt: vec![10.0],
        tables: vec![PredictorTable::Numeric {
            mean: vec![2.0],
            sdev: vec![1.0],
        }],
    };
    NaiveBayesModel::new(meta, NaiveBayesParams::default(), output).expect("valid fixture")
}

// =============================================================================
// PCA
// =============================================================================

/// `k = 1` projector over a single numeric column with mean 0, unit
/// deviation and eigenvector `[1.0]`.
pub fn single_numeric_pca() -> PcaModel {
    let meta = ModelMeta {
        name: "pca1".into(),
        kind: ModelKind::Pca,
        category: ModelCategory::DimReduction,
        feature_names: vec!["x".into()],
        domains: vec![None],
        response_name: None,
        response_domain: None,
    };
    let params = PcaParams::builder()
        .k(1)
        .transform(TransformType::Standardize)
        .build()
        .expect("valid params");
    let stats = [NumericStats { mean: 0.0, sigma: 1.0, min: -3.0, max: 3.0 }];
    PcaModel::from_eigenvectors(meta, params, array![[1.0]], vec![1.0], &stats).expect("valid fixture")
}

/// `k = 2` projector over `[x, color(a, b, c), y]`, standardized, last level
/// dropped: the expanded space is `[a, b, x, y]`.
pub fn mixed_pca() -> PcaModel {
    let meta = ModelMeta {
        name: "pca".into(),
        kind: ModelKind::Pca,
        category: ModelCategory::DimReduction,
        feature_names: strings(&["x", "color", "y"]),
        domains: vec![None, Some(strings(&["a", "b", "c"])), None],
        response_name: None,
        response_domain: None,
    };
    let params = PcaParams::builder()
        .k(2)
        .transform(TransformType::Standardize)
        .build()
        .expect("valid params");
    let eigen: Array2<f64> = array![[0.5, -0.5], [0.5, 0.5], [0.6, 0.1], [0.4, -0.7]];
    let stats = [
        NumericStats { mean: 10.0, sigma: 2.0, min: 4.0, max: 16.0 },
        NumericStats { mean: -1.0, sigma: 0.5, min: -2.5, max: 0.5 },
    ];
    PcaModel::from_eigenvectors(meta, params, eigen, vec![1.5, 0.7], &stats).expect("valid fixture")
}

// =============================================================================
// Synthetic frames
// =============================================================================

/// A random frame matching `meta`'s predictors (and response, if any).
///
/// Numerics are uniform in `[-5, 5]`, categoricals uniform over the training
/// domain. Each value is missing with probability `missing`.
pub fn random_frame(meta: &ModelMeta, name: &str, rows: usize, seed: u64, missing: f64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut frame = Frame::new(name);

    for (col, domain) in meta.feature_names.iter().zip(&meta.domains) {
        let column = match domain {
            Some(domain) => {
                let codes = (0..rows)
                    .map(|_| {
                        if rng.gen::<f64>() < missing {
                            f64::NAN
                        } else {
                            rng.gen_range(0..domain.len()) as f64
                        }
                    })
                    .collect();
                Column::categorical(col.clone(), codes, domain.clone())
            }
            None => {
                let values = (0..rows)
                    .map(|_| {
                        if rng.gen::<f64>() < missing {
                            f64::NAN
                        } else {
                            rng.gen_range(-5.0..5.0)
                        }
                    })
                    .collect();
                Column::numeric(col.clone(), values)
            }
        };
        frame.push(column).expect("columns share a length");
    }

    if let (Some(col), Some(domain)) = (&meta.response_name, &meta.response_domain) {
        let codes = (0..rows).map(|_| rng.gen_range(0..domain.len()) as f64).collect();
        frame
            .push(Column::categorical(col.clone(), codes, domain.clone()))
            .expect("columns share a length");
    }
    frame
}
