//! PCA projection kernel.
//!
//! Each output coordinate is a linear combination over the expanded row:
//! the eigenvector entry of the observed level for every categorical column,
//! plus the normalized value times its eigenvector entry for every numeric
//! column. Missing values and levels outside a column's block contribute
//! nothing.

use super::Scorer;
use crate::model::PcaModel;

impl Scorer for PcaModel {
    fn n_features(&self) -> usize {
        self.output().layout.row_width()
    }

    fn n_outputs(&self) -> usize {
        self.output().k()
    }

    fn score0(&self, row: &[f64], _scratch: &mut [f64], preds: &mut [f64]) {
        let out = self.output();
        let layout = &out.layout;
        let eigen = &out.eigenvectors;
        let perm = layout.permutation();
        let n_cats = layout.n_cats();
        let num_start = layout.num_start();
        let (sub, mul) = (layout.norm_sub(), layout.norm_mul());

        for (i, pred) in preds.iter_mut().enumerate() {
            let mut acc = 0.0;
            for j in 0..n_cats {
                if let Some(slot) = layout.cat_slot(j, row[perm[j]]) {
                    acc += eigen[[slot, i]];
                }
            }
            for j in 0..layout.n_nums() {
                let x = row[perm[n_cats + j]];
                if !x.is_nan() {
                    acc += (x - sub[j]) * mul[j] * eigen[[num_start + j, i]];
                }
            }
            *pred = acc;
        }
    }

    fn output_names(&self) -> Vec<String> {
        self.component_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{NumericStats, TransformType};
    use crate::model::{ModelCategory, ModelKind, ModelMeta, PcaParams};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Columns `[x, color(a, b, c)]`, all factor levels kept.
    fn model() -> PcaModel {
        let meta = ModelMeta {
            name: "pca".into(),
            kind: ModelKind::Pca,
            category: ModelCategory::DimReduction,
            feature_names: vec!["x".into(), "color".into()],
            domains: vec![None, Some(vec!["a".into(), "b".into(), "c".into()])],
            response_name: None,
            response_domain: None,
        };
        let params = PcaParams::builder()
            .k(2)
            .use_all_factor_levels(true)
            .transform(TransformType::Standardize)
            .build()
            .unwrap();
        // Rows: a, b, c, x
        let eigen = array![[1.0, 0.0], [2.0, 0.5], [3.0, -1.0], [0.5, 2.0]];
        let stats = [NumericStats { mean: 1.0, sigma: 2.0, min: 0.0, max: 4.0 }];
        PcaModel::from_eigenvectors(meta, params, eigen, vec![1.0, 0.5], &stats).unwrap()
    }

    #[test]
    fn mixed_row_projection() {
        let m = model();
        let preds = m.score_row(&[5.0, 1.0]);
        // level b, x normalized to (5 - 1) / 2 = 2
        assert_abs_diff_eq!(preds[0], 2.0 + 2.0 * 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(preds[1], 0.5 + 2.0 * 2.0, epsilon = 1e-12);
        assert_eq!(m.output_names(), vec!["PC1", "PC2"]);
    }

    #[test]
    fn missing_and_unseen_contribute_nothing() {
        let m = model();
        assert_eq!(m.score_row(&[f64::NAN, f64::NAN]), vec![0.0, 0.0]);
        // Level 3 is past the training domain.
        assert_eq!(m.score_row(&[1.0, 3.0]), vec![0.0, 0.0]);
    }
}
