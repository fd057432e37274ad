//! Adapting a test frame to a model's training schema.
//!
//! Scoring kernels read encoded rows in training column order with training
//! level codes. [`adapt`] builds that representation from an arbitrary
//! [`Frame`]:
//!
//! - columns are reordered to the model's feature names (extra columns are
//!   ignored, missing ones are a [`ConfigError::MissingColumn`]);
//! - categorical codes are remapped by level name onto the training domain;
//!   levels unseen during training get codes past the training cardinality,
//!   in order of appearance in the test domain;
//! - the response column, if present, is remapped onto the response domain;
//!   unknown response levels become `NaN`.

use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::frame::{Column, ColumnData, Frame};
use crate::error::ConfigError;
use crate::model::ModelMeta;

/// A frame in kernel layout: feature-major values plus optional response codes.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptedFrame {
    name: String,
    /// Shape `[n_features, n_rows]`.
    features: Array2<f64>,
    response: Option<Array1<f64>>,
}

impl AdaptedFrame {
    /// Wrap already-encoded feature-major data.
    pub fn from_features(
        name: impl Into<String>,
        features: Array2<f64>,
        response: Option<Array1<f64>>,
    ) -> Result<Self, ConfigError> {
        if let Some(r) = &response {
            if r.len() != features.ncols() {
                return Err(ConfigError::LengthMismatch {
                    what: "response length",
                    expected: features.ncols(),
                    actual: r.len(),
                });
            }
        }
        Ok(Self {
            name: name.into(),
            features,
            response,
        })
    }

    /// Wrap sample-major rows (one `Vec` per row).
    pub fn from_rows(name: impl Into<String>, rows: &[Vec<f64>], n_features: usize) -> Result<Self, ConfigError> {
        let mut features = Array2::zeros((n_features, rows.len()));
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n_features {
                return Err(ConfigError::LengthMismatch {
                    what: "row width",
                    expected: n_features,
                    actual: row.len(),
                });
            }
            features.column_mut(r).assign(&ArrayView1::from(row.as_slice()));
        }
        Self::from_features(name, features, None)
    }

    /// Attach response codes.
    pub fn with_response(self, response: Array1<f64>) -> Result<Self, ConfigError> {
        Self::from_features(self.name, self.features, Some(response))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.features.ncols()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.nrows()
    }

    /// Feature-major view, shape `[n_features, n_rows]`.
    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    #[inline]
    pub fn response(&self) -> Option<ArrayView1<'_, f64>> {
        self.response.as_ref().map(Array1::view)
    }

    /// Copy row `row` into `out` without allocating.
    #[inline]
    pub fn gather_row(&self, row: usize, out: &mut [f64]) {
        for (dst, &src) in out.iter_mut().zip(self.features.column(row)) {
            *dst = src;
        }
    }
}

/// Adapt `frame` to the training schema described by `meta`.
pub fn adapt(frame: &Frame, meta: &ModelMeta) -> Result<AdaptedFrame, ConfigError> {
    meta.validate()?;
    let n_rows = frame.n_rows();
    let mut features = Array2::from_elem((meta.n_features(), n_rows), f64::NAN);

    for (f, (name, train_domain)) in meta.feature_names.iter().zip(&meta.domains).enumerate() {
        let column = frame
            .column(name)
            .ok_or_else(|| ConfigError::MissingColumn(name.clone()))?;
        let mut dst = features.row_mut(f);

        match (train_domain, &column.data) {
            (None, ColumnData::Numeric(values)) => {
                dst.assign(&ArrayView1::from(values.as_slice()));
            }
            (Some(train), ColumnData::Categorical { codes, domain }) => {
                let mapping = level_mapping(domain, train, true);
                let unseen = mapping.iter().filter(|&&m| m >= train.len() as f64).count();
                if unseen > 0 {
                    tracing::debug!(column = %name, unseen, "test levels unseen during training");
                }
                remap(codes, &mapping, dst.as_slice_mut());
            }
            (train, _) => {
                return Err(ConfigError::ColumnKind {
                    name: name.clone(),
                    expected: if train.is_some() { "categorical" } else { "numeric" },
                    actual: column.kind_name(),
                });
            }
        }
    }

    let response = match (&meta.response_name, &meta.response_domain) {
        (Some(name), Some(train)) => frame.column(name).map(|c| adapt_response(c, train)),
        _ => None,
    };

    AdaptedFrame::from_features(frame.name(), features, response)
}

/// Map every test level to a training code.
///
/// With `extend`, unseen levels are appended past the training domain;
/// otherwise they map to `NaN`.
fn level_mapping(test: &[String], train: &[String], extend: bool) -> Vec<f64> {
    let index: HashMap<&str, usize> = train.iter().enumerate().map(|(i, s)| (s.as_str(), i)).collect();
    let mut next = train.len();
    test.iter()
        .map(|level| match index.get(level.as_str()) {
            Some(&i) => i as f64,
            None if extend => {
                next += 1;
                (next - 1) as f64
            }
            None => f64::NAN,
        })
        .collect()
}

fn remap(codes: &[f64], mapping: &[f64], out: Option<&mut [f64]>) {
    let Some(out) = out else { return };
    for (dst, &code) in out.iter_mut().zip(codes) {
        *dst = if code.is_nan() || code < 0.0 {
            f64::NAN
        } else {
            mapping.get(code as usize).copied().unwrap_or(f64::NAN)
        };
    }
}

fn adapt_response(column: &Column, train: &[String]) -> Array1<f64> {
    match &column.data {
        ColumnData::Categorical { codes, domain } => {
            let mapping = level_mapping(domain, train, false);
            let mut out = Array1::from_elem(codes.len(), f64::NAN);
            remap(codes, &mapping, out.as_slice_mut());
            out
        }
        // Numeric responses are taken as level codes when they are in range.
        ColumnData::Numeric(values) => values
            .iter()
            .map(|&v| {
                if v >= 0.0 && v.fract() == 0.0 && (v as usize) < train.len() {
                    v
                } else {
                    f64::NAN
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelCategory, ModelKind};

    fn meta() -> ModelMeta {
        ModelMeta {
            name: "m".into(),
            kind: ModelKind::NaiveBayes,
            category: ModelCategory::Binomial,
            feature_names: vec!["color".into(), "size".into()],
            domains: vec![Some(vec!["blue".into(), "red".into()]), None],
            response_name: Some("label".into()),
            response_domain: Some(vec!["A".into(), "B".into()]),
        }
    }

    #[test]
    fn reorders_and_remaps_levels() {
        // Test domain sorted differently and containing an unseen level.
        let frame = Frame::from_columns(
            "test",
            vec![
                Column::numeric("size", vec![1.5, f64::NAN, 3.0]),
                Column::from_labels("color", &[Some("red"), Some("green"), None]),
                Column::from_labels("label", &[Some("B"), Some("A"), Some("C")]),
            ],
        )
        .unwrap();

        let adapted = adapt(&frame, &meta()).unwrap();
        assert_eq!(adapted.n_rows(), 3);
        assert_eq!(adapted.n_features(), 2);
        assert_eq!(adapted.name(), "test");

        let mut row = [0.0; 2];
        adapted.gather_row(0, &mut row);
        assert_eq!(row, [1.0, 1.5]);

        // "green" is unseen: code past the training cardinality.
        adapted.gather_row(1, &mut row);
        assert_eq!(row[0], 2.0);
        assert!(row[1].is_nan());

        adapted.gather_row(2, &mut row);
        assert!(row[0].is_nan());

        let response = adapted.response().unwrap();
        assert_eq!(response[0], 1.0);
        assert_eq!(response[1], 0.0);
        assert!(response[2].is_nan());
    }

    #[test]
    fn missing_and_mistyped_columns() {
        let frame = Frame::from_columns("t", vec![Column::numeric("size", vec![1.0])]).unwrap();
        assert_eq!(
            adapt(&frame, &meta()).unwrap_err(),
            ConfigError::MissingColumn("color".into())
        );

        let frame = Frame::from_columns(
            "t",
            vec![Column::numeric("color", vec![0.0]), Column::numeric("size", vec![1.0])],
        )
        .unwrap();
        assert!(matches!(
            adapt(&frame, &meta()).unwrap_err(),
            ConfigError::ColumnKind { expected: "categorical", actual: "numeric", .. }
        ));
    }

    #[test]
    fn short_domains_are_rejected() {
        let mut meta = meta();
        meta.domains.pop();
        let frame = Frame::from_columns(
            "t",
            vec![
                Column::from_labels("color", &[Some("blue")]),
                Column::numeric("size", vec![1.0]),
            ],
        )
        .unwrap();
        assert_eq!(
            adapt(&frame, &meta).unwrap_err(),
            ConfigError::LengthMismatch { what: "feature domains", expected: 2, actual: 1 }
        );
    }

    #[test]
    fn response_is_optional() {
        let frame = Frame::from_columns(
            "t",
            vec![
                Column::from_labels("color", &[Some("blue")]),
                Column::numeric("size", vec![1.0]),
            ],
        )
        .unwrap();
        assert!(adapt(&frame, &meta()).unwrap().response().is_none());
    }

    #[test]
    fn from_rows_checks_width() {
        let err = AdaptedFrame::from_rows("r", &[vec![1.0, 2.0], vec![1.0]], 2).unwrap_err();
        assert!(matches!(err, ConfigError::LengthMismatch { what: "row width", .. }));

        let ok = AdaptedFrame::from_rows("r", &[vec![1.0, 2.0], vec![3.0, 4.0]], 2).unwrap();
        assert_eq!(ok.features()[[1, 0]], 2.0);
        assert_eq!(ok.features()[[0, 1]], 3.0);
    }
}
