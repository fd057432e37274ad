//! Minimal column store.
//!
//! A [`Frame`] is a named, ordered set of equally long columns. Numeric
//! columns hold `f64` values; categorical columns hold level codes (stored as
//! `f64`, `NaN` for missing) together with their level names. Frames are the
//! row source for a scoring pass and the shape in which predictions and
//! projections are handed back.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Storage of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    /// Continuous values. Missing values: `NaN`.
    Numeric(Vec<f64>),
    /// Level codes into `domain`. Missing values: `NaN`.
    Categorical { codes: Vec<f64>, domain: Vec<String> },
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Create a categorical column from codes and their level names.
    pub fn categorical(name: impl Into<String>, codes: Vec<f64>, domain: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical { codes, domain },
        }
    }

    /// Create a categorical column from level labels (`None` = missing).
    ///
    /// The domain is the sorted set of distinct labels.
    pub fn from_labels(name: impl Into<String>, labels: &[Option<&str>]) -> Self {
        let mut domain: Vec<String> = labels.iter().flatten().map(|s| s.to_string()).collect();
        domain.sort();
        domain.dedup();
        let codes = labels
            .iter()
            .map(|label| match label {
                Some(l) => domain.binary_search_by(|d| d.as_str().cmp(l)).map_or(f64::NAN, |i| i as f64),
                None => f64::NAN,
            })
            .collect();
        Self::categorical(name, codes, domain)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical { codes, .. } => codes.len(),
        }
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw values (level codes for categoricals).
    pub fn values(&self) -> &[f64] {
        match &self.data {
            ColumnData::Numeric(v) => v,
            ColumnData::Categorical { codes, .. } => codes,
        }
    }

    /// Level names, if categorical.
    pub fn domain(&self) -> Option<&[String]> {
        match &self.data {
            ColumnData::Numeric(_) => None,
            ColumnData::Categorical { domain, .. } => Some(domain),
        }
    }

    /// Returns true if this is a categorical column.
    pub fn is_categorical(&self) -> bool {
        matches!(self.data, ColumnData::Categorical { .. })
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        if self.is_categorical() {
            "categorical"
        } else {
            "numeric"
        }
    }
}

/// A named set of equally long columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    name: String,
    columns: Vec<Column>,
}

impl Frame {
    /// Create an empty frame.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Create a frame from columns, checking that all have the same length.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, ConfigError> {
        let mut frame = Self::new(name);
        for column in columns {
            frame.push(column)?;
        }
        Ok(frame)
    }

    /// Append a column.
    pub fn push(&mut self, column: Column) -> Result<(), ConfigError> {
        if let Some(first) = self.columns.first() {
            let actual = column.len();
            if actual != first.len() {
                return Err(ConfigError::RaggedColumn {
                    name: column.name,
                    expected: first.len(),
                    actual,
                });
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Append a column, builder style.
    pub fn with_column(mut self, column: Column) -> Result<Self, ConfigError> {
        self.push(column)?;
        Ok(self)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows (0 for a frame without columns).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Keep only the columns in `start..end`, under a new name.
    pub fn extract(&self, name: impl Into<String>, start: usize, end: usize) -> Result<Self, ConfigError> {
        let columns = self
            .columns
            .get(start..end)
            .ok_or(ConfigError::ColumnRange {
                start,
                end,
                n_cols: self.columns.len(),
            })?;
        Ok(Self {
            name: name.into(),
            columns: columns.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_sorted_domain() {
        let col = Column::from_labels("color", &[Some("red"), None, Some("blue"), Some("red")]);
        assert_eq!(col.domain().unwrap(), &["blue".to_string(), "red".to_string()]);
        let codes = col.values();
        assert_eq!(codes[0], 1.0);
        assert!(codes[1].is_nan());
        assert_eq!(codes[2], 0.0);
        assert_eq!(codes[3], 1.0);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Frame::from_columns(
            "f",
            vec![
                Column::numeric("a", vec![1.0, 2.0]),
                Column::numeric("b", vec![1.0]),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::RaggedColumn { name: "b".into(), expected: 2, actual: 1 }
        );
    }

    #[test]
    fn lookup_and_extract() {
        let frame = Frame::new("f")
            .with_column(Column::numeric("a", vec![1.0, 2.0]))
            .unwrap()
            .with_column(Column::numeric("b", vec![3.0, 4.0]))
            .unwrap();
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.column("b").unwrap().values(), &[3.0, 4.0]);
        assert!(frame.column("c").is_none());

        let tail = frame.extract("tail", 1, 2).unwrap();
        assert_eq!(tail.name(), "tail");
        assert_eq!(tail.names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn extract_rejects_bad_ranges() {
        let frame = Frame::new("f").with_column(Column::numeric("a", vec![1.0])).unwrap();
        assert_eq!(
            frame.extract("g", 0, 3).unwrap_err(),
            ConfigError::ColumnRange { start: 0, end: 3, n_cols: 1 }
        );
        assert!(frame.extract("g", 1, 0).is_err());
        assert_eq!(frame.extract("g", 1, 1).unwrap().n_cols(), 0);
    }
}
