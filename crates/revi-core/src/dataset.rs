// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::ReviError;
use chrono::NaiveDate;
use std::collections::HashMap;

/// One named column of an in-memory dataset.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
    Date(Vec<NaiveDate>),
}

impl Column {
    /// Number of rows stored in the column.
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Categorical(values) => values.len(),
            Self::Date(values) => values.len(),
        }
    }

    /// True when the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric",
            Self::Categorical(_) => "categorical",
            Self::Date(_) => "date",
        }
    }
}

/// Column-oriented immutable table of historical records.
///
/// Loaded once by the host and treated as read-only for the lifetime of a
/// serving session; filtering produces [`RowSet`] selections, never
/// mutation. Numeric columns are validated to be finite at construction so
/// downstream aggregates can guarantee finite results.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl Dataset {
    /// Validates and indexes a set of named columns.
    ///
    /// All columns must share one row count; names must be unique and
    /// non-empty; numeric values must be finite.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self, ReviError> {
        if columns.is_empty() {
            return Err(ReviError::invalid_input(
                "dataset must contain at least one column",
            ));
        }

        let rows = columns[0].1.len();
        let mut names = Vec::with_capacity(columns.len());
        let mut stored = Vec::with_capacity(columns.len());
        let mut index = HashMap::with_capacity(columns.len());

        for (name, column) in columns {
            if name.is_empty() {
                return Err(ReviError::invalid_input(
                    "dataset column names must be non-empty",
                ));
            }
            if column.len() != rows {
                return Err(ReviError::invalid_input(format!(
                    "dataset column {name} has {} rows; expected {rows}",
                    column.len()
                )));
            }
            if let Column::Numeric(values) = &column {
                for (row, value) in values.iter().enumerate() {
                    if !value.is_finite() {
                        return Err(ReviError::invalid_input(format!(
                            "dataset column {name} has non-finite value at row {row}"
                        )));
                    }
                }
            }
            if index.insert(name.clone(), stored.len()).is_some() {
                return Err(ReviError::invalid_input(format!(
                    "dataset contains duplicate column: {name}"
                )));
            }
            names.push(name);
            stored.push(column);
        }

        Ok(Self {
            names,
            columns: stored,
            index,
            rows,
        })
    }

    /// Number of rows shared by every column.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Ordered column names.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, ReviError> {
        let position = self.index.get(name).ok_or_else(|| {
            ReviError::invalid_input(format!("dataset has no column named {name}"))
        })?;
        Ok(&self.columns[*position])
    }

    /// Borrows a numeric column, rejecting other kinds.
    pub fn numeric(&self, name: &str) -> Result<&[f64], ReviError> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            other => Err(ReviError::invalid_input(format!(
                "column {name} is {}; expected numeric",
                other.kind_name()
            ))),
        }
    }

    /// Borrows a categorical column, rejecting other kinds.
    pub fn categorical(&self, name: &str) -> Result<&[String], ReviError> {
        match self.column(name)? {
            Column::Categorical(values) => Ok(values),
            other => Err(ReviError::invalid_input(format!(
                "column {name} is {}; expected categorical",
                other.kind_name()
            ))),
        }
    }

    /// Borrows a date column, rejecting other kinds.
    pub fn dates(&self, name: &str) -> Result<&[NaiveDate], ReviError> {
        match self.column(name)? {
            Column::Date(values) => Ok(values),
            other => Err(ReviError::invalid_input(format!(
                "column {name} is {}; expected date",
                other.kind_name()
            ))),
        }
    }

    /// Selection covering every row, in dataset order.
    pub fn all_rows(&self) -> RowSet {
        RowSet {
            indices: (0..self.rows).collect(),
        }
    }

    /// Rows within `scope` whose categorical `column` equals `label`.
    ///
    /// An empty result is a legitimate outcome, not an error.
    pub fn filter_eq(
        &self,
        column: &str,
        label: &str,
        scope: &RowSet,
    ) -> Result<RowSet, ReviError> {
        let values = self.categorical(column)?;
        let mut indices = Vec::new();
        for &row in scope.indices() {
            if row >= self.rows {
                return Err(ReviError::invalid_input(format!(
                    "row selection index {row} out of bounds for {} rows",
                    self.rows
                )));
            }
            if values[row] == label {
                indices.push(row);
            }
        }
        Ok(RowSet { indices })
    }
}

/// Ordered row-index selection over a [`Dataset`].
///
/// Preserves original dataset order; never holds an index twice.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSet {
    indices: Vec<usize>,
}

impl RowSet {
    /// Wraps explicit row indices.
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Selected row indices, in dataset order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when no rows are selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, Dataset, RowSet};
    use crate::ReviError;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("test date should be valid")
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            (
                "Valor_Venda".to_owned(),
                Column::Numeric(vec![1500.0, 800.0, 2200.0]),
            ),
            (
                "Regiao".to_owned(),
                Column::Categorical(vec![
                    "Sul".to_owned(),
                    "Norte".to_owned(),
                    "Sul".to_owned(),
                ]),
            ),
            (
                "Data_Venda".to_owned(),
                Column::Date(vec![date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 3)]),
            ),
        ])
        .expect("sample dataset should be valid")
    }

    #[test]
    fn typed_accessors_reject_kind_mismatch() {
        let dataset = sample();
        assert_eq!(dataset.rows(), 3);
        let values = dataset
            .numeric("Valor_Venda")
            .expect("numeric access should succeed");
        assert_eq!(values[2], 2200.0);
        assert!(matches!(
            dataset.numeric("Regiao"),
            Err(ReviError::InvalidInput(_))
        ));
        assert!(matches!(
            dataset.categorical("Data_Venda"),
            Err(ReviError::InvalidInput(_))
        ));
        assert!(matches!(
            dataset.dates("Desconhecida"),
            Err(ReviError::InvalidInput(_))
        ));
    }

    #[test]
    fn filter_eq_respects_scope_and_order() {
        let dataset = sample();
        let all = dataset.all_rows();
        let sul = dataset
            .filter_eq("Regiao", "Sul", &all)
            .expect("filter should succeed");
        assert_eq!(sul.indices(), &[0, 2]);

        let narrowed = dataset
            .filter_eq("Regiao", "Sul", &RowSet::from_indices(vec![2]))
            .expect("scoped filter should succeed");
        assert_eq!(narrowed.indices(), &[2]);

        let none = dataset
            .filter_eq("Regiao", "Leste", &all)
            .expect("empty filter result is not an error");
        assert!(none.is_empty());
    }

    #[test]
    fn construction_rejects_ragged_and_non_finite_columns() {
        let ragged = Dataset::new(vec![
            ("a".to_owned(), Column::Numeric(vec![1.0, 2.0])),
            ("b".to_owned(), Column::Numeric(vec![1.0])),
        ]);
        assert!(matches!(ragged, Err(ReviError::InvalidInput(_))));

        let non_finite = Dataset::new(vec![(
            "a".to_owned(),
            Column::Numeric(vec![1.0, f64::NAN]),
        )]);
        assert!(matches!(non_finite, Err(ReviError::InvalidInput(_))));

        let duplicate = Dataset::new(vec![
            ("a".to_owned(), Column::Numeric(vec![1.0])),
            ("a".to_owned(), Column::Numeric(vec![2.0])),
        ]);
        assert!(matches!(duplicate, Err(ReviError::InvalidInput(_))));
    }
}
