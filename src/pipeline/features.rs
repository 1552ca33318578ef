//! Feature/target separation and numeric encoding of the dataset.
//!
//! Feature names are fixed here, when the matrix is built, and travel with
//! the rows through partitioning, fitting and importance reporting.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::*;
use tracing::warn;

use crate::forest::ForestError;
use crate::pipeline::error::{PipelineError, Result};

/// Row-major numeric feature matrix with its column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Build a matrix, checking that labels are unique and every row is as
    /// wide as the label list.
    pub fn new(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(PipelineError::DuplicateFeatureName { name: name.clone() });
            }
        }
        for (sample_index, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(ForestError::FeatureCountMismatch {
                    expected: names.len(),
                    got: row.len(),
                    sample_index,
                }
                .into());
            }
        }
        Ok(Self { names, index, rows })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column position of a feature label.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Values of one feature, by label.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.index_of(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// A new matrix holding the given rows, in the given order, with the same labels.
    pub fn select(&self, row_indices: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            index: self.index.clone(),
            rows: row_indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

/// How a source column was turned into features.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEncoding {
    /// Used as-is, cast to floating point.
    Numeric,
    /// Expanded into one indicator feature per category, categories sorted.
    OneHot { categories: Vec<String> },
}

/// Features, target and the per-column encodings that produced them.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub features: FeatureMatrix,
    pub target: Vec<f64>,
    pub encodings: Vec<(String, ColumnEncoding)>,
}

impl FeatureSet {
    pub fn numeric_columns(&self) -> usize {
        self.encodings
            .iter()
            .filter(|(_, e)| *e == ColumnEncoding::Numeric)
            .count()
    }

    pub fn categorical_columns(&self) -> usize {
        self.encodings.len() - self.numeric_columns()
    }
}

fn numeric_values(column: &Column) -> Result<Vec<f64>> {
    let name = column.name().to_string();
    let cast = column.cast(&DataType::Float64)?;
    cast.f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| PipelineError::MissingValue {
                column: name.clone(),
                row,
            })
        })
        .collect()
}

fn categorical_values(column: &Column) -> Result<Vec<String>> {
    let name = column.name().to_string();
    let cast = column.cast(&DataType::String)?;
    cast.str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(|s| s.to_string())
                .ok_or_else(|| PipelineError::MissingValue {
                    column: name.clone(),
                    row,
                })
        })
        .collect()
}

/// Separate the target column from the predictors and encode the predictors.
///
/// Numeric columns become one feature each; any other column is one-hot
/// encoded into `<column>_<category>` indicator features. Columns listed in
/// `drop_columns` are skipped. Column order is preserved.
///
/// # Errors
///
/// [`PipelineError::MissingColumn`] if `target` is absent,
/// [`PipelineError::NonNumericTarget`] if it is not numeric and
/// [`PipelineError::MissingValue`] for any null cell.
pub fn split_features_target(
    df: &DataFrame,
    target: &str,
    drop_columns: &[String],
) -> Result<FeatureSet> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    if !available.iter().any(|c| c == target) {
        return Err(PipelineError::MissingColumn {
            column: target.to_string(),
            available,
        });
    }

    for dropped in drop_columns {
        if !available.contains(dropped) {
            warn!(column = %dropped, "requested drop column not present in dataset");
        }
    }

    let target_col = df.column(target)?;
    if !target_col.dtype().is_primitive_numeric() {
        return Err(PipelineError::NonNumericTarget {
            column: target.to_string(),
            dtype: target_col.dtype().to_string(),
        });
    }
    let target_values = numeric_values(target_col)?;

    let n_rows = df.height();
    let mut names: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut encodings = Vec::new();

    for col_name in available.iter().filter(|c| *c != target) {
        if drop_columns.contains(col_name) {
            continue;
        }
        let column = df.column(col_name)?;
        if column.dtype().is_primitive_numeric() {
            columns.push(numeric_values(column)?);
            names.push(col_name.clone());
            encodings.push((col_name.clone(), ColumnEncoding::Numeric));
        } else {
            let values = categorical_values(column)?;
            let categories: Vec<String> = values
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            for category in &categories {
                columns.push(
                    values
                        .iter()
                        .map(|v| if v == category { 1.0 } else { 0.0 })
                        .collect(),
                );
                names.push(format!("{}_{}", col_name, category));
            }
            encodings.push((col_name.clone(), ColumnEncoding::OneHot { categories }));
        }
    }

    let rows: Vec<Vec<f64>> = (0..n_rows)
        .map(|r| columns.iter().map(|col| col[r]).collect())
        .collect();

    Ok(FeatureSet {
        features: FeatureMatrix::new(names, rows)?,
        target: target_values,
        encodings,
    })
}
