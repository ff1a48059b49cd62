// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

pub mod csv;
#[cfg(feature = "iris")]
pub mod iris;
pub mod split;

pub use csv::{CsvHeadersLoader, CsvLoader};
#[cfg(feature = "iris")]
pub use iris::{IRIS_FEATURES, IRIS_LABEL, UCI_IRIS_URL, fetch_iris, load_iris};
pub use split::StratifiedSplit;

use std::collections::BTreeSet;

use ndarray::{Array1, Array2};

use crate::errors::DataError;

/// A single named column of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Array1<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }
}

/// An in-memory dataset of equally long, named columns.
///
/// Feature columns are numeric; the label column may be categorical or numeric.
/// Tables are plain values: every analysis routine takes one explicitly and
/// never keeps it around after returning.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Builds a table from `(name, column)` pairs, keeping their order.
    ///
    /// # Errors
    /// - `DataError::EmptyTable` when no columns or no rows are given.
    /// - `DataError::DuplicateColumn` when two columns share a name.
    /// - `DataError::ColumnLength` when the columns differ in length.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Column)>,
    ) -> Result<Self, DataError> {
        let mut names: Vec<String> = Vec::new();
        let mut values: Vec<Column> = Vec::new();
        for (name, column) in columns {
            let name = name.into();
            if names.contains(&name) {
                return Err(DataError::DuplicateColumn(name));
            }
            names.push(name);
            values.push(column);
        }

        let n_rows = values.first().map(Column::len).ok_or(DataError::EmptyTable)?;
        if n_rows == 0 {
            return Err(DataError::EmptyTable);
        }
        for (name, column) in names.iter().zip(values.iter()) {
            if column.len() != n_rows {
                return Err(DataError::ColumnLength {
                    column: name.clone(),
                    actual: column.len(),
                    expected: n_rows,
                });
            }
        }

        Ok(Table { names, columns: values, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, DataError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Checks that every listed column exists, reporting the first one missing.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<(), DataError> {
        match names.iter().find(|name| !self.has_column(name.as_ref())) {
            Some(missing) => Err(DataError::ColumnNotFound(missing.as_ref().to_string())),
            None => Ok(()),
        }
    }

    /// Gathers the named numeric columns into a `(n_rows, names.len())` matrix.
    pub fn features<S: AsRef<str>>(&self, names: &[S]) -> Result<Array2<f64>, DataError> {
        let mut x = Array2::zeros((self.n_rows, names.len()));
        for (j, name) in names.iter().enumerate() {
            match self.column(name.as_ref())? {
                Column::Numeric(values) => x.column_mut(j).assign(values),
                Column::Categorical(_) => {
                    return Err(DataError::NonNumericColumn(name.as_ref().to_string()));
                }
            }
        }
        Ok(x)
    }

    /// Encodes the named column as class codes.
    pub fn labels(&self, name: &str) -> Result<LabelEncoding, DataError> {
        let raw: Vec<String> = match self.column(name)? {
            Column::Categorical(values) => values.clone(),
            Column::Numeric(values) => values.iter().map(|v| v.to_string()).collect(),
        };
        Ok(LabelEncoding::fit(&raw))
    }

    /// Replaces embedded spaces in column names with underscores.
    ///
    /// Fails with `DataError::DuplicateColumn`, leaving the names untouched,
    /// when two columns would end up with the same name.
    pub fn normalize_column_names(&mut self) -> Result<(), DataError> {
        let normalized: Vec<String> = self.names.iter().map(|n| normalize_column_name(n)).collect();
        let mut seen = BTreeSet::new();
        for name in &normalized {
            if !seen.insert(name.as_str()) {
                return Err(DataError::DuplicateColumn(name.clone()));
            }
        }
        self.names = normalized;
        Ok(())
    }
}

pub fn normalize_column_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Class names in sorted order plus the class code of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoding {
    classes: Vec<String>,
    codes: Array1<usize>,
}

impl LabelEncoding {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: Vec<String> = labels
            .iter()
            .map(|l| l.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let codes = labels
            .iter()
            .map(|l| classes.binary_search_by(|c| c.as_str().cmp(l.as_ref())).unwrap_or(0))
            .collect();
        LabelEncoding { classes, codes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn codes(&self) -> &Array1<usize> {
        &self.codes
    }

    pub fn class_name(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Number of rows carrying each class code.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.classes.len()];
        for &code in self.codes.iter() {
            counts[code] += 1;
        }
        counts
    }
}

/// A trait for loading a [`Table`] from a file.
///
/// Implementors decide how column names are obtained; the label is always
/// the last column of the file.
pub trait DataLoader {
    fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Table, Self::Error>;

    type Error: std::error::Error + 'static;
}

/// Loads data from a file using a specified `DataLoader` implementation.
pub fn load_data<T: DataLoader, P: AsRef<std::path::Path>>(path: P) -> Result<Table, T::Error> {
    T::load(path)
}
