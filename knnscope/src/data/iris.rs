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

use log::{debug, info};
use ndarray::Array1;

use super::csv::read_table;
use super::{Column, Table};
use crate::errors::DataError;

/// Location of the raw iris file in the UCI Machine Learning Repository.
pub const UCI_IRIS_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/iris/iris.data";

pub const IRIS_FEATURES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];
pub const IRIS_LABEL: &str = "species";

const IRIS_SPECIES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// Builds the 150-row iris table from the copy bundled with `linfa-datasets`.
pub fn load_iris() -> Result<Table, DataError> {
    let dataset = linfa_datasets::iris();
    let records = dataset.records();
    let targets = dataset.targets();

    let mut columns: Vec<(&str, Column)> = IRIS_FEATURES
        .iter()
        .enumerate()
        .map(|(j, &name)| {
            let values: Array1<f64> = records.column(j).iter().copied().collect();
            (name, Column::Numeric(values))
        })
        .collect();

    let species = targets
        .iter()
        .map(|&code| match IRIS_SPECIES.get(code) {
            Some(name) => name.to_string(),
            None => code.to_string(),
        })
        .collect();
    columns.push((IRIS_LABEL, Column::Categorical(species)));

    debug!("Loaded bundled iris dataset with {} rows", targets.len());
    Table::from_columns(columns)
}

/// Downloads `iris.data` from `url` and names its columns.
///
/// The UCI file has no header and prefixes every class with `Iris-`; the
/// prefix is removed so the classes match [`load_iris`].
pub fn fetch_iris(url: &str) -> Result<Table, DataError> {
    info!("Fetching iris dataset from {}", url);
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;

    let mut names: Vec<&str> = IRIS_FEATURES.to_vec();
    names.push(IRIS_LABEL);
    let table = read_table(body.as_bytes(), Some(names.as_slice()))?;
    strip_class_prefix(table, IRIS_LABEL, "Iris-")
}

fn strip_class_prefix(table: Table, label: &str, prefix: &str) -> Result<Table, DataError> {
    let names = table.column_names().to_vec();
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let column = match table.column(&name)? {
            Column::Categorical(values) if name == label => Column::Categorical(
                values
                    .iter()
                    .map(|v| v.strip_prefix(prefix).unwrap_or(v).to_string())
                    .collect(),
            ),
            other => other.clone(),
        };
        columns.push((name, column));
    }
    Table::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_iris_shape() {
        let table = load_iris().unwrap();
        assert_eq!(table.n_rows(), 150);
        assert_eq!(table.n_columns(), 5);

        let x = table.features(&IRIS_FEATURES).unwrap();
        assert_eq!(x.dim(), (150, 4));

        let labels = table.labels(IRIS_LABEL).unwrap();
        assert_eq!(labels.classes(), &["setosa", "versicolor", "virginica"]);
        assert_eq!(labels.class_counts(), vec![50, 50, 50]);
    }

    #[test]
    fn test_strip_class_prefix() {
        let raw = "5.1,3.5,1.4,0.2,Iris-setosa\n7.0,3.2,4.7,1.4,Iris-versicolor\n\n";
        let mut names: Vec<&str> = IRIS_FEATURES.to_vec();
        names.push(IRIS_LABEL);
        let table = read_table(raw.as_bytes(), Some(names.as_slice())).unwrap();

        let table = strip_class_prefix(table, IRIS_LABEL, "Iris-").unwrap();

        assert_eq!(table.labels(IRIS_LABEL).unwrap().classes(), &["setosa", "versicolor"]);
        assert_eq!(table.column_names(), &[
            "sepal_length",
            "sepal_width",
            "petal_length",
            "petal_width",
            "species"
        ]);
    }
}
