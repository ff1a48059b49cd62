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

use thiserror::Error;

/// Broad classes of failure a caller may want to react to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A requested column is absent or has the wrong kind.
    Schema,
    /// A parameter is incompatible with the data (k, averaging mode, ratios).
    Configuration,
    /// The data cannot satisfy the request, e.g. a class too small to stratify.
    DataSufficiency,
    /// Reading or downloading the dataset failed.
    Io,
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength { column: String, actual: usize, expected: usize },

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Table has no rows")]
    EmptyTable,

    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Failed to fetch dataset: {0}")]
    Fetch(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Failed to open file: {0}")]
    FileOpen(#[from] std::io::Error),

    #[error("CSV file is empty")]
    EmptyFile,

    #[error("CSV must have at least one feature and one target column")]
    InsufficientColumns,

    #[error("Inconsistent column count: row {row} has {actual} columns, expected {expected}")]
    InconsistentColumns { row: usize, actual: usize, expected: usize },

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("train_size must lie strictly between 0 and 1, got {0}")]
    InvalidTrainSize(f64),

    #[error("Class '{label}' has {count} member(s); stratification needs at least 2")]
    InsufficientClassMembers { label: String, count: usize },

    #[error("{partition} partition has {size} rows, fewer than the {classes} classes")]
    PartitionTooSmall { partition: &'static str, size: usize, classes: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScalerError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Input has no features")]
    NoFeatures,

    #[error("Scaler has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("k = {k} is invalid for {n_samples} training samples")]
    InvalidK { k: usize, n_samples: usize },

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Label code {code} is outside the {n_classes} known classes")]
    UnknownClass { code: usize, n_classes: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Length mismatch: y_true has {expected} labels, y_pred has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("average='{average}' is not valid for {n_classes} classes")]
    IncompatibleAverage { average: &'static str, n_classes: usize },

    #[error("Unknown averaging mode '{0}'")]
    UnknownAverage(String),

    #[error("Unknown key metric '{0}'")]
    UnknownKeyMetric(String),
}

#[derive(Error, Debug)]
pub enum EvalError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error("k_max must be at least 1")]
    InvalidKMax,

    #[error("Query {index} has {actual} values, expected {expected}")]
    QueryDimension { index: usize, expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<ScalerError> for EvalError {
    fn from(err: ScalerError) -> Self {
        EvalError::Model(ModelError::Scaler(err))
    }
}

impl EvalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EvalError::Data(err) => match err {
                DataError::ColumnNotFound(_)
                | DataError::NonNumericColumn(_)
                | DataError::DuplicateColumn(_)
                | DataError::ColumnLength { .. } => ErrorCategory::Schema,
                DataError::MissingValue { .. } | DataError::EmptyTable => {
                    ErrorCategory::DataSufficiency
                }
                DataError::Csv(_) | DataError::Fetch(_) => ErrorCategory::Io,
            },
            EvalError::Split(SplitError::InvalidTrainSize(_)) => ErrorCategory::Configuration,
            EvalError::Split(_) => ErrorCategory::DataSufficiency,
            EvalError::Model(ModelError::Scaler(ScalerError::EmptyInput)) => {
                ErrorCategory::DataSufficiency
            }
            EvalError::Model(_) => ErrorCategory::Configuration,
            EvalError::Metric(MetricError::EmptyInput) => ErrorCategory::DataSufficiency,
            EvalError::Metric(_) => ErrorCategory::Configuration,
            EvalError::InvalidKMax => ErrorCategory::Configuration,
            EvalError::QueryDimension { .. } => ErrorCategory::Schema,
        }
    }
}
