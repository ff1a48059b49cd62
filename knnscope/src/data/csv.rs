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

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use ndarray::Array1;

use super::{Column, DataLoader, Table};
use crate::errors::{CsvError, DataError};

pub struct CsvLoader;
pub struct CsvHeadersLoader;

/// Reads CSV records into a [`Table`].
///
/// A column becomes numeric when every one of its values parses as `f64`,
/// otherwise it is kept as categorical text. When `names` is `None` the first
/// record is taken as the header.
pub fn read_table<R: Read>(reader: R, names: Option<&[&str]>) -> Result<Table, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(names.is_none())
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header: Option<Vec<String>> = match names {
        Some(_) => None,
        None => Some(rdr.headers().map_err(CsvError::from)?.iter().map(str::to_string).collect()),
    };

    let mut data: Vec<Vec<String>> = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(CsvError::from)?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        // Blank trailing lines show up as a single empty field.
        if row.iter().all(String::is_empty) {
            continue;
        }
        let expected = header.as_ref().map(Vec::len).or(names.map(|n| n.len()));
        let expected = expected.or_else(|| data.first().map(Vec::len)).unwrap_or(row.len());
        if row.len() != expected {
            return Err(CsvError::InconsistentColumns {
                row: i + 1,
                actual: row.len(),
                expected,
            }
            .into());
        }
        data.push(row);
    }

    let column_names: Vec<String> = match (header, names) {
        (Some(header), _) => header,
        (None, Some(names)) => names.iter().map(|s| s.to_string()).collect(),
        (None, None) => Vec::new(),
    };

    if data.is_empty() {
        return Err(CsvError::EmptyFile.into());
    }
    if column_names.len() < 2 {
        return Err(CsvError::InsufficientColumns.into());
    }

    let mut columns = Vec::with_capacity(column_names.len());
    for (col, name) in column_names.iter().enumerate() {
        if let Some(row) = data.iter().position(|r| r[col].is_empty()) {
            return Err(DataError::MissingValue { column: name.clone(), row: row + 1 });
        }
        let parsed: Option<Vec<f64>> = data.iter().map(|r| r[col].parse::<f64>().ok()).collect();
        let column = match parsed {
            Some(values) => Column::Numeric(Array1::from_vec(values)),
            None => Column::Categorical(data.iter().map(|r| r[col].clone()).collect()),
        };
        columns.push((name.clone(), column));
    }

    debug!("Parsed {} rows x {} columns", data.len(), column_names.len());
    Table::from_columns(columns)
}

fn load_csv_common<P: AsRef<Path>>(path: P, has_headers: bool) -> Result<Table, DataError> {
    let mut file = File::open(path.as_ref()).map_err(CsvError::from)?;
    if has_headers {
        return read_table(file, None);
    }

    // Without a header the column count is only known after peeking at the data.
    let mut content = String::new();
    file.read_to_string(&mut content).map_err(CsvError::from)?;
    let n_cols = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.split(',').count())
        .ok_or(CsvError::EmptyFile)?;
    if n_cols < 2 {
        return Err(CsvError::InsufficientColumns.into());
    }

    let mut names: Vec<String> = (0..n_cols - 1).map(|i| format!("x{}", i)).collect();
    names.push("target".to_string());
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    read_table(content.as_bytes(), Some(names.as_slice()))
}

impl DataLoader for CsvLoader {
    type Error = DataError;

    fn load<P: AsRef<Path>>(path: P) -> Result<Table, Self::Error> {
        load_csv_common(path, false)
    }
}

impl DataLoader for CsvHeadersLoader {
    type Error = DataError;

    fn load<P: AsRef<Path>>(path: P) -> Result<Table, Self::Error> {
        load_csv_common(path, true)
    }
}
