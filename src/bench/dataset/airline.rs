//! The 14-column airline on-time table, predicting whether a flight arrives late.
use std::collections::BTreeMap;
use std::path::Path;

use super::libsvm::open_maybe_bz2;
use super::FeatureMatrix;
use crate::error::{BenchError, BenchResult};

/// Column names of the header-less CSV, in file order.
pub const COLUMNS: [&str; 14] = [
    "Year",
    "Month",
    "DayofMonth",
    "DayofWeek",
    "CRSDepTime",
    "CRSArrTime",
    "UniqueCarrier",
    "FlightNum",
    "ActualElapsedTime",
    "Origin",
    "Dest",
    "Distance",
    "Diverted",
    "ArrDelay",
];

/// Columns holding strings, replaced by category codes.
const CATEGORICAL: [&str; 3] = ["UniqueCarrier", "Origin", "Dest"];

const LABEL: &str = "ArrDelay";

enum Column {
    Numeric(Vec<f32>),
    Categorical(Vec<String>),
}

impl Column {
    /// Numeric values, with strings replaced by their rank among the distinct values.
    fn into_values(self) -> Vec<f32> {
        match self {
            Column::Numeric(values) => values,
            Column::Categorical(values) => {
                let codes: BTreeMap<&str, f32> = {
                    let mut distinct: Vec<&str> = values.iter().map(String::as_str).collect();
                    distinct.sort_unstable();
                    distinct.dedup();
                    distinct.into_iter().enumerate().map(|(i, v)| (v, i as f32)).collect()
                };
                values.iter().map(|v| codes[v.as_str()]).collect()
            }
        }
    }
}

/// Load at most `max_rows` flights.
///
/// Features are every column except `ArrDelay`, ordered by column name; the label is
/// `1` when `ArrDelay > 0` and `0` otherwise.
pub fn load<P: AsRef<Path>>(path: P, max_rows: usize) -> BenchResult<(FeatureMatrix, Vec<f32>)> {
    let path = path.as_ref();
    let reader = open_maybe_bz2(path)?;
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut columns: Vec<Column> = COLUMNS
        .iter()
        .map(|name| {
            if CATEGORICAL.contains(name) {
                Column::Categorical(Vec::new())
            } else {
                Column::Numeric(Vec::new())
            }
        })
        .collect();

    let mut num_rows = 0;
    for record in csv.records().take(max_rows) {
        let record = record?;
        let line = record.position().map_or(num_rows + 1, |p| p.line() as usize);
        if record.len() != COLUMNS.len() {
            return Err(BenchError::Parse {
                path: path.to_path_buf(),
                line,
                message: format!("expected {} fields, found {}", COLUMNS.len(), record.len()),
            });
        }
        for ((field, column), name) in record.iter().zip(columns.iter_mut()).zip(COLUMNS.iter()) {
            match column {
                Column::Numeric(values) => {
                    let value = field.trim().parse::<f32>().map_err(|_| BenchError::Parse {
                        path: path.to_path_buf(),
                        line,
                        message: format!("invalid {} value '{}'", name, field),
                    })?;
                    values.push(value);
                }
                Column::Categorical(values) => values.push(field.to_owned()),
            }
        }
        num_rows += 1;
    }

    let mut named: Vec<(&str, Vec<f32>)> = COLUMNS
        .iter()
        .copied()
        .zip(columns.into_iter().map(Column::into_values))
        .collect();
    let label_pos = named
        .iter()
        .position(|(name, _)| *name == LABEL)
        .ok_or_else(|| BenchError::InvalidConfig(format!("no {} column", LABEL)))?;
    let (_, delays) = named.remove(label_pos);
    named.sort_by(|a, b| a.0.cmp(b.0));

    let num_cols = named.len();
    let mut data = vec![0.0; num_rows * num_cols];
    for (c, (_, values)) in named.iter().enumerate() {
        for (r, value) in values.iter().enumerate() {
            data[r * num_cols + c] = *value;
        }
    }
    let labels = delays.iter().map(|&d| if d > 0.0 { 1.0 } else { 0.0 }).collect();

    info!("Loaded {} flights from {}", num_rows, path.display());
    Ok((FeatureMatrix::dense(data, num_rows, num_cols)?, labels))
}
