//! Accumulated benchmark results, one row per (dataset, algorithm).
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::task::{Algorithm, MetricKind};
use crate::error::{BenchError, BenchResult};

const COLUMNS: [&str; 4] = ["Time(s)", "Accuracy", "RMSE", "SpeedUp"];

/// Measurements of one algorithm on one dataset. Cells that were never filled stay `None`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultRow {
    pub dataset: String,
    pub algorithm: Algorithm,
    #[serde(rename = "Time(s)")]
    pub time: Option<f64>,
    #[serde(rename = "Accuracy")]
    pub accuracy: Option<f64>,
    #[serde(rename = "RMSE")]
    pub rmse: Option<f64>,
    /// CPU time over FPGA time, kept on the FPGA row.
    #[serde(rename = "SpeedUp")]
    pub speedup: Option<f64>,
}

impl ResultRow {
    fn empty(dataset: &str, algorithm: Algorithm) -> Self {
        ResultRow {
            dataset: dataset.to_owned(),
            algorithm,
            time: None,
            accuracy: None,
            rmse: None,
            speedup: None,
        }
    }

    fn cells(&self) -> [Option<f64>; 4] {
        [self.time, self.accuracy, self.rmse, self.speedup]
    }
}

/// Result table indexed by dataset, then algorithm.
///
/// Datasets keep the order they were first registered in; within a dataset the rows follow
/// [`Algorithm::ALL`]. Every cell can be written once.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        ResultTable::default()
    }

    /// Add empty rows for `dataset`, if it has none yet.
    pub fn register(&mut self, dataset: &str) {
        if self.rows.iter().any(|r| r.dataset == dataset) {
            return;
        }
        for &alg in Algorithm::ALL {
            self.rows.push(ResultRow::empty(dataset, alg));
        }
    }

    /// Store the training time and metric of one run.
    ///
    /// Once both algorithms have a time for `dataset`, the speedup is filled in on the FPGA
    /// row. Writing a cell that already holds a value fails with
    /// [`BenchError::DuplicateResult`].
    pub fn record(
        &mut self,
        dataset: &str,
        alg: Algorithm,
        metric: MetricKind,
        elapsed: f64,
        value: f64,
    ) -> BenchResult<()> {
        self.register(dataset);
        let row = self.row_mut(dataset, alg)?;

        let duplicate = |column| BenchError::DuplicateResult {
            dataset: dataset.to_owned(),
            algorithm: alg.to_string(),
            column,
        };
        let (metric_cell, metric_column) = match metric {
            MetricKind::Accuracy => (&mut row.accuracy, COLUMNS[1]),
            MetricKind::Rmse => (&mut row.rmse, COLUMNS[2]),
        };
        if metric_cell.is_some() {
            return Err(duplicate(metric_column));
        }
        if row.time.is_some() {
            return Err(duplicate(COLUMNS[0]));
        }
        *metric_cell = Some(value);
        row.time = Some(elapsed);

        if let Some(speedup) = self.speedup(dataset) {
            self.row_mut(dataset, Algorithm::Fpga)?.speedup = Some(speedup);
            debug!("{}: fpga speedup {:.2}x", dataset, speedup);
        }
        Ok(())
    }

    /// CPU time divided by FPGA time, once both are known.
    pub fn speedup(&self, dataset: &str) -> Option<f64> {
        let time = |alg| self.row(dataset, alg).and_then(|r| r.time);
        Some(time(Algorithm::Cpu)? / time(Algorithm::Fpga)?)
    }

    pub fn row(&self, dataset: &str, alg: Algorithm) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.dataset == dataset && r.algorithm == alg)
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as a JSON array of rows.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> BenchResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| BenchError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| BenchError::io(path, e))?;
        info!("Results written to {}", path.display());
        Ok(())
    }

    fn row_mut(&mut self, dataset: &str, alg: Algorithm) -> BenchResult<&mut ResultRow> {
        self.rows
            .iter_mut()
            .find(|r| r.dataset == dataset && r.algorithm == alg)
            .ok_or_else(|| BenchError::InvalidConfig(format!("no row for ({}, {})", dataset, alg)))
    }
}

/// Renders like a two-level indexed data frame: the dataset name only on its first row, and
/// empty cells left blank.
impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let body: Vec<[String; 6]> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let first = i == 0 || self.rows[i - 1].dataset != row.dataset;
                let outer = if first { row.dataset.clone() } else { String::new() };
                let [a, b, c, d] = row.cells().map(|cell| cell.map_or_else(String::new, |v| v.to_string()));
                [outer, row.algorithm.to_string(), a, b, c, d]
            })
            .collect();

        let header = ["", "", COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3]];
        let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for line in &body {
            for (w, cell) in widths.iter_mut().zip(line.iter()) {
                *w = (*w).max(cell.len());
            }
        }

        write_line(f, &header, &widths)?;
        for line in &body {
            let cells: Vec<&str> = line.iter().map(String::as_str).collect();
            write_line(f, &cells, &widths)?;
        }
        Ok(())
    }
}

/// Index columns are left aligned, value columns right aligned.
fn write_line(f: &mut fmt::Formatter, cells: &[&str], widths: &[usize]) -> fmt::Result {
    let mut line = String::new();
    for (i, (cell, w)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        if i < 2 {
            line.push_str(&format!("{:<w$}", cell, w = w));
        } else {
            line.push_str(&format!("{:>w$}", cell, w = w));
        }
    }
    writeln!(f, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn speedup_is_cpu_over_fpga() {
        let mut table = ResultTable::new();
        table.record("Cifar10", Algorithm::Fpga, MetricKind::Accuracy, 2.0, 0.41).unwrap();
        assert_eq!(table.speedup("Cifar10"), None);
        table.record("Cifar10", Algorithm::Cpu, MetricKind::Accuracy, 10.0, 0.42).unwrap();

        assert_eq!(table.speedup("Cifar10"), Some(10.0 / 2.0));
        let fpga = table.row("Cifar10", Algorithm::Fpga).unwrap();
        assert_relative_eq!(fpga.speedup.unwrap(), 5.0);
        assert_eq!(table.row("Cifar10", Algorithm::Cpu).unwrap().speedup, None);
    }

    #[test]
    fn rows_follow_registration_then_algorithm_order() {
        let mut table = ResultTable::new();
        table.register("SVHN");
        table.record("SyntheticR 64", Algorithm::Fpga, MetricKind::Rmse, 1.0, 3.0).unwrap();
        table.register("SVHN");
        let keys: Vec<(&str, Algorithm)> = table.rows().iter().map(|r| (r.dataset.as_str(), r.algorithm)).collect();
        assert_eq!(
            keys,
            vec![
                ("SVHN", Algorithm::Cpu),
                ("SVHN", Algorithm::Fpga),
                ("SyntheticR 64", Algorithm::Cpu),
                ("SyntheticR 64", Algorithm::Fpga),
            ]
        );
    }

    #[test]
    fn cells_are_write_once() {
        let mut table = ResultTable::new();
        table.record("Higgs", Algorithm::Cpu, MetricKind::Accuracy, 1.0, 0.7).unwrap();
        let err = table
            .record("Higgs", Algorithm::Cpu, MetricKind::Accuracy, 2.0, 0.8)
            .unwrap_err();
        assert!(matches!(err, BenchError::DuplicateResult { column: "Accuracy", .. }));
        // the first values survive
        assert_eq!(table.row("Higgs", Algorithm::Cpu).unwrap().time, Some(1.0));
    }

    #[test]
    fn render_leaves_missing_cells_blank() {
        let mut table = ResultTable::new();
        table.record("SyntheticR 16", Algorithm::Fpga, MetricKind::Rmse, 0.5, 1.25).unwrap();
        table.record("SyntheticR 16", Algorithm::Cpu, MetricKind::Rmse, 2.0, 1.5).unwrap();
        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Time(s)") && lines[0].ends_with("SpeedUp"));
        assert!(lines[1].starts_with("SyntheticR 16  cpu"));
        // the outer index is only written on the first row
        assert!(lines[2].starts_with(&format!("{}fpga", " ".repeat(15))));
        assert!(lines[2].ends_with('4'));
        assert!(!lines[1].contains("Accuracy") && !lines[1].contains("NaN"));
        // cpu row: time, blank accuracy, rmse, blank speedup
        let fields: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(fields, vec!["SyntheticR", "16", "cpu", "2", "1.5"]);
    }

    #[test]
    fn json_lists_every_row() {
        let mut table = ResultTable::new();
        table.record("MNIST", Algorithm::Cpu, MetricKind::Accuracy, 3.0, 0.9).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        table.write_json(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["dataset"], "MNIST");
        assert_eq!(rows[0]["algorithm"], "cpu");
        assert_eq!(rows[0]["Time(s)"], 3.0);
        assert!(rows[1]["Accuracy"].is_null());
    }
}
