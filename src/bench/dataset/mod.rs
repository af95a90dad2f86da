//! Benchmark datasets: where each one comes from, and the feature containers they load into.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use super::task::{Algorithm, MetricKind, Task};
use crate::dmatrix::DMatrix;
use crate::error::{BenchError, BenchResult, XGBResult};

pub mod airline;
pub mod libsvm;
pub mod split;
pub mod synthetic;

pub use self::split::train_test_split;
pub use self::synthetic::{synthetic_classification, synthetic_regression};

/// Held-out fraction for datasets that ship as a single file.
const TEST_FRACTION: f64 = 0.2;
/// Training rows kept from the large single-file datasets.
const LARGE_TRAIN_ROWS: usize = 60_000;
/// Training rows kept from SVHN.
const SVHN_TRAIN_ROWS: usize = 65_000;
/// Rows read from the airline CSV.
const AIRLINE_ROWS: usize = 75_000;

/// Sparse matrix in compressed sparse row layout.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<f32>,
    num_cols: usize,
}

impl CsrMatrix {
    pub fn new(indptr: Vec<usize>, indices: Vec<u32>, data: Vec<f32>, num_cols: usize) -> BenchResult<Self> {
        let consistent = !indptr.is_empty()
            && indptr[0] == 0
            && indptr.windows(2).all(|w| w[0] <= w[1])
            && *indptr.last().unwrap_or(&0) == data.len()
            && indices.len() == data.len()
            && indices.iter().all(|&c| (c as usize) < num_cols);
        if !consistent {
            return Err(BenchError::InvalidConfig(format!(
                "inconsistent CSR matrix ({} row pointers, {} indices, {} values, {} columns)",
                indptr.len(),
                indices.len(),
                data.len(),
                num_cols
            )));
        }
        Ok(CsrMatrix {
            indptr,
            indices,
            data,
            num_cols,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of stored (non-missing) values.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Stored `(column, value)` pairs of one row.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (u32, f32)> + '_ {
        let span = self.indptr[r]..self.indptr[r + 1];
        self.indices[span.clone()].iter().copied().zip(self.data[span].iter().copied())
    }

    /// Copy of the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> CsrMatrix {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        indptr.push(0);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        for &r in rows {
            let span = self.indptr[r]..self.indptr[r + 1];
            indices.extend_from_slice(&self.indices[span.clone()]);
            data.extend_from_slice(&self.data[span]);
            indptr.push(data.len());
        }
        CsrMatrix {
            indptr,
            indices,
            data,
            num_cols: self.num_cols,
        }
    }

    fn truncate_rows(&mut self, rows: usize) {
        if rows >= self.num_rows() {
            return;
        }
        let nnz = self.indptr[rows];
        self.indptr.truncate(rows + 1);
        self.indices.truncate(nnz);
        self.data.truncate(nnz);
    }
}

/// Feature matrix of a dataset, dense or sparse depending on the source.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureMatrix {
    /// Row-major dense values.
    Dense {
        data: Vec<f32>,
        num_rows: usize,
        num_cols: usize,
    },
    Sparse(CsrMatrix),
}

impl FeatureMatrix {
    pub fn dense(data: Vec<f32>, num_rows: usize, num_cols: usize) -> BenchResult<Self> {
        if data.len() != num_rows * num_cols {
            return Err(BenchError::InvalidConfig(format!(
                "dense buffer of {} values does not match shape {}x{}",
                data.len(),
                num_rows,
                num_cols
            )));
        }
        Ok(FeatureMatrix::Dense {
            data,
            num_rows,
            num_cols,
        })
    }

    pub fn num_rows(&self) -> usize {
        match self {
            FeatureMatrix::Dense { num_rows, .. } => *num_rows,
            FeatureMatrix::Sparse(csr) => csr.num_rows(),
        }
    }

    pub fn num_cols(&self) -> usize {
        match self {
            FeatureMatrix::Dense { num_cols, .. } => *num_cols,
            FeatureMatrix::Sparse(csr) => csr.num_cols(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_cols())
    }

    /// Copy of the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> FeatureMatrix {
        match self {
            FeatureMatrix::Dense { data, num_cols, .. } => {
                let mut out = Vec::with_capacity(rows.len() * num_cols);
                for &r in rows {
                    let start = r * num_cols;
                    out.extend_from_slice(&data[start..start + num_cols]);
                }
                FeatureMatrix::Dense {
                    data: out,
                    num_rows: rows.len(),
                    num_cols: *num_cols,
                }
            }
            FeatureMatrix::Sparse(csr) => FeatureMatrix::Sparse(csr.select_rows(rows)),
        }
    }

    /// Keep only the first `rows` rows.
    pub fn truncate_rows(&mut self, rows: usize) {
        match self {
            FeatureMatrix::Dense { data, num_rows, num_cols } => {
                if rows < *num_rows {
                    data.truncate(rows * *num_cols);
                    *num_rows = rows;
                }
            }
            FeatureMatrix::Sparse(csr) => csr.truncate_rows(rows),
        }
    }

    /// Hand the features to XGBoost.
    pub fn to_dmatrix(&self) -> XGBResult<DMatrix> {
        match self {
            FeatureMatrix::Dense { data, num_rows, .. } => DMatrix::from_dense(data, *num_rows),
            FeatureMatrix::Sparse(csr) => DMatrix::from_csr(&csr.indptr, &csr.indices, &csr.data, Some(csr.num_cols)),
        }
    }
}

/// Train and test features with their labels.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSplit {
    pub x_train: FeatureMatrix,
    pub y_train: Vec<f32>,
    pub x_test: FeatureMatrix,
    pub y_test: Vec<f32>,
}

impl DatasetSplit {
    pub fn new(x_train: FeatureMatrix, y_train: Vec<f32>, x_test: FeatureMatrix, y_test: Vec<f32>) -> BenchResult<Self> {
        if x_train.num_rows() != y_train.len() || x_test.num_rows() != y_test.len() {
            return Err(BenchError::InvalidConfig(format!(
                "label count does not match rows (train {} vs {}, test {} vs {})",
                x_train.num_rows(),
                y_train.len(),
                x_test.num_rows(),
                y_test.len()
            )));
        }
        if x_train.num_cols() != x_test.num_cols() {
            return Err(BenchError::InvalidConfig(format!(
                "train and test feature counts differ ({} vs {})",
                x_train.num_cols(),
                x_test.num_cols()
            )));
        }
        Ok(DatasetSplit {
            x_train,
            y_train,
            x_test,
            y_test,
        })
    }

    /// Split one labelled matrix into train and test parts, see [`train_test_split`].
    pub fn from_rows(
        x: &FeatureMatrix,
        y: &[f32],
        test_fraction: f64,
        train_size: Option<usize>,
        seed: u64,
    ) -> BenchResult<Self> {
        let (train_idx, test_idx) = train_test_split(x.num_rows(), test_fraction, train_size, seed)?;
        let select = |idx: &[usize]| idx.iter().map(|&i| y[i]).collect::<Vec<f32>>();
        DatasetSplit::new(
            x.select_rows(&train_idx),
            select(&train_idx),
            x.select_rows(&test_idx),
            select(&test_idx),
        )
    }

    /// `(train rows, test rows, features)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.x_train.num_rows(), self.x_test.num_rows(), self.x_train.num_cols())
    }

    /// Class count inferred from the largest test label, as `max(y_test) + 1`.
    pub fn num_classes(&self) -> u32 {
        let max = self.y_test.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if max.is_finite() && max >= 0.0 {
            max as u32 + 1
        } else {
            1
        }
    }
}

/// Every dataset the harness knows how to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DatasetKind {
    Cifar10,
    #[serde(rename = "SVHN")]
    Svhn,
    #[serde(rename = "MNIST")]
    Mnist,
    News20,
    Higgs,
    YearPredictionMSD,
    #[serde(rename = "Cover Type")]
    CoverType,
    Airline,
    SyntheticR,
    SyntheticCl,
}

impl DatasetKind {
    pub const ALL: &'static [DatasetKind] = &[
        DatasetKind::Cifar10,
        DatasetKind::Svhn,
        DatasetKind::Mnist,
        DatasetKind::News20,
        DatasetKind::Higgs,
        DatasetKind::YearPredictionMSD,
        DatasetKind::CoverType,
        DatasetKind::Airline,
        DatasetKind::SyntheticR,
        DatasetKind::SyntheticCl,
    ];

    pub const DEFAULTS: &'static [DatasetKind] = &[
        DatasetKind::Cifar10,
        DatasetKind::Svhn,
        DatasetKind::SyntheticR,
        DatasetKind::SyntheticCl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Cifar10 => "Cifar10",
            DatasetKind::Svhn => "SVHN",
            DatasetKind::Mnist => "MNIST",
            DatasetKind::News20 => "News20",
            DatasetKind::Higgs => "Higgs",
            DatasetKind::YearPredictionMSD => "YearPredictionMSD",
            DatasetKind::CoverType => "Cover Type",
            DatasetKind::Airline => "Airline",
            DatasetKind::SyntheticR => "SyntheticR",
            DatasetKind::SyntheticCl => "SyntheticCl",
        }
    }

    pub fn task(self) -> Task {
        match self {
            DatasetKind::Higgs | DatasetKind::Airline => Task::Classification,
            DatasetKind::YearPredictionMSD | DatasetKind::SyntheticR => Task::Regression,
            _ => Task::MulticlassClassification,
        }
    }

    pub fn metric(self) -> MetricKind {
        match self.task() {
            Task::Regression => MetricKind::Rmse,
            _ => MetricKind::Accuracy,
        }
    }

    /// Synthetic datasets are generated once per requested feature count.
    pub fn is_synthetic(self) -> bool {
        matches!(self, DatasetKind::SyntheticR | DatasetKind::SyntheticCl)
    }

    /// Order the tree methods are trained in. `SyntheticR` starts with the CPU baseline.
    pub fn run_order(self) -> &'static [Algorithm] {
        match self {
            DatasetKind::SyntheticR => &[Algorithm::Cpu, Algorithm::Fpga],
            _ => Algorithm::RUN_ORDER,
        }
    }

    /// Table label of one run: synthetic runs carry their feature count.
    pub fn run_name(self, nfeatures: Option<usize>) -> String {
        match nfeatures {
            Some(n) if self.is_synthetic() => format!("{} {}", self.name(), n),
            _ => self.name().to_owned(),
        }
    }

    /// Load or generate the train/test split. `nfeatures` is only read by synthetic datasets.
    pub fn load(self, data_dir: &Path, nfeatures: usize, seed: u64) -> BenchResult<DatasetSplit> {
        match self {
            DatasetKind::Cifar10 => {
                info!("Loading Cifar10");
                load_libsvm_pair(data_dir, "cifar10.bz2", "cifar10.t.bz2")
            }
            DatasetKind::Svhn => {
                info!("Loading SVHN");
                let mut split = load_libsvm_pair(data_dir, "SVHN.bz2", "SVHN.t.bz2")?;
                split.x_train.truncate_rows(SVHN_TRAIN_ROWS);
                split.y_train.truncate(SVHN_TRAIN_ROWS);
                Ok(split)
            }
            DatasetKind::Mnist => {
                info!("Loading MNIST");
                load_libsvm_pair(data_dir, "mnist.bz2", "mnist.t.bz2")
            }
            DatasetKind::News20 => {
                info!("Loading News20");
                load_libsvm_pair(data_dir, "news20.bz2", "news20.t.bz2")
            }
            DatasetKind::Higgs => {
                info!("Loading Higgs");
                load_libsvm_single(data_dir, "HIGGS.bz2", seed)
            }
            DatasetKind::YearPredictionMSD => {
                info!("Loading YearPredictionMSD");
                load_libsvm_single(data_dir, "YearPredictionMSD.bz2", seed)
            }
            DatasetKind::CoverType => {
                info!("Loading Cover Type");
                load_libsvm_single(data_dir, "covtype.libsvm.binary.bz2", seed)
            }
            DatasetKind::Airline => {
                info!("Loading Airline");
                let (x, y) = airline::load(data_dir.join("airline_14col.data.bz2"), AIRLINE_ROWS)?;
                DatasetSplit::from_rows(&x, &y, TEST_FRACTION, None, seed)
            }
            DatasetKind::SyntheticR => {
                info!("Creating Synthetic Regression");
                synthetic_regression(nfeatures, seed)
            }
            DatasetKind::SyntheticCl => {
                info!("Creating Synthetic Multiclass classification");
                synthetic_classification(nfeatures, seed)
            }
        }
    }
}

impl FromStr for DatasetKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DatasetKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BenchError::UnknownDataset(s.to_owned()))
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn load_libsvm_pair(data_dir: &Path, train: &str, test: &str) -> BenchResult<DatasetSplit> {
    let mut files = libsvm::load_libsvm_files(&[data_dir.join(train), data_dir.join(test)])?;
    let (x_test, y_test) = files.pop().ok_or_else(|| BenchError::InvalidConfig("missing test file".into()))?;
    let (x_train, y_train) = files.pop().ok_or_else(|| BenchError::InvalidConfig("missing train file".into()))?;
    DatasetSplit::new(
        FeatureMatrix::Sparse(x_train),
        y_train,
        FeatureMatrix::Sparse(x_test),
        y_test,
    )
}

fn load_libsvm_single(data_dir: &Path, file: &str, seed: u64) -> BenchResult<DatasetSplit> {
    let (x, y) = libsvm::load_libsvm_file(data_dir.join(file))?;
    DatasetSplit::from_rows(
        &FeatureMatrix::Sparse(x),
        &y,
        TEST_FRACTION,
        Some(LARGE_TRAIN_ROWS),
        seed,
    )
}
