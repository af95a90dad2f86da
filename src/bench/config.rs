//! Run configuration, resolved once from the command line.
use std::path::PathBuf;

use clap::{Args, Parser};

use super::dataset::DatasetKind;
use crate::error::{BenchError, BenchResult};

/// Tree regularization shared by both tree methods, so that CPU and FPGA runs stay comparable.
#[derive(Args, Clone, Copy, Debug, PartialEq)]
pub struct Regularization {
    /// Learning rate (eta).
    #[arg(long = "eta", default_value_t = 0.1)]
    pub learning_rate: f32,

    /// Minimum loss reduction required to split a leaf (gamma).
    #[arg(long, default_value_t = 0.0)]
    pub min_split_loss: f32,

    /// Minimum hessian sum needed in a child.
    #[arg(long, default_value_t = 1.0)]
    pub min_child_weight: f32,

    /// L1 regularization on leaf weights.
    #[arg(long = "alpha", default_value_t = 0.0)]
    pub l1_reg: f32,

    /// L2 regularization on leaf weights.
    #[arg(long = "lambda", default_value_t = 1.0)]
    pub l2_reg: f32,
}

impl Default for Regularization {
    fn default() -> Self {
        Regularization {
            learning_rate: 0.1,
            min_split_loss: 0.0,
            min_child_weight: 1.0,
            l1_reg: 0.0,
            l2_reg: 1.0,
        }
    }
}

/// Options of a benchmark run.
#[derive(Parser, Clone, Debug)]
#[command(
    name = "benchmarks",
    about = "Time XGBoost training with the exact CPU tree method and the FPGA updater",
    version
)]
pub struct RunConfig {
    /// Boosting rounds.
    #[arg(short = 'r', long, default_value_t = 5)]
    pub rounds: u32,

    /// Datasets to run, comma separated.
    #[arg(
        short = 'd',
        long,
        value_delimiter = ',',
        default_values_t = DatasetKind::DEFAULTS.to_vec()
    )]
    pub datasets: Vec<DatasetKind>,

    /// XGBoost verbosity parameter.
    #[arg(short = 'v', long, default_value_t = 0)]
    pub verbosity: u8,

    /// Number of threads to use.
    #[arg(short = 't', long)]
    pub nthreads: Option<u32>,

    /// Number of requests for the Coral manager. Not used with the standalone version.
    #[arg(short = 'R', long, default_value_t = 4)]
    pub nrequests: u32,

    /// Number of features for the synthetic datasets; one run per value.
    #[arg(short = 'f', long, num_args = 1.., default_values_t = [1024usize])]
    pub nfeatures: Vec<usize>,

    /// The maximum depth of the tree.
    #[arg(short = 'D', long, default_value_t = 10)]
    pub depth: u32,

    /// Directory holding the compressed dataset files.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Seed for synthetic data generation and train/test splits.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Also write the final result table as JSON to this path.
    #[arg(long)]
    pub out_json: Option<PathBuf>,

    #[command(flatten)]
    pub regularization: Regularization,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            rounds: 5,
            datasets: DatasetKind::DEFAULTS.to_vec(),
            verbosity: 0,
            nthreads: None,
            nrequests: 4,
            nfeatures: vec![1024],
            depth: 10,
            data_dir: PathBuf::from("data"),
            seed: 0,
            out_json: None,
            regularization: Regularization::default(),
        }
    }
}

impl RunConfig {
    /// Reject option combinations that would only fail halfway through a run.
    pub fn validate(&self) -> BenchResult<()> {
        if self.rounds == 0 {
            return Err(BenchError::InvalidConfig("--rounds must be at least 1".into()));
        }
        if self.depth == 0 {
            return Err(BenchError::InvalidConfig("--depth must be at least 1".into()));
        }
        if self.datasets.is_empty() {
            return Err(BenchError::InvalidConfig("no datasets selected".into()));
        }

        let synthetic = self.datasets.iter().any(|d| d.is_synthetic());
        if synthetic && self.nfeatures.is_empty() {
            return Err(BenchError::InvalidConfig("--nfeatures needs at least one value".into()));
        }
        if self.datasets.contains(&DatasetKind::SyntheticCl) {
            let min = super::dataset::synthetic::CLASSIFICATION_MIN_FEATURES;
            if let Some(&bad) = self.nfeatures.iter().find(|&&n| n < min) {
                return Err(BenchError::InvalidConfig(format!(
                    "SyntheticCl needs at least {} features, got {}",
                    min, bad
                )));
            }
        }
        if self.nfeatures.contains(&0) {
            return Err(BenchError::InvalidConfig("--nfeatures values must be positive".into()));
        }
        Ok(())
    }

    /// Selected datasets in command-line order, without repeats.
    pub fn selected_datasets(&self) -> Vec<DatasetKind> {
        let mut out: Vec<DatasetKind> = Vec::with_capacity(self.datasets.len());
        for &kind in &self.datasets {
            if !out.contains(&kind) {
                out.push(kind);
            }
        }
        out
    }

    /// Synthetic feature counts in command-line order, without repeats.
    pub fn feature_counts(&self) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::with_capacity(self.nfeatures.len());
        for &n in &self.nfeatures {
            if !out.contains(&n) {
                out.push(n);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunConfig {
        let mut argv = vec!["benchmarks"];
        argv.extend_from_slice(args);
        RunConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_default_impl() {
        let parsed = parse(&[]);
        let default = RunConfig::default();
        assert_eq!(parsed.rounds, default.rounds);
        assert_eq!(parsed.datasets, default.datasets);
        assert_eq!(parsed.verbosity, default.verbosity);
        assert_eq!(parsed.nthreads, default.nthreads);
        assert_eq!(parsed.nrequests, default.nrequests);
        assert_eq!(parsed.nfeatures, default.nfeatures);
        assert_eq!(parsed.depth, default.depth);
        assert_eq!(parsed.data_dir, default.data_dir);
        assert_eq!(parsed.seed, default.seed);
        assert_eq!(parsed.regularization, default.regularization);
    }

    #[test]
    fn short_flags() {
        let cfg = parse(&["-r", "20", "-d", "Higgs,Cover Type", "-v", "1", "-t", "8", "-R", "2", "-f", "64", "128", "-D", "6"]);
        assert_eq!(cfg.rounds, 20);
        assert_eq!(cfg.datasets, vec![DatasetKind::Higgs, DatasetKind::CoverType]);
        assert_eq!(cfg.verbosity, 1);
        assert_eq!(cfg.nthreads, Some(8));
        assert_eq!(cfg.nrequests, 2);
        assert_eq!(cfg.nfeatures, vec![64, 128]);
        assert_eq!(cfg.depth, 6);
    }

    #[test]
    fn unknown_dataset_is_rejected_at_parse_time() {
        let argv = ["benchmarks", "--datasets", "Cifar10,ImageNet"];
        assert!(RunConfig::try_parse_from(argv).is_err());
    }

    #[test]
    fn validate_rejects_small_classification_width() {
        let cfg = parse(&["-d", "SyntheticCl", "-f", "8"]);
        assert!(matches!(cfg.validate(), Err(BenchError::InvalidConfig(_))));

        let cfg = parse(&["-d", "SyntheticR", "-f", "8"]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_rounds() {
        let cfg = parse(&["-r", "0"]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn repeats_are_dropped_in_order() {
        let cfg = parse(&["-d", "SVHN,Cifar10,SVHN", "-f", "32", "16", "32"]);
        assert_eq!(cfg.selected_datasets(), vec![DatasetKind::Svhn, DatasetKind::Cifar10]);
        assert_eq!(cfg.feature_counts(), vec![32, 16]);
    }
}
