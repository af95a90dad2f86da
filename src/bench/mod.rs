//! The benchmark harness: load a dataset, train it once per tree method, tabulate the results.
//!
//! Every selected dataset is trained in its [`DatasetKind::run_order`], and the accumulated
//! [`ResultTable`] is printed after each dataset. Each synthetic feature count counts as its own
//! dataset. Any error stops the whole run.
use std::path::Path;

mod config;
pub mod configure;
pub mod dataset;
pub mod metrics;
mod runner;
mod table;
mod task;

pub use self::config::{Regularization, RunConfig};
pub use self::configure::{configure_xgboost, configure_xgboost_by_name};
pub use self::dataset::{DatasetKind, DatasetSplit};
pub use self::runner::{run_xgboost, train_xgboost};
pub use self::table::{ResultRow, ResultTable};
pub use self::task::{Algorithm, MetricKind, Task};

use crate::error::BenchResult;

/// Train every algorithm of `order` on one split and record the results under `name`.
pub fn run_benchmark(
    table: &mut ResultTable,
    name: &str,
    split: &DatasetSplit,
    task: Task,
    metric: MetricKind,
    order: &[Algorithm],
    config: &RunConfig,
) -> BenchResult<()> {
    let (train_rows, test_rows, features) = split.shape();
    debug!(
        "{}: {} training rows, {} test rows, {} features",
        name, train_rows, test_rows, features
    );

    table.register(name);
    for &alg in order {
        info!("Starting training {} {}", name, alg);
        let (elapsed, value) = train_xgboost(split, alg, task, metric, config)?;
        info!("{} {}: {:.3}s, {} {}", name, alg, elapsed, metric, value);
        table.record(name, alg, metric, elapsed, value)?;
    }
    Ok(())
}

/// Datasets in run order, each synthetic one expanded to one entry per feature count.
pub fn planned_runs(config: &RunConfig) -> Vec<(DatasetKind, Option<usize>)> {
    let features = config.feature_counts();
    let mut runs = Vec::new();
    for kind in config.selected_datasets() {
        if kind.is_synthetic() {
            runs.extend(features.iter().map(|&n| (kind, Some(n))));
        } else {
            runs.push((kind, None));
        }
    }
    runs
}

/// Run every dataset selected in `config`, printing the table after each one.
pub fn run(config: &RunConfig) -> BenchResult<ResultTable> {
    let mut table = ResultTable::new();

    for (kind, nfeatures) in planned_runs(config) {
        let split = kind.load(&config.data_dir, nfeatures.unwrap_or(0), config.seed)?;
        run_benchmark(
            &mut table,
            &kind.run_name(nfeatures),
            &split,
            kind.task(),
            kind.metric(),
            kind.run_order(),
            config,
        )?;
        println!("{}", table);
    }

    if let Some(path) = &config.out_json {
        write_results(&table, path)?;
    }
    Ok(table)
}

fn write_results(table: &ResultTable, path: &Path) -> BenchResult<()> {
    if table.is_empty() {
        warn!("No results to write to {}", path.display());
    }
    table.write_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn every_feature_count_is_its_own_run() {
        let config = RunConfig::try_parse_from(["benchmarks", "-d", "SyntheticR,Higgs,SyntheticCl", "-f", "64", "128"]).unwrap();
        let names: Vec<String> = planned_runs(&config)
            .into_iter()
            .map(|(kind, n)| kind.run_name(n))
            .collect();
        assert_eq!(
            names,
            ["SyntheticR 64", "SyntheticR 128", "Higgs", "SyntheticCl 64", "SyntheticCl 128"]
        );
    }

    #[test]
    fn file_datasets_run_once() {
        let config = RunConfig::try_parse_from(["benchmarks", "-d", "SVHN,Cifar10,SVHN", "-f", "16", "32"]).unwrap();
        assert_eq!(
            planned_runs(&config),
            vec![(DatasetKind::Svhn, None), (DatasetKind::Cifar10, None)]
        );
    }
}
