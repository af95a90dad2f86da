//! Turn (class count, algorithm, task, run options) into a full XGBoost parameter set.
use super::config::RunConfig;
use super::task::{Algorithm, Task};
use crate::error::{BenchError, BenchResult};
use crate::parameters::learning::LearningTaskParametersBuilder;
use crate::parameters::tree::TreeBoosterParametersBuilder;
use crate::parameters::{BoosterParameters, BoosterParametersBuilder};

/// Build the booster parameters for one run.
///
/// `num_class` is only read for multiclass tasks. Both algorithms get identical settings apart
/// from the tree method.
pub fn configure_xgboost(num_class: u32, alg: Algorithm, task: Task, config: &RunConfig) -> BenchResult<BoosterParameters> {
    let reg = &config.regularization;
    let tree_params = TreeBoosterParametersBuilder::default()
        .max_depth(config.depth)
        .eta(reg.learning_rate)
        .gamma(reg.min_split_loss)
        .min_child_weight(reg.min_child_weight)
        .alpha(reg.l1_reg)
        .lambda(reg.l2_reg)
        .tree_method(alg.tree_method())
        .build()
        .map_err(|e| BenchError::InvalidConfig(e.to_string()))?;

    let learning_params = LearningTaskParametersBuilder::default()
        .objective(task.objective(num_class))
        .build()
        .map_err(|e| BenchError::InvalidConfig(e.to_string()))?;

    BoosterParametersBuilder::default()
        .tree_params(tree_params)
        .learning_params(learning_params)
        .verbosity(config.verbosity)
        .threads(config.nthreads)
        .requests(Some(config.nrequests))
        .build()
        .map_err(|e| BenchError::InvalidConfig(e.to_string()))
}

/// Same as [`configure_xgboost`], with the algorithm and task given by name.
///
/// The algorithm is checked first, so an unknown updater is reported even when the task name
/// is also wrong.
pub fn configure_xgboost_by_name(num_class: u32, alg: &str, task: &str, config: &RunConfig) -> BenchResult<BoosterParameters> {
    let alg: Algorithm = alg.parse()?;
    let task: Task = task.parse()?;
    configure_xgboost(num_class, alg, task, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_regression() {
        let config = RunConfig::default();
        let params = configure_xgboost(1, Algorithm::Cpu, Task::Regression, &config).unwrap();
        assert_eq!(params.get("tree_method").as_deref(), Some("exact"));
        assert_eq!(params.get("objective").as_deref(), Some("reg:squarederror"));
        assert_eq!(params.get("max_depth").as_deref(), Some("10"));
        assert_eq!(params.get("eta").as_deref(), Some("0.1"));
        assert_eq!(params.get("verbosity").as_deref(), Some("0"));
        assert_eq!(params.get("nRequests").as_deref(), Some("4"));
        assert_eq!(params.get("nthread"), None);
        assert_eq!(params.get("num_class"), None);
    }

    #[test]
    fn fpga_multiclass() {
        let config = RunConfig {
            nthreads: Some(16),
            depth: 6,
            ..RunConfig::default()
        };
        let params = configure_xgboost(10, Algorithm::Fpga, Task::MulticlassClassification, &config).unwrap();
        assert_eq!(params.get("tree_method").as_deref(), Some("fpga_exact"));
        assert_eq!(params.get("objective").as_deref(), Some("multi:softmax"));
        assert_eq!(params.get("num_class").as_deref(), Some("10"));
        assert_eq!(params.get("nthread").as_deref(), Some("16"));
        assert_eq!(params.get("max_depth").as_deref(), Some("6"));
    }

    #[test]
    fn run_seed_is_not_sent_to_xgboost() {
        let config = RunConfig {
            seed: 7,
            ..RunConfig::default()
        };
        let params = configure_xgboost(1, Algorithm::Fpga, Task::Regression, &config).unwrap();
        assert_eq!(params.get("seed"), None);
    }

    #[test]
    fn binary_classification_objective() {
        let params = configure_xgboost(2, Algorithm::Cpu, Task::Classification, &RunConfig::default()).unwrap();
        assert_eq!(params.get("objective").as_deref(), Some("binary:logistic"));
    }

    #[test]
    fn algorithms_differ_only_in_tree_method() {
        let config = RunConfig::default();
        let cpu = configure_xgboost(5, Algorithm::Cpu, Task::MulticlassClassification, &config).unwrap();
        let fpga = configure_xgboost(5, Algorithm::Fpga, Task::MulticlassClassification, &config).unwrap();
        let differing: Vec<_> = cpu
            .as_string_pairs()
            .into_iter()
            .zip(fpga.as_string_pairs())
            .filter(|(a, b)| a != b)
            .map(|(a, _)| a.0)
            .collect();
        assert_eq!(differing, vec!["tree_method".to_owned()]);
    }

    #[test]
    fn unknown_names() {
        let config = RunConfig::default();
        let err = configure_xgboost_by_name(2, "gpu", "Regression", &config).unwrap_err();
        assert_eq!(err.to_string(), "Unknown Updater: gpu");

        let err = configure_xgboost_by_name(2, "cpu", "Ranking", &config).unwrap_err();
        assert_eq!(err.to_string(), "Unknown task: Ranking");

        // updater is checked before the task
        let err = configure_xgboost_by_name(2, "gpu", "Ranking", &config).unwrap_err();
        assert!(matches!(err, BenchError::UnknownAlgorithm(_)));
    }

    #[test]
    fn out_of_range_eta_is_a_config_error() {
        let mut config = RunConfig::default();
        config.regularization.learning_rate = 2.0;
        let err = configure_xgboost(1, Algorithm::Cpu, Task::Regression, &config).unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig(_)));
    }
}
