use std::time::Instant;

use super::config::RunConfig;
use super::configure::configure_xgboost;
use super::dataset::DatasetSplit;
use super::metrics::evaluate;
use super::task::{Algorithm, MetricKind, Task};
use crate::error::{BenchError, BenchResult};
use crate::parameters::{BoosterParameters, TrainingParametersBuilder};
use crate::{Booster, DMatrix};

/// Train on `dtrain` for `rounds` rounds and score the model on `dtest`.
///
/// Only the training call is timed. Both matrices are evaluated after every round, and the
/// evaluation lines are printed as XGBoost formats them. Returns `(seconds, metric)`.
pub fn run_xgboost(
    task: Task,
    metric: MetricKind,
    dtrain: &DMatrix,
    dtest: &DMatrix,
    y_test: &[f32],
    params: BoosterParameters,
    rounds: u32,
) -> BenchResult<(f64, f64)> {
    let evals = [(dtrain, "train"), (dtest, "val")];
    let training = TrainingParametersBuilder::default()
        .dtrain(dtrain)
        .boost_rounds(rounds)
        .booster_params(params)
        .evaluation_sets(Some(&evals[..]))
        .build()
        .map_err(|e| BenchError::InvalidConfig(e.to_string()))?;

    let start = Instant::now();
    let booster = Booster::train(&training)?;
    let elapsed = start.elapsed().as_secs_f64();

    let preds = booster.predict(dtest)?;
    let value = evaluate(task, metric, y_test, &preds)?;
    debug!("Trained {} rounds in {:.3}s, {} = {}", rounds, elapsed, metric, value);
    Ok((elapsed, value))
}

/// Train one algorithm variant on a split: build the matrices, configure XGBoost and time the
/// run. The class count is taken from the test labels.
pub fn train_xgboost(
    split: &DatasetSplit,
    alg: Algorithm,
    task: Task,
    metric: MetricKind,
    config: &RunConfig,
) -> BenchResult<(f64, f64)> {
    let mut dtrain = split.x_train.to_dmatrix()?;
    dtrain.set_labels(&split.y_train)?;
    let mut dtest = split.x_test.to_dmatrix()?;
    dtest.set_labels(&split.y_test)?;

    let params = configure_xgboost(split.num_classes(), alg, task, config)?;
    run_xgboost(task, metric, &dtrain, &dtest, &split.y_test, params, config.rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::dataset::FeatureMatrix;

    fn line_split() -> DatasetSplit {
        // y = 2x on a grid, test points interleaved with the training ones
        let train_x: Vec<f32> = (0..40).map(|i| i as f32).collect();
        let train_y: Vec<f32> = train_x.iter().map(|x| 2.0 * x).collect();
        let test_x: Vec<f32> = (0..10).map(|i| i as f32 * 4.0 + 0.5).collect();
        let test_y: Vec<f32> = test_x.iter().map(|x| 2.0 * x).collect();
        DatasetSplit::new(
            FeatureMatrix::dense(train_x, 40, 1).unwrap(),
            train_y,
            FeatureMatrix::dense(test_x, 10, 1).unwrap(),
            test_y,
        )
        .unwrap()
    }

    fn cpu_config() -> RunConfig {
        let mut config = RunConfig {
            rounds: 20,
            depth: 4,
            nthreads: Some(1),
            ..RunConfig::default()
        };
        config.regularization.learning_rate = 0.3;
        config
    }

    #[test]
    fn regression_run_reports_time_and_rmse() {
        let split = line_split();
        let (elapsed, rmse) = train_xgboost(&split, Algorithm::Cpu, Task::Regression, MetricKind::Rmse, &cpu_config()).unwrap();
        assert!(elapsed >= 0.0);
        assert!(rmse >= 0.0);
        // targets span [0, 80], a fitted model does far better than predicting the mean
        assert!(rmse < 20.0, "rmse {}", rmse);
    }

    #[test]
    fn regression_run_is_deterministic() {
        let split = line_split();
        let config = cpu_config();
        let (_, a) = train_xgboost(&split, Algorithm::Cpu, Task::Regression, MetricKind::Rmse, &config).unwrap();
        let (_, b) = train_xgboost(&split, Algorithm::Cpu, Task::Regression, MetricKind::Rmse, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn multiclass_accuracy_in_unit_range() {
        let x: Vec<f32> = (0..30).map(|i| i as f32).collect();
        let y: Vec<f32> = (0..30).map(|i| (i / 10) as f32).collect();
        let split = DatasetSplit::new(
            FeatureMatrix::dense(x.clone(), 30, 1).unwrap(),
            y.clone(),
            FeatureMatrix::dense(x, 30, 1).unwrap(),
            y,
        )
        .unwrap();
        let (_, acc) = train_xgboost(
            &split,
            Algorithm::Cpu,
            Task::MulticlassClassification,
            MetricKind::Accuracy,
            &cpu_config(),
        )
        .unwrap();
        assert!((0.0..=1.0).contains(&acc));
    }
}
