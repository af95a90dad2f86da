//! The three vocabularies a benchmark run is described in: task category, tree-method variant and
//! evaluation metric. Each parses from the names used on the command line and in reports, and an
//! unknown name is always a configuration error.
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::BenchError;
use crate::parameters::learning::Objective;
use crate::parameters::tree::TreeMethod;

/// Learning task category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Task {
    #[serde(rename = "Regression")]
    Regression,
    #[serde(rename = "Classification")]
    Classification,
    #[serde(rename = "Multiclass classification")]
    MulticlassClassification,
}

impl Task {
    /// Objective optimised for this task; `num_class` only matters for multiclass.
    pub fn objective(self, num_class: u32) -> Objective {
        match self {
            Task::Regression => Objective::RegSquaredError,
            Task::Classification => Objective::BinaryLogistic,
            Task::MulticlassClassification => Objective::MultiSoftmax(num_class),
        }
    }
}

impl FromStr for Task {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Regression" => Ok(Task::Regression),
            "Classification" => Ok(Task::Classification),
            "Multiclass classification" => Ok(Task::MulticlassClassification),
            other => Err(BenchError::UnknownTask(other.to_owned())),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Task::Regression => "Regression",
            Task::Classification => "Classification",
            Task::MulticlassClassification => "Multiclass classification",
        };
        f.write_str(name)
    }
}

/// Which tree updater builds the trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Cpu,
    Fpga,
}

impl Algorithm {
    /// Row order of the result table.
    pub const ALL: &'static [Algorithm] = &[Algorithm::Cpu, Algorithm::Fpga];

    /// Training order of most datasets. See `DatasetKind::run_order`.
    pub const RUN_ORDER: &'static [Algorithm] = &[Algorithm::Fpga, Algorithm::Cpu];

    pub fn tree_method(self) -> TreeMethod {
        match self {
            Algorithm::Cpu => TreeMethod::Exact,
            Algorithm::Fpga => TreeMethod::FpgaExact,
        }
    }
}

impl FromStr for Algorithm {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Algorithm::Cpu),
            "fpga" => Ok(Algorithm::Fpga),
            other => Err(BenchError::UnknownAlgorithm(other.to_owned())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Cpu => f.write_str("cpu"),
            Algorithm::Fpga => f.write_str("fpga"),
        }
    }
}

/// Metric reported for a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MetricKind {
    #[serde(rename = "RMSE")]
    Rmse,
    #[serde(rename = "Accuracy")]
    Accuracy,
}

impl FromStr for MetricKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RMSE" => Ok(MetricKind::Rmse),
            "Accuracy" => Ok(MetricKind::Accuracy),
            other => Err(BenchError::UnknownMetric(other.to_owned())),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricKind::Rmse => f.write_str("RMSE"),
            MetricKind::Accuracy => f.write_str("Accuracy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_display() {
        for task in [Task::Regression, Task::Classification, Task::MulticlassClassification] {
            assert_eq!(task.to_string().parse::<Task>().unwrap(), task);
        }
        for &alg in Algorithm::ALL {
            assert_eq!(alg.to_string().parse::<Algorithm>().unwrap(), alg);
        }
        for metric in [MetricKind::Rmse, MetricKind::Accuracy] {
            assert_eq!(metric.to_string().parse::<MetricKind>().unwrap(), metric);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!("gpu".parse::<Algorithm>(), Err(BenchError::UnknownAlgorithm(a)) if a == "gpu"));
        assert!(matches!("Foo".parse::<MetricKind>(), Err(BenchError::UnknownMetric(m)) if m == "Foo"));
        assert!(matches!("Ranking".parse::<Task>(), Err(BenchError::UnknownTask(t)) if t == "Ranking"));
        // names are case sensitive
        assert!("CPU".parse::<Algorithm>().is_err());
        assert!("rmse".parse::<MetricKind>().is_err());
    }

    #[test]
    fn algorithm_selects_tree_method() {
        assert_eq!(Algorithm::Cpu.tree_method(), TreeMethod::Exact);
        assert_eq!(Algorithm::Fpga.tree_method(), TreeMethod::FpgaExact);
    }

    #[test]
    fn task_selects_objective() {
        assert_eq!(Task::Regression.objective(0), Objective::RegSquaredError);
        assert_eq!(Task::Classification.objective(2), Objective::BinaryLogistic);
        assert_eq!(Task::MulticlassClassification.objective(10), Objective::MultiSoftmax(10));
    }
}
