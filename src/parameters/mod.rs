//! Builders for the parameters handed to XGBoost.
//!
//! Only the subset the benchmarks configure is modelled: tree booster settings (including the
//! FPGA tree method), the learning objective and the process-level knobs (verbosity, threads and
//! the Coral request count).
use std::default::Default;
use std::fmt::{self, Display};

pub mod learning;
pub mod tree;

use crate::DMatrix;

/// Parameters for training boosters.
/// Created using [`BoosterParametersBuilder`](struct.BoosterParametersBuilder.html).
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct BoosterParameters {
    /// Tree booster configuration.
    tree_params: tree::TreeBoosterParameters,

    /// Configuration for the learning objective.
    learning_params: learning::LearningTaskParameters,

    /// XGBoost log level, 0 (silent) to 3 (debug).
    ///
    /// *default*: `0`
    verbosity: u8,

    /// Number of parallel threads XGBoost will use.
    ///
    /// *default*: `None` (XGBoost picks the thread count itself)
    threads: Option<u32>,

    /// Number of concurrent accelerator requests the Coral-managed FPGA updater splits the
    /// feature columns into. Ignored by the CPU updaters and by the standalone FPGA build.
    ///
    /// *default*: `None`
    requests: Option<u32>,
}

impl Default for BoosterParameters {
    fn default() -> Self {
        BoosterParameters {
            tree_params: tree::TreeBoosterParameters::default(),
            learning_params: learning::LearningTaskParameters::default(),
            verbosity: 0,
            threads: None,
            requests: None,
        }
    }
}

impl BoosterParameters {
    /// Flatten into the `(name, value)` pairs passed to `XGBoosterSetParam`, in a stable order.
    pub fn as_string_pairs(&self) -> Vec<(String, String)> {
        let mut v = Vec::new();

        v.extend(self.tree_params.as_string_pairs());
        v.push(("verbosity".to_owned(), self.verbosity.to_string()));

        if let Some(nthread) = self.threads {
            v.push(("nthread".to_owned(), nthread.to_string()));
        }
        if let Some(requests) = self.requests {
            v.push(("nRequests".to_owned(), requests.to_string()));
        }

        v.extend(self.learning_params.as_string_pairs());
        v
    }

    /// Look up a single flattened parameter by name.
    pub fn get(&self, name: &str) -> Option<String> {
        self.as_string_pairs()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Parameters used by [`Booster::train`](../struct.Booster.html#method.train).
/// Created using [`TrainingParametersBuilder`](struct.TrainingParametersBuilder.html).
#[derive(Builder, Clone)]
pub struct TrainingParameters<'a> {
    pub(crate) dtrain: &'a DMatrix,

    #[builder(default = "10")]
    pub(crate) boost_rounds: u32,

    #[builder(default = "BoosterParameters::default()")]
    pub(crate) booster_params: BoosterParameters,

    /// Matrices evaluated (and printed) after every round, with their display names.
    #[builder(default = "None")]
    pub(crate) evaluation_sets: Option<&'a [(&'a DMatrix, &'a str)]>,
}

enum Inclusion {
    Open,
    Closed,
}

struct Interval<T> {
    min: T,
    min_inclusion: Inclusion,
    max: T,
    max_inclusion: Inclusion,
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lower = match self.min_inclusion {
            Inclusion::Closed => '[',
            Inclusion::Open => '(',
        };
        let upper = match self.max_inclusion {
            Inclusion::Closed => ']',
            Inclusion::Open => ')',
        };
        write!(f, "{}{}, {}{}", lower, self.min, self.max, upper)
    }
}

impl<T: PartialOrd + Display> Interval<T> {
    fn new(min: T, min_inclusion: Inclusion, max: T, max_inclusion: Inclusion) -> Self {
        Interval {
            min,
            min_inclusion,
            max,
            max_inclusion,
        }
    }

    fn new_closed_closed(min: T, max: T) -> Self {
        Interval::new(min, Inclusion::Closed, max, Inclusion::Closed)
    }

    fn new_closed_open(min: T, max: T) -> Self {
        Interval::new(min, Inclusion::Closed, max, Inclusion::Open)
    }

    fn contains(&self, val: &T) -> bool {
        let above_min = match self.min_inclusion {
            Inclusion::Closed => val >= &self.min,
            Inclusion::Open => val > &self.min,
        };
        let below_max = match self.max_inclusion {
            Inclusion::Closed => val <= &self.max,
            Inclusion::Open => val < &self.max,
        };
        above_min && below_max
    }

    fn validate(&self, val: &Option<T>, name: &str) -> Result<(), String> {
        match val {
            Some(ref val) => {
                if self.contains(val) {
                    Ok(())
                } else {
                    Err(format!(
                        "Invalid value for '{}' parameter, {} is not in range {}.",
                        name, &val, self
                    ))
                }
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_bounds() {
        let closed = Interval::new_closed_closed(0.0, 1.0);
        assert!(closed.contains(&0.0));
        assert!(closed.contains(&1.0));
        assert!(!closed.contains(&1.1));

        let half_open = Interval::new_closed_open(1, 10);
        assert!(half_open.contains(&1));
        assert!(!half_open.contains(&10));
        assert_eq!(half_open.to_string(), "[1, 10)");
    }

    #[test]
    fn interval_validate_message() {
        let interval = Interval::new_closed_closed(0.0, 1.0);
        assert!(interval.validate(&None, "eta").is_ok());
        assert!(interval.validate(&Some(0.3), "eta").is_ok());
        let err = interval.validate(&Some(2.0), "eta").unwrap_err();
        assert_eq!(err, "Invalid value for 'eta' parameter, 2 is not in range [0, 1].");
    }

    #[test]
    fn optional_knobs_only_emitted_when_set() {
        let params = BoosterParameters::default();
        assert_eq!(params.get("nthread"), None);
        assert_eq!(params.get("nRequests"), None);
        assert_eq!(params.get("verbosity"), Some("0".to_owned()));

        let params = BoosterParametersBuilder::default()
            .threads(Some(8))
            .requests(Some(4))
            .verbosity(2)
            .build()
            .unwrap();
        assert_eq!(params.get("nthread"), Some("8".to_owned()));
        assert_eq!(params.get("nRequests"), Some("4".to_owned()));
        assert_eq!(params.get("verbosity"), Some("2".to_owned()));
    }
}
