//! Parameters of the tree booster.
use std::default::Default;
use std::fmt;

use super::Interval;

/// Split-finding algorithm used to grow each tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeMethod {
    /// Exact greedy algorithm, enumerating every split candidate on the CPU.
    Exact,

    /// The same exact greedy search, with split evaluation offloaded to the FPGA updater
    /// (`grow_fpga`). Only available when the native library was built with the `fpga` or
    /// `coral` feature.
    FpgaExact,
}

impl fmt::Display for TreeMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TreeMethod::Exact => write!(f, "exact"),
            TreeMethod::FpgaExact => write!(f, "fpga_exact"),
        }
    }
}

impl Default for TreeMethod {
    fn default() -> Self {
        TreeMethod::Exact
    }
}

/// BoosterParameters for Tree Booster. Create using
/// [`TreeBoosterParametersBuilder`](struct.TreeBoosterParametersBuilder.html).
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[builder(default)]
pub struct TreeBoosterParameters {
    /// Step size shrinkage used in update to prevents overfitting.
    ///
    /// * range: [0.0, 1.0]
    /// * default: 0.3
    eta: f32,

    /// Minimum loss reduction required to make a further partition on a leaf node of the tree
    /// (`min_split_loss`).
    ///
    /// * range: [0, inf)
    /// * default: 0
    gamma: f32,

    /// Maximum depth of a tree.
    ///
    /// * range: [1, inf)
    /// * default: 6
    max_depth: u32,

    /// Minimum sum of instance weight (hessian) needed in a child.
    ///
    /// * range: [0, inf)
    /// * default: 1
    min_child_weight: f32,

    /// L2 regularization term on weights.
    ///
    /// * default: 1
    lambda: f32,

    /// L1 regularization term on weights.
    ///
    /// * default: 0
    alpha: f32,

    /// The tree construction algorithm used in XGBoost.
    ///
    /// * default: [`TreeMethod::Exact`]
    tree_method: TreeMethod,
}

impl Default for TreeBoosterParameters {
    fn default() -> Self {
        TreeBoosterParameters {
            eta: 0.3,
            gamma: 0.0,
            max_depth: 6,
            min_child_weight: 1.0,
            lambda: 1.0,
            alpha: 0.0,
            tree_method: TreeMethod::default(),
        }
    }
}

impl TreeBoosterParameters {
    pub fn tree_method(&self) -> TreeMethod {
        self.tree_method
    }

    pub(crate) fn as_string_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("booster".to_owned(), "gbtree".to_owned()),
            ("max_depth".to_owned(), self.max_depth.to_string()),
            ("eta".to_owned(), self.eta.to_string()),
            ("gamma".to_owned(), self.gamma.to_string()),
            ("min_child_weight".to_owned(), self.min_child_weight.to_string()),
            ("lambda".to_owned(), self.lambda.to_string()),
            ("alpha".to_owned(), self.alpha.to_string()),
            ("tree_method".to_owned(), self.tree_method.to_string()),
        ]
    }
}

impl TreeBoosterParametersBuilder {
    fn validate(&self) -> Result<(), String> {
        Interval::new_closed_closed(0.0, 1.0).validate(&self.eta, "eta")?;
        Interval::new_closed_open(0.0, f32::INFINITY).validate(&self.gamma, "gamma")?;
        Interval::new_closed_open(1, u32::MAX).validate(&self.max_depth, "max_depth")?;
        Interval::new_closed_open(0.0, f32::INFINITY).validate(&self.min_child_weight, "min_child_weight")?;
        Interval::new_closed_open(0.0, f32::INFINITY).validate(&self.lambda, "lambda")?;
        Interval::new_closed_open(0.0, f32::INFINITY).validate(&self.alpha, "alpha")?;
        Ok(())
    }
}
