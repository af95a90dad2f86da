//! Learning task parameters: the objective being optimised.
use std::default::Default;
use std::fmt;

/// Learning objective, one per benchmark task category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    /// Regression with squared loss.
    RegSquaredError,

    /// Logistic regression for binary classification, outputs probabilities.
    BinaryLogistic,

    /// Multiclass classification using the softmax objective, with the given number of classes.
    ///
    /// Predictions are class indices, one per row.
    MultiSoftmax(u32),
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Objective::RegSquaredError => write!(f, "reg:squarederror"),
            Objective::BinaryLogistic => write!(f, "binary:logistic"),
            Objective::MultiSoftmax(_) => write!(f, "multi:softmax"),
        }
    }
}

impl Default for Objective {
    fn default() -> Self {
        Objective::RegSquaredError
    }
}

/// Parameters that configure the learning objective.
///
/// See [`LearningTaskParametersBuilder`](struct.LearningTaskParametersBuilder.html), for details
/// on parameters.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct LearningTaskParameters {
    pub(crate) objective: Objective,
}

impl Default for LearningTaskParameters {
    fn default() -> Self {
        LearningTaskParameters {
            objective: Objective::default(),
        }
    }
}

impl LearningTaskParameters {
    pub(crate) fn as_string_pairs(&self) -> Vec<(String, String)> {
        let mut v = vec![("objective".to_owned(), self.objective.to_string())];

        if let Objective::MultiSoftmax(num_class) = self.objective {
            v.push(("num_class".to_owned(), num_class.to_string()));
        }
        v
    }
}
