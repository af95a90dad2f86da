//! Scoring predictions against the held-out labels.
use super::task::{MetricKind, Task};
use crate::error::{BenchError, BenchResult};

/// Root mean squared error.
pub fn rmse(labels: &[f32], preds: &[f32]) -> BenchResult<f64> {
    check_lengths(labels.len(), preds.len())?;
    let sum: f64 = labels
        .iter()
        .zip(preds)
        .map(|(&y, &p)| {
            let d = y as f64 - p as f64;
            d * d
        })
        .sum();
    Ok((sum / labels.len() as f64).sqrt())
}

/// Fraction of rows whose (post-processed) prediction equals the label.
///
/// * binary classification thresholds probabilities at 0.5;
/// * multiclass takes the per-row arg-max when there are `k` scores per row, otherwise the
///   predictions are already class indices;
/// * regression compares values as they are.
pub fn accuracy(task: Task, labels: &[f32], preds: &[f32]) -> BenchResult<f64> {
    let n = labels.len();
    if n == 0 {
        return Err(BenchError::InvalidConfig("cannot score an empty test set".into()));
    }

    let classes: Vec<f32> = match task {
        Task::Classification => {
            check_lengths(n, preds.len())?;
            preds.iter().map(|&p| if p > 0.5 { 1.0 } else { 0.0 }).collect()
        }
        Task::MulticlassClassification
            if !preds.is_empty() && preds.len() != n && preds.len() % n == 0 =>
        {
            preds.chunks_exact(preds.len() / n).map(arg_max).collect()
        }
        _ => {
            check_lengths(n, preds.len())?;
            preds.to_vec()
        }
    };

    let correct = labels.iter().zip(&classes).filter(|(y, p)| y == p).count();
    Ok(correct as f64 / n as f64)
}

/// Evaluate `metric` for a run of `task`.
pub fn evaluate(task: Task, metric: MetricKind, labels: &[f32], preds: &[f32]) -> BenchResult<f64> {
    match metric {
        MetricKind::Rmse => rmse(labels, preds),
        MetricKind::Accuracy => accuracy(task, labels, preds),
    }
}

/// [`evaluate`] with the metric given by name (`RMSE` or `Accuracy`).
pub fn evaluate_by_name(task: Task, metric: &str, labels: &[f32], preds: &[f32]) -> BenchResult<f64> {
    evaluate(task, metric.parse()?, labels, preds)
}

fn arg_max(scores: &[f32]) -> f32 {
    let mut best = 0;
    for (i, s) in scores.iter().enumerate() {
        if *s > scores[best] {
            best = i;
        }
    }
    best as f32
}

fn check_lengths(labels: usize, preds: usize) -> BenchResult<()> {
    if labels == 0 {
        return Err(BenchError::InvalidConfig("cannot score an empty test set".into()));
    }
    if labels != preds {
        return Err(BenchError::InvalidConfig(format!(
            "{} predictions for {} labels",
            preds, labels
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rmse_of_known_errors() {
        let v = rmse(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 6.0]).unwrap();
        assert_relative_eq!(v, 1.0);
        assert_relative_eq!(rmse(&[5.0, 5.0], &[5.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn binary_accuracy_thresholds_at_half() {
        let acc = accuracy(Task::Classification, &[1.0, 0.0, 1.0, 0.0], &[0.9, 0.4, 0.5, 0.51]).unwrap();
        // 0.5 is not above the threshold, 0.51 is
        assert_relative_eq!(acc, 0.5);
    }

    #[test]
    fn multiclass_accuracy_from_indices() {
        let acc = accuracy(Task::MulticlassClassification, &[0.0, 1.0, 2.0, 2.0], &[0.0, 1.0, 1.0, 2.0]).unwrap();
        assert_relative_eq!(acc, 0.75);
    }

    #[test]
    fn multiclass_accuracy_from_scores() {
        let scores = [
            0.7, 0.2, 0.1, //
            0.1, 0.1, 0.8, //
            0.3, 0.4, 0.3,
        ];
        let acc = accuracy(Task::MulticlassClassification, &[0.0, 2.0, 0.0], &scores).unwrap();
        assert_relative_eq!(acc, 2.0 / 3.0);
    }

    #[test]
    fn length_mismatch_and_empty_input() {
        assert!(rmse(&[1.0, 2.0], &[1.0]).is_err());
        assert!(rmse(&[], &[]).is_err());
        assert!(accuracy(Task::Classification, &[1.0], &[0.1, 0.2]).is_err());
        assert!(accuracy(Task::MulticlassClassification, &[], &[]).is_err());
    }

    #[test]
    fn multiclass_without_predictions_is_an_error() {
        let res = accuracy(Task::MulticlassClassification, &[1.0, 2.0], &[]);
        assert!(matches!(res, Err(BenchError::InvalidConfig(_))));
    }

    #[test]
    fn metric_by_name() {
        let v = evaluate_by_name(Task::Regression, "RMSE", &[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert_relative_eq!(v, (12.5f64).sqrt());
        let err = evaluate_by_name(Task::Regression, "Foo", &[0.0], &[0.0]).unwrap_err();
        assert!(matches!(err, BenchError::UnknownMetric(m) if m == "Foo"));
    }
}
