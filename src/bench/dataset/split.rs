use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{BenchError, BenchResult};

/// Deterministic train/test split of `rows` row indices.
///
/// The indices are shuffled with `seed`; the test set takes the first
/// `ceil(test_fraction * rows)` of them and the training set the next `train_size` (all the
/// remaining ones when `None`). Returns `(train, test)`.
pub fn train_test_split(
    rows: usize,
    test_fraction: f64,
    train_size: Option<usize>,
    seed: u64,
) -> BenchResult<(Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(BenchError::InvalidConfig(format!(
            "test fraction must be in [0, 1), got {}",
            test_fraction
        )));
    }
    let test_len = (test_fraction * rows as f64).ceil() as usize;
    let train_len = train_size.unwrap_or(rows - test_len);
    if test_len + train_len > rows {
        return Err(BenchError::InvalidConfig(format!(
            "cannot take {} training and {} test rows from {} rows",
            train_len, test_len, rows
        )));
    }

    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let test = idx[..test_len].to_vec();
    let train = idx[test_len..test_len + train_len].to_vec();
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_rounds_up() {
        let (train, test) = train_test_split(101, 0.2, None, 0).unwrap();
        assert_eq!(test.len(), 21);
        assert_eq!(train.len(), 80);

        let (train, test) = train_test_split(81250, 0.2, None, 0).unwrap();
        assert_eq!(test.len(), 16250);
        assert_eq!(train.len(), 65000);
    }

    #[test]
    fn explicit_train_size() {
        let (train, test) = train_test_split(1000, 0.2, Some(300), 7).unwrap();
        assert_eq!(train.len(), 300);
        assert_eq!(test.len(), 200);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 500);
    }

    #[test]
    fn oversized_train_is_rejected() {
        assert!(train_test_split(100, 0.2, Some(81), 0).is_err());
        assert!(train_test_split(100, 1.0, None, 0).is_err());
    }

    #[test]
    fn same_seed_same_split() {
        let a = train_test_split(500, 0.2, None, 42).unwrap();
        let b = train_test_split(500, 0.2, None, 42).unwrap();
        let c = train_test_split(500, 0.2, None, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
