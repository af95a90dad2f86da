//! Seeded synthetic regression and multiclass classification problems.
//!
//! The recipes follow the usual `make_regression` / `make_classification` construction: a
//! sparse linear model over standard-normal features for regression, and Gaussian clusters
//! placed on the vertices of a hypercube for classification. Values depend only on the seed,
//! but are not bit-identical to any other implementation of these recipes.
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use super::{DatasetSplit, FeatureMatrix};
use crate::error::{BenchError, BenchResult};

/// Rows generated for each synthetic dataset, before the split.
pub const SAMPLES: usize = 81_250;

/// Held-out fraction of the synthetic datasets.
const TEST_FRACTION: f64 = 0.2;

/// Smallest feature count the classification recipe accepts
/// (informative + redundant + repeated columns).
pub const CLASSIFICATION_MIN_FEATURES: usize =
    CLASSIFICATION.informative + CLASSIFICATION.redundant + CLASSIFICATION.repeated;

/// Shape of a `make_classification` problem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassificationRecipe {
    pub informative: usize,
    pub redundant: usize,
    pub repeated: usize,
    pub classes: usize,
    pub clusters_per_class: usize,
    pub class_sep: f64,
    pub flip_y: f64,
}

/// The recipe behind `SyntheticCl`.
pub const CLASSIFICATION: ClassificationRecipe = ClassificationRecipe {
    informative: 5,
    redundant: 5,
    repeated: 1,
    classes: 5,
    clusters_per_class: 2,
    class_sep: 1.0,
    flip_y: 0.01,
};

/// Regression problem with `nfeatures` features, split 80/20.
pub fn synthetic_regression(nfeatures: usize, seed: u64) -> BenchResult<DatasetSplit> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (x, y) = make_regression(SAMPLES, nfeatures, 10, 100.0, 1.0, &mut rng)?;
    let x = FeatureMatrix::dense(x, SAMPLES, nfeatures)?;
    DatasetSplit::from_rows(&x, &y, TEST_FRACTION, None, seed)
}

/// Five-class problem with `nfeatures` features, split 80/20.
pub fn synthetic_classification(nfeatures: usize, seed: u64) -> BenchResult<DatasetSplit> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (x, y) = make_classification(SAMPLES, nfeatures, &CLASSIFICATION, &mut rng)?;
    let x = FeatureMatrix::dense(x, SAMPLES, nfeatures)?;
    DatasetSplit::from_rows(&x, &y, TEST_FRACTION, None, seed)
}

/// Linear regression targets over standard-normal features.
///
/// Only the first `informative` features (before shuffling) carry weight, drawn from
/// `100 * U(0, 1)`. Targets get `bias` added and Gaussian noise of deviation `noise`. Rows
/// and feature columns are shuffled afterwards. Returns row-major features and targets.
pub fn make_regression<R: Rng>(
    samples: usize,
    features: usize,
    informative: usize,
    bias: f64,
    noise: f64,
    rng: &mut R,
) -> BenchResult<(Vec<f32>, Vec<f32>)> {
    if samples == 0 || features == 0 {
        return Err(BenchError::InvalidConfig(
            "synthetic regression needs at least one sample and one feature".into(),
        ));
    }
    let informative = informative.min(features);

    let mut x: Vec<f32> = (0..samples * features)
        .map(|_| rng.sample::<f64, _>(StandardNormal) as f32)
        .collect();
    let coef: Vec<f64> = (0..informative).map(|_| 100.0 * rng.gen::<f64>()).collect();

    let mut y: Vec<f32> = x
        .chunks_exact(features)
        .map(|row| {
            let dot: f64 = row.iter().zip(&coef).map(|(&v, &w)| v as f64 * w).sum();
            (dot + bias) as f32
        })
        .collect();
    if noise > 0.0 {
        for target in y.iter_mut() {
            *target += (noise * rng.sample::<f64, _>(StandardNormal)) as f32;
        }
    }

    shuffle_rows(&mut x, features, &mut y, rng);
    shuffle_columns(&mut x, features, rng);
    Ok((x, y))
}

/// Multiclass problem built from Gaussian clusters on hypercube vertices.
///
/// Column layout before shuffling: informative features, redundant linear combinations of
/// them, repeated copies, then standard-normal noise. A `flip_y` fraction of labels is
/// replaced at random. Returns row-major features and class labels.
pub fn make_classification<R: Rng>(
    samples: usize,
    features: usize,
    recipe: &ClassificationRecipe,
    rng: &mut R,
) -> BenchResult<(Vec<f32>, Vec<f32>)> {
    let used = recipe.informative + recipe.redundant + recipe.repeated;
    if features < used {
        return Err(BenchError::InvalidConfig(format!(
            "classification needs at least {} features, got {}",
            used, features
        )));
    }
    let clusters = recipe.classes * recipe.clusters_per_class;
    if recipe.informative == 0 || recipe.informative > 30 || (1usize << recipe.informative) < clusters {
        return Err(BenchError::InvalidConfig(format!(
            "{} informative features cannot separate {} clusters",
            recipe.informative, clusters
        )));
    }
    if samples < clusters {
        return Err(BenchError::InvalidConfig(format!(
            "{} samples cannot fill {} clusters",
            samples, clusters
        )));
    }

    let n_inf = recipe.informative;
    let mut x = vec![0.0f32; samples * features];
    let mut y = vec![0.0f32; samples];

    // cluster sizes differ by at most one
    let mut per_cluster = vec![samples / clusters; clusters];
    for size in per_cluster.iter_mut().take(samples % clusters) {
        *size += 1;
    }

    let centroids = hypercube(clusters, n_inf, rng);
    for row in x.chunks_exact_mut(features) {
        for v in row[..n_inf].iter_mut() {
            *v = rng.sample::<f64, _>(StandardNormal) as f32;
        }
    }

    let mut start = 0;
    let mut scratch = vec![0.0f64; n_inf];
    for (k, (centroid, &size)) in centroids.iter().zip(&per_cluster).enumerate() {
        let mix = uniform_matrix(n_inf, n_inf, rng);
        for r in start..start + size {
            let row = &mut x[r * features..r * features + n_inf];
            for (j, out) in scratch.iter_mut().enumerate() {
                *out = (0..n_inf).map(|i| row[i] as f64 * mix[i * n_inf + j]).sum();
            }
            for (j, v) in row.iter_mut().enumerate() {
                let offset = if centroid[j] { recipe.class_sep } else { -recipe.class_sep };
                *v = (scratch[j] + offset) as f32;
            }
            y[r] = (k % recipe.classes) as f32;
        }
        start += size;
    }

    if recipe.redundant > 0 {
        let combine = uniform_matrix(n_inf, recipe.redundant, rng);
        for row in x.chunks_exact_mut(features) {
            for j in 0..recipe.redundant {
                let v: f64 = (0..n_inf).map(|i| row[i] as f64 * combine[i * recipe.redundant + j]).sum();
                row[n_inf + j] = v as f32;
            }
        }
    }

    if recipe.repeated > 0 {
        let n = n_inf + recipe.redundant;
        let sources: Vec<usize> = (0..recipe.repeated)
            .map(|_| ((n - 1) as f64 * rng.gen::<f64>() + 0.5) as usize)
            .collect();
        for row in x.chunks_exact_mut(features) {
            for (j, &src) in sources.iter().enumerate() {
                row[n + j] = row[src];
            }
        }
    }

    if features > used {
        for row in x.chunks_exact_mut(features) {
            for v in row[used..].iter_mut() {
                *v = rng.sample::<f64, _>(StandardNormal) as f32;
            }
        }
    }

    if recipe.flip_y > 0.0 {
        let flip: Vec<bool> = (0..samples).map(|_| rng.gen::<f64>() < recipe.flip_y).collect();
        for (label, &flipped) in y.iter_mut().zip(&flip) {
            if flipped {
                *label = rng.gen_range(0..recipe.classes) as f32;
            }
        }
    }

    shuffle_rows(&mut x, features, &mut y, rng);
    shuffle_columns(&mut x, features, rng);
    Ok((x, y))
}

/// `samples` distinct vertices of the `dimensions`-cube, as bit patterns (most significant first).
fn hypercube<R: Rng>(samples: usize, dimensions: usize, rng: &mut R) -> Vec<Vec<bool>> {
    index::sample(rng, 1 << dimensions, samples)
        .into_iter()
        .map(|vertex| (0..dimensions).rev().map(|bit| (vertex >> bit) & 1 == 1).collect())
        .collect()
}

/// Row-major `rows x cols` matrix with entries drawn from `U(-1, 1)`.
fn uniform_matrix<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Vec<f64> {
    (0..rows * cols).map(|_| 2.0 * rng.gen::<f64>() - 1.0).collect()
}

/// Shuffle rows of `x` and the matching entries of `y` in place.
fn shuffle_rows<R: Rng>(x: &mut [f32], cols: usize, y: &mut [f32], rng: &mut R) {
    for i in (1..y.len()).rev() {
        let j = rng.gen_range(0..=i);
        if i == j {
            continue;
        }
        let (head, tail) = x.split_at_mut(i * cols);
        head[j * cols..(j + 1) * cols].swap_with_slice(&mut tail[..cols]);
        y.swap(i, j);
    }
}

/// Apply one random column permutation to every row of `x`.
fn shuffle_columns<R: Rng>(x: &mut [f32], cols: usize, rng: &mut R) {
    let mut order: Vec<usize> = (0..cols).collect();
    order.shuffle(rng);
    let mut scratch = vec![0.0f32; cols];
    for row in x.chunks_exact_mut(cols) {
        for (dst, &src) in scratch.iter_mut().zip(&order) {
            *dst = row[src];
        }
        row.copy_from_slice(&scratch);
    }
}
