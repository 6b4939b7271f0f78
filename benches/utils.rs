#![allow(dead_code)]
use rand::distributions::{Bernoulli, Uniform};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Column-major features, binary target and binary protected attribute.
///
/// The first column is shifted by `s` so the protected attribute leaks into
/// the features, the last column is binary.
pub(crate) fn create_data(n_samples: usize, n_features: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);

    let feature_distribution = Uniform::new(0.0, 1.0);
    let noise_distribution = Uniform::new(-0.5, 0.5);
    let weight_distribution = Uniform::new(-1.0, 1.0);
    let group_distribution = Bernoulli::new(0.5).unwrap();

    let s: Vec<f64> = (0..n_samples)
        .map(|_| if rng.sample(group_distribution) { 1.0 } else { 0.0 })
        .collect();
    let weights: Vec<f64> = (0..n_features).map(|_| rng.sample(weight_distribution)).collect();

    let mut feature_space: Vec<Vec<f64>> = vec![Vec::with_capacity(n_samples); n_features];
    let mut linear = vec![0.0; n_samples];
    for (j, column) in feature_space.iter_mut().enumerate() {
        for (i, s_) in s.iter().enumerate() {
            let v = if j + 1 == n_features {
                let p = 0.3 + 0.4 * s_;
                if rng.gen_bool(p) { 1.0 } else { 0.0 }
            } else if j == 0 {
                rng.sample(feature_distribution) + 0.5 * s_
            } else {
                rng.sample(feature_distribution)
            };
            column.push(v);
            linear[i] += weights[j] * v;
        }
    }

    let mean = linear.iter().sum::<f64>() / n_samples as f64;
    let y: Vec<f64> = linear
        .iter()
        .zip(&s)
        .map(|(l, s_)| {
            let noisy = l + rng.sample(noise_distribution) - 0.2 * s_;
            if noisy > mean { 1.0 } else { 0.0 }
        })
        .collect();

    (feature_space.concat(), y, s)
}
