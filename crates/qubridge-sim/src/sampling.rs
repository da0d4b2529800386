//! Seeded sampling from a basis-state distribution.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draw `n_shots` indices from `probs`.
///
/// `probs` need not be exactly normalised; draws are scaled by its total.
pub(crate) fn sample(probs: &[f64], n_shots: usize, seed: u64) -> Vec<usize> {
    let cumulative: Vec<f64> = probs
        .iter()
        .scan(0.0, |acc, &p| {
            *acc += p.max(0.0);
            Some(*acc)
        })
        .collect();
    let Some(&total) = cumulative.last() else {
        return vec![];
    };
    let last = cumulative.len() - 1;

    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_shots)
        .map(|_| {
            let r: f64 = rng.r#gen::<f64>() * total;
            cumulative.partition_point(|&c| c <= r).min(last)
        })
        .collect()
}
