//! Utility functions for weighted random choice and seeding

use rand::{Rng, SeedableRng, distr::StandardUniform, rngs::StdRng};

/// Seeded generator when a seed is given, otherwise one seeded from the
/// thread-local generator.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Normalize weights to probabilities that sum to 1.0.
///
/// # Returns
///
/// - `Some(Vec<f64>)` containing normalized probabilities if total weight is positive
/// - `None` if total weight is zero, negative or not finite
///
/// # Examples
///
/// ```
/// use eight_puzzle::utils::normalize_weights;
///
/// let normalized = normalize_weights(vec![1.0, 2.0, 1.0]).unwrap();
/// assert_eq!(normalized, vec![0.25, 0.5, 0.25]);
///
/// assert_eq!(normalize_weights(vec![0.0, 0.0]), None);
/// ```
pub fn normalize_weights<I>(weights: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = f64>,
{
    let weights: Vec<f64> = weights.into_iter().collect();
    let sum: f64 = weights.iter().sum();
    if weights.is_empty() || !sum.is_finite() || sum <= 0.0 {
        return None;
    }
    Some(weights.iter().map(|&w| w / sum).collect())
}

/// Sample an index with probability proportional to its weight.
///
/// Falls back to a uniform choice when the weights cannot be normalized.
/// Returns `None` only for an empty slice.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let Some(probabilities) = normalize_weights(weights.iter().copied()) else {
        return Some(rng.random_range(0..weights.len()));
    };
    let ticket: f64 = rng.sample(StandardUniform);
    let mut cumulative = 0.0;
    for (idx, p) in probabilities.iter().enumerate() {
        cumulative += p;
        if ticket <= cumulative {
            return Some(idx);
        }
    }
    Some(probabilities.len() - 1)
}
