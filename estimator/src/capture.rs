//! Detection probability of a species with a given copy number.
//!
//! A draw hits the species with probability `f = k / (N * M)`, where N is the number of species
//! and M is the mean copies per species. A sample of S draws misses it with probability
//! `(1-f)^S`, and n independent samples miss it with probability `(1-f)^(S*n)`.
//! The power is computed as `exp(S * n * ln_1p(-f))`, as `f` is usually tiny and `S*n` large.
use crate::error::{require_positive, EstimateError, Result};
use definitions::PopulationParameters;

/// The probability that a single draw hits a species with `copy_number` copies.
pub fn presence_fraction(copy_number: f64, population: &PopulationParameters) -> f64 {
    copy_number / population.total_copies()
}

/// log of the probability that `draws` independent draws all miss a species with
/// presence fraction `fraction`. Negative infinity if `1 <= fraction`, i.e., the species can
/// not be missed.
pub fn ln_miss(fraction: f64, draws: f64) -> f64 {
    if 1f64 <= fraction {
        std::f64::NEG_INFINITY
    } else {
        draws * (-fraction).ln_1p()
    }
}

/// Detection probability in percent for the given presence fraction and total draws.
pub fn detection_percent(fraction: f64, draws: f64) -> f64 {
    let detected = -ln_miss(fraction, draws).exp_m1();
    (detected * 100f64).clamp(0f64, 100f64)
}

/// Probability, in percent, that a species with `copy_number` copies appears in at least one of
/// `num_samples` samples, each consisting of `sample_size` draws.
/// ```
/// let p = estimator::capture_probability(30f64, 8000, 132, 350_000, 30).unwrap();
/// assert!(95f64 <= p && p <= 100f64);
/// ```
pub fn capture_probability(
    copy_number: f64,
    sample_size: u64,
    num_samples: u64,
    total_species: u64,
    mean_copies: u64,
) -> Result<f64> {
    if copy_number.is_nan() || copy_number < 0f64 {
        return Err(EstimateError::invalid(
            "copy_number",
            copy_number,
            "should be non-negative",
        ));
    }
    let sample_size = require_positive("sample_size", sample_size)?;
    let num_samples = require_positive("num_samples", num_samples)?;
    let total_species = require_positive("total_species", total_species)?;
    let mean_copies = require_positive("mean_copies", mean_copies)?;
    let population = PopulationParameters::new(total_species, mean_copies);
    let fraction = presence_fraction(copy_number, &population);
    let draws = sample_size as f64 * num_samples as f64;
    Ok(detection_percent(fraction, draws))
}
