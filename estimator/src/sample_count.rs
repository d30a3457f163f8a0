//! Solve the number of samples needed to capture a species at the target copy number.
//!
//! The copy number k of a species is Poisson(lambda). A sample misses it with probability
//! `(1 - k/(N*M))^S`, so the expected single-sample miss is
//! `E = sum_k P(k) (1 - k/(N*M))^S`, and n samples miss it with probability `E^n`.
//! The minimum n with `E^n <= 1 - confidence` is `ceil(ln(1 - confidence) / ln E)`.
//!
//! The sum runs over k in `0..=min(cap, floor(factor * lambda))` and the truncated tail is
//! dropped without renormalization. Every term is summed in the log domain.
use crate::capture::{ln_miss, presence_fraction};
use crate::error::{require_positive, require_positive_f64, EstimateError, Result};
use crate::misc::{ln_poisson, logsumexp_str};
use definitions::{Estimate, PopulationParameters, SamplingParameters, SolverConfig};

/// Poisson mass beyond the truncation bound larger than this is reported.
const TAIL_WARN: f64 = 1e-6;

/// The minimum number of samples so that a species with `target_copy_number` copies is captured
/// at least once with probability `config.confidence`.
/// ```
/// use definitions::SolverConfig;
/// let n = estimator::samples_required(30f64, 8000, 350_000, 30, &SolverConfig::default());
/// assert_eq!(n.unwrap(), 132);
/// ```
pub fn samples_required(
    target_copy_number: f64,
    sample_size: u64,
    total_species: u64,
    mean_copies: u64,
    config: &SolverConfig,
) -> Result<u64> {
    let population = PopulationParameters::new(total_species, mean_copies);
    let sampling = SamplingParameters::new(sample_size, target_copy_number);
    estimate(&population, &sampling, config).map(|e| e.samples)
}

/// Same as [samples_required], but returns the intermediate values as well.
pub fn estimate(
    population: &PopulationParameters,
    sampling: &SamplingParameters,
    config: &SolverConfig,
) -> Result<Estimate> {
    validate(population, sampling, config)?;
    let lambda = sampling.target_copy_number;
    let bound = config.truncation_bound(lambda);
    let log_sum = log_expected_miss(lambda, sampling.sample_size, population, bound, config);
    trace!("SOLVE\tK\t{bound}\tLogSum\t{log_sum}");
    if log_sum.is_nan() {
        return Err(EstimateError::NumericDegeneracy {
            stage: "log expected miss",
            value: log_sum,
        });
    }
    // A species at the target abundance would own every copy in the population.
    let structural = population.total_copies() <= lambda;
    if structural || 0f64 <= log_sum {
        debug!("SOLVE\tNoSolution\t{lambda}\t{log_sum}\t{structural}");
        return Err(EstimateError::NoFiniteSolution {
            log_expected_miss: log_sum,
        });
    }
    let ratio = (1f64 - config.confidence).ln() / log_sum;
    if ratio.is_nan() {
        return Err(EstimateError::NumericDegeneracy {
            stage: "sample count",
            value: ratio,
        });
    }
    let samples = ratio.ceil();
    if !samples.is_finite() || (u64::MAX as f64) <= samples {
        return Err(EstimateError::NoFiniteSolution {
            log_expected_miss: log_sum,
        });
    }
    // ln E = -inf would give zero; one sample is always needed.
    let samples = (samples as u64).max(1);
    debug!("SOLVE\t{lambda}\t{}\t{bound}\t{log_sum}\t{samples}", sampling.sample_size);
    Ok(Estimate {
        samples,
        log_expected_miss: log_sum,
        truncation_bound: bound,
        confidence: config.confidence,
    })
}

/// log of the expected single-sample miss probability, summing k over `0..=bound`.
/// A k owning the whole population is never missed and contributes nothing.
/// Other miss probabilities are floored at `config.min_miss_probability`.
pub fn log_expected_miss(
    lambda: f64,
    sample_size: u64,
    population: &PopulationParameters,
    bound: u64,
    config: &SolverConfig,
) -> f64 {
    let ln_floor = config.min_miss_probability.ln();
    let draws = sample_size as f64;
    let terms = (0..=bound).filter_map(|k| {
        let fraction = presence_fraction(k as f64, population);
        if 1f64 <= fraction {
            return None;
        }
        let ln_miss = ln_miss(fraction, draws).max(ln_floor);
        Some(ln_poisson(k, lambda) + ln_miss)
    });
    logsumexp_str(terms)
}

fn validate(
    population: &PopulationParameters,
    sampling: &SamplingParameters,
    config: &SolverConfig,
) -> Result<()> {
    require_positive_f64("target_copy_number", sampling.target_copy_number)?;
    require_positive("sample_size", sampling.sample_size)?;
    require_positive("total_species", population.total_species)?;
    require_positive("mean_copies", population.mean_copies)?;
    if !(0f64 < config.confidence && config.confidence < 1f64) {
        return Err(EstimateError::invalid(
            "confidence",
            config.confidence,
            "should be in (0,1)",
        ));
    }
    require_positive_f64("truncation_factor", config.truncation_factor)?;
    let floor = config.min_miss_probability;
    if !(0f64 < floor && floor <= 1f64) {
        return Err(EstimateError::invalid(
            "min_miss_probability",
            floor,
            "should be in (0,1]",
        ));
    }
    let lambda = sampling.target_copy_number;
    let bound = config.truncation_bound(lambda);
    if (bound as f64) < lambda {
        warn!("SOLVE\tTruncation bound {bound} is below lambda {lambda}");
    } else {
        let tail = upper_tail_bound(bound, lambda);
        if TAIL_WARN < tail {
            warn!("SOLVE\tPoisson mass beyond {bound} may be {tail:.2e}");
        }
    }
    Ok(())
}

// Chernoff bound of P(X > bound) for X ~ Poisson(lambda) with lambda < bound + 1.
fn upper_tail_bound(bound: u64, lambda: f64) -> f64 {
    let x = bound as f64 + 1f64;
    if x <= lambda {
        return 1f64;
    }
    (x - lambda - x * (x / lambda).ln()).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    const N: u64 = 350_000;
    const M: u64 = 30;
    fn default_estimate(lambda: f64, sample_size: u64) -> Result<Estimate> {
        let population = PopulationParameters::new(N, M);
        let sampling = SamplingParameters::new(sample_size, lambda);
        estimate(&population, &sampling, &SolverConfig::default())
    }
    #[test]
    fn regression() {
        let result = default_estimate(30f64, 8000).unwrap();
        assert_eq!(result.samples, 132);
        assert_eq!(result.truncation_bound, 150);
        assert!((result.log_expected_miss + 0.022_848_471).abs() < 1e-8);
    }
    #[test]
    fn close_to_poisson_generating_function() {
        // (1-k/T)^S ~ (1-1/T)^(kS) for k << T, so E ~ exp(lambda * ((1-1/T)^S - 1)).
        let total = (N * M) as f64;
        for &(lambda, s) in &[(10f64, 8000u64), (30f64, 8000), (100f64, 2000)] {
            let c = (s as f64) * (-1f64 / total).ln_1p();
            let answer = lambda * c.exp_m1();
            let result = default_estimate(lambda, s).unwrap();
            let rel = (result.log_expected_miss - answer).abs() / answer.abs();
            assert!(rel < 1e-5, "{lambda}\t{s}\t{rel}");
        }
    }
    #[test]
    fn always_positive() {
        for &lambda in &[0.1, 0.5, 1f64, 7.5, 30f64, 250f64, 1000f64, 5000f64] {
            for &s in &[1u64, 10, 8000, 1_000_000] {
                match default_estimate(lambda, s) {
                    Ok(res) => assert!(1 <= res.samples, "{lambda}\t{s}"),
                    Err(why) => assert!(why.is_no_finite_solution(), "{why}"),
                }
            }
        }
    }
    #[test]
    fn huge_draws_need_one_sample() {
        // Every k >= 1 is all but certainly captured; only k = 0 remains.
        let result = default_estimate(30f64, 10_000_000_000).unwrap();
        assert_eq!(result.samples, 1);
        assert!(result.log_expected_miss < -29f64);
    }
    #[test]
    fn confidence_generalizes() {
        let population = PopulationParameters::new(N, M);
        let sampling = SamplingParameters::new(8000, 30f64);
        let mut prev = 0;
        for &conf in &[0.5, 0.8, 0.9, 0.95, 0.99, 0.999] {
            let config = SolverConfig::with_confidence(conf);
            let res = estimate(&population, &sampling, &config).unwrap();
            assert!(prev <= res.samples, "{conf}\t{prev}\t{}", res.samples);
            let answer = ((1f64 - conf).ln() / res.log_expected_miss).ceil() as u64;
            assert_eq!(res.samples, answer);
            prev = res.samples;
        }
    }
    #[test]
    fn degenerate() {
        let config = SolverConfig::default();
        let err = samples_required(1000f64, 8000, 1, 1, &config).unwrap_err();
        assert!(err.is_no_finite_solution(), "{err}");
        let err = samples_required(30f64, 8000, 3, 10, &config).unwrap_err();
        assert!(err.is_no_finite_solution(), "{err}");
    }
    #[test]
    fn invalid() {
        let config = SolverConfig::default();
        for lambda in vec![0f64, -1f64, f64::NAN, f64::INFINITY] {
            let err = samples_required(lambda, 8000, N, M, &config).unwrap_err();
            assert!(err.is_invalid_parameter(), "{err}");
        }
        assert!(samples_required(30f64, 0, N, M, &config).is_err());
        assert!(samples_required(30f64, 8000, 0, M, &config).is_err());
        assert!(samples_required(30f64, 8000, N, 0, &config).is_err());
        for conf in vec![0f64, 1f64, -0.5, 1.5, f64::NAN] {
            let config = SolverConfig::with_confidence(conf);
            let err = samples_required(30f64, 8000, N, M, &config).unwrap_err();
            assert!(err.is_invalid_parameter(), "{err}");
        }
        let config = SolverConfig {
            min_miss_probability: 0f64,
            ..Default::default()
        };
        assert!(samples_required(30f64, 8000, N, M, &config).is_err());
        let config = SolverConfig::new(0.95, 1000, 0f64);
        assert!(samples_required(30f64, 8000, N, M, &config).is_err());
    }
    #[test]
    fn floor_keeps_log_finite() {
        // The k=1 species holds half the population; (1/2)^100000 underflows.
        let population = PopulationParameters::new(1, 2);
        let config = SolverConfig::default();
        let log_sum = log_expected_miss(0.5, 100_000, &population, 1, &config);
        assert!(log_sum.is_finite());
        let floor = config.min_miss_probability.ln();
        let answer = crate::misc::logsumexp(&[ln_poisson(0, 0.5), ln_poisson(1, 0.5) + floor]);
        assert!((log_sum - answer).abs() < 1e-12);
    }
    #[test]
    fn tail_bound() {
        assert_eq!(upper_tail_bound(10, 30f64), 1f64);
        assert!(upper_tail_bound(150, 30f64) < 1e-40);
        assert!(upper_tail_bound(5, 3f64) < 1f64);
    }
}
