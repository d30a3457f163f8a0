//! Definitions -- A tiny interface for the sample-size calculation.
//! The library and the command line tool exchange the values below, and every one of them
//! can be written out as a JSON object. The largest one is [Report](Report), which is the whole
//! result of one calculation.

use serde::{Deserialize, Serialize};

/// Population of species, each present with a random number of copies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PopulationParameters {
    /// Total number of species in the population. Should be positive.
    pub total_species: u64,
    /// Mean copies per species. Should be positive.
    pub mean_copies: u64,
}

impl PopulationParameters {
    pub fn new(total_species: u64, mean_copies: u64) -> Self {
        Self {
            total_species,
            mean_copies,
        }
    }
    /// Total copies in the population, i.e., `total_species * mean_copies`.
    /// It is the denominator of the per-draw fraction.
    pub fn total_copies(&self) -> f64 {
        self.total_species as f64 * self.mean_copies as f64
    }
}

impl std::default::Default for PopulationParameters {
    fn default() -> Self {
        Self {
            total_species: 350_000,
            mean_copies: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingParameters {
    /// Draws (phage) per sample.
    pub sample_size: u64,
    /// The minimum copy number of interest (lambda).
    pub target_copy_number: f64,
}

impl SamplingParameters {
    pub fn new(sample_size: u64, target_copy_number: f64) -> Self {
        Self {
            sample_size,
            target_copy_number,
        }
    }
}

impl std::default::Default for SamplingParameters {
    fn default() -> Self {
        Self {
            sample_size: 8_000,
            target_copy_number: 30f64,
        }
    }
}

/// The four scalars a user gives to the calculator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Scenario {
    #[serde(default)]
    pub population: PopulationParameters,
    #[serde(default)]
    pub sampling: SamplingParameters,
}

impl Scenario {
    pub fn new(population: PopulationParameters, sampling: SamplingParameters) -> Self {
        Self {
            population,
            sampling,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let PopulationParameters {
            total_species,
            mean_copies,
        } = self.population;
        let SamplingParameters {
            sample_size,
            target_copy_number,
        } = self.sampling;
        write!(
            f,
            "lambda:{target_copy_number}\tS:{sample_size}\tN:{total_species}\tM:{mean_copies}"
        )
    }
}

/// Knobs of the sample-count solver.
/// The default values are the ones the calculator has always used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Probability that a species at the target copy number is captured. In (0,1).
    pub confidence: f64,
    /// Hard upper limit of the copy numbers summed over.
    pub truncation_cap: u64,
    /// Copy numbers up to `truncation_factor * lambda` are summed over.
    pub truncation_factor: f64,
    /// Floor of a single-sample miss probability, so that its log stays finite.
    pub min_miss_probability: f64,
}

impl SolverConfig {
    pub fn new(confidence: f64, truncation_cap: u64, truncation_factor: f64) -> Self {
        Self {
            confidence,
            truncation_cap,
            truncation_factor,
            ..Default::default()
        }
    }
    pub fn with_confidence(confidence: f64) -> Self {
        Self {
            confidence,
            ..Default::default()
        }
    }
    /// The largest copy number k in the truncated Poisson sum: `min(cap, floor(factor * lambda))`.
    pub fn truncation_bound(&self, target_copy_number: f64) -> u64 {
        let scaled = (self.truncation_factor * target_copy_number).floor();
        if scaled <= 0f64 || !scaled.is_finite() {
            return 0;
        }
        (scaled as u64).min(self.truncation_cap)
    }
    /// Target confidence in percent. The reference line of a detection curve.
    pub fn threshold_percent(&self) -> f64 {
        self.confidence * 100f64
    }
}

impl std::default::Default for SolverConfig {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            truncation_cap: 1_000,
            truncation_factor: 5f64,
            min_miss_probability: 1e-308,
        }
    }
}

/// The outcome of the sample-count solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Estimate {
    /// Minimum number of samples. Always positive.
    pub samples: u64,
    /// log of the expected single-sample miss probability. Always negative.
    pub log_expected_miss: f64,
    /// The largest copy number in the truncated sum.
    pub truncation_bound: u64,
    pub confidence: f64,
}

impl std::fmt::Display for Estimate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "n:{}\tlogmiss:{:.6}\tK:{}\tconf:{}",
            self.samples, self.log_expected_miss, self.truncation_bound, self.confidence
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurvePoint {
    pub copy_number: u64,
    /// Detection probability in percent, [0,100].
    pub detection_percent: f64,
}

/// Detection probability along copy numbers, ordered by the copy number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionCurve {
    pub points: Vec<CurvePoint>,
    /// The reference line drawn over the curve, in percent.
    pub threshold_percent: f64,
}

impl DetectionCurve {
    pub fn new(points: Vec<CurvePoint>, threshold_percent: f64) -> Self {
        Self {
            points,
            threshold_percent,
        }
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, CurvePoint> {
        self.points.iter()
    }
    /// The smallest copy number whose detection probability reaches the threshold.
    pub fn first_above_threshold(&self) -> Option<u64> {
        self.points
            .iter()
            .find(|p| self.threshold_percent <= p.detection_percent)
            .map(|p| p.copy_number)
    }
}

/// Everything computed by one calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub scenario: Scenario,
    pub config: SolverConfig,
    pub estimate: Estimate,
    pub curve: DetectionCurve,
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults() {
        let scenario = Scenario::default();
        assert_eq!(scenario.population.total_species, 350_000);
        assert_eq!(scenario.population.mean_copies, 30);
        assert_eq!(scenario.sampling.sample_size, 8_000);
        assert_eq!(scenario.sampling.target_copy_number, 30f64);
        assert_eq!(scenario.population.total_copies(), 10_500_000f64);
        let config = SolverConfig::default();
        assert_eq!(config.confidence, 0.95);
        assert!((config.threshold_percent() - 95f64).abs() < 1e-10);
    }
    #[test]
    fn truncation_bound() {
        let config = SolverConfig::default();
        assert_eq!(config.truncation_bound(30f64), 150);
        assert_eq!(config.truncation_bound(1000f64), 1000);
        assert_eq!(config.truncation_bound(2.5), 12);
        assert_eq!(config.truncation_bound(0.1), 0);
        let config = SolverConfig::new(0.95, 5000, 50f64);
        assert_eq!(config.truncation_bound(30f64), 1500);
    }
    #[test]
    fn first_above_threshold() {
        let points = vec![
            CurvePoint {
                copy_number: 1,
                detection_percent: 10f64,
            },
            CurvePoint {
                copy_number: 2,
                detection_percent: 95f64,
            },
            CurvePoint {
                copy_number: 3,
                detection_percent: 99f64,
            },
        ];
        let curve = DetectionCurve::new(points, 95f64);
        assert_eq!(curve.first_above_threshold(), Some(2));
        let curve = DetectionCurve::new(curve.points, 99.5);
        assert_eq!(curve.first_above_threshold(), None);
    }
    #[test]
    fn partial_config_from_json() {
        let config: SolverConfig = serde_json::from_str(r#"{"confidence":0.99}"#).unwrap();
        assert_eq!(config.confidence, 0.99);
        assert_eq!(config.truncation_cap, 1_000);
        assert_eq!(config.truncation_factor, 5f64);
    }
}
