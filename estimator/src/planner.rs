//! The calculation as a whole: solve the number of samples, then draw the detection curve.
use crate::curve::detection_curve;
use crate::error::Result;
use crate::sample_count::estimate;
use definitions::{DetectionCurve, Estimate, Report, Scenario, SolverConfig};

pub trait Plan {
    /// Solve the number of samples.
    fn estimate(&self, config: &SolverConfig) -> Result<Estimate>;
    /// Detection curve when `samples` samples are drawn.
    fn curve(&self, samples: u64, config: &SolverConfig) -> Result<DetectionCurve>;
    fn report(&self, config: &SolverConfig) -> Result<Report>;
}

impl Plan for Scenario {
    fn estimate(&self, config: &SolverConfig) -> Result<Estimate> {
        debug!("START\tEstimate\t{self}");
        estimate(&self.population, &self.sampling, config)
    }
    fn curve(&self, samples: u64, config: &SolverConfig) -> Result<DetectionCurve> {
        debug!("START\tCurve\t{self}\t{samples}");
        let mut curve = detection_curve(
            self.sampling.target_copy_number,
            self.sampling.sample_size,
            samples,
            self.population.total_species,
            self.population.mean_copies,
        )?;
        curve.threshold_percent = config.threshold_percent();
        Ok(curve)
    }
    fn report(&self, config: &SolverConfig) -> Result<Report> {
        let estimate = self.estimate(config)?;
        let curve = self.curve(estimate.samples, config)?;
        info!("REPORT\t{self}\t{estimate}");
        Ok(Report {
            scenario: *self,
            config: *config,
            estimate,
            curve,
        })
    }
}
