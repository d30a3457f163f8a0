//! Profile -- the whole calculation configured by a TOML file.
//!
//! A profile fixes the scenario, the solver and where to write the result,
//! so that a calculation can be rerun as-is.
use crate::report::{open_output, write_curve, write_json, write_summary, OutputFormat};
use definitions::{Scenario, SolverConfig};
use estimator::Plan;
use log::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The configuration of a calculation.
/// Missing entries take the default values, i.e., lambda=30, 8000 phage per sample,
/// 350000 species, 30 copies per species, and 95% confidence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct ProfileConfig {
    pub verbose: usize,
    /// The format of the output. JSON writes the whole report, TSV writes the curve only.
    pub format: OutputFormat,
    /// The path to the output file. Standard output if it is not set.
    pub output: Option<PathBuf>,
    pub scenario: Scenario,
    pub solver: SolverConfig,
}

impl ProfileConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        debug!("Opening {:?}", path.as_ref());
        let file = std::fs::read_to_string(path)?;
        Self::from_toml(&file)
    }
    pub fn from_toml(file: &str) -> std::io::Result<Self> {
        toml::from_str(file)
            .map_err(|why| std::io::Error::new(std::io::ErrorKind::InvalidData, why))
    }
    pub fn to_toml(&self) -> std::io::Result<String> {
        toml::to_string(self)
            .map_err(|why| std::io::Error::new(std::io::ErrorKind::InvalidData, why))
    }
}

pub fn run_profile(config: &ProfileConfig) -> std::io::Result<()> {
    let ProfileConfig {
        format,
        output,
        scenario,
        solver,
        ..
    } = config;
    debug!("START\tProfile\t{scenario}");
    let report = scenario.report(solver).map_err(to_io_error)?;
    if output.is_some() {
        write_summary(std::io::stdout().lock(), &report)?;
    }
    let mut wtr = open_output(output.as_ref())?;
    match format {
        OutputFormat::Json => write_json(&mut wtr, &report)?,
        OutputFormat::Tsv => write_curve(&mut wtr, &report.curve, *format)?,
    }
    use std::io::Write;
    wtr.flush()
}

/// Errors of the estimator are bad inputs from the user's point of view.
pub fn to_io_error(why: estimator::EstimateError) -> std::io::Error {
    error!("{why}");
    std::io::Error::new(std::io::ErrorKind::InvalidInput, why)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn partial_profile() {
        let profile = r#"
verbose = 1
format = "json"
output = "out/report.json"

[scenario.population]
total_species = 1000

[scenario.sampling]
target_copy_number = 12.5

[solver]
confidence = 0.99
"#;
        let config = ProfileConfig::from_toml(profile).unwrap();
        assert_eq!(config.verbose, 1);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.output, Some(PathBuf::from("out/report.json")));
        assert_eq!(config.scenario.population.total_species, 1000);
        assert_eq!(config.scenario.population.mean_copies, 30);
        assert_eq!(config.scenario.sampling.sample_size, 8000);
        assert_eq!(config.scenario.sampling.target_copy_number, 12.5);
        assert_eq!(config.solver.confidence, 0.99);
        assert_eq!(config.solver.truncation_cap, 1000);
    }
    #[test]
    fn empty_profile_is_default() {
        let config = ProfileConfig::from_toml("").unwrap();
        assert_eq!(config, ProfileConfig::default());
        assert_eq!(config.format, OutputFormat::Tsv);
        assert!(config.output.is_none());
    }
    #[test]
    fn template_round_trip() {
        let config = ProfileConfig::default();
        let template = config.to_toml().unwrap();
        assert!(template.contains("[scenario.sampling]"));
        assert_eq!(ProfileConfig::from_toml(&template).unwrap(), config);
    }
    #[test]
    fn broken_profile() {
        assert!(ProfileConfig::from_toml("format = \"csv\"").is_err());
        assert!(ProfileConfig::from_toml("[scenario\n").is_err());
    }
    #[test]
    fn degenerate_profile() {
        let profile = r#"
[scenario.population]
total_species = 1
mean_copies = 1
[scenario.sampling]
target_copy_number = 1000.0
"#;
        let config = ProfileConfig::from_toml(profile).unwrap();
        let err = run_profile(&config).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
