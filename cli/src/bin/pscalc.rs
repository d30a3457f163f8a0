use definitions::*;
use estimator::Plan;
use pscalc_cli::pipeline::{to_io_error, ProfileConfig};
use pscalc_cli::report::{self, OutputFormat};
use std::io::Write;
#[macro_use]
extern crate log;

fn main() -> std::io::Result<()> {
    let matches = pscalc_cli::pscalc_commands::pscalc_parser().get_matches();
    if let Some(("profile", sub_m)) = matches.subcommand() {
        if sub_m.get_flag("template") {
            let template = ProfileConfig::default().to_toml()?;
            return writeln!(std::io::stdout(), "{template}");
        }
        let path: &String = sub_m.get_one("profile").unwrap();
        let config = ProfileConfig::from_path(path)?;
        init_logger(config.verbose);
        return pscalc_cli::pipeline::run_profile(&config);
    }
    if let Some((_, sub_m)) = matches.subcommand() {
        init_logger(sub_m.get_count("verbose") as usize);
    }
    match matches.subcommand() {
        Some(("required", sub_m)) => required(sub_m),
        Some(("capture", sub_m)) => capture(sub_m),
        Some(("curve", sub_m)) => curve(sub_m),
        Some(("report", sub_m)) => full_report(sub_m),
        _ => unreachable!(),
    }
}

fn init_logger(verbose: usize) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn scenario(matches: &clap::ArgMatches) -> (Scenario, SolverConfig) {
    let lambda: f64 = *matches.get_one("lambda").unwrap();
    let sample_size: u64 = *matches.get_one("sample_size").unwrap();
    let species: u64 = *matches.get_one("species").unwrap();
    let mean_copies: u64 = *matches.get_one("mean_copies").unwrap();
    let confidence: f64 = *matches.get_one("confidence").unwrap();
    let population = PopulationParameters::new(species, mean_copies);
    let sampling = SamplingParameters::new(sample_size, lambda);
    let scenario = Scenario::new(population, sampling);
    (scenario, SolverConfig::with_confidence(confidence))
}

fn required(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tRequired");
    let (scenario, config) = scenario(matches);
    let estimate = scenario.estimate(&config).map_err(to_io_error)?;
    info!("ESTIMATE\t{scenario}\t{estimate}");
    let lambda = scenario.sampling.target_copy_number;
    report::write_required(std::io::stdout().lock(), estimate.samples, lambda, &config)
}

fn capture(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tCapture");
    let (scenario, _) = scenario(matches);
    let copy_number: f64 = *matches.get_one("copy_number").unwrap();
    let samples: u64 = *matches.get_one("samples").unwrap();
    let probability = estimator::capture_probability(
        copy_number,
        scenario.sampling.sample_size,
        samples,
        scenario.population.total_species,
        scenario.population.mean_copies,
    )
    .map_err(to_io_error)?;
    writeln!(std::io::stdout(), "{probability:.4}")
}

fn curve(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tCurve");
    let (scenario, config) = scenario(matches);
    let samples = match matches.get_one::<u64>("samples") {
        Some(&samples) => samples,
        None => scenario.estimate(&config).map_err(to_io_error)?.samples,
    };
    let curve = scenario.curve(samples, &config).map_err(to_io_error)?;
    let format: OutputFormat = matches
        .get_one::<String>("format")
        .unwrap()
        .parse()
        .map_err(|why: String| std::io::Error::new(std::io::ErrorKind::InvalidInput, why))?;
    let mut wtr = report::open_output(matches.get_one::<String>("output"))?;
    report::write_curve(&mut wtr, &curve, format)?;
    wtr.flush()
}

fn full_report(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tReport");
    let (scenario, config) = scenario(matches);
    let result = scenario.report(&config).map_err(to_io_error)?;
    let output = matches.get_one::<String>("output");
    if output.is_some() {
        report::write_summary(std::io::stdout().lock(), &result)?;
    }
    let mut wtr = report::open_output(output)?;
    report::write_json(&mut wtr, &result)?;
    wtr.flush()
}
