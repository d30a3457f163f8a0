//! Writers of the results: a text summary, TSV and JSON.
use definitions::{DetectionCurve, Report, SolverConfig};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Tsv,
    Json,
}

impl std::default::Default for OutputFormat {
    fn default() -> Self {
        Self::Tsv
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            _ => Err(format!("format {s} is not supported")),
        }
    }
}

/// 1234567 -> "1,234,567".
pub fn with_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut formatted = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if 0 < i && (len - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }
    formatted
}

/// 95.0 -> "95", 99.9 -> "99.9". At most two decimals.
pub fn format_percent(x: f64) -> String {
    let formatted = format!("{x:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

pub fn write_required<W: Write>(
    mut wtr: W,
    samples: u64,
    target_copy_number: f64,
    config: &SolverConfig,
) -> std::io::Result<()> {
    writeln!(wtr, "{} samples needed", with_thousands(samples))?;
    let percent = format_percent(config.threshold_percent());
    writeln!(
        wtr,
        "This will give you a {percent}% probability of capturing species with {target_copy_number} or more copies."
    )
}

pub fn write_summary<W: Write>(mut wtr: W, report: &Report) -> std::io::Result<()> {
    writeln!(wtr, "Results")?;
    let lambda = report.scenario.sampling.target_copy_number;
    write_required(&mut wtr, report.estimate.samples, lambda, &report.config)?;
    if let Some(k) = report.curve.first_above_threshold() {
        let percent = format_percent(report.curve.threshold_percent);
        writeln!(wtr, "Copy numbers from {k} on are detected with >= {percent}%.")?;
    }
    writeln!(wtr)?;
    write_formula(wtr, &report.config)
}

pub fn write_formula<W: Write>(mut wtr: W, config: &SolverConfig) -> std::io::Result<()> {
    let miss = format_percent(100f64 - config.threshold_percent());
    writeln!(wtr, "Formula Details")?;
    writeln!(
        wtr,
        "n = ceil( ln({miss}%) / ln( sum_k lambda^k e^-lambda / k! * (1 - k/(N*M))^S ) )"
    )?;
    writeln!(wtr, "P(detection in n samples) = 1 - (1 - k/(N*M))^(S*n)")?;
    writeln!(wtr, "Where:")?;
    writeln!(wtr, "- lambda: Minimum copy number per species")?;
    writeln!(wtr, "- N: Total number of species")?;
    writeln!(wtr, "- M: Mean copies per species")?;
    writeln!(wtr, "- S: Sample size (phage per sample)")?;
    writeln!(wtr, "- n: Number of samples needed")?;
    writeln!(wtr, "- k: Copy number (for probability curve)")?;
    let bound = config.truncation_factor;
    writeln!(
        wtr,
        "The sum runs over k <= min({}, {bound}*lambda).",
        config.truncation_cap
    )
}

pub fn write_curve_tsv<W: Write>(mut wtr: W, curve: &DetectionCurve) -> std::io::Result<()> {
    writeln!(wtr, "copy_number\tdetection_percent")?;
    for point in curve.iter() {
        writeln!(wtr, "{}\t{:.4}", point.copy_number, point.detection_percent)?;
    }
    Ok(())
}

pub fn write_json<W: Write, T: Serialize>(mut wtr: W, value: &T) -> std::io::Result<()> {
    serde_json::ser::to_writer_pretty(&mut wtr, value)?;
    writeln!(wtr)
}

pub fn write_curve<W: Write>(
    wtr: W,
    curve: &DetectionCurve,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Tsv => write_curve_tsv(wtr, curve),
        OutputFormat::Json => write_json(wtr, curve),
    }
}

/// Open `path` for writing, or the standard output when it is `None`.
pub fn open_output<P: AsRef<std::path::Path>>(
    path: Option<P>,
) -> std::io::Result<std::io::BufWriter<Box<dyn Write>>> {
    let wtr: Box<dyn Write> = match path {
        Some(path) => {
            log::debug!("Writing {:?}", path.as_ref());
            Box::new(std::fs::File::create(path)?)
        }
        None => Box::new(std::io::stdout()),
    };
    Ok(std::io::BufWriter::new(wtr))
}
