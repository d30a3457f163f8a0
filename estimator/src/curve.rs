//! Detection probability along copy numbers, for plotting.
use crate::capture::capture_probability;
use crate::error::{require_positive_f64, Result};
use definitions::{CurvePoint, DetectionCurve};

/// The reference line of a curve built without a solver configuration.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 95f64;

/// Detection probability of every copy number k in `1..=floor(2 * target_copy_number)`
/// when `total_samples` samples are drawn.
pub fn detection_curve(
    target_copy_number: f64,
    sample_size: u64,
    total_samples: u64,
    total_species: u64,
    mean_copies: u64,
) -> Result<DetectionCurve> {
    require_positive_f64("target_copy_number", target_copy_number)?;
    let max_copy_num = (2f64 * target_copy_number).floor() as u64;
    let points = (1..=max_copy_num)
        .map(|copy_number| -> Result<CurvePoint> {
            let detection_percent = capture_probability(
                copy_number as f64,
                sample_size,
                total_samples,
                total_species,
                mean_copies,
            )?;
            Ok(CurvePoint {
                copy_number,
                detection_percent,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("CURVE\t{target_copy_number}\t{total_samples}\t{}", points.len());
    Ok(DetectionCurve::new(points, DEFAULT_THRESHOLD_PERCENT))
}
