//! Estimator -- how many samples are needed to catch every species above a copy number.
//!
//! The copy number of a species is modeled as a Poisson random variable, and each sample is
//! a fixed number of independent draws from the pooled copies.
//! [sample_count] solves the number of samples, [capture] evaluates the detection probability
//! of a single copy number, and [curve] lines the latter up along copy numbers.
pub mod capture;
pub mod curve;
pub mod error;
pub mod misc;
pub mod planner;
pub mod sample_count;
#[macro_use]
extern crate log;

pub use capture::capture_probability;
pub use curve::detection_curve;
pub use error::{EstimateError, Result};
pub use planner::Plan;
pub use sample_count::samples_required;
