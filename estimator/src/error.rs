//! Errors of the estimator.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// An input is out of its domain. Nothing was computed.
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    /// The expected single-sample miss probability is one (or more), so no finite number
    /// of samples reaches the target confidence.
    #[error("no finite number of samples reaches the target confidence (log expected miss:{log_expected_miss})")]
    NoFiniteSolution { log_expected_miss: f64 },
    /// NaN or infinity slipped through the clamping. Should not happen.
    #[error("numeric degeneracy in {stage}: {value}")]
    NumericDegeneracy { stage: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, EstimateError>;

impl EstimateError {
    pub fn invalid<T: std::fmt::Display>(name: &'static str, value: T, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
    pub fn is_no_finite_solution(&self) -> bool {
        matches!(self, Self::NoFiniteSolution { .. })
    }
}

pub(crate) fn require_positive(name: &'static str, value: u64) -> Result<u64> {
    match value {
        0 => Err(EstimateError::invalid(name, value, "should be positive")),
        _ => Ok(value),
    }
}

pub(crate) fn require_positive_f64(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && 0f64 < value {
        Ok(value)
    } else {
        Err(EstimateError::invalid(name, value, "should be a positive finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn display() {
        let err = EstimateError::invalid("sample_size", 0, "should be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter sample_size=0: should be positive"
        );
        assert!(err.is_invalid_parameter());
        let err = EstimateError::NoFiniteSolution {
            log_expected_miss: 0f64,
        };
        assert!(err.to_string().starts_with("no finite number of samples"));
        assert!(err.is_no_finite_solution());
    }
    #[test]
    fn positivity() {
        assert!(require_positive("x", 0).is_err());
        assert_eq!(require_positive("x", 3), Ok(3));
        assert!(require_positive_f64("x", 0f64).is_err());
        assert!(require_positive_f64("x", -1f64).is_err());
        assert!(require_positive_f64("x", f64::NAN).is_err());
        assert!(require_positive_f64("x", f64::INFINITY).is_err());
        assert_eq!(require_positive_f64("x", 0.5), Ok(0.5));
    }
}
