//! Threshold Validation Errors

use thiserror::Error;

/// Inconsistencies found in a threshold table.
///
/// These are advisory: a table containing them is still applied as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    /// A bound is NaN or infinite
    #[error("{sensor}: {bound} bound is not a finite number")]
    NonFiniteBound { sensor: String, bound: &'static str },

    /// Warning band is inverted
    #[error("{sensor}: min {min} is greater than max {max}")]
    InvertedRange { sensor: String, min: f64, max: f64 },

    /// Lower critical bound sits inside the normal band
    #[error("{sensor}: critical_min {critical_min} is above min {min}")]
    CriticalMinAboveMin {
        sensor: String,
        critical_min: f64,
        min: f64,
    },

    /// Upper critical bound sits inside the normal band
    #[error("{sensor}: critical_max {critical_max} is below max {max}")]
    CriticalMaxBelowMax {
        sensor: String,
        critical_max: f64,
        max: f64,
    },
}
