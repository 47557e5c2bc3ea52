//! # Daylight Errors
//!
//! Two kinds of failure, both recoverable:
//! - **Out of domain**: known before any iteration (latitude band, year band, NaN input)
//! - **Did not converge**: the hour-angle iteration ran out of steps, typically
//!   because the sun never reaches the requested altitude that day
//!
//! The classifier folds both into [`crate::DaylightState::Unknown`]; they stay
//! distinct here so diagnostics can tell them apart.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DaylightError {
    /// |latitude| beyond the band the solar series is trusted for
    #[error("latitude {latitude}° is outside the supported ±60° band")]
    LatitudeOutOfRange { latitude: f64 },

    /// Calendar year outside 2000–2100
    #[error("year {year} is outside the supported 2000-2100 range")]
    YearOutOfRange { year: i32 },

    /// NaN or infinite coordinate/altitude
    #[error("non-finite input")]
    NonFiniteInput,

    /// Iteration cap exhausted without the estimate settling
    #[error("no convergence after {iterations} iterations")]
    DidNotConverge { iterations: u32 },
}

impl DaylightError {
    /// True when the input was rejected up front, false for solver failure.
    pub fn is_out_of_domain(&self) -> bool {
        !matches!(self, DaylightError::DidNotConverge { .. })
    }
}
