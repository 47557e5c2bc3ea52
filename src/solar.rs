//! Sun-event solver: low-precision solar position & altitude-crossing times
//!
//! Fixed-point iteration on the hour angle, after the short QBASIC sunrise
//! routine published on stargazing.net/kepler. Accuracy: about a minute for
//! sunrise/sunset between ±60° latitude, years 2000–2100.
//!
//! All angles are carried in radians. A time of day in radians maps to hours
//! as `rad × 180/π / 15`, so `π` is 12:00 UTC.

use crate::{DaylightError, RiseSet};
use core::f64::consts::{PI, TAU};
use tracing::{debug, trace};

/// Hard cap on hour-angle iterations per solve.
pub const MAX_ITERATIONS: u32 = 12;

/// Stop when successive estimates differ by less than this (≈0.4 s of time).
pub const CONVERGENCE_RAD: f64 = 0.001;

/// Days from JD 0 to the 2000-01-01 12:00 epoch in the integer day count below.
const EPOCH_OFFSET_DAYS: f64 = 730_531.5;

/// Sun position terms for one instant, everything in radians.
#[derive(Debug, Clone, Copy)]
pub struct SolarPosition {
    /// Mean longitude L.
    pub mean_longitude: f64,
    /// Mean anomaly G.
    pub mean_anomaly: f64,
    /// Ecliptic longitude λ = L + equation of centre.
    pub ecliptic_longitude: f64,
    /// Equation of time E (apparent minus mean, as an angle).
    pub equation_of_time: f64,
    /// Obliquity of the ecliptic.
    pub obliquity: f64,
    /// Declination δ.
    pub declination: f64,
}

/// Day number relative to 2000-01-01 12:00 UT, evaluated at 00:00 UT of the date.
///
/// Integer Gregorian day count (no century correction), so 2000-01-01 gives
/// `-0.5`. Exact for every date in the supported 2000–2100 band up to
/// 2100-02-28.
pub fn day_number(year: i32, month: u32, day: u32) -> f64 {
    let (y, m, d) = (year as i64, month as i64, day as i64);
    let whole = 367 * y - 7 * (y + (m + 9) / 12) / 4 + 275 * m / 9 + d;
    whole as f64 - EPOCH_OFFSET_DAYS
}

/// Fold any angle into `[0, 2π)`.
///
/// Floors toward −∞ so negative inputs land in range rather than 2π short.
pub fn normalize_angle(x: f64) -> f64 {
    let r = x.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly TAU
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Shortest distance between two angles on the circle, in `[0, π]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = normalize_angle(a - b);
    d.min(TAU - d)
}

/// Sun position at `t` Julian centuries from J2000.
pub fn sun_position(t: f64) -> SolarPosition {
    let mean_longitude = normalize_angle(4.894_950_420_143_3 + 628.331_969_753_199 * t);
    let mean_anomaly = normalize_angle(6.240_040_8 + 628.301_950_1 * t);

    let centre = 0.033_423 * mean_anomaly.sin() + 0.000_349_07 * (2.0 * mean_anomaly).sin();
    let ecliptic_longitude = mean_longitude + centre;

    let equation_of_time = -centre + 0.043_039_8 * (2.0 * ecliptic_longitude).sin()
        - 0.000_925_02 * (4.0 * ecliptic_longitude).sin();

    let obliquity = 0.409_093 - 0.000_226_9 * t;
    let declination = (obliquity.sin() * ecliptic_longitude.sin()).asin();

    SolarPosition {
        mean_longitude,
        mean_anomaly,
        ecliptic_longitude,
        equation_of_time,
        obliquity,
        declination,
    }
}

/// Solve for the UTC time (decimal hours, `[0, 24)`) at which the sun crosses
/// `altitude_deg` on the given date.
///
/// `lon` is degrees east positive. The estimate is seeded at π (12:00 UTC)
/// and refined until two successive values agree, as angles, to [`CONVERGENCE_RAD`].
/// When the sun never reaches the altitude the hour-angle correction is
/// clamped (0 or π), which usually still converges to a time near local
/// midnight or noon; callers keep to ±60° latitude to stay meaningful.
///
/// # Errors
/// - [`DaylightError::NonFiniteInput`] for NaN/infinite coordinates or altitude
/// - [`DaylightError::DidNotConverge`] when [`MAX_ITERATIONS`] pass without settling
///
/// # Example
/// ```
/// use daylight_lib::{solve_event_time, RiseSet};
///
/// // Equinox sunrise on the Greenwich meridian is close to 06:00 UTC
/// let h = solve_event_time(40.0, 0.0, RiseSet::Rising, -0.833, 2024, 3, 20).unwrap();
/// assert!((5.0..7.0).contains(&h));
/// ```
pub fn solve_event_time(
    lat: f64,
    lon: f64,
    direction: RiseSet,
    altitude_deg: f64,
    year: i32,
    month: u32,
    day: u32,
) -> Result<f64, DaylightError> {
    solve_with_limit(lat, lon, direction, altitude_deg, (year, month, day), MAX_ITERATIONS)
}

fn solve_with_limit(
    lat: f64,
    lon: f64,
    direction: RiseSet,
    altitude_deg: f64,
    (year, month, day): (i32, u32, u32),
    max_iterations: u32,
) -> Result<f64, DaylightError> {
    if !(lat.is_finite() && lon.is_finite() && altitude_deg.is_finite()) {
        return Err(DaylightError::NonFiniteInput);
    }

    let day0 = day_number(year, month, day);
    let sin_alt = altitude_deg.to_radians().sin();
    let (sin_phi, cos_phi) = lat.to_radians().sin_cos();
    let g = lon.to_radians();

    let mut ut_old = PI;
    let mut ut_new = 0.0;
    // ut_new without the fold, so the series time never jumps a day at 00:00 UTC
    let mut ut_unfolded = 0.0;
    let mut iterations = 0;

    while angular_distance(ut_old, ut_new) > CONVERGENCE_RAD {
        if iterations >= max_iterations {
            debug!(
                lat,
                lon,
                ?direction,
                altitude_deg,
                iterations,
                "sun event did not converge"
            );
            return Err(DaylightError::DidNotConverge { iterations });
        }
        iterations += 1;

        let t = (day0 + ut_unfolded / TAU) / 36_525.0;
        let sun = sun_position(t);

        // Greenwich hour angle of the previous estimate
        let gha = ut_old - PI + sun.equation_of_time;

        let cos_c =
            (sin_alt - sin_phi * sun.declination.sin()) / (cos_phi * sun.declination.cos());
        let correction = if cos_c > 1.0 {
            0.0
        } else if cos_c < -1.0 {
            PI
        } else {
            cos_c.acos()
        };

        let next = normalize_angle(ut_old - (gha + g + direction.sign() * correction));
        if !next.is_finite() {
            return Err(DaylightError::DidNotConverge { iterations });
        }
        trace!(iterations, ut = next, "hour-angle step");

        ut_unfolded = if iterations == 1 {
            next
        } else {
            ut_unfolded + normalize_angle(next - ut_new + PI) - PI
        };
        ut_old = ut_new;
        ut_new = next;
    }

    Ok(ut_new.to_degrees() / 15.0)
}
