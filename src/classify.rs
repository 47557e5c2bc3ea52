//! # Daylight Classification
//!
//! Brackets an instant into one of the [`DaylightState`]s by solving at most
//! two sun events for the instant's UTC date:
//!
//! - **Morning (LMT ≤ 12h)**: sunrise first; if the instant is before sunrise,
//!   the start of nautical twilight decides between twilight and night
//! - **Afternoon (LMT > 12h)**: sunset first, then end of nautical twilight
//!
//! A ±9 minute window around sunrise/sunset wins over the coarser
//! before/after split, so an ETA a few minutes either side of the event is
//! labelled "Sunrise"/"Sunset" rather than "Daytime"/"MoTwilight".

use crate::solar::solve_event_time;
use crate::{DaylightError, DaylightState, RiseSet, SunEventKind};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Latitude band (inclusive) the solar series is trusted for.
pub const MAX_ABS_LATITUDE: f64 = 60.0;
/// First supported calendar year.
pub const MIN_YEAR: i32 = 2000;
/// Last supported calendar year.
pub const MAX_YEAR: i32 = 2100;

/// Upper-limb sunrise/sunset altitude including standard refraction.
pub const HORIZON_ALTITUDE_DEG: f64 = -0.833;
/// Nautical twilight altitude.
pub const TWILIGHT_ALTITUDE_DEG: f64 = -12.0;
/// Half-width of the "at the event" window, hours (9 minutes).
pub const EVENT_WINDOW_HOURS: f64 = 0.15;

/// Convert decimal UTC hours to local mean time at `lon` (degrees east).
///
/// Wraps once: below zero adds 24, above 24 subtracts 24. Exactly 24.0 is
/// left alone and therefore counts as afternoon.
///
/// # Example
/// ```
/// use daylight_lib::classify::local_mean_time;
///
/// assert_eq!(local_mean_time(23.0, 150.0), 9.0);
/// assert_eq!(local_mean_time(1.0, -90.0), 19.0);
/// ```
pub fn local_mean_time(ut_hours: f64, lon: f64) -> f64 {
    let t = ut_hours + lon / 15.0;
    if t < 0.0 {
        t + 24.0
    } else if t > 24.0 {
        t - 24.0
    } else {
        t
    }
}

/// Reject input the solver cannot be trusted with.
pub fn check_domain(lat: f64, lon: f64, year: i32) -> Result<(), DaylightError> {
    if !(lat.is_finite() && lon.is_finite()) {
        return Err(DaylightError::NonFiniteInput);
    }
    if lat.abs() > MAX_ABS_LATITUDE {
        return Err(DaylightError::LatitudeOutOfRange { latitude: lat });
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DaylightError::YearOutOfRange { year });
    }
    Ok(())
}

/// Thresholds used to classify an instant.
///
/// `Default` is the standard set (−0.833°, −12°, 9 minutes). Everything is an
/// explicit field: the classifier never consults process-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaylightClassifier {
    /// Sun altitude counted as sunrise/sunset, degrees
    pub horizon_altitude_deg: f64,
    /// Sun altitude where twilight begins/ends, degrees
    pub twilight_altitude_deg: f64,
    /// Half-width of the sunrise/sunset window, hours
    pub event_window_hours: f64,
}

impl Default for DaylightClassifier {
    fn default() -> Self {
        DaylightClassifier {
            horizon_altitude_deg: HORIZON_ALTITUDE_DEG,
            twilight_altitude_deg: TWILIGHT_ALTITUDE_DEG,
            event_window_hours: EVENT_WINDOW_HOURS,
        }
    }
}

impl DaylightClassifier {
    /// Altitude solved for a given event kind.
    pub fn altitude_for(&self, kind: SunEventKind) -> f64 {
        match kind {
            SunEventKind::Sunrise | SunEventKind::Sunset => self.horizon_altitude_deg,
            SunEventKind::MorningTwilight | SunEventKind::EveningTwilight => {
                self.twilight_altitude_deg
            }
        }
    }

    /// Classify `at` for an observer at `lat`/`lon` (degrees, east positive).
    ///
    /// Every failure collapses to [`DaylightState::Unknown`].
    pub fn classify(&self, lat: f64, lon: f64, at: DateTime<Utc>) -> DaylightState {
        self.try_classify(lat, lon, at).unwrap_or_else(|err| {
            debug!(lat, lon, %at, %err, "daylight state unknown");
            DaylightState::Unknown
        })
    }

    /// Like [`classify`](Self::classify) but keeps the reason for `Unknown`.
    pub fn try_classify(
        &self,
        lat: f64,
        lon: f64,
        at: DateTime<Utc>,
    ) -> Result<DaylightState, DaylightError> {
        check_domain(lat, lon, at.year())?;

        let ut = at.hour() as f64 + at.minute() as f64 / 60.0 + at.second() as f64 / 3600.0;
        let lt = local_mean_time(ut, lon);
        let solve = |kind: SunEventKind| self.event_lmt(lat, lon, kind, at);

        if lt <= 12.0 {
            let sunrise = solve(SunEventKind::Sunrise)?;
            if (lt - sunrise).abs() < self.event_window_hours {
                return Ok(DaylightState::Sunrise);
            }
            if lt > sunrise {
                return Ok(DaylightState::Daytime);
            }
            let twilight = solve(SunEventKind::MorningTwilight)?;
            if lt > twilight {
                Ok(DaylightState::MorningTwilight)
            } else {
                Ok(DaylightState::Night)
            }
        } else {
            let sunset = solve(SunEventKind::Sunset)?;
            if (lt - sunset).abs() < self.event_window_hours {
                return Ok(DaylightState::Sunset);
            }
            if lt < sunset {
                return Ok(DaylightState::Daytime);
            }
            let twilight = solve(SunEventKind::EveningTwilight)?;
            if lt < twilight {
                Ok(DaylightState::EveningTwilight)
            } else {
                Ok(DaylightState::Night)
            }
        }
    }

    fn event_lmt(
        &self,
        lat: f64,
        lon: f64,
        kind: SunEventKind,
        at: DateTime<Utc>,
    ) -> Result<f64, DaylightError> {
        let direction: RiseSet = kind.direction();
        let ut = solve_event_time(
            lat,
            lon,
            direction,
            self.altitude_for(kind),
            at.year(),
            at.month(),
            at.day(),
        )?;
        Ok(local_mean_time(ut, lon))
    }
}

/// Classify with the default thresholds.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use daylight_lib::{classify, DaylightState};
///
/// let noon = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
/// assert_eq!(classify(45.0, 0.0, noon), DaylightState::Daytime);
///
/// // Beyond the supported latitude band
/// assert_eq!(classify(65.0, 0.0, noon), DaylightState::Unknown);
/// ```
pub fn classify(lat: f64, lon: f64, at: DateTime<Utc>) -> DaylightState {
    DaylightClassifier::default().classify(lat, lon, at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    /// Instant `hours` after 00:00 UTC of the given date
    fn at_hours(y: i32, m: u32, d: u32, hours: f64) -> DateTime<Utc> {
        at(y, m, d, 0, 0) + Duration::seconds((hours * 3600.0).round() as i64)
    }

    #[test]
    fn test_local_mean_time_wraps_once() {
        assert_abs_diff_eq!(local_mean_time(12.0, 0.0), 12.0);
        assert_abs_diff_eq!(local_mean_time(23.0, 150.0), 9.0);
        assert_abs_diff_eq!(local_mean_time(1.0, -90.0), 19.0);
        assert_abs_diff_eq!(local_mean_time(6.0, 45.0), 9.0);
        assert_abs_diff_eq!(local_mean_time(24.0, 0.0), 24.0);
        assert_abs_diff_eq!(local_mean_time(0.0, -180.0), 12.0);
    }

    #[test]
    fn test_check_domain_bounds() {
        assert!(check_domain(60.0, 0.0, 2024).is_ok());
        assert!(check_domain(-60.0, 0.0, 2024).is_ok());
        assert_eq!(
            check_domain(60.0001, 0.0, 2024),
            Err(DaylightError::LatitudeOutOfRange { latitude: 60.0001 })
        );
        assert!(check_domain(45.0, 0.0, 2000).is_ok());
        assert!(check_domain(45.0, 0.0, 2100).is_ok());
        assert_eq!(
            check_domain(45.0, 0.0, 1999),
            Err(DaylightError::YearOutOfRange { year: 1999 })
        );
        assert_eq!(
            check_domain(45.0, f64::NAN, 2024),
            Err(DaylightError::NonFiniteInput)
        );
    }

    #[test]
    fn test_solstice_scenario_at_45_north() {
        let rise = solve_event_time(45.0, 0.0, RiseSet::Rising, HORIZON_ALTITUDE_DEG, 2024, 6, 21)
            .unwrap();
        let rise_lmt = local_mean_time(rise, 0.0);
        assert!((4.0..=6.0).contains(&rise_lmt), "sunrise LMT {rise_lmt}");

        assert_eq!(classify(45.0, 0.0, at_hours(2024, 6, 21, rise)), DaylightState::Sunrise);
        assert_eq!(
            classify(45.0, 0.0, at_hours(2024, 6, 21, rise + 0.1)),
            DaylightState::Sunrise
        );
        assert_eq!(classify(45.0, 0.0, at(2024, 6, 21, 12, 0)), DaylightState::Daytime);
        assert_eq!(classify(45.0, 0.0, at(2024, 6, 21, 0, 0)), DaylightState::Night);
    }

    #[test]
    fn test_afternoon_states() {
        // 45°N midsummer: sunset ≈ 19:50, nautical dusk ≈ 21:17 LMT
        assert_eq!(classify(45.0, 0.0, at(2024, 6, 21, 15, 0)), DaylightState::Daytime);
        assert_eq!(
            classify(45.0, 0.0, at(2024, 6, 21, 20, 30)),
            DaylightState::EveningTwilight
        );
        assert_eq!(classify(45.0, 0.0, at(2024, 6, 21, 23, 0)), DaylightState::Night);

        let set = solve_event_time(45.0, 0.0, RiseSet::Setting, HORIZON_ALTITUDE_DEG, 2024, 6, 21)
            .unwrap();
        assert_eq!(classify(45.0, 0.0, at_hours(2024, 6, 21, set)), DaylightState::Sunset);
    }

    #[test]
    fn test_morning_twilight() {
        // Nautical dawn ≈ 02:46, sunrise ≈ 04:13 LMT
        assert_eq!(
            classify(45.0, 0.0, at(2024, 6, 21, 3, 30)),
            DaylightState::MorningTwilight
        );
    }

    #[test]
    fn test_monotonic_around_sunrise() {
        for (lat, lon, m, d) in [(45.0, 0.0, 6, 21), (-33.9, 18.4, 1, 10), (10.0, -75.0, 9, 23)] {
            let rise =
                solve_event_time(lat, lon, RiseSet::Rising, HORIZON_ALTITUDE_DEG, 2024, m, d)
                    .unwrap();
            let before = classify(lat, lon, at_hours(2024, m, d, rise - 0.2));
            let after = classify(lat, lon, at_hours(2024, m, d, rise + 0.2));
            assert!(
                matches!(before, DaylightState::Night | DaylightState::MorningTwilight),
                "{lat},{lon}: before sunrise got {before:?}"
            );
            assert!(
                matches!(after, DaylightState::Sunrise | DaylightState::Daytime),
                "{lat},{lon}: after sunrise got {after:?}"
            );
        }
    }

    #[test]
    fn test_equinox_symmetry() {
        for lon in [-74.0, 0.0, 120.0] {
            let rise =
                solve_event_time(40.0, lon, RiseSet::Rising, HORIZON_ALTITUDE_DEG, 2024, 3, 20)
                    .unwrap();
            let set =
                solve_event_time(40.0, lon, RiseSet::Setting, HORIZON_ALTITUDE_DEG, 2024, 3, 20)
                    .unwrap();
            let rise_lmt = local_mean_time(rise, lon);
            let set_lmt = local_mean_time(set, lon);
            assert!((rise_lmt - 6.0).abs() < 1.0, "lon {lon}: sunrise {rise_lmt}");
            assert!((set_lmt - 18.0).abs() < 1.0, "lon {lon}: sunset {set_lmt}");
        }
    }

    #[test]
    fn test_out_of_domain_latitude() {
        for h in [0, 6, 12, 18, 23] {
            assert_eq!(classify(65.0, 0.0, at(2024, 6, 21, h, 0)), DaylightState::Unknown);
            assert_eq!(classify(-65.0, 10.0, at(2024, 12, 21, h, 0)), DaylightState::Unknown);
        }
        assert_eq!(
            DaylightClassifier::default().try_classify(65.0, 0.0, at(2024, 6, 21, 12, 0)),
            Err(DaylightError::LatitudeOutOfRange { latitude: 65.0 })
        );
    }

    #[test]
    fn test_latitude_bound_is_inclusive() {
        let noon = at(2024, 3, 20, 12, 0);
        assert_eq!(classify(60.0001, 0.0, noon), DaylightState::Unknown);
        assert_eq!(classify(-60.0001, 0.0, noon), DaylightState::Unknown);
        assert_eq!(classify(60.0, 0.0, noon), DaylightState::Daytime);
        assert_eq!(classify(-60.0, 0.0, noon), DaylightState::Daytime);
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(classify(45.0, 0.0, at(1999, 6, 21, 12, 0)), DaylightState::Unknown);
        assert_eq!(classify(45.0, 0.0, at(2101, 6, 21, 12, 0)), DaylightState::Unknown);
        assert_eq!(classify(45.0, 0.0, at(2000, 6, 21, 12, 0)), DaylightState::Daytime);
        assert_eq!(classify(45.0, 0.0, at(2100, 6, 21, 12, 0)), DaylightState::Daytime);
    }

    #[test]
    fn test_valid_domain_always_known() {
        let classifier = DaylightClassifier::default();
        for lat in [-60.0, -45.0, -20.0, 0.0, 20.0, 45.0] {
            for lon in [-170.0, -108.75, -60.0, 0.0, 60.0, 170.0] {
                for (m, d) in [(1, 1), (1, 15), (4, 10), (7, 4), (10, 31)] {
                    for h in (0..24).step_by(3) {
                        let result = classifier.try_classify(lat, lon, at(2024, m, d, h, 0));
                        assert!(
                            matches!(result, Ok(state) if state.is_known()),
                            "{lat},{lon} {m}/{d} {h}h: {result:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_afternoon_with_sunset_near_utc_midnight() {
        // 21:00 UTC is 13:45 LMT at 108.75°W; sunset is close to 00:00 UTC
        let instant = at(2024, 1, 1, 21, 0);
        assert_eq!(
            DaylightClassifier::default().try_classify(40.0, -108.75, instant),
            Ok(DaylightState::Daytime)
        );
        assert_eq!(classify(40.0, -108.0, instant), DaylightState::Daytime);
    }

    #[test]
    fn test_window_is_configurable() {
        let rise = solve_event_time(45.0, 0.0, RiseSet::Rising, HORIZON_ALTITUDE_DEG, 2024, 6, 21)
            .unwrap();
        let instant = at_hours(2024, 6, 21, rise + 0.3);
        assert_eq!(classify(45.0, 0.0, instant), DaylightState::Daytime);

        let wide = DaylightClassifier {
            event_window_hours: 0.5,
            ..DaylightClassifier::default()
        };
        assert_eq!(wide.classify(45.0, 0.0, instant), DaylightState::Sunrise);
    }

    #[test]
    fn test_concurrent_calls_agree() {
        let instant = at(2024, 6, 21, 20, 30);
        let expected = classify(45.0, 0.0, instant);
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(move || classify(45.0, 0.0, instant)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
