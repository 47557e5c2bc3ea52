//! # Day Events & Time References
//!
//! Helpers around the solver for callers that want actual instants rather
//! than a classification: the four crossings of a date as UTC timestamps,
//! the whole-second LMT offset of a position, and the short "UT"/"LMT"
//! timestamp rendering used in route timing columns.

use crate::classify::check_domain;
use crate::solar::solve_event_time;
use crate::{DaylightClassifier, DaylightError, SunEvent, SunEventKind};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Clock a timestamp is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeReference {
    #[default]
    Utc,
    /// Local mean time at the observer's longitude
    Lmt,
}

/// Offset of local mean time from UTC, truncated to whole seconds.
///
/// # Example
/// ```
/// use daylight_lib::events::lmt_offset;
///
/// assert_eq!(lmt_offset(15.0).num_seconds(), 3600);
/// assert_eq!(lmt_offset(-70.25).num_seconds(), -16860);
/// ```
pub fn lmt_offset(lon: f64) -> Duration {
    Duration::seconds((lon * 3600.0 / 15.0) as i64)
}

/// Instant `hours_utc` decimal hours after 00:00 UTC of `date`, rounded to the second.
pub fn event_datetime(date: NaiveDate, hours_utc: f64) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
    midnight + Duration::seconds((hours_utc * 3600.0).round() as i64)
}

/// Render `at` as ` MM/DD HH:MM UT` or ` MM/DD HH:MM LMT`.
pub fn format_instant(at: DateTime<Utc>, reference: TimeReference, lon: f64) -> String {
    match reference {
        TimeReference::Utc => format!("{} UT", at.format(" %m/%d %H:%M")),
        TimeReference::Lmt => {
            let local = at.naive_utc() + lmt_offset(lon);
            format!("{} LMT", local.format(" %m/%d %H:%M"))
        }
    }
}

/// Solved crossings of one UTC date, in fixed kind order (dawn, sunrise,
/// sunset, dusk).
///
/// Kind order is not clock order: far west of Greenwich the date's sunset
/// falls early in the UTC day, before its sunrise. Events the solver could
/// not pin down are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEvents {
    pub date: NaiveDate,
    pub events: Vec<SunEvent>,
}

impl DayEvents {
    /// Solve morning twilight, sunrise, sunset and evening twilight for `date`.
    ///
    /// Returns an error only for out-of-domain input; individual solver
    /// failures leave that event out.
    pub fn for_date(
        lat: f64,
        lon: f64,
        date: NaiveDate,
        classifier: &DaylightClassifier,
    ) -> Result<Self, DaylightError> {
        check_domain(lat, lon, date.year())?;

        let kinds = [
            SunEventKind::MorningTwilight,
            SunEventKind::Sunrise,
            SunEventKind::Sunset,
            SunEventKind::EveningTwilight,
        ];

        let mut events = Vec::with_capacity(kinds.len());
        for kind in kinds {
            match solve_event_time(
                lat,
                lon,
                kind.direction(),
                classifier.altitude_for(kind),
                date.year(),
                date.month(),
                date.day(),
            ) {
                Ok(hours_utc) => events.push(SunEvent { kind, hours_utc }),
                Err(err) => debug!(?kind, %date, %err, "skipping unsolved event"),
            }
        }

        Ok(DayEvents { date, events })
    }

    /// The solved event of `kind`, if any.
    pub fn get(&self, kind: SunEventKind) -> Option<&SunEvent> {
        self.events.iter().find(|e| e.kind == kind)
    }

    /// The UTC instant of `kind`, if solved.
    pub fn instant(&self, kind: SunEventKind) -> Option<DateTime<Utc>> {
        self.get(kind).map(|e| event_datetime(self.date, e.hours_utc))
    }
}
