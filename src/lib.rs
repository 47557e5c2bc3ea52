//! # Route Daylight Core Library
//!
//! Sun-event and daylight-state calculations used to annotate route timing
//! (ETA columns, "Sunrise"/"EvTwilight" markers next to each waypoint).
//!
//! ## Design Philosophy
//!
//! ### Pure Functions
//! - **No shared state**: every call takes latitude, longitude and time by value
//! - **No caching**: two identical calls always do the same work and give the same answer
//! - **Thread-safe by construction**: nothing to lock, nothing to share
//!
//! ### Bounded Work
//! The solver iterates at most [`solar::MAX_ITERATIONS`] times, so the worst-case
//! latency of a classification (two solves) is fixed and tiny.
//!
//! ### Validity Band
//! The low-precision solar series is only trusted for |latitude| ≤ 60° and
//! years 2000–2100. Outside that band the classifier answers
//! [`DaylightState::Unknown`] rather than guessing.
//!
//! ## Core Types
//! - [`RiseSet`]: which crossing of the altitude curve to find
//! - [`DaylightState`]: seven-way classification of an instant
//! - [`SunEvent`]: a solved crossing in decimal UTC hours

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod classify;
pub mod config;
pub mod error;
pub mod events;
pub mod solar;

pub use classify::{classify, DaylightClassifier};
pub use error::DaylightError;
pub use solar::solve_event_time;

/// Which root of the day's altitude curve to solve for.
///
/// The discriminant is the sign applied to the hour-angle correction:
/// rising crossings happen before local noon, setting crossings after.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiseSet {
    Rising = 1,
    Setting = -1,
}

impl RiseSet {
    /// Sign of the hour-angle correction (+1 rising, -1 setting).
    pub fn sign(self) -> f64 {
        self as i32 as f64
    }
}

/// Daylight classification of one instant at one position.
///
/// `Unknown` covers both out-of-domain input and solver failure; callers that
/// need to tell them apart use [`DaylightClassifier::try_classify`].
///
/// # Example
/// ```
/// use daylight_lib::DaylightState;
///
/// assert_eq!(DaylightState::MorningTwilight.label(), "MoTwilight");
/// assert_eq!(DaylightState::Night.code(), 6);
/// assert_eq!(DaylightState::Unknown.to_string(), " - ");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaylightState {
    #[default]
    Unknown,
    MorningTwilight,
    Sunrise,
    Daytime,
    Sunset,
    EveningTwilight,
    Night,
}

impl DaylightState {
    /// Numeric code used by route timing tables (0 = unknown … 6 = night).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Short English label shown next to an ETA.
    ///
    /// Localisation belongs to the caller; these are the untranslated keys.
    pub fn label(self) -> &'static str {
        match self {
            DaylightState::Unknown => " - ",
            DaylightState::MorningTwilight => "MoTwilight",
            DaylightState::Sunrise => "Sunrise",
            DaylightState::Daytime => "Daytime",
            DaylightState::Sunset => "Sunset",
            DaylightState::EveningTwilight => "EvTwilight",
            DaylightState::Night => "Nighttime",
        }
    }

    /// True for every state except `Unknown`.
    pub fn is_known(self) -> bool {
        self != DaylightState::Unknown
    }
}

impl fmt::Display for DaylightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four altitude crossings reported for a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunEventKind {
    MorningTwilight,
    Sunrise,
    Sunset,
    EveningTwilight,
}

impl SunEventKind {
    /// Label matching the [`DaylightState`] shown at that event.
    pub fn label(self) -> &'static str {
        match self {
            SunEventKind::MorningTwilight => DaylightState::MorningTwilight.label(),
            SunEventKind::Sunrise => DaylightState::Sunrise.label(),
            SunEventKind::Sunset => DaylightState::Sunset.label(),
            SunEventKind::EveningTwilight => DaylightState::EveningTwilight.label(),
        }
    }

    /// Direction of the crossing this kind describes.
    pub fn direction(self) -> RiseSet {
        match self {
            SunEventKind::MorningTwilight | SunEventKind::Sunrise => RiseSet::Rising,
            SunEventKind::Sunset | SunEventKind::EveningTwilight => RiseSet::Setting,
        }
    }
}

/// A solved crossing: what happened and when, in decimal UTC hours `[0, 24)`.
///
/// # Example
/// ```
/// use daylight_lib::{SunEvent, SunEventKind};
///
/// let rise = SunEvent { kind: SunEventKind::Sunrise, hours_utc: 5.25 };
/// assert_eq!(rise.hours_utc, 5.25);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SunEvent {
    pub kind: SunEventKind,
    pub hours_utc: f64,
}
