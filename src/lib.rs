//! # Moon Calc Core Library
//!
//! This library computes, for one calendar date and one observer location, the Moon's
//! rise time, set time, upper transit ("culmination"), lower transit ("underfoot") and
//! illuminated fraction. It is a deterministic, stateless calculator: every call is
//! independent, allocation-free on the numerical path, and safe to run from any thread.
//!
//! ## Design Philosophy
//!
//! ### One Coherent Theory
//! - **Meeus truncated lunar theory**: mean elements and periodic terms from
//!   *Astronomical Algorithms* ch. 47, phase angle from ch. 48
//! - **Static term tables**: the periodic series are plain data in [`lunar`], summed
//!   by a single loop, so precision is tuned by editing a table rather than code
//! - **One angle unit**: degrees in every struct, radians only inside trig calls
//!
//! ### Explicit Outcomes
//! - **No sentinels**: a Moon that never reaches the horizon on a given day is
//!   [`HorizonEvent::NeverRises`] or [`HorizonEvent::AlwaysUp`]; a rise or set that
//!   simply falls on the neighbouring day is [`HorizonEvent::NotThisDay`]
//! - **Checked boundary**: malformed dates and coordinates are rejected by
//!   [`ObservationRequest::new`] with [`MoonError::InvalidInput`] naming the field
//!
//! ### Data Flow
//! 1. **Date**: UTC calendar day → Julian Day at 0h UT
//! 2. **Position**: centuries since J2000 → mean elements → ecliptic → equatorial
//! 3. **Horizon**: sidereal time → hour angle → rise, set and both transits
//! 4. **Phase**: mean elements → phase angle → illumination percent
//!
//! ## Core Types
//!
//! - [`LunarEvent`]: everything computed for one day
//! - [`HorizonEvent`]: the tri-state outcome of a rise or set search

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

// Module declarations
pub mod config;
pub mod coords;
pub mod ephemeris;
pub mod horizon;
pub mod lunar;
pub mod observation;
pub mod phase;
pub mod solunar;
pub mod time;

pub use ephemeris::{calculate, calculate_with, EphemerisSettings};
pub use observation::{MoonError, ObservationRequest};
pub use phase::PhaseName;

/// Outcome of a moonrise or moonset search for one day.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use moon_calc_lib::HorizonEvent;
///
/// let rise = HorizonEvent::Occurs(Utc.with_ymd_and_hms(2025, 11, 10, 4, 30, 0).unwrap());
/// assert!(rise.instant().is_some());
/// assert_eq!(HorizonEvent::AlwaysUp.instant(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "at", rename_all = "snake_case")]
pub enum HorizonEvent {
    /// The Moon crosses the horizon at this instant
    Occurs(DateTime<Utc>),
    /// The Moon crosses the horizon this day, but only the other way
    ///
    /// A lunar day is ~24 h 50 min, so roughly once a month a UTC day has a
    /// moonset and no moonrise (or the reverse).
    NotThisDay,
    /// The Moon stays below the horizon all day
    NeverRises,
    /// The Moon stays above the horizon all day
    AlwaysUp,
}

impl HorizonEvent {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            HorizonEvent::Occurs(at) => Some(*at),
            _ => None,
        }
    }
}

/// Everything computed for one UTC day at one place.
///
/// All instants lie inside the requested UTC day. `phase` is the
/// illuminated fraction restated as a unit fraction, not the phase angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LunarEvent {
    /// The UTC calendar day the events belong to
    pub date: NaiveDate,
    /// Moonrise
    pub rise: HorizonEvent,
    /// Moonset
    pub set: HorizonEvent,
    /// Upper transit
    pub culmination: DateTime<Utc>,
    /// Lower transit
    pub underfoot: DateTime<Utc>,
    /// Illuminated fraction at 0h UT, whole percent 0–100
    pub illumination: u8,
    /// `illumination / 100`
    pub phase: f64,
    /// Days since mean new moon at 0h UT
    pub age_days: f64,
    /// Named phase at 0h UT
    pub phase_name: PhaseName,
}
