//! # Lunar Ephemeris Entry Points
//!
//! Composes the pipeline for one request:
//!
//! 1. date → Julian Day at 0h UT ([`crate::time::julian_day`])
//! 2. Julian Day → mean elements → ecliptic → equatorial ([`crate::lunar::moon_position`])
//! 3. rise / set / transits for the UTC day ([`crate::horizon::solve_day`])
//! 4. illumination at 0h UT ([`crate::phase::moon_phase`])
//!
//! ## Timezone Convention
//! The requested date is a **UTC** calendar day. Every instant in the result
//! is an offset from 00:00 UTC of that day and falls inside it. Rendering in
//! local time is up to the caller (the CLI applies a fixed offset from its
//! configuration).

use crate::coords::ObliquityModel;
use crate::horizon::{solve_day, standard_altitude, Crossing, SkyPosition};
use crate::lunar::moon_position;
use crate::observation::{MoonError, ObservationRequest};
use crate::phase::moon_phase;
use crate::time::julian_day;
use crate::{HorizonEvent, LunarEvent};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Milliseconds in a civil day.
const MS_PER_DAY: f64 = 86_400_000.0;

/// Knobs of the calculation that have more than one defensible value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSettings {
    /// Obliquity of the ecliptic used for the equatorial rotation.
    #[serde(default)]
    pub obliquity: ObliquityModel,
}

/// Compute the Moon's events for a date and place with default settings.
///
/// ```
/// use moon_calc_lib::calculate;
///
/// let event = calculate(2025, 11, 10, 32.4, -93.4).unwrap();
/// assert!(event.illumination <= 100);
/// ```
pub fn calculate(
    year: i32,
    month: u32,
    day: u32,
    latitude: f64,
    longitude: f64,
) -> Result<LunarEvent, MoonError> {
    let request = ObservationRequest::new(year, month, day, latitude, longitude)?;
    Ok(calculate_with(&request, &EphemerisSettings::default()))
}

/// Compute the Moon's events for a validated request.
pub fn calculate_with(request: &ObservationRequest, settings: &EphemerisSettings) -> LunarEvent {
    let jd0 = julian_day(request.year(), request.month(), request.day() as f64);
    let obliquity = settings.obliquity;

    let events = solve_day(jd0, request.latitude(), request.longitude(), |jd| {
        let pos = moon_position(jd, obliquity);
        SkyPosition {
            equatorial: pos.equatorial,
            standard_altitude: standard_altitude(pos.ecliptic.horizontal_parallax()),
        }
    });
    let phase = moon_phase(jd0);

    debug!(
        jd0,
        rise = ?events.rise,
        set = ?events.set,
        culmination = events.culmination,
        underfoot = events.underfoot,
        illumination = phase.illumination,
        "solved lunar day"
    );

    let midnight = Utc.from_utc_datetime(&request.date().and_time(NaiveTime::MIN));
    LunarEvent {
        date: request.date(),
        rise: horizon_event(midnight, events.rise),
        set: horizon_event(midnight, events.set),
        culmination: instant(midnight, events.culmination),
        underfoot: instant(midnight, events.underfoot),
        illumination: phase.illumination,
        phase: phase.phase,
        age_days: phase.age_days,
        phase_name: phase.name,
    }
}

/// Map a day fraction `[0, 1)` to an instant inside the day.
fn instant(midnight: DateTime<Utc>, fraction: f64) -> DateTime<Utc> {
    let ms = (fraction * MS_PER_DAY).round() as i64;
    midnight + Duration::milliseconds(ms.clamp(0, MS_PER_DAY as i64 - 1))
}

fn horizon_event(midnight: DateTime<Utc>, crossing: Crossing) -> HorizonEvent {
    match crossing {
        Crossing::At(m) => HorizonEvent::Occurs(instant(midnight, m)),
        Crossing::NotThisDay => HorizonEvent::NotThisDay,
        Crossing::NeverRises => HorizonEvent::NeverRises,
        Crossing::AlwaysUp => HorizonEvent::AlwaysUp,
    }
}
