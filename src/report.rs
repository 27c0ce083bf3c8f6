//! # JSON Day Report
//!
//! Serializable view of one or more [`LunarEvent`]s for the CLI: every instant is
//! given both in UTC and in the configured fixed local offset, and the solunar
//! periods are attached to each day. Days are keyed by ISO date.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use moon_calc_lib::config::Config;
use moon_calc_lib::solunar::{solunar_periods, DayRating, PeriodKind, SolunarPeriod};
use moon_calc_lib::{calculate_with, HorizonEvent, LunarEvent, MoonError, ObservationRequest};
use serde::Serialize;
use std::collections::BTreeMap;

/// An instant in both UTC and local time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stamp {
    pub utc: DateTime<Utc>,
    pub local: DateTime<FixedOffset>,
}

impl Stamp {
    fn new(utc: DateTime<Utc>, offset: &FixedOffset) -> Self {
        Stamp {
            utc,
            local: utc.with_timezone(offset),
        }
    }
}

/// Rise/set outcome with local time attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HorizonStamp {
    Occurs {
        utc: DateTime<Utc>,
        local: DateTime<FixedOffset>,
    },
    NotThisDay,
    NeverRises,
    AlwaysUp,
}

impl HorizonStamp {
    fn new(event: HorizonEvent, offset: &FixedOffset) -> Self {
        match event {
            HorizonEvent::Occurs(at) => {
                let Stamp { utc, local } = Stamp::new(at, offset);
                HorizonStamp::Occurs { utc, local }
            }
            HorizonEvent::NotThisDay => HorizonStamp::NotThisDay,
            HorizonEvent::NeverRises => HorizonStamp::NeverRises,
            HorizonEvent::AlwaysUp => HorizonStamp::AlwaysUp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodReport {
    pub kind: PeriodKind,
    pub start: Stamp,
    pub end: Stamp,
}

impl PeriodReport {
    fn new(period: &SolunarPeriod, offset: &FixedOffset) -> Self {
        PeriodReport {
            kind: period.kind,
            start: Stamp::new(period.start, offset),
            end: Stamp::new(period.end, offset),
        }
    }
}

/// One day of output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub rise: HorizonStamp,
    pub set: HorizonStamp,
    pub culmination: Stamp,
    pub underfoot: Stamp,
    pub illumination: u8,
    pub phase: f64,
    pub age_days: f64,
    pub phase_name: String,
    pub rating: DayRating,
    pub stars: u8,
    pub periods: Vec<PeriodReport>,
}

impl DayReport {
    pub fn new(event: &LunarEvent, config: &Config) -> Self {
        let offset = config.ephemeris.local_offset();
        let rating = DayRating::from_illumination(event.illumination);
        let periods = solunar_periods(event, &config.solunar)
            .iter()
            .map(|p| PeriodReport::new(p, &offset))
            .collect();

        DayReport {
            rise: HorizonStamp::new(event.rise, &offset),
            set: HorizonStamp::new(event.set, &offset),
            culmination: Stamp::new(event.culmination, &offset),
            underfoot: Stamp::new(event.underfoot, &offset),
            illumination: event.illumination,
            phase: event.phase,
            age_days: (event.age_days * 100.0).round() / 100.0,
            phase_name: event.phase_name.to_string(),
            rating,
            stars: rating.stars(),
            periods,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObserverReport {
    /// Configured place name; absent when the coordinates were overridden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub utc_offset_hours: f64,
}

/// Full CLI output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub observer: ObserverReport,
    pub days: BTreeMap<String, DayReport>,
}

/// The configured name, if the report is for the configured coordinates.
fn config_location_name(config: &Config, latitude: f64, longitude: f64) -> Option<String> {
    let observer = &config.observer;
    (observer.latitude == latitude && observer.longitude == longitude)
        .then(|| observer.name.clone())
}

/// Compute `days` consecutive UTC days starting at `start`.
pub fn build_report(
    config: &Config,
    start: NaiveDate,
    days: usize,
    latitude: f64,
    longitude: f64,
) -> Result<Report, MoonError> {
    let base = ObservationRequest::at(start, latitude, longitude)?;
    let settings = config.ephemeris.settings;

    let days = start
        .iter_days()
        .take(days)
        .map(|date| {
            let event = calculate_with(&base.with_date(date), &settings);
            (date.format("%Y-%m-%d").to_string(), DayReport::new(&event, config))
        })
        .collect();

    Ok(Report {
        observer: ObserverReport {
            name: config_location_name(config, latitude, longitude),
            latitude,
            longitude,
            utc_offset_hours: config.ephemeris.utc_offset_hours,
        },
        days,
    })
}
