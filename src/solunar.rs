//! # Solunar Periods
//!
//! Derives the classic solunar feeding windows from a [`LunarEvent`]:
//!
//! - **Major** periods are centred on the Moon's upper and lower transit.
//! - **Minor** periods are centred on moonrise and moonset, when they occur.
//!
//! Window lengths come from the `[solunar]` configuration section. Each day
//! also gets a [`DayRating`] from its illumination.

use crate::{HorizonEvent, LunarEvent};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest window accepted from configuration, one day.
pub const MAX_PERIOD_MINUTES: u32 = 24 * 60;

/// Which lunar event a period is centred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// Upper transit
    MajorOverhead,
    /// Lower transit
    MajorUnderfoot,
    MinorMoonrise,
    MinorMoonset,
}

impl PeriodKind {
    pub fn is_major(&self) -> bool {
        matches!(self, PeriodKind::MajorOverhead | PeriodKind::MajorUnderfoot)
    }
}

/// A time window centred on a lunar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolunarPeriod {
    pub kind: PeriodKind,
    pub start: DateTime<Utc>,
    pub center: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SolunarPeriod {
    fn centred(kind: PeriodKind, center: DateTime<Utc>, length: Duration) -> Self {
        let half = length / 2;
        SolunarPeriod {
            kind,
            start: center - half,
            center,
            end: center + half,
        }
    }
}

/// Window lengths in minutes, capped at [`MAX_PERIOD_MINUTES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolunarConfig {
    pub major_period_minutes: u32,
    pub minor_period_minutes: u32,
}

impl SolunarConfig {
    fn major(&self) -> Duration {
        window(self.major_period_minutes)
    }

    fn minor(&self) -> Duration {
        window(self.minor_period_minutes)
    }
}

fn window(minutes: u32) -> Duration {
    Duration::minutes(i64::from(minutes.min(MAX_PERIOD_MINUTES)))
}

impl Default for SolunarConfig {
    fn default() -> Self {
        SolunarConfig {
            major_period_minutes: 120,
            minor_period_minutes: 60,
        }
    }
}

/// Major and minor periods of one day, sorted by start time.
pub fn solunar_periods(event: &LunarEvent, config: &SolunarConfig) -> Vec<SolunarPeriod> {
    let major = config.major();
    let minor = config.minor();

    let mut periods = Vec::with_capacity(4);
    periods.push(SolunarPeriod::centred(
        PeriodKind::MajorOverhead,
        event.culmination,
        major,
    ));
    periods.push(SolunarPeriod::centred(
        PeriodKind::MajorUnderfoot,
        event.underfoot,
        major,
    ));
    if let HorizonEvent::Occurs(at) = event.rise {
        periods.push(SolunarPeriod::centred(PeriodKind::MinorMoonrise, at, minor));
    }
    if let HorizonEvent::Occurs(at) = event.set {
        periods.push(SolunarPeriod::centred(PeriodKind::MinorMoonset, at, minor));
    }

    periods.sort_by_key(|p| p.start);
    periods
}

/// Fishing/hunting outlook for a day, from the Moon's illumination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayRating {
    Fair,
    Good,
    Better,
    Best,
}

impl DayRating {
    /// Rate a day by its illuminated percentage.
    ///
    /// ```
    /// use moon_calc_lib::solunar::DayRating;
    ///
    /// assert_eq!(DayRating::from_illumination(74), DayRating::Best);
    /// assert_eq!(DayRating::from_illumination(2), DayRating::Fair);
    /// ```
    pub fn from_illumination(percent: u8) -> Self {
        match percent {
            41..=94 => DayRating::Best,
            21..=40 | 95..=u8::MAX => DayRating::Better,
            6..=20 => DayRating::Good,
            _ => DayRating::Fair,
        }
    }

    /// One to four stars.
    pub fn stars(&self) -> u8 {
        match self {
            DayRating::Fair => 1,
            DayRating::Good => 2,
            DayRating::Better => 3,
            DayRating::Best => 4,
        }
    }
}

impl fmt::Display for DayRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayRating::Fair => "Fair",
            DayRating::Good => "Good",
            DayRating::Better => "Better",
            DayRating::Best => "Best",
        };
        f.write_str(s)
    }
}
