//! # Report Tests
//!
//! Tests for the multi-day JSON report printed by the binary.

use crate::report::{build_report, HorizonStamp};
use chrono::NaiveDate;
use moon_calc_lib::config::Config;
use moon_calc_lib::solunar::{DayRating, PeriodKind};

fn nov_10() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 10).unwrap()
}

/// A week of output is keyed by consecutive ISO dates
#[test]
fn test_week_report_keys() {
    let config = Config::default();
    let report = build_report(&config, nov_10(), 7, 32.4, -93.4).expect("valid request");

    let keys: Vec<&str> = report.days.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "2025-11-10",
            "2025-11-11",
            "2025-11-12",
            "2025-11-13",
            "2025-11-14",
            "2025-11-15",
            "2025-11-16"
        ]
    );
    // coordinates differ from the configured observer
    assert_eq!(report.observer.name, None);
    assert_eq!(report.observer.utc_offset_hours, -6.0);
}

/// Local stamps carry the configured offset and the same instant
#[test]
fn test_local_times_use_configured_offset() {
    let config = Config::default();
    let report = build_report(&config, nov_10(), 1, 32.4, -93.4).unwrap();
    let day = &report.days["2025-11-10"];

    assert_eq!(day.culmination.local.offset().local_minus_utc(), -6 * 3600);
    assert_eq!(day.culmination.local, day.culmination.utc);
    match day.rise {
        HorizonStamp::Occurs { utc, local } => assert_eq!(utc, local),
        other => panic!("Expected moonrise at Lake Bistineau, got {:?}", other),
    }
}

/// Each day at mid-latitude carries both major periods
#[test]
fn test_periods_attached() {
    let config = Config::default();
    let report = build_report(&config, nov_10(), 3, 32.4, -93.4).unwrap();
    for (date, day) in &report.days {
        let majors = day.periods.iter().filter(|p| p.kind.is_major()).count();
        assert_eq!(majors, 2, "{} should have two major periods", date);
        assert!(day.periods.windows(2).all(|w| w[0].start.utc <= w[1].start.utc));
    }
}

/// The JSON output tags rise/set with their state
#[test]
fn test_json_shape() {
    let config = Config::default();
    let report = build_report(&config, nov_10(), 1, 32.4, -93.4).unwrap();
    let json = serde_json::to_value(&report).expect("Should serialize");

    let day = &json["days"]["2025-11-10"];
    assert_eq!(day["rise"]["state"], "occurs");
    assert!(day["rise"]["utc"].is_string());
    assert_eq!(day["phase_name"], "Waning Gibbous");
    assert!(day["illumination"].as_u64().unwrap() <= 100);
}

/// Polar observers get a state without timestamps
#[test]
fn test_json_polar_state() {
    let config = Config::default();
    let report = build_report(&config, nov_10(), 1, 80.0, 0.0).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    let rise = &json["days"]["2025-11-10"]["rise"];
    assert_eq!(rise["state"], "always_up");
    assert!(rise.get("utc").is_none());
}

/// An invalid location is rejected before any day is computed
#[test]
fn test_invalid_request() {
    let config = Config::default();
    let err = build_report(&config, nov_10(), 3, 91.0, -93.4).unwrap_err();
    assert_eq!(err.field(), "latitude");
}

/// Zero days yields an empty report rather than an error
#[test]
fn test_zero_days() {
    let report = build_report(&Config::default(), nov_10(), 0, 32.4, -93.4).unwrap();
    assert!(report.days.is_empty());
}

/// The place name only labels the configured coordinates
#[test]
fn test_observer_name_follows_coordinates() {
    let config = Config::default();
    let (lat, lon) = (config.observer.latitude, config.observer.longitude);
    let report = build_report(&config, nov_10(), 1, lat, lon).unwrap();
    assert_eq!(report.observer.name.as_deref(), Some("Lake Bistineau, LA"));

    let moved = build_report(&config, nov_10(), 1, 64.1, -21.9).unwrap();
    assert_eq!(moved.observer.name, None);
    let json = serde_json::to_value(&moved).unwrap();
    assert!(json["observer"].get("name").is_none());
}

/// Each day carries the illumination rating
#[test]
fn test_rating_attached() {
    let report = build_report(&Config::default(), nov_10(), 1, 32.4, -93.4).unwrap();
    let day = &report.days["2025-11-10"];
    // ~74% lit
    assert_eq!(day.rating, DayRating::Best);
    assert_eq!(day.stars, 4);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["days"]["2025-11-10"]["rating"], "best");
}

/// A day without a moonrise says so instead of inventing a time
#[test]
fn test_missing_rise_serializes_as_state() {
    // no moonrise at Lake Bistineau on 2024-01-26 UTC
    let start = NaiveDate::from_ymd_opt(2024, 1, 26).unwrap();
    let report = build_report(&Config::default(), start, 1, 32.4, -93.4).unwrap();
    let day = &report.days["2024-01-26"];
    assert_eq!(day.rise, HorizonStamp::NotThisDay);
    assert!(matches!(day.set, HorizonStamp::Occurs { .. }));
    assert!(day
        .periods
        .iter()
        .all(|p| p.kind != PeriodKind::MinorMoonrise));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["days"]["2024-01-26"]["rise"]["state"], "not_this_day");
}
