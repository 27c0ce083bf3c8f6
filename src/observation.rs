//! # Observation Requests
//!
//! The checked boundary of the crate. The numerical routines accept any
//! `f64` and will happily compute geometry for latitude 123° or February 31;
//! [`ObservationRequest::new`] is where such input is rejected.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the lunar calculator.
///
/// Not crossing the horizon is a modeled outcome
/// ([`crate::HorizonEvent`]), never an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoonError {
    /// A field of the request is out of range or not a real calendar date
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

impl MoonError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        MoonError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// The field named by an `InvalidInput` error.
    pub fn field(&self) -> &'static str {
        match self {
            MoonError::InvalidInput { field, .. } => field,
        }
    }
}

/// A validated (date, place) pair.
///
/// The date is a UTC calendar day; latitude is north-positive and longitude
/// east-positive, both in degrees.
///
/// ```
/// use moon_calc_lib::ObservationRequest;
///
/// let req = ObservationRequest::new(2025, 11, 10, 32.4, -93.4).unwrap();
/// assert_eq!(req.month(), 11);
///
/// let err = ObservationRequest::new(2025, 2, 30, 32.4, -93.4).unwrap_err();
/// assert_eq!(err.field(), "day");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservationRequest {
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
}

impl ObservationRequest {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, MoonError> {
        if !(1..=12).contains(&month) {
            return Err(MoonError::invalid(
                "month",
                format!("{month} is not in 1..=12"),
            ));
        }
        if !(1..=31).contains(&day) {
            return Err(MoonError::invalid("day", format!("{day} is not in 1..=31")));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            MoonError::invalid("day", format!("{year:04}-{month:02}-{day:02} does not exist"))
        })?;
        Self::at(date, latitude, longitude)
    }

    /// Build from an existing calendar date.
    pub fn at(date: NaiveDate, latitude: f64, longitude: f64) -> Result<Self, MoonError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(MoonError::invalid(
                "latitude",
                format!("{latitude} is not in [-90, 90]"),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(MoonError::invalid(
                "longitude",
                format!("{longitude} is not in [-180, 180]"),
            ));
        }
        Ok(ObservationRequest {
            date,
            latitude,
            longitude,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Same place, another day.
    pub fn with_date(&self, date: NaiveDate) -> Self {
        ObservationRequest { date, ..*self }
    }
}
