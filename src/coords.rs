//! # Ecliptic to Equatorial Conversion
//!
//! Rotates ecliptic coordinates about the equinox direction by the obliquity
//! of the ecliptic ε. Which ε to use is an explicit choice carried by
//! [`ObliquityModel`]:
//!
//! - [`ObliquityModel::TimeVarying`] — `23.4392911° − 0.0130042° · T`, the
//!   linear term of the IAU 1980 mean obliquity. Default.
//! - [`ObliquityModel::Fixed`] — the J2000 value `23.4392911°`. Drifts by
//!   ~0.47″ per year away from the epoch.

use crate::lunar::EclipticPosition;
use crate::time::normalize_degrees;
use serde::{Deserialize, Serialize};

/// Mean obliquity of the ecliptic at J2000.0, degrees.
pub const OBLIQUITY_J2000: f64 = 23.439_291_1;

/// Linear drift of the mean obliquity, degrees per Julian century.
pub const OBLIQUITY_RATE: f64 = -0.013_004_2;

/// How the obliquity of the ecliptic is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObliquityModel {
    /// `OBLIQUITY_J2000 + OBLIQUITY_RATE · T`
    #[default]
    TimeVarying,
    /// `OBLIQUITY_J2000` for every date
    Fixed,
}

impl ObliquityModel {
    /// Obliquity in degrees at `t` centuries since J2000.
    pub fn degrees(self, t: f64) -> f64 {
        match self {
            ObliquityModel::TimeVarying => OBLIQUITY_J2000 + OBLIQUITY_RATE * t,
            ObliquityModel::Fixed => OBLIQUITY_J2000,
        }
    }
}

/// Geocentric right ascension and declination, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorialPosition {
    /// α in `[0, 360)`.
    pub right_ascension: f64,
    /// δ in `[-90, 90]`.
    pub declination: f64,
}

/// Convert an ecliptic position to equatorial coordinates for obliquity ε.
pub fn equatorial_position(ecl: &EclipticPosition, obliquity_deg: f64) -> EquatorialPosition {
    let lambda = ecl.longitude.to_radians();
    let beta = ecl.latitude.to_radians();
    let eps = obliquity_deg.to_radians();

    let ra = (lambda.sin() * eps.cos() - beta.tan() * eps.sin()).atan2(lambda.cos());
    // clamp guards asin against rounding just past ±1
    let sin_dec = (beta.sin() * eps.cos() + beta.cos() * eps.sin() * lambda.sin()).clamp(-1.0, 1.0);

    EquatorialPosition {
        right_ascension: normalize_degrees(ra.to_degrees()),
        declination: sin_dec.asin().to_degrees(),
    }
}
