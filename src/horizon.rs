//! # Rise, Set and Transit Solver
//!
//! Finds, for one UTC calendar day, the day fractions at which the Moon
//! crosses the local meridian (upper and lower transit) and the standard
//! altitude `h0` (rise and set).
//!
//! Transits follow Meeus ch. 15: an estimate from the sidereal time at 0h,
//! then a bounded number of corrections where the Moon's position is
//! re-evaluated at the candidate instant.
//!
//! Rise and set are found by scanning `altitude − h0` across the day in
//! [`SCAN_STEPS`] steps. Every sign change brackets a crossing, which is then
//! refined with Newton steps kept inside the bracket. The Moon's actual
//! position is used at every sample, so δ drifting through the day is
//! accounted for at each event separately.
//!
//! ## Horizon outcomes
//! - [`Crossing::At`]: the event happens inside the day.
//! - [`Crossing::NotThisDay`]: the Moon does cross `h0` this day, but only in
//!   the other direction. Lunar days are ~24 h 50 min, so about once a month
//!   there is no moonrise (or no moonset) between two UTC midnights.
//! - [`Crossing::NeverRises`] / [`Crossing::AlwaysUp`]: no crossing at all;
//!   the Moon stays below (above) `h0` for the whole day.
//!
//! Crossings shorter than one scan step (a grazing Moon at high latitude)
//! are below the resolution of the scan.

use crate::coords::EquatorialPosition;
use crate::time::{frac, local_sidereal_degrees, signed_degrees};
use serde::Serialize;

/// Atmospheric refraction at the horizon, degrees (−34′).
pub const HORIZON_REFRACTION_DEG: f64 = -0.5667;

/// Mean sidereal rotation in degrees per solar day.
pub const SIDEREAL_DEGREES_PER_DAY: f64 = 360.985_647;

/// Samples per day when scanning for horizon crossings (10 min apart).
pub const SCAN_STEPS: usize = 144;

/// Hard cap on correction passes per transit.
const MAX_CORRECTIONS: usize = 8;

/// Hard cap on refinement passes per bracketed crossing.
const MAX_REFINEMENTS: usize = 40;

/// Stop correcting once a step is below ~0.01 s.
const CONVERGED_DAYS: f64 = 1e-7;

/// Standard altitude `h0` for the Moon given its horizontal parallax.
///
/// `0.7275 π` accounts for parallax and semi-diameter together.
pub fn standard_altitude(parallax_deg: f64) -> f64 {
    0.7275 * parallax_deg + HORIZON_REFRACTION_DEG
}

/// Altitude in degrees of a body at declination `δ` and hour angle `H`.
pub fn altitude(latitude_deg: f64, declination_deg: f64, hour_angle_deg: f64) -> f64 {
    let phi = latitude_deg.to_radians();
    let dec = declination_deg.to_radians();
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle_deg.to_radians().cos())
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees()
}

/// What the solver needs to know about the Moon at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyPosition {
    pub equatorial: EquatorialPosition,
    /// `h0` in degrees.
    pub standard_altitude: f64,
}

/// Result of the horizon equation for a single declination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HourAngle {
    /// Semi-diurnal arc `H0` in degrees, `(0, 180)`.
    Crosses(f64),
    NeverRises,
    AlwaysUp,
}

/// Solve `cos H0 = (sin h0 − sin φ sin δ) / (cos φ cos δ)`.
pub fn horizon_hour_angle(latitude_deg: f64, declination_deg: f64, h0_deg: f64) -> HourAngle {
    let phi = latitude_deg.to_radians();
    let dec = declination_deg.to_radians();
    let numerator = h0_deg.to_radians().sin() - phi.sin() * dec.sin();
    let denominator = phi.cos() * dec.cos();

    if denominator.abs() < 1e-12 {
        // At a pole the altitude is fixed for the whole day
        return if numerator < 0.0 {
            HourAngle::AlwaysUp
        } else {
            HourAngle::NeverRises
        };
    }

    let cos_h0 = numerator / denominator;
    if cos_h0 > 1.0 {
        HourAngle::NeverRises
    } else if cos_h0 < -1.0 {
        HourAngle::AlwaysUp
    } else {
        HourAngle::Crosses(cos_h0.acos().to_degrees())
    }
}

/// Day-fraction outcome of a rise or set search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossing {
    /// Fraction of the UTC day, `[0, 1)`.
    At(f64),
    /// The opposite crossing happens this day, this one does not.
    NotThisDay,
    NeverRises,
    AlwaysUp,
}

impl Crossing {
    pub fn fraction(&self) -> Option<f64> {
        match self {
            Crossing::At(m) => Some(*m),
            _ => None,
        }
    }
}

/// All four events of one day as day fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayEvents {
    pub rise: Crossing,
    pub set: Crossing,
    /// Upper transit, `[0, 1)`.
    pub culmination: f64,
    /// Lower transit, `[0, 1)`.
    pub underfoot: f64,
}

/// The Moon seen from the observer at one day fraction.
#[derive(Debug, Clone, Copy)]
struct Sample {
    m: f64,
    sky: SkyPosition,
    hour_angle: f64,
    altitude: f64,
}

impl Sample {
    /// `altitude − h0`: positive while the Moon is up.
    fn height(&self) -> f64 {
        self.altitude - self.sky.standard_altitude
    }

    fn is_up(&self) -> bool {
        self.height() > 0.0
    }
}

/// Solver state for one observer and one day.
struct DaySolver<F> {
    jd0: f64,
    latitude: f64,
    longitude: f64,
    position: F,
}

impl<F> DaySolver<F>
where
    F: Fn(f64) -> SkyPosition,
{
    /// Local hour angle in `[-180, 180)` at day fraction `m` for right ascension `ra`.
    fn hour_angle(&self, m: f64, ra: f64) -> f64 {
        signed_degrees(local_sidereal_degrees(self.jd0 + m, self.longitude) - ra)
    }

    fn sample(&self, m: f64) -> Sample {
        let sky = (self.position)(self.jd0 + m);
        let hour_angle = self.hour_angle(m, sky.equatorial.right_ascension);
        Sample {
            m,
            sky,
            hour_angle,
            altitude: altitude(self.latitude, sky.equatorial.declination, hour_angle),
        }
    }

    /// Refine a transit where the hour angle equals `target` degrees.
    fn transit(&self, m: f64, target: f64) -> f64 {
        let mut m = m;
        for _ in 0..MAX_CORRECTIONS {
            let ra = (self.position)(self.jd0 + m).equatorial.right_ascension;
            let dm = -signed_degrees(self.hour_angle(m, ra) - target) / 360.0;
            m += dm;
            if dm.abs() < CONVERGED_DAYS {
                break;
            }
        }
        m
    }

    /// Keep a transit inside the requested day when the same transit recurs in it.
    ///
    /// Lunar transits repeat every ~24 h 50 min, so an estimate that converged to
    /// the neighbouring day is retried one day over before being folded back.
    fn within_day<G>(&self, first: f64, refine: G) -> f64
    where
        G: Fn(f64) -> f64,
    {
        if (0.0..1.0).contains(&first) {
            return first;
        }
        let shifted = if first < 0.0 { first + 1.0 } else { first - 1.0 };
        let second = refine(shifted);
        if (0.0..1.0).contains(&second) {
            second
        } else {
            frac(first)
        }
    }

    /// Rate of change of altitude in degrees per day, ignoring the Moon's own motion.
    fn altitude_rate(&self, s: &Sample) -> f64 {
        let phi = self.latitude.to_radians();
        let dec = s.sky.equatorial.declination.to_radians();
        let cos_alt = s.altitude.to_radians().cos();
        if cos_alt.abs() < 1e-12 {
            return 0.0;
        }
        -SIDEREAL_DEGREES_PER_DAY * phi.cos() * dec.cos() * s.hour_angle.to_radians().sin()
            / cos_alt
    }

    /// First guess inside `[lo, hi]` from the semi-diurnal arc at `lo`.
    fn estimate(&self, lo: &Sample, hi: &Sample) -> f64 {
        let midpoint = 0.5 * (lo.m + hi.m);
        let rising = !lo.is_up();
        match horizon_hour_angle(
            self.latitude,
            lo.sky.equatorial.declination,
            lo.sky.standard_altitude,
        ) {
            HourAngle::Crosses(arc) => {
                let target = if rising { -arc } else { arc };
                let m = lo.m + signed_degrees(target - lo.hour_angle) / SIDEREAL_DEGREES_PER_DAY;
                if m > lo.m && m < hi.m {
                    m
                } else {
                    midpoint
                }
            }
            _ => midpoint,
        }
    }

    /// Refine the crossing bracketed by `lo` and `hi` (opposite signs of `height`).
    fn refine(&self, lo: &Sample, hi: &Sample) -> f64 {
        let lo_up = lo.is_up();
        let (mut a, mut b) = (lo.m, hi.m);
        let mut m = self.estimate(lo, hi);

        for _ in 0..MAX_REFINEMENTS {
            let s = self.sample(m);
            if s.is_up() == lo_up {
                a = m;
            } else {
                b = m;
            }

            let rate = self.altitude_rate(&s);
            let newton = if rate != 0.0 { m - s.height() / rate } else { f64::NAN };
            let next = if newton > a && newton < b {
                newton
            } else {
                0.5 * (a + b)
            };

            let step = (next - m).abs();
            m = next;
            if step < CONVERGED_DAYS || b - a < CONVERGED_DAYS {
                break;
            }
        }
        m
    }

    /// Scan the day for the first moonrise and the first moonset.
    fn horizon(&self) -> (Crossing, Crossing) {
        let mut prev = self.sample(0.0);
        let (mut rise, mut set) = (None, None);
        let (mut seen_up, mut seen_down) = (prev.is_up(), !prev.is_up());

        for step in 1..=SCAN_STEPS {
            let next = self.sample(step as f64 / SCAN_STEPS as f64);
            match (prev.is_up(), next.is_up()) {
                (false, true) if rise.is_none() => rise = Some(self.refine(&prev, &next)),
                (true, false) if set.is_none() => set = Some(self.refine(&prev, &next)),
                _ => {}
            }
            seen_up |= next.is_up();
            seen_down |= !next.is_up();
            prev = next;
        }

        let missing = match (seen_up, seen_down) {
            (true, false) => Crossing::AlwaysUp,
            (false, true) => Crossing::NeverRises,
            _ => Crossing::NotThisDay,
        };
        (
            rise.map_or(missing, Crossing::At),
            set.map_or(missing, Crossing::At),
        )
    }

    fn solve(&self) -> DayEvents {
        let start = self.sample(0.0);
        let m0 = frac(-start.hour_angle / 360.0);

        let upper = self.transit(m0, 0.0);
        let culmination = self.within_day(upper, |m| self.transit(m, 0.0));
        let lower = self.transit(m0 + 0.5, 180.0);
        let underfoot = self.within_day(lower, |m| self.transit(m, 180.0));

        let (rise, set) = self.horizon();

        DayEvents {
            rise,
            set,
            culmination,
            underfoot,
        }
    }
}

/// Solve the day starting at `jd0` (0h UT) for an observer at
/// `latitude`/`longitude` (degrees, east positive).
///
/// `position` returns the Moon's apparent place for any UT Julian Day; the
/// solver calls it a bounded number of times.
pub fn solve_day<F>(jd0: f64, latitude: f64, longitude: f64, position: F) -> DayEvents
where
    F: Fn(f64) -> SkyPosition,
{
    DaySolver {
        jd0,
        latitude,
        longitude,
        position,
    }
    .solve()
}
