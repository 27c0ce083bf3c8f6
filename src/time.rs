//! # Astronomical Time Helpers
//!
//! Calendar to Julian Day conversion, the J2000 century count used by every
//! polynomial in the crate, and Greenwich mean sidereal time.
//!
//! ## Conventions
//! - Julian Days are UT; the difference between TT and UT (ΔT, roughly a
//!   minute this century) is ignored, which is well below the accuracy of the
//!   truncated lunar series.
//! - Angles are degrees. Radians only appear at the trigonometric call site.

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000: f64 = 2_451_545.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Floor-based fractional part: always in `[0, 1)`, even for negative input.
///
/// ```
/// use moon_calc_lib::time::frac;
///
/// assert_eq!(frac(1.25), 0.25);
/// assert_eq!(frac(-0.25), 0.75);
/// ```
pub fn frac(x: f64) -> f64 {
    let f = x - x.floor();
    // tiny negatives round up to exactly 1.0
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// Reduce an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    frac(deg / 360.0) * 360.0
}

/// Reduce an angle in degrees into `[-180, 180)`.
pub fn signed_degrees(deg: f64) -> f64 {
    let d = normalize_degrees(deg);
    if d >= 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Julian Day at 0h UT of a Gregorian calendar date.
///
/// `day` may be fractional (noon = `.5`). No range validation happens here;
/// see [`crate::ObservationRequest`] for the checked entry point.
///
/// ```
/// use moon_calc_lib::time::julian_day;
///
/// assert_eq!(julian_day(2000, 1, 1.0), 2_451_544.5);
/// ```
pub fn julian_day(year: i32, month: u32, day: f64) -> f64 {
    // Jan/Feb count as months 13/14 of the previous year
    let (mut y, mut m) = (year as f64, month as f64);
    if month <= 2 {
        y -= 1.0;
        m += 12.0;
    }

    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5
}

/// Julian centuries elapsed since J2000.0.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_CENTURY
}

/// Greenwich mean sidereal time in degrees `[0, 360)` for any UT instant.
pub fn greenwich_sidereal_degrees(jd: f64) -> f64 {
    let t = centuries_since_j2000(jd);
    let theta = 280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(theta)
}

/// Local sidereal time in degrees for an east-positive longitude.
pub fn local_sidereal_degrees(jd: f64, longitude_deg: f64) -> f64 {
    normalize_degrees(greenwich_sidereal_degrees(jd) + longitude_deg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(2000, 1, 1.5, 2_451_545.0)]
    #[case(2000, 1, 1.0, 2_451_544.5)]
    #[case(1999, 12, 31.0, 2_451_543.5)]
    #[case(1987, 1, 27.0, 2_446_822.5)]
    #[case(1988, 6, 19.5, 2_447_332.0)]
    #[case(1957, 10, 4.81, 2_436_116.31)]
    #[case(2024, 2, 29.0, 2_460_369.5)]
    #[case(2024, 3, 1.0, 2_460_370.5)]
    #[case(1600, 1, 1.0, 2_305_447.5)]
    fn julian_day_matches_reference(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: f64,
        #[case] expected: f64,
    ) {
        assert_abs_diff_eq!(julian_day(year, month, day), expected, epsilon = 1e-6);
    }

    #[test]
    fn year_boundary_is_one_day() {
        let dec31 = julian_day(2024, 12, 31.0);
        let jan1 = julian_day(2025, 1, 1.0);
        assert_eq!(jan1 - dec31, 1.0);
    }

    #[test]
    fn leap_day_sits_between_feb_28_and_mar_1() {
        let feb28 = julian_day(2024, 2, 28.0);
        let feb29 = julian_day(2024, 2, 29.0);
        let mar1 = julian_day(2024, 3, 1.0);
        assert_eq!(feb29 - feb28, 1.0);
        assert_eq!(mar1 - feb29, 1.0);
    }

    #[test]
    fn frac_reduces_negatives_into_unit_interval() {
        for x in [-720.5, -1.0, -0.001, 0.0, 0.999, 359.75, 1e6 + 0.5] {
            let f = frac(x);
            assert!((0.0..1.0).contains(&f), "frac({x}) = {f}");
        }
        assert_abs_diff_eq!(normalize_degrees(-30.0), 330.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_degrees(350.0), -10.0, epsilon = 1e-12);
    }

    #[test]
    fn sidereal_time_matches_meeus_example() {
        // Meeus example 12.a: 1987-04-10 0h UT, GMST = 13h10m46.3668s
        let jd = julian_day(1987, 4, 10.0);
        let expected = (13.0 + 10.0 / 60.0 + 46.3668 / 3600.0) * 15.0;
        assert_abs_diff_eq!(greenwich_sidereal_degrees(jd), expected, epsilon = 1e-4);
    }

    #[test]
    fn local_sidereal_time_applies_east_longitude() {
        let jd = julian_day(2025, 11, 10.0);
        let gmst = greenwich_sidereal_degrees(jd);
        let lst = local_sidereal_degrees(jd, -93.4);
        assert_abs_diff_eq!(normalize_degrees(gmst - 93.4), lst, epsilon = 1e-9);
    }
}
