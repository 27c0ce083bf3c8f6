//! Illuminated fraction, age and phase name of the Moon.
//!
//! Low-precision phase angle from Meeus (48.4): it needs only the mean
//! elements, so it is independent of the observer and of the horizon solver.
//! Every angle stays in degrees until the trig call.

use crate::lunar::OrbitalElements;
use crate::time::{centuries_since_j2000, normalize_degrees};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Eight named phases, ordered by age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseName {
    const ALL: [PhaseName; 8] = [
        PhaseName::New,
        PhaseName::WaxingCrescent,
        PhaseName::FirstQuarter,
        PhaseName::WaxingGibbous,
        PhaseName::Full,
        PhaseName::WaningGibbous,
        PhaseName::LastQuarter,
        PhaseName::WaningCrescent,
    ];

    /// Name for an age expressed as a fraction of the synodic month.
    pub fn from_cycle_fraction(fraction: f64) -> Self {
        // Eight equal bins centred on the principal phases
        let index = ((fraction * 8.0) + 0.5).floor() as i64;
        Self::ALL[index.rem_euclid(8) as usize]
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseName::New => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::Full => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        };
        f.write_str(s)
    }
}

/// Phase information for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonPhase {
    /// Sun–Moon–Earth angle i, degrees `[0, 180]`.
    pub phase_angle: f64,
    /// k = (1 + cos i) / 2, unrounded.
    pub illuminated_fraction: f64,
    /// round(100 k), percent.
    pub illumination: u8,
    /// `illumination / 100`.
    pub phase: f64,
    /// Days since mean new moon.
    pub age_days: f64,
    pub name: PhaseName,
}

/// Phase angle i in degrees from the mean elements.
pub fn phase_angle(el: &OrbitalElements) -> f64 {
    let d = el.mean_elongation.to_radians();
    let m = el.mean_anomaly_sun.to_radians();
    let mp = el.mean_anomaly_moon.to_radians();

    let i = 180.0 - el.mean_elongation - 6.289 * mp.sin() + 2.100 * m.sin()
        - 1.274 * (2.0 * d - mp).sin()
        - 0.658 * (2.0 * d).sin()
        - 0.214 * (2.0 * mp).sin()
        - 0.110 * d.sin();

    // fold into [0, 180]: only |i| matters for the lit fraction
    let folded = normalize_degrees(i);
    if folded > 180.0 {
        360.0 - folded
    } else {
        folded
    }
}

/// Phase of the Moon at a UT Julian Day.
pub fn moon_phase(jd: f64) -> MoonPhase {
    let el = OrbitalElements::at(centuries_since_j2000(jd));
    let i = phase_angle(&el);
    let k = (1.0 + i.to_radians().cos()) / 2.0;
    let illumination = (k * 100.0).round().clamp(0.0, 100.0) as u8;
    let cycle = el.mean_elongation / 360.0;

    MoonPhase {
        phase_angle: i,
        illuminated_fraction: k,
        illumination,
        phase: illumination as f64 / 100.0,
        age_days: cycle * SYNODIC_MONTH_DAYS,
        name: PhaseName::from_cycle_fraction(cycle),
    }
}

/// Illumination in whole percent at a UT Julian Day.
pub fn illumination(jd: f64) -> u8 {
    moon_phase(jd).illumination
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::julian_day;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn meeus_example_48a_illuminated_fraction() {
        // 1992-04-12 0h TD: k = 0.6786 (high-precision); the mean-element
        // formula lands within a percent of it
        let p = moon_phase(2_448_724.5);
        assert_abs_diff_eq!(p.illuminated_fraction, 0.6786, epsilon = 0.01);
        assert_eq!(p.illumination, 68);
        assert_eq!(p.name, PhaseName::WaxingGibbous);
    }

    #[rstest]
    // New moon 2024-01-11 11:57 UT
    #[case(2024, 1, 11.5, 0, 2)]
    // Full moon 2024-01-25 17:54 UT
    #[case(2024, 1, 25.75, 98, 100)]
    // First quarter 2024-01-18 03:53 UT
    #[case(2024, 1, 18.16, 45, 55)]
    fn illumination_at_known_phases(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: f64,
        #[case] low: u8,
        #[case] high: u8,
    ) {
        let pct = illumination(julian_day(year, month, day));
        assert!((low..=high).contains(&pct), "{year}-{month}-{day}: {pct}%");
    }

    #[test]
    fn illumination_cycles_over_a_synodic_month() {
        let start = julian_day(2025, 1, 1.0);
        let samples: Vec<u8> = (0..70).map(|d| illumination(start + d as f64)).collect();
        assert!(samples.iter().all(|&p| p <= 100));

        let max = *samples.iter().max().unwrap();
        let min = *samples.iter().min().unwrap();
        assert!(max >= 98, "max {max}");
        assert!(min <= 2, "min {min}");

        // minima roughly one synodic month apart
        let minima: Vec<usize> = (1..samples.len() - 1)
            .filter(|&i| samples[i] <= samples[i - 1] && samples[i] < samples[i + 1])
            .collect();
        assert!(minima.len() >= 2, "minima {minima:?}");
        let gap = (minima[1] - minima[0]) as f64;
        assert!((gap - SYNODIC_MONTH_DAYS).abs() <= 1.5, "gap {gap}");
    }

    #[test]
    fn phase_is_illumination_restated() {
        let p = moon_phase(julian_day(2025, 11, 10.0));
        assert_abs_diff_eq!(p.phase, p.illumination as f64 / 100.0, epsilon = 1e-12);
        assert!((0.0..SYNODIC_MONTH_DAYS).contains(&p.age_days));
        assert!((0.0..=180.0).contains(&p.phase_angle));
    }

    #[rstest]
    #[case(0.0, PhaseName::New)]
    #[case(0.97, PhaseName::New)]
    #[case(0.12, PhaseName::WaxingCrescent)]
    #[case(0.25, PhaseName::FirstQuarter)]
    #[case(0.5, PhaseName::Full)]
    #[case(0.62, PhaseName::WaningGibbous)]
    #[case(0.75, PhaseName::LastQuarter)]
    #[case(0.88, PhaseName::WaningCrescent)]
    fn phase_names_by_cycle_fraction(#[case] fraction: f64, #[case] expected: PhaseName) {
        assert_eq!(PhaseName::from_cycle_fraction(fraction), expected);
    }

    #[test]
    fn phase_name_display() {
        assert_eq!(PhaseName::WaxingGibbous.to_string(), "Waxing Gibbous");
        assert_eq!(PhaseName::Full.to_string(), "Full Moon");
    }
}
