//! Lunar position from truncated ELP-2000/82 series (Meeus 1998, ch. 47)
//!
//! Accuracy: ~10″ in λ, ~4″ in β, a few km in Δ with the tables below.
//! The periodic terms are static data; adding a row to a table is the only
//! change needed to refine the result.
//!
//! References: J. Meeus, *Astronomical Algorithms* 2nd ed., tables 47.A/47.B.

use crate::coords::{equatorial_position, EquatorialPosition, ObliquityModel};
use crate::time::{centuries_since_j2000, normalize_degrees};
use serde::Serialize;

/// Mean distance Earth–Moon in km (constant term of the distance series).
pub const MEAN_DISTANCE_KM: f64 = 385_000.56;

/// Equatorial Earth radius in km, used for the horizontal parallax.
pub const EARTH_RADIUS_KM: f64 = 6_378.14;

/// Fundamental arguments in degrees, each reduced to `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalElements {
    /// L′, Moon's mean longitude.
    pub mean_longitude: f64,
    /// D, mean elongation of the Moon from the Sun.
    pub mean_elongation: f64,
    /// M′, Moon's mean anomaly.
    pub mean_anomaly_moon: f64,
    /// M, Sun's mean anomaly.
    pub mean_anomaly_sun: f64,
    /// F, Moon's argument of latitude.
    pub argument_of_latitude: f64,
    /// Ω, longitude of the ascending node.
    pub ascending_node: f64,
    /// Centuries since J2000 these elements were evaluated at.
    pub t: f64,
}

impl OrbitalElements {
    /// Evaluate the mean-element polynomials at `t` centuries since J2000.
    pub fn at(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;

        OrbitalElements {
            mean_longitude: normalize_degrees(
                218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
                    - t4 / 65_194_000.0,
            ),
            mean_elongation: normalize_degrees(
                297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
                    - t4 / 113_065_000.0,
            ),
            mean_anomaly_moon: normalize_degrees(
                134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
                    - t4 / 14_712_000.0,
            ),
            mean_anomaly_sun: normalize_degrees(
                357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0,
            ),
            argument_of_latitude: normalize_degrees(
                93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
                    + t4 / 863_310_000.0,
            ),
            ascending_node: normalize_degrees(
                125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t2 + t3 / 467_441.0
                    - t4 / 60_616_000.0,
            ),
            t,
        }
    }

    /// Eccentricity correction of the Earth's orbit applied to terms in M.
    pub fn eccentricity(&self) -> f64 {
        1.0 - 0.002_516 * self.t - 0.000_007_4 * self.t * self.t
    }

    /// Argument of a periodic term in degrees.
    fn argument(&self, k: &Multipliers) -> f64 {
        k[0] as f64 * self.mean_elongation
            + k[1] as f64 * self.mean_anomaly_sun
            + k[2] as f64 * self.mean_anomaly_moon
            + k[3] as f64 * self.argument_of_latitude
    }

    /// Amplitude scale for a term containing `m` multiples of the Sun's anomaly.
    fn eccentricity_scale(&self, k: &Multipliers) -> f64 {
        match k[1].abs() {
            0 => 1.0,
            1 => self.eccentricity(),
            _ => self.eccentricity().powi(2),
        }
    }
}

/// Multipliers of (D, M, M′, F).
pub type Multipliers = [i8; 4];

/// Σl (10⁻⁶ deg) and Σr (10⁻³ km) terms, table 47.A.
pub static LONGITUDE_DISTANCE_TERMS: [(Multipliers, f64, f64); 60] = [
    ([0, 0, 1, 0], 6_288_774.0, -20_905_355.0),
    ([2, 0, -1, 0], 1_274_027.0, -3_699_111.0),
    ([2, 0, 0, 0], 658_314.0, -2_955_968.0),
    ([0, 0, 2, 0], 213_618.0, -569_925.0),
    ([0, 1, 0, 0], -185_116.0, 48_888.0),
    ([0, 0, 0, 2], -114_332.0, -3_149.0),
    ([2, 0, -2, 0], 58_793.0, 246_158.0),
    ([2, -1, -1, 0], 57_066.0, -152_138.0),
    ([2, 0, 1, 0], 53_322.0, -170_733.0),
    ([2, -1, 0, 0], 45_758.0, -204_586.0),
    ([0, 1, -1, 0], -40_923.0, -129_620.0),
    ([1, 0, 0, 0], -34_720.0, 108_743.0),
    ([0, 1, 1, 0], -30_383.0, 104_755.0),
    ([2, 0, 0, -2], 15_327.0, 10_321.0),
    ([0, 0, 1, 2], -12_528.0, 0.0),
    ([0, 0, 1, -2], 10_980.0, 79_661.0),
    ([4, 0, -1, 0], 10_675.0, -34_782.0),
    ([0, 0, 3, 0], 10_034.0, -23_210.0),
    ([4, 0, -2, 0], 8_548.0, -21_636.0),
    ([2, 1, -1, 0], -7_888.0, 24_208.0),
    ([2, 1, 0, 0], -6_766.0, 30_824.0),
    ([1, 0, -1, 0], -5_163.0, -8_379.0),
    ([1, 1, 0, 0], 4_987.0, -16_675.0),
    ([2, -1, 1, 0], 4_036.0, -12_831.0),
    ([2, 0, 2, 0], 3_994.0, -10_445.0),
    ([4, 0, 0, 0], 3_861.0, -11_650.0),
    ([2, 0, -3, 0], 3_665.0, 14_403.0),
    ([0, 1, -2, 0], -2_689.0, -7_003.0),
    ([2, 0, -1, 2], -2_602.0, 0.0),
    ([2, -1, -2, 0], 2_390.0, 10_056.0),
    ([1, 0, 1, 0], -2_348.0, 6_322.0),
    ([2, -2, 0, 0], 2_236.0, -9_884.0),
    ([0, 1, 2, 0], -2_120.0, 5_751.0),
    ([0, 2, 0, 0], -2_069.0, 0.0),
    ([2, -2, -1, 0], 2_048.0, -4_950.0),
    ([2, 0, 1, -2], -1_773.0, 4_130.0),
    ([2, 0, 0, 2], -1_595.0, 0.0),
    ([4, -1, -1, 0], 1_215.0, -3_958.0),
    ([0, 0, 2, 2], -1_110.0, 0.0),
    ([3, 0, -1, 0], -892.0, 3_258.0),
    ([2, 1, 1, 0], -810.0, 2_616.0),
    ([4, -1, -2, 0], 759.0, -1_897.0),
    ([0, 2, -1, 0], -713.0, -2_117.0),
    ([2, 2, -1, 0], -700.0, 2_354.0),
    ([2, 1, -2, 0], 691.0, 0.0),
    ([2, -1, 0, -2], 596.0, 0.0),
    ([4, 0, 1, 0], 549.0, -1_423.0),
    ([0, 0, 4, 0], 537.0, -1_117.0),
    ([4, -1, 0, 0], 520.0, -1_571.0),
    ([1, 0, -2, 0], -487.0, -1_739.0),
    ([2, 1, 0, -2], -399.0, 0.0),
    ([0, 0, 2, -2], -381.0, -4_421.0),
    ([1, 1, 1, 0], 351.0, 0.0),
    ([3, 0, -2, 0], -340.0, 0.0),
    ([4, 0, -3, 0], 330.0, 0.0),
    ([2, -1, 2, 0], 327.0, 0.0),
    ([0, 2, 1, 0], -323.0, 1_165.0),
    ([1, 1, -1, 0], 299.0, 0.0),
    ([2, 0, 3, 0], 294.0, 0.0),
    ([2, 0, -1, -2], 0.0, 8_752.0),
];

/// Σb terms (10⁻⁶ deg), leading rows of table 47.B.
pub static LATITUDE_TERMS: [(Multipliers, f64); 30] = [
    ([0, 0, 0, 1], 5_128_122.0),
    ([0, 0, 1, 1], 280_602.0),
    ([0, 0, 1, -1], 277_693.0),
    ([2, 0, 0, -1], 173_237.0),
    ([2, 0, -1, 1], 55_413.0),
    ([2, 0, -1, -1], 46_271.0),
    ([2, 0, 0, 1], 32_573.0),
    ([0, 0, 2, 1], 17_198.0),
    ([2, 0, 1, -1], 9_266.0),
    ([0, 0, 2, -1], 8_822.0),
    ([2, -1, 0, -1], 8_216.0),
    ([2, 0, -2, -1], 4_324.0),
    ([2, 0, 1, 1], 4_200.0),
    ([2, 1, 0, -1], -3_359.0),
    ([2, -1, -1, 1], 2_463.0),
    ([2, -1, 0, 1], 2_211.0),
    ([2, -1, -1, -1], 2_065.0),
    ([0, 1, -1, -1], -1_870.0),
    ([4, 0, -1, -1], 1_828.0),
    ([0, 1, 0, 1], -1_794.0),
    ([0, 0, 0, 3], -1_749.0),
    ([0, 1, -1, 1], -1_565.0),
    ([1, 0, 0, 1], -1_491.0),
    ([0, 1, 1, 1], -1_475.0),
    ([0, 1, 1, -1], -1_410.0),
    ([0, 1, 0, -1], -1_344.0),
    ([1, 0, 0, -1], -1_335.0),
    ([0, 0, 3, 1], 1_107.0),
    ([4, 0, 0, -1], 1_021.0),
    ([4, 0, -1, 1], 833.0),
];

/// Geocentric ecliptic position of the Moon (mean equinox of date).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclipticPosition {
    /// λ in degrees, `[0, 360)`.
    pub longitude: f64,
    /// β in degrees.
    pub latitude: f64,
    /// Δ, centre-to-centre distance in km.
    pub distance_km: f64,
}

impl EclipticPosition {
    /// Equatorial horizontal parallax π in degrees.
    pub fn horizontal_parallax(&self) -> f64 {
        (EARTH_RADIUS_KM / self.distance_km).asin().to_degrees()
    }
}

/// Sum the periodic tables for the given elements.
pub fn ecliptic_position(el: &OrbitalElements) -> EclipticPosition {
    let mut sigma_l = 0.0;
    let mut sigma_r = 0.0;
    for (k, l, r) in LONGITUDE_DISTANCE_TERMS.iter() {
        let arg = el.argument(k).to_radians();
        let scale = el.eccentricity_scale(k);
        sigma_l += scale * l * arg.sin();
        sigma_r += scale * r * arg.cos();
    }

    let mut sigma_b = 0.0;
    for (k, b) in LATITUDE_TERMS.iter() {
        sigma_b += el.eccentricity_scale(k) * b * el.argument(k).to_radians().sin();
    }

    // Venus (A1), Jupiter (A2) and Earth flattening (L′) perturbations
    let a1 = (119.75 + 131.849 * el.t).to_radians();
    let a2 = (53.09 + 479_264.290 * el.t).to_radians();
    let a3 = (313.45 + 481_266.484 * el.t).to_radians();
    let lp = el.mean_longitude.to_radians();
    let mp = el.mean_anomaly_moon.to_radians();
    let f = el.argument_of_latitude.to_radians();

    sigma_l += 3_958.0 * a1.sin() + 1_962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sigma_b += -2_235.0 * lp.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - mp).sin()
        - 115.0 * (lp + mp).sin();

    EclipticPosition {
        longitude: normalize_degrees(el.mean_longitude + sigma_l / 1_000_000.0),
        latitude: sigma_b / 1_000_000.0,
        distance_km: MEAN_DISTANCE_KM + sigma_r / 1_000.0,
    }
}

/// Ecliptic and equatorial coordinates of the Moon at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonPosition {
    pub ecliptic: EclipticPosition,
    pub equatorial: EquatorialPosition,
}

/// Run the full position pipeline for a UT Julian Day.
pub fn moon_position(jd: f64, obliquity: ObliquityModel) -> MoonPosition {
    let t = centuries_since_j2000(jd);
    let ecliptic = ecliptic_position(&OrbitalElements::at(t));
    let equatorial = equatorial_position(&ecliptic, obliquity.degrees(t));
    MoonPosition {
        ecliptic,
        equatorial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Meeus example 47.a: 1992-04-12 0h TD.
    const EXAMPLE_JD: f64 = 2_448_724.5;

    #[test]
    fn mean_elements_match_meeus_example() {
        let el = OrbitalElements::at(centuries_since_j2000(EXAMPLE_JD));
        assert_abs_diff_eq!(el.mean_longitude, 134.290_182, epsilon = 1e-5);
        assert_abs_diff_eq!(el.mean_elongation, 113.842_304, epsilon = 1e-5);
        assert_abs_diff_eq!(el.mean_anomaly_sun, 97.643_514, epsilon = 1e-5);
        assert_abs_diff_eq!(el.mean_anomaly_moon, 5.150_833, epsilon = 1e-5);
        assert_abs_diff_eq!(el.argument_of_latitude, 219.889_721, epsilon = 1e-5);
        assert_abs_diff_eq!(el.eccentricity(), 1.000_194, epsilon = 1e-6);
    }

    #[test]
    fn ecliptic_position_matches_meeus_example() {
        let el = OrbitalElements::at(centuries_since_j2000(EXAMPLE_JD));
        let pos = ecliptic_position(&el);
        assert_abs_diff_eq!(pos.longitude, 133.162_655, epsilon = 0.01);
        assert_abs_diff_eq!(pos.latitude, -3.229_126, epsilon = 0.01);
        assert_abs_diff_eq!(pos.distance_km, 368_409.7, epsilon = 20.0);
        assert_abs_diff_eq!(pos.horizontal_parallax(), 0.991_990, epsilon = 1e-3);
    }

    #[test]
    fn elements_stay_normalized_across_centuries() {
        for t in [-20.0, -1.3, -0.077, 0.0, 0.2591, 3.7, 20.0] {
            let el = OrbitalElements::at(t);
            for v in [
                el.mean_longitude,
                el.mean_elongation,
                el.mean_anomaly_moon,
                el.mean_anomaly_sun,
                el.argument_of_latitude,
                el.ascending_node,
            ] {
                assert!((0.0..360.0).contains(&v), "element {v} out of range at T={t}");
            }
        }
    }

    #[test]
    fn latitude_and_distance_stay_physical() {
        // One draconic month at ~6 h steps
        for step in 0..110 {
            let jd = 2_460_000.5 + step as f64 * 0.25;
            let pos = ecliptic_position(&OrbitalElements::at(centuries_since_j2000(jd)));
            assert!(pos.latitude.abs() < 5.4, "β = {}", pos.latitude);
            assert!(
                (355_000.0..407_000.0).contains(&pos.distance_km),
                "Δ = {}",
                pos.distance_km
            );
            assert!((0.0..360.0).contains(&pos.longitude));
        }
    }

    #[test]
    fn moon_position_is_deterministic() {
        let a = moon_position(2_460_989.5, ObliquityModel::TimeVarying);
        let b = moon_position(2_460_989.5, ObliquityModel::TimeVarying);
        assert_eq!(a, b);
    }
}
