//! Low-precision solar and lunar positions
//!
//! Sun longitude uses the truncated solar theory (~0.01°, about 15 minutes
//! of time); new moons use the mean phase plus the principal periodic and
//! planetary corrections (well under a minute). Both are plenty for civil
//! calendar boundaries between 1900 and 2100.

use chrono::{Datelike, NaiveDate};

/// Julian Ephemeris Day of J2000.0
pub const J2000: f64 = 2_451_545.0;

/// Offset between chrono's day count (0001-01-01 = day 1) and the Julian day number
const JDN_CE_OFFSET: i64 = 1_721_425;

const SYNODIC_MONTH: f64 = 29.530_588_861;

const TROPICAL_YEAR: f64 = 365.242_2;

/// Julian day number (noon-based civil day) of a Gregorian date
pub fn jdn(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 + JDN_CE_OFFSET
}

/// Gregorian date of a Julian day number
pub fn date_from_jdn(jdn: i64) -> Option<NaiveDate> {
    i32::try_from(jdn - JDN_CE_OFFSET)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// ΔT = TT - UT in seconds (polynomial fits, 1900-2150)
pub fn delta_t_seconds(year: f64) -> f64 {
    if year < 1920.0 {
        let t = year - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
            - 0.000197 * t.powi(4)
    } else if year < 1941.0 {
        let t = year - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
    } else if year < 1961.0 {
        let t = year - 1950.0;
        29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
    } else if year < 1986.0 {
        let t = year - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    } else if year < 2005.0 {
        let t = year - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if year < 2050.0 {
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t.powi(2)
    } else {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u.powi(2) - 0.5628 * (2150.0 - year)
    }
}

fn decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - J2000) / 365.25
}

/// Convert a UT Julian date to Terrestrial Time
pub fn ut_to_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t_seconds(decimal_year(jd_ut)) / 86_400.0
}

/// Convert a Terrestrial Time Julian date to UT
pub fn tt_to_ut(jde: f64) -> f64 {
    jde - delta_t_seconds(decimal_year(jde)) / 86_400.0
}

/// Apparent geocentric longitude of the sun in degrees [0, 360)
pub fn sun_apparent_longitude(jde: f64) -> f64 {
    let t = (jde - J2000) / 36_525.0;
    let l0 = 280.46646 + 36_000.76983 * t + 0.0003032 * t * t;
    let m = (357.52911 + 35_999.05029 * t - 0.0001537 * t * t).to_radians();
    let center = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();
    let omega = (125.04 - 1934.136 * t).to_radians();
    (l0 + center - 0.00569 - 0.00478 * omega.sin()).rem_euclid(360.0)
}

/// JDE at which the sun reaches `target_deg`, searching from `approx_jde`
pub fn solar_longitude_crossing(target_deg: f64, approx_jde: f64) -> f64 {
    let mut jde = approx_jde;
    for _ in 0..30 {
        let diff = (target_deg - sun_apparent_longitude(jde) + 540.0).rem_euclid(360.0) - 180.0;
        let step = diff * TROPICAL_YEAR / 360.0;
        jde += step;
        if step.abs() < 1e-7 {
            break;
        }
    }
    jde
}

/// Planetary arguments (A1..A14) for the new-moon correction: (base, rate per lunation, amplitude)
const PLANETARY_TERMS: [(f64, f64, f64); 14] = [
    (299.77, 0.107408, 0.000325),
    (251.88, 0.016321, 0.000165),
    (251.83, 26.651886, 0.000164),
    (349.42, 36.412478, 0.000126),
    (84.66, 18.206239, 0.000110),
    (141.74, 53.303771, 0.000062),
    (207.14, 2.453732, 0.000060),
    (154.84, 7.306860, 0.000056),
    (34.52, 27.261239, 0.000047),
    (207.19, 0.121824, 0.000042),
    (291.34, 1.844379, 0.000040),
    (161.72, 24.198154, 0.000037),
    (239.56, 25.513099, 0.000035),
    (331.55, 3.592518, 0.000023),
];

/// JDE of the new moon with lunation number `k` (k = 0 near 2000-01-06)
pub fn new_moon_jde(k: i64) -> f64 {
    let k = k as f64;
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mean = 2_451_550.09766 + SYNODIC_MONTH * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;

    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let m = (2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3).to_radians();
    let mp = (201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3
        - 0.000000058 * t4)
        .to_radians();
    let f = (160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3
        + 0.000000011 * t4)
        .to_radians();
    let omega = (124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3).to_radians();

    let periodic = -0.40720 * mp.sin() + 0.17241 * e * m.sin() + 0.01608 * (2.0 * mp).sin()
        + 0.01039 * (2.0 * f).sin()
        + 0.00739 * e * (mp - m).sin()
        - 0.00514 * e * (mp + m).sin()
        + 0.00208 * e * e * (2.0 * m).sin()
        - 0.00111 * (mp - 2.0 * f).sin()
        - 0.00057 * (mp + 2.0 * f).sin()
        + 0.00056 * e * (2.0 * mp + m).sin()
        - 0.00042 * (3.0 * mp).sin()
        + 0.00042 * e * (m + 2.0 * f).sin()
        + 0.00038 * e * (m - 2.0 * f).sin()
        - 0.00024 * e * (2.0 * mp - m).sin()
        - 0.00017 * omega.sin()
        - 0.00007 * (mp + 2.0 * m).sin()
        + 0.00004 * (2.0 * mp - 2.0 * f).sin()
        + 0.00004 * (3.0 * m).sin()
        + 0.00003 * (mp + m - 2.0 * f).sin()
        + 0.00003 * (2.0 * mp + 2.0 * f).sin()
        - 0.00003 * (mp + m + 2.0 * f).sin()
        + 0.00003 * (mp - m + 2.0 * f).sin()
        - 0.00002 * (mp - m - 2.0 * f).sin()
        - 0.00002 * (3.0 * mp + m).sin()
        + 0.00002 * (4.0 * mp).sin();

    let planetary: f64 = PLANETARY_TERMS
        .iter()
        .enumerate()
        .map(|(i, &(base, rate, amplitude))| {
            let mut arg = base + rate * k;
            if i == 0 {
                arg -= 0.009173 * t2;
            }
            amplitude * arg.to_radians().sin()
        })
        .sum();

    mean + periodic + planetary
}

/// Lunation number whose mean new moon is closest before `jde`
pub fn lunation_before(jde: f64) -> i64 {
    ((jde - 2_451_550.09766) / SYNODIC_MONTH).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jdn_of_j2000() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(jdn(date), 2_451_545);
        assert_eq!(date_from_jdn(2_451_545), Some(date));
    }

    #[test]
    fn test_sun_longitude_near_equinox() {
        // 2000-03-20 07:35 UT is the March equinox
        let jde = ut_to_tt(2_451_623.816);
        let lon = sun_apparent_longitude(jde);
        let off = (lon + 180.0).rem_euclid(360.0) - 180.0;
        assert!(off.abs() < 0.05, "longitude {lon}");
    }

    #[test]
    fn test_first_new_moon_of_2000() {
        // 2000-01-06 18:14 UT
        let ut = tt_to_ut(new_moon_jde(0));
        assert!((ut - 2_451_550.259).abs() < 0.01, "got {ut}");
    }

    #[test]
    fn test_winter_solstice_2023() {
        // 2023-12-22 03:27 UT
        let approx = jdn(NaiveDate::from_ymd_opt(2023, 12, 21).unwrap()) as f64;
        let ut = tt_to_ut(solar_longitude_crossing(270.0, approx));
        let expected = jdn(NaiveDate::from_ymd_opt(2023, 12, 22).unwrap()) as f64 - 0.5
            + (3.0 + 27.0 / 60.0) / 24.0;
        assert!((ut - expected).abs() < 0.02, "got {ut}, expected {expected}");
    }
}
