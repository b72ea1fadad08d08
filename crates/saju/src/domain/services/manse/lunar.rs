//! Korean lunar calendar months
//!
//! A "sui" runs from the month containing one winter solstice to the month
//! containing the next. Month 11 holds the solstice; when a sui has 13
//! months, the first month without a principal term (中氣) is the leap month
//! and repeats the previous month's number.

use super::astro;

/// One lunar month, located by the local civil date of its new moon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarMonth {
    pub number: u32,
    pub is_leap: bool,
    pub start_jdn: i64,
    pub length: u32,
}

impl LunarMonth {
    pub fn contains(&self, jdn: i64) -> bool {
        jdn >= self.start_jdn && jdn < self.start_jdn + self.length as i64
    }
}

/// Time-zone aware helpers shared by the month computations
#[derive(Debug, Clone, Copy)]
pub(super) struct LocalSky {
    pub utc_offset_hours: f64,
}

impl LocalSky {
    /// Local civil date (JDN) of a TT instant
    pub fn local_jdn(&self, jde: f64) -> i64 {
        (astro::tt_to_ut(jde) + 0.5 + self.utc_offset_hours / 24.0).floor() as i64
    }

    /// TT instant of local midnight starting civil date `jdn`
    pub fn local_midnight_jde(&self, jdn: i64) -> f64 {
        astro::ut_to_tt(jdn as f64 - 0.5 - self.utc_offset_hours / 24.0)
    }

    /// Local date of the winter solstice in Gregorian `year`
    fn winter_solstice_jdn(&self, year: i32) -> i64 {
        let approx = chrono::NaiveDate::from_ymd_opt(year, 12, 21)
            .map(|d| astro::jdn(d) as f64)
            .unwrap_or_else(|| astro::J2000 + (year - 2000) as f64 * 365.2422 + 355.0);
        self.local_jdn(astro::solar_longitude_crossing(270.0, approx))
    }

    fn new_moon_jdn(&self, k: i64) -> i64 {
        self.local_jdn(astro::new_moon_jde(k))
    }

    /// Lunation whose new moon falls on or before local date `jdn`
    fn lunation_on_or_before(&self, jdn: i64) -> i64 {
        let mut k = astro::lunation_before(jdn as f64);
        while self.new_moon_jdn(k) > jdn {
            k -= 1;
        }
        while self.new_moon_jdn(k + 1) <= jdn {
            k += 1;
        }
        k
    }

    /// 30° sector (principal-term index) of the sun at local midnight of `jdn`
    fn sector_at(&self, jdn: i64) -> i64 {
        (astro::sun_apparent_longitude(self.local_midnight_jde(jdn)) / 30.0).floor() as i64
    }

    /// Months of the sui starting with the month 11 that holds the winter solstice of `year`
    pub fn sui_months(&self, year: i32) -> Vec<LunarMonth> {
        let first_k = self.lunation_on_or_before(self.winter_solstice_jdn(year));
        let next_k = self.lunation_on_or_before(self.winter_solstice_jdn(year + 1));

        let starts: Vec<i64> = (first_k..=next_k).map(|k| self.new_moon_jdn(k)).collect();
        let month_count = starts.len() - 1;

        let leap_index = if month_count == 13 {
            (1..month_count).find(|&i| self.sector_at(starts[i]) == self.sector_at(starts[i + 1]))
        } else {
            None
        };

        let mut months = Vec::with_capacity(month_count);
        let mut number = 10;
        for i in 0..month_count {
            let is_leap = leap_index == Some(i);
            if !is_leap {
                number = number % 12 + 1;
            }
            months.push(LunarMonth {
                number,
                is_leap,
                start_jdn: starts[i],
                length: (starts[i + 1] - starts[i]) as u32,
            });
        }
        months
    }
}
