//! Manse (만세력) - Solar/lunar conversion and four-pillar derivation
//!
//! Births are interpreted in Korea Standard Time by default. The year pillar
//! turns at 立春 (sun at 315°), the month pillar at each 節 (every 30° from
//! 315°), the day pillar at local midnight, and the hour pillar every two
//! hours starting 23:00. Births from 23:00 keep the calendar date's day
//! pillar but take the next day's stem for the 子 hour.

pub mod astro;
mod lunar;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::domain::entities::{
    BirthInput, EarthlyBranch, ElementTally, FourPillars, HeavenlyStem, LunarDate, Manse, Pillar,
    MAX_BIRTH_YEAR, MIN_BIRTH_YEAR,
};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::CalendarType;

pub use lunar::LunarMonth;
use lunar::LocalSky;

/// Korea Standard Time
pub const KST_OFFSET_HOURS: f64 = 9.0;

/// Day-cycle offset: (JDN + 49) mod 60 gives the sexagenary index (0 = 甲子)
const DAY_CYCLE_OFFSET: i64 = 49;

const NOON_SECONDS: u32 = 12 * 3600;

/// Calendar used to derive charts
#[derive(Debug, Clone, Copy)]
pub struct ManseCalendar {
    sky: LocalSky,
}

impl Default for ManseCalendar {
    fn default() -> Self {
        Self::with_utc_offset(KST_OFFSET_HOURS)
    }
}

impl ManseCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_utc_offset(utc_offset_hours: f64) -> Self {
        Self {
            sky: LocalSky { utc_offset_hours },
        }
    }

    /// Derive the full chart for a validated birth input
    pub fn manse(&self, birth: &BirthInput) -> Result<Manse, DomainError> {
        let (solar_date, lunar_date) = match birth.calendar_type {
            CalendarType::Solar => {
                let solar = NaiveDate::from_ymd_opt(birth.year, birth.month, birth.day)
                    .ok_or_else(|| {
                        DomainError::validation(format!(
                            "존재하지 않는 양력 날짜입니다: {}",
                            birth.birth_date_label()
                        ))
                    })?;
                (solar, self.solar_to_lunar(solar)?)
            }
            CalendarType::Lunar => {
                let lunar = LunarDate {
                    year: birth.year,
                    month: birth.month,
                    day: birth.day,
                    is_leap_month: birth.is_leap_month,
                };
                (self.lunar_to_solar(lunar)?, lunar)
            }
        };

        let pillars = self.four_pillars(solar_date, birth.time);
        let elements = ElementTally::from_glyphs(pillars.glyphs());

        tracing::debug!(
            "Manse for {} ({}): {}",
            birth.birth_date_label(),
            birth.calendar_type,
            pillars.display_line()
        );

        Ok(Manse {
            solar_date,
            lunar_date,
            pillars,
            elements,
        })
    }

    /// Four pillars of a local (KST) solar date and optional clock time.
    ///
    /// Without a time, year and month are evaluated at local noon and the hour pillar is omitted.
    pub fn four_pillars(&self, date: NaiveDate, time: Option<NaiveTime>) -> FourPillars {
        let day_number = astro::jdn(date);

        let seconds = time
            .map(|t| t.num_seconds_from_midnight())
            .unwrap_or(NOON_SECONDS);
        let local_days = seconds as f64 / 86_400.0;
        let jd_ut = day_number as f64 - 0.5 + local_days - self.sky.utc_offset_hours / 24.0;
        let longitude = astro::sun_apparent_longitude(astro::ut_to_tt(jd_ut));

        // Before 立春 in January/February still belongs to the previous year
        let mut year = date.year() as i64;
        if date.month() <= 2 && (270.0..315.0).contains(&longitude) {
            year -= 1;
        }
        let year_pillar = Pillar::from_cycle_index(year - 4);

        // 0 = 寅 month (立春 .. 驚蟄)
        let month_offset = ((longitude - 315.0).rem_euclid(360.0) / 30.0).floor() as i64;
        let month_pillar = Pillar::new(
            HeavenlyStem::from_index(year_pillar.stem.index() as i64 * 2 + 2 + month_offset),
            EarthlyBranch::from_index(month_offset + 2),
        );

        let day_pillar = Pillar::from_cycle_index(day_number + DAY_CYCLE_OFFSET);

        let hour_pillar = time.map(|t| {
            let branch = EarthlyBranch::from_hour(t.hour());
            let stem_day = if t.hour() == 23 {
                Pillar::from_cycle_index(day_number + 1 + DAY_CYCLE_OFFSET)
            } else {
                day_pillar
            };
            Pillar::new(
                HeavenlyStem::from_index(
                    (stem_day.stem.index() % 5) as i64 * 2 + branch.index() as i64,
                ),
                branch,
            )
        });

        FourPillars {
            year: year_pillar,
            month: month_pillar,
            day: day_pillar,
            hour: hour_pillar,
        }
    }

    /// Months of lunar year `year` in order, including any leap month
    pub fn lunar_year_months(&self, year: i32) -> Vec<LunarMonth> {
        let previous = self.sky.sui_months(year - 1);
        let current = self.sky.sui_months(year);

        let first_month = previous
            .iter()
            .position(|m| m.number == 1 && !m.is_leap)
            .unwrap_or(0);
        let next_new_year = current
            .iter()
            .position(|m| m.number == 1 && !m.is_leap)
            .unwrap_or(current.len());

        previous[first_month..]
            .iter()
            .chain(current[..next_new_year].iter())
            .copied()
            .collect()
    }

    /// Convert a lunar date to the solar (Gregorian) date
    pub fn lunar_to_solar(&self, date: LunarDate) -> Result<NaiveDate, DomainError> {
        check_year(date.year)?;

        let month = self
            .lunar_year_months(date.year)
            .into_iter()
            .find(|m| m.number == date.month && m.is_leap == date.is_leap_month)
            .ok_or_else(|| {
                if date.is_leap_month {
                    DomainError::validation(format!(
                        "음력 {}년에는 윤{}월이 없습니다",
                        date.year, date.month
                    ))
                } else {
                    DomainError::validation(format!(
                        "음력 {}년 {}월을 찾을 수 없습니다",
                        date.year, date.month
                    ))
                }
            })?;

        if date.day < 1 || date.day > month.length {
            return Err(DomainError::validation(format!(
                "음력 {}년 {}월은 {}일까지 있습니다 (입력: {}일)",
                date.year, date.month, month.length, date.day
            )));
        }

        astro::date_from_jdn(month.start_jdn + date.day as i64 - 1)
            .ok_or_else(|| DomainError::validation(format!("변환할 수 없는 음력 날짜입니다: {}", date)))
    }

    /// Convert a solar (Gregorian) date to the lunar date
    pub fn solar_to_lunar(&self, date: NaiveDate) -> Result<LunarDate, DomainError> {
        check_year(date.year())?;

        let target = astro::jdn(date);
        for lunar_year in [date.year(), date.year() - 1] {
            if let Some(month) = self
                .lunar_year_months(lunar_year)
                .into_iter()
                .find(|m| m.contains(target))
            {
                return Ok(LunarDate {
                    year: lunar_year,
                    month: month.number,
                    day: (target - month.start_jdn + 1) as u32,
                    is_leap_month: month.is_leap,
                });
            }
        }

        Err(DomainError::validation(format!(
            "음력으로 변환할 수 없는 날짜입니다: {}",
            date
        )))
    }

}

fn check_year(year: i32) -> Result<(), DomainError> {
    if (MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "지원하지 않는 연도입니다: {} ({}~{})",
            year, MIN_BIRTH_YEAR, MAX_BIRTH_YEAR
        )))
    }
}
