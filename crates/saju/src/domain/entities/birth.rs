//! Birth - The user's birth information as submitted on the form
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CalendarType, Gender};

/// Supported range for birth years (inclusive)
pub const MIN_BIRTH_YEAR: i32 = 1900;
pub const MAX_BIRTH_YEAR: i32 = 2100;

/// Message shown when any of year, month or day is missing
pub const MISSING_REQUIRED_FIELDS: &str = "필수 정보(년, 월, 일)를 모두 입력해주세요!";

/// Validated birth input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub time: Option<NaiveTime>,
    pub gender: Gender,
    pub calendar_type: CalendarType,
    /// Only meaningful for lunar dates
    #[serde(default)]
    pub is_leap_month: bool,
}

impl BirthInput {
    /// Build a birth input, checking ranges.
    ///
    /// Lunar dates are only range-checked here; whether the day exists in
    /// that lunar month is decided by the manse calendar.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        time: Option<NaiveTime>,
        gender: Gender,
        calendar_type: CalendarType,
        is_leap_month: bool,
    ) -> Result<Self, DomainError> {
        if !(MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&year) {
            return Err(DomainError::validation(format!(
                "출생년도는 {}~{} 사이여야 합니다 (입력: {})",
                MIN_BIRTH_YEAR, MAX_BIRTH_YEAR, year
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "월은 1~12 사이여야 합니다 (입력: {})",
                month
            )));
        }

        match calendar_type {
            CalendarType::Solar => {
                if NaiveDate::from_ymd_opt(year, month, day).is_none() {
                    return Err(DomainError::validation(format!(
                        "존재하지 않는 양력 날짜입니다: {}-{}-{}",
                        year, month, day
                    )));
                }
            }
            CalendarType::Lunar => {
                if !(1..=30).contains(&day) {
                    return Err(DomainError::validation(format!(
                        "음력 일자는 1~30 사이여야 합니다 (입력: {})",
                        day
                    )));
                }
            }
        }

        Ok(Self {
            year,
            month,
            day,
            time,
            gender,
            calendar_type,
            is_leap_month: calendar_type == CalendarType::Lunar && is_leap_month,
        })
    }

    /// Parse an `HH:MM` (or `HH:MM:SS`) time string; empty means unknown
    pub fn parse_time(raw: &str) -> Result<Option<NaiveTime>, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(Some)
            .map_err(|_| DomainError::validation(format!("잘못된 시간 형식입니다: {}", raw)))
    }

    /// Birth time label for prompts ("14:30" or "모름")
    pub fn time_label(&self) -> String {
        self.time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "모름".to_string())
    }

    /// Calendar label including the leap marker ("양력", "음력", "음력 윤달")
    pub fn calendar_label(&self) -> String {
        if self.is_leap_month {
            format!("{} 윤달", self.calendar_type.korean())
        } else {
            self.calendar_type.korean().to_string()
        }
    }

    /// Date as stored in history rows (`Y-M-D`, no zero padding)
    pub fn birth_date_label(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }
}
