//! History - A stored submission (input, prompt and result)
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::birth::BirthInput;
use crate::domain::value_objects::{CalendarType, Gender, Provider};

/// HistoryRecord - one row of a user's history, never updated after insert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub user_id: String,
    pub birth_year: i32,
    pub birth_month: i32,
    pub birth_day: i32,
    pub birth_time: Option<String>,
    pub gender: Gender,
    pub calendar_type: CalendarType,
    pub is_leap_month: bool,
    pub birth_date: String,
    pub provider: Provider,
    pub prompt: String,
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a history record
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub user_id: String,
    pub birth: BirthInput,
    pub provider: Provider,
    pub prompt: String,
    pub result: serde_json::Value,
}

impl NewHistoryRecord {
    pub fn new(
        user_id: impl Into<String>,
        birth: BirthInput,
        provider: Provider,
        prompt: impl Into<String>,
        result: serde_json::Value,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            birth,
            provider,
            prompt: prompt.into(),
            result,
        }
    }

    /// Materialise the record with a fresh id and timestamp
    pub fn into_record(self) -> HistoryRecord {
        HistoryRecord {
            id: Uuid::new_v4(),
            birth_year: self.birth.year,
            birth_month: self.birth.month as i32,
            birth_day: self.birth.day as i32,
            birth_time: self.birth.time.map(|t| t.format("%H:%M").to_string()),
            gender: self.birth.gender,
            calendar_type: self.birth.calendar_type,
            is_leap_month: self.birth.is_leap_month,
            birth_date: self.birth.birth_date_label(),
            user_id: self.user_id,
            provider: self.provider,
            prompt: self.prompt,
            result: self.result,
            created_at: Utc::now(),
        }
    }
}

impl HistoryRecord {
    /// One-line listing, e.g. "📅 1990-5-15 | 남 | 양력"
    pub fn summary_line(&self) -> String {
        format!(
            "📅 {}-{}-{} | {} | {}",
            self.birth_year,
            self.birth_month,
            self.birth_day,
            self.gender.short_korean(),
            self.calendar_type.korean()
        )
    }
}
