//! History DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use saju::HistoryRecord;

/// Query for listing history
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Maximum entries (1-100, default 20)
    pub limit: Option<i64>,
}

/// One entry in a history listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemResponse {
    pub id: Uuid,
    pub birth_year: i32,
    pub birth_month: i32,
    pub birth_day: i32,
    pub birth_time: Option<String>,
    pub gender: String,
    pub calendar_type: String,
    pub is_leap_month: bool,
    pub birth_date: String,
    pub provider: String,
    /// e.g. "📅 1990-5-15 | 남 | 양력"
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl From<&HistoryRecord> for HistoryItemResponse {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            id: record.id,
            birth_year: record.birth_year,
            birth_month: record.birth_month,
            birth_day: record.birth_day,
            birth_time: record.birth_time.clone(),
            gender: record.gender.to_string(),
            calendar_type: record.calendar_type.to_string(),
            is_leap_month: record.is_leap_month,
            birth_date: record.birth_date.clone(),
            provider: record.provider.to_string(),
            summary: record.summary_line(),
            created_at: record.created_at,
        }
    }
}

/// A stored analysis with its prompt and result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetailResponse {
    #[serde(flatten)]
    pub item: HistoryItemResponse,
    pub prompt: String,
    /// The response body returned when the analysis ran
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
}

impl From<HistoryRecord> for HistoryDetailResponse {
    fn from(record: HistoryRecord) -> Self {
        Self {
            item: (&record).into(),
            prompt: record.prompt,
            result: record.result,
        }
    }
}
