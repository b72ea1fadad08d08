//! PostgreSQL implementation of HistoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use saju::{DomainError, HistoryRecord, HistoryRepository, NewHistoryRecord};

/// PostgreSQL implementation of HistoryRepository
pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    user_id: String,
    birth_year: i32,
    birth_month: i32,
    birth_day: i32,
    birth_time: Option<String>,
    gender: String,
    calendar_type: String,
    is_leap_month: bool,
    birth_date: String,
    provider: String,
    prompt: String,
    result: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<HistoryRow> for HistoryRecord {
    type Error = DomainError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            birth_year: row.birth_year,
            birth_month: row.birth_month,
            birth_day: row.birth_day,
            birth_time: row.birth_time,
            gender: row.gender.parse().map_err(DomainError::Repository)?,
            calendar_type: row.calendar_type.parse().map_err(DomainError::Repository)?,
            is_leap_month: row.is_leap_month,
            birth_date: row.birth_date,
            provider: row.provider.parse().map_err(DomainError::Repository)?,
            prompt: row.prompt,
            result: row.result,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn insert(&self, record: NewHistoryRecord) -> Result<HistoryRecord, DomainError> {
        let record = record.into_record();

        let row = sqlx::query_as::<_, HistoryRow>(
            r#"
            INSERT INTO user_history (
                id, user_id, birth_year, birth_month, birth_day, birth_time,
                gender, calendar_type, is_leap_month, birth_date, provider,
                prompt, result, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(&record.user_id)
        .bind(record.birth_year)
        .bind(record.birth_month)
        .bind(record.birth_day)
        .bind(&record.birth_time)
        .bind(record.gender.to_string())
        .bind(record.calendar_type.to_string())
        .bind(record.is_leap_month)
        .bind(&record.birth_date)
        .bind(record.provider.to_string())
        .bind(&record.prompt)
        .bind(&record.result)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, DomainError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT * FROM user_history WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_id(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> Result<Option<HistoryRecord>, DomainError> {
        let row = sqlx::query_as::<_, HistoryRow>(
            "SELECT * FROM user_history WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }
}
