//! History Application Service (Use Case)
//!
//! Stores and lists a user's past analyses.

use std::sync::Arc;
use uuid::Uuid;

use saju::ports::clamp_history_limit;
use saju::{DomainError, HistoryRecord, HistoryRepository, NewHistoryRecord};

/// Application service for history operations
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    pub fn new(repo: Arc<dyn HistoryRepository>) -> Self {
        Self { repo }
    }

    /// Store a completed analysis
    pub async fn record(&self, record: NewHistoryRecord) -> Result<HistoryRecord, DomainError> {
        let saved = self.repo.insert(record).await?;
        tracing::info!(
            "📝 Saved history {} for user {} ({})",
            saved.id,
            saved.user_id,
            saved.birth_date
        );
        Ok(saved)
    }

    /// Most recent records first, `limit` clamped to the allowed range
    pub async fn list(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<HistoryRecord>, DomainError> {
        self.repo
            .find_by_user(user_id, clamp_history_limit(limit))
            .await
    }

    /// One record owned by `user_id`
    pub async fn get(&self, user_id: &str, id: Uuid) -> Result<HistoryRecord, DomainError> {
        self.repo
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("History", id))
    }
}
