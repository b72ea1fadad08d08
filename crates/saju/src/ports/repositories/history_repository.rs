//! History Repository Port
//!
//! Persistence of analysis submissions, scoped per user.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{HistoryRecord, NewHistoryRecord};
use crate::domain::errors::DomainError;

/// Default and upper bound for history listings
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Store a submission and return the stored record
    async fn insert(&self, record: NewHistoryRecord) -> Result<HistoryRecord, DomainError>;

    /// A user's records, newest first
    async fn find_by_user(&self, user_id: &str, limit: i64)
        -> Result<Vec<HistoryRecord>, DomainError>;

    /// One record, only if it belongs to `user_id`
    async fn find_by_id(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> Result<Option<HistoryRecord>, DomainError>;
}

/// Clamp a requested listing size into `1..=MAX_HISTORY_LIMIT`
pub fn clamp_history_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_history_limit() {
        assert_eq!(clamp_history_limit(None), DEFAULT_HISTORY_LIMIT);
        assert_eq!(clamp_history_limit(Some(0)), 1);
        assert_eq!(clamp_history_limit(Some(-5)), 1);
        assert_eq!(clamp_history_limit(Some(50)), 50);
        assert_eq!(clamp_history_limit(Some(10_000)), MAX_HISTORY_LIMIT);
    }
}
