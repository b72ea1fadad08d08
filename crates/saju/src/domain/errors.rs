//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Missing credential: {0} is not configured")]
    MissingCredential(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream error from {provider} ({status}): {message}")]
    Upstream {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    #[error("Repository error: {0}")]
    Repository(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: Uuid) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, used in API error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::Unauthorized(_) => "unauthorized",
            DomainError::NotFound { .. } => "not_found",
            DomainError::MissingCredential(_) => "missing_credential",
            DomainError::Network(_) => "network",
            DomainError::Upstream { .. } => "upstream",
            DomainError::MalformedResponse { .. } => "malformed_response",
            DomainError::Repository(_) => "repository",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(DomainError::validation("x").kind(), "validation");
        assert_eq!(
            DomainError::MissingCredential("OPENAI_API_KEY".into()).kind(),
            "missing_credential"
        );
        let err = DomainError::Upstream {
            provider: "openai".into(),
            status: 429,
            message: "slow down".into(),
        };
        assert_eq!(err.kind(), "upstream");
        assert_eq!(
            err.to_string(),
            "Upstream error from openai (429): slow down"
        );
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = DomainError::not_found("HistoryRecord", id);
        assert!(err.to_string().contains("HistoryRecord"));
        assert_eq!(err.kind(), "not_found");
    }
}
