//! API error responses
//!
//! Every failure is rendered as `{ error, details, kind }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use saju::DomainError;

/// Shown to users for every failure that is not their own input
pub const GENERIC_ERROR_MESSAGE: &str = "분석 중 오류가 발생했습니다.";

/// Error payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// User-facing message
    pub error: String,
    /// Underlying cause
    pub details: String,
    /// Machine-readable kind (validation, unauthorized, not_found, upstream, ...)
    pub kind: String,
}

/// Handler error wrapping a domain error
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match &self.0 {
            DomainError::Validation(message) => message.clone(),
            DomainError::Unauthorized(_) => "로그인이 필요합니다.".to_string(),
            DomainError::NotFound { .. } => "기록을 찾을 수 없습니다.".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {}", self.0);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self.0);
        }

        let body = ErrorResponse {
            error: self.user_message(),
            details: self.0.to_string(),
            kind: self.0.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                DomainError::Unauthorized("no".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::not_found("History", uuid::Uuid::nil()),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::MissingCredential("OPENAI_API_KEY".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::Network("timeout".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::malformed("openai", "no choices"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn test_messages() {
        let err = ApiError(DomainError::validation("필수 정보(년, 월, 일)를 모두 입력해주세요!"));
        assert_eq!(err.user_message(), "필수 정보(년, 월, 일)를 모두 입력해주세요!");

        let err = ApiError(DomainError::Repository("connection reset".into()));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
