//! LLM Provider Adapters
//!
//! reqwest clients for the hosted chat-completion APIs. One request per
//! call, no retries.

mod anthropic;
mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use saju::DomainError;

/// Upper bound for a single completion request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn build_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("⚠️  Failed to build HTTP client ({}), using defaults", e);
            Client::new()
        })
}

fn require_key<'a>(key: &'a Option<String>, name: &str) -> Result<&'a str, DomainError> {
    key.as_deref()
        .ok_or_else(|| DomainError::MissingCredential(name.to_string()))
}

fn map_transport_error(provider: &str, err: reqwest::Error) -> DomainError {
    if err.is_timeout() {
        DomainError::Network(format!("{} request timed out", provider))
    } else {
        DomainError::Network(format!("{} request failed: {}", provider, err))
    }
}

/// Non-2xx response, preferring the API's `error.message`
fn map_http_error(provider: &str, status: StatusCode, body: String) -> DomainError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    DomainError::Upstream {
        provider: provider.to_string(),
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_extracts_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        match map_http_error("openai", StatusCode::UNAUTHORIZED, body.to_string()) {
            DomainError::Upstream {
                provider,
                status,
                message,
            } => {
                assert_eq!(provider, "openai");
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_keeps_raw_body() {
        let err = map_http_error("anthropic", StatusCode::BAD_GATEWAY, "upstream down".into());
        assert!(err.to_string().contains("upstream down"));
        assert_eq!(err.kind(), "upstream");
    }

    #[test]
    fn test_require_key() {
        assert_eq!(require_key(&Some("k".into()), "OPENAI_API_KEY").unwrap(), "k");
        let err = require_key(&None, "OPENAI_API_KEY").unwrap_err();
        assert_eq!(err.kind(), "missing_credential");
    }
}
