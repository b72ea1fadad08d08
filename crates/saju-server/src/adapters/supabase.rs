//! Supabase Auth adapter
//!
//! Tokens are verified by asking Supabase for the user they belong to.
//! Kakao is configured as the OAuth provider on the Supabase project.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use saju::{AuthUser, DomainError, IdentityProvider};

use crate::config::SupabaseConfig;

const PROVIDER_NAME: &str = "supabase";
const OAUTH_PROVIDER: &str = "kakao";

pub struct SupabaseAuth {
    client: Client,
    url: String,
    anon_key: String,
}

#[derive(Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl SupabaseUser {
    /// Kakao puts the nickname in one of several metadata keys
    fn display_name(&self) -> Option<String> {
        ["name", "full_name", "nickname", "preferred_username"]
            .iter()
            .find_map(|key| self.user_metadata.get(*key).and_then(|v| v.as_str()))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

impl From<SupabaseUser> for AuthUser {
    fn from(user: SupabaseUser) -> Self {
        Self {
            name: user.display_name(),
            id: user.id,
            email: user.email.filter(|e| !e.is_empty()),
        }
    }
}

impl SupabaseAuth {
    pub fn new(config: &SupabaseConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn verify(&self, access_token: &str) -> Result<AuthUser, DomainError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| DomainError::Network(format!("supabase request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DomainError::Unauthorized(
                "Invalid or expired session".to_string(),
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DomainError::Upstream {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let user: SupabaseUser = response
            .json()
            .await
            .map_err(|e| DomainError::malformed(PROVIDER_NAME, e.to_string()))?;

        Ok(user.into())
    }

    fn authorize_url(&self, redirect_to: &str) -> String {
        let base = format!("{}/auth/v1/authorize", self.url);
        match Url::parse_with_params(
            &base,
            &[("provider", OAUTH_PROVIDER), ("redirect_to", redirect_to)],
        ) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("⚠️  Invalid SUPABASE_URL for authorize: {}", e);
                format!("{}?provider={}", base, OAUTH_PROVIDER)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> SupabaseAuth {
        SupabaseAuth::new(&SupabaseConfig {
            url: "https://abc.supabase.co/".to_string(),
            anon_key: "anon".to_string(),
        })
    }

    #[test]
    fn test_authorize_url() {
        let url = auth().authorize_url("https://saju.example.com/");
        assert_eq!(
            url,
            "https://abc.supabase.co/auth/v1/authorize?provider=kakao&redirect_to=https%3A%2F%2Fsaju.example.com%2F"
        );
    }

    #[test]
    fn test_user_mapping_prefers_metadata_name() {
        let user: SupabaseUser = serde_json::from_value(serde_json::json!({
            "id": "3f1c",
            "email": "",
            "user_metadata": {"full_name": "홍길동", "avatar_url": "x"}
        }))
        .unwrap();
        let user: AuthUser = user.into();
        assert_eq!(user.id, "3f1c");
        assert_eq!(user.name.as_deref(), Some("홍길동"));
        assert!(user.email.is_none());
    }

    #[test]
    fn test_user_mapping_without_metadata() {
        let user: SupabaseUser =
            serde_json::from_value(serde_json::json!({"id": "u1", "email": "a@b.c"})).unwrap();
        let user: AuthUser = user.into();
        assert!(user.name.is_none());
        assert_eq!(user.display_name(), "a");
    }
}
