//! Saju API Client

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::view::FortuneSubmission;

/// API Client for the Saju server
pub struct SajuClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Clone, Deserialize)]
pub struct PillarResponse {
    pub hanja: String,
    pub hangul: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PillarsResponse {
    pub year: PillarResponse,
    pub month: PillarResponse,
    pub day: PillarResponse,
    pub hour: Option<PillarResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementsResponse {
    pub wood: u8,
    pub fire: u8,
    pub earth: u8,
    pub metal: u8,
    pub water: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManseResponse {
    pub solar_date: String,
    pub lunar_date: String,
    pub pillars: PillarsResponse,
    pub elements: ElementsResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeResponse {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Either shape `/api/fortune` returns
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FortuneOutcome {
    Report {
        manse: ManseResponse,
        commentary: String,
        themes: Vec<ThemeResponse>,
    },
    Simple {
        result: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub summary: String,
    pub provider: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetail {
    #[serde(flatten)]
    pub item: HistoryItem,
    pub result: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub display_name: String,
    pub anonymous: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: String,
}

impl SajuClient {
    /// Create a new API client
    pub fn new(base_url: &str, access_token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.map(str::to_string),
        }
    }

    /// Browser URL that starts the Kakao login and returns to the server page
    pub fn login_url(&self) -> String {
        let redirect_to = format!("{}/", self.base_url);
        format!(
            "{}/auth/login?redirect_to={}",
            self.base_url,
            urlencoding::encode(&redirect_to)
        )
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    pub async fn me(&self) -> Result<MeResponse> {
        let request = self.client.get(format!("{}/api/me", self.base_url));
        self.send(request).await
    }

    /// Submit a validated form
    pub async fn fortune(&self, submission: &FortuneSubmission) -> Result<FortuneOutcome> {
        let request = self
            .client
            .post(format!("{}/api/fortune", self.base_url))
            .json(submission);
        self.send(request).await
    }

    /// Same request as `fortune`, kept as untyped JSON
    pub async fn fortune_raw(&self, submission: &FortuneSubmission) -> Result<serde_json::Value> {
        let request = self
            .client
            .post(format!("{}/api/fortune", self.base_url))
            .json(submission);
        self.send(request).await
    }

    pub async fn history(&self, limit: i64) -> Result<Vec<HistoryItem>> {
        let request = self
            .client
            .get(format!("{}/api/history", self.base_url))
            .query(&[("limit", limit)]);
        self.send(request).await
    }

    pub async fn history_detail(&self, id: Uuid) -> Result<HistoryDetail> {
        let request = self
            .client
            .get(format!("{}/api/history/{}", self.base_url, id));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let resp = request
            .send()
            .await
            .context("Failed to connect to Saju API")?;

        let status = resp.status();
        tracing::debug!("{} {}", status, resp.url());

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) if err.details.is_empty() => bail!("{}", err.error),
                Ok(err) => bail!("{} ({})", err.error, err.details),
                Err(_) => bail!("API error ({}): {}", status, body),
            }
        }

        resp.json().await.context("Failed to parse response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_url_encodes_redirect() {
        let client = SajuClient::new("https://saju.example.com/", None);
        assert_eq!(
            client.login_url(),
            "https://saju.example.com/auth/login?redirect_to=https%3A%2F%2Fsaju.example.com%2F"
        );
    }

    #[test]
    fn test_outcome_shapes() {
        let simple: FortuneOutcome = serde_json::from_value(json!({"result": "좋은 해"})).unwrap();
        assert!(matches!(simple, FortuneOutcome::Simple { ref result } if result == "좋은 해"));

        let report: FortuneOutcome = serde_json::from_value(json!({
            "manse": {
                "solarDate": "1990-05-15",
                "lunarDate": "1990년 4월 21일",
                "isLeapMonth": false,
                "pillars": {
                    "year": {"hanja": "庚午", "hangul": "경오"},
                    "month": {"hanja": "辛巳", "hangul": "신사"},
                    "day": {"hanja": "庚辰", "hangul": "경진"},
                    "hour": null
                },
                "elements": {"wood": 0, "fire": 2, "earth": 1, "metal": 3, "water": 0}
            },
            "commentary": "c",
            "themes": [{"icon": "🔥", "title": "T", "content": "C"}]
        }))
        .unwrap();
        match report {
            FortuneOutcome::Report { manse, themes, .. } => {
                assert!(manse.pillars.hour.is_none());
                assert_eq!(themes.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_list_and_me_payloads_parse() {
        let item: HistoryItem = serde_json::from_value(json!({
            "id": "6f1c2a7e-8d3b-4c55-9a0e-1b2c3d4e5f60",
            "summary": "1990-5-15 남성 양력",
            "provider": "openai",
            "birthTime": "14:30",
            "createdAt": "2024-02-10T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.provider, "openai");

        let me: MeResponse = serde_json::from_value(json!({
            "id": "kakao-user", "name": null, "email": null,
            "displayName": "홍길동", "anonymous": false
        }))
        .unwrap();
        assert_eq!(me.display_name, "홍길동");
        assert!(!me.anonymous);
    }
}
