//! OpenAI Chat Completions adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use saju::{
    ChatMessage, CompletionOptions, CompletionResponse, DomainError, LlmProvider, Provider,
    TokenUsage,
};

use super::{build_client, map_http_error, map_transport_error, require_key};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const PROVIDER_NAME: &str = "openai";

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: build_client(),
            api_key,
            model: crate::config::DEFAULT_OPENAI_MODEL.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let api_key = require_key(&self.api_key, "OPENAI_API_KEY")?;

        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            response_format: options.json_response.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!("🤖 OpenAI request: model={}", self.model);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error(PROVIDER_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(PROVIDER_NAME, status, body));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::malformed(PROVIDER_NAME, e.to_string()))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DomainError::malformed(PROVIDER_NAME, "response had no choices"))?;

        let usage = payload
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: payload.model.unwrap_or_else(|| self.model.clone()),
            usage,
        })
    }

    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            max_tokens: 100,
            temperature: 0.7,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"commentary\":\"ok\"}"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"commentary\":\"ok\"}")
        );
        assert_eq!(parsed.usage.unwrap().completion_tokens, 5);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let provider = OpenAiProvider::new(None).with_base_url("http://127.0.0.1:9");
        let err = provider
            .complete(&[ChatMessage::user("hi")], &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingCredential(ref k) if k == "OPENAI_API_KEY"));
    }
}
