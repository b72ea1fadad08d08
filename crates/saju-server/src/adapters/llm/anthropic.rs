//! Anthropic Messages API adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use saju::{
    ChatMessage, CompletionOptions, CompletionResponse, DomainError, LlmProvider, MessageRole,
    Provider, TokenUsage,
};

use super::{build_client, map_http_error, map_transport_error, require_key};

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PROVIDER_NAME: &str = "anthropic";

/// No native JSON mode; appended to the system prompt instead
const JSON_ONLY_INSTRUCTION: &str =
    "응답은 반드시 유효한 JSON 객체 하나만 출력하세요. 코드 블록이나 설명을 덧붙이지 마세요.";

#[derive(Clone)]
pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<&'a ChatMessage>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: build_client(),
            api_key,
            model: crate::config::DEFAULT_ANTHROPIC_MODEL.to_string(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
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

/// System messages go to the top-level `system` field
fn build_request<'a>(
    model: &'a str,
    messages: &'a [ChatMessage],
    options: &CompletionOptions,
) -> MessagesRequest<'a> {
    let mut system_parts: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == MessageRole::System)
        .map(|m| m.content.as_str())
        .collect();
    if options.json_response {
        system_parts.push(JSON_ONLY_INSTRUCTION);
    }

    MessagesRequest {
        model,
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
        messages: messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .collect(),
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let api_key = require_key(&self.api_key, "ANTHROPIC_API_KEY")?;
        let request = build_request(&self.model, messages, options);

        tracing::debug!("🤖 Anthropic request: model={}", self.model);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error(PROVIDER_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(PROVIDER_NAME, status, body));
        }

        let payload: MessagesResponse = response
            .json()
            .await
            .map_err(|e| DomainError::malformed(PROVIDER_NAME, e.to_string()))?;

        let content = payload
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if content.is_empty() {
            return Err(DomainError::malformed(
                PROVIDER_NAME,
                "response had no text content",
            ));
        }

        let usage = payload
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: payload.model.unwrap_or_else(|| self.model.clone()),
            usage,
        })
    }

    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
