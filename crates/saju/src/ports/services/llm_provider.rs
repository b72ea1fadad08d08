//! LLM Provider Port
//!
//! Abstract interface for chat-completion calls. OpenAI and Anthropic
//! adapters implement it in the server crate; tests substitute mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::Provider;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Options for a completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Ask the provider for a bare JSON object when it supports it
    pub json_response: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.7,
            json_response: false,
        }
    }
}

impl CompletionOptions {
    pub fn json(mut self) -> Self {
        self.json_response = true;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Response from a completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,
    /// Model that produced it
    pub model: String,
    pub usage: TokenUsage,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// LLM Provider interface
///
/// Implementations report a missing API key as
/// [`DomainError::MissingCredential`] at call time, HTTP failures as
/// [`DomainError::Upstream`] and unreadable bodies as
/// [`DomainError::MalformedResponse`].
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError>;

    /// System + user prompt, returning only the text
    async fn complete_text(
        &self,
        system: &str,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, DomainError> {
        let messages = [ChatMessage::system(system), ChatMessage::user(prompt)];
        let response = self.complete(&messages, options).await?;
        Ok(response.content)
    }

    /// Which vendor this is
    fn provider(&self) -> Provider;

    /// Model ID being used
    fn model_id(&self) -> &str;
}
