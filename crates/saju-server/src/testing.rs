//! Test doubles for the domain ports

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveTime;
use uuid::Uuid;

use saju::{
    AuthUser, BirthInput, CalendarType, ChatMessage, CompletionOptions, CompletionResponse,
    DomainError, Gender, HistoryRecord, HistoryRepository, IdentityProvider, LlmProvider,
    NewHistoryRecord, Provider, TokenUsage,
};

/// 1990-05-15 14:30, male, solar
pub fn sample_birth() -> BirthInput {
    BirthInput::new(
        1990,
        5,
        15,
        NaiveTime::from_hms_opt(14, 30, 0),
        Gender::Male,
        CalendarType::Solar,
        false,
    )
    .unwrap()
}

/// Answers each prompt kind with a canned, fenced response
pub struct ScriptedProvider {
    provider: Provider,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub const FREE_TEXT: &'static str = "올해는 차분히 내실을 다지는 해입니다.";

    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn respond(prompt: &str) -> String {
        if prompt.contains("\"commentary\"") {
            "```json\n{\"commentary\": \"금 기운이 강한 사주입니다.\"}\n```".to_string()
        } else if prompt.contains("재물운") {
            "```json\n{\"themes\":[{\"icon\":\"🔥\",\"title\":\"T\",\"content\":\"C\"}]}\n```"
                .to_string()
        } else if prompt.contains("애정운") {
            "결과입니다: {\"themes\":[{\"icon\":\"💕\",\"title\":\"애정운\",\"content\":\"좋음\"}]}"
                .to_string()
        } else {
            format!("  {}  ", Self::FREE_TEXT)
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let prompt = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let content = Self::respond(&prompt);
        self.prompts.lock().unwrap().push(prompt);

        Ok(CompletionResponse {
            content,
            model: "scripted".to_string(),
            usage: TokenUsage::default(),
        })
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

/// Fails with an upstream error for prompts containing `needle`
pub struct FailingProvider {
    provider: Provider,
    needle: String,
}

impl FailingProvider {
    pub fn on_prompt_containing(provider: Provider, needle: &str) -> Self {
        Self {
            provider,
            needle: needle.to_string(),
        }
    }
}

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let failing = messages.iter().any(|m| m.content.contains(&self.needle));
        if failing {
            return Err(DomainError::Upstream {
                provider: self.provider.to_string(),
                status: 500,
                message: "boom".to_string(),
            });
        }
        ScriptedProvider::new(self.provider)
            .complete(messages, options)
            .await
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

#[derive(Default)]
pub struct InMemoryHistoryRepository {
    records: Mutex<Vec<HistoryRecord>>,
}

impl InMemoryHistoryRepository {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn insert(&self, record: NewHistoryRecord) -> Result<HistoryRecord, DomainError> {
        let mut record = record.into_record();
        let mut records = self.records.lock().unwrap();
        // Keep timestamps strictly increasing so ordering is deterministic
        if let Some(last) = records.last() {
            if record.created_at <= last.created_at {
                record.created_at = last.created_at + chrono::Duration::milliseconds(1);
            }
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, DomainError> {
        let mut found: Vec<HistoryRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }

    async fn find_by_id(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> Result<Option<HistoryRecord>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }
}

/// Accepts exactly one token
pub struct StaticIdentity {
    pub token: String,
    pub user: AuthUser,
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn verify(&self, access_token: &str) -> Result<AuthUser, DomainError> {
        if access_token == self.token {
            Ok(self.user.clone())
        } else {
            Err(DomainError::Unauthorized("Invalid token".to_string()))
        }
    }

    fn authorize_url(&self, redirect_to: &str) -> String {
        format!("https://auth.test/authorize?provider=kakao&redirect_to={redirect_to}")
    }
}
