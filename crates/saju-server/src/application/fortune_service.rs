//! Fortune Application Service (Use Case)
//!
//! Turns a birth input into a report: derive the chart, build the prompts,
//! call the selected provider and clean what comes back.

use std::collections::HashMap;
use std::sync::Arc;

use saju::domain::services::{
    clean_json_response, commentary_prompt, extract_commentary, extract_themes, simple_prompt,
    system_prompt, themes_prompt, ManseCalendar, GENERAL_THEMES, LIFE_THEMES,
};
use saju::{
    BirthInput, CompletionOptions, DomainError, FortuneReport, LlmProvider, Provider,
};

const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

/// Result of one analysis together with the prompt text that produced it
#[derive(Debug, Clone)]
pub struct Analysis<T> {
    pub output: T,
    pub prompt: String,
}

/// Application service for fortune analysis
pub struct FortuneService {
    providers: HashMap<Provider, Arc<dyn LlmProvider>>,
    default_provider: Provider,
    calendar: ManseCalendar,
    temperature: f32,
}

impl FortuneService {
    pub fn new(default_provider: Provider, temperature: f32) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider,
            calendar: ManseCalendar::new(),
            temperature,
        }
    }

    /// Register a provider under the vendor it reports
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(provider.provider(), provider);
        self
    }

    pub fn default_provider(&self) -> Provider {
        self.default_provider
    }

    fn llm(&self, provider: Provider) -> Result<&Arc<dyn LlmProvider>, DomainError> {
        self.providers
            .get(&provider)
            .ok_or_else(|| DomainError::MissingCredential(format!("{} provider", provider)))
    }

    fn options(&self) -> CompletionOptions {
        CompletionOptions::default().with_temperature(self.temperature)
    }

    /// Single free-text completion
    pub async fn analyze_simple(
        &self,
        birth: &BirthInput,
        provider: Provider,
    ) -> Result<Analysis<String>, DomainError> {
        let llm = self.llm(provider)?;
        let prompt = simple_prompt(birth);

        tracing::info!(
            "🔮 Simple analysis for {} via {} ({})",
            birth.birth_date_label(),
            provider,
            llm.model_id()
        );

        let text = llm
            .complete_text(system_prompt(), &prompt, &self.options())
            .await?;

        Ok(Analysis {
            output: text.trim().to_string(),
            prompt,
        })
    }

    /// Structured report: commentary and both theme groups requested concurrently.
    /// The first failing call fails the whole analysis.
    pub async fn analyze(
        &self,
        birth: &BirthInput,
        provider: Provider,
    ) -> Result<Analysis<FortuneReport>, DomainError> {
        let llm = self.llm(provider)?;
        let manse = self.calendar.manse(birth)?;

        let commentary_request = commentary_prompt(birth, &manse);
        let general_request = themes_prompt(birth, &manse, &GENERAL_THEMES);
        let life_request = themes_prompt(birth, &manse, &LIFE_THEMES);
        let options = self.options().json();
        let system = system_prompt();

        tracing::info!(
            "🔮 Analyzing {} [{}] via {} ({})",
            birth.birth_date_label(),
            manse.pillars.display_line(),
            provider,
            llm.model_id()
        );

        let (commentary_raw, general_raw, life_raw) = tokio::try_join!(
            llm.complete_text(system, &commentary_request, &options),
            llm.complete_text(system, &general_request, &options),
            llm.complete_text(system, &life_request, &options),
        )?;

        let commentary = read_commentary(&commentary_raw);
        let mut themes = extract_themes(&clean_json_response(&general_raw));
        themes.extend(extract_themes(&clean_json_response(&life_raw)));

        tracing::info!(
            "✅ Report ready: {} chars commentary, {} themes",
            commentary.chars().count(),
            themes.len()
        );

        Ok(Analysis {
            output: FortuneReport {
                manse,
                commentary,
                themes,
            },
            prompt: [commentary_request, general_request, life_request].join(PROMPT_SEPARATOR),
        })
    }
}

/// Commentary field of the cleaned reply; empty when the reply is not a JSON object
fn read_commentary(raw: &str) -> String {
    extract_commentary(&clean_json_response(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_birth, FailingProvider, ScriptedProvider};
    use saju::{CalendarType, Gender};

    fn service_with(provider: Arc<dyn LlmProvider>) -> FortuneService {
        FortuneService::new(Provider::OpenAI, 0.7).with_provider(provider)
    }

    #[tokio::test]
    async fn test_simple_analysis_end_to_end() {
        let provider = Arc::new(ScriptedProvider::new(Provider::OpenAI));
        let service = service_with(provider.clone());

        let analysis = service
            .analyze_simple(&sample_birth(), Provider::OpenAI)
            .await
            .unwrap();

        for needle in ["1990", "5월", "15일", "남성"] {
            assert!(analysis.prompt.contains(needle), "prompt lacks {needle}");
        }
        assert_eq!(analysis.output, ScriptedProvider::FREE_TEXT);
        assert_eq!(provider.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_full_analysis_composes_report() {
        let provider = Arc::new(ScriptedProvider::new(Provider::OpenAI));
        let service = service_with(provider.clone());

        let analysis = service
            .analyze(&sample_birth(), Provider::OpenAI)
            .await
            .unwrap();
        let report = analysis.output;

        assert_eq!(report.manse.pillars.display_line(), "庚午 辛巳 庚辰 癸未");
        assert_eq!(report.commentary, "금 기운이 강한 사주입니다.");
        assert_eq!(report.themes.len(), 2);
        assert_eq!(report.themes[0].icon, "🔥");
        assert_eq!(report.themes[0].title, "T");
        assert_eq!(report.themes[0].content, "C");
        assert_eq!(report.themes[1].title, "애정운");

        assert_eq!(provider.prompts().len(), 3);
        assert!(analysis.prompt.contains("1990년 5월 15일"));
        assert!(analysis.prompt.contains("남성"));
    }

    #[tokio::test]
    async fn test_full_analysis_for_lunar_input() {
        let provider = Arc::new(ScriptedProvider::new(Provider::OpenAI));
        let service = service_with(provider);
        let birth =
            BirthInput::new(2024, 1, 1, None, Gender::Female, CalendarType::Lunar, false)
                .unwrap();

        let report = service
            .analyze(&birth, Provider::OpenAI)
            .await
            .unwrap()
            .output;

        assert_eq!(report.manse.solar_date.to_string(), "2024-02-10");
        assert!(report.manse.pillars.hour.is_none());
    }

    #[tokio::test]
    async fn test_any_failing_call_fails_the_analysis() {
        let service = service_with(Arc::new(FailingProvider::on_prompt_containing(
            Provider::OpenAI,
            "재물운",
        )));

        let err = service
            .analyze(&sample_birth(), Provider::OpenAI)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "upstream");
    }

    #[tokio::test]
    async fn test_unregistered_provider_is_missing_credential() {
        let service = service_with(Arc::new(ScriptedProvider::new(Provider::OpenAI)));
        let err = service
            .analyze_simple(&sample_birth(), Provider::Anthropic)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "missing_credential");
    }

    #[test]
    fn test_read_commentary_only_trusts_cleaned_json() {
        assert_eq!(read_commentary("{\"commentary\": \" 좋음 \"}"), "좋음");
        assert_eq!(read_commentary("{\"other\": 1}"), "");
        // Reply cut off before the closing brace
        assert_eq!(read_commentary("{\"commentary\": \"올해는 새로운"), "");
        assert_eq!(read_commentary("```json\n[\"a\", \"b\"]\n```"), "");
        assert_eq!(read_commentary("그냥 텍스트 답변"), "");
    }
}
