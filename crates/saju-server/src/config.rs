//! Application configuration
//!
//! Read once at startup from Shuttle secrets (`Secrets.toml`). Every key is
//! optional; missing LLM keys surface as errors only when a request needs them.

use saju::Provider;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Supabase project used for Kakao login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_model: String,
    pub default_provider: Provider,
    pub temperature: f32,
    pub supabase: Option<SupabaseConfig>,
    pub kakao_js_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            default_provider: Provider::default(),
            temperature: DEFAULT_TEMPERATURE,
            supabase: None,
            kakao_js_key: None,
        }
    }
}

impl AppConfig {
    /// Build from a key lookup (Shuttle `SecretStore::get`, or a map in tests).
    /// Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let default_provider = match get("DEFAULT_PROVIDER") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("⚠️  {} - falling back to {}", e, Provider::default());
                Provider::default()
            }),
            None => Provider::default(),
        };

        let temperature = match get("FORTUNE_TEMPERATURE") {
            Some(raw) => match raw.parse::<f32>() {
                Ok(t) if (0.0..=2.0).contains(&t) => t,
                _ => {
                    tracing::warn!(
                        "⚠️  Invalid FORTUNE_TEMPERATURE '{}' - using {}",
                        raw,
                        DEFAULT_TEMPERATURE
                    );
                    DEFAULT_TEMPERATURE
                }
            },
            None => DEFAULT_TEMPERATURE,
        };

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("⚠️  SUPABASE_URL and SUPABASE_ANON_KEY must be set together");
                None
            }
            (None, None) => None,
        };

        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            anthropic_model: get("ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            default_provider,
            temperature,
            supabase,
            kakao_js_key: get("KAKAO_JS_KEY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = config_from(&[]);
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.anthropic_model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(config.default_provider, Provider::OpenAI);
        assert_eq!(config.temperature, 0.7);
        assert!(config.openai_api_key.is_none());
        assert!(config.supabase.is_none());
    }

    #[test]
    fn test_reads_all_keys() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("ANTHROPIC_API_KEY", " ant-key "),
            ("DEFAULT_PROVIDER", "claude"),
            ("FORTUNE_TEMPERATURE", "0.3"),
            ("SUPABASE_URL", "https://abc.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("KAKAO_JS_KEY", "kakao"),
        ]);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.anthropic_api_key.as_deref(), Some("ant-key"));
        assert_eq!(config.default_provider, Provider::Anthropic);
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(
            config.supabase,
            Some(SupabaseConfig {
                url: "https://abc.supabase.co".to_string(),
                anon_key: "anon".to_string(),
            })
        );
        assert_eq!(config.kakao_js_key.as_deref(), Some("kakao"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("DEFAULT_PROVIDER", "gemini"),
            ("FORTUNE_TEMPERATURE", "hot"),
            ("OPENAI_API_KEY", "   "),
            ("SUPABASE_URL", "https://abc.supabase.co"),
        ]);
        assert_eq!(config.default_provider, Provider::OpenAI);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert!(config.openai_api_key.is_none());
        assert!(config.supabase.is_none());
    }
}
