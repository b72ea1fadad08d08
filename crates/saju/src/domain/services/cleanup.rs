//! LLM response cleanup
//!
//! Models wrap JSON in markdown fences or surround it with chatter. These
//! helpers recover the outermost object and never fail: anything that cannot
//! be read becomes an empty object.

use serde_json::{Map, Value};

use crate::domain::entities::Theme;

/// Strip fences, take the outermost `{...}` span and parse it.
///
/// Returns an empty object when no object can be recovered.
pub fn clean_json_response(raw: &str) -> Value {
    let stripped = raw
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "");

    let (Some(start), Some(end)) = (stripped.find('{'), stripped.rfind('}')) else {
        if !raw.trim().is_empty() {
            tracing::warn!("⚠️  LLM response contained no JSON object ({} bytes)", raw.len());
        }
        return empty_object();
    };
    if end < start {
        tracing::warn!("⚠️  LLM response had unbalanced braces");
        return empty_object();
    }

    match serde_json::from_str::<Value>(&stripped[start..=end]) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => empty_object(),
        Err(e) => {
            tracing::warn!("⚠️  Failed to parse LLM JSON response: {}", e);
            empty_object()
        }
    }
}

/// Themes under `"themes"`, skipping entries that are not objects
pub fn extract_themes(value: &Value) -> Vec<Theme> {
    value
        .get("themes")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| serde_json::from_value::<Theme>(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Text under `"commentary"`, empty when absent
pub fn extract_commentary(value: &Value) -> String {
    value
        .get("commentary")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_theme_block() {
        let raw = "```json\n{\"themes\":[{\"icon\":\"🔥\",\"title\":\"T\",\"content\":\"C\"}]}\n```";
        let value = clean_json_response(raw);
        let themes = extract_themes(&value);
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].icon, "🔥");
        assert_eq!(themes[0].title, "T");
        assert_eq!(themes[0].content, "C");
    }

    #[test]
    fn test_surrounding_chatter_is_dropped() {
        let raw = "물론입니다! 결과는 다음과 같습니다.\n{\"commentary\": \"좋은 해입니다.\"}\n감사합니다.";
        let value = clean_json_response(raw);
        assert_eq!(extract_commentary(&value), "좋은 해입니다.");
    }

    #[test]
    fn test_garbage_yields_empty_object() {
        for raw in ["", "   ", "no json here", "{\"themes\": [", "} backwards {", "[1, 2]"] {
            assert_eq!(clean_json_response(raw), json!({}), "input {raw:?}");
        }
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let raw = "```json\n{\"commentary\": \"a\", \"themes\": []}\n```";
        let once = clean_json_response(raw);
        let twice = clean_json_response(&once.to_string());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_and_wrapped_json_agree() {
        const CLEAN: &str = r#"{"commentary": "a", "themes": [{"icon": "🔥", "title": "T", "content": "C"}]}"#;
        let wrapped = format!("설명\n```json\n{CLEAN}\n```\n끝");
        assert_eq!(clean_json_response(CLEAN), clean_json_response(&wrapped));
        assert_eq!(extract_themes(&clean_json_response(&wrapped)).len(), 1);
    }

    #[test]
    fn test_extractors_tolerate_missing_or_odd_fields() {
        let value = json!({
            "themes": [
                {"icon": "💰", "title": "재물운"},
                "not a theme",
                {"icon": "🌿", "title": "건강운", "content": 3}
            ]
        });
        let themes = extract_themes(&value);
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].content, "");
        assert_eq!(extract_commentary(&value), "");
        assert!(extract_themes(&json!({})).is_empty());
    }
}
