//! Form validation and view state
//!
//! The form is checked locally so incomplete input never reaches the
//! network. `ViewState` moves idle -> loading -> result | error.

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use saju::domain::entities::MISSING_REQUIRED_FIELDS;
use saju::{BirthInput, CalendarType, DomainError, Gender, Provider};

use crate::api::{FortuneOutcome, ManseResponse, PillarResponse};

/// Raw form fields as typed by the user
#[derive(Debug, Clone, Default)]
pub struct FortuneForm {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    pub time: Option<String>,
    pub gender: Gender,
    pub calendar_type: CalendarType,
    pub is_leap_month: bool,
    pub provider: Option<Provider>,
    pub simple: bool,
}

/// Body sent to `POST /api/fortune`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneSubmission {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub gender: Gender,
    pub calendar_type: CalendarType,
    pub is_leap_month: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    pub mode: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Year, month or day left blank
    MissingRequired,
    NotANumber { field: &'static str, value: String },
    Invalid(String),
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::MissingRequired => write!(f, "{}", MISSING_REQUIRED_FIELDS),
            FormError::NotANumber { field, value } => {
                write!(f, "{}에는 숫자를 입력해주세요 (입력: {})", field, value)
            }
            FormError::Invalid(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for FormError {}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn invalid(error: DomainError) -> FormError {
    match error {
        DomainError::Validation(message) => FormError::Invalid(message),
        other => FormError::Invalid(other.to_string()),
    }
}

fn number<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T, FormError> {
    raw.parse().map_err(|_| FormError::NotANumber {
        field,
        value: raw.to_string(),
    })
}

impl FortuneForm {
    /// Presence first, then numbers, then calendar ranges
    pub fn validate(&self) -> Result<FortuneSubmission, FormError> {
        let (Some(year), Some(month), Some(day)) =
            (present(&self.year), present(&self.month), present(&self.day))
        else {
            return Err(FormError::MissingRequired);
        };

        let year = number(year, "년")?;
        let month = number(month, "월")?;
        let day = number(day, "일")?;

        let time = match present(&self.time) {
            Some(raw) => BirthInput::parse_time(raw).map_err(invalid)?,
            None => None,
        };

        let birth = BirthInput::new(
            year,
            month,
            day,
            time,
            self.gender,
            self.calendar_type,
            self.is_leap_month,
        )
        .map_err(invalid)?;

        Ok(FortuneSubmission {
            year: birth.year,
            month: birth.month,
            day: birth.day,
            time: birth.time.map(|t| t.format("%H:%M").to_string()),
            gender: birth.gender,
            calendar_type: birth.calendar_type,
            is_leap_month: birth.is_leap_month,
            provider: self.provider,
            mode: if self.simple { "simple" } else { "full" },
        })
    }
}

/// What the terminal is showing
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Result(Box<FortuneOutcome>),
    Error(String),
}

impl ViewState {
    /// Enter loading. Refused while a request is already in flight.
    pub fn begin(&mut self) -> bool {
        if matches!(self, ViewState::Loading) {
            return false;
        }
        *self = ViewState::Loading;
        true
    }

    /// Leave loading with the request's outcome. Ignored unless loading.
    pub fn finish(&mut self, outcome: anyhow::Result<FortuneOutcome>) {
        if !matches!(self, ViewState::Loading) {
            tracing::debug!("Ignoring result outside of loading state");
            return;
        }
        *self = match outcome {
            Ok(outcome) => ViewState::Result(Box::new(outcome)),
            Err(e) => ViewState::Error(format!("{:#}", e)),
        };
    }

    /// `finish` for a raw JSON reply; returns the pretty-printed body once in the result state
    pub fn finish_json(&mut self, raw: anyhow::Result<serde_json::Value>) -> Option<String> {
        let pretty = raw
            .as_ref()
            .ok()
            .and_then(|value| serde_json::to_string_pretty(value).ok());
        self.finish(raw.and_then(|value| {
            serde_json::from_value(value).context("Unexpected response shape")
        }));
        match self {
            ViewState::Result(_) => pretty,
            _ => None,
        }
    }

    /// Show a validation failure without going through loading
    pub fn reject(&mut self, error: FormError) {
        *self = ViewState::Error(error.to_string());
    }

    pub fn render(&self) -> String {
        match self {
            ViewState::Idle => String::new(),
            ViewState::Loading => format!("{}", "🔮 사주를 분석하고 있습니다...".dimmed()),
            ViewState::Result(outcome) => render_outcome(outcome),
            ViewState::Error(message) => format!("{} {}", "✗".red(), message.red()),
        }
    }
}

fn pillar_cell(pillar: Option<&PillarResponse>) -> (String, String) {
    pillar
        .map(|p| (p.hanja.clone(), p.hangul.clone()))
        .unwrap_or_else(|| ("??".to_string(), "모름".to_string()))
}

fn render_manse(manse: &ManseResponse) -> String {
    let p = &manse.pillars;
    // Traditional right-to-left order: hour, day, month, year
    let cells = [
        ("시주", pillar_cell(p.hour.as_ref())),
        ("일주", pillar_cell(Some(&p.day))),
        ("월주", pillar_cell(Some(&p.month))),
        ("년주", pillar_cell(Some(&p.year))),
    ];

    let labels: Vec<String> = cells.iter().map(|(l, _)| l.to_string()).collect();
    let hanja: Vec<String> = cells.iter().map(|(_, (h, _))| format!(" {} ", h)).collect();
    let hangul: Vec<String> = cells.iter().map(|(_, (_, k))| format!(" {} ", k)).collect();

    let e = &manse.elements;
    format!(
        "  {}\n  {}\n  {}\n\n  양력 {} · 음력 {}\n  🌳 목 {}  🔥 화 {}  ⛰️ 토 {}  ⚔️ 금 {}  💧 수 {}",
        labels.join("   ").dimmed(),
        hanja.join(" ").bold(),
        hangul.join(" ").dimmed(),
        manse.solar_date,
        manse.lunar_date,
        e.wood,
        e.fire,
        e.earth,
        e.metal,
        e.water
    )
}

pub fn render_outcome(outcome: &FortuneOutcome) -> String {
    match outcome {
        FortuneOutcome::Simple { result } => result.clone(),
        FortuneOutcome::Report {
            manse,
            commentary,
            themes,
        } => {
            let mut out = render_manse(manse);
            out.push_str(&format!("\n\n{}\n{}\n", "총평".bold(), commentary));
            for theme in themes {
                out.push_str(&format!(
                    "\n{} {}\n{}\n",
                    theme.icon,
                    theme.title.cyan().bold(),
                    theme.content
                ));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ElementsResponse, PillarsResponse, ThemeResponse};

    fn form(year: &str, month: &str, day: &str) -> FortuneForm {
        FortuneForm {
            year: Some(year.to_string()),
            month: Some(month.to_string()),
            day: Some(day.to_string()),
            ..FortuneForm::default()
        }
    }

    fn pillar(hanja: &str, hangul: &str) -> PillarResponse {
        PillarResponse {
            hanja: hanja.to_string(),
            hangul: hangul.to_string(),
        }
    }

    fn sample_report() -> FortuneOutcome {
        FortuneOutcome::Report {
            manse: ManseResponse {
                solar_date: "1990-05-15".to_string(),
                lunar_date: "1990년 4월 21일".to_string(),
                pillars: PillarsResponse {
                    year: pillar("庚午", "경오"),
                    month: pillar("辛巳", "신사"),
                    day: pillar("庚辰", "경진"),
                    hour: None,
                },
                elements: ElementsResponse {
                    wood: 0,
                    fire: 2,
                    earth: 1,
                    metal: 3,
                    water: 0,
                },
            },
            commentary: "금 기운이 강합니다.".to_string(),
            themes: vec![ThemeResponse {
                icon: "🔥".to_string(),
                title: "T".to_string(),
                content: "C".to_string(),
            }],
        }
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert_eq!(
            FortuneForm::default().validate(),
            Err(FormError::MissingRequired)
        );
        assert_eq!(form("1990", " ", "15").validate(), Err(FormError::MissingRequired));
        assert_eq!(
            FormError::MissingRequired.to_string(),
            "필수 정보(년, 월, 일)를 모두 입력해주세요!"
        );
    }

    #[test]
    fn test_valid_form_builds_submission() {
        let mut f = form("1990", "5", "15");
        f.time = Some("14:30".to_string());
        f.simple = true;
        let submission = f.validate().unwrap();
        assert_eq!((submission.year, submission.month, submission.day), (1990, 5, 15));
        assert_eq!(submission.time.as_deref(), Some("14:30"));
        assert_eq!(submission.mode, "simple");

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["calendarType"], "solar");
        assert_eq!(json["gender"], "male");
        assert!(json.get("provider").is_none());
    }

    #[test]
    fn test_bad_numbers_and_dates() {
        assert!(matches!(
            form("199O", "5", "15").validate(),
            Err(FormError::NotANumber { field: "년", .. })
        ));
        assert!(matches!(
            form("1990", "2", "30").validate(),
            Err(FormError::Invalid(_))
        ));
        let mut f = form("1990", "5", "15");
        f.time = Some("25:99".to_string());
        assert!(matches!(f.validate(), Err(FormError::Invalid(_))));
    }

    #[test]
    fn test_invalid_message_has_no_prefix() {
        let err = form("1850", "1", "1").validate().unwrap_err();
        assert!(err.to_string().starts_with("출생년도는"));
    }

    #[test]
    fn test_state_transitions() {
        let mut state = ViewState::default();
        assert!(matches!(state, ViewState::Idle));

        assert!(state.begin());
        assert!(!state.begin(), "second submit while loading");

        state.finish(Ok(sample_report()));
        assert!(matches!(state, ViewState::Result(_)));

        // A stray result outside loading is ignored
        state.finish(Err(anyhow::anyhow!("late")));
        assert!(matches!(state, ViewState::Result(_)));

        assert!(state.begin());
        state.finish(Err(anyhow::anyhow!("분석 중 오류가 발생했습니다.")));
        match &state {
            ViewState::Error(message) => assert!(message.contains("분석 중 오류")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_raw_json_reply_goes_through_states() {
        let mut state = ViewState::default();
        assert!(state.begin());
        let pretty = state.finish_json(Ok(serde_json::json!({"result": "좋은 해"})));
        assert!(pretty.unwrap().contains("좋은 해"));
        assert!(matches!(state, ViewState::Result(_)));

        assert!(state.begin());
        assert_eq!(state.finish_json(Ok(serde_json::json!({"unexpected": 1}))), None);
        assert!(matches!(state, ViewState::Error(_)));

        assert!(state.begin());
        assert_eq!(state.finish_json(Err(anyhow::anyhow!("분석 중 오류"))), None);
        assert!(state.render().contains("분석 중 오류"));
    }

    #[test]
    fn test_reject_shows_form_error() {
        let mut state = ViewState::Idle;
        state.reject(FormError::MissingRequired);
        assert!(state.render().contains(MISSING_REQUIRED_FIELDS));
    }

    #[test]
    fn test_render_report() {
        colored::control::set_override(false);
        let text = render_outcome(&sample_report());
        assert!(text.contains("庚午"));
        assert!(text.contains("??"));
        assert!(text.contains("금 3"));
        assert!(text.contains("🔥 T\nC"));
        assert!(text.contains("금 기운이 강합니다."));
    }
}
