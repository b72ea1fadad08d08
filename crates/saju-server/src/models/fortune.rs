//! Fortune request/response DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use saju::domain::entities::MISSING_REQUIRED_FIELDS;
use saju::{
    BirthInput, CalendarType, DomainError, ElementTally, FortuneReport, Gender, Manse, Pillar,
    Provider, Theme,
};

/// Form fields arrive as numbers or as the strings an HTML input produces
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(i64),
    Text(String),
}

impl NumberOrText {
    /// `None` for blank text; `Some(Err)` for text that is not an integer
    fn value(&self) -> Option<Result<i64, DomainError>> {
        match self {
            NumberOrText::Number(n) => Some(Ok(*n)),
            NumberOrText::Text(s) if s.trim().is_empty() => None,
            NumberOrText::Text(s) => Some(s.trim().parse::<i64>().map_err(|_| {
                DomainError::validation(format!("숫자가 아닌 값이 입력되었습니다: {}", s))
            })),
        }
    }
}

/// Which report to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Chart, commentary and seven themes
    #[default]
    Full,
    /// One free-text answer
    Simple,
}

/// Analysis request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FortuneRequest {
    #[schema(value_type = Option<i64>, example = 1990)]
    #[serde(default)]
    pub year: Option<NumberOrText>,
    #[schema(value_type = Option<i64>, example = 5)]
    #[serde(default)]
    pub month: Option<NumberOrText>,
    #[schema(value_type = Option<i64>, example = 15)]
    #[serde(default)]
    pub day: Option<NumberOrText>,
    /// "HH:MM"; empty or absent when unknown
    #[schema(example = "14:30")]
    #[serde(default)]
    pub time: Option<String>,
    /// male | female (default male)
    #[serde(default)]
    pub gender: Option<String>,
    /// solar | lunar (default solar)
    #[serde(default)]
    pub calendar_type: Option<String>,
    /// openai | anthropic (default from server config)
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub is_leap_month: bool,
    #[serde(default)]
    pub mode: AnalysisMode,
}

fn required(field: &Option<NumberOrText>) -> Result<i64, DomainError> {
    field
        .as_ref()
        .and_then(NumberOrText::value)
        .unwrap_or_else(|| Err(DomainError::validation(MISSING_REQUIRED_FIELDS)))
}

fn in_range<T: TryFrom<i64>>(value: i64, label: &str) -> Result<T, DomainError> {
    T::try_from(value).map_err(|_| DomainError::validation(format!("잘못된 {}: {}", label, value)))
}

impl FortuneRequest {
    /// Validate and convert. Missing year/month/day are rejected before anything else.
    pub fn to_birth_input(&self) -> Result<BirthInput, DomainError> {
        let (year, month, day) = (
            required(&self.year)?,
            required(&self.month)?,
            required(&self.day)?,
        );

        let time = match self.time.as_deref() {
            Some(raw) => BirthInput::parse_time(raw)?,
            None => None,
        };
        let gender = parse_or_default::<Gender>(self.gender.as_deref())?;
        let calendar_type = parse_or_default::<CalendarType>(self.calendar_type.as_deref())?;

        BirthInput::new(
            in_range(year, "년도")?,
            in_range(month, "월")?,
            in_range(day, "일")?,
            time,
            gender,
            calendar_type,
            self.is_leap_month,
        )
    }

    /// Requested provider, or `default` when absent
    pub fn provider_or(&self, default: Provider) -> Result<Provider, DomainError> {
        match self.provider.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw.parse().map_err(DomainError::Validation),
        }
    }
}

fn parse_or_default<T>(raw: Option<&str>) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value.parse().map_err(DomainError::Validation),
    }
}

/// A pillar in both scripts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PillarResponse {
    /// e.g. "庚午"
    pub hanja: String,
    /// e.g. "경오"
    pub hangul: String,
}

impl From<Pillar> for PillarResponse {
    fn from(pillar: Pillar) -> Self {
        Self {
            hanja: pillar.to_string(),
            hangul: pillar.hangul(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PillarsResponse {
    pub year: PillarResponse,
    pub month: PillarResponse,
    pub day: PillarResponse,
    pub hour: Option<PillarResponse>,
}

/// Five-element counts, always all five
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ElementsResponse {
    pub wood: u8,
    pub fire: u8,
    pub earth: u8,
    pub metal: u8,
    pub water: u8,
}

impl From<ElementTally> for ElementsResponse {
    fn from(tally: ElementTally) -> Self {
        Self {
            wood: tally.wood,
            fire: tally.fire,
            earth: tally.earth,
            metal: tally.metal,
            water: tally.water,
        }
    }
}

/// Derived chart (만세력)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManseResponse {
    /// "YYYY-MM-DD"
    pub solar_date: String,
    /// e.g. "1990년 4월 21일"
    pub lunar_date: String,
    pub is_leap_month: bool,
    pub pillars: PillarsResponse,
    pub elements: ElementsResponse,
}

impl From<&Manse> for ManseResponse {
    fn from(manse: &Manse) -> Self {
        Self {
            solar_date: manse.solar_date.format("%Y-%m-%d").to_string(),
            lunar_date: manse.lunar_date.to_string(),
            is_leap_month: manse.lunar_date.is_leap_month,
            pillars: PillarsResponse {
                year: manse.pillars.year.into(),
                month: manse.pillars.month.into(),
                day: manse.pillars.day.into(),
                hour: manse.pillars.hour.map(Into::into),
            },
            elements: manse.elements.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThemeResponse {
    pub icon: String,
    pub title: String,
    pub content: String,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self {
            icon: theme.icon,
            title: theme.title,
            content: theme.content,
        }
    }
}

/// Structured report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FortuneReportResponse {
    pub manse: ManseResponse,
    pub commentary: String,
    pub themes: Vec<ThemeResponse>,
}

impl From<FortuneReport> for FortuneReportResponse {
    fn from(report: FortuneReport) -> Self {
        Self {
            manse: (&report.manse).into(),
            commentary: report.commentary,
            themes: report.themes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Free-text answer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SimpleFortuneResponse {
    pub result: String,
}

/// Either report shape, depending on the requested mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FortuneResponse {
    Report(FortuneReportResponse),
    Simple(SimpleFortuneResponse),
}
