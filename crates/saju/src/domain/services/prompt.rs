//! Prompt construction
//!
//! Straight interpolation of the birth input and chart into fixed Korean
//! instructions. Every builder is deterministic for a given input.

use crate::domain::entities::{BirthInput, Manse, Pillar};

/// A themed section the report asks the model to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSpec {
    pub icon: &'static str,
    pub title: &'static str,
}

/// First theme request: overall fortune, personality, wealth
pub const GENERAL_THEMES: [ThemeSpec; 3] = [
    ThemeSpec { icon: "🌟", title: "총운" },
    ThemeSpec { icon: "🧭", title: "성격" },
    ThemeSpec { icon: "💰", title: "재물운" },
];

/// Second theme request: love, health, career, cautions
pub const LIFE_THEMES: [ThemeSpec; 4] = [
    ThemeSpec { icon: "💕", title: "애정운" },
    ThemeSpec { icon: "🌿", title: "건강운" },
    ThemeSpec { icon: "💼", title: "직업운" },
    ThemeSpec { icon: "⚠️", title: "주의할 점" },
];

/// System message shared by every request
pub fn system_prompt() -> &'static str {
    "당신은 30년 경력의 사주 명리학 전문가입니다. \
     따뜻하고 구체적인 한국어로 답하되, 근거가 되는 사주 구성(천간, 지지, 오행)을 함께 설명합니다."
}

/// Free-text prompt for the single-call mode
pub fn simple_prompt(birth: &BirthInput) -> String {
    format!(
        "사주 전문가로서 다음 사람의 사주를 분석해주세요.\n\
         - 출생년월일: {year}년 {month}월 {day}일 ({calendar})\n\
         - 출생시간: {time}\n\
         - 성별: {gender}\n\
         \n\
         위 정보를 바탕으로 올해의 총운, 성격, 주의할 점을 한국어로 상세히 설명해주세요.",
        year = birth.year,
        month = birth.month,
        day = birth.day,
        calendar = birth.calendar_label(),
        time = birth.time_label(),
        gender = birth.gender.korean(),
    )
}

/// Prompt asking for `{"commentary": "..."}`
pub fn commentary_prompt(birth: &BirthInput, manse: &Manse) -> String {
    format!(
        "다음 사람의 사주 팔자를 보고 전체적인 해설을 작성해주세요.\n\
         \n\
         {chart}\n\
         \n\
         일간을 중심으로 타고난 기질과 오행의 균형, 올해의 흐름을 4~6문장으로 풀이해주세요.\n\
         반드시 아래 JSON 형식으로만 답하고 다른 설명은 덧붙이지 마세요.\n\
         {{\"commentary\": \"해설 본문\"}}",
        chart = chart_block(birth, manse),
    )
}

/// Prompt asking for `{"themes": [{"icon", "title", "content"}]}` for the given themes
pub fn themes_prompt(birth: &BirthInput, manse: &Manse, themes: &[ThemeSpec]) -> String {
    let listing = themes
        .iter()
        .map(|t| format!("- {} {}", t.icon, t.title))
        .collect::<Vec<_>>()
        .join("\n");
    let example = themes
        .first()
        .map(|t| {
            format!(
                "{{\"themes\": [{{\"icon\": \"{}\", \"title\": \"{}\", \"content\": \"본문\"}}]}}",
                t.icon, t.title
            )
        })
        .unwrap_or_else(|| "{\"themes\": []}".to_string());

    format!(
        "다음 사람의 사주 팔자를 보고 주제별 운세를 작성해주세요.\n\
         \n\
         {chart}\n\
         \n\
         [작성할 주제]\n\
         {listing}\n\
         \n\
         각 주제마다 3~5문장으로 구체적인 조언을 담아주세요. 주제 순서와 아이콘, 제목은 그대로 사용하세요.\n\
         반드시 아래 JSON 형식으로만 답하고 다른 설명은 덧붙이지 마세요.\n\
         {example}",
        chart = chart_block(birth, manse),
        listing = listing,
        example = example,
    )
}

/// Shared description of the person and chart
fn chart_block(birth: &BirthInput, manse: &Manse) -> String {
    let hour = manse
        .pillars
        .hour
        .map(describe_pillar)
        .unwrap_or_else(|| "모름".to_string());
    let dominant = join_elements(&manse.elements.dominant());
    let missing = join_elements(&manse.elements.missing());

    format!(
        "[출생 정보]\n\
         - 출생년월일: {year}년 {month}월 {day}일 ({calendar})\n\
         - 양력: {solar} / 음력: {lunar}\n\
         - 출생시간: {time}\n\
         - 성별: {gender}\n\
         \n\
         [사주 팔자]\n\
         - 년주: {year_pillar}\n\
         - 월주: {month_pillar}\n\
         - 일주: {day_pillar}\n\
         - 시주: {hour}\n\
         - 오행 분포: {elements}\n\
         - 강한 오행: {dominant} / 부족한 오행: {missing}",
        year = birth.year,
        month = birth.month,
        day = birth.day,
        calendar = birth.calendar_label(),
        solar = manse.solar_date.format("%Y-%m-%d"),
        lunar = manse.lunar_date,
        time = birth.time_label(),
        gender = birth.gender.korean(),
        year_pillar = describe_pillar(manse.pillars.year),
        month_pillar = describe_pillar(manse.pillars.month),
        day_pillar = describe_pillar(manse.pillars.day),
        hour = hour,
        elements = manse.elements.summary(),
        dominant = dominant,
        missing = missing,
    )
}

fn describe_pillar(pillar: Pillar) -> String {
    format!("{}({})", pillar, pillar.hangul())
}

fn join_elements(elements: &[crate::domain::entities::FiveElement]) -> String {
    if elements.is_empty() {
        "없음".to_string()
    } else {
        elements
            .iter()
            .map(|e| e.korean())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::ManseCalendar;
    use crate::domain::value_objects::{CalendarType, Gender};
    use chrono::NaiveTime;

    fn reference_birth() -> BirthInput {
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

    #[test]
    fn test_simple_prompt_interpolates_fields() {
        let prompt = simple_prompt(&reference_birth());
        for needle in ["1990", "5월", "15일", "남성", "14:30", "양력"] {
            assert!(prompt.contains(needle), "missing {needle} in {prompt}");
        }
    }

    #[test]
    fn test_simple_prompt_unknown_time_and_lunar() {
        let birth =
            BirthInput::new(1985, 12, 3, None, Gender::Female, CalendarType::Lunar, false)
                .unwrap();
        let prompt = simple_prompt(&birth);
        assert!(prompt.contains("출생시간: 모름"));
        assert!(prompt.contains("(음력)"));
        assert!(prompt.contains("여성"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let birth = reference_birth();
        let manse = ManseCalendar::new().manse(&birth).unwrap();
        assert_eq!(simple_prompt(&birth), simple_prompt(&birth));
        assert_eq!(
            themes_prompt(&birth, &manse, &GENERAL_THEMES),
            themes_prompt(&birth, &manse, &GENERAL_THEMES)
        );
    }

    #[test]
    fn test_chart_prompts_embed_pillars_and_elements() {
        let birth = reference_birth();
        let manse = ManseCalendar::new().manse(&birth).unwrap();

        let commentary = commentary_prompt(&birth, &manse);
        assert!(commentary.contains("庚午(경오)"));
        assert!(commentary.contains("癸未(계미)"));
        assert!(commentary.contains("목 0, 화 2, 토 2, 금 3, 수 1"));
        assert!(commentary.contains("\"commentary\""));

        let themes = themes_prompt(&birth, &manse, &LIFE_THEMES);
        assert!(themes.contains("- 💕 애정운"));
        assert!(themes.contains("- ⚠️ 주의할 점"));
        assert!(themes.contains("\"themes\""));
        assert!(themes.contains("1990년 5월 15일"));
        assert!(themes.contains("남성"));
    }
}
