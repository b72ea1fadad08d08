//! Fortune - The derived chart (만세력) and the LLM-written report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::element::ElementTally;
use super::pillars::FourPillars;

/// A date in the Korean lunar calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub is_leap_month: bool,
}

impl std::fmt::Display for LunarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_leap_month {
            write!(f, "{}년 윤{}월 {}일", self.year, self.month, self.day)
        } else {
            write!(f, "{}년 {}월 {}일", self.year, self.month, self.day)
        }
    }
}

/// Manse (만세력) - the chart derived from a birth input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manse {
    pub solar_date: NaiveDate,
    pub lunar_date: LunarDate,
    pub pillars: FourPillars,
    pub elements: ElementTally,
}

/// One themed section of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Theme {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Structured fortune report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortuneReport {
    pub manse: Manse,
    pub commentary: String,
    pub themes: Vec<Theme>,
}
