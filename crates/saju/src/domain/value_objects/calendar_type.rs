//! CalendarType - Whether a birth date is solar (Gregorian) or lunar

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    #[default]
    Solar,
    Lunar,
}

impl CalendarType {
    /// Label used in prompts (양력 / 음력)
    pub fn korean(&self) -> &'static str {
        match self {
            CalendarType::Solar => "양력",
            CalendarType::Lunar => "음력",
        }
    }
}

impl std::fmt::Display for CalendarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarType::Solar => write!(f, "solar"),
            CalendarType::Lunar => write!(f, "lunar"),
        }
    }
}

impl std::str::FromStr for CalendarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solar" | "양력" => Ok(CalendarType::Solar),
            "lunar" | "음력" => Ok(CalendarType::Lunar),
            _ => Err(format!("Unknown calendar type: {}", s)),
        }
    }
}
