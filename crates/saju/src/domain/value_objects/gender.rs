//! Gender - Birth input gender

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Label used in prompts (남성 / 여성)
    pub fn korean(&self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }

    /// One-character label used in history listings
    pub fn short_korean(&self) -> &'static str {
        match self {
            Gender::Male => "남",
            Gender::Female => "여",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "남" | "남성" => Ok(Gender::Male),
            "female" | "f" | "여" | "여성" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}
