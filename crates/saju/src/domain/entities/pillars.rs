//! Pillars (四柱) - Stem/branch pairs for year, month, day and hour
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

use super::element::FiveElement;

const STEM_GLYPHS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];
const STEM_HANGUL: [&str; 10] = ["갑", "을", "병", "정", "무", "기", "경", "신", "임", "계"];

const BRANCH_GLYPHS: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];
const BRANCH_HANGUL: [&str; 12] = [
    "자", "축", "인", "묘", "진", "사", "오", "미", "신", "유", "술", "해",
];

/// Heavenly stem (天干), indexed 0 = 甲 .. 9 = 癸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeavenlyStem(u8);

impl HeavenlyStem {
    pub fn from_index(index: i64) -> Self {
        Self(index.rem_euclid(10) as u8)
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        STEM_GLYPHS
            .iter()
            .position(|&g| g == glyph)
            .map(|i| Self(i as u8))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn glyph(&self) -> char {
        STEM_GLYPHS[self.index()]
    }

    pub fn hangul(&self) -> &'static str {
        STEM_HANGUL[self.index()]
    }

    pub fn element(&self) -> FiveElement {
        FiveElement::ALL[self.index() / 2]
    }
}

/// Earthly branch (地支), indexed 0 = 子 .. 11 = 亥
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EarthlyBranch(u8);

impl EarthlyBranch {
    pub fn from_index(index: i64) -> Self {
        Self(index.rem_euclid(12) as u8)
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        BRANCH_GLYPHS
            .iter()
            .position(|&g| g == glyph)
            .map(|i| Self(i as u8))
    }

    /// Branch of the two-hour period containing `hour` (23:00 starts 子)
    pub fn from_hour(hour: u32) -> Self {
        Self::from_index(((hour + 1) / 2) as i64)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn glyph(&self) -> char {
        BRANCH_GLYPHS[self.index()]
    }

    pub fn hangul(&self) -> &'static str {
        BRANCH_HANGUL[self.index()]
    }

    pub fn element(&self) -> FiveElement {
        match self.0 {
            2 | 3 => FiveElement::Wood,
            5 | 6 => FiveElement::Fire,
            8 | 9 => FiveElement::Metal,
            11 | 0 => FiveElement::Water,
            _ => FiveElement::Earth,
        }
    }
}

/// One pillar: a stem over a branch, e.g. 庚午
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Pillar {
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
}

impl Pillar {
    pub fn new(stem: HeavenlyStem, branch: EarthlyBranch) -> Self {
        Self { stem, branch }
    }

    /// Pillar at position `index` of the sexagenary cycle (0 = 甲子)
    pub fn from_cycle_index(index: i64) -> Self {
        let index = index.rem_euclid(60);
        Self {
            stem: HeavenlyStem::from_index(index),
            branch: EarthlyBranch::from_index(index),
        }
    }

    /// Korean reading, e.g. "경오"
    pub fn hangul(&self) -> String {
        format!("{}{}", self.stem.hangul(), self.branch.hangul())
    }

    pub fn glyphs(&self) -> [char; 2] {
        [self.stem.glyph(), self.branch.glyph()]
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem.glyph(), self.branch.glyph())
    }
}

impl From<Pillar> for String {
    fn from(pillar: Pillar) -> Self {
        pillar.to_string()
    }
}

impl TryFrom<String> for Pillar {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Pillar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(stem), Some(branch), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("Pillar must be two glyphs: {}", s));
        };
        let stem = HeavenlyStem::from_glyph(stem).ok_or_else(|| format!("Unknown stem: {}", stem))?;
        let branch =
            EarthlyBranch::from_glyph(branch).ok_or_else(|| format!("Unknown branch: {}", branch))?;
        Ok(Self { stem, branch })
    }
}

/// The four pillars (八字). The hour pillar is absent when the birth time is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Option<Pillar>,
}

impl FourPillars {
    /// All present glyphs in year, month, day, hour order (6 or 8 characters)
    pub fn glyphs(&self) -> Vec<char> {
        [Some(self.year), Some(self.month), Some(self.day), self.hour]
            .into_iter()
            .flatten()
            .flat_map(|p| p.glyphs())
            .collect()
    }

    /// Compact rendering, e.g. "庚午 辛巳 庚辰 癸未" (unknown hour shown as "??")
    pub fn display_line(&self) -> String {
        format!(
            "{} {} {} {}",
            self.year,
            self.month,
            self.day,
            self.hour
                .map(|p| p.to_string())
                .unwrap_or_else(|| "??".to_string())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_index_zero_is_gapja() {
        let p = Pillar::from_cycle_index(0);
        assert_eq!(p.to_string(), "甲子");
        assert_eq!(p.hangul(), "갑자");
        assert_eq!(Pillar::from_cycle_index(59).to_string(), "癸亥");
        assert_eq!(Pillar::from_cycle_index(60), p);
    }

    #[test]
    fn test_hour_branches() {
        assert_eq!(EarthlyBranch::from_hour(23).glyph(), '子');
        assert_eq!(EarthlyBranch::from_hour(0).glyph(), '子');
        assert_eq!(EarthlyBranch::from_hour(1).glyph(), '丑');
        assert_eq!(EarthlyBranch::from_hour(14).glyph(), '未');
    }

    #[test]
    fn test_pillar_parse_and_serde() {
        let p: Pillar = "庚午".parse().unwrap();
        assert_eq!(p.stem.glyph(), '庚');
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"庚午\"");
        let back: Pillar = serde_json::from_str("\"庚午\"").unwrap();
        assert_eq!(back, p);
        assert!("庚".parse::<Pillar>().is_err());
        assert!("AB".parse::<Pillar>().is_err());
    }

    #[test]
    fn test_glyph_count_without_hour() {
        let pillars = FourPillars {
            year: Pillar::from_cycle_index(6),
            month: Pillar::from_cycle_index(17),
            day: Pillar::from_cycle_index(16),
            hour: None,
        };
        assert_eq!(pillars.glyphs().len(), 6);
        assert!(pillars.display_line().ends_with("??"));
    }
}
