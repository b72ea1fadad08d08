//! Five Elements (오행) and the per-chart element tally

use serde::{Deserialize, Serialize};

use super::pillars::{EarthlyBranch, HeavenlyStem};

/// Five-element classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiveElement {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl FiveElement {
    /// Generating-cycle order: wood, fire, earth, metal, water
    pub const ALL: [FiveElement; 5] = [
        FiveElement::Wood,
        FiveElement::Fire,
        FiveElement::Earth,
        FiveElement::Metal,
        FiveElement::Water,
    ];

    /// Element of a stem or branch glyph; `None` for anything else
    pub fn from_glyph(glyph: char) -> Option<Self> {
        HeavenlyStem::from_glyph(glyph)
            .map(|s| s.element())
            .or_else(|| EarthlyBranch::from_glyph(glyph).map(|b| b.element()))
    }

    pub fn korean(&self) -> &'static str {
        match self {
            FiveElement::Wood => "목",
            FiveElement::Fire => "화",
            FiveElement::Earth => "토",
            FiveElement::Metal => "금",
            FiveElement::Water => "수",
        }
    }

    pub fn hanja(&self) -> char {
        match self {
            FiveElement::Wood => '木',
            FiveElement::Fire => '火',
            FiveElement::Earth => '土',
            FiveElement::Metal => '金',
            FiveElement::Water => '水',
        }
    }
}

impl std::fmt::Display for FiveElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.korean(), self.hanja())
    }
}

/// Count of each element across a chart's glyphs. Every element is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTally {
    pub wood: u8,
    pub fire: u8,
    pub earth: u8,
    pub metal: u8,
    pub water: u8,
}

impl ElementTally {
    /// Tally glyphs; unrecognised glyphs contribute nothing
    pub fn from_glyphs<I>(glyphs: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut tally = Self::default();
        for element in glyphs.into_iter().filter_map(FiveElement::from_glyph) {
            *tally.slot_mut(element) += 1;
        }
        tally
    }

    pub fn get(&self, element: FiveElement) -> u8 {
        match element {
            FiveElement::Wood => self.wood,
            FiveElement::Fire => self.fire,
            FiveElement::Earth => self.earth,
            FiveElement::Metal => self.metal,
            FiveElement::Water => self.water,
        }
    }

    fn slot_mut(&mut self, element: FiveElement) -> &mut u8 {
        match element {
            FiveElement::Wood => &mut self.wood,
            FiveElement::Fire => &mut self.fire,
            FiveElement::Earth => &mut self.earth,
            FiveElement::Metal => &mut self.metal,
            FiveElement::Water => &mut self.water,
        }
    }

    pub fn total(&self) -> u32 {
        FiveElement::ALL.iter().map(|&e| self.get(e) as u32).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FiveElement, u8)> + '_ {
        FiveElement::ALL.iter().map(move |&e| (e, self.get(e)))
    }

    /// Elements with a zero count
    pub fn missing(&self) -> Vec<FiveElement> {
        self.iter().filter(|(_, n)| *n == 0).map(|(e, _)| e).collect()
    }

    /// Elements sharing the highest count (empty for an empty tally)
    pub fn dominant(&self) -> Vec<FiveElement> {
        let max = self.iter().map(|(_, n)| n).max().unwrap_or(0);
        if max == 0 {
            return Vec::new();
        }
        self.iter().filter(|(_, n)| *n == max).map(|(e, _)| e).collect()
    }

    /// Prompt rendering, e.g. "목 0, 화 2, 토 2, 금 3, 수 1"
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(e, n)| format!("{} {}", e.korean(), n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_sums_to_eight() {
        let tally = ElementTally::from_glyphs("庚午辛巳庚辰癸未".chars());
        assert_eq!(tally.total(), 8);
        assert_eq!(tally.wood, 0);
        assert_eq!(tally.fire, 2);
        assert_eq!(tally.earth, 2);
        assert_eq!(tally.metal, 3);
        assert_eq!(tally.water, 1);
        assert_eq!(tally.missing(), vec![FiveElement::Wood]);
        assert_eq!(tally.dominant(), vec![FiveElement::Metal]);
    }

    #[test]
    fn test_unrecognised_glyphs_contribute_nothing() {
        let tally = ElementTally::from_glyphs("甲子乙丑??".chars());
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.wood, 2);
        assert_eq!(tally.water, 1);
        assert_eq!(tally.earth, 1);
    }

    #[test]
    fn test_all_categories_present_in_json() {
        let json = serde_json::to_value(ElementTally::from_glyphs("丙午".chars())).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["wood", "fire", "earth", "metal", "water"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj["fire"], 2);
        assert_eq!(obj["water"], 0);
    }

    #[test]
    fn test_every_stem_and_branch_is_classified() {
        let all = "甲乙丙丁戊己庚辛壬癸子丑寅卯辰巳午未申酉戌亥";
        assert_eq!(ElementTally::from_glyphs(all.chars()).total(), 22);
        assert!(ElementTally::default().dominant().is_empty());
    }
}
