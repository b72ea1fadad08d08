//! Domain Services
//!
//! Pure computations over domain entities:
//! - `manse`: calendar conversion and four-pillar derivation
//! - `prompt`: prompt construction from a birth input and chart
//! - `cleanup`: recovery of JSON objects from raw model output

pub mod cleanup;
pub mod manse;
pub mod prompt;

pub use cleanup::{clean_json_response, extract_commentary, extract_themes};
pub use manse::{LunarMonth, ManseCalendar};
pub use prompt::{
    commentary_prompt, simple_prompt, system_prompt, themes_prompt, ThemeSpec, GENERAL_THEMES,
    LIFE_THEMES,
};
