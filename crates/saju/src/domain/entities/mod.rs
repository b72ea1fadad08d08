//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - BirthInput: The submitted birth information
//! - Pillar / FourPillars: Stem-branch chart (八字)
//! - FiveElement / ElementTally: 오행 classification
//! - Manse / FortuneReport / Theme: Derived chart and LLM report
//! - HistoryRecord: Stored submission
//! - AuthUser: Logged-in identity

mod birth;
mod element;
mod fortune;
mod history;
mod pillars;
mod user;

pub use birth::*;
pub use element::*;
pub use fortune::*;
pub use history::*;
pub use pillars::*;
pub use user::*;
