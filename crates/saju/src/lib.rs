//! Saju Domain Library
//!
//! Core domain types and interfaces for the Saju (四柱八字) fortune service.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Birth input, pillars, five elements, reports, history
//!   - `value_objects/`: Immutable value types (Provider, Gender, CalendarType)
//!   - `services/`: Calendar (만세력), prompt building, response cleanup
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: History persistence
//!   - `services/`: LLM providers and identity
//!
//! # Usage
//!
//! ```rust,ignore
//! use saju::domain::services::ManseCalendar;
//! use saju::{BirthInput, CalendarType, Gender};
//!
//! let birth = BirthInput::new(1990, 5, 15, None, Gender::Male, CalendarType::Solar, false)?;
//! let manse = ManseCalendar::new().manse(&birth)?;
//! println!("{}", manse.pillars.display_line());
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AuthUser, BirthInput, CalendarType, DomainError, ElementTally, FiveElement, FortuneReport,
    FourPillars, Gender, HistoryRecord, LunarDate, Manse, NewHistoryRecord, Pillar, Provider,
    Theme,
};
pub use ports::{
    ChatMessage, CompletionOptions, CompletionResponse, HistoryRepository, IdentityProvider,
    LlmProvider, MessageRole, TokenUsage,
};
