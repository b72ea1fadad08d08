//! Application Services (Use Cases)
//!
//! Orchestrates domain operations using repository and provider interfaces.

mod fortune_service;
mod history_service;

pub use fortune_service::{Analysis, FortuneService};
pub use history_service::HistoryService;
