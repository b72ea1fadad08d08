//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod llm;
pub mod postgres;
pub mod supabase;

// Re-exports
pub use llm::{AnthropicProvider, OpenAiProvider};
pub use postgres::PgHistoryRepository;
pub use supabase::SupabaseAuth;
