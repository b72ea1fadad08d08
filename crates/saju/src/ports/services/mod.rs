//! Service Ports
//!
//! Abstract interfaces for external services.

mod identity;
mod llm_provider;

pub use identity::*;
pub use llm_provider::*;
