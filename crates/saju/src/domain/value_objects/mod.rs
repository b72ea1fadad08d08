//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod calendar_type;
mod gender;
mod provider;

pub use calendar_type::*;
pub use gender::*;
pub use provider::*;
