//! API Models
//!
//! Request/response DTOs for the HTTP API. Domain types are converted at
//! this boundary so the wire format stays camelCase and documented.

mod auth;
mod error;
mod fortune;
mod history;

pub use auth::*;
pub use error::*;
pub use fortune::*;
pub use history::*;
