//! AuthUser - Identity resolved from the hosted auth service

use serde::{Deserialize, Serialize};

/// Identifier used when authentication is disabled
pub const ANONYMOUS_USER_ID: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl AuthUser {
    pub fn anonymous() -> Self {
        Self {
            id: ANONYMOUS_USER_ID.to_string(),
            name: None,
            email: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.id == ANONYMOUS_USER_ID
    }

    /// Name for greetings, falling back to the email local part
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "손님".to_string())
    }
}
