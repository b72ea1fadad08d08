//! Identity Provider Port
//!
//! Resolves bearer tokens into users and builds the OAuth login URL.
//! Supabase (with Kakao as the OAuth provider) implements it in the server crate.

use async_trait::async_trait;

use crate::domain::entities::AuthUser;
use crate::domain::errors::DomainError;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve an access token. Invalid or expired tokens yield
    /// [`DomainError::Unauthorized`].
    async fn verify(&self, access_token: &str) -> Result<AuthUser, DomainError>;

    /// URL that starts the Kakao OAuth flow and returns to `redirect_to`
    fn authorize_url(&self, redirect_to: &str) -> String;
}
