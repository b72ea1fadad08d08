//! Bearer Token Authentication
//!
//! Tokens are Supabase access tokens. The resolved user is stored as a
//! request extension for handlers to pick up with `Extension<AuthUser>`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use saju::{AuthUser, DomainError};

use crate::models::ApiError;
use crate::AppState;

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
/// Resolves the bearer token, or runs as the anonymous user when no identity provider is configured
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(identity) = state.identity.as_ref() else {
        request.extensions_mut().insert(AuthUser::anonymous());
        return Ok(next.run(request).await);
    };

    let token = match bearer_token(request.headers()) {
        Some(token) => token.to_string(),
        None => {
            tracing::warn!("Missing Authorization header");
            return Err(DomainError::Unauthorized("Missing bearer token".to_string()).into());
        }
    };

    let user = identity.verify(&token).await.map_err(|e| {
        tracing::warn!("Rejected session: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
