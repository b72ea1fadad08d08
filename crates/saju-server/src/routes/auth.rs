//! Auth Routes - Kakao login through Supabase

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};

use saju::{AuthUser, DomainError};

use crate::models::{ApiError, ClientConfigResponse, ErrorResponse, LoginQuery, MeResponse};
use crate::AppState;

/// Public settings for the browser page
#[utoipa::path(
    get,
    path = "/api/client-config",
    responses(
        (status = 200, description = "Client configuration", body = ClientConfigResponse)
    ),
    tag = "Auth"
)]
pub async fn client_config(State(state): State<AppState>) -> Json<ClientConfigResponse> {
    Json(ClientConfigResponse {
        kakao_js_key: state.config.kakao_js_key.clone(),
        auth_enabled: state.identity.is_some(),
    })
}

/// Start Kakao login (302 to the Supabase authorize URL)
#[utoipa::path(
    get,
    path = "/auth/login",
    params(LoginQuery),
    responses(
        (status = 302, description = "Redirect to the identity provider"),
        (status = 500, description = "Login not configured", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
) -> Result<Response, ApiError> {
    let identity = state
        .identity
        .as_ref()
        .ok_or_else(|| DomainError::MissingCredential("SUPABASE_URL".to_string()))?;

    let redirect_to = query
        .redirect_to
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| site_root(&headers));
    let location = identity.authorize_url(&redirect_to);

    tracing::info!("🔑 Login redirect (return to {})", redirect_to);
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Login required", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Auth"
)]
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(user.into())
}

/// "scheme://host/" of the incoming request, honouring proxy headers
fn site_root(headers: &HeaderMap) -> String {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let scheme = header_str("x-forwarded-proto").unwrap_or("http");
    let host = header_str("x-forwarded-host")
        .or_else(|| header_str(header::HOST.as_str()))
        .unwrap_or("localhost:8000");
    format!("{}://{}/", scheme, host)
}

/// Routes that need no session
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/client-config", get(client_config))
        .route("/auth/login", get(login))
}

/// Routes behind the auth middleware
pub fn router() -> Router<AppState> {
    Router::new().route("/api/me", get(me))
}
