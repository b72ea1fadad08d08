//! Saju API Routes
//!
//! - / - Single-page UI
//! - /api/fortune - Birth chart analysis
//! - /api/history - Past analyses
//! - /api/me, /api/client-config, /auth/login - Kakao login via Supabase
//! - /swagger-ui - OpenAPI docs

pub mod auth;
pub mod fortune;
pub mod history;
pub mod page;
pub mod swagger;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is running", body = HealthCheck)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Saju API is running - the four pillars stand".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full application router with shared state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require a session when auth is configured)
    let protected_routes = Router::new()
        .merge(fortune::router())
        .merge(history::router())
        .merge(auth::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(page::router())
        .merge(auth::public_router())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
