//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AnalysisMode, ClientConfigResponse, ElementsResponse, ErrorResponse, FortuneReportResponse,
    FortuneRequest, HistoryDetailResponse, HistoryItemResponse, ManseResponse, MeResponse,
    PillarResponse, PillarsResponse, SimpleFortuneResponse, ThemeResponse,
};

use super::HealthCheck;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::health_check,
        // Fortune
        super::fortune::create_fortune,
        // History
        super::history::list_history,
        super::history::get_history,
        // Auth
        super::auth::client_config,
        super::auth::login,
        super::auth::me,
    ),
    components(
        schemas(
            HealthCheck,
            FortuneRequest,
            AnalysisMode,
            FortuneReportResponse,
            SimpleFortuneResponse,
            ManseResponse,
            PillarsResponse,
            PillarResponse,
            ElementsResponse,
            ThemeResponse,
            HistoryItemResponse,
            HistoryDetailResponse,
            ClientConfigResponse,
            MeResponse,
            ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Fortune", description = "Four-pillars analysis (사주 분석)"),
        (name = "History", description = "Past analyses of the current user"),
        (name = "Auth", description = "Kakao login through Supabase"),
        (name = "Health", description = "Liveness")
    ),
    info(
        title = "Saju API",
        version = "0.2.0",
        description = "Four-pillars (四柱八字) fortune analysis backed by OpenAI or Anthropic"
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
