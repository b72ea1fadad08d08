//! Fortune Routes - Birth input in, report out

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Extension, Json, Router,
};

use saju::{AuthUser, DomainError, NewHistoryRecord};

use crate::models::{
    AnalysisMode, ApiError, ErrorResponse, FortuneReportResponse, FortuneRequest,
    FortuneResponse, SimpleFortuneResponse,
};
use crate::AppState;

/// Analyze a birth chart
///
/// `mode: "full"` (default) returns `{manse, commentary, themes}`;
/// `mode: "simple"` returns `{result}`.
#[utoipa::path(
    post,
    path = "/api/fortune",
    request_body = FortuneRequest,
    responses(
        (status = 200, description = "Report (or {result} in simple mode)", body = FortuneReportResponse),
        (status = 400, description = "Invalid or incomplete birth input", body = ErrorResponse),
        (status = 401, description = "Login required", body = ErrorResponse),
        (status = 500, description = "Analysis failed", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Fortune"
)]
pub async fn create_fortune(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<FortuneRequest>, JsonRejection>,
) -> Result<Json<FortuneResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| DomainError::validation(format!("잘못된 요청 형식입니다: {}", e)))?;

    let birth = request.to_birth_input()?;
    let provider = request.provider_or(state.fortune.default_provider())?;

    let (response, prompt) = match request.mode {
        AnalysisMode::Full => {
            let analysis = state.fortune.analyze(&birth, provider).await?;
            (
                FortuneResponse::Report(FortuneReportResponse::from(analysis.output)),
                analysis.prompt,
            )
        }
        AnalysisMode::Simple => {
            let analysis = state.fortune.analyze_simple(&birth, provider).await?;
            (
                FortuneResponse::Simple(SimpleFortuneResponse {
                    result: analysis.output,
                }),
                analysis.prompt,
            )
        }
    };

    // The analysis already succeeded; a failed save is logged, not surfaced
    match serde_json::to_value(&response) {
        Ok(result) => {
            if let Err(e) = state
                .history
                .record(NewHistoryRecord::new(&user.id, birth, provider, prompt, result))
                .await
            {
                tracing::warn!("⚠️  Failed to save history for {}: {}", user.id, e);
            }
        }
        Err(e) => {
            tracing::warn!("⚠️  Could not serialize report for {}'s history: {}", user.id, e);
        }
    }

    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/fortune", post(create_fortune))
}
