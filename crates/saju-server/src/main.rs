use sqlx::PgPool;
use std::sync::Arc;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;
#[cfg(test)]
mod testing;

use adapters::{AnthropicProvider, OpenAiProvider, PgHistoryRepository, SupabaseAuth};
use application::{FortuneService, HistoryService};
use config::AppConfig;
use saju::IdentityProvider;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub fortune: Arc<FortuneService>,
    pub history: Arc<HistoryService>,
    /// `None` disables login; requests then run as the anonymous user
    pub identity: Option<Arc<dyn IdentityProvider>>,
    pub config: Arc<AppConfig>,
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🔮 Saju API initializing...");

    let config = AppConfig::from_lookup(|key| secrets.get(key));

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;

    tracing::info!("✅ Database migrations completed");

    if config.openai_api_key.is_none() {
        tracing::warn!("⚠️  No OPENAI_API_KEY set - OpenAI requests will fail");
    }
    if config.anthropic_api_key.is_none() {
        tracing::warn!("⚠️  No ANTHROPIC_API_KEY set - Anthropic requests will fail");
    }

    let openai =
        OpenAiProvider::new(config.openai_api_key.clone()).with_model(&config.openai_model);
    let anthropic = AnthropicProvider::new(config.anthropic_api_key.clone())
        .with_model(&config.anthropic_model);

    tracing::info!(
        "🤖 LLM providers: openai={}, anthropic={} (default {})",
        config.openai_model,
        config.anthropic_model,
        config.default_provider
    );

    let identity: Option<Arc<dyn IdentityProvider>> = match &config.supabase {
        Some(supabase) => {
            tracing::info!("🔐 Kakao login enabled via Supabase");
            Some(Arc::new(SupabaseAuth::new(supabase)))
        }
        None => {
            tracing::warn!("⚠️  No SUPABASE_URL set - authentication disabled");
            None
        }
    };

    // Initialize application services
    let fortune = FortuneService::new(config.default_provider, config.temperature)
        .with_provider(Arc::new(openai))
        .with_provider(Arc::new(anthropic));
    let history = HistoryService::new(Arc::new(PgHistoryRepository::new(pool)));

    let state = AppState {
        fortune: Arc::new(fortune),
        history: Arc::new(history),
        identity,
        config: Arc::new(config),
    };

    let router = routes::build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Saju API ready");

    Ok(router.into())
}
