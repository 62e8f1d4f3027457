//! Walletbot application composition root
//!
//! Wires the identity provider, finance repository, per-chat stores and
//! chart service into a `Dispatcher` and exposes it over HTTP.

pub mod commands;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use walletbot_auth::{
    AuthBackend, AuthConfig, IdentityProvider, IdentityProviderFactory, SessionStore,
};
use walletbot_charts::QuickChart;
use walletbot_common::{Config, StoreProvider};
use walletbot_conversations::InMemoryConversationStore;
use walletbot_finance::{FinanceRepository, InMemoryFinanceRepository, PgFinanceRepository};

pub use commands::Dispatcher;
pub use state::AppState;

/// Create the main application router from configuration
pub async fn create_app(config: Config) -> Result<Router, anyhow::Error> {
    let finance = create_finance_repository(&config).await?;

    let auth_config = AuthConfig::from_env()?;
    let identity = IdentityProviderFactory::create(auth_config)?;

    let charts = QuickChart::new(&config.quickchart_url)?;

    let dispatcher = build_dispatcher(identity, finance, charts);
    Ok(router(AppState::new(dispatcher)))
}

/// Dispatcher over process-local session and conversation stores.
///
/// One conversation store backs both the engine and the session store, so
/// logging out drops the pending flow.
pub fn build_dispatcher(
    identity: Arc<dyn IdentityProvider>,
    finance: Arc<dyn FinanceRepository>,
    charts: QuickChart,
) -> Dispatcher {
    let conversations = Arc::new(InMemoryConversationStore::new());
    let sessions = SessionStore::in_memory(conversations.clone());
    let auth = AuthBackend::new(identity, sessions);
    Dispatcher::new(auth, finance, conversations, charts)
}

/// Router with infrastructure and API routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Walletbot API v0.1.0" }))
        .merge(routes::routes().with_state(state))
}

async fn create_finance_repository(
    config: &Config,
) -> Result<Arc<dyn FinanceRepository>, anyhow::Error> {
    match config.store_provider {
        StoreProvider::Memory => {
            tracing::warn!("Using in-memory finance store; data is lost on restart");
            Ok(Arc::new(InMemoryFinanceRepository::new()))
        }
        StoreProvider::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL is required when STORE_PROVIDER=postgres")
            })?;
            let pool = PgPool::connect(url)
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
            tracing::info!("Database connection established");

            let repository = PgFinanceRepository::new(pool);
            repository.migrate().await?;
            Ok(Arc::new(repository))
        }
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
