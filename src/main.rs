use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadflow_api::config::{Config, StoreBackend};
use leadflow_api::db::Database;
use leadflow_api::handlers::{self, AppState};
use leadflow_api::notifier::NotificationDispatcher;
use leadflow_api::pipeline::IngestionPipeline;
use leadflow_api::qualifier::QualifierClient;
use leadflow_api::store::{MemoryStore, PgStore, Store};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, opens the configured store
/// backend, wires the ingestion pipeline, and starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Open the configured store backend. A misconfigured or unreachable
    // database is a startup error, never a silent downgrade to memory.
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL required for postgres backend"))?;
            let db = Database::new(url).await?;
            tracing::info!("Database connection pool established");
            Arc::new(PgStore::new(db.pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; leads will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    // External collaborators
    let qualifier = QualifierClient::new(
        config.qualifier_url.clone(),
        Duration::from_secs(config.qualifier_timeout_secs),
    )?;
    tracing::info!("Qualifier client initialized: {}", config.qualifier_url);

    let notifier = NotificationDispatcher::new(
        config.webhook_url.clone(),
        config.followup_assignee.clone(),
    )?;
    tracing::info!("Webhook dispatcher initialized: {}", config.webhook_url);

    let pipeline = IngestionPipeline::new(store.clone(), qualifier, notifier);

    // Build application state
    let app_state = Arc::new(AppState {
        store,
        pipeline,
        config: config.clone(),
    });

    // Rate limiter for the public form endpoint: 10 req/sec per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("valid governor configuration"),
    );

    // API routes behind the protection layers
    let api_routes = Router::new()
        .route(
            "/leads",
            post(handlers::submit_lead).get(handlers::list_leads),
        )
        .route(
            "/market/competitors",
            get(handlers::list_competitors).post(handlers::create_competitor),
        )
        .route(
            "/market/trends",
            get(handlers::list_trends).post(handlers::create_trend),
        )
        .layer(
            ServiceBuilder::new()
                // Form submissions are small; 1MB is plenty
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Health check bypasses rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
