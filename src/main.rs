use axum::extract::State;
use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod dtos;
mod errors;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

use config::{AppConfig, StoreBackend};
use models::game::MATCHES_TABLE;
use services::memory_store::{games_to_rows, MemoryStore};
use services::session_service::SessionService;
use services::sheets_service::SheetsService;
use services::tabular_store::TabularStore;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "✅ Pool loaded: {} participants, {} phase deadlines",
        config.pool.participants.len(),
        config.pool.deadlines.len()
    );

    let store = match init_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("❌ Failed to initialize store: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match initialize_app_state(&config, store) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("❌ Failed to initialize app state: {}", e);
            std::process::exit(1);
        }
    };
    let app = build_router(app_state);
    start_server(&config, app).await;
}

async fn init_store(config: &AppConfig) -> anyhow::Result<Arc<dyn TabularStore>> {
    match config.store_backend {
        StoreBackend::Sheets => {
            let spreadsheet_id = config
                .spreadsheet_id
                .clone()
                .ok_or_else(|| anyhow::anyhow!("SPREADSHEET_ID must be set"))?;

            tracing::info!("🔧 Connecting to Google Sheets...");
            let sheets = SheetsService::new(
                spreadsheet_id,
                &config.service_account_path,
                config.store_timeout,
            )
            .await?;
            tracing::info!("✅ Google Sheets store initialized");
            Ok(Arc::new(sheets))
        }
        StoreBackend::Memory => {
            let store = match &config.memory_seed {
                Some(path) => MemoryStore::seeded_from_file(path)?,
                None => MemoryStore::new().with_table(MATCHES_TABLE, games_to_rows(&[])),
            };
            tracing::warn!("Using in-memory store, predictions are lost on restart");
            Ok(Arc::new(store))
        }
    }
}

fn initialize_app_state(
    config: &AppConfig,
    store: Arc<dyn TabularStore>,
) -> errors::Result<AppState> {
    let sessions = SessionService::new(config.jwt_secret.clone(), config.session_hours)?;

    Ok(AppState::new(
        store,
        &config.pool,
        sessions,
        config.matches_cache_ttl,
        config.predictions_cache_ttl,
    ))
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/health", get(api_health_check))
        .nest("/api/auth", routes::auth::routes())
        .nest("/api/phases", routes::phases::routes())
        .nest("/api/games", routes::games::routes())
        .nest(
            "/api/predictions",
            routes::predictions::prediction_routes(app_state.clone()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(config: &AppConfig, app: Router) {
    let addr = match format!("{}:{}", config.host, config.port).parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid HOST/PORT: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "⚽ Bolão Copa do Mundo 2026 API"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_health_check(State(state): State<AppState>) -> Json<Value> {
    let store_status = match state.store.ping().await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Json(json!({
        "status": "healthy",
        "store": store_status,
        "participants": state.directory.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
