mod api;
mod config;
mod db;
mod error;
mod web_ui;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::ServerState;
use config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dapp_console_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let db = match db::init_database(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr;
    let state = Arc::new(ServerState::new(db, config));
    ServerState::start_session_sweeper(&state);

    let app = Router::new()
        // JSON API
        .merge(api::router())
        // Server-rendered console dialogs
        .merge(web_ui::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Dapp console API starting on http://{}", addr);
    tracing::info!("  POST /api/sessions    - Open a session");
    tracing::info!("  GET  /api/apps        - List active apps");
    tracing::info!("  POST /api/apps        - Create an app");
    tracing::info!("  GET  /console         - Console dialogs");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
