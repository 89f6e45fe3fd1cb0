pub mod auth;
pub mod handlers;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use parking_lot::Mutex;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::config::ServerConfig;
use auth::SessionStore;

/// How often expired sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Application state shared across handlers
pub struct ServerState {
    pub db: DatabaseConnection,
    pub sessions: SessionStore,
    pub config: ServerConfig,
    /// Serializes app creation per entity so the active-app cap holds
    app_create_locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, config: ServerConfig) -> Self {
        Self {
            db,
            sessions: SessionStore::new(config.session_ttl),
            config,
            app_create_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Guard for the count-then-insert done when an entity creates an app
    pub fn app_create_lock(&self, entity_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        self.app_create_locks
            .lock()
            .entry(entity_id)
            .or_default()
            .clone()
    }

    /// Periodically drop expired sessions for as long as the state is alive
    pub fn start_session_sweeper(state: &Arc<ServerState>) -> tokio::task::JoinHandle<()> {
        let weak = Arc::downgrade(state);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                let Some(state) = weak.upgrade() else { break };
                let removed = state.sessions.cleanup_expired();
                if removed > 0 {
                    tracing::debug!("Removed {} expired sessions", removed);
                }
            }
        })
    }
}

/// Create the JSON API router
pub fn router() -> Router<Arc<ServerState>> {
    Router::new()
        .route(
            "/api/sessions",
            post(handlers::create_session).delete(handlers::delete_session),
        )
        .route("/api/apps", get(handlers::list_apps).post(handlers::create_app))
        .route("/api/apps/count", get(handlers::count_apps))
        .route("/api/dialogs", get(handlers::list_dialogs))
        .route("/health", get(handlers::health))
}
