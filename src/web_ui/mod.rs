//! Web UI Module
//!
//! Server-rendered console dialogs. The dialog content itself is composed by
//! the pure functions in [`dialogs`]; this module only decides who is asking
//! and renders the result.

pub mod dialogs;
mod routes;
mod templates;

use axum::Router;
use std::sync::Arc;

use crate::api::ServerState;

/// Create the web UI router.
/// Mount this with `.merge(web_ui::router())` in main.rs
pub fn router() -> Router<Arc<ServerState>> {
    routes::create_router()
}
