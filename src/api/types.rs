//! API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::cursor::{CursorPage, NameCursor};
use crate::db::entities::app::{self, AppState};
use crate::web_ui::dialogs::DialogContent;

// ============================================================================
// Request Types
// ============================================================================

/// Query params for GET /api/apps
#[derive(Debug, Deserialize, Default)]
pub struct ListAppsQuery {
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

/// POST /api/apps request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    pub name: String,
    pub chain_id: Option<i32>,
}

/// POST /api/sessions request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Subject id already verified by the wallet-auth provider
    pub privy_did: String,
}

// ============================================================================
// Response Types
// ============================================================================

/// An app as returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub chain_id: Option<i32>,
    pub name: String,
    pub state: AppState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<app::Model> for AppResponse {
    fn from(model: app::Model) -> Self {
        Self {
            id: model.id,
            entity_id: model.entity_id,
            chain_id: model.chain_id,
            name: model.name,
            state: model.state,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// GET /api/apps response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAppsResponse {
    pub records: Vec<AppResponse>,
    /// Opaque token for the next page, absent on the last page
    pub next_cursor: Option<String>,
}

impl From<CursorPage<app::Model>> for ListAppsResponse {
    fn from(page: CursorPage<app::Model>) -> Self {
        let page = page.map(AppResponse::from);
        Self {
            next_cursor: page.next_cursor.as_ref().map(NameCursor::encode),
            records: page.records,
        }
    }
}

/// GET /api/apps/count response
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// POST /api/sessions response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub entity_id: Uuid,
    /// Seconds since the Unix epoch
    pub expires_at: u64,
}

/// One entry of GET /api/dialogs
#[derive(Debug, Serialize)]
pub struct DialogResponse {
    pub kind: &'static str,
    #[serde(flatten)]
    pub content: DialogContent,
}
