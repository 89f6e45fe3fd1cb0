use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::auth::{self, SESSION_COOKIE};
use super::types::*;
use super::ServerState;
use crate::db::apps::{self, NewApp};
use crate::db::console_entities;
use crate::db::cursor::NameCursor;
use crate::error::{Result, ServerError};
use crate::web_ui::dialogs::{compose_all, AuthStatus};

/// Longest app name accepted, in characters
const MAX_APP_NAME_LEN: usize = 64;

/// Longest wallet-auth subject id accepted
const MAX_PRIVY_DID_LEN: usize = 255;

/// POST /api/sessions - Open a session for a wallet-auth subject
pub async fn create_session(
    State(state): State<Arc<ServerState>>,
    req: std::result::Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = req?;
    let privy_did = req.privy_did.trim();
    if privy_did.is_empty() || privy_did.len() > MAX_PRIVY_DID_LEN {
        return Err(ServerError::InvalidRequest(format!(
            "privyDid must be 1-{} characters",
            MAX_PRIVY_DID_LEN
        )));
    }

    let entity = console_entities::find_or_create_entity_by_privy_did(&state.db, privy_did).await?;
    let issued = state.sessions.issue(entity.id);
    tracing::info!("Opened session for entity {}", entity.id);

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        issued.token,
        state.config.session_ttl.as_secs()
    );
    let body = SessionResponse {
        expires_at: issued.session.expires_at_secs(),
        entity_id: entity.id,
        token: issued.token,
    };

    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// DELETE /api/sessions - Revoke the caller's session
pub async fn delete_session(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Response> {
    let token = auth::extract_token(&headers).ok_or(ServerError::AuthRequired)?;
    if !state.sessions.revoke(&token) {
        return Err(ServerError::AuthRequired);
    }

    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}

/// GET /api/apps - Page through the caller's active apps
pub async fn list_apps(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    query: std::result::Result<Query<ListAppsQuery>, QueryRejection>,
) -> Result<Json<ListAppsResponse>> {
    let session = auth::require_session(&state.sessions, &headers)?;
    let Query(query) = query?;

    let limit = state.config.page_limit(query.limit);
    let cursor = match query.cursor.as_deref().filter(|c| !c.is_empty()) {
        Some(token) => Some(NameCursor::decode(token)?),
        None => None,
    };

    let page = apps::get_active_apps_for_entity_by_cursor(
        &state.db,
        session.entity_id,
        limit,
        cursor.as_ref(),
    )
    .await?;

    Ok(Json(page.into()))
}

/// GET /api/apps/count - Number of the caller's active apps
pub async fn count_apps(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Json<CountResponse>> {
    let session = auth::require_session(&state.sessions, &headers)?;
    let count = apps::get_active_apps_count(&state.db, session.entity_id).await?;
    Ok(Json(CountResponse { count }))
}

/// POST /api/apps - Register a new app for the caller
pub async fn create_app(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    req: std::result::Result<Json<CreateAppRequest>, JsonRejection>,
) -> Result<Response> {
    let session = auth::require_session(&state.sessions, &headers)?;
    let Json(req) = req?;

    let name = req.name.trim();
    let name_len = name.chars().count();
    if name_len == 0 || name_len > MAX_APP_NAME_LEN {
        return Err(ServerError::InvalidRequest(format!(
            "App name must be 1-{} characters",
            MAX_APP_NAME_LEN
        )));
    }
    if matches!(req.chain_id, Some(id) if id <= 0) {
        return Err(ServerError::InvalidRequest(
            "chainId must be a positive integer".to_string(),
        ));
    }

    if console_entities::find_entity_by_id(&state.db, session.entity_id)
        .await?
        .is_none()
    {
        return Err(ServerError::EntityNotFound(session.entity_id.to_string()));
    }

    let lock = state.app_create_lock(session.entity_id);
    let _guard = lock.lock().await;

    let active = apps::get_active_apps_count(&state.db, session.entity_id).await?;
    if active >= state.config.max_active_apps {
        return Err(ServerError::AppLimitReached(state.config.max_active_apps));
    }

    let stored = apps::insert_app(
        &state.db,
        NewApp {
            entity_id: session.entity_id,
            chain_id: req.chain_id,
            name: name.to_string(),
            state: None,
        },
    )
    .await?;
    tracing::info!("Created app {} ({}) for entity {}", stored.id, stored.name, stored.entity_id);

    Ok((StatusCode::CREATED, Json(AppResponse::from(stored))).into_response())
}

/// GET /api/dialogs - Every console dialog composed for the caller
pub async fn list_dialogs(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Json<Vec<DialogResponse>> {
    let auth: AuthStatus = auth::current_session(&state.sessions, &headers)
        .is_some()
        .into();

    let dialogs = compose_all(auth)
        .into_iter()
        .map(|(kind, content)| DialogResponse {
            kind: kind.slug(),
            content,
        })
        .collect();

    Json(dialogs)
}

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
