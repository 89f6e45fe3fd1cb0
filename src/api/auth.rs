//! Session management.
//!
//! Sessions map an opaque bearer token to the entity it acts for. Only the
//! SHA-256 hash of a token is kept; the raw token is returned once at issue.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Result, ServerError};

/// Cookie carrying the session token for browser callers
pub const SESSION_COOKIE: &str = "console_session";

/// A live session
#[derive(Clone, Debug)]
pub struct Session {
    pub entity_id: Uuid,
    pub expires_at: SystemTime,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() > self.expires_at
    }

    /// Expiry as seconds since the epoch
    pub fn expires_at_secs(&self) -> u64 {
        self.expires_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A freshly issued session with its raw token
#[derive(Clone, Debug)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"dapp-console-session:");
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Generate a random token (two v4 UUIDs worth of randomness)
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(Uuid::new_v4().as_bytes());
    bytes[16..].copy_from_slice(Uuid::new_v4().as_bytes());
    BASE64.encode(bytes)
}

/// In-memory session store
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a session for an entity
    pub fn issue(&self, entity_id: Uuid) -> IssuedSession {
        let token = generate_token();
        let session = Session {
            entity_id,
            expires_at: SystemTime::now() + self.ttl,
        };

        let mut sessions = self.sessions.write();
        sessions.insert(hash_token(&token), session.clone());

        IssuedSession { token, session }
    }

    /// Validate a raw token
    pub fn validate(&self, token: &str) -> Result<Session> {
        let sessions = self.sessions.read();
        let session = sessions
            .get(&hash_token(token))
            .ok_or(ServerError::AuthRequired)?;

        if session.is_expired() {
            return Err(ServerError::AuthRequired);
        }

        Ok(session.clone())
    }

    /// Revoke a session. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write();
        sessions.remove(&hash_token(token)).is_some()
    }

    /// Drop expired sessions, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        before - sessions.len()
    }
}

/// Pull the raw session token from `Authorization: Bearer` or the session cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_str) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Resolve the caller's session, if any
pub fn current_session(store: &SessionStore, headers: &HeaderMap) -> Option<Session> {
    let token = extract_token(headers)?;
    store.validate(&token).ok()
}

/// Resolve the caller's session or fail with `AuthRequired`
pub fn require_session(store: &SessionStore, headers: &HeaderMap) -> Result<Session> {
    current_session(store, headers).ok_or(ServerError::AuthRequired)
}
