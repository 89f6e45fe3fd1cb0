//! Keyset cursors for `(name, id)` ordered listings.
//!
//! A cursor is the last row a client has seen. On the wire it is URL-safe,
//! unpadded base64 over `{"name":..,"id":..}` so it can travel in a query
//! string untouched.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServerError;

/// Resume position in a listing ordered by name, then id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCursor {
    pub name: String,
    pub id: Uuid,
}

impl NameCursor {
    pub fn new(name: impl Into<String>, id: Uuid) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    /// Encode as an opaque token
    pub fn encode(&self) -> String {
        // Serializing a String and a Uuid cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        BASE64.encode(json)
    }

    /// Decode a token produced by [`NameCursor::encode`]
    pub fn decode(token: &str) -> Result<Self, ServerError> {
        let bytes = BASE64
            .decode(token.trim())
            .map_err(|_| ServerError::InvalidCursor)?;
        serde_json::from_slice(&bytes).map_err(|_| ServerError::InvalidCursor)
    }
}

/// One page of a cursor-paginated listing.
#[derive(Clone, Debug)]
pub struct CursorPage<T> {
    pub records: Vec<T>,
    /// Present only when rows exist past the end of this page
    pub next_cursor: Option<NameCursor>,
}

impl<T> CursorPage<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            next_cursor: None,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> CursorPage<U> {
        CursorPage {
            records: self.records.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
