use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Dialog not found: {0}")]
    DialogNotFound(String),

    #[error("Invalid cursor")]
    InvalidCursor,

    #[error("Active app limit reached ({0})")]
    AppLimitReached(u64),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::EntityNotFound(_) | ServerError::DialogNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidCursor | ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::AppLimitReached(_) => StatusCode::CONFLICT,
            ServerError::AuthRequired => StatusCode::UNAUTHORIZED,
            ServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(serde_json::json!({ "error": message }));
        if matches!(self, ServerError::AuthRequired) {
            return (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer realm=\"dapp-console\"")],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
