use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;

pub use auth::{AuthConfig, AuthError, AuthManager, DEFAULT_TOKEN_TTL};
pub use server::{ServerState, app, run_with_listener};

mod auth;
mod income;
mod purchases;
mod server;
mod tax;
mod user;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    Conflict(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

/// `Some` and, for text, non-blank. Missing required fields are a 400.
pub(crate) fn required<T>(value: Option<T>, name: &str) -> Result<T, ServerError> {
    value.ok_or_else(|| ServerError::Generic(format!("{name} is required")))
}

pub(crate) fn required_text(value: Option<String>, name: &str) -> Result<String, ServerError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ServerError::Generic(format!("{name} is required"))),
    }
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Duplicate(_) => StatusCode::CONFLICT,
        EngineError::InvalidAmount(_) | EngineError::InvalidDate(_) => StatusCode::BAD_REQUEST,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

fn status_for_auth_error(err: &AuthError) -> StatusCode {
    match err {
        AuthError::MissingCredentials | AuthError::BadCredentials => StatusCode::UNAUTHORIZED,
        AuthError::InvalidToken => StatusCode::FORBIDDEN,
        AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_auth_error(err: AuthError) -> String {
    match err {
        AuthError::Internal(detail) => {
            tracing::error!("auth failure: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Auth(err) => (status_for_auth_error(&err), message_for_auth_error(err)),
            ServerError::Conflict(err) => (StatusCode::CONFLICT, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}
