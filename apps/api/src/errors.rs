use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::profile::repository::RepoError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(user_id) => {
                AppError::NotFound(format!("사용자 정보를 찾을 수 없습니다: {user_id}"))
            }
            RepoError::Invalid(msg) => AppError::Validation(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Auth(e) => {
                let (status, code) = match e {
                    AuthError::InvalidEmail | AuthError::WeakPassword => {
                        (StatusCode::BAD_REQUEST, "AUTH_REJECTED")
                    }
                    AuthError::EmailExists => (StatusCode::CONFLICT, "EMAIL_EXISTS"),
                    AuthError::InvalidCredentials | AuthError::UserDisabled => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
                    }
                    AuthError::TooManyAttempts => {
                        (StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_ATTEMPTS")
                    }
                    AuthError::Provider(_) | AuthError::Unavailable(_) => {
                        tracing::error!("Identity provider error: {e}");
                        (StatusCode::BAD_GATEWAY, "AUTH_PROVIDER_ERROR")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
