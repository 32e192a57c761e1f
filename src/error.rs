use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::backend::BackendError;

/// Shown on the login/signup screen when the backend gives no usable message.
pub const GENERIC_AUTH_MESSAGE: &str = "Algo deu errado. Tente novamente.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Turn a failed auth call into the single user-facing string of the auth form.
    pub fn auth(err: BackendError) -> Self {
        tracing::warn!(error = %err, "Authentication call failed");
        match err.backend_message() {
            Some(msg) if !msg.trim().is_empty() => AppError::Auth(msg.to_string()),
            _ => AppError::Auth(GENERIC_AUTH_MESSAGE.into()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Auth(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Backend(BackendError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not found".into())
            }
            AppError::Backend(e) => {
                tracing::error!(error = %e, "Backend error");
                (StatusCode::BAD_GATEWAY, "Backend unavailable".into())
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "code": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
