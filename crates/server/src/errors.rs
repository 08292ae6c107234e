use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::Message;
use service::auth::errors::AuthError;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred while processing the request.";

/// Error surfaced to HTTP clients as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                INTERNAL_MESSAGE.to_string()
            }
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => m,
        };
        (status, Json(Message::new(message))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => ApiError::BadRequest(m),
            ServiceError::Conflict(m) => ApiError::Conflict(m),
            ServiceError::Model(models::errors::ModelError::Validation(m)) => ApiError::BadRequest(m),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) => ApiError::BadRequest(m),
            AuthError::Conflict(m) => ApiError::Conflict(m),
            AuthError::NotFound => ApiError::NotFound("User not found.".into()),
            AuthError::Unauthorized => ApiError::Unauthorized("Invalid email or password.".into()),
            AuthError::Locked(until) => {
                ApiError::Unauthorized(format!("Account is locked until {}.", until.to_rfc3339()))
            }
            AuthError::TokenError(_) => ApiError::Unauthorized("Invalid or expired token.".into()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(e: sea_orm::DbErr) -> Self { ApiError::Internal(e.to_string()) }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        assert_eq!(ApiError::from(ServiceError::Validation("x".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ServiceError::Conflict("x".into())).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(ServiceError::Db("boom".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_to_status() {
        assert_eq!(ApiError::from(AuthError::Unauthorized).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::Locked(chrono::Utc::now())).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::Conflict("dup".into())).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(AuthError::HashError("h".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
