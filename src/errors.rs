// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Remote resource not found: {0}")]
    ResourceNotFound(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Invalid name or code")]
    InvalidCredentials,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Fill in at least one prediction")]
    EmptySubmission,

    #[error("Predictions for phase '{0}' are closed")]
    PhaseClosed(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Match not found: {0}")]
    MatchNotFound(u32),

    #[error("Malformed row in {table}: {reason}")]
    MalformedRow { table: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable"),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "Remote resource not found"),
            AppError::ExternalApi(_) => (StatusCode::BAD_GATEWAY, "External API error"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid name or code"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized access"),
            AppError::EmptySubmission => (StatusCode::BAD_REQUEST, "Empty submission"),
            AppError::PhaseClosed(_) => (StatusCode::FORBIDDEN, "Phase closed"),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            AppError::MatchNotFound(_) => (StatusCode::NOT_FOUND, "Match not found"),
            AppError::MalformedRow { .. } => (StatusCode::BAD_GATEWAY, "Malformed store data"),
            AppError::ConfigurationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error"),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO error"),
            AppError::InternalServerError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        match status {
            s if s.is_server_error() => tracing::error!("{}", self),
            _ => tracing::debug!("{}", self),
        }

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON parsing error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            AppError::StoreUnavailable(format!("HTTP request failed: {}", err))
        } else {
            AppError::ExternalApi(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthorized
    }
}

// Helper conversion functions
impl AppError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        AppError::StoreUnavailable(msg.into())
    }

    pub fn external_api(msg: impl Into<String>) -> Self {
        AppError::ExternalApi(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }

    pub fn malformed(table: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::MalformedRow {
            table: table.into(),
            reason: reason.into(),
        }
    }

    pub fn internal_server_error(msg: impl Into<String>) -> Self {
        AppError::InternalServerError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::EmptySubmission.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::PhaseClosed("Final".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::store_unavailable("down").into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::ResourceNotFound("JOGOS".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
