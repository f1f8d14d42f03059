//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use curator::CuratorError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("{0}")]
    Curator(#[from] CuratorError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },
}

impl WebServerError {
    pub fn config(field: impl Into<String>) -> Self {
        Self::ConfigurationError { field: field.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebServerError::NotFound(_) => StatusCode::NOT_FOUND,
            WebServerError::Curator(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            WebServerError::Curator(err) => match err {
                CuratorError::InvalidArgument { .. }
                | CuratorError::CaseMismatch { .. }
                | CuratorError::UnknownAction { .. } => StatusCode::BAD_REQUEST,
                CuratorError::OracleError(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({"success": false, "error": self.to_string()}));
        (status, body).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing = WebServerError::from(CuratorError::ItemNotFound { item_id: "x".into() });
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let no_document = WebServerError::from(CuratorError::DocumentNotFound { case: "C1".into() });
        assert_eq!(no_document.status_code(), StatusCode::NOT_FOUND);

        let bad = WebServerError::from(CuratorError::invalid_argument("case name"));
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);

        let failed = WebServerError::OptimizationFailed("boom".into());
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_curator_message_is_passed_through() {
        let err = WebServerError::from(CuratorError::ItemNotFound { item_id: "x".into() });
        assert_eq!(err.to_string(), "Item with ID x not found");
    }
}
