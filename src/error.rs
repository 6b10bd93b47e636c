//! Error handling for the application

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::crm::CrmError;
use crate::places::PlacesError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Maps error: {0}")]
    Places(#[from] PlacesError),

    #[error("CRM error: {0}")]
    Crm(#[from] CrmError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Failure body returned by every route
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error. Please contact us directly.".to_string(),
                )
            }
            AppError::Crm(CrmError::NotConfigured(what)) => {
                tracing::error!("CRM not configured: {} missing", what);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error. Please contact us directly.".to_string(),
                )
            }
            AppError::Crm(CrmError::Status { status, body }) => (
                StatusCode::BAD_GATEWAY,
                format!("Submission failed ({status}): {body}"),
            ),
            AppError::Crm(e) => {
                tracing::error!("CRM error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "We couldn't send your details. Please try again.".to_string(),
                )
            }
            AppError::Places(e) => {
                tracing::warn!("Maps error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Address lookup is unavailable. Please try again.".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::Configuration("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Crm(CrmError::NotConfigured("GHL_WEBHOOK_URL")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Crm(CrmError::Status { status: 422, body: "bad email".into() }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Places(PlacesError::NoRoute("nowhere".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
