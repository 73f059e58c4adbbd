pub mod interfaces;
pub mod switches;
pub mod system;
pub mod vlans;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::rest::SwitchError;

/// Error payload: a message, a stable taxonomy tag the UI switches on, and an
/// optional recovery suggestion. The UI must never re-derive meaning from the
/// free-text message.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// API error type
pub struct ApiError {
    status: StatusCode,
    message: String,
    error_type: &'static str,
    suggestion: Option<String>,
}

impl ApiError {
    /// Input rejected before any network call.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
            error_type: "validation_error",
            suggestion: None,
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{} not found", resource),
            error_type: "not_found",
            suggestion: None,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
            error_type: "conflict",
            suggestion: None,
        }
    }
}

impl From<SwitchError> for ApiError {
    fn from(err: SwitchError) -> Self {
        let status = match &err {
            SwitchError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            SwitchError::CentralManaged { .. } | SwitchError::PermissionDenied { .. } => {
                StatusCode::FORBIDDEN
            }
            SwitchError::SessionLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
            SwitchError::Connection { .. } => StatusCode::BAD_GATEWAY,
            SwitchError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            SwitchError::ApiUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            SwitchError::Validation { .. } => StatusCode::BAD_REQUEST,
            SwitchError::Unknown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
            error_type: err.error_type(),
            suggestion: Some(err.suggestion().to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                error_type: self.error_type.to_string(),
                suggestion: self.suggestion,
            }),
        )
            .into_response()
    }
}

/// Helper for 201 Created responses
pub fn created<T>(value: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(value))
}
