use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::orchestration::errors::{PaymentError, RegistrationError};

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 503 Service Unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<RegistrationError> for ApiError {
    fn from(error: RegistrationError) -> Self {
        let message = error.to_string();
        match error {
            RegistrationError::Roster(_) | RegistrationError::EventNotOpen => {
                Self::bad_request(message)
            }
            RegistrationError::AlreadyRegistered
            | RegistrationError::EventFull
            | RegistrationError::ReconciliationInProgress(_)
            | RegistrationError::InvalidState(_) => Self::conflict(message),
            RegistrationError::EventNotFound(_)
            | RegistrationError::NotFound(_)
            | RegistrationError::TeamNotFound(_) => Self::not_found(message),
            RegistrationError::Payment(PaymentError::AmountMismatch { .. })
            | RegistrationError::Payment(PaymentError::IntentOutstanding(_)) => {
                Self::conflict(message)
            }
            RegistrationError::Payment(PaymentError::GatewayUnavailable(_)) => {
                Self::service_unavailable(message)
            }
            RegistrationError::Payment(PaymentError::Storage(_))
            | RegistrationError::Storage(_) => Self::internal_server_error(message),
        }
    }
}
