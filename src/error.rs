//! Error types for the attendance service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    BadValue = 4,
    InvalidGeofence = 5,
    NoSuchEvent = 6,
    EventNotStarted = 7,
    EventEnded = 8,
    OutsideGeofence = 9,
    NoActiveSession = 10,
    AlreadyCheckedIn = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid geofence: {0}")]
    InvalidGeofence(String),

    #[error("Event {0} not found")]
    EventNotFound(i64),

    #[error("Event has not started yet")]
    EventNotStarted,

    #[error("Event has already ended")]
    EventEnded,

    #[error("User is not within the event geofence")]
    OutsideGeofence,

    #[error("No active check-in found for this event")]
    NoActiveSession,

    #[error("User is already checked in to this event")]
    AlreadyCheckedIn,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Attach the name of the failing operation to a raw storage error.
    /// Every other variant passes through untouched.
    pub fn during(self, operation: &'static str) -> Self {
        match self {
            AppError::Database(source) => AppError::Storage { operation, source },
            other => other,
        }
    }

    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::InvalidGeofence(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidGeofence),
            AppError::EventNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchEvent),
            AppError::EventNotStarted => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::EventNotStarted)
            }
            AppError::EventEnded => (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::EventEnded),
            AppError::OutsideGeofence => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::OutsideGeofence)
            }
            AppError::NoActiveSession => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::NoActiveSession)
            }
            AppError::AlreadyCheckedIn => (StatusCode::CONFLICT, ErrorCode::AlreadyCheckedIn),
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized),
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue)
            }
            AppError::Database(_) | AppError::Storage { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure)
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Storage { operation, source } => {
                tracing::error!("Storage error during {}: {:?}", operation, source);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
