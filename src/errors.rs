use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Error kinds that can cross the engine/gateway boundary.
///
/// Every variant here is one of the enumerated
/// `ErrorKind`s, never a bare string or a leaked ORM error type.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("local store unavailable: {0}")]
    LocalStoreUnavailable(String),

    #[error("data integrity error: {0}")]
    DataIntegrityError(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("request timed out")]
    Timeout,
}

impl ServiceError {
    /// Classifies a SeaORM error the way `db.rs::is_retryable_error` does,
    /// but maps straight to a `ServiceError` kind instead of a retry decision
    /// (the engine never retries internally).
    pub fn from_gateway_db_err(err: DbErr) -> Self {
        ServiceError::UpstreamUnavailable(err.to_string())
    }

    pub fn from_store_db_err(err: DbErr) -> Self {
        ServiceError::LocalStoreUnavailable(err.to_string())
    }
}

/// Boundary error returned by HTTP handlers. Wraps `ServiceError` plus the
/// pure-transport variants that never originate inside the engine.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let correlation_id = Uuid::new_v4();

        let (status, kind, message) = match &self {
            ApiError::Service(ServiceError::ValidationError(msg)) => {
                (StatusCode::BAD_REQUEST, "ValidationError", msg.clone())
            }
            ApiError::Service(ServiceError::UpstreamUnavailable(msg)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UpstreamUnavailable",
                msg.clone(),
            ),
            ApiError::Service(ServiceError::LocalStoreUnavailable(msg)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LocalStoreUnavailable",
                msg.clone(),
            ),
            ApiError::Service(ServiceError::DataIntegrityError(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DataIntegrityError",
                msg.clone(),
            ),
            ApiError::Service(ServiceError::InvariantViolation(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "InvariantViolation", msg.clone())
            }
            ApiError::Service(ServiceError::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Timeout",
                "the request exceeded its deadline".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BadRequest", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFound", msg.clone()),
        };

        error!(
            correlation_id = %correlation_id,
            kind = kind,
            "API error occurred: {}",
            message
        );

        (
            status,
            Json(json!({
                "error": kind,
                "message": message,
                "correlation_id": correlation_id.to_string(),
            })),
        )
            .into_response()
    }
}

/// Maps a `ServiceError` onto the HTTP boundary error.
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::Service(err)
}
