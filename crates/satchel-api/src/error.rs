//! Satchel API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use satchel_content::error::ContentError;
use satchel_core::error::DomainError;
use satchel_inventory::application::command_handlers::InventoryError;
use satchel_inventory::domain::actions::ActionResponse;
use satchel_inventory::domain::failure::{Failure, FailureKind};
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Content files could not be loaded.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses that are not action rejections.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
///
/// Inventory rule rejections are rendered as an action response so a client
/// reads every action outcome the same way; everything else gets an
/// [`ErrorBody`].
#[derive(Debug)]
pub enum ApiError {
    /// Aggregate lifecycle, persistence or validation failure.
    Domain(DomainError),
    /// An inventory rule rejected the request.
    Rejected(Failure),
    /// Static content lookup failure.
    Content(ContentError),
    /// A looked-up resource does not exist.
    NotFound(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        Self::Rejected(failure)
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Rejected(failure) => Self::Rejected(failure),
            InventoryError::Domain(err) => Self::Domain(err),
        }
    }
}

fn domain_status(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::AggregateNotFound(_) => (StatusCode::NOT_FOUND, "aggregate_not_found"),
        DomainError::AggregateAlreadyExists(_) => {
            (StatusCode::CONFLICT, "aggregate_already_exists")
        }
        DomainError::ConcurrencyConflict { .. } => (StatusCode::CONFLICT, "concurrency_conflict"),
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::Infrastructure(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
        }
    }
}

fn failure_status(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::NoActiveSession => StatusCode::NOT_FOUND,
        FailureKind::InternalInconsistency => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::Rejected(failure) => {
                let status = failure_status(failure.kind);
                return (status, Json(ActionResponse::rejected(&failure))).into_response();
            }
            Self::Domain(err) => {
                let (status, code) = domain_status(&err);
                (status, code, err.to_string())
            }
            Self::Content(ContentError::UnknownClass(class)) => (
                StatusCode::NOT_FOUND,
                "unknown_class",
                format!("unknown class: {class}"),
            ),
            Self::Content(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "content_error",
                err.to_string(),
            ),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
