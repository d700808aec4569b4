//! Domain error to HTTP response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shelflink_core::ShelfError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Wire shape of every error payload
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Target ids applied before an interrupted reconcile gave up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<Vec<i64>>,
}

/// Error half of every handler: a status plus the serialized domain error
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

/// An interrupted reconcile reports the status of whatever stopped it
fn status_of(error: &ShelfError) -> StatusCode {
    match error {
        ShelfError::DuplicateLink { .. } => StatusCode::CONFLICT,
        ShelfError::UnknownReference { .. }
        | ShelfError::InvalidInput { .. }
        | ShelfError::SeedInvalid { .. } => StatusCode::BAD_REQUEST,
        ShelfError::NotFound { .. } => StatusCode::NOT_FOUND,
        ShelfError::UnknownRelationKind { .. } | ShelfError::StorageUnavailable { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ShelfError::ReconcileInterrupted { source, .. } => status_of(source),
    }
}

impl From<ShelfError> for ApiError {
    fn from(error: ShelfError) -> Self {
        let status = status_of(&error);
        let (added, removed) = match &error {
            ShelfError::ReconcileInterrupted { added, removed, .. } => {
                (Some(added.clone()), Some(removed.clone()))
            }
            _ => (None, None),
        };
        if status.is_server_error() {
            tracing::error!(code = error.code(), %error, "request failed");
        }
        Self {
            status,
            body: ErrorBody {
                code: error.code().to_string(),
                message: error.to_string(),
                added,
                removed,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
