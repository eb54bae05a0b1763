//! Mapping from catalog errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cinema_core::CatalogError;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A catalog failure returned from a handler.
#[derive(Debug)]
pub struct ApiError(pub CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::AlreadyExists(_) => StatusCode::CONFLICT,
            CatalogError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CatalogError::StorageUnavailable(_)
            | CatalogError::Schema(_)
            | CatalogError::DataCorruption(_)
            | CatalogError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Catalog request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
