//! API error type with the dashboard's flat `{error}` response shape.
//!
//! There is no finer status taxonomy: every failure is an HTTP 500
//! with a short human-readable message. Details go to the log, not the
//! client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::store::StoreError;

/// Flat error body the dashboard frontend expects.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A collection read failed. The frontend degrades to an empty
    /// list and shows an inline error state.
    #[error("Failed to fetch {what}")]
    Fetch {
        what: &'static str,
        source: StoreError,
    },
    /// A create/update/delete failed. Local state on the frontend is
    /// left untouched — nothing was applied optimistically.
    #[error("Failed to {what}")]
    Mutation {
        what: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    pub fn fetch(what: &'static str, source: StoreError) -> Self {
        ApiError::Fetch { what, source }
    }

    pub fn mutation(what: &'static str, source: StoreError) -> Self {
        ApiError::Mutation { what, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Fetch { what, source } => {
                tracing::error!(what, %source, "fetch failed");
            }
            ApiError::Mutation { what, source } => {
                tracing::error!(what, %source, "mutation failed");
            }
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
