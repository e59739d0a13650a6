//! Error responses for the listing service.
//!
//! Every handler returns `Result<T, AppError>`. Failures are answered with a
//! JSON body `{"error": "<message>"}`; server-side failures are reported to
//! Sentry and their details withheld from the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Message sent when the catalog cannot be read.
pub const FETCH_FAILED: &str = "Failed to fetch products.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The query string could not be used, e.g. an unknown currency code.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text safe to show the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) => FETCH_FAILED.to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(what) | Self::BadRequest(what) => what.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
