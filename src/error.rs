//! Error handling module
//!
//! Centralized error types and HTTP response conversion.
//!
//! Business rejections are not errors: they are
//! [`AccountOutcome`](crate::domain::AccountOutcome) values. Everything here
//! is either a malformed request or an infrastructure failure, and is
//! answered with a bare status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Server errors (5xx)
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Security error: {0}")]
    Security(#[from] crate::security::SecurityError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Security(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::InvalidRequest(msg) => {
                tracing::debug!("Rejected request: {}", msg);
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {:?}", e);
            }
            AppError::Security(e) => {
                tracing::error!("Security error: {:?}", e);
            }
        }

        // No body: failures are opaque to the client
        status.into_response()
    }
}
