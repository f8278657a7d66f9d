//! Application error type mapping to HTTP responses.
//!
//! Every failure becomes status 500 with one of three fixed messages. The
//! underlying detail never reaches the caller; pipeline failures are logged
//! where they happen, so only body decoding failures are logged here.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use gemgate_types::error::ProxyError;

use crate::http::response::MessageResponse;

#[derive(Debug)]
pub enum AppError {
    /// A failure from the chat pipeline.
    Proxy(ProxyError),
    /// The request body could not be decoded.
    MalformedBody(String),
}

impl From<ProxyError> for AppError {
    fn from(e: ProxyError) -> Self {
        AppError::Proxy(e)
    }
}

impl AppError {
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Proxy(e) => e.public_message(),
            AppError::MalformedBody(_) => ProxyError::UNHANDLED_MESSAGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::MalformedBody(detail) = &self {
            tracing::warn!(error = %detail, "Rejected malformed request body");
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse::new(self.public_message())),
        )
            .into_response()
    }
}
