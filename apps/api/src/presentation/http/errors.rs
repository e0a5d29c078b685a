//! HTTP error handling and response conversion.
//!
//! Handlers return [`AppError`], which picks the status code and a user-safe
//! JSON message. Only method and presence checks get distinct messages; every
//! other failure collapses into a generic 500 while the underlying cause is
//! logged server-side.

use crate::domain::upload::errors::UploadError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Wrong HTTP verb for the route (405).
    MethodNotAllowed,

    /// Request is missing something the caller must supply (400).
    BadRequest(String),

    /// Parsing, transcoding or storage failed (500).
    UploadFailed(UploadError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotAllowed => write!(f, "Method not allowed"),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::UploadFailed(err) => write!(f, "Upload failed: {}", err),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UploadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-safe error message (without implementation details).
    pub fn user_message(&self) -> String {
        match self {
            Self::MethodNotAllowed => "Method not allowed".into(),
            Self::BadRequest(msg) => msg.clone(),
            Self::UploadFailed(_) => "Upload failed".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("error={}", self);
            }
            StatusCode::BAD_REQUEST => {
                tracing::warn!("error={}", self);
            }
            _ => {
                tracing::info!("error={}", self);
            }
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MethodNotAllowed => AppError::MethodNotAllowed,
            UploadError::NoFile => AppError::BadRequest(err.to_string()),
            other => AppError::UploadFailed(other),
        }
    }
}
