//! Face Swap Error Types
//!
//! This module provides swap-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::SwapFailure;

/// Swap-specific result type alias
pub type SwapResult<T> = Result<T, SwapError>;

/// Failure talking to the remote inference service. Every variant is retried.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection, TLS or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("remote returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The service answered with something we could not interpret
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The service reported a failed prediction
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Writing the downloaded result failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Protocol(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

/// Errors visible at the HTTP boundary
#[derive(Debug, Error)]
pub enum SwapError {
    /// An upload field or its file name is missing
    #[error("No file selected")]
    NoFileSelected,

    /// An upload has an extension outside png/jpg/jpeg
    #[error("Invalid file format. Only PNG, JPG, JPEG allowed")]
    InvalidFileFormat,

    /// The multipart body could not be read
    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    /// The remote swap or finalization failed
    #[error("{0}")]
    Swap(#[from] SwapFailure),

    /// Scratch space or worker failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SwapError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SwapError::NoFileSelected | SwapError::InvalidFileFormat => StatusCode::BAD_REQUEST,
            SwapError::Upload(e) => e.status(),
            SwapError::Swap(_) | SwapError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwapError::NoFileSelected | SwapError::InvalidFileFormat => ErrorKind::BadRequest,
            SwapError::Upload(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                ErrorKind::PayloadTooLarge
            }
            SwapError::Upload(_) => ErrorKind::BadRequest,
            SwapError::Swap(_) | SwapError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            SwapError::Upload(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SwapError::Swap(failure) => {
                tracing::error!(failure = ?failure, "Face swap failed");
            }
            SwapError::Internal(msg) => {
                tracing::error!(message = %msg, "Face swap internal error");
            }
            SwapError::Upload(e) => {
                tracing::warn!(error = %e, "Rejected upload body");
            }
            _ => {
                tracing::debug!(error = %self, "Rejected swap request");
            }
        }
    }
}

impl IntoResponse for SwapError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::Internal(format!("scratch space: {err}"))
    }
}
