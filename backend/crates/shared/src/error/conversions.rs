//! Error conversions - HTTP rendering and framework error mapping
//!
//! Provides the JSON error body and conversions from framework errors to [`AppError`].

#[cfg(feature = "axum")]
use super::app_error::AppError;
#[cfg(feature = "axum")]
use super::kind::ErrorKind;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // `error` for browser clients, `detail` for clients expecting
        // framework-style HTTP exceptions.
        let body = serde_json::json!({
            "error": self.message(),
            "detail": self.message(),
            "title": self.kind().as_str(),
            "status": self.status_code(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        let app_err = if err.status() == http::StatusCode::PAYLOAD_TOO_LARGE {
            AppError::payload_too_large("Uploaded files are too large")
        } else {
            AppError::new(
                ErrorKind::BadRequest,
                format!("Malformed multipart body: {}", err.body_text()),
            )
        };
        app_err.with_source(err)
    }
}
