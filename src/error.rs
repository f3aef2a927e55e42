//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Conversion failures are deliberately vague towards the client: the
//! converter's stderr is logged server-side, but the response never claims
//! more diagnosis than "corrupt or unsupported".

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// The converter exited non-zero.
    #[error("Conversion failed. File might be corrupted or version too new.")]
    ConversionFailed,

    /// The converter exceeded the wall-clock bound and was killed.
    #[error("Conversion timed out (file too complex).")]
    ConversionTimeout,

    /// The converter exited zero but left no file at the output path.
    #[error("Conversion finished but output file missing")]
    OutputMissing,

    /// An unclassified internal server error.
    #[error("Server error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::Internal(e.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::ConversionFailed
            | ServerError::ConversionTimeout
            | ServerError::OutputMissing
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_maps_to_400_with_message() {
        let response = ServerError::BadRequest("No file uploaded".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn conversion_failures_map_to_500() {
        for err in [
            ServerError::ConversionFailed,
            ServerError::ConversionTimeout,
            ServerError::OutputMissing,
            ServerError::Internal("disk full".into()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn timeout_and_failure_messages_are_distinct() {
        let timeout = body_json(ServerError::ConversionTimeout.into_response()).await;
        let failed = body_json(ServerError::ConversionFailed.into_response()).await;
        let missing = body_json(ServerError::OutputMissing.into_response()).await;
        assert_ne!(timeout["error"], failed["error"]);
        assert_ne!(timeout["error"], missing["error"]);
        assert_ne!(failed["error"], missing["error"]);
        assert_eq!(timeout["error"], "Conversion timed out (file too complex).");
    }

    #[tokio::test]
    async fn internal_error_includes_cause() {
        let err: ServerError = std::io::Error::other("permission denied").into();
        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"], "Server error: permission denied");
    }
}
