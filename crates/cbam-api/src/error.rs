//! Error types for cbam-api

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type alias for cbam-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Binding or serving the listener failed
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP status for a request-scoped estimator error.
pub fn status_for(err: &cbam_core::Error) -> StatusCode {
    use cbam_core::Error as E;
    match err {
        E::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        E::NoData | E::NoDataAfterFilter => StatusCode::NOT_FOUND,
        E::Upstream { .. } | E::Transport { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Short machine-readable category for a request-scoped estimator error.
pub fn category(err: &cbam_core::Error) -> &'static str {
    use cbam_core::Error as E;
    match err {
        E::InvalidInput { .. } => "invalid_input",
        E::NoData => "no_data",
        E::NoDataAfterFilter => "no_data_after_filter",
        E::Upstream { .. } => "upstream",
        E::Transport { .. } => "transport",
        _ => "internal",
    }
}

/// An estimator error rendered as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub cbam_core::Error);

impl From<cbam_core::Error> for ApiError {
    fn from(err: cbam_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::warn!(error = %self.0, "Estimate failed");
        }

        let body = serde_json::json!({
            "error": {
                "category": category(&self.0),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbam_core::Error as CoreError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&CoreError::invalid_input("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&CoreError::NoData), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&CoreError::NoDataAfterFilter),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&CoreError::upstream(500, "boom")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&CoreError::data_load("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_categories_distinguish_empty_results() {
        assert_eq!(category(&CoreError::NoData), "no_data");
        assert_eq!(category(&CoreError::NoDataAfterFilter), "no_data_after_filter");
    }

    #[test]
    fn test_api_error_response_status() {
        let resp = ApiError(CoreError::upstream(429, "slow down")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
