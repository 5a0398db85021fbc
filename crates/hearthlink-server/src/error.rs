//! Error types for the relay API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hearthlink_core::RelayError;

/// Errors that can occur in the relay API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A relay operation failed.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The request could not be parsed.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// The HTTP status this error is reported with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Relay(RelayError::Validation(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Relay(RelayError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Relay(RelayError::PreconditionFailed(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Relay(RelayError::Delivery(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::BadRequest(format!("invalid JSON body: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use hearthlink_types::CommandId;

    use super::*;

    #[test]
    fn relay_errors_map_to_status_codes() {
        let cases = [
            (RelayError::Validation(String::new()), StatusCode::BAD_REQUEST),
            (RelayError::NotFound(CommandId(1)), StatusCode::NOT_FOUND),
            (
                RelayError::PreconditionFailed(String::new()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RelayError::Delivery(String::new()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }

    #[test]
    fn response_carries_error_body() {
        let response = ApiError::BadRequest(String::from("nope")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
