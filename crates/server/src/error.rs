//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    body::Bytes,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use case_desk_core::RequestError;
use thiserror::Error;

use crate::crm::{self, CrmError};

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request was incomplete or malformed. No CRM call was made.
    #[error("Bad request: {0}")]
    Validation(#[from] RequestError),

    /// The CRM rejected the call; its status and body are relayed as-is.
    #[error("CRM error: status {status}")]
    Upstream {
        status: StatusCode,
        content_type: Option<HeaderValue>,
        body: Bytes,
    },

    /// The CRM could not be reached or returned something unusable.
    #[error("CRM error: {0}")]
    Crm(CrmError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CrmError> for AppError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::Upstream {
                status,
                content_type,
                body,
            } => Self::Upstream {
                status,
                content_type,
                body,
            },
            other => Self::Crm(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(rejection) => {
                tracing::debug!(error = %rejection, "Rejected invalid request");
                (StatusCode::BAD_REQUEST, rejection.to_string()).into_response()
            }
            Self::Upstream {
                status,
                content_type,
                body,
            } => {
                tracing::warn!(%status, bytes = body.len(), "Relaying CRM error response");
                crm::relay(status, content_type, body)
            }
            Self::Crm(_) | Self::Internal(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );

                // Don't expose internal error details to clients
                let (status, message) = if matches!(self, Self::Crm(_)) {
                    (StatusCode::BAD_GATEWAY, "External service error")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                };
                (status, message).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::header;

    use super::*;

    async fn body_of(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Validation(RequestError::MissingField("id"));
        assert_eq!(err.to_string(), "Bad request: missing required field: id");

        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.to_string(), "Internal error: boom");
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let response =
            AppError::Validation(RequestError::MissingField("subject")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            &body_of(response).await[..],
            b"missing required field: subject"
        );
    }

    #[tokio::test]
    async fn test_upstream_is_relayed_verbatim() {
        let err: AppError = CrmError::Upstream {
            status: StatusCode::NOT_FOUND,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: Bytes::from_static(br#"[{"errorCode":"NOT_FOUND"}]"#),
        }
        .into();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            &body_of(response).await[..],
            br#"[{"errorCode":"NOT_FOUND"}]"#
        );
    }

    #[tokio::test]
    async fn test_transport_failure_hides_details() {
        let err: AppError = CrmError::InvalidUrl("mailto:nobody".to_string()).into();
        assert!(matches!(err, AppError::Crm(_)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(&body_of(response).await[..], b"External service error");
    }

    #[test]
    fn test_internal_status() {
        let response = AppError::Internal("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
