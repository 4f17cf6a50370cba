//! CRM REST API access.
//!
//! # Architecture
//!
//! - The CRM is the source of truth for cases and contacts - NO local copy,
//!   direct API calls per request
//! - Handlers talk to [`CrmApi`], never to reqwest, so tests can substitute a fake
//! - Payloads are kept as raw bytes so they can be relayed to the caller unmodified
//!
//! # Example
//!
//! ```rust,ignore
//! use case_desk_server::crm::{CrmApi, SalesforceClient};
//!
//! let client = SalesforceClient::new(&config.salesforce)?;
//! let payload = client.list_cases(&ContactId::new("003xx")).await?;
//! let cases: QueryResult<Case> = payload.json()?;
//! ```

mod salesforce;

pub use salesforce::SalesforceClient;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use case_desk_core::{ContactId, CreateCaseRequest, UpdateStatusRequest};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when calling the CRM.
#[derive(Debug, Error)]
pub enum CrmError {
    /// The request never produced a response (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The CRM answered with a non-success status.
    #[error("CRM rejected request with status {status}")]
    Upstream {
        status: StatusCode,
        content_type: Option<HeaderValue>,
        body: Bytes,
    },

    /// A request URL could not be built from the configured instance URL.
    #[error("Invalid CRM URL: {0}")]
    InvalidUrl(String),

    /// The CRM responded successfully but the body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for CRM calls.
pub type CrmResult = Result<CrmPayload, CrmError>;

/// A successful CRM response body, untouched.
#[derive(Debug, Clone)]
pub struct CrmPayload {
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl CrmPayload {
    /// Wrap a JSON body.
    #[cfg(test)]
    #[must_use]
    pub fn json_body(body: impl Into<Bytes>) -> Self {
        Self {
            content_type: Some(HeaderValue::from_static("application/json")),
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::Parse` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CrmError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

impl IntoResponse for CrmPayload {
    /// Relay the body with 200 OK regardless of which 2xx the CRM used.
    fn into_response(self) -> Response {
        relay(StatusCode::OK, self.content_type, self.body)
    }
}

/// Build a response carrying a CRM body and its `Content-Type` unchanged.
pub(crate) fn relay(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    match content_type {
        Some(content_type) => {
            headers.insert(header::CONTENT_TYPE, content_type);
        }
        None => {
            headers.remove(header::CONTENT_TYPE);
        }
    }
    response
}

/// Operations this system performs against the CRM.
///
/// Each method issues exactly one outbound request carrying the
/// `Authorization` header and returns the raw response.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Query the cases belonging to a contact.
    async fn list_cases(&self, contact_id: &ContactId) -> CrmResult;

    /// Open a new case for a contact.
    async fn create_case(&self, request: &CreateCaseRequest) -> CrmResult;

    /// Change the status of an existing case.
    async fn update_case_status(&self, request: &UpdateStatusRequest) -> CrmResult;

    /// Fetch the contact record shown on the account page.
    async fn get_contact(&self, contact_id: &ContactId) -> CrmResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn test_payload_response_keeps_body_and_content_type() {
        let payload = CrmPayload {
            content_type: Some(HeaderValue::from_static("text/plain")),
            body: Bytes::from_static(b"TEST CASE DATA"),
        };

        let response = payload.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"TEST CASE DATA");
    }

    #[test]
    fn test_payload_json_decode_error() {
        let payload = CrmPayload::json_body("not json");
        let result: Result<serde_json::Value, _> = payload.json();
        assert!(matches!(result, Err(CrmError::Parse(_))));
    }

    #[test]
    fn test_upstream_error_display() {
        let err = CrmError::Upstream {
            status: StatusCode::NOT_FOUND,
            content_type: None,
            body: Bytes::new(),
        };
        assert_eq!(
            err.to_string(),
            "CRM rejected request with status 404 Not Found"
        );
    }
}
