//! Salesforce REST API client.

use std::sync::Arc;

use async_trait::async_trait;
use case_desk_core::{ContactId, CreateCaseRequest, UpdateStatusRequest};
use reqwest::header;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::instrument;
use url::Url;

use super::{CrmApi, CrmError, CrmPayload, CrmResult};
use crate::config::SalesforceConfig;

/// Fields selected for every case returned by [`CrmApi::list_cases`].
const CASE_FIELDS: &str = "Id, Subject, Status, ContactId, CaseNumber, CreatedDate";

/// Fields fetched for the account page header.
const CONTACT_FIELDS: &str = "Id,Name,Email,EMPLIDPeoplesoftKey__c";

/// Salesforce REST API client.
///
/// Cheaply cloneable; every request carries `Authorization: Bearer <token>`.
/// No retries and, unless configured, no timeout.
#[derive(Clone)]
pub struct SalesforceClient {
    inner: Arc<SalesforceClientInner>,
}

struct SalesforceClientInner {
    client: reqwest::Client,
    /// `<instance>/services/data/<version>`
    base_url: Url,
    access_token: SecretString,
}

impl SalesforceClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::InvalidUrl` if the instance URL cannot carry a path,
    /// or `CrmError::Http` if the HTTP client fails to build.
    pub fn new(config: &SalesforceConfig) -> Result<Self, CrmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let mut base_url = config.instance_url.clone();
        base_url
            .path_segments_mut()
            .map_err(|()| CrmError::InvalidUrl(config.instance_url.to_string()))?
            .pop_if_empty()
            .extend(["services", "data", config.api_version.as_str()]);

        Ok(Self {
            inner: Arc::new(SalesforceClientInner {
                client,
                base_url,
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL by appending percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CrmError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CrmError::InvalidUrl(self.inner.base_url.to_string()))?
            .extend(segments);
        Ok(url)
    }

    /// Attach the authorization header, send, and split the outcome on status.
    async fn send(&self, request: reqwest::RequestBuilder) -> CrmResult {
        let response = request
            .bearer_auth(self.inner.access_token.expose_secret())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        if status.is_success() {
            tracing::debug!(%status, bytes = body.len(), "CRM request succeeded");
            Ok(CrmPayload { content_type, body })
        } else {
            tracing::debug!(%status, bytes = body.len(), "CRM request rejected");
            Err(CrmError::Upstream {
                status,
                content_type,
                body,
            })
        }
    }
}

#[async_trait]
impl CrmApi for SalesforceClient {
    #[instrument(skip(self, contact_id), fields(contact_id = %contact_id))]
    async fn list_cases(&self, contact_id: &ContactId) -> CrmResult {
        let mut url = self.endpoint(&["query"])?;
        url.query_pairs_mut()
            .append_pair("q", &cases_by_contact_query(contact_id));

        self.send(self.inner.client.get(url)).await
    }

    #[instrument(skip(self, request), fields(contact_id = %request.id))]
    async fn create_case(&self, request: &CreateCaseRequest) -> CrmResult {
        let url = self.endpoint(&["sobjects", "Case"])?;
        let body = json!({
            "ContactId": request.id,
            "Subject": request.subject,
        });

        self.send(self.inner.client.post(url).json(&body)).await
    }

    #[instrument(skip(self, request), fields(case_id = %request.id, status = %request.status))]
    async fn update_case_status(&self, request: &UpdateStatusRequest) -> CrmResult {
        let url = self.endpoint(&["sobjects", "Case", request.id.as_str()])?;
        let body = json!({ "Status": request.status });

        self.send(self.inner.client.patch(url).json(&body)).await
    }

    #[instrument(skip(self, contact_id), fields(contact_id = %contact_id))]
    async fn get_contact(&self, contact_id: &ContactId) -> CrmResult {
        let mut url = self.endpoint(&["sobjects", "Contact", contact_id.as_str()])?;
        url.query_pairs_mut().append_pair("fields", CONTACT_FIELDS);

        self.send(self.inner.client.get(url)).await
    }
}

/// SOQL selecting a contact's cases, newest first.
fn cases_by_contact_query(contact_id: &ContactId) -> String {
    format!(
        "SELECT {CASE_FIELDS} FROM Case WHERE ContactId = '{}' ORDER BY CreatedDate DESC",
        escape_soql(contact_id.as_str())
    )
}

/// Escape a value for use inside a single-quoted SOQL string literal.
fn escape_soql(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            other => escaped.push(other),
        }
    }
    escaped
}
