//! HTTP client for the server's `/cases` API.

use async_trait::async_trait;
use case_desk_core::{
    Case, ContactId, CreateCaseRequest, CreateResult, QueryResult, UpdateStatusRequest,
};
use tracing::instrument;
use url::Url;

use crate::error::ClientError;

/// Case operations a [`CaseStore`](crate::CaseStore) depends on.
///
/// Implemented by [`CasesApi`]; tests substitute an in-memory backend.
#[async_trait]
pub trait CaseBackend: Send + Sync {
    /// Fetch every case for a contact.
    async fn list(&self, contact_id: &ContactId) -> Result<Vec<Case>, ClientError>;

    /// Open a case and return the CRM's record of its creation.
    async fn create(&self, request: &CreateCaseRequest) -> Result<CreateResult, ClientError>;

    /// Change a case's status.
    async fn update_status(&self, request: &UpdateStatusRequest) -> Result<(), ClientError>;
}

/// reqwest client for `/cases`.
#[derive(Clone)]
pub struct CasesApi {
    client: reqwest::Client,
    cases_url: Url,
}

impl CasesApi {
    /// Create a client for the server at `server_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if the URL does not parse, or
    /// `ClientError::Http` if the HTTP client fails to build.
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let cases_url = Url::parse(server_url)?.join("cases")?;
        let client = reqwest::Client::builder().build()?;

        Ok(Self { client, cases_url })
    }

    /// URL of the `/cases` endpoint.
    #[must_use]
    pub const fn cases_url(&self) -> &Url {
        &self.cases_url
    }

    /// Fetch the raw query result for a contact.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the request fails, the server rejects it, or
    /// the body is not a case query result.
    #[instrument(skip(self, contact_id), fields(contact_id = %contact_id))]
    pub async fn query(&self, contact_id: &ContactId) -> Result<QueryResult<Case>, ClientError> {
        let mut url = self.cases_url.clone();
        url.query_pairs_mut().append_pair("id", contact_id.as_str());

        let body = send(self.client.get(url)).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Send a request and return the body of a 2xx response.
async fn send(request: reqwest::RequestBuilder) -> Result<Vec<u8>, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(response.bytes().await?.to_vec())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status { status, body })
    }
}

#[async_trait]
impl CaseBackend for CasesApi {
    async fn list(&self, contact_id: &ContactId) -> Result<Vec<Case>, ClientError> {
        Ok(self.query(contact_id).await?.records)
    }

    #[instrument(skip(self, request), fields(contact_id = %request.id))]
    async fn create(&self, request: &CreateCaseRequest) -> Result<CreateResult, ClientError> {
        let body = send(self.client.post(self.cases_url.clone()).json(request)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    #[instrument(skip(self, request), fields(case_id = %request.id, status = %request.status))]
    async fn update_status(&self, request: &UpdateStatusRequest) -> Result<(), ClientError> {
        send(self.client.put(self.cases_url.clone()).json(request)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cases_url_from_root() {
        let api = CasesApi::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(api.cases_url().as_str(), "http://127.0.0.1:3000/cases");
    }

    #[test]
    fn test_cases_url_under_prefix() {
        let api = CasesApi::new("https://support.example.edu/desk/").unwrap();
        assert_eq!(
            api.cases_url().as_str(),
            "https://support.example.edu/desk/cases"
        );
    }

    #[test]
    fn test_invalid_server_url() {
        assert!(matches!(
            CasesApi::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
