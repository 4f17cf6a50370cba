//! Case list state container.
//!
//! One store per contact. The list is replaced wholesale on every fetch and
//! never patched; create and update re-fetch instead. A failed call leaves
//! the stored list as it was.

use case_desk_core::{Case, CaseId, CaseStatus, ContactId, CreateCaseRequest, UpdateStatusRequest};

use crate::api::CaseBackend;
use crate::error::ClientError;

/// Holds the case list for one contact.
pub struct CaseStore<B> {
    backend: B,
    contact_id: ContactId,
    cases: Option<Vec<Case>>,
}

impl<B: CaseBackend> CaseStore<B> {
    /// Create an empty store. Nothing is fetched until [`refresh`](Self::refresh).
    pub const fn new(backend: B, contact_id: ContactId) -> Self {
        Self {
            backend,
            contact_id,
            cases: None,
        }
    }

    /// The contact this store belongs to.
    pub const fn contact_id(&self) -> &ContactId {
        &self.contact_id
    }

    /// The last successfully fetched list, or `None` before the first load.
    pub fn cases(&self) -> Option<&[Case]> {
        self.cases.as_deref()
    }

    /// Whether a list has been loaded.
    pub const fn is_loaded(&self) -> bool {
        self.cases.is_some()
    }

    /// Fetch the contact's cases and replace the stored list.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the stored list is left untouched.
    pub async fn refresh(&mut self) -> Result<&[Case], ClientError> {
        let result = self.backend.list(&self.contact_id).await;
        match result {
            Ok(cases) => {
                tracing::debug!(contact_id = %self.contact_id, count = cases.len(), "Loaded cases");
                Ok(self.cases.insert(cases).as_slice())
            }
            Err(e) => {
                tracing::warn!(contact_id = %self.contact_id, error = %e, "Failed to load cases");
                Err(e)
            }
        }
    }

    /// Open a case for this contact, then re-fetch the list.
    ///
    /// # Errors
    ///
    /// Returns the backend error from either call.
    pub async fn create_case(&mut self, subject: impl Into<String>) -> Result<&[Case], ClientError> {
        let request = CreateCaseRequest {
            id: self.contact_id.clone(),
            subject: subject.into(),
        };

        match self.backend.create(&request).await {
            Ok(created) => {
                tracing::info!(contact_id = %self.contact_id, case_id = %created.id, "Created case");
            }
            Err(e) => {
                tracing::warn!(contact_id = %self.contact_id, error = %e, "Failed to create case");
                return Err(e);
            }
        }

        self.refresh().await
    }

    /// Change a case's status, then re-fetch the list.
    ///
    /// # Errors
    ///
    /// Returns the backend error from either call.
    pub async fn update_status(
        &mut self,
        case_id: CaseId,
        status: CaseStatus,
    ) -> Result<&[Case], ClientError> {
        let request = UpdateStatusRequest {
            id: case_id,
            status,
        };

        if let Err(e) = self.backend.update_status(&request).await {
            tracing::warn!(case_id = %request.id, error = %e, "Failed to update case status");
            return Err(e);
        }

        self.refresh().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use case_desk_core::CreateResult;
    use reqwest::StatusCode;

    use super::*;

    /// In-memory backend standing in for the server.
    #[derive(Default)]
    struct MemoryBackend {
        cases: Mutex<Vec<Case>>,
        list_calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl MemoryBackend {
        fn rejection(&self) -> Result<(), ClientError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(ClientError::Status {
                    status: StatusCode::BAD_GATEWAY,
                    body: "External service error".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CaseBackend for MemoryBackend {
        async fn list(&self, contact_id: &ContactId) -> Result<Vec<Case>, ClientError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.rejection()?;
            let cases = self.cases.lock().unwrap();
            Ok(cases
                .iter()
                .filter(|c| c.contact_id.as_ref() == Some(contact_id))
                .cloned()
                .collect())
        }

        async fn create(&self, request: &CreateCaseRequest) -> Result<CreateResult, ClientError> {
            self.rejection()?;
            let mut cases = self.cases.lock().unwrap();
            let id = CaseId::new(format!("500{}", cases.len()));
            cases.push(Case {
                id: id.clone(),
                subject: Some(request.subject.clone()),
                status: Some(CaseStatus::new("New")),
                contact_id: Some(request.id.clone()),
                case_number: None,
                created_date: None,
            });
            Ok(CreateResult {
                id,
                success: true,
                errors: Vec::new(),
            })
        }

        async fn update_status(&self, request: &UpdateStatusRequest) -> Result<(), ClientError> {
            self.rejection()?;
            let mut cases = self.cases.lock().unwrap();
            if let Some(case) = cases.iter_mut().find(|c| c.id == request.id) {
                case.status = Some(request.status.clone());
            }
            Ok(())
        }
    }

    fn store() -> CaseStore<MemoryBackend> {
        CaseStore::new(MemoryBackend::default(), ContactId::new("003x"))
    }

    #[tokio::test]
    async fn test_not_loaded_until_refresh() {
        let mut store = store();
        assert!(!store.is_loaded());
        assert!(store.cases().is_none());

        let cases = store.refresh().await.unwrap();
        assert!(cases.is_empty());
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn test_create_refetches_list() {
        let mut store = store();

        let cases = store.create_case("Projector broken").await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].subject.as_deref(), Some("Projector broken"));
        assert_eq!(store.backend.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_refetches_list() {
        let mut store = store();
        store.create_case("Projector broken").await.unwrap();

        let cases = store
            .update_status(CaseId::new("5000"), CaseStatus::new("Closed"))
            .await
            .unwrap();
        assert!(cases[0].status.as_ref().unwrap().is_closed());
        assert_eq!(store.backend.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let mut store = store();
        store.create_case("Projector broken").await.unwrap();

        store.backend.fail.store(true, Ordering::SeqCst);
        let err = store.refresh().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(store.cases().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_create_does_not_refetch() {
        let mut store = store();
        store.backend.fail.store(true, Ordering::SeqCst);

        assert!(store.create_case("Projector broken").await.is_err());
        assert_eq!(store.backend.list_calls.load(Ordering::SeqCst), 0);
        assert!(!store.is_loaded());
    }
}
