//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::crm::{CrmApi, CrmError, SalesforceClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds no mutable data:
/// every request is served independently from the CRM.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    crm: Arc<dyn CrmApi>,
    photo_base_url: Option<String>,
}

impl AppState {
    /// Create application state backed by the Salesforce REST API.
    ///
    /// # Errors
    ///
    /// Returns an error if the CRM client cannot be built from configuration.
    pub fn new(config: &ServerConfig) -> Result<Self, CrmError> {
        let crm = SalesforceClient::new(&config.salesforce)?;
        Ok(Self::with_crm(Arc::new(crm), config.photo_base_url.clone()))
    }

    /// Create application state around any CRM implementation.
    #[must_use]
    pub fn with_crm(crm: Arc<dyn CrmApi>, photo_base_url: Option<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                crm,
                photo_base_url,
            }),
        }
    }

    /// Get a reference to the CRM client.
    #[must_use]
    pub fn crm(&self) -> &dyn CrmApi {
        self.inner.crm.as_ref()
    }

    /// Prefix for contact photo URLs, if configured.
    #[must_use]
    pub fn photo_base_url(&self) -> Option<&str> {
        self.inner.photo_base_url.as_deref()
    }
}
