//! Case status values.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Case status as stored in the CRM.
///
/// The CRM owns the picklist, so any string is accepted and relayed as-is.
/// [`CaseStatus::CHOICES`] lists the values the account page offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseStatus(String);

impl CaseStatus {
    /// Status values offered by the status-update controls.
    pub const CHOICES: [&'static str; 4] = ["New", "Working", "Escalated", "Closed"];

    /// Create a status from any string-like value.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the case is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.eq_ignore_ascii_case("closed")
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CaseStatus {
    fn from(status: String) -> Self {
        Self(status)
    }
}

impl From<&str> for CaseStatus {
    fn from(status: &str) -> Self {
        Self(status.to_owned())
    }
}
