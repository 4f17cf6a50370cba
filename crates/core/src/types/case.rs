//! Case records and CRM response envelopes.

use serde::{Deserialize, Serialize};

use super::id::{CaseId, ContactId};
use super::status::CaseStatus;

/// A support case owned by the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    #[serde(rename = "Id")]
    pub id: CaseId,
    #[serde(rename = "Subject", default)]
    pub subject: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<CaseStatus>,
    #[serde(rename = "ContactId", default)]
    pub contact_id: Option<ContactId>,
    #[serde(rename = "CaseNumber", default, skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
    #[serde(rename = "CreatedDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

/// Envelope returned by the CRM query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    #[serde(default)]
    pub total_size: u64,
    #[serde(default = "default_done")]
    pub done: bool,
    pub records: Vec<T>,
}

const fn default_done() -> bool {
    true
}

/// Body returned by the CRM when a record is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResult {
    pub id: CaseId,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}
