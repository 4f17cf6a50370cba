//! Contact record.

use serde::{Deserialize, Serialize};

use super::id::ContactId;

/// A CRM contact: the identity the account page is rendered for.
///
/// Read-only to this system. Field names follow the CRM's REST
/// representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "Id")]
    pub id: ContactId,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    /// Institutional employee key (`EMPLIDPeoplesoftKey__c`).
    #[serde(rename = "EMPLIDPeoplesoftKey__c", default)]
    pub employee_key: Option<String>,
}
