//! Request bodies for the `/cases` API.
//!
//! Each operation has two shapes: a `*Params` type as it arrives on the wire,
//! with every field optional, and a `*Request` type with the required fields
//! present. `validate()` converts one into the other; an absent or empty
//! field is reported as [`RequestError::MissingField`].

use serde::{Deserialize, Serialize};

use super::id::{CaseId, ContactId};
use super::status::CaseStatus;

/// A request that cannot be sent to the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// A required field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A record ID that cannot name a single URL path segment.
    #[error("invalid record id in field: {0}")]
    InvalidId(&'static str),

    /// The body was present but was not the expected JSON shape.
    #[error("invalid request body")]
    MalformedBody,
}

/// Treat an empty string the same as an absent one.
fn required(value: Option<String>, field: &'static str) -> Result<String, RequestError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RequestError::MissingField(field))
}

/// A required record ID. `.` and `..` are dot-segments in a URL path and
/// would address the parent collection instead of a record.
fn record_id(value: Option<String>, field: &'static str) -> Result<String, RequestError> {
    let id = required(value, field)?;
    if id == "." || id == ".." {
        return Err(RequestError::InvalidId(field));
    }
    Ok(id)
}

/// Query parameters for `GET /cases`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCasesParams {
    #[serde(default)]
    pub id: Option<String>,
}

impl ListCasesParams {
    /// Extract the contact ID.
    ///
    /// # Errors
    ///
    /// Returns `MissingField("id")` if the ID is absent or empty, or
    /// `InvalidId("id")` if it is a dot-segment.
    pub fn validate(self) -> Result<ContactId, RequestError> {
        record_id(self.id, "id").map(ContactId::from)
    }
}

/// Wire body for `POST /cases`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCaseParams {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl CreateCaseParams {
    /// Validate the body.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` naming the first absent field (`id`, then `subject`),
    /// or `InvalidId` for a dot-segment contact ID.
    pub fn validate(self) -> Result<CreateCaseRequest, RequestError> {
        Ok(CreateCaseRequest {
            id: record_id(self.id, "id")?.into(),
            subject: required(self.subject, "subject")?,
        })
    }
}

/// A validated create-case request.
///
/// `id` is the contact the case is opened for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCaseRequest {
    pub id: ContactId,
    pub subject: String,
}

/// Wire body for `PUT`/`PATCH /cases`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusParams {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateStatusParams {
    /// Validate the body.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` naming the first absent field (`id`, then `status`),
    /// or `InvalidId` for a dot-segment case ID.
    pub fn validate(self) -> Result<UpdateStatusRequest, RequestError> {
        Ok(UpdateStatusRequest {
            id: record_id(self.id, "id")?.into(),
            status: required(self.status, "status")?.into(),
        })
    }
}

/// A validated status update. `id` is the case being updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: CaseId,
    pub status: CaseStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_missing_id() {
        assert_eq!(
            ListCasesParams::default().validate(),
            Err(RequestError::MissingField("id"))
        );
        let empty = ListCasesParams {
            id: Some(String::new()),
        };
        assert_eq!(empty.validate(), Err(RequestError::MissingField("id")));
    }

    #[test]
    fn test_list_params_keeps_leading_zeros() {
        let params = ListCasesParams {
            id: Some("0000000".to_string()),
        };
        assert_eq!(params.validate(), Ok(ContactId::new("0000000")));
    }

    #[test]
    fn test_create_params_reports_first_missing_field() {
        let params: CreateCaseParams = serde_json::from_str("{}").expect("parse");
        assert_eq!(params.validate(), Err(RequestError::MissingField("id")));

        let params: CreateCaseParams = serde_json::from_str(r#"{"id": "1"}"#).expect("parse");
        assert_eq!(params.validate(), Err(RequestError::MissingField("subject")));
    }

    #[test]
    fn test_create_params_valid() {
        let params: CreateCaseParams =
            serde_json::from_str(r#"{"id": "1", "subject": "S"}"#).expect("parse");
        let request = params.validate().expect("valid");
        assert_eq!(request.id.as_str(), "1");
        assert_eq!(request.subject, "S");
    }

    #[test]
    fn test_update_params_missing_status() {
        let params: UpdateStatusParams =
            serde_json::from_str(r#"{"id": "1", "status": ""}"#).expect("parse");
        assert_eq!(params.validate(), Err(RequestError::MissingField("status")));
    }

    #[test]
    fn test_update_params_valid() {
        let params: UpdateStatusParams =
            serde_json::from_str(r#"{"id": "1", "status": "Closed"}"#).expect("parse");
        let request = params.validate().expect("valid");
        assert_eq!(request.id, CaseId::new("1"));
        assert!(request.status.is_closed());
    }

    #[test]
    fn test_dot_segment_ids_are_rejected() {
        for id in [".", ".."] {
            let list = ListCasesParams {
                id: Some(id.to_string()),
            };
            assert_eq!(list.validate(), Err(RequestError::InvalidId("id")));

            let update = UpdateStatusParams {
                id: Some(id.to_string()),
                status: Some("Closed".to_string()),
            };
            assert_eq!(update.validate(), Err(RequestError::InvalidId("id")));

            let create = CreateCaseParams {
                id: Some(id.to_string()),
                subject: Some("S".to_string()),
            };
            assert_eq!(create.validate(), Err(RequestError::InvalidId("id")));
        }
    }

    #[test]
    fn test_ids_containing_dots_are_kept() {
        let params = ListCasesParams {
            id: Some("...".to_string()),
        };
        assert_eq!(params.validate(), Ok(ContactId::new("...")));
    }

    #[test]
    fn test_request_error_display() {
        assert_eq!(
            RequestError::MissingField("subject").to_string(),
            "missing required field: subject"
        );
        assert_eq!(
            RequestError::InvalidId("id").to_string(),
            "invalid record id in field: id"
        );
        assert_eq!(
            RequestError::MalformedBody.to_string(),
            "invalid request body"
        );
    }
}
