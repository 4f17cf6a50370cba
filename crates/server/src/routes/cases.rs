//! Case controller: `/cases` JSON API.
//!
//! Each handler validates its required fields, makes exactly one CRM call,
//! and relays the CRM's answer. A missing field short-circuits with 400
//! before anything is sent upstream.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use case_desk_core::{CreateCaseParams, ListCasesParams, RequestError, UpdateStatusParams};
use tracing::instrument;

use crate::crm::CrmPayload;
use crate::error::Result;
use crate::state::AppState;

/// Unwrap a JSON body. A request with no JSON body yields empty params, so
/// the missing field is reported; a body that fails to parse is rejected.
fn json_params<T: Default>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match body {
        Ok(Json(params)) => Ok(params),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected request body");
            Err(RequestError::MalformedBody.into())
        }
    }
}

/// List a contact's cases.
///
/// GET /cases?id={contact_id}
///
/// A malformed query string is treated as an absent `id`.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListCasesParams>, QueryRejection>,
) -> Result<CrmPayload> {
    let contact_id = query.map(|Query(params)| params).unwrap_or_default().validate()?;

    let payload = state.crm().list_cases(&contact_id).await?;
    tracing::info!(contact_id = %contact_id, "Listed cases");
    Ok(payload)
}

/// Open a case for a contact.
///
/// POST /cases with `{"id": contact_id, "subject": ...}`
///
/// A missing body is treated as a body with no fields; an unparseable one is
/// rejected as malformed.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateCaseParams>, JsonRejection>,
) -> Result<CrmPayload> {
    let request = json_params(body)?.validate()?;

    let payload = state.crm().create_case(&request).await?;
    tracing::info!(contact_id = %request.id, "Created case");
    Ok(payload)
}

/// Change a case's status.
///
/// PUT|PATCH /cases with `{"id": case_id, "status": ...}`
#[instrument(skip_all)]
pub async fn update_status(
    State(state): State<AppState>,
    body: std::result::Result<Json<UpdateStatusParams>, JsonRejection>,
) -> Result<CrmPayload> {
    let request = json_params(body)?.validate()?;

    let payload = state.crm().update_case_status(&request).await?;
    tracing::info!(case_id = %request.id, status = %request.status, "Updated case status");
    Ok(payload)
}
