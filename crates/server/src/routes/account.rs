//! Account page route handlers.
//!
//! Server-rendered view of one contact: header, new-case form, and the case
//! list with per-row status controls. Form posts perform one CRM call and
//! redirect back, so the page always re-fetches the full list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    response::Redirect,
};
use case_desk_core::{
    Case, CaseStatus, Contact, ContactId, CreateCaseParams, ListCasesParams, QueryResult,
    UpdateStatusParams,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Contact header data for templates.
#[derive(Clone)]
pub struct ContactView {
    pub path_id: String,
    pub name: String,
    pub email: String,
    pub employee_key: String,
    pub photo_url: Option<String>,
}

impl ContactView {
    fn new(contact: Contact, photo_base_url: Option<&str>) -> Self {
        let employee_key = contact.employee_key.unwrap_or_default();
        let photo_url = photo_base_url
            .filter(|_| !employee_key.is_empty())
            .map(|base| format!("{base}{}", urlencoding::encode(&employee_key)));

        Self {
            path_id: urlencoding::encode(contact.id.as_str()).into_owned(),
            name: contact.name.unwrap_or_default(),
            email: contact.email.unwrap_or_default(),
            employee_key,
            photo_url,
        }
    }
}

/// One `<option>` of a status select.
#[derive(Clone)]
pub struct StatusOption {
    pub value: String,
    pub selected: bool,
}

/// Case row data for templates.
#[derive(Clone)]
pub struct CaseView {
    pub path_id: String,
    pub number: String,
    pub subject: String,
    pub status: String,
    pub status_options: Vec<StatusOption>,
}

impl From<Case> for CaseView {
    fn from(case: Case) -> Self {
        let status = case.status.map(|s| s.as_str().to_owned()).unwrap_or_default();

        // Keep a status the picker doesn't know about selectable
        let mut status_options = Vec::with_capacity(CaseStatus::CHOICES.len() + 1);
        if !status.is_empty() && !CaseStatus::CHOICES.contains(&status.as_str()) {
            status_options.push(StatusOption {
                value: status.clone(),
                selected: true,
            });
        }
        status_options.extend(CaseStatus::CHOICES.iter().map(|choice| StatusOption {
            value: (*choice).to_owned(),
            selected: *choice == status,
        }));

        Self {
            path_id: urlencoding::encode(case.id.as_str()).into_owned(),
            number: case.case_number.unwrap_or_default(),
            subject: case.subject.unwrap_or_default(),
            status,
            status_options,
        }
    }
}

/// Account page template.
///
/// `cases` is `None` until the case list loads; the page then shows a
/// placeholder instead of the list.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub contact: ContactView,
    pub cases: Option<Vec<CaseView>>,
}

/// Display the account page for a contact.
///
/// GET /account/{contact_id}
///
/// A failed contact lookup is relayed like any other CRM error. A failed
/// case lookup is logged and rendered as the loading placeholder. A
/// dot-segment contact ID is rejected before any CRM call.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> Result<AccountTemplate> {
    let contact_id = ListCasesParams {
        id: Some(contact_id),
    }
    .validate()?;
    let contact: Contact = state.crm().get_contact(&contact_id).await?.json()?;

    let cases = match state
        .crm()
        .list_cases(&contact_id)
        .await
        .and_then(|payload| payload.json::<QueryResult<Case>>())
    {
        Ok(result) => Some(result.records.into_iter().map(CaseView::from).collect()),
        Err(e) => {
            tracing::warn!(contact_id = %contact_id, error = %e, "Failed to load cases");
            None
        }
    };

    Ok(AccountTemplate {
        contact: ContactView::new(contact, state.photo_base_url()),
        cases,
    })
}

/// New case form data.
#[derive(Debug, Default, Deserialize)]
pub struct NewCaseForm {
    #[serde(default)]
    pub subject: Option<String>,
}

/// Open a case from the account page.
///
/// POST /account/{contact_id}/cases
#[instrument(skip(state, form))]
pub async fn create_case(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
    form: std::result::Result<Form<NewCaseForm>, FormRejection>,
) -> Result<Redirect> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let request = CreateCaseParams {
        id: Some(contact_id),
        subject: form.subject,
    }
    .validate()?;

    if let Err(e) = state.crm().create_case(&request).await {
        tracing::warn!(contact_id = %request.id, error = %e, "Failed to create case");
    }

    Ok(account_redirect(&request.id))
}

/// Status update form data.
#[derive(Debug, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: Option<String>,
}

/// Change a case's status from the account page.
///
/// POST /account/{contact_id}/cases/{case_id}/status
#[instrument(skip(state, form))]
pub async fn update_status(
    State(state): State<AppState>,
    Path((contact_id, case_id)): Path<(String, String)>,
    form: std::result::Result<Form<StatusForm>, FormRejection>,
) -> Result<Redirect> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let request = UpdateStatusParams {
        id: Some(case_id),
        status: form.status,
    }
    .validate()?;

    if let Err(e) = state.crm().update_case_status(&request).await {
        tracing::warn!(case_id = %request.id, error = %e, "Failed to update case status");
    }

    Ok(account_redirect(&ContactId::from(contact_id)))
}

fn account_redirect(contact_id: &ContactId) -> Redirect {
    Redirect::to(&format!(
        "/account/{}",
        urlencoding::encode(contact_id.as_str())
    ))
}
