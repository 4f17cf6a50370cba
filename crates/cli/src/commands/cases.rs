//! Case commands.
//!
//! Each command drives a [`CaseStore`] for one contact, so every change is
//! followed by a fresh fetch of the contact's list.

use case_desk_client::{CaseStore, CasesApi};
use case_desk_core::{Case, CreateCaseParams, ListCasesParams, UpdateStatusParams};

use super::CommandError;

fn store(server_url: &str, contact: &str) -> Result<CaseStore<CasesApi>, CommandError> {
    let api = CasesApi::new(server_url)?;
    let contact_id = ListCasesParams {
        id: Some(contact.to_owned()),
    }
    .validate()?;
    Ok(CaseStore::new(api, contact_id))
}

/// Print a contact's cases.
pub async fn list(server_url: &str, contact: &str) -> Result<(), CommandError> {
    let mut store = store(server_url, contact)?;
    print_cases(store.refresh().await?);
    Ok(())
}

/// Open a case and print the updated list.
pub async fn create(server_url: &str, contact: &str, subject: &str) -> Result<(), CommandError> {
    let request = CreateCaseParams {
        id: Some(contact.to_owned()),
        subject: Some(subject.to_owned()),
    }
    .validate()?;

    let mut store = store(server_url, contact)?;
    tracing::info!(contact_id = %request.id, "Creating case");
    print_cases(store.create_case(request.subject).await?);
    Ok(())
}

/// Change a case's status and print the updated list.
pub async fn update_status(
    server_url: &str,
    contact: &str,
    case_id: &str,
    status: &str,
) -> Result<(), CommandError> {
    let request = UpdateStatusParams {
        id: Some(case_id.to_owned()),
        status: Some(status.to_owned()),
    }
    .validate()?;

    let mut store = store(server_url, contact)?;
    tracing::info!(case_id = %request.id, status = %request.status, "Updating case status");
    print_cases(store.update_status(request.id, request.status).await?);
    Ok(())
}

fn print_cases(cases: &[Case]) {
    #[allow(clippy::print_stdout)]
    {
        if cases.is_empty() {
            println!("No cases yet");
            return;
        }

        for case in cases {
            println!("{}", format_row(case));
        }
    }
}

fn format_row(case: &Case) -> String {
    format!(
        "{:<10} {:<18} {:<10} {}",
        case.case_number.as_deref().unwrap_or("-"),
        case.id,
        case.status.as_ref().map_or("-", |s| s.as_str()),
        case.subject.as_deref().unwrap_or_default(),
    )
}
