//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                      - Health check
//!
//! # Case API (JSON, relays CRM responses)
//! GET  /cases?id={contact_id}                       - List a contact's cases
//! POST /cases                                       - Create a case {id, subject}
//! PUT  /cases                                       - Update status {id, status}
//! PATCH /cases                                      - Update status {id, status}
//!
//! # Account pages (HTML)
//! GET  /account/{contact_id}                        - Contact header, new case form, case list
//! POST /account/{contact_id}/cases                  - New case form
//! POST /account/{contact_id}/cases/{case_id}/status - Status form
//! ```

pub mod account;
pub mod cases;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the case API router.
pub fn case_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(cases::list)
            .post(cases::create)
            .put(cases::update_status)
            .patch(cases::update_status),
    )
}

/// Create the account page router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/{contact_id}", get(account::show))
        .route("/{contact_id}/cases", post(account::create_case))
        .route(
            "/{contact_id}/cases/{case_id}/status",
            post(account::update_status),
        )
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cases", case_routes())
        .nest("/account", account_routes())
}
