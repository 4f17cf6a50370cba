//! Case Desk server library.
//!
//! A thin proxy in front of the CRM: JSON endpoints that relay case
//! operations, plus server-rendered account pages built on the same calls.
//! Exposed as a library so the router can be driven in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod crm;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, extract::Request, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with tracing and request-ID middleware.
///
/// Sentry layers are added by the binary, outside this router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the CRM.
async fn health() -> &'static str {
    "ok"
}
