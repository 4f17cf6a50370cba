//! End-to-end tests for the server-rendered account page.

#![allow(clippy::unwrap_used)]

use case_desk_integration_tests::{Reply, TEST_PHOTO_BASE_URL, TestApp};
use reqwest::{StatusCode, header};

const FORM: &str = "application/x-www-form-urlencoded";

#[tokio::test]
async fn test_account_page_shows_contact_and_cases() {
    let (app, crm) = TestApp::with_fake_crm().await;
    crm.add_contact("003A", "Ada Lovelace", "ada@example.edu", "1815");
    crm.add_case("003A", "Projector broken", "Working");

    let resp = app.client.get(app.url("/account/003A")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Ada Lovelace"));
    assert!(html.contains("ada@example.edu"));
    assert!(html.contains(&format!("{TEST_PHOTO_BASE_URL}1815")));
    assert!(html.contains("Projector broken"));
    assert!(!html.contains("Loading Cases"));
}

#[tokio::test]
async fn test_account_page_without_cases() {
    let (app, crm) = TestApp::with_fake_crm().await;
    crm.add_contact("003A", "Ada Lovelace", "ada@example.edu", "1815");

    let html = app
        .client
        .get(app.url("/account/003A"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("No cases yet"));
}

#[tokio::test]
async fn test_account_page_for_unknown_contact_relays_not_found() {
    let (app, _crm) = TestApp::with_fake_crm().await;

    let resp = app
        .client
        .get(app.url("/account/003missing"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_page_relays_crm_outage() {
    let (app, crm) = TestApp::with_fake_crm().await;
    crm.script(Reply::text(StatusCode::SERVICE_UNAVAILABLE, "Down for maintenance"));

    let resp = app.client.get(app.url("/account/003A")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.text().await.unwrap(), "Down for maintenance");
}

#[tokio::test]
async fn test_new_case_form_creates_and_redirects() {
    let (app, crm) = TestApp::with_fake_crm().await;
    crm.add_contact("003A", "Ada Lovelace", "ada@example.edu", "1815");

    let resp = app
        .client
        .post(app.url("/account/003A/cases"))
        .header(header::CONTENT_TYPE, FORM)
        .body("subject=Projector+broken")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/account/003A");

    let html = app
        .client
        .get(app.url("/account/003A"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Projector broken"));
}

#[tokio::test]
async fn test_new_case_form_without_subject_is_rejected() {
    let (app, crm) = TestApp::with_fake_crm().await;

    let resp = app
        .client
        .post(app.url("/account/003A/cases"))
        .header(header::CONTENT_TYPE, FORM)
        .body("subject=")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(crm.requests().is_empty());
}

#[tokio::test]
async fn test_status_form_updates_and_redirects() {
    let (app, crm) = TestApp::with_fake_crm().await;
    let case_id = crm.add_case("003A", "Projector broken", "New");

    let resp = app
        .client
        .post(app.url(&format!("/account/003A/cases/{case_id}/status")))
        .header(header::CONTENT_TYPE, FORM)
        .body("status=Closed")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/account/003A");
    assert_eq!(crm.case_status(&case_id).as_deref(), Some("Closed"));
}
