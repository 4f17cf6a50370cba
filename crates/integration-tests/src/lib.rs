//! End-to-end test harness for Case Desk.
//!
//! [`FakeCrm`] is an in-process stand-in for the Salesforce REST API. It
//! records every request it receives and answers the handful of endpoints
//! the server uses from an in-memory set of contacts and cases. A scripted
//! reply can replace that behavior to simulate CRM failures.
//!
//! [`TestApp`] runs the real server router, wired to a real
//! `SalesforceClient` pointed at a `FakeCrm`, on an ephemeral port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p case-desk-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use case_desk_server::{
    config::SalesforceConfig, crm::SalesforceClient, router, state::AppState,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Access token the test server presents to the fake CRM.
pub const TEST_ACCESS_TOKEN: &str = "00Dtest!integration-token";

/// API version the test server is configured with.
pub const TEST_API_VERSION: &str = "v60.0";

/// Base URL for employee photos on account pages.
pub const TEST_PHOTO_BASE_URL: &str = "https://photos.example.edu/";

/// One request as seen by the fake CRM.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    /// The request body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("CRM request body is not JSON")
    }

    /// Decoded value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// A canned CRM response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub body: &'static str,
}

impl Reply {
    /// A plain-text reply.
    #[must_use]
    pub const fn text(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            body,
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    header::HeaderValue::from_static(content_type),
                );
            }
            None => {
                response.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        response
    }
}

#[derive(Default)]
struct FakeCrmState {
    requests: Vec<RecordedRequest>,
    contacts: Vec<Value>,
    cases: Vec<Value>,
    scripted: Option<Reply>,
}

/// In-process fake of the Salesforce REST API.
#[derive(Clone)]
pub struct FakeCrm {
    addr: SocketAddr,
    state: Arc<Mutex<FakeCrmState>>,
}

impl FakeCrm {
    /// Start a fake CRM on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(FakeCrmState::default()));
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let addr = serve(app).await;
        Self { addr, state }
    }

    /// Instance URL to configure the server with.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn instance_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("socket address is a valid URL")
    }

    fn lock(&self) -> MutexGuard<'_, FakeCrmState> {
        self.state.lock().expect("fake CRM state poisoned")
    }

    /// Add a contact record.
    pub fn add_contact(&self, id: &str, name: &str, email: &str, employee_key: &str) {
        self.lock().contacts.push(json!({
            "attributes": { "type": "Contact" },
            "Id": id,
            "Name": name,
            "Email": email,
            "EMPLIDPeoplesoftKey__c": employee_key,
        }));
    }

    /// Add a case record and return its ID.
    pub fn add_case(&self, contact_id: &str, subject: &str, status: &str) -> String {
        let mut state = self.lock();
        let id = next_case_id(state.cases.len());
        let number = format!("{:08}", 1001 + state.cases.len());
        state.cases.push(json!({
            "attributes": { "type": "Case" },
            "Id": id,
            "CaseNumber": number,
            "Subject": subject,
            "Status": status,
            "ContactId": contact_id,
        }));
        id
    }

    /// Answer every following request with `reply`.
    pub fn script(&self, reply: Reply) {
        self.lock().scripted = Some(reply);
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Current status of a case.
    #[must_use]
    pub fn case_status(&self, case_id: &str) -> Option<String> {
        self.lock()
            .cases
            .iter()
            .find(|c| c["Id"] == case_id)
            .and_then(|c| c["Status"].as_str().map(str::to_owned))
    }
}

fn next_case_id(index: usize) -> String {
    format!("5005e{index:010}")
}

/// Record the request, then answer it.
async fn handle(
    State(state): State<Arc<Mutex<FakeCrmState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method,
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body,
    };

    let mut state = state.lock().expect("fake CRM state poisoned");
    state.requests.push(request.clone());

    if let Some(reply) = state.scripted.clone() {
        return reply.into_response();
    }

    let base = format!("/services/data/{TEST_API_VERSION}");
    let Some(path) = request.path.strip_prefix(&base) else {
        return not_found("NOT_FOUND", "The requested resource does not exist");
    };
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match (&request.method, segments.as_slice()) {
        (&Method::GET, ["query"]) => {
            let soql = request.query_param("q").unwrap_or_default();
            let contact_id = soql
                .split_once("ContactId = '")
                .and_then(|(_, rest)| rest.split_once('\''))
                .map(|(id, _)| id.to_owned())
                .unwrap_or_default();
            let records: Vec<Value> = state
                .cases
                .iter()
                .rev()
                .filter(|c| c["ContactId"] == contact_id.as_str())
                .cloned()
                .collect();
            axum::Json(json!({
                "totalSize": records.len(),
                "done": true,
                "records": records,
            }))
            .into_response()
        }
        (&Method::POST, ["sobjects", "Case"]) => {
            let Ok(fields) = serde_json::from_slice::<Value>(&request.body) else {
                return bad_request("JSON_PARSER_ERROR", "Malformed request body");
            };
            let id = next_case_id(state.cases.len());
            let number = format!("{:08}", 1001 + state.cases.len());
            state.cases.push(json!({
                "attributes": { "type": "Case" },
                "Id": id,
                "CaseNumber": number,
                "Subject": fields["Subject"],
                "Status": "New",
                "ContactId": fields["ContactId"],
            }));
            (
                StatusCode::CREATED,
                axum::Json(json!({ "id": id, "success": true, "errors": [] })),
            )
                .into_response()
        }
        (&Method::PATCH, ["sobjects", "Case", case_id]) => {
            let Ok(fields) = serde_json::from_slice::<Value>(&request.body) else {
                return bad_request("JSON_PARSER_ERROR", "Malformed request body");
            };
            match state.cases.iter_mut().find(|c| c["Id"] == *case_id) {
                Some(case) => {
                    case["Status"] = fields["Status"].clone();
                    StatusCode::NO_CONTENT.into_response()
                }
                None => not_found("NOT_FOUND", "The requested resource does not exist"),
            }
        }
        (&Method::GET, ["sobjects", "Contact", contact_id]) => state
            .contacts
            .iter()
            .find(|c| c["Id"] == *contact_id)
            .map_or_else(
                || not_found("NOT_FOUND", "The requested resource does not exist"),
                |contact| axum::Json(contact.clone()).into_response(),
            ),
        _ => not_found("NOT_FOUND", "The requested resource does not exist"),
    }
}

fn not_found(code: &str, message: &str) -> Response {
    error_reply(StatusCode::NOT_FOUND, code, message)
}

fn bad_request(code: &str, message: &str) -> Response {
    error_reply(StatusCode::BAD_REQUEST, code, message)
}

fn error_reply(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        axum::Json(json!([{ "errorCode": code, "message": message }])),
    )
        .into_response()
}

/// Serve a router on an ephemeral local port.
async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

/// A running Case Desk server.
pub struct TestApp {
    addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start the server against `instance_url`.
    ///
    /// # Panics
    ///
    /// Panics if the CRM client cannot be built or the listener cannot bind.
    pub async fn start(instance_url: Url) -> Self {
        let config = SalesforceConfig {
            instance_url,
            api_version: TEST_API_VERSION.to_owned(),
            access_token: SecretString::from(TEST_ACCESS_TOKEN),
            timeout: Some(Duration::from_secs(5)),
        };
        let crm = SalesforceClient::new(&config).expect("Failed to build CRM client");
        let state = AppState::with_crm(Arc::new(crm), Some(TEST_PHOTO_BASE_URL.to_owned()));

        let addr = serve(router(state)).await;
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { addr, client }
    }

    /// Start the server against a fresh [`FakeCrm`].
    pub async fn with_fake_crm() -> (Self, FakeCrm) {
        let crm = FakeCrm::start().await;
        let app = Self::start(crm.instance_url()).await;
        (app, crm)
    }

    /// Base URL of the server, with a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Absolute URL for a server path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// An instance URL nothing is listening on.
///
/// # Panics
///
/// Panics if a probe listener cannot be bound.
pub async fn unreachable_instance_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);

    Url::parse(&format!("http://{addr}")).expect("socket address is a valid URL")
}
