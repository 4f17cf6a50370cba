//! Case Desk client library.
//!
//! Talks to the server's `/cases` API and keeps the fetched case list in an
//! explicit state container.
//!
//! # Example
//!
//! ```rust,ignore
//! use case_desk_client::{CaseStore, CasesApi};
//!
//! let api = CasesApi::new("http://127.0.0.1:3000")?;
//! let mut store = CaseStore::new(api, ContactId::new("003xx"));
//!
//! store.refresh().await?;
//! store.create_case("Projector in room 204 is broken").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod store;

pub use api::{CaseBackend, CasesApi};
pub use error::ClientError;
pub use store::CaseStore;
