//! Core types for Case Desk.
//!
//! This module provides type-safe wrappers for the CRM records this system
//! reads and writes.

pub mod case;
pub mod contact;
pub mod id;
pub mod request;
pub mod status;

pub use case::{Case, CreateResult, QueryResult};
pub use contact::Contact;
pub use id::*;
pub use request::{
    CreateCaseParams, CreateCaseRequest, ListCasesParams, RequestError, UpdateStatusParams,
    UpdateStatusRequest,
};
pub use status::CaseStatus;
