//! Case Desk Core - Shared types library.
//!
//! This crate provides common types used across all Case Desk components:
//! - `server` - CRM proxy and account pages
//! - `client` - HTTP client and case store for the `/cases` API
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, CRM records, and `/cases` request bodies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
