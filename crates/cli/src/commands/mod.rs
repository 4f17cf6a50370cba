//! CLI subcommands.

pub mod cases;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The server or the network failed.
    #[error(transparent)]
    Client(#[from] case_desk_client::ClientError),

    /// An argument failed validation before any request was sent.
    #[error(transparent)]
    Invalid(#[from] case_desk_core::RequestError),
}
