//! Dispatcher errors.

use thiserror::Error;

use crate::client::ClientError;
use crate::commands::CommandError;
use crate::config::ConfigError;

/// Errors that can occur while registering commands, starting up, or
/// dispatching messages.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Command '{label}' was created for a different dispatcher")]
    ForeignCommand { label: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(#[from] CommandError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Command '{label}' failed: {source}")]
    Handler {
        label: String,
        #[source]
        source: anyhow::Error,
    },
}
