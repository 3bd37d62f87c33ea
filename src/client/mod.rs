//! Chat client abstraction.
//!
//! The chat transport (connection, wire protocol, rate limiting) belongs to
//! an external client. The bot only needs the narrow contract defined here:
//! log in, send a message, and receive ready/message events.

mod console;
mod types;

pub use console::ConsoleClient;
pub use types::{ChatClient, ClientError, ClientEvent, Message};
