//! Command registry and message dispatch.
//!
//! Owns the ordered list of registered commands, resolves incoming text to
//! a command by label or alias, and drives handler invocation for messages
//! delivered by the chat client.

mod dispatch;
mod error;
mod hooks;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch::{CommandDispatcher, DispatcherId};
pub use error::DispatchError;
pub use hooks::{DispatcherHooks, NoopHooks};
