//! Command module.
//!
//! Defines the command registration record, the handler capability that
//! concrete commands implement, and the built-in commands.

mod handler;
mod types;

pub use handler::{
    EchoCommand, HelpCommand, MAX_REPLY_LENGTH, PingCommand, register_builtin_commands,
};
pub use types::{Command, CommandError, CommandHandler};
