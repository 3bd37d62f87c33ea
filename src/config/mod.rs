//! Configuration module for the command bot.
//!
//! Handles loading and lookup of application configuration by dotted
//! paths, and the application context the dispatcher is composed with.

mod context;
mod settings;

pub use context::AppContext;
pub use settings::{AppConfig, ConfigError};

/// Client identifier issued by the chat platform.
pub const CONFIG_CLIENT_ID: &str = "discord.client_id";

/// Authentication token used to log in.
pub const CONFIG_TOKEN: &str = "discord.token";

/// Optional command prefix.
pub const CONFIG_COMMAND_PREFIX: &str = "discord.commandPrefix";

/// Prefix used when none is configured.
pub const DEFAULT_COMMAND_PREFIX: &str = "!";
