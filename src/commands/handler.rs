//! Built-in command handlers.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

use super::types::{Command, CommandHandler};
use crate::client::Message;
use crate::dispatcher::{CommandDispatcher, DispatchError};

/// Longest reply the bot will send in one message.
pub const MAX_REPLY_LENGTH: usize = 2000;

/// Replies with `Pong!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn on_command(
        &self,
        dispatcher: &CommandDispatcher,
        message: &Message,
        _label: &str,
        _args: &[String],
    ) -> anyhow::Result<()> {
        reply(dispatcher, message, "Pong!").await
    }
}

/// Repeats its arguments back.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoCommand;

#[async_trait]
impl CommandHandler for EchoCommand {
    async fn on_command(
        &self,
        dispatcher: &CommandDispatcher,
        message: &Message,
        _label: &str,
        args: &[String],
    ) -> anyhow::Result<()> {
        let text = args.join(" ");
        if text.trim().is_empty() {
            return reply(dispatcher, message, "Nothing to echo.").await;
        }
        reply(dispatcher, message, &truncate(&text, MAX_REPLY_LENGTH)).await
    }
}

/// Lists the registered commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn on_command(
        &self,
        dispatcher: &CommandDispatcher,
        message: &Message,
        _label: &str,
        _args: &[String],
    ) -> anyhow::Result<()> {
        let prefix = dispatcher.get_command_prefix();
        let mut lines = vec![format!("Commands (prefix: {prefix})")];
        for command in dispatcher.commands() {
            lines.push(format!("  {prefix}{command}"));
        }
        reply(dispatcher, message, &truncate(&lines.join("\n"), MAX_REPLY_LENGTH)).await
    }
}

/// Registers `ping`, `echo` and `help` with the dispatcher.
pub fn register_builtin_commands(
    dispatcher: &CommandDispatcher,
) -> Result<Vec<Arc<Command>>, DispatchError> {
    let commands = vec![
        Command::with_aliases(dispatcher, "ping", ["p"], PingCommand)?,
        Command::with_aliases(dispatcher, "echo", ["say"], EchoCommand)?,
        Command::with_aliases(dispatcher, "help", ["h", "?"], HelpCommand)?,
    ];

    for command in &commands {
        dispatcher.add_command(command)?;
    }
    Ok(commands)
}

async fn reply(dispatcher: &CommandDispatcher, message: &Message, text: &str) -> anyhow::Result<()> {
    debug!("Replying in [{}]", message.channel_id);
    dispatcher
        .client()
        .send(&message.channel_id, text)
        .await
        .context("Failed to send reply")
}

/// Truncates a string to a maximum length, adding "..." if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        let keep = max_len.saturating_sub(3);
        format!("{}...", s.chars().take(keep).collect::<String>())
    }
}
