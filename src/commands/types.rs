//! Command registration records and the handler capability.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::client::Message;
use crate::dispatcher::{CommandDispatcher, DispatcherId};

/// Errors raised while constructing a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Label must have length greater than 0")]
    EmptyLabel,

    #[error("Alias at index {index} must have length greater than 0")]
    EmptyAlias { index: usize },
}

/// Behaviour run when a message resolves to a command.
///
/// `label` is the label as the user typed it (which may be an alias, in
/// any case) and `args` are the raw space-separated tokens that followed.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn on_command(
        &self,
        dispatcher: &CommandDispatcher,
        message: &Message,
        label: &str,
        args: &[String],
    ) -> anyhow::Result<()>;
}

/// An immutable command registration: label, aliases and handler.
///
/// Commands can only be built through the validating constructors, so any
/// `Command` the dispatcher sees has a non-empty label and non-empty aliases.
pub struct Command {
    owner: DispatcherId,
    label: String,
    aliases: Vec<String>,
    handler: Box<dyn CommandHandler>,
}

impl Command {
    /// Creates a command without aliases for the given dispatcher.
    pub fn new<H>(
        dispatcher: &CommandDispatcher,
        label: impl Into<String>,
        handler: H,
    ) -> Result<Arc<Self>, CommandError>
    where
        H: CommandHandler + 'static,
    {
        Self::with_aliases(dispatcher, label, Vec::<String>::new(), handler)
    }

    /// Creates a command with aliases for the given dispatcher.
    pub fn with_aliases<H, I>(
        dispatcher: &CommandDispatcher,
        label: impl Into<String>,
        aliases: I,
        handler: H,
    ) -> Result<Arc<Self>, CommandError>
    where
        H: CommandHandler + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let label = label.into();
        if label.is_empty() {
            return Err(CommandError::EmptyLabel);
        }

        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        if let Some(index) = aliases.iter().position(String::is_empty) {
            return Err(CommandError::EmptyAlias { index });
        }

        Ok(Arc::new(Self {
            owner: dispatcher.id(),
            label,
            aliases,
            handler: Box::new(handler),
        }))
    }

    /// Returns the primary label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the aliases in registration order.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns the id of the dispatcher this command was built for.
    #[must_use]
    pub const fn owner(&self) -> DispatcherId {
        self.owner
    }

    /// Checks the label against already-lowercased text.
    #[must_use]
    pub fn matches_label(&self, normalized: &str) -> bool {
        self.label.to_lowercase() == normalized
    }

    /// Checks the aliases against already-lowercased text.
    #[must_use]
    pub fn matches_alias(&self, normalized: &str) -> bool {
        self.aliases.iter().any(|a| a.to_lowercase() == normalized)
    }

    /// Runs the handler.
    pub async fn invoke(
        &self,
        dispatcher: &CommandDispatcher,
        message: &Message,
        label: &str,
        args: &[String],
    ) -> anyhow::Result<()> {
        self.handler.on_command(dispatcher, message, label, args).await
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("owner", &self.owner)
            .field("label", &self.label)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.aliases.is_empty() {
            write!(f, "{}", self.label)
        } else {
            write!(f, "{} ({})", self.label, self.aliases.join(", "))
        }
    }
}
