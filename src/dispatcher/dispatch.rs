//! Command dispatcher implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

use super::{DispatchError, DispatcherHooks, NoopHooks};
use crate::client::{ChatClient, ClientEvent, Message};
use crate::commands::Command;
use crate::config::{
    AppContext, CONFIG_CLIENT_ID, CONFIG_COMMAND_PREFIX, CONFIG_TOKEN, ConfigError,
    DEFAULT_COMMAND_PREFIX,
};

static NEXT_DISPATCHER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a [`CommandDispatcher`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatcherId(u64);

impl DispatcherId {
    fn next() -> Self {
        Self(NEXT_DISPATCHER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Resolves messages to registered commands and runs their handlers.
pub struct CommandDispatcher {
    id: DispatcherId,

    /// Application context (configuration).
    app: Arc<AppContext>,

    /// External chat client.
    client: Arc<dyn ChatClient>,

    /// Lifecycle callbacks.
    hooks: Box<dyn DispatcherHooks>,

    /// Registered commands in insertion order; earlier entries win ties.
    commands: RwLock<Vec<Arc<Command>>>,

    /// Session token returned by the client's login.
    session_token: RwLock<Option<String>>,
}

impl CommandDispatcher {
    /// Creates a dispatcher with no commands and no-op hooks.
    #[must_use]
    pub fn new(app: Arc<AppContext>, client: Arc<dyn ChatClient>) -> Self {
        Self {
            id: DispatcherId::next(),
            app,
            client,
            hooks: Box::new(NoopHooks),
            commands: RwLock::new(Vec::new()),
            session_token: RwLock::new(None),
        }
    }

    /// Replaces the lifecycle hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl DispatcherHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    #[must_use]
    pub const fn id(&self) -> DispatcherId {
        self.id
    }

    #[must_use]
    pub fn app(&self) -> &AppContext {
        &self.app
    }

    #[must_use]
    pub fn client(&self) -> &Arc<dyn ChatClient> {
        &self.client
    }

    /// Returns the session token stored by [`Self::init`], if any.
    #[must_use]
    pub fn session_token(&self) -> Option<String> {
        self.session_token.read().clone()
    }

    /// Registers a command at the end of the list.
    ///
    /// Registering the same instance twice is a no-op.
    pub fn add_command(&self, command: &Arc<Command>) -> Result<(), DispatchError> {
        self.check_owner(command)?;

        let mut commands = self.commands.write();
        if commands.iter().any(|c| Arc::ptr_eq(c, command)) {
            return Ok(());
        }
        debug!("Registering command: {}", command);
        commands.push(Arc::clone(command));
        Ok(())
    }

    /// Unregisters a command. Removing an absent command is a no-op.
    pub fn remove_command(&self, command: &Arc<Command>) -> Result<(), DispatchError> {
        self.check_owner(command)?;

        let mut commands = self.commands.write();
        if let Some(index) = commands.iter().position(|c| Arc::ptr_eq(c, command)) {
            debug!("Unregistering command: {}", command);
            commands.remove(index);
        }
        Ok(())
    }

    fn check_owner(&self, command: &Command) -> Result<(), DispatchError> {
        if command.owner() == self.id {
            Ok(())
        } else {
            Err(DispatchError::ForeignCommand {
                label: command.label().to_owned(),
            })
        }
    }

    /// Checks whether this exact command instance is registered.
    #[must_use]
    pub fn contains(&self, command: &Arc<Command>) -> bool {
        self.commands.read().iter().any(|c| Arc::ptr_eq(c, command))
    }

    /// Returns a snapshot of the registered commands in insertion order.
    #[must_use]
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.commands.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    /// Returns the configured command prefix, or `!` when unset or empty.
    #[must_use]
    pub fn get_command_prefix(&self) -> String {
        self.app
            .config()
            .get_str(CONFIG_COMMAND_PREFIX)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_owned())
    }

    /// Resolves text to a command, case-insensitively.
    ///
    /// An exact label match wins outright. Otherwise the first command in
    /// registration order with a matching alias is returned.
    #[must_use]
    pub fn resolve_command(&self, text: &str) -> Option<Arc<Command>> {
        if text.is_empty() {
            return None;
        }

        let normalized = text.to_lowercase();
        let commands = self.commands.read();
        let mut alias_match: Option<&Arc<Command>> = None;

        for command in commands.iter() {
            if command.matches_label(&normalized) {
                return Some(Arc::clone(command));
            }
            if alias_match.is_none() && command.matches_alias(&normalized) {
                alias_match = Some(command);
            }
        }

        alias_match.cloned()
    }

    /// Dispatches a message to the command it invokes.
    ///
    /// Returns `Ok(true)` when a handler ran and `Ok(false)` when the
    /// message was not a command or named no registered command. Handler
    /// failures are returned as [`DispatchError::Handler`].
    pub async fn dispatch_message(&self, message: &Message) -> Result<bool, DispatchError> {
        let content = message.content.as_str();
        if content.chars().all(char::is_whitespace) {
            return Ok(false);
        }

        let prefix = self.get_command_prefix();
        let Some(rest) = content.strip_prefix(prefix.as_str()) else {
            return Ok(false);
        };

        let mut tokens = rest.split(' ');
        let label = tokens.next().unwrap_or_default();
        if label.is_empty() {
            return Ok(false);
        }

        // No reply for unknown commands.
        let Some(command) = self.resolve_command(label) else {
            debug!("No command registered for '{}'", label);
            return Ok(false);
        };

        let args: Vec<String> = tokens.map(str::to_owned).collect();
        debug!(
            "Dispatching '{}' to command {} with {} args",
            label,
            command.label(),
            args.len()
        );

        command
            .invoke(self, message, label, &args)
            .await
            .map_err(|source| DispatchError::Handler {
                label: command.label().to_owned(),
                source,
            })?;

        Ok(true)
    }

    /// Validates the required configuration and logs in with the client.
    pub async fn init(&self) -> Result<(), DispatchError> {
        let config = self.app.config();

        if !config.has(CONFIG_CLIENT_ID) {
            return Err(ConfigError::MissingKey(CONFIG_CLIENT_ID).into());
        }
        if !config.has(CONFIG_TOKEN) {
            return Err(ConfigError::MissingKey(CONFIG_TOKEN).into());
        }
        let token = config
            .get_str(CONFIG_TOKEN)
            .ok_or(ConfigError::InvalidValue(CONFIG_TOKEN))?;

        info!("Logging in to chat client...");
        let session = self.client.login(&token).await?;
        *self.session_token.write() = Some(session);
        info!("Logged in ({} commands registered)", self.len());

        Ok(())
    }

    /// Runs the ready hook.
    pub async fn on_ready(&self) {
        info!("Chat client ready");
        self.hooks.on_ready(self).await;
    }

    /// Processes client events until the client disconnects or the
    /// channel closes.
    ///
    /// Each message is dispatched on its own task, so slow handlers do not
    /// hold up later messages. Handler failures are logged and do not stop
    /// the loop. In-flight handlers are awaited before returning.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<ClientEvent>) {
        info!("Command dispatcher started");

        let mut in_flight = JoinSet::new();

        while let Some(event) = events.recv().await {
            while let Some(result) = in_flight.try_join_next() {
                log_task_result(result);
            }

            match event {
                ClientEvent::Ready => self.on_ready().await,
                ClientEvent::Message(message) => {
                    let dispatcher = Arc::clone(&self);
                    in_flight.spawn(async move {
                        dispatcher.handle_message(message).await;
                    });
                }
                ClientEvent::Disconnected => {
                    info!("Chat client disconnected");
                    break;
                }
            }
        }

        if !in_flight.is_empty() {
            debug!("Waiting for {} in-flight commands", in_flight.len());
        }
        while let Some(result) = in_flight.join_next().await {
            log_task_result(result);
        }

        info!("Command dispatcher stopped");
    }

    async fn handle_message(&self, message: Message) {
        if let Err(e) = self.dispatch_message(&message).await {
            error!("Failed to handle message from '{}': {}", message.author, e);
        }
    }
}

fn log_task_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!("Command task panicked: {}", e);
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("id", &self.id)
            .field("app", &self.app.name())
            .field("commands", &self.len())
            .finish_non_exhaustive()
    }
}
