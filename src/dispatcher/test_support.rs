//! Shared fixtures for dispatcher and command tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::CommandDispatcher;
use crate::client::{ChatClient, ClientError, ClientEvent, Message};
use crate::commands::CommandHandler;
use crate::config::{AppConfig, AppContext};

/// A chat client that records logins and sent messages.
pub struct MockClient {
    pub logins: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_login: bool,
    events_tx: mpsc::Sender<ClientEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<ClientEvent>>>,
}

impl MockClient {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel(32);
        Self {
            logins: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            fail_login: false,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_login: true,
            ..Self::new()
        }
    }

    pub fn events(&self) -> mpsc::Sender<ClientEvent> {
        self.events_tx.clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ChatClient for MockClient {
    async fn login(&self, token: &str) -> Result<String, ClientError> {
        self.logins.lock().push(token.to_owned());
        if self.fail_login {
            return Err(ClientError::LoginFailed("rejected".to_owned()));
        }
        Ok(format!("session-{token}"))
    }

    async fn send(&self, channel_id: &str, content: &str) -> Result<(), ClientError> {
        self.sent
            .lock()
            .push((channel_id.to_owned(), content.to_owned()));
        Ok(())
    }

    fn take_events(&self) -> Option<mpsc::Receiver<ClientEvent>> {
        self.events_rx.lock().take()
    }
}

/// One recorded handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub content: String,
    pub label: String,
    pub args: Vec<String>,
}

/// A handler that records every invocation.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingHandler {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CommandHandler for RecordingHandler {
    async fn on_command(
        &self,
        _dispatcher: &CommandDispatcher,
        message: &Message,
        label: &str,
        args: &[String],
    ) -> anyhow::Result<()> {
        self.calls.lock().push(Call {
            content: message.content.clone(),
            label: label.to_owned(),
            args: args.to_vec(),
        });
        Ok(())
    }
}

/// A handler that does nothing.
pub struct NoopHandler;

#[async_trait]
impl CommandHandler for NoopHandler {
    async fn on_command(
        &self,
        _dispatcher: &CommandDispatcher,
        _message: &Message,
        _label: &str,
        _args: &[String],
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A handler that always fails.
pub struct FailingHandler;

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn on_command(
        &self,
        _dispatcher: &CommandDispatcher,
        _message: &Message,
        _label: &str,
        _args: &[String],
    ) -> anyhow::Result<()> {
        anyhow::bail!("handler exploded")
    }
}

/// The configuration most tests run with: prefix `/`.
pub fn default_config() -> Value {
    json!({ "discord": { "client_id": "1", "token": "1", "commandPrefix": "/" } })
}

pub fn dispatcher_with(config: Value, client: Arc<dyn ChatClient>) -> CommandDispatcher {
    let config = AppConfig::from_value(config).unwrap();
    CommandDispatcher::new(Arc::new(AppContext::new("test", config)), client)
}

pub fn dispatcher() -> CommandDispatcher {
    dispatcher_with(default_config(), Arc::new(MockClient::new()))
}
