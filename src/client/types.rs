//! Chat client contract and the values it exchanges.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors reported by a chat client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Raw text content.
    pub content: String,

    /// Channel the message was posted in.
    #[serde(default)]
    pub channel_id: String,

    /// Display name of the sender.
    #[serde(default)]
    pub author: String,
}

impl Message {
    /// Creates a message with the given content and no channel or author.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            channel_id: String::new(),
            author: String::new(),
        }
    }

    /// Sets the channel id.
    #[must_use]
    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

/// Events emitted by a chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The transport connection became active.
    Ready,
    /// A message was received.
    Message(Message),
    /// The transport closed; no further events follow.
    Disconnected,
}

/// The operations the dispatcher needs from an external chat client.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Logs in with the given token and returns the session token.
    async fn login(&self, token: &str) -> Result<String, ClientError>;

    /// Sends a text message to a channel.
    async fn send(&self, channel_id: &str, content: &str) -> Result<(), ClientError>;

    /// Takes the event stream. Returns `None` once it has been taken.
    fn take_events(&self) -> Option<mpsc::Receiver<ClientEvent>>;

    /// Closes the transport.
    fn disconnect(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_builders() {
        let msg = Message::new("!ping").with_channel("general").with_author("alice");
        assert_eq!(msg.content, "!ping");
        assert_eq!(msg.channel_id, "general");
        assert_eq!(msg.author, "alice");
    }

    #[test]
    fn test_message_deserialize_defaults() {
        let msg: Message = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(msg, Message::new("hi"));
    }

    // The trait must stay object-safe for `Arc<dyn ChatClient>`.
    fn _assert_object_safe(_: &dyn ChatClient) {}
}
