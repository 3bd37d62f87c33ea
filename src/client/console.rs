//! Line-oriented console transport.
//!
//! Every input line becomes a [`Message`] in a single channel and every
//! outgoing message is written as one output line. Useful for running the
//! bot locally without a chat service.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ChatClient, ClientError, ClientEvent, Message};

/// Channel id used for every console message.
pub const CONSOLE_CHANNEL: &str = "console";

/// Event channel capacity.
const EVENT_BUFFER: usize = 32;

type LineReader = Box<dyn AsyncBufRead + Unpin + Send>;
type LineWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// A [`ChatClient`] backed by a line reader and a line writer.
pub struct ConsoleClient {
    author: String,
    events_tx: mpsc::Sender<ClientEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<ClientEvent>>>,
    reader: Mutex<Option<LineReader>>,
    writer: tokio::sync::Mutex<LineWriter>,
    reader_task: Mutex<Option<JoinHandle<()>>>,
}

impl ConsoleClient {
    /// Creates a client reading stdin and writing stdout.
    #[must_use]
    pub fn stdio(author: impl Into<String>) -> Self {
        Self::new(
            author,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }

    /// Creates a client over arbitrary reader and writer halves.
    #[must_use]
    pub fn new<R, W>(author: impl Into<String>, reader: R, writer: W) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        Self {
            author: author.into(),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            reader: Mutex::new(Some(Box::new(reader))),
            writer: tokio::sync::Mutex::new(Box::new(writer)),
            reader_task: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ChatClient for ConsoleClient {
    async fn login(&self, token: &str) -> Result<String, ClientError> {
        if token.trim().is_empty() {
            return Err(ClientError::LoginFailed("token is empty".to_owned()));
        }

        let Some(reader) = self.reader.lock().take() else {
            return Err(ClientError::LoginFailed("already logged in".to_owned()));
        };

        let tx = self.events_tx.clone();
        let author = self.author.clone();
        let handle = tokio::spawn(async move {
            read_lines(reader, tx, author).await;
        });
        *self.reader_task.lock() = Some(handle);

        info!("Console client logged in as {}", self.author);
        Ok(token.to_owned())
    }

    async fn send(&self, channel_id: &str, content: &str) -> Result<(), ClientError> {
        // The reader is handed to the input task on login.
        if self.reader.lock().is_some() {
            return Err(ClientError::NotLoggedIn);
        }

        debug!("Sending to [{}]: {}", channel_id, content);
        let mut writer = self.writer.lock().await;
        writer.write_all(content.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    fn take_events(&self) -> Option<mpsc::Receiver<ClientEvent>> {
        self.events_rx.lock().take()
    }

    fn disconnect(&self) {
        if let Some(handle) = self.reader_task.lock().take() {
            info!("Disconnecting console client...");
            handle.abort();
        }
    }
}

impl std::fmt::Debug for ConsoleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleClient")
            .field("author", &self.author)
            .finish_non_exhaustive()
    }
}

/// Emits `Ready`, one `Message` per line, then `Disconnected` at EOF.
async fn read_lines(reader: LineReader, tx: mpsc::Sender<ClientEvent>, author: String) {
    if tx.send(ClientEvent::Ready).await.is_err() {
        return;
    }

    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let message = Message::new(line)
                    .with_channel(CONSOLE_CHANNEL)
                    .with_author(author.clone());
                if tx.send(ClientEvent::Message(message)).await.is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        }
    }

    let _ = tx.send(ClientEvent::Disconnected).await;
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;

    #[tokio::test]
    async fn test_login_emits_events_per_line() {
        let client = ConsoleClient::new("tester", &b"!ping\nhello world\n"[..], tokio::io::sink());
        let mut events = client.take_events().unwrap();
        assert!(client.take_events().is_none());

        let session = client.login("secret").await.unwrap();
        assert_eq!(session, "secret");

        assert_eq!(events.recv().await, Some(ClientEvent::Ready));
        assert_eq!(
            events.recv().await,
            Some(ClientEvent::Message(
                Message::new("!ping")
                    .with_channel(CONSOLE_CHANNEL)
                    .with_author("tester")
            ))
        );
        let Some(ClientEvent::Message(second)) = events.recv().await else {
            panic!("expected a message event");
        };
        assert_eq!(second.content, "hello world");
        assert_eq!(events.recv().await, Some(ClientEvent::Disconnected));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_token_and_second_login() {
        let client = ConsoleClient::new("tester", &b""[..], tokio::io::sink());
        assert!(matches!(
            client.login("  ").await,
            Err(ClientError::LoginFailed(_))
        ));
        assert!(client.login("token").await.is_ok());
        assert!(matches!(
            client.login("token").await,
            Err(ClientError::LoginFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_send_writes_line() {
        let (writer, mut output) = tokio::io::duplex(64);
        let client = ConsoleClient::new("tester", &b""[..], writer);

        client.login("token").await.unwrap();
        client.send(CONSOLE_CHANNEL, "Pong!").await.unwrap();
        drop(client);

        let mut written = String::new();
        output.read_to_string(&mut written).await.unwrap();
        assert_eq!(written, "Pong!\n");
    }

    #[tokio::test]
    async fn test_send_requires_login() {
        let client = ConsoleClient::new("tester", &b""[..], tokio::io::sink());
        assert!(matches!(
            client.send(CONSOLE_CHANNEL, "Pong!").await,
            Err(ClientError::NotLoggedIn)
        ));
    }
}
