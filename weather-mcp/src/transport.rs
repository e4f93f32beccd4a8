//! Transports for MCP messages.
//!
//! [`StdioTransport`] speaks line-delimited JSON over standard input/output,
//! matching what MCP-aware clients spawn as a subprocess. [`SseTransport`]
//! fans responses out to HTTP clients over Server-Sent Events via a
//! broadcast channel.

use std::time::Duration;

use async_trait::async_trait;
use axum::response::sse::{Event, Sse};
use eyre::Result;
use futures::stream;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast;

use crate::message::McpMessage;

/// A bidirectional channel for MCP messages.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read the next message. `None` means the peer closed the channel.
    async fn read_message(&mut self) -> Result<Option<McpMessage>>;

    /// Serialize and send one message.
    async fn write_message(&mut self, message: McpMessage) -> Result<()>;
}

/// Line-delimited JSON over stdin/stdout.
pub struct StdioTransport {
    reader: BufReader<tokio::io::Stdin>,
    writer: tokio::io::Stdout,
}

impl StdioTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn read_message(&mut self) -> Result<Option<McpMessage>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(None);
        }
        let message = serde_json::from_str(&line)?;
        Ok(Some(message))
    }

    async fn write_message(&mut self, message: McpMessage) -> Result<()> {
        let json = serde_json::to_string(&message)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Broadcast-backed SSE transport.
///
/// Clones share the sender; each clone gets its own receiver cursor.
pub struct SseTransport {
    tx: broadcast::Sender<McpMessage>,
    rx: broadcast::Receiver<McpMessage>,
}

impl Clone for SseTransport {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.tx.subscribe(),
        }
    }
}

impl SseTransport {
    /// Create a transport buffering up to `capacity` undelivered messages.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = broadcast::channel(capacity);
        Self { tx, rx }
    }

    /// Create a transport sharing an existing broadcast sender.
    #[must_use]
    pub fn new_with_sender(tx: broadcast::Sender<McpMessage>) -> Self {
        Self {
            rx: tx.subscribe(),
            tx,
        }
    }

    /// Clone of the broadcast sender, for handlers that publish responses.
    #[must_use]
    pub fn sender(&self) -> broadcast::Sender<McpMessage> {
        self.tx.clone()
    }

    /// Build the axum SSE response streaming every broadcast message.
    #[must_use]
    pub fn sse_handler(self) -> impl axum::response::IntoResponse {
        let initial = stream::once(async {
            Ok::<_, std::convert::Infallible>(Event::default().data("connected"))
        });
        let rx = self.tx.subscribe();

        let stream = stream::unfold(rx, |mut rx| async move {
            match rx.recv().await {
                Ok(msg) => {
                    // Drop messages that fail to serialize instead of
                    // tearing down the whole stream.
                    let event = Event::default().event("message").json_data(msg).ok()?;
                    Some((Ok(event), rx))
                }
                Err(_) => None,
            }
        });

        Sse::new(futures::StreamExt::chain(initial, stream)).keep_alive(
            axum::response::sse::KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keep-alive"),
        )
    }
}

#[async_trait]
impl Transport for SseTransport {
    async fn read_message(&mut self) -> Result<Option<McpMessage>> {
        match self.rx.recv().await {
            Ok(message) => Ok(Some(message)),
            Err(_) => Ok(None),
        }
    }

    async fn write_message(&mut self, message: McpMessage) -> Result<()> {
        // Broadcast send only fails when there are no receivers; that is
        // not an error for a fan-out channel.
        let _ = self.tx.send(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{InitializeParams, McpMessage};

    #[tokio::test]
    async fn sse_transport_broadcasts() {
        let transport = SseTransport::new(10);
        let tx = transport.sender();
        let mut rx = tx.subscribe();

        let message = McpMessage::Initialize(InitializeParams {
            protocol_version: "2024-11-05".to_string(),
        });

        tx.send(message).unwrap();

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, McpMessage::Initialize(_)));
    }

    #[tokio::test]
    async fn cloned_transport_sees_messages() {
        let mut a = SseTransport::new(4);
        let mut b = a.clone();

        a.write_message(McpMessage::Ping).await.unwrap();
        let received = b.read_message().await.unwrap();
        assert!(matches!(received, Some(McpMessage::Ping)));
    }
}
