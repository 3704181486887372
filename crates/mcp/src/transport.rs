//! MCP transport layer.
//!
//! Defines the `Transport` trait for sending/receiving JSON-RPC message
//! lines, with a `ProcessTransport` implementation over a child process's
//! piped stdin/stdout and an in-memory `ChannelTransport` for tests.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout};

use crate::error::TransportError;

/// Trait for MCP message transport.
///
/// Implementations carry the wire format (newline-delimited JSON) over
/// different channels. The protocol is strictly request/response, so a
/// transport only ever has one caller at a time.
#[async_trait]
pub trait Transport: Send {
    /// Read the next JSON-RPC message line from the transport.
    /// Returns `None` when the transport is closed.
    async fn receive(&mut self) -> Result<Option<String>, TransportError>;

    /// Write a JSON-RPC message line to the transport.
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;
}

/// Transport over a spawned server process's standard streams.
///
/// Writes to the child's stdin and reads from its stdout. Each message is
/// a single JSON object terminated by a newline character.
pub struct ProcessTransport {
    reader: BufReader<ChildStdout>,
    writer: ChildStdin,
}

impl ProcessTransport {
    /// Wrap the piped stdio handles of a spawned server process.
    pub fn new(stdin: ChildStdin, stdout: ChildStdout) -> Self {
        Self {
            reader: BufReader::new(stdout),
            writer: stdin,
        }
    }
}

#[async_trait]
impl Transport for ProcessTransport {
    async fn receive(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                return Ok(None); // EOF
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
            // Skip blank lines between frames
        }
    }

    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// In-memory transport for testing, backed by channel pairs.
pub struct ChannelTransport {
    rx: tokio::sync::mpsc::Receiver<String>,
    tx: tokio::sync::mpsc::Sender<String>,
}

impl ChannelTransport {
    /// Create a pair of connected transports for testing.
    ///
    /// Messages sent on one transport are received by the other.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_b) = tokio::sync::mpsc::channel(32);
        let (tx_b, rx_a) = tokio::sync::mpsc::channel(32);
        (
            Self { rx: rx_a, tx: tx_a },
            Self { rx: rx_b, tx: tx_b },
        )
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn receive(&mut self) -> Result<Option<String>, TransportError> {
        Ok(self.rx.recv().await)
    }

    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        self.tx
            .send(message.to_string())
            .await
            .map_err(|_| TransportError::Closed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_transport_pair() {
        let (mut a, mut b) = ChannelTransport::pair();

        a.send("hello from a").await.unwrap();
        let msg = b.receive().await.unwrap();
        assert_eq!(msg, Some("hello from a".to_string()));

        b.send("hello from b").await.unwrap();
        let msg = a.receive().await.unwrap();
        assert_eq!(msg, Some("hello from b".to_string()));
    }

    #[tokio::test]
    async fn test_channel_transport_closed() {
        let (mut a, b) = ChannelTransport::pair();
        drop(b);
        let result = a.receive().await.unwrap();
        assert_eq!(result, None);
        let err = a.send("into the void").await.unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }
}
