//! Two-party message channel
//!
//! A [`Channel`] delivers opaque byte messages between the two roles of a
//! protocol, in order, without merging or splitting them. Each `send` on one
//! side is exactly one `receive` on the other.

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

pub use ::async_trait::async_trait;

/// Ordered, reliable, message-framed transport between two parties
#[async_trait]
pub trait Channel: Send {
    /// Send one message
    async fn send(&mut self, message: &[u8]) -> Result<()>;

    /// Wait for the next message
    async fn receive(&mut self) -> Result<Vec<u8>>;
}

/// Serialize `message` and send it, tagging transport errors with `step`
pub async fn send_message<C, T>(channel: &mut C, step: &str, message: &T) -> Result<()>
where
    C: Channel + ?Sized,
    T: Serialize + Sync,
{
    let bytes =
        serde_json::to_vec(message).map_err(|e| Error::Serialization(e.to_string()))?;
    trace!(step, len = bytes.len(), "Sending message");
    channel
        .send(&bytes)
        .await
        .map_err(|e| e.with_context(step))
}

/// Receive the next message and decode it as `T`
///
/// A message that does not decode is a [`Error::ProtocolFormat`] naming `step`.
pub async fn receive_message<C, T>(channel: &mut C, step: &str) -> Result<T>
where
    C: Channel + ?Sized,
    T: DeserializeOwned,
{
    let bytes = channel
        .receive()
        .await
        .map_err(|e| e.with_context(step))?;
    trace!(step, len = bytes.len(), "Received message");
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::ProtocolFormat(format!("{step}: {e}")))
}

/// In-memory channel for in-process parties and tests
pub mod memory;

/// Length-prefixed TCP channel
pub mod tcp;

pub use memory::MemoryChannel;
pub use tcp::TcpChannel;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestMessage {
        value: u32,
    }

    #[derive(Debug, Deserialize)]
    struct OtherMessage {
        #[allow(dead_code)]
        name: String,
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let (mut a, mut b) = MemoryChannel::pair();

        send_message(&mut a, "test", &TestMessage { value: 7 })
            .await
            .unwrap();
        let received: TestMessage = receive_message(&mut b, "test").await.unwrap();
        assert_eq!(received, TestMessage { value: 7 });
    }

    #[tokio::test]
    async fn test_wrong_shape_is_format_error() {
        let (mut a, mut b) = MemoryChannel::pair();

        send_message(&mut a, "test", &TestMessage { value: 7 })
            .await
            .unwrap();
        let err = receive_message::<_, OtherMessage>(&mut b, "expecting name")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProtocolFormat(msg) if msg.contains("expecting name")));
    }

    #[tokio::test]
    async fn test_closed_peer_is_io_error_with_step() {
        let (mut a, b) = MemoryChannel::pair();
        drop(b);

        let err = receive_message::<_, TestMessage>(&mut a, "waiting for tuple")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { ref context, .. } if context.contains("waiting for tuple")));
    }
}
