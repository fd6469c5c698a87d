//! In-memory channel implementation

use super::{async_trait, Channel};
use crate::{Error, Result};
use std::io;
use tokio::sync::mpsc;

/// One end of an in-memory, unbounded, ordered channel
pub struct MemoryChannel {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl MemoryChannel {
    /// Create two connected ends
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (
            Self { tx: a_tx, rx: a_rx },
            Self { tx: b_tx, rx: b_rx },
        )
    }
}

#[async_trait]
impl Channel for MemoryChannel {
    async fn send(&mut self, message: &[u8]) -> Result<()> {
        self.tx.send(message.to_vec()).map_err(|_| {
            Error::io(
                "memory channel send",
                io::Error::new(io::ErrorKind::BrokenPipe, "peer end was dropped"),
            )
        })
    }

    async fn receive(&mut self) -> Result<Vec<u8>> {
        self.rx.recv().await.ok_or_else(|| {
            Error::io(
                "memory channel receive",
                io::Error::new(io::ErrorKind::UnexpectedEof, "peer end was dropped"),
            )
        })
    }
}
