//! TCP channel with 4-byte big-endian length framing

use super::{async_trait, Channel};
use crate::{Error, Result};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use std::io::ErrorKind;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::{debug, instrument};

/// Default upper bound on a single frame
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

fn frame_codec(max_frame_len: usize) -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(4)
        .big_endian()
        .max_frame_length(max_frame_len)
        .new_codec()
}

/// Channel over a single TCP connection
pub struct TcpChannel {
    framed: Framed<TcpStream, LengthDelimitedCodec>,
}

impl TcpChannel {
    /// Wrap an established connection
    pub fn new(stream: TcpStream) -> Self {
        Self {
            framed: Framed::new(stream, frame_codec(DEFAULT_MAX_FRAME_LEN)),
        }
    }

    /// Set the largest frame sent or accepted
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.framed.codec_mut().set_max_frame_length(max_frame_len);
        self
    }

    /// Connect to a listening peer
    #[instrument(skip(addr))]
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| Error::io("tcp connect", e))?;
        stream
            .set_nodelay(true)
            .map_err(|e| Error::io("tcp connect", e))?;
        debug!(peer = ?stream.peer_addr().ok(), "Connected");
        Ok(Self::new(stream))
    }

    /// Accept exactly one peer on `listener`
    #[instrument(skip(listener))]
    pub async fn accept(listener: &TcpListener) -> Result<Self> {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| Error::io("tcp accept", e))?;
        stream
            .set_nodelay(true)
            .map_err(|e| Error::io("tcp accept", e))?;
        debug!(%peer, "Accepted peer");
        Ok(Self::new(stream))
    }
}

#[async_trait]
impl Channel for TcpChannel {
    async fn send(&mut self, message: &[u8]) -> Result<()> {
        let max = self.framed.codec().max_frame_length();
        if message.len() > max {
            return Err(Error::InvalidInput(format!(
                "Message of {} bytes exceeds the frame limit of {max} bytes",
                message.len()
            )));
        }
        self.framed
            .send(Bytes::copy_from_slice(message))
            .await
            .map_err(|e| Error::io("tcp send", e))
    }

    async fn receive(&mut self) -> Result<Vec<u8>> {
        match self.framed.next().await {
            Some(Ok(frame)) => Ok(frame.to_vec()),
            // The codec reports an over-limit length prefix as invalid data
            Some(Err(e)) if e.kind() == ErrorKind::InvalidData => Err(Error::ProtocolFormat(
                format!("Rejected incoming frame: {e}"),
            )),
            Some(Err(e)) => Err(Error::io("tcp receive", e)),
            None => Err(Error::io(
                "tcp receive",
                std::io::Error::new(ErrorKind::UnexpectedEof, "connection closed by peer"),
            )),
        }
    }
}
