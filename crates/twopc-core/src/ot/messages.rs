//! Wire messages of the DDH OT

use crate::types::hex_bytes;
use serde::{Deserialize, Serialize};

/// Receiver → sender: `(a, b, z0, z1)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtReceiverMessage {
    #[serde(with = "hex_bytes")]
    pub a: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub b: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub z0: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub z1: Vec<u8>,
}

impl OtReceiverMessage {
    /// Bytes a proof about `a` is bound to
    pub(crate) fn proof_context(&self) -> Vec<u8> {
        let mut context = b"twopc-ot-receiver".to_vec();
        for part in [&self.b, &self.z0, &self.z1] {
            context.extend_from_slice(&(part.len() as u32).to_be_bytes());
            context.extend_from_slice(part);
        }
        context
    }
}

/// Sender → receiver: `(w0, w1, c0, c1)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtSenderMessage {
    #[serde(with = "hex_bytes")]
    pub w0: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub w1: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub c0: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub c1: Vec<u8>,
}
