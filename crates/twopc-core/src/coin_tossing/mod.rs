//! Two-party coin tossing
//!
//! Party One commits to a random value and proves it knows it. Party Two
//! answers with its own random share `s2`. Party One then opens the
//! commitment with a proof, and both sides output `KDF(value, L/8) XOR s2`.
//! Party Two sends `s2` only after the commitment is fixed, so neither side
//! can bias the result.

mod party_one;
mod party_two;

pub use party_one::CoinTossPartyOne;
pub use party_two::CoinTossPartyTwo;

use crate::{Error, Result};

/// Jointly generated random string of `L/8` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinTossOutput(Vec<u8>);

impl CoinTossOutput {
    /// The tossed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take ownership of the tossed bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Output length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the output has no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Byte-wise XOR of two equal-length shares
pub fn combine_shares(s1: &[u8], s2: &[u8]) -> Result<CoinTossOutput> {
    if s1.len() != s2.len() {
        return Err(Error::InvalidInput(format!(
            "Shares must have equal length, got {} and {}",
            s1.len(),
            s2.len()
        )));
    }
    Ok(CoinTossOutput(
        s1.iter().zip(s2).map(|(a, b)| a ^ b).collect(),
    ))
}
