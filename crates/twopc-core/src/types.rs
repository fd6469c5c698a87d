//! Core types shared by the protocols

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Identifier of one commit instance, scoped to a committer/receiver pair
pub type CommitmentId = u64;

/// The receiver's private selector in a 1-out-of-2 transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceBit {
    /// Select `x0`
    Zero,
    /// Select `x1`
    One,
}

impl ChoiceBit {
    /// Pick the selected item of a pair
    pub fn select<T>(self, zero: T, one: T) -> T {
        match self {
            ChoiceBit::Zero => zero,
            ChoiceBit::One => one,
        }
    }

    /// The bit as an integer
    pub fn as_u8(self) -> u8 {
        match self {
            ChoiceBit::Zero => 0,
            ChoiceBit::One => 1,
        }
    }
}

impl From<bool> for ChoiceBit {
    fn from(bit: bool) -> Self {
        if bit {
            ChoiceBit::One
        } else {
            ChoiceBit::Zero
        }
    }
}

impl TryFrom<u8> for ChoiceBit {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ChoiceBit::Zero),
            1 => Ok(ChoiceBit::One),
            other => Err(Error::InvalidInput(format!(
                "Choice bit must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// Configuration for a coin-tossing session
///
/// Both parties must build it with the same bit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinTossConfig {
    bit_length: usize,
}

impl CoinTossConfig {
    /// Default output length of 128 bits
    pub const DEFAULT_BIT_LENGTH: usize = 128;

    /// Create a configuration for a `bit_length`-bit output
    pub fn new(bit_length: usize) -> Result<Self> {
        if bit_length == 0 {
            return Err(Error::InvalidInput(
                "Coin toss length must be positive".into(),
            ));
        }
        if bit_length % 8 != 0 {
            return Err(Error::InvalidInput(format!(
                "Coin toss length must be a multiple of 8, got {bit_length}"
            )));
        }
        Ok(Self { bit_length })
    }

    /// Output length in bits (`L`)
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// Output length in bytes (`L / 8`)
    pub fn byte_length(&self) -> usize {
        self.bit_length / 8
    }
}

impl Default for CoinTossConfig {
    fn default() -> Self {
        Self {
            bit_length: Self::DEFAULT_BIT_LENGTH,
        }
    }
}

/// Serde adapter encoding byte fields as hex strings
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_bit_conversions() {
        assert_eq!(ChoiceBit::try_from(0).unwrap(), ChoiceBit::Zero);
        assert_eq!(ChoiceBit::try_from(1).unwrap(), ChoiceBit::One);
        assert!(matches!(ChoiceBit::try_from(2), Err(Error::InvalidInput(_))));
        assert_eq!(ChoiceBit::from(true).as_u8(), 1);
        assert_eq!(ChoiceBit::One.select("x0", "x1"), "x1");
    }

    #[test]
    fn test_coin_toss_config_validation() {
        let config = CoinTossConfig::new(128).unwrap();
        assert_eq!(config.byte_length(), 16);
        assert_eq!(CoinTossConfig::default(), config);

        assert!(matches!(CoinTossConfig::new(0), Err(Error::InvalidInput(_))));
        assert!(matches!(CoinTossConfig::new(12), Err(Error::InvalidInput(_))));
        assert_eq!(CoinTossConfig::new(8).unwrap().byte_length(), 1);
    }
}
