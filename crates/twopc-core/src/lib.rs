//! # twopc-core
//!
//! Two-party protocols over abstract discrete-log groups:
//! - 1-out-of-2 oblivious transfer from DDH, carrying group elements or byte strings
//! - Coin tossing from commitments with zero-knowledge proofs
//!
//! Groups, key derivation, commitments and the transport are all traits, so
//! each protocol runs unchanged over secp256k1, Ristretto or a safe-prime
//! subgroup of `Z_p^*`, and over an in-memory or TCP channel.
//!
//! ## Example
//!
//! ```rust,ignore
//! use twopc_core::channel::MemoryChannel;
//! use twopc_core::group::Secp256k1Group;
//! use twopc_core::kdf::HkdfSha256;
//! use twopc_core::ot::{ByteArrayPayload, OtReceiver, OtSender};
//! use twopc_core::ChoiceBit;
//!
//! let (mut alice, mut bob) = MemoryChannel::pair();
//! let sender = OtSender::new(Secp256k1Group::new(), ByteArrayPayload::new(HkdfSha256::new()));
//! let receiver = OtReceiver::new(Secp256k1Group::new(), ByteArrayPayload::new(HkdfSha256::new()));
//!
//! let (sent, received) = tokio::join!(
//!     sender.transfer(&mut alice, &mut rng_a, &b"AAAA".to_vec(), &b"BBBB".to_vec()),
//!     receiver.transfer(&mut bob, &mut rng_b, ChoiceBit::One),
//! );
//! assert_eq!(received?, b"BBBB");
//! ```

pub mod channel;
pub mod coin_tossing;
pub mod commitment;
pub mod error;
pub mod group;
pub mod kdf;
pub mod ot;
pub mod security;
pub mod sigma;
pub mod types;

pub use error::{Error, Result};
pub use types::{ChoiceBit, CoinTossConfig, CommitmentId};

/// Protocol version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
