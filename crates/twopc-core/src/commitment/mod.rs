//! Commitment capability with attached zero-knowledge proofs
//!
//! The committer commits to a value, proves it knows the committed value, and
//! later proves which value it committed to. The receiver verifies both proofs
//! against the commitment identified by a [`CommitmentId`].
//!
//! Every method drives the channel passed to it, so the caller keeps
//! ownership of the channel between steps.

use crate::channel::{async_trait, Channel};
use crate::{CommitmentId, Result};
use rand_core::{CryptoRng, RngCore};

pub mod pedersen;

pub use pedersen::{PedersenCommitter, PedersenReceiver};

/// Committing side of a commitment scheme with proofs
#[async_trait]
pub trait CommitterWithProofs: Send {
    /// Value space of the scheme
    type Value: Clone + Send + Sync;

    /// Sample a uniformly random committable value
    fn random_value<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Self::Value;

    /// Canonical byte encoding of a value, as seen by the receiver after decommitment
    fn value_to_bytes(&self, value: &Self::Value) -> Vec<u8>;

    /// Commit to `value` and send the commitment
    async fn commit<C, R>(
        &mut self,
        channel: &mut C,
        rng: &mut R,
        value: &Self::Value,
    ) -> Result<CommitmentId>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized;

    /// Prove knowledge of the value committed under `id`
    async fn prove_knowledge<C, R>(
        &mut self,
        channel: &mut C,
        rng: &mut R,
        id: CommitmentId,
    ) -> Result<()>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized;

    /// Reveal the value committed under `id` and prove it is the committed one
    async fn prove_committed_value<C, R>(
        &mut self,
        channel: &mut C,
        rng: &mut R,
        id: CommitmentId,
    ) -> Result<()>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized;
}

/// Receiving side of a commitment scheme with proofs
#[async_trait]
pub trait ReceiverWithProofs: Send {
    /// Value space of the scheme
    type Value: Clone + Send + Sync;

    /// Wait for a commitment and store it
    async fn receive_commitment<C>(&mut self, channel: &mut C) -> Result<CommitmentId>
    where
        C: Channel + ?Sized;

    /// Receive and check the proof that the committer knows the value under `id`
    async fn verify_knowledge<C>(&mut self, channel: &mut C, id: CommitmentId) -> Result<bool>
    where
        C: Channel + ?Sized;

    /// Receive the decommitment for `id` and check its proof
    ///
    /// Returns the committed value, or `None` if the proof was rejected.
    async fn verify_committed_value<C>(
        &mut self,
        channel: &mut C,
        id: CommitmentId,
    ) -> Result<Option<Self::Value>>
    where
        C: Channel + ?Sized;

    /// Canonical byte encoding of a decommitted value
    fn value_to_bytes(&self, value: &Self::Value) -> Vec<u8>;
}
