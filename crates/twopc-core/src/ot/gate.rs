//! Proof steps each security level adds to the OT

use super::messages::OtReceiverMessage;
use crate::group::DlogGroup;
use crate::security::{Malicious, Privacy, SecurityLevel};
use crate::sigma::{DlogKnowledgeProof, DlogProof};
use crate::{Error, Result};
use rand_core::{CryptoRng, RngCore};

/// Proof of knowledge of `α` for the receiver's `a = g^α`
pub trait OtProofGate<G: DlogGroup>: SecurityLevel {
    /// Receiver side: the proof to send after the first message, if any
    fn prove_receiver_key<R: RngCore + CryptoRng + ?Sized>(
        &self,
        group: &G,
        rng: &mut R,
        message: &OtReceiverMessage,
        a: &G::Element,
        alpha: &G::Exponent,
    ) -> Option<DlogProof>;

    /// Sender side: accept or reject the receiver's proof
    fn verify_receiver_key(
        &self,
        group: &G,
        message: &OtReceiverMessage,
        a: &G::Element,
        proof: Option<&DlogProof>,
    ) -> Result<()>;
}

impl<G: DlogGroup> OtProofGate<G> for Privacy {
    fn prove_receiver_key<R: RngCore + CryptoRng + ?Sized>(
        &self,
        _group: &G,
        _rng: &mut R,
        _message: &OtReceiverMessage,
        _a: &G::Element,
        _alpha: &G::Exponent,
    ) -> Option<DlogProof> {
        None
    }

    fn verify_receiver_key(
        &self,
        _group: &G,
        _message: &OtReceiverMessage,
        _a: &G::Element,
        _proof: Option<&DlogProof>,
    ) -> Result<()> {
        Ok(())
    }
}

impl<G: DlogGroup, Z: DlogKnowledgeProof<G>> OtProofGate<G> for Malicious<Z> {
    fn prove_receiver_key<R: RngCore + CryptoRng + ?Sized>(
        &self,
        group: &G,
        rng: &mut R,
        message: &OtReceiverMessage,
        a: &G::Element,
        alpha: &G::Exponent,
    ) -> Option<DlogProof> {
        let context = message.proof_context();
        Some(
            self.proofs()
                .prove(group, rng, &context, &group.generator(), a, alpha),
        )
    }

    fn verify_receiver_key(
        &self,
        group: &G,
        message: &OtReceiverMessage,
        a: &G::Element,
        proof: Option<&DlogProof>,
    ) -> Result<()> {
        let proof = proof.ok_or_else(|| {
            Error::CheatAttempt("Receiver did not prove knowledge of alpha".into())
        })?;

        let context = message.proof_context();
        if !self
            .proofs()
            .verify(group, &context, &group.generator(), a, proof)
        {
            return Err(Error::CheatAttempt(
                "Receiver's proof of knowledge of alpha was rejected".into(),
            ));
        }
        Ok(())
    }
}
