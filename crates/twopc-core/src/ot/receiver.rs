//! OT receiver: sends `(a, b, z0, z1)` hiding `σ`, then recovers `x_σ`
//! from the sender's reply

use super::gate::OtProofGate;
use super::messages::{OtReceiverMessage, OtSenderMessage};
use super::payload::OtPayload;
use crate::channel::{receive_message, send_message, Channel};
use crate::group::{reconstruct_member, DlogGroup};
use crate::security::{Privacy, SecuredRole, SecurityLevel, StandAlone};
use crate::sigma::DlogProof;
use crate::types::ChoiceBit;
use crate::Result;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, info, instrument};

/// Receiver state between its first message and the sender's reply
pub struct ReceiverSession<G: DlogGroup> {
    sigma: ChoiceBit,
    beta: G::Exponent,
}

impl<G: DlogGroup> ReceiverSession<G> {
    /// Start a transfer for choice `sigma`
    ///
    /// Returns the session, the first message, and the proof about `a` the
    /// security level requires (always `None` for [`Privacy`]).
    pub fn new<L, R>(
        group: &G,
        level: &L,
        rng: &mut R,
        sigma: ChoiceBit,
    ) -> (Self, OtReceiverMessage, Option<DlogProof>)
    where
        L: OtProofGate<G>,
        R: RngCore + CryptoRng + ?Sized,
    {
        let alpha = group.random_exponent(rng);
        let beta = group.random_exponent(rng);
        let gamma = group.random_exponent(rng);

        let a = group.exponentiate_generator(&alpha);
        let b = group.exponentiate_generator(&beta);
        let c = group.exponentiate(&a, &beta);
        let d = group.exponentiate_generator(&gamma);

        let (z0, z1) = sigma.select((&c, &d), (&d, &c));
        let message = OtReceiverMessage {
            a: group.element_to_bytes(&a),
            b: group.element_to_bytes(&b),
            z0: group.element_to_bytes(z0),
            z1: group.element_to_bytes(z1),
        };
        let proof = level.prove_receiver_key(group, rng, &message, &a, &alpha);

        (Self { sigma, beta }, message, proof)
    }

    /// Validate the sender's tuple, keeping the half selected by `σ`
    pub fn check_received_tuple<P: OtPayload<G>>(
        self,
        group: &G,
        payload: &P,
        message: &OtSenderMessage,
    ) -> Result<VerifiedTuple<G, P>> {
        let w0 = reconstruct_member(group, "w0", &message.w0)?;
        let w1 = reconstruct_member(group, "w1", &message.w1)?;
        let (c0, c1) = payload.decode_ciphertexts(group, &message.c0, &message.c1)?;

        let (w_sigma, c_sigma) = self.sigma.select((w0, c0), (w1, c1));
        Ok(VerifiedTuple {
            beta: self.beta,
            w_sigma,
            c_sigma,
        })
    }
}

/// A checked sender tuple, ready for output
pub struct VerifiedTuple<G: DlogGroup, P: OtPayload<G>> {
    beta: G::Exponent,
    w_sigma: G::Element,
    c_sigma: P::Ciphertext,
}

impl<G: DlogGroup, P: OtPayload<G>> VerifiedTuple<G, P> {
    /// Recover `x_σ`
    pub fn compute_final_x_sigma(self, group: &G, payload: &P) -> Result<P::Input> {
        payload.unmask(group, &self.w_sigma, &self.beta, &self.c_sigma)
    }
}

/// OT receiver role
pub struct OtReceiver<G, P, L = Privacy> {
    group: G,
    payload: P,
    level: L,
}

impl<G: DlogGroup, P: OtPayload<G>> OtReceiver<G, P, Privacy> {
    /// Privacy-only receiver
    pub fn new(group: G, payload: P) -> Self {
        Self::with_level(group, payload, Privacy)
    }
}

impl<G: DlogGroup, P: OtPayload<G>, L: OtProofGate<G>> OtReceiver<G, P, L> {
    /// Receiver at an explicit security level
    pub fn with_level(group: G, payload: P, level: L) -> Self {
        Self {
            group,
            payload,
            level,
        }
    }

    /// Run one transfer and return `x_σ`
    #[instrument(
        skip_all,
        fields(group = self.group.name(), payload = P::NAME, level = L::NAME)
    )]
    pub async fn transfer<C, R>(
        &self,
        channel: &mut C,
        rng: &mut R,
        sigma: ChoiceBit,
    ) -> Result<P::Input>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized,
    {
        info!("Starting OT as receiver");

        let (session, message, proof) =
            ReceiverSession::new(&self.group, &self.level, rng, sigma);
        send_message(channel, "sending OT receiver message", &message).await?;
        if let Some(proof) = proof {
            send_message(channel, "sending proof of alpha", &proof).await?;
        }

        let reply: OtSenderMessage =
            receive_message(channel, "receiving OT sender message").await?;
        let verified = session.check_received_tuple(&self.group, &self.payload, &reply)?;
        debug!("Sender tuple accepted");

        let output = verified.compute_final_x_sigma(&self.group, &self.payload)?;
        info!("OT receiver finished");
        Ok(output)
    }
}

impl<G, P, L> StandAlone for OtReceiver<G, P, L> {}

impl<G, P, L: SecurityLevel> SecuredRole for OtReceiver<G, P, L> {
    type Level = L;
}
