//! OT sender: checks the receiver's tuple and masks both inputs so only
//! `x_σ` can be recovered

use super::gate::OtProofGate;
use super::messages::{OtReceiverMessage, OtSenderMessage};
use super::payload::OtPayload;
use crate::channel::{receive_message, send_message, Channel};
use crate::group::{reconstruct_member, DlogGroup};
use crate::security::{Privacy, SecuredRole, SecurityLevel, StandAlone};
use crate::sigma::DlogProof;
use crate::{Error, Result};
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, info, instrument, warn};

/// Sender state after accepting the receiver's first message
pub struct SenderSession<G: DlogGroup> {
    a: G::Element,
    b: G::Element,
    z0: G::Element,
    z1: G::Element,
}

impl<G: DlogGroup> SenderSession<G> {
    /// Reconstruct and check `(a, b, z0, z1)`, plus the proof `level` demands
    pub fn from_receiver_message<L: OtProofGate<G>>(
        group: &G,
        level: &L,
        message: &OtReceiverMessage,
        proof: Option<&DlogProof>,
    ) -> Result<Self> {
        let a = reconstruct_member(group, "a", &message.a)?;
        level.verify_receiver_key(group, message, &a, proof)?;

        let b = reconstruct_member(group, "b", &message.b)?;
        let z0 = reconstruct_member(group, "z0", &message.z0)?;
        let z1 = reconstruct_member(group, "z1", &message.z1)?;
        if z0 == z1 {
            return Err(Error::CheatAttempt("z0 and z1 are equal".into()));
        }

        Ok(Self { a, b, z0, z1 })
    }

    /// Mask `x0` and `x1`, producing `(w0, w1, c0, c1)`
    pub fn compute_tuple<P, R>(
        self,
        group: &G,
        payload: &P,
        rng: &mut R,
        x0: &P::Input,
        x1: &P::Input,
    ) -> Result<OtSenderMessage>
    where
        P: OtPayload<G>,
        R: RngCore + CryptoRng + ?Sized,
    {
        payload.validate_inputs(group, x0, x1)?;

        // w = a^u g^v, k = z^u b^v
        let mut randomize = |z: &G::Element| {
            let u = group.random_exponent(rng);
            let v = group.random_exponent(rng);
            let w = group.multiply(
                &group.exponentiate(&self.a, &u),
                &group.exponentiate_generator(&v),
            );
            let k = group.multiply(&group.exponentiate(z, &u), &group.exponentiate(&self.b, &v));
            (w, k)
        };
        let (w0, k0) = randomize(&self.z0);
        let (w1, k1) = randomize(&self.z1);

        Ok(OtSenderMessage {
            w0: group.element_to_bytes(&w0),
            w1: group.element_to_bytes(&w1),
            c0: payload.mask(group, &k0, x0)?,
            c1: payload.mask(group, &k1, x1)?,
        })
    }
}

/// OT sender role
pub struct OtSender<G, P, L = Privacy> {
    group: G,
    payload: P,
    level: L,
}

impl<G: DlogGroup, P: OtPayload<G>> OtSender<G, P, Privacy> {
    /// Privacy-only sender
    pub fn new(group: G, payload: P) -> Self {
        Self::with_level(group, payload, Privacy)
    }
}

impl<G: DlogGroup, P: OtPayload<G>, L: OtProofGate<G>> OtSender<G, P, L> {
    /// Sender at an explicit security level
    pub fn with_level(group: G, payload: P, level: L) -> Self {
        Self {
            group,
            payload,
            level,
        }
    }

    /// Run one transfer of `(x0, x1)`
    ///
    /// Inputs are checked before anything is read from the channel.
    #[instrument(
        skip_all,
        fields(group = self.group.name(), payload = P::NAME, level = L::NAME)
    )]
    pub async fn transfer<C, R>(
        &self,
        channel: &mut C,
        rng: &mut R,
        x0: &P::Input,
        x1: &P::Input,
    ) -> Result<()>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized,
    {
        self.payload.validate_inputs(&self.group, x0, x1)?;
        info!("Starting OT as sender");

        let message: OtReceiverMessage =
            receive_message(channel, "receiving OT receiver message").await?;
        let proof = if L::MALICIOUS {
            match receive_message::<_, DlogProof>(channel, "receiving proof of alpha").await {
                Ok(proof) => Some(proof),
                Err(Error::ProtocolFormat(reason)) => {
                    warn!(%reason, "Malformed proof of alpha");
                    None
                }
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        let session =
            SenderSession::from_receiver_message(&self.group, &self.level, &message, proof.as_ref())?;
        debug!("Receiver message accepted");

        let reply = session.compute_tuple(&self.group, &self.payload, rng, x0, x1)?;
        send_message(channel, "sending OT sender message", &reply).await?;
        info!("OT sender finished");
        Ok(())
    }
}

impl<G, P, L> StandAlone for OtSender<G, P, L> {}

impl<G, P, L: SecurityLevel> SecuredRole for OtSender<G, P, L> {
    type Level = L;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{test_groups::small_zp, to_fixed_be, RistrettoGroup, Secp256k1Group};
    use crate::kdf::HkdfSha256;
    use crate::ot::payload::{ByteArrayPayload, GroupElementPayload};
    use crate::ot::receiver::ReceiverSession;
    use crate::security::Malicious;
    use crate::sigma::SchnorrProofs;
    use crate::types::ChoiceBit;
    use num_bigint::BigUint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_equal_z_is_cheating() {
        let group = Secp256k1Group::new();
        let mut rng = ChaCha20Rng::seed_from_u64(40);
        let (_, mut message, _) = ReceiverSession::new(&group, &Privacy, &mut rng, ChoiceBit::Zero);
        message.z1 = message.z0.clone();

        let err = SenderSession::from_receiver_message(&group, &Privacy, &message, None)
            .err()
            .unwrap();
        assert!(matches!(err, Error::CheatAttempt(ref msg) if msg.contains("equal")));
    }

    #[test]
    fn test_out_of_group_elements_are_cheating() {
        let group = small_zp();
        let mut rng = ChaCha20Rng::seed_from_u64(41);
        let (_, honest, _) = ReceiverSession::new(&group, &Privacy, &mut rng, ChoiceBit::One);

        let len = honest.a.len();
        let minus_one = to_fixed_be(&(group.modulus() - BigUint::from(1u32)), len);

        let mut message = honest.clone();
        message.a = minus_one;
        let err = SenderSession::from_receiver_message(&group, &Privacy, &message, None)
            .err()
            .unwrap();
        assert!(matches!(err, Error::CheatAttempt(ref msg) if msg.contains("a element")));

        let mut message = honest;
        message.b = vec![0xff; len];
        let err = SenderSession::from_receiver_message(&group, &Privacy, &message, None)
            .err()
            .unwrap();
        assert!(matches!(err, Error::CheatAttempt(ref msg) if msg.starts_with("b ")));
    }

    #[test]
    fn test_identity_z_is_cheating() {
        let group = RistrettoGroup::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let (_, mut message, _) = ReceiverSession::new(&group, &Privacy, &mut rng, ChoiceBit::Zero);
        message.z1 = vec![0u8; 32];

        let err = SenderSession::from_receiver_message(&group, &Privacy, &message, None)
            .err()
            .unwrap();
        assert!(matches!(err, Error::CheatAttempt(ref msg) if msg.contains("z1")));
    }

    #[test]
    fn test_tuple_lengths() {
        let group = Secp256k1Group::new();
        let mut rng = ChaCha20Rng::seed_from_u64(43);
        let (_, message, _) = ReceiverSession::new(&group, &Privacy, &mut rng, ChoiceBit::One);
        let payload = ByteArrayPayload::new(HkdfSha256::new());

        let x0 = vec![0x11; 100];
        let x1 = vec![0x22; 100];
        let session = SenderSession::from_receiver_message(&group, &Privacy, &message, None).unwrap();
        let reply = session
            .compute_tuple(&group, &payload, &mut rng, &x0, &x1)
            .unwrap();

        assert_eq!(reply.c0.len(), 100);
        assert_eq!(reply.c1.len(), 100);
        assert_eq!(reply.w0.len(), 33);
        assert_ne!(reply.w0, reply.w1);
    }

    #[test]
    fn test_non_member_group_input_is_invalid() {
        let group = small_zp();
        let mut rng = ChaCha20Rng::seed_from_u64(44);
        let (_, message, _) = ReceiverSession::new(&group, &Privacy, &mut rng, ChoiceBit::Zero);
        let session = SenderSession::from_receiver_message(&group, &Privacy, &message, None).unwrap();

        let len = message.a.len();
        let bad = group
            .element_from_bytes(false, &to_fixed_be(&(group.modulus() - BigUint::from(1u32)), len))
            .unwrap();
        let good = group.random_generator(&mut rng);

        let err = session
            .compute_tuple(&group, &GroupElementPayload, &mut rng, &good, &bad)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("x1")));
    }

    #[test]
    fn test_malicious_sender_rejects_missing_or_bad_proof() {
        let group = Secp256k1Group::new();
        let level = Malicious::new(SchnorrProofs);
        let mut rng = ChaCha20Rng::seed_from_u64(45);

        let (_, message, proof) = ReceiverSession::new(&group, &level, &mut rng, ChoiceBit::One);
        let proof = proof.unwrap();
        assert!(SenderSession::from_receiver_message(&group, &level, &message, Some(&proof)).is_ok());

        let err = SenderSession::from_receiver_message(&group, &level, &message, None)
            .err()
            .unwrap();
        assert!(matches!(err, Error::CheatAttempt(_)));

        // A valid proof about a different receiver message
        let (_, other, other_proof) = ReceiverSession::new(&group, &level, &mut rng, ChoiceBit::One);
        let mut spliced = other;
        spliced.a = message.a.clone();
        let err = SenderSession::from_receiver_message(&group, &level, &spliced, other_proof.as_ref())
            .err()
            .unwrap();
        assert!(matches!(err, Error::CheatAttempt(ref msg) if msg.contains("rejected")));
    }

    #[tokio::test]
    async fn test_inputs_beyond_kdf_fail_before_receiving() {
        use crate::channel::MemoryChannel;

        let (mut sender_ch, _receiver_ch) = MemoryChannel::pair();
        let mut rng = ChaCha20Rng::seed_from_u64(46);
        let sender = OtSender::new(Secp256k1Group::new(), ByteArrayPayload::new(HkdfSha256::new()));

        // The receiver never speaks, so reaching the channel would block
        let long = vec![0x41u8; 9000];
        let err = sender
            .transfer(&mut sender_ch, &mut rng, &long, &long)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
