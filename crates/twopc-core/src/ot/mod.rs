//! 1-out-of-2 oblivious transfer from DDH
//!
//! Two messages:
//! 1. Receiver → sender: `(a, b, z0, z1)` where `a = g^α`, `b = g^β` and
//!    `z_σ = g^{αβ}` while `z_{1-σ}` is random. Malicious receivers also send
//!    a proof of knowledge of `α`.
//! 2. Sender → receiver: `(w0, w1, c0, c1)` where `w_i = a^{u_i} g^{v_i}` and
//!    `c_i` is `x_i` masked under `k_i = z_i^{u_i} b^{v_i}`.
//!
//! The receiver recomputes `k_σ = w_σ^β`; `k_{1-σ}` is uniform from its
//! point of view, so `x_{1-σ}` stays hidden.
//!
//! Roles are generic over the group, the payload kind ([`GroupElementPayload`]
//! or [`ByteArrayPayload`]) and the security level ([`Privacy`] or
//! [`Malicious`]).
//!
//! [`Privacy`]: crate::security::Privacy
//! [`Malicious`]: crate::security::Malicious

mod gate;
mod messages;
mod payload;
mod receiver;
mod sender;

pub use gate::OtProofGate;
pub use messages::{OtReceiverMessage, OtSenderMessage};
pub use payload::{ByteArrayPayload, GroupElementPayload, OtPayload};
pub use receiver::{OtReceiver, ReceiverSession, VerifiedTuple};
pub use sender::{OtSender, SenderSession};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, MemoryChannel};
    use crate::group::{DlogGroup, RistrettoGroup, Secp256k1Group, ZpSafePrimeGroup};
    use crate::kdf::{HkdfSha256, Kdf1};
    use crate::security::{Malicious, SecuredRole, SecurityLevel};
    use crate::sigma::SchnorrProofs;
    use crate::types::ChoiceBit;
    use crate::Error;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use sha2::Sha256;

    async fn run_bytes<G: DlogGroup + Clone>(
        group: G,
        x0: &[u8],
        x1: &[u8],
        sigma: ChoiceBit,
        seed: u64,
    ) -> Vec<u8> {
        let sender = OtSender::new(group.clone(), ByteArrayPayload::new(HkdfSha256::new()));
        let receiver = OtReceiver::new(group, ByteArrayPayload::new(HkdfSha256::new()));
        let (mut s_ch, mut r_ch) = MemoryChannel::pair();
        let mut s_rng = ChaCha20Rng::seed_from_u64(seed);
        let mut r_rng = ChaCha20Rng::seed_from_u64(seed + 1);

        let (x0, x1) = (x0.to_vec(), x1.to_vec());
        let (sent, received) = tokio::join!(
            sender.transfer(&mut s_ch, &mut s_rng, &x0, &x1),
            receiver.transfer(&mut r_ch, &mut r_rng, sigma),
        );
        sent.unwrap();
        received.unwrap()
    }

    #[tokio::test]
    async fn test_byte_ot_returns_chosen_input() {
        for sigma in [ChoiceBit::Zero, ChoiceBit::One] {
            let out = run_bytes(Secp256k1Group::new(), b"left input", b"rightinput", sigma, 50).await;
            assert_eq!(out, sigma.select(b"left input".to_vec(), b"rightinput".to_vec()));
        }
    }

    #[tokio::test]
    async fn test_aaaa_bbbb_over_every_group() {
        assert_eq!(
            run_bytes(Secp256k1Group::new(), b"AAAA", b"BBBB", ChoiceBit::One, 51).await,
            b"BBBB"
        );
        assert_eq!(
            run_bytes(RistrettoGroup::new(), b"AAAA", b"BBBB", ChoiceBit::One, 52).await,
            b"BBBB"
        );
        assert_eq!(
            run_bytes(ZpSafePrimeGroup::rfc3526_2048(), b"AAAA", b"BBBB", ChoiceBit::One, 53).await,
            b"BBBB"
        );
    }

    #[tokio::test]
    async fn test_output_ignores_unchosen_input() {
        let a = run_bytes(RistrettoGroup::new(), b"secret-0", b"secret-1", ChoiceBit::Zero, 54).await;
        let b = run_bytes(RistrettoGroup::new(), b"secret-0", b"SECRET-X", ChoiceBit::Zero, 54).await;
        assert_eq!(a, b"secret-0");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_group_ot_returns_chosen_element() {
        let group = Secp256k1Group::new();
        let mut rng = ChaCha20Rng::seed_from_u64(55);
        let x0 = group.random_generator(&mut rng);
        let x1 = group.random_generator(&mut rng);

        for sigma in [ChoiceBit::Zero, ChoiceBit::One] {
            let sender = OtSender::new(group, GroupElementPayload);
            let receiver = OtReceiver::new(group, GroupElementPayload);
            let (mut s_ch, mut r_ch) = MemoryChannel::pair();
            let mut r_rng = ChaCha20Rng::seed_from_u64(56);

            let (sent, received) = tokio::join!(
                sender.transfer(&mut s_ch, &mut rng, &x0, &x1),
                receiver.transfer(&mut r_ch, &mut r_rng, sigma),
            );
            sent.unwrap();
            assert_eq!(received.unwrap(), sigma.select(x0, x1));
        }
    }

    #[tokio::test]
    async fn test_malicious_ot_with_kdf1() {
        let group = RistrettoGroup::new();
        let sender = OtSender::with_level(
            group,
            ByteArrayPayload::new(Kdf1::<Sha256>::new()),
            Malicious::new(SchnorrProofs),
        );
        let receiver = OtReceiver::with_level(
            group,
            ByteArrayPayload::new(Kdf1::<Sha256>::new()),
            Malicious::new(SchnorrProofs),
        );
        let (mut s_ch, mut r_ch) = MemoryChannel::pair();
        let mut s_rng = ChaCha20Rng::seed_from_u64(57);
        let mut r_rng = ChaCha20Rng::seed_from_u64(58);

        let (x0, x1) = (vec![7u8; 48], vec![9u8; 48]);
        let (sent, received) = tokio::join!(
            sender.transfer(&mut s_ch, &mut s_rng, &x0, &x1),
            receiver.transfer(&mut r_ch, &mut r_rng, ChoiceBit::Zero),
        );
        sent.unwrap();
        assert_eq!(received.unwrap(), x0);

        fn level_name<T: SecuredRole>(_: &T) -> &'static str {
            <T::Level as SecurityLevel>::NAME
        }
        assert_eq!(level_name(&sender), "malicious");
    }

    #[tokio::test]
    async fn test_malicious_sender_aborts_on_privacy_receiver() {
        let group = Secp256k1Group::new();
        let sender = OtSender::with_level(
            group,
            ByteArrayPayload::new(HkdfSha256::new()),
            Malicious::new(SchnorrProofs),
        );
        let (mut s_ch, mut r_ch) = MemoryChannel::pair();
        let mut rng = ChaCha20Rng::seed_from_u64(59);

        let (_, message, _) =
            ReceiverSession::new(&group, &crate::security::Privacy, &mut rng, ChoiceBit::One);
        crate::channel::send_message(&mut r_ch, "test", &message).await.unwrap();
        r_ch.send(b"not a proof").await.unwrap();

        let err = sender
            .transfer(&mut s_ch, &mut rng, &b"AAAA".to_vec(), &b"BBBB".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CheatAttempt(_)));
    }

    #[tokio::test]
    async fn test_invalid_inputs_fail_before_network() {
        let sender = OtSender::new(Secp256k1Group::new(), ByteArrayPayload::new(HkdfSha256::new()));
        let (mut s_ch, _r_ch) = MemoryChannel::pair();
        let mut rng = ChaCha20Rng::seed_from_u64(60);

        let err = sender
            .transfer(&mut s_ch, &mut rng, &vec![1u8; 4], &vec![1u8; 5])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
