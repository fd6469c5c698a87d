//! Party One of the coin toss: commits to a random value, then opens it
//! after seeing Party Two's share

use super::{combine_shares, CoinTossOutput};
use crate::channel::Channel;
use crate::commitment::CommitterWithProofs;
use crate::kdf::Kdf;
use crate::security::{Malicious, SecuredRole, StandAlone};
use crate::types::CoinTossConfig;
use crate::{Error, Result};
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, info, instrument};
use zeroize::Zeroizing;

/// Coin-tossing party that commits first
pub struct CoinTossPartyOne<Cm, K> {
    config: CoinTossConfig,
    committer: Cm,
    kdf: K,
}

impl<Cm: CommitterWithProofs, K: Kdf> CoinTossPartyOne<Cm, K> {
    /// Toss `config.bit_length()` bits, committing through `committer` and
    /// expanding the committed value with `kdf`
    pub fn new(config: CoinTossConfig, committer: Cm, kdf: K) -> Self {
        Self {
            config,
            committer,
            kdf,
        }
    }

    /// Run one toss against a [`CoinTossPartyTwo`](super::CoinTossPartyTwo)
    ///
    /// Fails with [`Error::InvalidInput`] before sending anything if the KDF
    /// cannot produce the configured length.
    #[instrument(skip_all, fields(bits = self.config.bit_length()))]
    pub async fn toss<C, R>(&mut self, channel: &mut C, rng: &mut R) -> Result<CoinTossOutput>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized,
    {
        info!("Starting coin toss as party one");
        let len = self.config.byte_length();
        self.kdf.check_output_len(len)?;

        let raw = self.committer.random_value(rng);
        let id = self.committer.commit(channel, rng, &raw).await?;
        self.committer.prove_knowledge(channel, rng, id).await?;

        let s2 = Zeroizing::new(
            channel
                .receive()
                .await
                .map_err(|e| e.with_context("receiving party two's share"))?,
        );
        if s2.len() != len {
            return Err(Error::ProtocolFormat(format!(
                "Party two's share must be {len} bytes, got {}",
                s2.len()
            )));
        }
        debug!(commitment_id = id, "Share received");

        self.committer.prove_committed_value(channel, rng, id).await?;

        let seed = Zeroizing::new(self.committer.value_to_bytes(&raw));
        let s1 = Zeroizing::new(self.kdf.derive(&seed, len)?);
        let output = combine_shares(&s1, &s2)?;
        info!("Coin toss finished");
        Ok(output)
    }
}

impl<Cm, K> StandAlone for CoinTossPartyOne<Cm, K> {}

/// Both proofs run on every toss, so the role is always malicious-secure
impl<Cm: Send + Sync, K> SecuredRole for CoinTossPartyOne<Cm, K> {
    type Level = Malicious<Cm>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use crate::commitment::{PedersenCommitter, PedersenReceiver, ReceiverWithProofs};
    use crate::group::Secp256k1Group;
    use crate::kdf::HkdfSha256;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[tokio::test]
    async fn test_short_share_is_protocol_error() {
        let group = Secp256k1Group::new();
        let (mut one_ch, mut two_ch) = MemoryChannel::pair();
        let mut rng = ChaCha20Rng::seed_from_u64(80);

        let mut receiver = PedersenReceiver::setup(group, &mut two_ch, &mut rng)
            .await
            .unwrap();
        let committer = PedersenCommitter::setup(group, &mut one_ch).await.unwrap();
        let mut one = CoinTossPartyOne::new(CoinTossConfig::default(), committer, HkdfSha256::new());

        let peer = async {
            let id = receiver.receive_commitment(&mut two_ch).await.unwrap();
            assert!(receiver.verify_knowledge(&mut two_ch, id).await.unwrap());
            two_ch.send(&[0u8; 15]).await.unwrap();
        };
        let mut one_rng = ChaCha20Rng::seed_from_u64(81);
        let (result, ()) = tokio::join!(one.toss(&mut one_ch, &mut one_rng), peer);

        assert!(matches!(result, Err(Error::ProtocolFormat(_))));
    }

    #[tokio::test]
    async fn test_length_beyond_kdf_fails_before_committing() {
        let group = Secp256k1Group::new();
        let (mut one_ch, mut two_ch) = MemoryChannel::pair();
        let mut rng = ChaCha20Rng::seed_from_u64(82);

        PedersenReceiver::setup(group, &mut two_ch, &mut rng)
            .await
            .unwrap();
        let committer = PedersenCommitter::setup(group, &mut one_ch).await.unwrap();
        let config = CoinTossConfig::new((HkdfSha256::MAX_OUTPUT_LEN + 1) * 8).unwrap();
        let mut one = CoinTossPartyOne::new(config, committer, HkdfSha256::new());

        let result = one.toss(&mut one_ch, &mut rng).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // Nothing reached party two
        drop(one_ch);
        assert!(matches!(two_ch.receive().await, Err(Error::Io { .. })));
    }

    #[tokio::test]
    async fn test_role_is_tagged_malicious() {
        use crate::security::SecurityLevel;

        fn level_name<T: SecuredRole>(_: &T) -> &'static str {
            <T::Level as SecurityLevel>::NAME
        }

        let group = Secp256k1Group::new();
        let (mut one_ch, mut two_ch) = MemoryChannel::pair();
        let mut rng = ChaCha20Rng::seed_from_u64(83);
        PedersenReceiver::setup(group, &mut two_ch, &mut rng)
            .await
            .unwrap();
        let committer = PedersenCommitter::setup(group, &mut one_ch).await.unwrap();

        let one = CoinTossPartyOne::new(CoinTossConfig::default(), committer, HkdfSha256::new());
        assert_eq!(level_name(&one), "malicious");
    }
}
