//! Party Two of the coin toss: checks Party One's commitment and proofs
//! around revealing its own share

use super::{combine_shares, CoinTossOutput};
use crate::channel::Channel;
use crate::commitment::ReceiverWithProofs;
use crate::kdf::Kdf;
use crate::security::{Malicious, SecuredRole, StandAlone};
use crate::types::CoinTossConfig;
use crate::{Error, Result};
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, info, instrument, warn};
use zeroize::Zeroizing;

/// Coin-tossing party that verifies Party One's commitment
pub struct CoinTossPartyTwo<Rc, K> {
    config: CoinTossConfig,
    receiver: Rc,
    kdf: K,
}

impl<Rc: ReceiverWithProofs, K: Kdf> CoinTossPartyTwo<Rc, K> {
    /// Toss `config.bit_length()` bits, checking commitments through
    /// `receiver` and expanding the opened value with `kdf`
    pub fn new(config: CoinTossConfig, receiver: Rc, kdf: K) -> Self {
        Self {
            config,
            receiver,
            kdf,
        }
    }

    /// Run one toss against a [`CoinTossPartyOne`](super::CoinTossPartyOne)
    ///
    /// Aborts with [`Error::CheatAttempt`] if either proof is rejected. No
    /// output is produced in that case. A length the KDF cannot produce
    /// fails with [`Error::InvalidInput`] before `s2` is drawn.
    #[instrument(skip_all, fields(bits = self.config.bit_length()))]
    pub async fn toss<C, R>(&mut self, channel: &mut C, rng: &mut R) -> Result<CoinTossOutput>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized,
    {
        info!("Starting coin toss as party two");
        let len = self.config.byte_length();
        self.kdf.check_output_len(len)?;

        let mut s2 = Zeroizing::new(vec![0u8; len]);
        rng.fill_bytes(&mut s2);

        let id = self.receiver.receive_commitment(channel).await?;
        if !self.receiver.verify_knowledge(channel, id).await? {
            warn!(commitment_id = id, "Aborting coin toss");
            return Err(Error::CheatAttempt("knowledge proof rejected".into()));
        }

        channel
            .send(&s2)
            .await
            .map_err(|e| e.with_context("sending party two's share"))?;
        debug!(commitment_id = id, "Share sent");

        let Some(raw) = self.receiver.verify_committed_value(channel, id).await? else {
            warn!(commitment_id = id, "Aborting coin toss");
            return Err(Error::CheatAttempt("committed value proof rejected".into()));
        };

        let seed = Zeroizing::new(self.receiver.value_to_bytes(&raw));
        let s1 = Zeroizing::new(self.kdf.derive(&seed, len)?);
        let output = combine_shares(&s1, &s2)?;
        info!("Coin toss finished");
        Ok(output)
    }
}

impl<Rc, K> StandAlone for CoinTossPartyTwo<Rc, K> {}

/// Both proofs are verified on every toss, so the role is always malicious-secure
impl<Rc: Send + Sync, K> SecuredRole for CoinTossPartyTwo<Rc, K> {
    type Level = Malicious<Rc>;
}
