//! Pedersen commitments with sigma-protocol proofs
//!
//! Setup: the receiver samples a trapdoor `t` and sends `h = g^t`.
//! Commit: `c = g^r h^x` for a fresh random `r`.
//! Knowledge proof: proof of knowledge of `(r, x)` opening `c`.
//! Value proof: reveal `x` with a Schnorr proof that `c · h^(-x) = g^r`.

use super::{CommitterWithProofs, ReceiverWithProofs};
use crate::channel::{async_trait, receive_message, send_message, Channel};
use crate::group::{reconstruct_member, DlogGroup};
use crate::sigma::{prove_dlog, prove_opening, verify_dlog, verify_opening, DlogProof, OpeningProof};
use crate::types::hex_bytes;
use crate::{CommitmentId, Error, Result};
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Receiver → committer: the second generator `h`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedersenSetupMessage {
    #[serde(with = "hex_bytes")]
    pub h: Vec<u8>,
}

/// Committer → receiver: a commitment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMessage {
    pub id: CommitmentId,
    #[serde(with = "hex_bytes")]
    pub commitment: Vec<u8>,
}

/// Committer → receiver: proof of knowledge of the opening
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeProofMessage {
    pub id: CommitmentId,
    #[serde(flatten)]
    pub proof: OpeningProof,
}

/// Committer → receiver: revealed value with proof it was committed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecommitMessage {
    pub id: CommitmentId,
    #[serde(with = "hex_bytes")]
    pub value: Vec<u8>,
    #[serde(flatten)]
    pub proof: DlogProof,
}

fn transcript(phase: &'static [u8], id: CommitmentId) -> Transcript {
    let mut transcript = Transcript::new(b"twopc-pedersen");
    transcript.append_message(b"phase", phase);
    transcript.append_u64(b"id", id);
    transcript
}

/// `c · h^(-x)`, which equals `g^r` for an honest opening
fn strip_value<G: DlogGroup>(
    group: &G,
    h: &G::Element,
    commitment: &G::Element,
    value: &G::Exponent,
) -> G::Element {
    group.multiply(commitment, &group.exponentiate(h, &group.invert_exponent(value)))
}

struct Opening<G: DlogGroup> {
    commitment: G::Element,
    value: G::Exponent,
    randomness: G::Exponent,
}

/// Committing side of the Pedersen scheme
pub struct PedersenCommitter<G: DlogGroup> {
    group: G,
    h: G::Element,
    next_id: CommitmentId,
    openings: HashMap<CommitmentId, Opening<G>>,
}

impl<G: DlogGroup> PedersenCommitter<G> {
    /// Receive `h` from the receiver and validate it
    #[instrument(skip_all, fields(group = group.name()))]
    pub async fn setup<C: Channel + ?Sized>(group: G, channel: &mut C) -> Result<Self> {
        let msg: PedersenSetupMessage =
            receive_message(channel, "receiving Pedersen setup").await?;
        let h = reconstruct_member(&group, "h", &msg.h)?;
        if h == group.generator() {
            return Err(Error::CheatAttempt(
                "Pedersen parameter h equals the generator".into(),
            ));
        }
        debug!("Pedersen committer ready");

        Ok(Self {
            group,
            h,
            next_id: 0,
            openings: HashMap::new(),
        })
    }

    fn opening(&self, id: CommitmentId) -> Result<&Opening<G>> {
        self.openings
            .get(&id)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown commitment id {id}")))
    }
}

#[async_trait]
impl<G: DlogGroup> CommitterWithProofs for PedersenCommitter<G> {
    type Value = G::Exponent;

    fn random_value<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> G::Exponent {
        self.group.random_exponent(rng)
    }

    fn value_to_bytes(&self, value: &G::Exponent) -> Vec<u8> {
        self.group.exponent_to_bytes(value)
    }

    async fn commit<C, R>(
        &mut self,
        channel: &mut C,
        rng: &mut R,
        value: &G::Exponent,
    ) -> Result<CommitmentId>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized,
    {
        let id = self.next_id;
        self.next_id += 1;

        let randomness = self.group.random_exponent(rng);
        let commitment = self.group.multiply(
            &self.group.exponentiate_generator(&randomness),
            &self.group.exponentiate(&self.h, value),
        );

        let msg = CommitMessage {
            id,
            commitment: self.group.element_to_bytes(&commitment),
        };
        self.openings.insert(
            id,
            Opening {
                commitment,
                value: value.clone(),
                randomness,
            },
        );

        send_message(channel, "sending commitment", &msg).await?;
        debug!(commitment_id = id, "Commitment sent");
        Ok(id)
    }

    async fn prove_knowledge<C, R>(
        &mut self,
        channel: &mut C,
        rng: &mut R,
        id: CommitmentId,
    ) -> Result<()>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized,
    {
        let opening = self.opening(id)?;
        let proof = prove_opening(
            &self.group,
            rng,
            &mut transcript(b"knowledge", id),
            &self.h,
            &opening.commitment,
            &opening.randomness,
            &opening.value,
        );

        send_message(
            channel,
            "sending knowledge proof",
            &KnowledgeProofMessage { id, proof },
        )
        .await
    }

    async fn prove_committed_value<C, R>(
        &mut self,
        channel: &mut C,
        rng: &mut R,
        id: CommitmentId,
    ) -> Result<()>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + Send + ?Sized,
    {
        let opening = self
            .openings
            .remove(&id)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown commitment id {id}")))?;

        let g_r = strip_value(&self.group, &self.h, &opening.commitment, &opening.value);
        let proof = prove_dlog(
            &self.group,
            rng,
            &mut transcript(b"value", id),
            &self.group.generator(),
            &g_r,
            &opening.randomness,
        );

        let msg = DecommitMessage {
            id,
            value: self.group.exponent_to_bytes(&opening.value),
            proof,
        };
        send_message(channel, "sending decommitment", &msg).await
    }
}

/// Receiving side of the Pedersen scheme
pub struct PedersenReceiver<G: DlogGroup> {
    group: G,
    h: G::Element,
    commitments: HashMap<CommitmentId, G::Element>,
}

impl<G: DlogGroup> PedersenReceiver<G> {
    /// Sample the trapdoor, send `h = g^t` to the committer
    #[instrument(skip_all, fields(group = group.name()))]
    pub async fn setup<C, R>(group: G, channel: &mut C, rng: &mut R) -> Result<Self>
    where
        C: Channel + ?Sized,
        R: RngCore + CryptoRng + ?Sized,
    {
        let h = group.random_generator(rng);
        let msg = PedersenSetupMessage {
            h: group.element_to_bytes(&h),
        };
        send_message(channel, "sending Pedersen setup", &msg).await?;
        debug!("Pedersen receiver ready");

        Ok(Self {
            group,
            h,
            commitments: HashMap::new(),
        })
    }

    fn check_id(expected: CommitmentId, got: CommitmentId) -> Result<()> {
        if expected != got {
            return Err(Error::ProtocolFormat(format!(
                "Message refers to commitment {got}, expected {expected}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<G: DlogGroup> ReceiverWithProofs for PedersenReceiver<G> {
    type Value = G::Exponent;

    async fn receive_commitment<C>(&mut self, channel: &mut C) -> Result<CommitmentId>
    where
        C: Channel + ?Sized,
    {
        let msg: CommitMessage = receive_message(channel, "receiving commitment").await?;
        if self.commitments.contains_key(&msg.id) {
            return Err(Error::CheatAttempt(format!(
                "Commitment id {} was reused",
                msg.id
            )));
        }

        let commitment = reconstruct_member(&self.group, "commitment", &msg.commitment)?;
        self.commitments.insert(msg.id, commitment);
        debug!(commitment_id = msg.id, "Commitment received");
        Ok(msg.id)
    }

    async fn verify_knowledge<C>(&mut self, channel: &mut C, id: CommitmentId) -> Result<bool>
    where
        C: Channel + ?Sized,
    {
        let commitment = self
            .commitments
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::InvalidInput(format!("Unknown commitment id {id}")))?;

        let msg: KnowledgeProofMessage =
            receive_message(channel, "receiving knowledge proof").await?;
        Self::check_id(id, msg.id)?;

        let verified = verify_opening(
            &self.group,
            &mut transcript(b"knowledge", id),
            &self.h,
            &commitment,
            &msg.proof,
        );
        if !verified {
            warn!(commitment_id = id, "Knowledge proof rejected");
        }
        Ok(verified)
    }

    async fn verify_committed_value<C>(
        &mut self,
        channel: &mut C,
        id: CommitmentId,
    ) -> Result<Option<G::Exponent>>
    where
        C: Channel + ?Sized,
    {
        let commitment = self
            .commitments
            .remove(&id)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown commitment id {id}")))?;

        let msg: DecommitMessage = receive_message(channel, "receiving decommitment").await?;
        Self::check_id(id, msg.id)?;

        let Ok(value) = self.group.exponent_from_bytes(&msg.value) else {
            warn!(commitment_id = id, "Decommitted value is not a valid exponent");
            return Ok(None);
        };

        let g_r = strip_value(&self.group, &self.h, &commitment, &value);
        let verified = verify_dlog(
            &self.group,
            &mut transcript(b"value", id),
            &self.group.generator(),
            &g_r,
            &msg.proof,
        );
        if !verified {
            warn!(commitment_id = id, "Value proof rejected");
            return Ok(None);
        }

        Ok(Some(value))
    }

    fn value_to_bytes(&self, value: &G::Exponent) -> Vec<u8> {
        self.group.exponent_to_bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use crate::group::{RistrettoGroup, Secp256k1Group};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    async fn setup_pair<G: DlogGroup + Clone>(
        group: G,
        rng: &mut ChaCha20Rng,
    ) -> (
        PedersenCommitter<G>,
        PedersenReceiver<G>,
        MemoryChannel,
        MemoryChannel,
    ) {
        let (mut committer_ch, mut receiver_ch) = MemoryChannel::pair();
        let receiver = PedersenReceiver::setup(group.clone(), &mut receiver_ch, rng)
            .await
            .unwrap();
        let committer = PedersenCommitter::setup(group, &mut committer_ch)
            .await
            .unwrap();
        (committer, receiver, committer_ch, receiver_ch)
    }

    #[tokio::test]
    async fn test_honest_commitment_verifies() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let (mut committer, mut receiver, mut c_ch, mut r_ch) =
            setup_pair(Secp256k1Group::new(), &mut rng).await;

        let value = committer.random_value(&mut rng);
        let id = committer.commit(&mut c_ch, &mut rng, &value).await.unwrap();
        assert_eq!(receiver.receive_commitment(&mut r_ch).await.unwrap(), id);

        committer.prove_knowledge(&mut c_ch, &mut rng, id).await.unwrap();
        assert!(receiver.verify_knowledge(&mut r_ch, id).await.unwrap());

        committer
            .prove_committed_value(&mut c_ch, &mut rng, id)
            .await
            .unwrap();
        let revealed = receiver.verify_committed_value(&mut r_ch, id).await.unwrap();
        assert_eq!(revealed, Some(value));
    }

    #[tokio::test]
    async fn test_wrong_randomness_fails_knowledge_proof() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let group = RistrettoGroup::new();
        let (mut committer, mut receiver, mut c_ch, mut r_ch) =
            setup_pair(group, &mut rng).await;

        let value = committer.random_value(&mut rng);
        let id = committer.commit(&mut c_ch, &mut rng, &value).await.unwrap();
        receiver.receive_commitment(&mut r_ch).await.unwrap();

        let forged = group.random_exponent(&mut rng);
        committer.openings.get_mut(&id).unwrap().randomness = forged;

        committer.prove_knowledge(&mut c_ch, &mut rng, id).await.unwrap();
        assert!(!receiver.verify_knowledge(&mut r_ch, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_revealing_a_different_value_is_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let group = Secp256k1Group::new();
        let (mut committer, mut receiver, mut c_ch, mut r_ch) =
            setup_pair(group, &mut rng).await;

        let value = committer.random_value(&mut rng);
        let id = committer.commit(&mut c_ch, &mut rng, &value).await.unwrap();
        receiver.receive_commitment(&mut r_ch).await.unwrap();

        committer.openings.get_mut(&id).unwrap().value = group.random_exponent(&mut rng);

        committer
            .prove_committed_value(&mut c_ch, &mut rng, id)
            .await
            .unwrap();
        assert_eq!(
            receiver.verify_committed_value(&mut r_ch, id).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_reused_commitment_id_is_cheating() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let (mut committer, mut receiver, mut c_ch, mut r_ch) =
            setup_pair(Secp256k1Group::new(), &mut rng).await;

        let value = committer.random_value(&mut rng);
        committer.commit(&mut c_ch, &mut rng, &value).await.unwrap();
        committer.next_id = 0;
        committer.commit(&mut c_ch, &mut rng, &value).await.unwrap();

        receiver.receive_commitment(&mut r_ch).await.unwrap();
        assert!(matches!(
            receiver.receive_commitment(&mut r_ch).await,
            Err(Error::CheatAttempt(_))
        ));
    }

    #[tokio::test]
    async fn test_setup_rejects_identity_h() {
        let group = Secp256k1Group::new();
        let (mut a, mut b) = MemoryChannel::pair();
        let identity = k256::ProjectivePoint::IDENTITY;
        send_message(
            &mut a,
            "test",
            &PedersenSetupMessage {
                h: group.element_to_bytes(&identity),
            },
        )
        .await
        .unwrap();

        assert!(matches!(
            PedersenCommitter::setup(group, &mut b).await,
            Err(Error::CheatAttempt(_))
        ));
    }
}
