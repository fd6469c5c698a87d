//! Payload kinds an OT can carry
//!
//! The sender and receiver skeletons are shared. A payload decides how a
//! derived key `k` masks an input and how the receiver strips the mask again.

use crate::group::{reconstruct_member, DlogGroup};
use crate::kdf::{xor_in_place, Kdf};
use crate::{Error, Result};
use zeroize::Zeroizing;

/// Masking strategy for OT inputs
pub trait OtPayload<G: DlogGroup>: Send + Sync {
    /// Sender input, and the receiver's output
    type Input: Clone + Send + Sync;
    /// Decoded ciphertext on the receiver side
    type Ciphertext: Send + Sync;

    /// Name used in logs
    const NAME: &'static str;

    /// Check a pair of sender inputs before any message is sent
    fn validate_inputs(&self, group: &G, x0: &Self::Input, x1: &Self::Input) -> Result<()>;

    /// Mask `input` under `key`, returning the wire encoding of the ciphertext
    fn mask(&self, group: &G, key: &G::Element, input: &Self::Input) -> Result<Vec<u8>>;

    /// Decode and check both ciphertexts of a received tuple
    fn decode_ciphertexts(
        &self,
        group: &G,
        c0: &[u8],
        c1: &[u8],
    ) -> Result<(Self::Ciphertext, Self::Ciphertext)>;

    /// Recover the chosen input from its ciphertext, given `w_σ` and `β`
    fn unmask(
        &self,
        group: &G,
        w_sigma: &G::Element,
        beta: &G::Exponent,
        ciphertext: &Self::Ciphertext,
    ) -> Result<Self::Input>;
}

/// Inputs are group elements, masked by multiplication: `c = x · k`
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupElementPayload;

impl<G: DlogGroup> OtPayload<G> for GroupElementPayload {
    type Input = G::Element;
    type Ciphertext = G::Element;

    const NAME: &'static str = "group-element";

    fn validate_inputs(&self, group: &G, x0: &G::Element, x1: &G::Element) -> Result<()> {
        for (name, x) in [("x0", x0), ("x1", x1)] {
            if !group.is_member(x) {
                return Err(Error::InvalidInput(format!(
                    "{name} is not a member of the {} group",
                    group.name()
                )));
            }
        }
        Ok(())
    }

    fn mask(&self, group: &G, key: &G::Element, input: &G::Element) -> Result<Vec<u8>> {
        Ok(group.element_to_bytes(&group.multiply(input, key)))
    }

    fn decode_ciphertexts(
        &self,
        group: &G,
        c0: &[u8],
        c1: &[u8],
    ) -> Result<(G::Element, G::Element)> {
        Ok((
            reconstruct_member(group, "c0", c0)?,
            reconstruct_member(group, "c1", c1)?,
        ))
    }

    fn unmask(
        &self,
        group: &G,
        w_sigma: &G::Element,
        beta: &G::Exponent,
        ciphertext: &G::Element,
    ) -> Result<G::Element> {
        // w_σ^(q-β) = k_σ^-1
        let inverse_key = group.exponentiate(w_sigma, &group.invert_exponent(beta));
        Ok(group.multiply(ciphertext, &inverse_key))
    }
}

/// Inputs are byte strings of equal length, masked with a KDF pad: `c = x XOR KDF(k, |x|)`
#[derive(Debug, Clone, Default)]
pub struct ByteArrayPayload<K> {
    kdf: K,
}

impl<K: Kdf> ByteArrayPayload<K> {
    /// Byte payload padded with `kdf`
    pub fn new(kdf: K) -> Self {
        Self { kdf }
    }

    fn pad<G: DlogGroup>(&self, group: &G, key: &G::Element, len: usize) -> Result<Zeroizing<Vec<u8>>> {
        let seed = Zeroizing::new(group.element_to_bytes(key));
        Ok(Zeroizing::new(self.kdf.derive(&seed, len)?))
    }
}

impl<G: DlogGroup, K: Kdf> OtPayload<G> for ByteArrayPayload<K> {
    type Input = Vec<u8>;
    type Ciphertext = Vec<u8>;

    const NAME: &'static str = "byte-array";

    fn validate_inputs(&self, _group: &G, x0: &Vec<u8>, x1: &Vec<u8>) -> Result<()> {
        if x0.len() != x1.len() {
            return Err(Error::InvalidInput(format!(
                "x0 and x1 must have equal length, got {} and {}",
                x0.len(),
                x1.len()
            )));
        }
        self.kdf.check_output_len(x0.len())
    }

    fn mask(&self, group: &G, key: &G::Element, input: &Vec<u8>) -> Result<Vec<u8>> {
        let pad = self.pad(group, key, input.len())?;
        let mut ciphertext = input.clone();
        xor_in_place(&mut ciphertext, &pad);
        Ok(ciphertext)
    }

    fn decode_ciphertexts(&self, _group: &G, c0: &[u8], c1: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        if c0.len() != c1.len() {
            return Err(Error::ProtocolFormat(format!(
                "c0 and c1 must have equal length, got {} and {}",
                c0.len(),
                c1.len()
            )));
        }
        // No honest sender produces a ciphertext longer than the pad
        self.kdf
            .check_output_len(c0.len())
            .map_err(|e| Error::ProtocolFormat(format!("Ciphertext rejected: {e}")))?;
        Ok((c0.to_vec(), c1.to_vec()))
    }

    fn unmask(
        &self,
        group: &G,
        w_sigma: &G::Element,
        beta: &G::Exponent,
        ciphertext: &Vec<u8>,
    ) -> Result<Vec<u8>> {
        // w_σ^β = k_σ, the sender's pad seed
        let key = group.exponentiate(w_sigma, beta);
        let pad = self.pad(group, &key, ciphertext.len())?;
        let mut plain = ciphertext.clone();
        xor_in_place(&mut plain, &pad);
        Ok(plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{RistrettoGroup, Secp256k1Group};
    use crate::kdf::HkdfSha256;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_byte_mask_is_undone_by_matching_key() {
        let group = Secp256k1Group::new();
        let mut rng = ChaCha20Rng::seed_from_u64(20);
        let payload = ByteArrayPayload::new(HkdfSha256::new());

        let w = group.random_generator(&mut rng);
        let beta = group.random_exponent(&mut rng);
        let key = group.exponentiate(&w, &beta);

        let input = b"attack at dawn".to_vec();
        let c = payload.mask(&group, &key, &input).unwrap();
        assert_eq!(c.len(), input.len());
        assert_ne!(c, input);
        assert_eq!(payload.unmask(&group, &w, &beta, &c).unwrap(), input);
    }

    #[test]
    fn test_group_mask_is_undone_by_matching_key() {
        let group = RistrettoGroup::new();
        let mut rng = ChaCha20Rng::seed_from_u64(21);

        let w = group.random_generator(&mut rng);
        let beta = group.random_exponent(&mut rng);
        let key = group.exponentiate(&w, &beta);
        let input = group.random_generator(&mut rng);

        let c_bytes = GroupElementPayload.mask(&group, &key, &input).unwrap();
        let c = reconstruct_member(&group, "c", &c_bytes).unwrap();
        assert_eq!(GroupElementPayload.unmask(&group, &w, &beta, &c).unwrap(), input);
    }

    #[test]
    fn test_byte_inputs_must_have_equal_length() {
        let group = Secp256k1Group::new();
        let payload = ByteArrayPayload::new(HkdfSha256::new());
        let err = payload
            .validate_inputs(&group, &vec![1, 2, 3], &vec![1, 2])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = OtPayload::<Secp256k1Group>::decode_ciphertexts(&payload, &group, &[0; 4], &[0; 5])
            .unwrap_err();
        assert!(matches!(err, Error::ProtocolFormat(_)));
    }

    #[test]
    fn test_byte_lengths_beyond_kdf_are_rejected() {
        let group = Secp256k1Group::new();
        let payload = ByteArrayPayload::new(HkdfSha256::new());
        let long = vec![0u8; 9000];

        let err = payload.validate_inputs(&group, &long, &long).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // From the peer, the same length is a malformed message
        let err = OtPayload::<Secp256k1Group>::decode_ciphertexts(&payload, &group, &long, &long)
            .unwrap_err();
        assert!(matches!(err, Error::ProtocolFormat(_)));
        assert!(err.is_abort());
    }
}
