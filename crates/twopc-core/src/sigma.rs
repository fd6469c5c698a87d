//! Non-interactive sigma protocols over a [`DlogGroup`]
//!
//! Challenges come from a `merlin` transcript (Fiat-Shamir), so each proof is
//! a single message. Two relations are covered:
//!
//! - knowledge of `x` such that `y = base^x` (Schnorr)
//! - knowledge of `(r, x)` such that `c = g^r h^x` (Pedersen opening)
//!
//! Callers bind a proof to its context by appending session data to the
//! transcript before proving or verifying.

use crate::group::DlogGroup;
use crate::types::hex_bytes;
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Schnorr proof of knowledge of a discrete log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlogProof {
    /// Commitment `t = base^k`
    #[serde(with = "hex_bytes")]
    pub t: Vec<u8>,
    /// Response `z = k + e * x`
    #[serde(with = "hex_bytes")]
    pub response: Vec<u8>,
}

/// Proof of knowledge of a Pedersen opening
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningProof {
    /// Commitment `t = g^k1 h^k2`
    #[serde(with = "hex_bytes")]
    pub t: Vec<u8>,
    /// `z1 = k1 + e * r`
    #[serde(with = "hex_bytes")]
    pub response_r: Vec<u8>,
    /// `z2 = k2 + e * x`
    #[serde(with = "hex_bytes")]
    pub response_x: Vec<u8>,
}

fn append_element<G: DlogGroup>(
    transcript: &mut Transcript,
    group: &G,
    label: &'static [u8],
    element: &G::Element,
) {
    transcript.append_message(label, &group.element_to_bytes(element));
}

fn challenge<G: DlogGroup>(transcript: &mut Transcript, group: &G) -> G::Exponent {
    let mut buf = [0u8; 64];
    transcript.challenge_bytes(b"challenge", &mut buf);
    group.exponent_from_uniform_bytes(&buf)
}

fn elements_equal<G: DlogGroup>(group: &G, a: &G::Element, b: &G::Element) -> bool {
    let a = group.element_to_bytes(a);
    let b = group.element_to_bytes(b);
    bool::from(a.as_slice().ct_eq(b.as_slice()))
}

/// Prove knowledge of `witness` with `public = base^witness`
pub fn prove_dlog<G, R>(
    group: &G,
    rng: &mut R,
    transcript: &mut Transcript,
    base: &G::Element,
    public: &G::Element,
    witness: &G::Exponent,
) -> DlogProof
where
    G: DlogGroup,
    R: RngCore + CryptoRng + ?Sized,
{
    transcript.append_message(b"dom-sep", b"schnorr-dlog");
    transcript.append_message(b"group", group.name().as_bytes());
    append_element(transcript, group, b"base", base);
    append_element(transcript, group, b"public", public);

    let k = group.random_exponent(rng);
    let t = group.exponentiate(base, &k);
    append_element(transcript, group, b"t", &t);

    let e = challenge(transcript, group);
    let z = group.add_exponents(&k, &group.multiply_exponents(&e, witness));

    DlogProof {
        t: group.element_to_bytes(&t),
        response: group.exponent_to_bytes(&z),
    }
}

/// Verify a [`DlogProof`]; malformed proofs are rejected
pub fn verify_dlog<G: DlogGroup>(
    group: &G,
    transcript: &mut Transcript,
    base: &G::Element,
    public: &G::Element,
    proof: &DlogProof,
) -> bool {
    let (Ok(t), Ok(z)) = (
        group.element_from_bytes(true, &proof.t),
        group.exponent_from_bytes(&proof.response),
    ) else {
        return false;
    };

    transcript.append_message(b"dom-sep", b"schnorr-dlog");
    transcript.append_message(b"group", group.name().as_bytes());
    append_element(transcript, group, b"base", base);
    append_element(transcript, group, b"public", public);
    append_element(transcript, group, b"t", &t);
    let e = challenge(transcript, group);

    // base^z == t * public^e
    let lhs = group.exponentiate(base, &z);
    let rhs = group.multiply(&t, &group.exponentiate(public, &e));
    elements_equal(group, &lhs, &rhs)
}

/// Prove knowledge of `(r, x)` with `commitment = g^r h^x`
pub fn prove_opening<G, R>(
    group: &G,
    rng: &mut R,
    transcript: &mut Transcript,
    h: &G::Element,
    commitment: &G::Element,
    r: &G::Exponent,
    x: &G::Exponent,
) -> OpeningProof
where
    G: DlogGroup,
    R: RngCore + CryptoRng + ?Sized,
{
    transcript.append_message(b"dom-sep", b"pedersen-opening");
    transcript.append_message(b"group", group.name().as_bytes());
    append_element(transcript, group, b"h", h);
    append_element(transcript, group, b"commitment", commitment);

    let k1 = group.random_exponent(rng);
    let k2 = group.random_exponent(rng);
    let t = group.multiply(
        &group.exponentiate_generator(&k1),
        &group.exponentiate(h, &k2),
    );
    append_element(transcript, group, b"t", &t);

    let e = challenge(transcript, group);
    let z1 = group.add_exponents(&k1, &group.multiply_exponents(&e, r));
    let z2 = group.add_exponents(&k2, &group.multiply_exponents(&e, x));

    OpeningProof {
        t: group.element_to_bytes(&t),
        response_r: group.exponent_to_bytes(&z1),
        response_x: group.exponent_to_bytes(&z2),
    }
}

/// Verify an [`OpeningProof`]; malformed proofs are rejected
pub fn verify_opening<G: DlogGroup>(
    group: &G,
    transcript: &mut Transcript,
    h: &G::Element,
    commitment: &G::Element,
    proof: &OpeningProof,
) -> bool {
    let (Ok(t), Ok(z1), Ok(z2)) = (
        group.element_from_bytes(true, &proof.t),
        group.exponent_from_bytes(&proof.response_r),
        group.exponent_from_bytes(&proof.response_x),
    ) else {
        return false;
    };

    transcript.append_message(b"dom-sep", b"pedersen-opening");
    transcript.append_message(b"group", group.name().as_bytes());
    append_element(transcript, group, b"h", h);
    append_element(transcript, group, b"commitment", commitment);
    append_element(transcript, group, b"t", &t);
    let e = challenge(transcript, group);

    // g^z1 h^z2 == t * c^e
    let lhs = group.multiply(
        &group.exponentiate_generator(&z1),
        &group.exponentiate(h, &z2),
    );
    let rhs = group.multiply(&t, &group.exponentiate(commitment, &e));
    elements_equal(group, &lhs, &rhs)
}

/// Proof system for discrete-log knowledge, pluggable into malicious roles
pub trait DlogKnowledgeProof<G: DlogGroup>: Send + Sync {
    /// Prove knowledge of `witness` with `public = base^witness`, bound to `context`
    fn prove<R: RngCore + CryptoRng + ?Sized>(
        &self,
        group: &G,
        rng: &mut R,
        context: &[u8],
        base: &G::Element,
        public: &G::Element,
        witness: &G::Exponent,
    ) -> DlogProof;

    /// Verify a proof produced by [`DlogKnowledgeProof::prove`]
    fn verify(
        &self,
        group: &G,
        context: &[u8],
        base: &G::Element,
        public: &G::Element,
        proof: &DlogProof,
    ) -> bool;
}

/// Fiat-Shamir Schnorr proofs with a fixed transcript label
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnorrProofs;

impl<G: DlogGroup> DlogKnowledgeProof<G> for SchnorrProofs {
    fn prove<R: RngCore + CryptoRng + ?Sized>(
        &self,
        group: &G,
        rng: &mut R,
        context: &[u8],
        base: &G::Element,
        public: &G::Element,
        witness: &G::Exponent,
    ) -> DlogProof {
        let mut transcript = Transcript::new(b"twopc-dlog-knowledge");
        transcript.append_message(b"context", context);
        prove_dlog(group, rng, &mut transcript, base, public, witness)
    }

    fn verify(
        &self,
        group: &G,
        context: &[u8],
        base: &G::Element,
        public: &G::Element,
        proof: &DlogProof,
    ) -> bool {
        let mut transcript = Transcript::new(b"twopc-dlog-knowledge");
        transcript.append_message(b"context", context);
        verify_dlog(group, &mut transcript, base, public, proof)
    }
}
