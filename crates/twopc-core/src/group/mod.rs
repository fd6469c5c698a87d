//! Discrete-log group capability
//!
//! The protocols only see a group through [`DlogGroup`]. Three implementations
//! are provided:
//! - [`Secp256k1Group`] (k256)
//! - [`RistrettoGroup`] (curve25519-dalek)
//! - [`ZpSafePrimeGroup`], the order-`q` subgroup of `Z_p^*` for a safe prime `p`
//!
//! Membership always means "non-identity element of the prime-order group".
//! The identity decodes fine on every curve, but it is never a valid protocol
//! value, so every implementation rejects it in [`DlogGroup::is_member`].

mod ristretto;
mod secp256k1;
mod zp;

pub use ristretto::RistrettoGroup;
pub use secp256k1::Secp256k1Group;
pub use zp::{ZpElement, ZpSafePrimeGroup};

use crate::{Error, Result};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use std::fmt::Debug;

/// A cyclic group of known prime order `q` with a fixed generator `g`
///
/// Implementations hold no session data and are safe to share between
/// concurrent sessions.
pub trait DlogGroup: Send + Sync {
    /// Group element
    type Element: Clone + PartialEq + Eq + Debug + Send + Sync;
    /// Integer modulo the group order
    type Exponent: Clone + PartialEq + Debug + Send + Sync;

    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Group order `q`
    fn order(&self) -> BigUint;

    /// Fixed generator `g`
    fn generator(&self) -> Self::Element;

    /// Whether `element` is a non-identity member of the group
    fn is_member(&self, element: &Self::Element) -> bool;

    /// `base ^ exponent`
    fn exponentiate(&self, base: &Self::Element, exponent: &Self::Exponent) -> Self::Element;

    /// `g ^ exponent`
    fn exponentiate_generator(&self, exponent: &Self::Exponent) -> Self::Element {
        self.exponentiate(&self.generator(), exponent)
    }

    /// Group operation
    fn multiply(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Uniform exponent in `[1, q-1]`
    fn random_exponent<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Self::Exponent;

    /// Random generator of the group
    ///
    /// Every non-identity element of a prime-order group generates it.
    fn random_generator<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        let exponent = self.random_exponent(rng);
        self.exponentiate_generator(&exponent)
    }

    /// `q - exponent`, so that `e ^ invert_exponent(x)` is the inverse of `e ^ x`
    fn invert_exponent(&self, exponent: &Self::Exponent) -> Self::Exponent;

    /// `a + b mod q`
    fn add_exponents(&self, a: &Self::Exponent, b: &Self::Exponent) -> Self::Exponent;

    /// `a * b mod q`
    fn multiply_exponents(&self, a: &Self::Exponent, b: &Self::Exponent) -> Self::Exponent;

    /// Canonical fixed-length encoding of an exponent
    fn exponent_to_bytes(&self, exponent: &Self::Exponent) -> Vec<u8>;

    /// Parse a canonical exponent encoding
    fn exponent_from_bytes(&self, bytes: &[u8]) -> Result<Self::Exponent>;

    /// Map 64 uniformly random bytes (e.g. a transcript challenge) to an exponent
    fn exponent_from_uniform_bytes(&self, bytes: &[u8; 64]) -> Self::Exponent;

    /// Serialize an element
    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8>;

    /// Reconstruct an element
    ///
    /// With `validate` set, a decoded value that is not a member is rejected
    /// with [`Error::CheatAttempt`]. Without it only the encoding is checked.
    fn element_from_bytes(&self, validate: bool, bytes: &[u8]) -> Result<Self::Element>;
}

/// Reconstruct a received element and require group membership
///
/// Both failure modes are reported as [`Error::CheatAttempt`] naming `field`,
/// since a peer that sends either one is not following the protocol.
pub fn reconstruct_member<G: DlogGroup>(group: &G, field: &str, bytes: &[u8]) -> Result<G::Element> {
    let element = group.element_from_bytes(false, bytes).map_err(|e| {
        Error::CheatAttempt(format!(
            "{field} is not a valid {} element encoding ({e})",
            group.name()
        ))
    })?;

    if !group.is_member(&element) {
        return Err(Error::CheatAttempt(format!(
            "{field} element is not a member of the {} group",
            group.name()
        )));
    }

    Ok(element)
}

/// Left-pad a big-endian integer to `len` bytes
pub(crate) fn to_fixed_be(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; len.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    out
}
