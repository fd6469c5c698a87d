//! Ristretto255 as a discrete-log group

use super::DlogGroup;
use crate::{Error, Result};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::Identity,
};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// l = 2^252 + 27742317777372353535851937790883648493
const ORDER: [u8; 32] = [
    0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x14, 0xde, 0xf9, 0xde, 0xa2, 0xf7, 0x9c, 0xd6, 0x58, 0x12, 0x63, 0x1a, 0x5c, 0xf5, 0xd3, 0xed,
];

/// The Ristretto prime-order group over Curve25519
#[derive(Debug, Clone, Copy, Default)]
pub struct RistrettoGroup;

impl RistrettoGroup {
    /// Create the group handle
    pub fn new() -> Self {
        Self
    }
}

impl DlogGroup for RistrettoGroup {
    type Element = RistrettoPoint;
    type Exponent = Scalar;

    fn name(&self) -> &'static str {
        "ristretto255"
    }

    fn order(&self) -> BigUint {
        BigUint::from_bytes_be(&ORDER)
    }

    fn generator(&self) -> RistrettoPoint {
        RISTRETTO_BASEPOINT_POINT
    }

    fn is_member(&self, element: &RistrettoPoint) -> bool {
        *element != RistrettoPoint::identity()
    }

    fn exponentiate(&self, base: &RistrettoPoint, exponent: &Scalar) -> RistrettoPoint {
        base * exponent
    }

    fn multiply(&self, a: &RistrettoPoint, b: &RistrettoPoint) -> RistrettoPoint {
        a + b
    }

    fn random_exponent<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Scalar {
        let mut wide = Zeroizing::new([0u8; 64]);
        loop {
            rng.fill_bytes(&mut wide[..]);
            let scalar = Scalar::from_bytes_mod_order_wide(&wide);
            if scalar != Scalar::ZERO {
                return scalar;
            }
        }
    }

    fn invert_exponent(&self, exponent: &Scalar) -> Scalar {
        -exponent
    }

    fn add_exponents(&self, a: &Scalar, b: &Scalar) -> Scalar {
        a + b
    }

    fn multiply_exponents(&self, a: &Scalar, b: &Scalar) -> Scalar {
        a * b
    }

    fn exponent_to_bytes(&self, exponent: &Scalar) -> Vec<u8> {
        exponent.to_bytes().to_vec()
    }

    fn exponent_from_bytes(&self, bytes: &[u8]) -> Result<Scalar> {
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::ProtocolFormat("Invalid scalar length".into()))?;
        Option::<Scalar>::from(Scalar::from_canonical_bytes(array))
            .ok_or_else(|| Error::ProtocolFormat("Scalar is not canonical".into()))
    }

    fn exponent_from_uniform_bytes(&self, bytes: &[u8; 64]) -> Scalar {
        Scalar::from_bytes_mod_order_wide(bytes)
    }

    fn element_to_bytes(&self, element: &RistrettoPoint) -> Vec<u8> {
        element.compress().to_bytes().to_vec()
    }

    fn element_from_bytes(&self, validate: bool, bytes: &[u8]) -> Result<RistrettoPoint> {
        let compressed = CompressedRistretto::from_slice(bytes)
            .map_err(|_| Error::ProtocolFormat("Invalid Ristretto encoding length".into()))?;
        let point = compressed
            .decompress()
            .ok_or_else(|| Error::ProtocolFormat("Invalid Ristretto encoding".into()))?;

        if validate && !self.is_member(&point) {
            return Err(Error::CheatAttempt(
                "Element is not a member of the ristretto255 group".into(),
            ));
        }

        Ok(point)
    }
}
