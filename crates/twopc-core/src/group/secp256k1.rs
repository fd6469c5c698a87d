//! secp256k1 as a discrete-log group

use super::DlogGroup;
use crate::{Error, Result};
use k256::{
    elliptic_curve::{
        bigint::U256,
        group::Group,
        ops::Reduce,
        sec1::{FromEncodedPoint, ToEncodedPoint},
        Field, PrimeField,
    },
    AffinePoint, EncodedPoint, ProjectivePoint, Scalar,
};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

const ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// The secp256k1 curve group with SEC1 compressed point encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Group;

impl Secp256k1Group {
    /// Create the group handle
    pub fn new() -> Self {
        Self
    }
}

impl DlogGroup for Secp256k1Group {
    type Element = ProjectivePoint;
    type Exponent = Scalar;

    fn name(&self) -> &'static str {
        "secp256k1"
    }

    fn order(&self) -> BigUint {
        BigUint::from_bytes_be(&ORDER)
    }

    fn generator(&self) -> ProjectivePoint {
        ProjectivePoint::GENERATOR
    }

    fn is_member(&self, element: &ProjectivePoint) -> bool {
        // Points reconstructed through `element_from_bytes` are always on the
        // curve, and the curve has prime order.
        !bool::from(element.is_identity())
    }

    fn exponentiate(&self, base: &ProjectivePoint, exponent: &Scalar) -> ProjectivePoint {
        *base * *exponent
    }

    fn multiply(&self, a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
        *a + *b
    }

    fn random_exponent<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Scalar {
        loop {
            let scalar = Scalar::random(&mut *rng);
            if !bool::from(scalar.is_zero()) {
                return scalar;
            }
        }
    }

    fn invert_exponent(&self, exponent: &Scalar) -> Scalar {
        -*exponent
    }

    fn add_exponents(&self, a: &Scalar, b: &Scalar) -> Scalar {
        *a + *b
    }

    fn multiply_exponents(&self, a: &Scalar, b: &Scalar) -> Scalar {
        *a * *b
    }

    fn exponent_to_bytes(&self, exponent: &Scalar) -> Vec<u8> {
        exponent.to_bytes().to_vec()
    }

    fn exponent_from_bytes(&self, bytes: &[u8]) -> Result<Scalar> {
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::ProtocolFormat("Invalid scalar length".into()))?;
        Option::<Scalar>::from(Scalar::from_repr(array.into()))
            .ok_or_else(|| Error::ProtocolFormat("Scalar is not reduced modulo the order".into()))
    }

    fn exponent_from_uniform_bytes(&self, bytes: &[u8; 64]) -> Scalar {
        // The order is within 2^-128 of 2^256, so reducing 32 bytes is enough.
        let mut array = [0u8; 32];
        array.copy_from_slice(&bytes[..32]);
        <Scalar as Reduce<U256>>::reduce_bytes(&array.into())
    }

    fn element_to_bytes(&self, element: &ProjectivePoint) -> Vec<u8> {
        element.to_affine().to_encoded_point(true).as_bytes().to_vec()
    }

    fn element_from_bytes(&self, validate: bool, bytes: &[u8]) -> Result<ProjectivePoint> {
        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|e| Error::ProtocolFormat(format!("Invalid SEC1 encoding: {e}")))?;
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or_else(|| Error::ProtocolFormat("Point is not on secp256k1".into()))?;
        let point = ProjectivePoint::from(affine);

        if validate && !self.is_member(&point) {
            return Err(Error::CheatAttempt(
                "Element is not a member of the secp256k1 group".into(),
            ));
        }

        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_scalar_field() {
        let group = Secp256k1Group::new();
        let minus_one = group.invert_exponent(&Scalar::ONE);
        let expected = group.order() - 1u32;
        assert_eq!(BigUint::from_bytes_be(&minus_one.to_bytes()), expected);
    }

    #[test]
    fn test_rejects_point_off_curve() {
        let group = Secp256k1Group::new();
        let mut bytes = group.element_to_bytes(&ProjectivePoint::GENERATOR);
        // x = 5 has no square root on secp256k1 (y^2 = 132 is a non-residue)
        bytes[1..].fill(0);
        bytes[32] = 5;
        assert!(group.element_from_bytes(false, &bytes).is_err());
    }

    #[test]
    fn test_validated_decode_rejects_identity() {
        let group = Secp256k1Group::new();
        let identity = group.element_to_bytes(&ProjectivePoint::IDENTITY);
        assert!(group.element_from_bytes(true, &identity).is_err());
    }
}
