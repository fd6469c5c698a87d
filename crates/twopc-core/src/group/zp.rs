//! Prime-order subgroup of `Z_p^*` for a safe prime `p = 2q + 1`

use super::{to_fixed_be, DlogGroup};
use crate::{Error, Result};
use num_bigint::{BigUint, RandBigInt};
use rand_core::{CryptoRng, RngCore};

/// RFC 3526 2048-bit MODP group prime (group 14), generator 2
const RFC3526_2048_P: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1",
    "29024E088A67CC74020BBEA63B139B22514A08798E3404DD",
    "EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245",
    "E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D",
    "C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F",
    "83655D23DCA3AD961C62F356208552BB9ED529077096966D",
    "670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9",
    "DE2BCBF6955817183995497CEA956AE515D2261898FA0510",
    "15728E5A8AACAA68FFFFFFFFFFFFFFFF",
);

/// Element of `Z_p^*`
///
/// A decoded element is only a residue modulo `p`; use
/// [`DlogGroup::is_member`] to check that it lies in the order-`q` subgroup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZpElement(BigUint);

impl ZpElement {
    /// The residue as an integer
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

/// Quadratic-residue subgroup of `Z_p^*`, of prime order `q = (p - 1) / 2`
#[derive(Debug, Clone)]
pub struct ZpSafePrimeGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
    element_len: usize,
    exponent_len: usize,
}

impl ZpSafePrimeGroup {
    /// Create a group from a safe prime `p` and a generator `g` of the order-`q` subgroup
    ///
    /// The primality of `p` and `q` is the caller's responsibility; the shape of
    /// the parameters and the order of `g` are checked.
    pub fn new(p: BigUint, g: BigUint) -> Result<Self> {
        let one = BigUint::from(1u32);
        let four = BigUint::from(4u32);

        if p <= BigUint::from(5u32) || &p % &four != BigUint::from(3u32) {
            return Err(Error::InvalidInput(
                "p must be a safe prime greater than 5".into(),
            ));
        }

        let q = (&p - &one) >> 1;
        if g <= one || g >= p || g.modpow(&q, &p) != one {
            return Err(Error::InvalidInput(
                "g must generate the order-q subgroup of Z_p^*".into(),
            ));
        }

        Ok(Self::from_parts(p, q, g))
    }

    /// The RFC 3526 2048-bit MODP group
    pub fn rfc3526_2048() -> Self {
        let p = BigUint::parse_bytes(RFC3526_2048_P.as_bytes(), 16)
            .expect("RFC 3526 prime is valid hex");
        let q = (&p - 1u32) >> 1;
        Self::from_parts(p, q, BigUint::from(2u32))
    }

    fn from_parts(p: BigUint, q: BigUint, g: BigUint) -> Self {
        let element_len = ((p.bits() + 7) / 8) as usize;
        let exponent_len = ((q.bits() + 7) / 8) as usize;
        Self {
            p,
            q,
            g,
            element_len,
            exponent_len,
        }
    }

    /// Modulus `p`
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }
}

impl DlogGroup for ZpSafePrimeGroup {
    type Element = ZpElement;
    type Exponent = BigUint;

    fn name(&self) -> &'static str {
        "zp-safe-prime"
    }

    fn order(&self) -> BigUint {
        self.q.clone()
    }

    fn generator(&self) -> ZpElement {
        ZpElement(self.g.clone())
    }

    fn is_member(&self, element: &ZpElement) -> bool {
        let one = BigUint::from(1u32);
        element.0 > one && element.0 < self.p && element.0.modpow(&self.q, &self.p) == one
    }

    fn exponentiate(&self, base: &ZpElement, exponent: &BigUint) -> ZpElement {
        ZpElement(base.0.modpow(exponent, &self.p))
    }

    fn multiply(&self, a: &ZpElement, b: &ZpElement) -> ZpElement {
        ZpElement((&a.0 * &b.0) % &self.p)
    }

    fn random_exponent<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_range(&BigUint::from(1u32), &self.q)
    }

    fn invert_exponent(&self, exponent: &BigUint) -> BigUint {
        (&self.q - (exponent % &self.q)) % &self.q
    }

    fn add_exponents(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.q
    }

    fn multiply_exponents(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.q
    }

    fn exponent_to_bytes(&self, exponent: &BigUint) -> Vec<u8> {
        to_fixed_be(exponent, self.exponent_len)
    }

    fn exponent_from_bytes(&self, bytes: &[u8]) -> Result<BigUint> {
        if bytes.len() != self.exponent_len {
            return Err(Error::ProtocolFormat("Invalid exponent length".into()));
        }
        let value = BigUint::from_bytes_be(bytes);
        if value >= self.q {
            return Err(Error::ProtocolFormat(
                "Exponent is not reduced modulo the order".into(),
            ));
        }
        Ok(value)
    }

    fn exponent_from_uniform_bytes(&self, bytes: &[u8; 64]) -> BigUint {
        BigUint::from_bytes_be(bytes) % &self.q
    }

    fn element_to_bytes(&self, element: &ZpElement) -> Vec<u8> {
        to_fixed_be(&element.0, self.element_len)
    }

    fn element_from_bytes(&self, validate: bool, bytes: &[u8]) -> Result<ZpElement> {
        if bytes.len() != self.element_len {
            return Err(Error::ProtocolFormat(format!(
                "Expected a {}-byte element, got {} bytes",
                self.element_len,
                bytes.len()
            )));
        }
        let element = ZpElement(BigUint::from_bytes_be(bytes));

        if validate && !self.is_member(&element) {
            return Err(Error::CheatAttempt(
                "Element is not a member of the order-q subgroup".into(),
            ));
        }

        Ok(element)
    }
}
