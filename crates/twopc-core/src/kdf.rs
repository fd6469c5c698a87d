//! Key-derivation capability
//!
//! Stretches or compresses a seed (usually a serialized group element) into a
//! pseudorandom string of caller-chosen length.

use crate::{Error, Result};
use digest::Digest;
use hkdf::Hkdf;
use sha2::Sha256;
use std::marker::PhantomData;

/// Deterministic key derivation
pub trait Kdf: Send + Sync {
    /// Derive `out_len` bytes from `seed`
    fn derive(&self, seed: &[u8], out_len: usize) -> Result<Vec<u8>>;

    /// Longest output `derive` can produce, `None` if unbounded
    fn max_output_len(&self) -> Option<usize> {
        None
    }

    /// Fail with [`Error::InvalidInput`] if `out_len` is beyond [`Kdf::max_output_len`]
    fn check_output_len(&self, out_len: usize) -> Result<()> {
        match self.max_output_len() {
            Some(max) if out_len > max => Err(Error::InvalidInput(format!(
                "KDF output is limited to {max} bytes, requested {out_len}"
            ))),
            _ => Ok(()),
        }
    }
}

/// HKDF with HMAC-SHA-256, no salt
#[derive(Debug, Clone, Default)]
pub struct HkdfSha256 {
    info: Vec<u8>,
}

impl HkdfSha256 {
    /// Largest output HKDF-SHA-256 can produce
    pub const MAX_OUTPUT_LEN: usize = 255 * 32;

    /// HKDF with an empty info string
    pub fn new() -> Self {
        Self::default()
    }

    /// HKDF bound to a context string
    pub fn with_info(info: impl Into<Vec<u8>>) -> Self {
        Self { info: info.into() }
    }
}

impl Kdf for HkdfSha256 {
    fn derive(&self, seed: &[u8], out_len: usize) -> Result<Vec<u8>> {
        let hk = Hkdf::<Sha256>::new(None, seed);
        let mut okm = vec![0u8; out_len];
        hk.expand(&self.info, &mut okm).map_err(|_| {
            Error::InvalidInput(format!(
                "HKDF-SHA-256 output is limited to {} bytes, requested {out_len}",
                Self::MAX_OUTPUT_LEN
            ))
        })?;
        Ok(okm)
    }

    fn max_output_len(&self) -> Option<usize> {
        Some(Self::MAX_OUTPUT_LEN)
    }
}

/// ISO 18033-2 KDF1: `H(seed || 0) || H(seed || 1) || ...`, 32-bit big-endian counter
#[derive(Debug, Clone, Copy)]
pub struct Kdf1<D> {
    _digest: PhantomData<D>,
}

impl<D> Kdf1<D> {
    /// Create a KDF1 instance over the digest `D`
    pub fn new() -> Self {
        Self {
            _digest: PhantomData,
        }
    }
}

impl<D> Default for Kdf1<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest + Send + Sync> Kdf for Kdf1<D> {
    fn derive(&self, seed: &[u8], out_len: usize) -> Result<Vec<u8>> {
        let block_len = <D as Digest>::output_size();
        let blocks = out_len.div_ceil(block_len);
        if blocks > u32::MAX as usize {
            return Err(Error::InvalidInput(format!(
                "KDF1 output of {out_len} bytes exceeds the counter range"
            )));
        }

        let mut out = Vec::with_capacity(blocks * block_len);
        for counter in 0..blocks as u32 {
            let mut hasher = D::new();
            hasher.update(seed);
            hasher.update(counter.to_be_bytes());
            out.extend_from_slice(&hasher.finalize());
        }
        out.truncate(out_len);
        Ok(out)
    }

    fn max_output_len(&self) -> Option<usize> {
        Some((u32::MAX as usize).saturating_mul(<D as Digest>::output_size()))
    }
}

/// XOR `pad` into `data` byte by byte
pub(crate) fn xor_in_place(data: &mut [u8], pad: &[u8]) {
    for (byte, mask) in data.iter_mut().zip(pad) {
        *byte ^= mask;
    }
}
