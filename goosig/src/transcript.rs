//! Fiat-Shamir transcript.
//!
//! Items are absorbed into SHA-256 as `sign || len || magnitude` with a
//! one-byte sign (`0` non-negative, `1` negative) and a four-byte big-endian
//! length, so distinct item sequences never share an encoding.

use gouo::Drbg;
use num_bigint::{BigInt, BigUint, Sign};
use sha2::{Digest, Sha256};

use crate::constants::{CHAL_BITS, ELL_BITS, TRANSCRIPT_TAG};

pub(crate) type TranscriptDigest = [u8; 32];

pub(crate) struct Transcript {
    hasher: Sha256,
}

impl Transcript {
    pub(crate) fn new() -> Self {
        let mut transcript = Transcript {
            hasher: Sha256::new(),
        };
        transcript.append_bytes(TRANSCRIPT_TAG);
        transcript
    }

    fn append_raw(&mut self, negative: bool, bytes: &[u8]) {
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        self.hasher.update([negative as u8]);
        self.hasher.update(len.to_be_bytes());
        self.hasher.update(bytes);
    }

    pub(crate) fn append_bytes(&mut self, bytes: &[u8]) {
        self.append_raw(false, bytes);
    }

    pub(crate) fn append_uint(&mut self, x: &BigUint) {
        if x.bits() == 0 {
            self.append_raw(false, &[]);
        } else {
            self.append_raw(false, &x.to_bytes_be());
        }
    }

    pub(crate) fn append_int(&mut self, x: &BigInt) {
        match x.sign() {
            Sign::NoSign => self.append_raw(false, &[]),
            sign => self.append_raw(sign == Sign::Minus, &x.magnitude().to_bytes_be()),
        }
    }

    pub(crate) fn finish(self) -> TranscriptDigest {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.hasher.finalize());
        out
    }
}

/// `(chal, ell0)` drawn in that order from a DRBG keyed by the digest.
pub(crate) fn challenge(digest: &TranscriptDigest) -> (BigUint, BigUint) {
    let mut drbg = Drbg::new(digest);
    let chal = drbg.random_bits(CHAL_BITS);
    let ell0 = drbg.random_bits(ELL_BITS);
    (chal, ell0)
}
