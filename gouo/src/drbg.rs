//! Deterministic random bit generator.
//!
//! HMAC-DRBG over SHA-256 (the SP 800-90A construction without reseeding or
//! personalization). Every value the prover and verifier "sample" is drawn
//! from an instance seeded by a hash, so both sides reproduce it exactly.

use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{RngCore, SeedableRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const OUT_LEN: usize = 32;
const BLOCK_BITS: u64 = 256;

/// HMAC-SHA256 deterministic generator.
///
/// [`Drbg::random_bits`] reads from a bit buffer refilled one 256-bit block
/// at a time, so consecutive calls consume one continuous stream. Byte
/// output ([`Drbg::generate`] and the `RngCore` methods) bypasses the buffer.
#[derive(Clone)]
pub struct Drbg {
    k: [u8; OUT_LEN],
    v: [u8; OUT_LEN],
    saved: BigUint,
    saved_bits: u64,
}

impl Drbg {
    /// Instantiate from arbitrary entropy (typically a transcript digest).
    pub fn new(entropy: &[u8]) -> Self {
        let mut drbg = Drbg {
            k: [0x00; OUT_LEN],
            v: [0x01; OUT_LEN],
            saved: BigUint::zero(),
            saved_bits: 0,
        };
        drbg.update(Some(entropy));
        drbg
    }

    fn hmac(key: &[u8], parts: &[&[u8]]) -> [u8; OUT_LEN] {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
        for part in parts {
            mac.update(part);
        }
        let mut out = [0u8; OUT_LEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }

    fn update(&mut self, data: Option<&[u8]>) {
        let extra = data.unwrap_or(&[]);
        self.k = Self::hmac(&self.k, &[&self.v, &[0x00], extra]);
        self.v = Self::hmac(&self.k, &[&self.v]);

        if let Some(data) = data {
            self.k = Self::hmac(&self.k, &[&self.v, &[0x01], data]);
            self.v = Self::hmac(&self.k, &[&self.v]);
        }
    }

    /// Fill `out` with generator output, then advance the state.
    pub fn generate(&mut self, out: &mut [u8]) {
        for chunk in out.chunks_mut(OUT_LEN) {
            self.v = Self::hmac(&self.k, &[&self.v]);
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }
        self.update(None);
    }

    /// The next `bits` bits of the stream, most significant first.
    pub fn random_bits(&mut self, bits: u64) -> BigUint {
        while self.saved_bits < bits {
            let mut block = [0u8; OUT_LEN];
            self.generate(&mut block);
            self.saved = (&self.saved << BLOCK_BITS) | BigUint::from_bytes_be(&block);
            self.saved_bits += BLOCK_BITS;
        }

        let left = self.saved_bits - bits;
        let out = &self.saved >> left;
        self.saved &= (BigUint::one() << left) - 1u32;
        self.saved_bits = left;
        out
    }

    /// Uniform value in `[0, bound)` by rejection sampling.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    pub fn random_below(&mut self, bound: &BigUint) -> BigUint {
        assert!(!bound.is_zero(), "bound must be positive");
        let bits = bound.bits();
        loop {
            let x = self.random_bits(bits);
            if &x < bound {
                return x;
            }
        }
    }
}

impl core::fmt::Debug for Drbg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Drbg").finish_non_exhaustive()
    }
}

impl RngCore for Drbg {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.generate(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.generate(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.generate(dst);
    }
}

impl SeedableRng for Drbg {
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        Drbg::new(&seed)
    }
}
