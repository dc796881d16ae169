//! Minimal RSA key containers.
//!
//! Goo signatures prove knowledge of the factorization of an RSA modulus;
//! only the modulus, its factors and the public exponent are needed.
//! Standard key formats are left to dedicated crates. The containers here
//! serialize with `serde`, and `bincode` is the supported binary encoding.

use gouo::PrimeOracle;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_RSA_BITS;
use crate::errors::GooError;

/// Seed for the Miller-Rabin bases used when checking key factors.
const KEY_CHECK_SEED: &[u8] = b"goosig/key-check";

/// The public half of an RSA key.
///
/// # Example
///
/// ```
/// use goosig::RsaPublicKey;
/// use num_bigint::BigUint;
///
/// let key = RsaPublicKey::new(BigUint::from(3233u32), BigUint::from(17u32));
/// let bytes = key.to_bytes().expect("encode");
/// assert_eq!(RsaPublicKey::from_bytes(&bytes).expect("decode"), key);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicKey {
    /// The modulus `n = p * q`.
    pub n: BigUint,
    /// The public exponent.
    pub e: BigUint,
}

/// An RSA private key given by its two prime factors.
///
/// `Debug` prints the modulus size only.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPrivateKey {
    pub p: BigUint,
    pub q: BigUint,
    pub e: BigUint,
}

impl RsaPublicKey {
    pub fn new(n: BigUint, e: BigUint) -> Self {
        RsaPublicKey { n, e }
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GooError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GooError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl RsaPrivateKey {
    pub fn new(p: BigUint, q: BigUint, e: BigUint) -> Self {
        RsaPrivateKey { p, q, e }
    }

    /// The modulus `p * q`.
    pub fn modulus(&self) -> BigUint {
        &self.p * &self.q
    }

    /// Derives the matching public key.
    pub fn public(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.modulus(),
            e: self.e.clone(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GooError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GooError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Checks that the key can sign: distinct odd prime factors and a
    /// modulus between `MIN_RSA_BITS` and `max_bits`.
    ///
    /// # Returns
    ///
    /// The modulus on success, so callers do not multiply twice.
    pub(crate) fn check(&self, oracle: &PrimeOracle, max_bits: usize) -> Result<BigUint, GooError> {
        if self.p == self.q {
            return Err(GooError::InvalidKey("factors are equal"));
        }

        let n = self.modulus();
        let bits = n.bits();
        if bits < MIN_RSA_BITS {
            return Err(GooError::InvalidKey("modulus too small"));
        }
        if bits > max_bits as u64 {
            return Err(GooError::KeyTooLarge { bits, max: max_bits });
        }

        for factor in [&self.p, &self.q] {
            if !factor.bit(0) || !oracle.is_prime(factor, KEY_CHECK_SEED) {
                return Err(GooError::InvalidKey("factor is not an odd prime"));
            }
        }

        Ok(n)
    }
}

impl core::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("bits", &self.modulus().bits())
            .finish_non_exhaustive()
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(key: &RsaPrivateKey) -> Self {
        key.public()
    }
}
