//! Construction-time parameters of a [`crate::Goo`] instance.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_G, DEFAULT_H, EXP_BITS, MAX_COMB_SIZE, MAX_RSA_BITS, MIN_RSA_BITS};
use crate::errors::GooError;

/// Smallest table that still holds one row combination per pair of rows.
const MIN_COMB_SIZE: usize = 3;

/// Public parameters chosen alongside the group modulus.
///
/// Both parties must use the same values: the generators enter the
/// transcript and `exp_bits` fixes the signature width.
///
/// # Example
///
/// ```
/// use goosig::GooConfig;
///
/// let config = GooConfig { exp_bits: 4096, ..GooConfig::default() };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GooConfig {
    /// First generator.
    pub g: u32,
    /// Second generator.
    pub h: u32,
    /// Largest signer RSA modulus, in bits.
    pub exp_bits: usize,
    /// Table ceiling for a single comb.
    pub max_comb_size: usize,
}

impl Default for GooConfig {
    fn default() -> Self {
        GooConfig {
            g: DEFAULT_G,
            h: DEFAULT_H,
            exp_bits: EXP_BITS,
            max_comb_size: MAX_COMB_SIZE,
        }
    }
}

impl GooConfig {
    /// Check the parameters that do not depend on the group modulus.
    pub fn validate(&self) -> Result<(), GooError> {
        if self.g < 2 || self.h < 2 {
            return Err(GooError::InvalidConfig("generators must exceed 1"));
        }
        if self.g == self.h {
            return Err(GooError::InvalidConfig("generators must differ"));
        }
        if (self.exp_bits as u64) < MIN_RSA_BITS || self.exp_bits > MAX_RSA_BITS {
            return Err(GooError::InvalidConfig("exp_bits out of range"));
        }
        if self.max_comb_size < MIN_COMB_SIZE {
            return Err(GooError::InvalidConfig("max_comb_size too small"));
        }
        Ok(())
    }
}
