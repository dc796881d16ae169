//! Protocol parameters shared by the prover and the verifier.

/// Size of the Fiat-Shamir challenge in bits.
pub const CHAL_BITS: u64 = 128;

/// Size of the prime `ell` in bits.
///
/// Provers only accept an `ell` of exactly this size; verifiers accept
/// anything not larger.
pub const ELL_BITS: u64 = 136;

/// Width of the window `[ell0, ell0 + ELLDIFF_MAX]` searched for `ell`.
pub const ELLDIFF_MAX: u64 = 512;

/// Default upper bound on the signer's RSA modulus, in bits.
///
/// The modulus is an exponent of `C1`, so it sizes the middle comb tier.
pub const EXP_BITS: usize = 2048;

/// Smallest RSA modulus accepted from a signer.
pub const MIN_RSA_BITS: u64 = 1024;

/// Largest value `exp_bits` may take.
pub const MAX_RSA_BITS: usize = 4096;

/// Default generators of the group.
pub const DEFAULT_G: u32 = 2;
pub const DEFAULT_H: u32 = 3;

/// Table ceiling for a single comb.
pub const MAX_COMB_SIZE: usize = 512;

/// Extra bits in every blinding factor beyond `bits(witness) + CHAL_BITS`.
pub const BLIND_SLACK_BITS: u64 = 128;

/// Size of the commitment seed `s_prime` in bytes.
pub const SEED_SIZE: usize = 32;

/// Exclusive bound on the small prime `t`.
pub const MAX_T: u64 = 1000;

/// Challenges tried before signing gives up.
pub const MAX_SIGN_ATTEMPTS: usize = 64;

/// Encoded width of `t` in bytes.
pub const T_SIZE: usize = 2;

/// Encoded width of `chal` in bytes.
pub const CHAL_SIZE: usize = (CHAL_BITS as usize).div_ceil(8);

/// Encoded width of `ell` and of every response remainder in bytes.
pub const ELL_SIZE: usize = (ELL_BITS as usize).div_ceil(8);

/// Domain tag of the Fiat-Shamir transcript.
pub(crate) const TRANSCRIPT_TAG: &[u8] = b"goosig/transcript/v1";

/// Domain tag of the per-signature DRBG seed.
pub(crate) const SIGNING_TAG: &[u8] = b"goosig/signing/v1";
