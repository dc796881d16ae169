//! Error types for the Goo signature scheme.

use gouo::GroupError;
use thiserror::Error;

/// Errors returned by construction and signing.
///
/// Verification never returns an error; see [`crate::Goo::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GooError {
    /// The RSA key is malformed: a factor is not prime, the factors coincide,
    /// or the modulus is below the minimum size.
    #[error("invalid RSA key: {0}")]
    InvalidKey(&'static str),

    /// The RSA modulus is larger than the configured `exp_bits`.
    #[error("RSA modulus of {bits} bits exceeds the {max} bit limit")]
    KeyTooLarge { bits: u64, max: usize },

    /// A supplied `C1` does not match the one derived from the seed and key.
    #[error("commitment does not match seed and key")]
    CommitmentMismatch,

    /// No prime below the bound is a square modulo both factors.
    #[error("no small prime is a quadratic residue modulo both factors")]
    NoQuadraticResidue,

    /// Every challenge tried produced an `ell` of the wrong size.
    #[error("no admissible challenge after {0} attempts")]
    NoAdmissibleChallenge(usize),

    /// Bytes could not be decoded.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// The configuration fails its own bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error(transparent)]
    Group(#[from] GroupError),
}

impl From<bincode::Error> for GooError {
    fn from(err: bincode::Error) -> Self {
        GooError::InvalidEncoding(err.to_string())
    }
}

/// Reasons a signature is rejected.
///
/// Only reported through `tracing`; the public verifier answers `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum VerifyError {
    #[error("malformed signature: {0}")]
    BadEncoding(String),

    #[error("{0} out of range")]
    OutOfRange(&'static str),

    #[error("{0} is not a canonical group element")]
    NonCanonical(&'static str),

    #[error("challenge mismatch")]
    ChallengeMismatch,

    #[error("ell outside its window")]
    EllOutOfWindow,

    #[error("ell is composite")]
    CompositeEll,

    #[error(transparent)]
    Group(#[from] GroupError),
}
