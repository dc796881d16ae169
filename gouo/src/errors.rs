//! Error types for group construction and arithmetic.

use thiserror::Error;

/// Errors raised by the integer kernel and the group of unknown order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// The group modulus is even, too small or too large.
    ///
    /// Raised at construction time only; the group cannot be used.
    #[error("invalid group modulus: {0}")]
    InvalidModulus(&'static str),

    /// A generator is not in the range `(1, n/2]` or both generators coincide.
    #[error("invalid generator")]
    InvalidGenerator,

    /// No comb layout covers the requested exponent size within the table ceiling.
    #[error("no comb layout for {bits}-bit exponents within {max_size} entries")]
    NoCombSpec { bits: usize, max_size: usize },

    /// An exponent exceeds the capacity of every precomputed comb.
    #[error("exponent of {bits} bits exceeds comb capacity of {capacity} bits")]
    ExponentTooLarge { bits: u64, capacity: u64 },

    /// A value shares a factor with the modulus.
    #[error("value is not invertible")]
    NotInvertible,

    /// The Jacobi symbol rules out a square root.
    #[error("value is not a quadratic residue")]
    NotResidue,

    /// The Jacobi symbol is only defined for odd positive moduli.
    #[error("jacobi symbol requires an odd positive modulus")]
    InvalidJacobiModulus,

    /// A value does not fit the requested fixed-width encoding.
    #[error("value of {len} bytes does not fit in {width} bytes")]
    ValueTooLarge { len: usize, width: usize },
}
