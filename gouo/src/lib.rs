//! Arithmetic in an RSA group of unknown order.
//!
//! The group is `(Z/NZ)* / {1, -1}` for a public modulus `N` whose
//! factorization is unknown. This crate provides the integer helpers, a
//! seeded primality oracle, an HMAC-DRBG, fixed-base comb tables for the two
//! public generators and windowed-NAF exponentiation for everything else.
//!
//! # Example
//!
//! ```no_run
//! use gouo::{GroupOps, RsaGroup};
//! use num_bigint::BigUint;
//!
//! # fn run(n: BigUint) -> Result<(), gouo::GroupError> {
//! let group = RsaGroup::new(n, BigUint::from(2u32), BigUint::from(3u32), &[136, 2048], 512)?;
//! let x = group.reduce(&group.powgh(&BigUint::from(5u32), &BigUint::from(7u32))?);
//! assert!(group.is_reduced(&x));
//! # Ok(())
//! # }
//! ```

pub mod bigint;
mod comb;
mod drbg;
mod errors;
mod group;
mod primes;
mod wnaf;

pub use comb::{Comb, CombSpec};
pub use drbg::Drbg;
pub use errors::GroupError;
pub use group::{GroupOps, RsaGroup, MAX_MODULUS_BITS, MIN_MODULUS_BITS};
pub use primes::{PrimeOracle, MILLER_RABIN_ROUNDS, SMALL_PRIME_COUNT};
pub use wnaf::{wnaf, WINDOW_SIZE};
