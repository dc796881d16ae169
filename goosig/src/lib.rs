//! Goo signatures: proving ownership of an RSA key in a group of unknown order.
//!
//! A signer commits to its RSA modulus `n` as `C1 = g^n * h^s` in the RSA
//! group of a public modulus `N` nobody can factor. A signature is a
//! non-interactive zero-knowledge proof that the committed `n` is a product
//! of primes the signer knows, bound to a message through Fiat-Shamir.
//!
//! The responses are reduced modulo a transcript-derived 136-bit prime `ell`
//! and the quotients are committed to in the group, which keeps signatures
//! short while the verifier reconstructs the prover's first message.
//!
//! # Example
//!
//! ```no_run
//! use goosig::{Goo, GooConfig, RsaPrivateKey};
//! use num_bigint::BigUint;
//!
//! # fn run(modulus: BigUint, key: RsaPrivateKey) -> Result<(), goosig::GooError> {
//! let goo = Goo::new(modulus, &GooConfig::default())?;
//!
//! // The signer picks a seed and publishes the commitment.
//! let seed = Goo::generate();
//! let c1 = goo.challenge(&seed, &key.public())?;
//! assert!(goo.validate(&seed, &c1, &key));
//!
//! // Sign and verify.
//! let sig = goo.sign(b"hello goo", &seed, &key)?;
//! let bytes = sig.encode(&goo.signature_layout())?;
//! assert!(goo.verify(b"hello goo", &bytes, &c1));
//! # Ok(())
//! # }
//! ```
//!
//! # Security Considerations
//!
//! - The group modulus must come from a setup in which nobody learned its factors
//! - The seed is secret; whoever holds it can link `C1` to the public key
//! - Signing is deterministic in `(seed, key, msg)`

mod config;
pub mod constants;
mod errors;
mod goo;
mod keys;
mod signatures;
mod transcript;


pub use config::GooConfig;
pub use errors::GooError;
pub use goo::Goo;
pub use keys::{RsaPrivateKey, RsaPublicKey};
pub use signatures::{Signature, SignatureLayout};
