//! Probabilistic primality testing.
//!
//! `PrimeOracle::is_prime` runs trial division against the first thousand
//! primes, seeded Miller-Rabin rounds (the last one with base 2) and a strong
//! Lucas test, i.e. the full Baillie-PSW combination. The Miller-Rabin bases
//! are derived from a caller supplied seed so that prover and verifier agree
//! on every decision.

use std::sync::OnceLock;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::bigint::{jacobi, modulo};
use crate::drbg::Drbg;

/// Number of primes kept for trial division.
pub const SMALL_PRIME_COUNT: usize = 1000;

/// The thousandth prime.
const SIEVE_LIMIT: usize = 7919;

/// Miller-Rabin rounds per candidate.
pub const MILLER_RABIN_ROUNDS: usize = 17;

/// Primality oracle with a lazily built table of small primes.
#[derive(Debug, Default)]
pub struct PrimeOracle {
    small: OnceLock<Vec<u32>>,
}

fn sieve(limit: usize) -> Vec<u32> {
    let mut composite = vec![false; limit + 1];
    let mut primes = Vec::with_capacity(SMALL_PRIME_COUNT);

    for i in 2..=limit {
        if composite[i] {
            continue;
        }
        primes.push(i as u32);
        let mut j = i * i;
        while j <= limit {
            composite[j] = true;
            j += i;
        }
    }

    primes
}

impl PrimeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first thousand primes in ascending order.
    pub fn small_primes(&self) -> &[u32] {
        self.small.get_or_init(|| sieve(SIEVE_LIMIT))
    }

    pub fn is_small_prime(&self, t: u64) -> bool {
        u32::try_from(t)
            .map(|t| self.small_primes().binary_search(&t).is_ok())
            .unwrap_or(false)
    }

    /// `Some(answer)` when trial division settles the question.
    fn trial_division(&self, n: &BigUint) -> Option<bool> {
        if let Some(v) = n.to_u64() {
            if v <= SIEVE_LIMIT as u64 {
                return Some(self.is_small_prime(v));
            }
        }

        for &p in self.small_primes() {
            if (n % p).is_zero() {
                return Some(false);
            }
        }

        None
    }

    /// Baillie-PSW style test with seeded Miller-Rabin bases.
    pub fn is_prime(&self, n: &BigUint, seed: &[u8]) -> bool {
        if n < &BigUint::from(2u32) {
            return false;
        }

        if let Some(answer) = self.trial_division(n) {
            return answer;
        }

        miller_rabin(n, seed, MILLER_RABIN_ROUNDS) && strong_lucas(n)
    }

    /// First prime in `[p, p + max_delta]`, scanning odd candidates upwards.
    pub fn next_prime(&self, p: &BigUint, seed: &[u8], max_delta: u64) -> Option<BigUint> {
        let two = BigUint::from(2u32);
        if p <= &two {
            return (&two - p <= BigUint::from(max_delta)).then_some(two);
        }

        let limit = p + max_delta;
        let mut q = if p.is_even() { p + 1u32 } else { p.clone() };

        while q <= limit {
            if self.is_prime(&q, seed) {
                trace!(delta = %(&q - p), "prime found");
                return Some(q);
            }
            q += 2u32;
        }

        trace!(max_delta, "no prime in window");
        None
    }
}

/// Miller-Rabin with `rounds` bases; the bases come from a DRBG keyed by
/// `SHA-256(seed || n)` and the final base is always 2.
///
/// Requires `n` odd and greater than 3.
fn miller_rabin(n: &BigUint, seed: &[u8], rounds: usize) -> bool {
    let n1 = n - 1u32;
    let s = n1.trailing_zeros().unwrap_or(0);
    let d = &n1 >> s;

    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(n.to_bytes_be());
    let mut rng = Drbg::new(&hasher.finalize());

    let span = n - 3u32;

    for round in 0..rounds {
        let a = if round + 1 == rounds {
            BigUint::from(2u32)
        } else {
            rng.random_below(&span) + 2u32
        };

        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n1 {
            continue;
        }

        let mut witness = true;
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n1 {
                witness = false;
                break;
            }
        }

        if witness {
            return false;
        }
    }

    true
}

/// Strong Lucas probable prime test with Selfridge's parameters (P = 1).
///
/// Requires `n` odd and greater than 3.
fn strong_lucas(n: &BigUint) -> bool {
    let root = n.sqrt();
    if &root * &root == *n {
        return false;
    }

    let n_signed = BigInt::from(n.clone());
    let mut d: i64 = 5;
    loop {
        let j = match jacobi(&BigInt::from(d), n) {
            Ok(j) => j,
            Err(_) => return false,
        };
        if j == -1 {
            break;
        }
        if j == 0 && BigInt::from(d.unsigned_abs()) != n_signed {
            return false;
        }
        d = if d > 0 { -(d + 2) } else { -(d - 2) };
    }

    let q = (1 - d) / 4;
    let dd = modulo(&BigInt::from(d), n);
    let qq = modulo(&BigInt::from(q), n);

    let np1 = n + 1u32;
    let s = np1.trailing_zeros().unwrap_or(0);
    let k = &np1 >> s;

    let two_n = n << 1u32;
    let half = |x: BigUint| if x.is_odd() { (x + n) >> 1u32 } else { x >> 1u32 };

    let mut u = BigUint::one();
    let mut v = BigUint::one();
    let mut qk = qq.clone();

    for bit in (0..k.bits() - 1).rev() {
        u = (&u * &v) % n;
        v = (&v * &v + &two_n - (&qk << 1u32)) % n;
        qk = (&qk * &qk) % n;

        if k.bit(bit) {
            let u2 = half((&u + &v) % n);
            let v2 = half((&dd * &u + &v) % n);
            u = u2;
            v = v2;
            qk = (&qk * &qq) % n;
        }
    }

    if u.is_zero() || v.is_zero() {
        return true;
    }

    for _ in 1..s {
        v = (&v * &v + &two_n - (&qk << 1u32)) % n;
        if v.is_zero() {
            return true;
        }
        qk = (&qk * &qk) % n;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SEED: &[u8] = b"primality";

    fn naive_is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut i = 2u64;
        while i * i <= n {
            if n % i == 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    #[test]
    fn test_small_prime_table() {
        let oracle = PrimeOracle::new();
        let primes = oracle.small_primes();
        assert_eq!(primes.len(), SMALL_PRIME_COUNT);
        assert_eq!(primes[0], 2);
        assert_eq!(primes[primes.len() - 1], 7919);
        assert!(oracle.is_small_prime(997));
        assert!(!oracle.is_small_prime(999));
        assert!(!oracle.is_small_prime(u64::MAX));
    }

    #[test]
    fn test_small_values_match_naive() {
        let oracle = PrimeOracle::new();
        for n in 0u64..20_000 {
            assert_eq!(
                oracle.is_prime(&BigUint::from(n), SEED),
                naive_is_prime(n),
                "n = {n}"
            );
        }
    }

    #[test]
    fn test_large_primes() {
        let oracle = PrimeOracle::new();
        let m127 = (BigUint::one() << 127u32) - 1u32;
        assert!(oracle.is_prime(&m127, SEED));

        let p = (BigUint::one() << 64u32) + 13u32;
        assert!(oracle.is_prime(&p, SEED));
        assert!(!oracle.is_prime(&(p + 2u32), SEED));
    }

    #[test]
    fn test_composites_past_trial_division() {
        let oracle = PrimeOracle::new();
        // 7927 * 7933
        assert!(!oracle.is_prime(&BigUint::from(62_884_891u64), SEED));
        // 8209 * 16417 is a strong pseudoprime to base 2.
        assert!(!oracle.is_prime(&BigUint::from(134_767_153u64), SEED));
        // Square of a prime beyond the table.
        assert!(!oracle.is_prime(&BigUint::from(7927u64 * 7927), SEED));
    }

    #[test]
    fn test_strong_lucas_pseudoprimes() {
        // Strong Lucas pseudoprimes pass the Lucas half on their own.
        for n in [5459u64, 5777, 10877, 16109, 18971] {
            assert!(strong_lucas(&BigUint::from(n)), "n = {n}");
        }
        for p in [7927u64, 7933, 104_729, 1_000_003] {
            assert!(strong_lucas(&BigUint::from(p)), "p = {p}");
        }
        assert!(!strong_lucas(&BigUint::from(62_884_891u64)));
    }

    #[test]
    fn test_next_prime_window() {
        let oracle = PrimeOracle::new();
        let p = BigUint::from(1u64 << 40);
        let q = oracle.next_prime(&p, SEED, 1000).expect("prime in window");
        assert!(q >= p);
        assert!(naive_is_prime(q.to_u64().expect("u64")));

        // 2^64 + 13 is the first prime above 2^64.
        let start = BigUint::one() << 64u32;
        assert_eq!(oracle.next_prime(&start, SEED, 12), None);
        assert_eq!(
            oracle.next_prime(&start, SEED, 13),
            Some(&start + 13u32)
        );
    }

    #[test]
    fn test_next_prime_tiny_inputs() {
        let oracle = PrimeOracle::new();
        assert_eq!(oracle.next_prime(&BigUint::zero(), SEED, 2), Some(BigUint::from(2u32)));
        assert_eq!(oracle.next_prime(&BigUint::zero(), SEED, 1), None);
        assert_eq!(oracle.next_prime(&BigUint::from(3u32), SEED, 0), Some(BigUint::from(3u32)));
        assert_eq!(oracle.next_prime(&BigUint::from(8u32), SEED, 3), Some(BigUint::from(11u32)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn next_prime_contract(p in 0u64..(1u64 << 24), max_delta in 0u64..600) {
            let oracle = PrimeOracle::new();
            let start = BigUint::from(p);
            match oracle.next_prime(&start, SEED, max_delta) {
                Some(q) => {
                    let q = q.to_u64().expect("u64");
                    prop_assert!(q >= p);
                    prop_assert!(q - p <= max_delta);
                    prop_assert!(naive_is_prime(q));
                    prop_assert!((p..q).all(|x| !naive_is_prime(x)));
                }
                None => {
                    prop_assert!((p..=p + max_delta).all(|x| !naive_is_prime(x)));
                }
            }
        }
    }
}
