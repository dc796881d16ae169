//! Windowed non-adjacent form exponentiation for variable bases.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive};

/// Window width of the signed-digit recoding.
pub const WINDOW_SIZE: usize = 6;

/// Odd powers `b^1, b^3, ..., b^(2^(WINDOW_SIZE-1) - 1)`.
const TABLE_SIZE: usize = 1 << (WINDOW_SIZE - 2);

/// Signed digits of `e`, least significant first. Every non-zero digit is
/// odd and below `2^(WINDOW_SIZE-1)` in absolute value.
pub fn wnaf(e: &BigUint) -> Vec<i32> {
    let window = 1i64 << WINDOW_SIZE;
    let half = window >> 1;
    let mask = BigInt::from(window - 1);

    let mut e = BigInt::from_biguint(Sign::Plus, e.clone());
    let mut out = Vec::with_capacity(e.bits() as usize + 1);

    while e.is_positive() {
        let mut digit = 0i64;
        if e.is_odd() {
            digit = (&e & &mask).to_i64().unwrap_or(0);
            if digit >= half {
                digit -= window;
            }
            e -= digit;
        }
        out.push(digit as i32);
        e >>= 1u32;
    }

    out
}

/// Odd powers of a base and of its inverse.
pub(crate) struct OddPowers {
    pos: Vec<BigUint>,
    neg: Vec<BigUint>,
}

impl OddPowers {
    pub(crate) fn new(modulus: &BigUint, base: &BigUint, base_inv: &BigUint) -> Self {
        OddPowers {
            pos: odd_powers(modulus, base),
            neg: odd_powers(modulus, base_inv),
        }
    }

    #[inline]
    fn select(&self, digit: i32) -> Option<&BigUint> {
        match digit.signum() {
            1 => Some(&self.pos[(digit as usize - 1) / 2]),
            -1 => Some(&self.neg[((-digit) as usize - 1) / 2]),
            _ => None,
        }
    }
}

fn odd_powers(modulus: &BigUint, base: &BigUint) -> Vec<BigUint> {
    let base = base % modulus;
    let sq = (&base * &base) % modulus;
    let mut table = Vec::with_capacity(TABLE_SIZE);
    table.push(base);
    for i in 1..TABLE_SIZE {
        let next = (&table[i - 1] * &sq) % modulus;
        table.push(next);
    }
    table
}

/// Interleaved multi-exponentiation `prod(base_i^e_i)` over precomputed tables.
pub(crate) fn multi_pow(modulus: &BigUint, terms: &[(&OddPowers, &BigUint)]) -> BigUint {
    let digits: Vec<Vec<i32>> = terms.iter().map(|(_, e)| wnaf(e)).collect();
    let len = digits.iter().map(Vec::len).max().unwrap_or(0);

    let mut acc = BigUint::one();
    for i in (0..len).rev() {
        if !acc.is_one() {
            acc = (&acc * &acc) % modulus;
        }
        for ((table, _), d) in terms.iter().zip(&digits) {
            if let Some(item) = d.get(i).and_then(|&digit| table.select(digit)) {
                acc = (&acc * item) % modulus;
            }
        }
    }

    acc
}
