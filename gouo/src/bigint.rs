//! Arbitrary-precision integer helpers used by the group and the protocol.
//!
//! Everything here is a thin layer over `num-bigint`: floor-semantics
//! division, modular inverses, the Jacobi symbol, Tonelli-Shanks square roots
//! and fixed-width big-endian encoding.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::errors::GroupError;

/// `a mod m` with the result in `[0, m)`, also for negative `a`.
pub fn modulo(a: &BigInt, m: &BigUint) -> BigUint {
    let m = BigInt::from_biguint(Sign::Plus, m.clone());
    a.mod_floor(&m).magnitude().clone()
}

/// Floor division: `a = q*b + r` with `r` carrying the sign of `b`.
pub fn divmod(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    a.div_mod_floor(b)
}

pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Extended Euclid: returns `(g, x, y)` with `a*x + b*y = g`.
pub fn egcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let e = a.extended_gcd(b);
    (e.gcd, e.x, e.y)
}

/// Modular inverse of `a` modulo `m`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, GroupError> {
    let a = BigInt::from_biguint(Sign::Plus, a.clone());
    let mm = BigInt::from_biguint(Sign::Plus, m.clone());
    let (g, x, _) = egcd(&a, &mm);
    if !g.is_one() {
        return Err(GroupError::NotInvertible);
    }
    Ok(modulo(&x, m))
}

/// Modular exponentiation with a signed exponent.
///
/// A negative exponent raises the inverse of `b`, so it fails when `b` is not
/// a unit modulo `m`.
pub fn mod_pow(b: &BigUint, e: &BigInt, m: &BigUint) -> Result<BigUint, GroupError> {
    if e.sign() == Sign::Minus {
        let inv = mod_inverse(b, m)?;
        Ok(inv.modpow(e.magnitude(), m))
    } else {
        Ok(b.modpow(e.magnitude(), m))
    }
}

#[inline]
fn low_u64(x: &BigUint) -> u64 {
    x.iter_u64_digits().next().unwrap_or(0)
}

/// Jacobi symbol `(a | n)` via the binary algorithm.
pub fn jacobi(a: &BigInt, n: &BigUint) -> Result<i8, GroupError> {
    if n.is_zero() || n.is_even() {
        return Err(GroupError::InvalidJacobiModulus);
    }

    let mut a = modulo(a, n);
    let mut n = n.clone();
    let mut j = 1i8;

    while !a.is_zero() {
        let z = a.trailing_zeros().unwrap_or(0);
        a >>= z;

        let n8 = low_u64(&n) & 7;
        if z & 1 == 1 && (n8 == 3 || n8 == 5) {
            j = -j;
        }

        if low_u64(&a) & 3 == 3 && low_u64(&n) & 3 == 3 {
            j = -j;
        }

        core::mem::swap(&mut a, &mut n);
        a %= &n;
    }

    if n.is_one() {
        Ok(j)
    } else {
        Ok(0)
    }
}

/// Square root of `a` modulo the odd prime `p` (Tonelli-Shanks).
pub fn mod_sqrt(a: &BigUint, p: &BigUint) -> Result<BigUint, GroupError> {
    let a = a % p;
    if a.is_zero() {
        return Ok(a);
    }

    if jacobi(&BigInt::from(a.clone()), p)? != 1 {
        return Err(GroupError::NotResidue);
    }

    // p = 3 (mod 4)
    if low_u64(p) & 3 == 3 {
        let e = (p + 1u32) >> 2;
        return Ok(a.modpow(&e, p));
    }

    let p1 = p - 1u32;
    let s = p1.trailing_zeros().unwrap_or(0);
    let q = &p1 >> s;

    let mut z = BigUint::from(2u32);
    while jacobi(&BigInt::from(z.clone()), p)? != -1 {
        z += 1u32;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.modpow(&q, p);
    let mut r = a.modpow(&((&q + 1u32) >> 1), p);

    loop {
        if t.is_one() {
            return Ok(r);
        }

        let mut i = 0u64;
        let mut t2 = t.clone();
        while !t2.is_one() {
            t2 = (&t2 * &t2) % p;
            i += 1;
            if i == m {
                return Err(GroupError::NotResidue);
            }
        }

        let mut b = c.clone();
        for _ in 0..(m - i - 1) {
            b = (&b * &b) % p;
        }

        m = i;
        c = (&b * &b) % p;
        t = (&t * &c) % p;
        r = (&r * &b) % p;
    }
}

/// Chinese remainder: the unique `x mod p*q` with `x = ap (mod p)` and `x = aq (mod q)`.
pub fn crt(ap: &BigUint, p: &BigUint, aq: &BigUint, q: &BigUint) -> Result<BigUint, GroupError> {
    let p_inv = mod_inverse(p, q)?;
    let diff = BigInt::from(aq.clone()) - BigInt::from(ap.clone());
    let h = modulo(&(diff * BigInt::from(p_inv)), q);
    Ok(ap + p * h)
}

#[inline]
pub fn bit_length(x: &BigUint) -> u64 {
    x.bits()
}

#[inline]
pub fn byte_length(x: &BigUint) -> usize {
    x.bits().div_ceil(8) as usize
}

/// Fixed-width big-endian encoding, left padded with zeros.
pub fn encode(x: &BigUint, width: usize) -> Result<Vec<u8>, GroupError> {
    let mut out = vec![0u8; width];
    if x.is_zero() {
        return Ok(out);
    }

    let bytes = x.to_bytes_be();
    if bytes.len() > width {
        return Err(GroupError::ValueTooLarge {
            len: bytes.len(),
            width,
        });
    }

    out[width - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

#[inline]
pub fn decode(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    fn ubig(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_modulo_negative() {
        assert_eq!(modulo(&big(-7), &ubig(5)), ubig(3));
        assert_eq!(modulo(&big(7), &ubig(5)), ubig(2));
        assert_eq!(modulo(&big(-10), &ubig(5)), ubig(0));
    }

    #[test]
    fn test_divmod_floor() {
        assert_eq!(divmod(&big(-7), &big(2)), (big(-4), big(1)));
        assert_eq!(divmod(&big(7), &big(-2)), (big(-4), big(-1)));
        assert_eq!(divmod(&big(7), &big(2)), (big(3), big(1)));
    }

    #[test]
    fn test_egcd_identity() {
        let (a, b) = (big(240), big(46));
        let (g, x, y) = egcd(&a, &b);
        assert_eq!(g, big(2));
        assert_eq!(&a * x + &b * y, g);
        assert_eq!(gcd(&ubig(240), &ubig(46)), ubig(2));
    }

    #[test]
    fn test_mod_inverse() {
        let inv = mod_inverse(&ubig(3), &ubig(11)).expect("inverse");
        assert_eq!(inv, ubig(4));
        assert_eq!(mod_inverse(&ubig(6), &ubig(9)), Err(GroupError::NotInvertible));
    }

    #[test]
    fn test_mod_pow_negative_exponent() {
        let m = ubig(101);
        let x = mod_pow(&ubig(7), &big(-3), &m).expect("pow");
        let y = mod_pow(&ubig(7), &big(3), &m).expect("pow");
        assert_eq!((x * y) % &m, ubig(1));
    }

    #[test]
    fn test_jacobi_small_table() {
        // Rows of the Jacobi table for n = 15.
        let expected = [0i8, 1, 1, 0, 1, 0, 0, -1, 1, 0, 0, -1, 0, -1, -1];
        for (a, &want) in expected.iter().enumerate() {
            assert_eq!(jacobi(&big(a as i64), &ubig(15)).expect("jacobi"), want, "a = {a}");
        }
        assert_eq!(jacobi(&big(-1), &ubig(7)).expect("jacobi"), -1);
        assert_eq!(jacobi(&big(-1), &ubig(13)).expect("jacobi"), 1);
    }

    #[test]
    fn test_jacobi_rejects_even_modulus() {
        assert_eq!(jacobi(&big(3), &ubig(10)), Err(GroupError::InvalidJacobiModulus));
        assert_eq!(jacobi(&big(3), &ubig(0)), Err(GroupError::InvalidJacobiModulus));
    }

    #[test]
    fn test_mod_sqrt() {
        // 3 mod 4 prime and a prime with a large power of two in p - 1.
        for p in [10007u64, 7681, 65537] {
            let p = ubig(p);
            for a in 1u64..200 {
                let a = ubig(a);
                match mod_sqrt(&a, &p) {
                    Ok(r) => assert_eq!((&r * &r) % &p, a),
                    Err(e) => {
                        assert_eq!(e, GroupError::NotResidue);
                        assert_eq!(jacobi(&BigInt::from(a.clone()), &p).expect("jacobi"), -1);
                    }
                }
            }
        }
    }

    #[test]
    fn test_crt() {
        let (p, q) = (ubig(11), ubig(13));
        let x = crt(&ubig(3), &p, &ubig(5), &q).expect("crt");
        assert_eq!(&x % &p, ubig(3));
        assert_eq!(&x % &q, ubig(5));
        assert!(x < ubig(143));
    }

    #[test]
    fn test_encode_decode() {
        let x = ubig(0x0102);
        assert_eq!(encode(&x, 4).expect("encode"), vec![0, 0, 1, 2]);
        assert_eq!(decode(&[0, 0, 1, 2]), x);
        assert_eq!(encode(&BigUint::zero(), 3).expect("encode"), vec![0, 0, 0]);
        assert_eq!(
            encode(&ubig(0x010203), 2),
            Err(GroupError::ValueTooLarge { len: 3, width: 2 })
        );
    }

    #[test]
    fn test_lengths() {
        assert_eq!(bit_length(&ubig(255)), 8);
        assert_eq!(byte_length(&ubig(256)), 2);
        assert_eq!(byte_length(&BigUint::zero()), 0);
    }
}
