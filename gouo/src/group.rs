use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::debug;

use crate::bigint::mod_inverse;
use crate::comb::{Comb, CombSpec};
use crate::errors::GroupError;
use crate::wnaf::{multi_pow, OddPowers};

/// Smallest accepted group modulus.
pub const MIN_MODULUS_BITS: u64 = 1024;
/// Largest accepted group modulus.
pub const MAX_MODULUS_BITS: u64 = 4096;

/// Arithmetic in `(Z/NZ)* / {1, -1}`.
///
/// Elements are represented by integers in `[0, N)`; the canonical
/// representative of a class is the one not above `N / 2`.
pub trait GroupOps {
    fn modulus(&self) -> &BigUint;

    /// `N >> 1`, the largest canonical representative.
    fn half_modulus(&self) -> &BigUint;

    /// The fixed bases `(g, h)`.
    fn generators(&self) -> (&BigUint, &BigUint);

    /// `g^e1 * h^e2`, not reduced.
    fn powgh(&self, e1: &BigUint, e2: &BigUint) -> Result<BigUint, GroupError>;

    /// Canonical representative of `x` modulo `{1, -1}`.
    #[inline]
    fn reduce(&self, x: &BigUint) -> BigUint {
        let n = self.modulus();
        let x = x % n;
        if &x > self.half_modulus() {
            n - x
        } else {
            x
        }
    }

    #[inline]
    fn is_reduced(&self, x: &BigUint) -> bool {
        x <= self.half_modulus()
    }

    #[inline]
    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % self.modulus()
    }

    #[inline]
    fn sqr(&self, a: &BigUint) -> BigUint {
        (a * a) % self.modulus()
    }

    fn inv(&self, a: &BigUint) -> Result<BigUint, GroupError> {
        mod_inverse(a, self.modulus())
    }

    /// Both inverses for the price of one modular inversion.
    fn inv2(&self, a: &BigUint, b: &BigUint) -> Result<(BigUint, BigUint), GroupError> {
        let ab_inv = self.inv(&self.mul(a, b))?;
        Ok((self.mul(&ab_inv, b), self.mul(&ab_inv, a)))
    }

    /// Montgomery's simultaneous inversion of `K` elements.
    ///
    /// Fails with `NotInvertible` if any element shares a factor with the
    /// modulus; no partial result is returned.
    fn inv_batch<const K: usize>(&self, xs: &[BigUint; K]) -> Result<[BigUint; K], GroupError> {
        let mut prefix = Vec::with_capacity(K);
        let mut acc = BigUint::one();
        for x in xs {
            prefix.push(acc.clone());
            acc = self.mul(&acc, x);
        }

        let mut inv = self.inv(&acc)?;
        let mut out: [BigUint; K] = core::array::from_fn(|_| BigUint::zero());
        for i in (0..K).rev() {
            out[i] = self.mul(&inv, &prefix[i]);
            inv = self.mul(&inv, &xs[i]);
        }

        Ok(out)
    }

    /// `b^e` for a variable base whose inverse is known.
    fn pow(&self, b: &BigUint, b_inv: &BigUint, e: &BigUint) -> BigUint {
        let n = self.modulus();
        let table = OddPowers::new(n, b, b_inv);
        multi_pow(n, &[(&table, e)])
    }

    /// `b1^e1 * b2^e2` sharing one squaring chain.
    fn pow2(
        &self,
        b1: &BigUint,
        b1_inv: &BigUint,
        e1: &BigUint,
        b2: &BigUint,
        b2_inv: &BigUint,
        e2: &BigUint,
    ) -> BigUint {
        let n = self.modulus();
        let t1 = OddPowers::new(n, b1, b1_inv);
        let t2 = OddPowers::new(n, b2, b2_inv);
        multi_pow(n, &[(&t1, e1), (&t2, e2)])
    }
}

/// Comb tables for `g` and `h` sharing one layout.
#[derive(Clone, Debug)]
struct CombPair {
    g: Comb,
    h: Comb,
}

/// The RSA group of unknown order modulo a public modulus `N`.
#[derive(Clone, Debug)]
pub struct RsaGroup {
    n: BigUint,
    nh: BigUint,
    g: BigUint,
    h: BigUint,
    tiers: Vec<CombPair>,
}

impl RsaGroup {
    /// Validate the parameters and precompute one comb pair per entry of
    /// `tier_bits`.
    ///
    /// # Arguments
    ///
    /// * `n` - odd modulus of 1024 to 4096 bits
    /// * `g`, `h` - distinct canonical bases greater than one
    /// * `tier_bits` - exponent sizes to precompute for
    /// * `max_comb_size` - table ceiling per comb
    pub fn new(
        n: BigUint,
        g: BigUint,
        h: BigUint,
        tier_bits: &[usize],
        max_comb_size: usize,
    ) -> Result<Self, GroupError> {
        if n.bits() < MIN_MODULUS_BITS {
            return Err(GroupError::InvalidModulus("modulus too small"));
        }
        if n.bits() > MAX_MODULUS_BITS {
            return Err(GroupError::InvalidModulus("modulus too large"));
        }
        if !n.bit(0) {
            return Err(GroupError::InvalidModulus("modulus is even"));
        }

        let nh = &n >> 1u32;
        let one = BigUint::one();
        for base in [&g, &h] {
            if base <= &one || base > &nh {
                return Err(GroupError::InvalidGenerator);
            }
        }
        if g == h {
            return Err(GroupError::InvalidGenerator);
        }

        let mut bits = tier_bits.to_vec();
        bits.sort_unstable();
        bits.dedup();

        let mut tiers = Vec::with_capacity(bits.len());
        for b in bits {
            let spec = CombSpec::generate(b, max_comb_size)?;
            tiers.push(CombPair {
                g: Comb::new(&n, &g, spec),
                h: Comb::new(&n, &h, spec),
            });
        }

        debug!(
            modulus_bits = n.bits(),
            tiers = tiers.len(),
            capacity = tiers.last().map_or(0, |t| t.g.spec().bits),
            "rsa group ready"
        );

        Ok(RsaGroup { n, nh, g, h, tiers })
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// Width in bytes of an encoded group element.
    pub fn element_size(&self) -> usize {
        self.n.bits().div_ceil(8) as usize
    }

    /// Layouts of the precomputed tiers, smallest first.
    pub fn comb_specs(&self) -> impl Iterator<Item = &CombSpec> {
        self.tiers.iter().map(|t| t.g.spec())
    }

    /// Largest exponent `powgh` accepts.
    pub fn max_exponent_bits(&self) -> usize {
        self.tiers.last().map_or(0, |t| t.g.spec().bits)
    }
}

impl GroupOps for RsaGroup {
    #[inline]
    fn modulus(&self) -> &BigUint {
        &self.n
    }

    #[inline]
    fn half_modulus(&self) -> &BigUint {
        &self.nh
    }

    #[inline]
    fn generators(&self) -> (&BigUint, &BigUint) {
        (&self.g, &self.h)
    }

    fn powgh(&self, e1: &BigUint, e2: &BigUint) -> Result<BigUint, GroupError> {
        let need = e1.bits().max(e2.bits());
        let pair = self
            .tiers
            .iter()
            .find(|t| t.g.spec().bits as u64 >= need)
            .ok_or(GroupError::ExponentTooLarge {
                bits: need,
                capacity: self.max_exponent_bits() as u64,
            })?;

        let spec = pair.g.spec();
        let m1 = pair.g.recode(e1)?;
        let m2 = pair.h.recode(e2)?;
        let aps = spec.adds_per_shift;
        let mut acc = BigUint::one();

        for j in (0..spec.shifts).rev() {
            acc = self.sqr(&acc);
            for k in 0..aps {
                let idx = j * aps + k;
                if m1[idx] != 0 {
                    acc = self.mul(&acc, pair.g.item(k, m1[idx]));
                }
                if m2[idx] != 0 {
                    acc = self.mul(&acc, pair.h.item(k, m2[idx]));
                }
            }
        }

        Ok(acc)
    }
}
