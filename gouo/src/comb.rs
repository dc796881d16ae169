//! Fixed-base comb precomputation.
//!
//! An exponent of `bits` bits is laid out as `points_per_add` rows of
//! `bits_per_window` bits. Column `c` of the matrix selects one of the
//! `2^points_per_add - 1` row combinations. The columns are further split into
//! `adds_per_shift` groups of `shifts` columns; group `k` gets its own copy of
//! the table raised to `2^(k * shifts)`, so one squaring serves all groups.

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::GroupError;

/// Smallest and (exclusive) largest row count tried by the layout search.
const MIN_POINTS_PER_ADD: usize = 2;
const MAX_POINTS_PER_ADD: usize = 18;

/// Table layout for one exponent size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombSpec {
    /// Rows of the exponent matrix, i.e. bases combined per table entry.
    pub points_per_add: usize,
    /// Table copies, each shifted by `2^shifts` relative to the previous one.
    pub adds_per_shift: usize,
    /// Squarings per exponentiation, plus one.
    pub shifts: usize,
    /// Columns of the exponent matrix.
    pub bits_per_window: usize,
    /// Exponent capacity in bits, `points_per_add * bits_per_window`.
    pub bits: usize,
    /// Number of table entries, `(2^points_per_add - 1) * adds_per_shift`.
    pub size: usize,
    /// Group operations per exponentiation.
    pub ops: usize,
}

impl CombSpec {
    /// Cheapest layout for `bits`-bit exponents with at most `max_size` entries.
    ///
    /// Minimises the operation count, then the table size. Among equal
    /// candidates the first one found (ascending rows, then ascending
    /// `adds_per_shift`) wins, so layouts are reproducible.
    pub fn generate(bits: usize, max_size: usize) -> Result<Self, GroupError> {
        let mut best: Option<CombSpec> = None;

        for ppa in MIN_POINTS_PER_ADD..MAX_POINTS_PER_ADD {
            let bpw = bits.div_ceil(ppa).max(1);
            let stride = (1usize << ppa) - 1;

            for aps in (1..=bpw).filter(|aps| bpw % aps == 0) {
                let shifts = bpw / aps;
                let size = stride * aps;
                if size > max_size {
                    continue;
                }

                let ops = shifts * (aps + 1) - 1;
                let better = match &best {
                    None => true,
                    Some(b) => ops < b.ops || (ops == b.ops && size < b.size),
                };

                if better {
                    best = Some(CombSpec {
                        points_per_add: ppa,
                        adds_per_shift: aps,
                        shifts,
                        bits_per_window: bpw,
                        bits: ppa * bpw,
                        size,
                        ops,
                    });
                }
            }
        }

        let spec = best.ok_or(GroupError::NoCombSpec { bits, max_size })?;
        debug!(
            bits,
            points_per_add = spec.points_per_add,
            adds_per_shift = spec.adds_per_shift,
            shifts = spec.shifts,
            size = spec.size,
            ops = spec.ops,
            "selected comb layout"
        );
        Ok(spec)
    }

    #[inline]
    fn stride(&self) -> usize {
        (1usize << self.points_per_add) - 1
    }
}

/// Precomputed powers of one base for one [`CombSpec`].
#[derive(Clone, Debug)]
pub struct Comb {
    spec: CombSpec,
    items: Vec<BigUint>,
}

impl Comb {
    /// Build the table for `base` modulo `modulus`.
    pub fn new(modulus: &BigUint, base: &BigUint, spec: CombSpec) -> Self {
        let ppa = spec.points_per_add;
        let stride = spec.stride();
        let mut items = vec![BigUint::one(); spec.size];

        // Row bases: base^(2^(i * bits_per_window)).
        let mut power = base % modulus;
        for i in 0..ppa {
            if i > 0 {
                for _ in 0..spec.bits_per_window {
                    power = (&power * &power) % modulus;
                }
            }
            items[(1 << i) - 1] = power.clone();
        }

        for k in 0..spec.adds_per_shift {
            let offset = k * stride;

            if k > 0 {
                for i in 0..ppa {
                    let mut x = items[offset - stride + (1 << i) - 1].clone();
                    for _ in 0..spec.shifts {
                        x = (&x * &x) % modulus;
                    }
                    items[offset + (1 << i) - 1] = x;
                }
            }

            for mask in 1..=stride {
                if mask.is_power_of_two() {
                    continue;
                }
                let low = mask & mask.wrapping_neg();
                items[offset + mask - 1] =
                    (&items[offset + (mask ^ low) - 1] * &items[offset + low - 1]) % modulus;
            }
        }

        Comb { spec, items }
    }

    #[inline]
    pub fn spec(&self) -> &CombSpec {
        &self.spec
    }

    /// Entry for row mask `mask` (non-zero) in table copy `k`.
    #[inline]
    pub(crate) fn item(&self, k: usize, mask: usize) -> &BigUint {
        &self.items[k * self.spec.stride() + mask - 1]
    }

    /// Row masks of `e`, indexed by `shift * adds_per_shift + add`.
    pub fn recode(&self, e: &BigUint) -> Result<Vec<usize>, GroupError> {
        let spec = &self.spec;
        if e.bits() > spec.bits as u64 {
            return Err(GroupError::ExponentTooLarge {
                bits: e.bits(),
                capacity: spec.bits as u64,
            });
        }

        let mut out = Vec::with_capacity(spec.shifts * spec.adds_per_shift);
        for j in 0..spec.shifts {
            for k in 0..spec.adds_per_shift {
                let column = (k * spec.shifts + j) as u64;
                let mut mask = 0usize;
                for i in 0..spec.points_per_add {
                    if e.bit(i as u64 * spec.bits_per_window as u64 + column) {
                        mask |= 1 << i;
                    }
                }
                out.push(mask);
            }
        }

        Ok(out)
    }

    /// Single-base exponentiation `base^e`.
    pub fn pow(&self, modulus: &BigUint, e: &BigUint) -> Result<BigUint, GroupError> {
        let masks = self.recode(e)?;
        let aps = self.spec.adds_per_shift;
        let mut acc = BigUint::one();

        for j in (0..self.spec.shifts).rev() {
            acc = (&acc * &acc) % modulus;
            for k in 0..aps {
                let mask = masks[j * aps + k];
                if mask != 0 {
                    acc = (&acc * self.item(k, mask)) % modulus;
                }
            }
        }

        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn random_biguint(rng: &mut StdRng, bits: usize) -> BigUint {
        let mut buf = vec![0u8; bits.div_ceil(8)];
        rng.fill_bytes(&mut buf);
        BigUint::from_bytes_be(&buf) >> (buf.len() * 8 - bits)
    }

    #[test]
    fn test_generate_known_layouts() {
        let spec = CombSpec::generate(136, 512).expect("spec");
        assert_eq!(
            (spec.points_per_add, spec.adds_per_shift, spec.shifts, spec.size, spec.ops),
            (7, 4, 5, 508, 24)
        );
        assert_eq!(spec.bits_per_window, 20);
        assert_eq!(spec.bits, 140);

        let spec = CombSpec::generate(2047, 512).expect("spec");
        assert_eq!(
            (spec.points_per_add, spec.adds_per_shift, spec.shifts, spec.size, spec.ops),
            (8, 2, 128, 510, 383)
        );

        let spec = CombSpec::generate(3328, 512).expect("spec");
        assert_eq!(
            (spec.points_per_add, spec.adds_per_shift, spec.shifts, spec.size, spec.ops),
            (7, 4, 119, 508, 594)
        );
    }

    #[test]
    fn test_generate_respects_ceiling() {
        for max_size in [3usize, 10, 100, 512, 4096] {
            let spec = CombSpec::generate(1024, max_size).expect("spec");
            assert!(spec.size <= max_size);
            assert!(spec.bits >= 1024);
        }
        assert_eq!(
            CombSpec::generate(1024, 2),
            Err(GroupError::NoCombSpec { bits: 1024, max_size: 2 })
        );
    }

    #[test]
    fn test_comb_pow_matches_modpow() {
        let mut rng = StdRng::seed_from_u64(42);
        let modulus = random_biguint(&mut rng, 512) | BigUint::one();
        let base = BigUint::from(3u32);

        for bits in [1usize, 17, 136, 300] {
            let spec = CombSpec::generate(bits, 64).expect("spec");
            let comb = Comb::new(&modulus, &base, spec);
            for _ in 0..4 {
                let e = random_biguint(&mut rng, bits);
                assert_eq!(comb.pow(&modulus, &e).expect("pow"), base.modpow(&e, &modulus));
            }
            let max = (BigUint::one() << spec.bits) - 1u32;
            assert_eq!(comb.pow(&modulus, &max).expect("pow"), base.modpow(&max, &modulus));
        }
    }

    #[test]
    fn test_recode_rejects_oversized_exponent() {
        let modulus = BigUint::from(1_000_003u32);
        let spec = CombSpec::generate(64, 32).expect("spec");
        let comb = Comb::new(&modulus, &BigUint::from(2u32), spec);
        let e = BigUint::one() << spec.bits;
        assert!(matches!(
            comb.recode(&e),
            Err(GroupError::ExponentTooLarge { .. })
        ));
        assert_eq!(comb.pow(&modulus, &BigUint::from(0u32)).expect("pow"), BigUint::one());
    }
}
