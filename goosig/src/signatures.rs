//! The signature type and its canonical binary encoding.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use gouo::bigint::{decode, encode};

use crate::constants::{CHAL_SIZE, ELL_SIZE, T_SIZE};
use crate::errors::GooError;

/// Number of group elements carried by a signature.
const ELEMENTS: usize = 6;

/// Number of response remainders carried by a signature.
const RESPONSES: usize = 8;

/// A Goo signature.
///
/// Group elements are canonical representatives (at most `N / 2`). The
/// responses are the remainders of the full responses modulo the prime
/// `ell`; the quotients are committed to in `Aq..Dq` and `Eq`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Commitment to the square root `w`.
    pub c2: BigUint,
    /// Commitment to `a = (w^2 - t) / n`.
    pub c3: BigUint,
    /// Small prime whose square root is `w` modulo `n`.
    pub t: BigUint,
    pub chal: BigUint,
    pub ell: BigUint,
    pub aq: BigUint,
    pub bq: BigUint,
    pub cq: BigUint,
    pub dq: BigUint,
    /// Integer quotient commitment; the only signed field.
    pub eq: BigInt,
    pub z_w: BigUint,
    pub z_w2: BigUint,
    pub z_s1: BigUint,
    pub z_a: BigUint,
    pub z_an: BigUint,
    pub z_s1w: BigUint,
    pub z_sa: BigUint,
    pub z_s2: BigUint,
}

/// Field widths of the encoding.
///
/// Group elements take `element_size` bytes and the magnitude of `eq` takes
/// `eq_size` bytes after its sign byte. Both depend on the group and the
/// exponent size, so a layout is obtained from [`crate::Goo::signature_layout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SignatureLayout {
    pub element_size: usize,
    pub eq_size: usize,
}

impl SignatureLayout {
    pub fn new(element_size: usize, eq_size: usize) -> Self {
        SignatureLayout {
            element_size,
            eq_size,
        }
    }

    /// Total encoded length in bytes.
    pub fn size(&self) -> usize {
        ELEMENTS * self.element_size
            + T_SIZE
            + CHAL_SIZE
            + ELL_SIZE
            + 1
            + self.eq_size
            + RESPONSES * ELL_SIZE
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> &'a [u8] {
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    fn uint(&mut self, n: usize) -> BigUint {
        decode(self.take(n))
    }
}

impl Signature {
    /// Encodes the signature.
    ///
    /// Order: `C2, C3, t, chal, ell, Aq, Bq, Cq, Dq, Eq`, then the remainders
    /// `z_w, z_w2, z_s1, z_a, z_an, z_s1w, z_sa, z_s2`.
    ///
    /// # Returns
    ///
    /// `GroupError::ValueTooLarge` (wrapped) if a field exceeds its width.
    pub fn encode(&self, layout: &SignatureLayout) -> Result<Vec<u8>, GooError> {
        let el = layout.element_size;
        let mut out = Vec::with_capacity(layout.size());

        out.extend(encode(&self.c2, el)?);
        out.extend(encode(&self.c3, el)?);
        out.extend(encode(&self.t, T_SIZE)?);
        out.extend(encode(&self.chal, CHAL_SIZE)?);
        out.extend(encode(&self.ell, ELL_SIZE)?);
        for x in [&self.aq, &self.bq, &self.cq, &self.dq] {
            out.extend(encode(x, el)?);
        }

        out.push((self.eq.sign() == Sign::Minus) as u8);
        out.extend(encode(self.eq.magnitude(), layout.eq_size)?);

        for z in self.responses() {
            out.extend(encode(z, ELL_SIZE)?);
        }

        Ok(out)
    }

    /// Decodes a signature produced by [`Signature::encode`] with the same layout.
    ///
    /// Rejects a wrong length, an `Eq` sign byte other than 0 or 1, and a
    /// negative zero. Range checks on the values are left to the verifier.
    pub fn decode(bytes: &[u8], layout: &SignatureLayout) -> Result<Self, GooError> {
        if bytes.len() != layout.size() {
            return Err(GooError::InvalidEncoding(format!(
                "expected {} bytes, got {}",
                layout.size(),
                bytes.len()
            )));
        }

        let el = layout.element_size;
        let mut r = Reader { bytes, pos: 0 };

        let c2 = r.uint(el);
        let c3 = r.uint(el);
        let t = r.uint(T_SIZE);
        let chal = r.uint(CHAL_SIZE);
        let ell = r.uint(ELL_SIZE);
        let aq = r.uint(el);
        let bq = r.uint(el);
        let cq = r.uint(el);
        let dq = r.uint(el);

        let sign = r.take(1)[0];
        let magnitude = r.uint(layout.eq_size);
        let eq = match sign {
            0 => BigInt::from_biguint(Sign::Plus, magnitude),
            1 if magnitude.is_zero() => {
                return Err(GooError::InvalidEncoding("negative zero".into()));
            }
            1 => BigInt::from_biguint(Sign::Minus, magnitude),
            other => {
                return Err(GooError::InvalidEncoding(format!("sign byte {other:#04x}")));
            }
        };

        Ok(Signature {
            c2,
            c3,
            t,
            chal,
            ell,
            aq,
            bq,
            cq,
            dq,
            eq,
            z_w: r.uint(ELL_SIZE),
            z_w2: r.uint(ELL_SIZE),
            z_s1: r.uint(ELL_SIZE),
            z_a: r.uint(ELL_SIZE),
            z_an: r.uint(ELL_SIZE),
            z_s1w: r.uint(ELL_SIZE),
            z_sa: r.uint(ELL_SIZE),
            z_s2: r.uint(ELL_SIZE),
        })
    }

    /// The eight response remainders in encoding order.
    pub(crate) fn responses(&self) -> [&BigUint; RESPONSES] {
        [
            &self.z_w,
            &self.z_w2,
            &self.z_s1,
            &self.z_a,
            &self.z_an,
            &self.z_s1w,
            &self.z_sa,
            &self.z_s2,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn layout() -> SignatureLayout {
        SignatureLayout::new(128, 400)
    }

    fn sample(eq: BigInt) -> Signature {
        let v = |x: u32| BigUint::from(x);
        Signature {
            c2: v(2),
            c3: v(3),
            t: v(7),
            chal: v(11),
            ell: v(13),
            aq: v(17),
            bq: v(19),
            cq: v(23),
            dq: v(29),
            eq,
            z_w: v(1),
            z_w2: v(2),
            z_s1: v(3),
            z_a: v(4),
            z_an: v(5),
            z_s1w: v(6),
            z_sa: v(7),
            z_s2: v(8),
        }
    }

    #[test]
    fn test_layout_size() {
        assert_eq!(layout().size(), 6 * 128 + 2 + 16 + 17 + 1 + 400 + 8 * 17);
    }

    #[test]
    fn test_eq_sign_byte() {
        let l = layout();
        let sig = sample(BigInt::from(-42));
        let bytes = sig.encode(&l).expect("encode");
        let sign_at = 6 * 128 + 2 + 16 + 17;
        assert_eq!(bytes[sign_at], 1);
        assert_eq!(Signature::decode(&bytes, &l).expect("decode"), sig);

        let bytes = sample(BigInt::zero()).encode(&l).expect("encode");
        assert_eq!(bytes[sign_at], 0);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let l = layout();
        let bytes = sample(BigInt::from(5)).encode(&l).expect("encode");
        let sign_at = 6 * 128 + 2 + 16 + 17;

        assert!(Signature::decode(&bytes[1..], &l).is_err());
        let mut longer = bytes.clone();
        longer.push(0);
        assert!(Signature::decode(&longer, &l).is_err());

        let mut bad_sign = bytes.clone();
        bad_sign[sign_at] = 2;
        assert!(matches!(
            Signature::decode(&bad_sign, &l),
            Err(GooError::InvalidEncoding(_))
        ));

        let zero = sample(BigInt::zero()).encode(&l).expect("encode");
        let mut neg_zero = zero.clone();
        neg_zero[sign_at] = 1;
        assert!(matches!(
            Signature::decode(&neg_zero, &l),
            Err(GooError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_encode_rejects_oversized_field() {
        let mut sig = sample(BigInt::one());
        sig.chal = BigUint::one() << 128u32;
        assert!(matches!(sig.encode(&layout()), Err(GooError::Group(_))));
    }
}
