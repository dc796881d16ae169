//! The Goo prover and verifier.

use gouo::bigint::{crt, decode, encode, jacobi, mod_sqrt};
use gouo::{Drbg, GroupOps, PrimeOracle, RsaGroup};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::ToPrimitive;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::GooConfig;
use crate::constants::{
    BLIND_SLACK_BITS, CHAL_BITS, ELL_BITS, ELLDIFF_MAX, MAX_SIGN_ATTEMPTS, MAX_T, MIN_RSA_BITS,
    SEED_SIZE, SIGNING_TAG,
};
use crate::errors::{GooError, VerifyError};
use crate::keys::{RsaPrivateKey, RsaPublicKey};
use crate::signatures::{Signature, SignatureLayout};
use crate::transcript::{Transcript, TranscriptDigest, challenge};

/// Prover and verifier bound to one group of unknown order.
///
/// Construction precomputes the comb tables, so an instance should be built
/// once and shared; it is `Send + Sync`.
#[derive(Debug)]
pub struct Goo {
    group: RsaGroup,
    oracle: PrimeOracle,
    config: GooConfig,
    rand_bits: u64,
    layout: SignatureLayout,
}

/// The prover's first message.
struct FirstMessage {
    a: BigUint,
    b: BigUint,
    c: BigUint,
    d: BigUint,
    e: BigInt,
}

/// Secret witnesses of one signature.
struct Witness {
    t: u64,
    w: BigUint,
    a: BigUint,
    s: BigUint,
    s1: BigUint,
    s2: BigUint,
}

impl Goo {
    /// Builds an instance for the group modulus `modulus`.
    ///
    /// # Arguments
    ///
    /// * `modulus` - the public group modulus `N`; nobody may know its factors
    /// * `config` - generators, signer key size bound and comb table ceiling
    ///
    /// # Returns
    ///
    /// `GooError::InvalidConfig` for a bad configuration, or a wrapped
    /// `GroupError` if the modulus, the generators or the comb layouts are
    /// rejected.
    pub fn new(modulus: BigUint, config: &GooConfig) -> Result<Self, GooError> {
        config.validate()?;

        let rand_bits = modulus.bits().saturating_sub(1);
        let exp_bits = config.exp_bits as u64;
        let big = (2 * exp_bits).max(rand_bits + exp_bits) + CHAL_BITS + BLIND_SLACK_BITS + 1;
        let tiers = [ELL_BITS, exp_bits.max(rand_bits), big].map(|b| b as usize);

        let group = RsaGroup::new(
            modulus,
            BigUint::from(config.g),
            BigUint::from(config.h),
            &tiers,
            config.max_comb_size,
        )?;

        let eq_size = ((big - ELL_BITS + 1) as usize).div_ceil(8);
        let layout = SignatureLayout::new(group.element_size(), eq_size);

        debug!(
            modulus_bits = group.bits(),
            exp_bits,
            signature_size = layout.size(),
            "goo instance ready"
        );

        Ok(Goo {
            group,
            oracle: PrimeOracle::new(),
            config: *config,
            rand_bits,
            layout,
        })
    }

    pub fn group(&self) -> &RsaGroup {
        &self.group
    }

    pub fn config(&self) -> &GooConfig {
        &self.config
    }

    /// Field widths of encoded signatures for this instance.
    pub fn signature_layout(&self) -> SignatureLayout {
        self.layout
    }

    /// Fresh commitment seed from the thread-local OS-seeded generator.
    pub fn generate() -> [u8; SEED_SIZE] {
        let mut seed = [0u8; SEED_SIZE];
        rand::rng().fill_bytes(&mut seed);
        seed
    }

    /// Encoded commitment `C1` to the public key `key` under `seed`.
    pub fn challenge(
        &self,
        seed: &[u8; SEED_SIZE],
        key: &RsaPublicKey,
    ) -> Result<Vec<u8>, GooError> {
        let bits = key.bits();
        if bits < MIN_RSA_BITS {
            return Err(GooError::InvalidKey("modulus too small"));
        }
        if bits > self.config.exp_bits as u64 {
            return Err(GooError::KeyTooLarge {
                bits,
                max: self.config.exp_bits,
            });
        }

        let c1 = self.commit(&key.n, &self.expand_seed(seed))?;
        Ok(encode(&c1, self.group.element_size())?)
    }

    /// Whether `c1` is the commitment to `key` under `seed`.
    pub fn validate(&self, seed: &[u8; SEED_SIZE], c1: &[u8], key: &RsaPrivateKey) -> bool {
        let check = || -> Result<bool, GooError> {
            let n = key.check(&self.oracle, self.config.exp_bits)?;
            let c1_expected = self.commit(&n, &self.expand_seed(seed))?;
            Ok(encode(&c1_expected, self.group.element_size())? == c1)
        };

        check().unwrap_or_else(|err| {
            debug!(%err, "commitment validation failed");
            false
        })
    }

    /// Signs `msg` with `key`, binding the commitment derived from `seed`.
    ///
    /// Signing is deterministic in `(seed, key, msg)`.
    pub fn sign(
        &self,
        msg: &[u8],
        seed: &[u8; SEED_SIZE],
        key: &RsaPrivateKey,
    ) -> Result<Signature, GooError> {
        self.sign_inner(msg, seed, key, None, MAX_SIGN_ATTEMPTS)
    }

    /// Like [`Goo::sign`], but first checks that the encoded commitment `c1`
    /// matches `seed` and `key`.
    pub fn sign_with_commitment(
        &self,
        msg: &[u8],
        seed: &[u8; SEED_SIZE],
        c1: &[u8],
        key: &RsaPrivateKey,
    ) -> Result<Signature, GooError> {
        if c1.len() != self.group.element_size() {
            return Err(GooError::CommitmentMismatch);
        }
        self.sign_inner(msg, seed, key, Some(&decode(c1)), MAX_SIGN_ATTEMPTS)
    }

    /// Verifies an encoded signature against an encoded commitment.
    ///
    /// Any malformed input yields `false`; the reason is logged at debug level.
    pub fn verify(&self, msg: &[u8], sig: &[u8], c1: &[u8]) -> bool {
        let decoded = || -> Result<(Signature, BigUint), VerifyError> {
            if c1.len() != self.group.element_size() {
                return Err(VerifyError::BadEncoding("commitment length".into()));
            }
            let sig = Signature::decode(sig, &self.layout)
                .map_err(|err| VerifyError::BadEncoding(err.to_string()))?;
            Ok((sig, decode(c1)))
        };

        match decoded() {
            Ok((sig, c1)) => self.verify_signature(msg, &sig, &c1),
            Err(err) => {
                debug!(%err, "signature rejected");
                false
            }
        }
    }

    /// Verifies a decoded signature against the commitment `c1`.
    pub fn verify_signature(&self, msg: &[u8], sig: &Signature, c1: &BigUint) -> bool {
        match self.verify_inner(msg, sig, c1) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "signature rejected");
                false
            }
        }
    }

    fn expand_seed(&self, seed: &[u8; SEED_SIZE]) -> BigUint {
        Drbg::new(seed).random_bits(self.rand_bits)
    }

    fn commit(&self, n: &BigUint, s: &BigUint) -> Result<BigUint, GooError> {
        Ok(self.group.reduce(&self.group.powgh(n, s)?))
    }

    /// Smallest prime `t` that is a square modulo `n`, with a root `w < n`.
    fn square_root(&self, key: &RsaPrivateKey) -> Result<(u64, BigUint), GooError> {
        for &t in self.oracle.small_primes() {
            let t = u64::from(t);
            if t >= MAX_T {
                break;
            }

            let ti = BigInt::from(t);
            if jacobi(&ti, &key.p)? != 1 || jacobi(&ti, &key.q)? != 1 {
                continue;
            }

            let tu = BigUint::from(t);
            let wp = mod_sqrt(&tu, &key.p)?;
            let wq = mod_sqrt(&tu, &key.q)?;
            debug!(t, "selected small prime");
            return Ok((t, crt(&wp, &key.p, &wq, &key.q)?));
        }

        Err(GooError::NoQuadraticResidue)
    }

    /// DRBG for all prover randomness, keyed by seed, key and message.
    fn signing_drbg(&self, seed: &[u8; SEED_SIZE], key: &RsaPrivateKey, msg: &[u8]) -> Drbg {
        let mut hasher = Sha256::new();
        let p = key.p.to_bytes_be();
        let q = key.q.to_bytes_be();
        for part in [SIGNING_TAG, &seed[..], &p[..], &q[..], msg] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        Drbg::new(&hasher.finalize())
    }

    fn digest(
        &self,
        c1: &BigUint,
        c2: &BigUint,
        c3: &BigUint,
        t: &BigUint,
        first: &FirstMessage,
        msg: &[u8],
    ) -> TranscriptDigest {
        let (g, h) = self.group.generators();
        let mut transcript = Transcript::new();
        let n = self.group.modulus();
        for x in [g, h, n, c1, c2, c3, t, &first.a, &first.b, &first.c, &first.d] {
            transcript.append_uint(x);
        }
        transcript.append_int(&first.e);
        transcript.append_bytes(msg);
        transcript.finish()
    }

    /// Runs the prover, resampling the challenge at most `max_attempts` times.
    pub(crate) fn sign_inner(
        &self,
        msg: &[u8],
        seed: &[u8; SEED_SIZE],
        key: &RsaPrivateKey,
        expected_c1: Option<&BigUint>,
        max_attempts: usize,
    ) -> Result<Signature, GooError> {
        let grp = &self.group;
        let n = key.check(&self.oracle, self.config.exp_bits)?;

        let s = self.expand_seed(seed);
        let c1 = self.commit(&n, &s)?;
        if expected_c1.is_some_and(|expected| expected != &c1) {
            return Err(GooError::CommitmentMismatch);
        }

        let (t, w) = self.square_root(key)?;
        let a = (&w * &w - t) / &n;

        let mut rng = self.signing_drbg(seed, key, msg);
        let s1 = rng.random_bits(self.rand_bits);
        let s2 = rng.random_bits(self.rand_bits);
        let witness = Witness { t, w, a, s, s1, s2 };

        let c2 = self.commit(&witness.w, &witness.s1)?;
        let c3 = self.commit(&witness.a, &witness.s2)?;
        let (c1_inv, c2_inv) = grp.inv2(&c1, &c2)?;

        let exp_bits = self.config.exp_bits as u64;
        let rand_bits = self.rand_bits;
        let mut blind =
            |witness_bits: u64| rng.random_bits(witness_bits + CHAL_BITS + BLIND_SLACK_BITS);
        let r_w = blind(exp_bits);
        let r_w2 = blind(2 * exp_bits);
        let r_s1w = blind(rand_bits + exp_bits);
        let r_a = blind(exp_bits);
        let r_an = blind(2 * exp_bits);
        let r_sa = blind(rand_bits + exp_bits);
        let r_s2 = blind(rand_bits);

        let b = grp.reduce(&grp.mul(&grp.pow(&c2_inv, &c2, &r_w), &grp.powgh(&r_w2, &r_s1w)?));
        let c = grp.reduce(&grp.mul(&grp.pow(&c1_inv, &c1, &r_a), &grp.powgh(&r_an, &r_sa)?));
        let d = self.commit(&r_a, &r_s2)?;
        let e = BigInt::from(r_w2.clone()) - BigInt::from(r_an.clone());

        let t_big = BigUint::from(witness.t);
        for attempt in 0..max_attempts {
            let r_s1 = rng.random_bits(rand_bits + CHAL_BITS + BLIND_SLACK_BITS);
            let first = FirstMessage {
                a: self.commit(&r_w, &r_s1)?,
                b: b.clone(),
                c: c.clone(),
                d: d.clone(),
                e: e.clone(),
            };

            let digest = self.digest(&c1, &c2, &c3, &t_big, &first, msg);
            let (chal, ell0) = challenge(&digest);
            let ell = match self.oracle.next_prime(&ell0, &digest, ELLDIFF_MAX) {
                Some(ell) if ell.bits() == ELL_BITS => ell,
                _ => {
                    debug!(attempt, "inadmissible challenge, resampling");
                    continue;
                }
            };

            let ch = &chal;
            let w = &witness.w;
            let wa = &witness.a;
            let z_w = ch * w + &r_w;
            let z_w2 = ch * w * w + &r_w2;
            let z_s1 = ch * &witness.s1 + &r_s1;
            let z_a = ch * wa + &r_a;
            let z_an = ch * wa * &n + &r_an;
            let z_s1w = ch * &witness.s1 * w + &r_s1w;
            let z_sa = ch * &witness.s * wa + &r_sa;
            let z_s2 = ch * &witness.s2 + &r_s2;

            let (q_w, z_w) = z_w.div_rem(&ell);
            let (q_w2, z_w2) = z_w2.div_rem(&ell);
            let (q_s1, z_s1) = z_s1.div_rem(&ell);
            let (q_a, z_a) = z_a.div_rem(&ell);
            let (q_an, z_an) = z_an.div_rem(&ell);
            let (q_s1w, z_s1w) = z_s1w.div_rem(&ell);
            let (q_sa, z_sa) = z_sa.div_rem(&ell);
            let (q_s2, z_s2) = z_s2.div_rem(&ell);

            let aq = self.commit(&q_w, &q_s1)?;
            let bq = grp.reduce(&grp.mul(&grp.pow(&c2_inv, &c2, &q_w), &grp.powgh(&q_w2, &q_s1w)?));
            let cq = grp.reduce(&grp.mul(&grp.pow(&c1_inv, &c1, &q_a), &grp.powgh(&q_an, &q_sa)?));
            let dq = self.commit(&q_a, &q_s2)?;
            let eq = BigInt::from(q_w2) - BigInt::from(q_an);

            debug!(attempt, t = witness.t, "signature produced");
            return Ok(Signature {
                c2,
                c3,
                t: t_big,
                chal,
                ell,
                aq,
                bq,
                cq,
                dq,
                eq,
                z_w,
                z_w2,
                z_s1,
                z_a,
                z_an,
                z_s1w,
                z_sa,
                z_s2,
            });
        }

        Err(GooError::NoAdmissibleChallenge(max_attempts))
    }

    pub(crate) fn verify_inner(
        &self,
        msg: &[u8],
        sig: &Signature,
        c1: &BigUint,
    ) -> Result<(), VerifyError> {
        let grp = &self.group;

        let elements = [
            ("C1", c1),
            ("C2", &sig.c2),
            ("C3", &sig.c3),
            ("Aq", &sig.aq),
            ("Bq", &sig.bq),
            ("Cq", &sig.cq),
            ("Dq", &sig.dq),
        ];
        for (name, x) in elements {
            if !grp.is_reduced(x) {
                return Err(VerifyError::NonCanonical(name));
            }
        }

        let t = sig
            .t
            .to_u64()
            .filter(|&t| t < MAX_T && self.oracle.is_small_prime(t))
            .ok_or(VerifyError::OutOfRange("t"))?;
        if sig.chal.bits() > CHAL_BITS {
            return Err(VerifyError::OutOfRange("chal"));
        }
        if sig.ell.bits() > ELL_BITS {
            return Err(VerifyError::OutOfRange("ell"));
        }
        if sig.responses().iter().any(|z| *z >= &sig.ell) {
            return Err(VerifyError::OutOfRange("response"));
        }
        if sig.eq.magnitude().bits() > 8 * self.layout.eq_size as u64 {
            return Err(VerifyError::OutOfRange("eq"));
        }

        let [c1_inv, c2_inv, c3_inv, aq_inv, bq_inv, cq_inv, dq_inv] = grp.inv_batch(&[
            c1.clone(),
            sig.c2.clone(),
            sig.c3.clone(),
            sig.aq.clone(),
            sig.bq.clone(),
            sig.cq.clone(),
            sig.dq.clone(),
        ])?;

        let ell = &sig.ell;
        let a = grp.reduce(&grp.mul(
            &grp.pow2(&sig.aq, &aq_inv, ell, &c2_inv, &sig.c2, &sig.chal),
            &grp.powgh(&sig.z_w, &sig.z_s1)?,
        ));
        let b = grp.reduce(&grp.mul(
            &grp.pow2(&sig.bq, &bq_inv, ell, &c2_inv, &sig.c2, &sig.z_w),
            &grp.powgh(&sig.z_w2, &sig.z_s1w)?,
        ));
        let c = grp.reduce(&grp.mul(
            &grp.pow2(&sig.cq, &cq_inv, ell, &c1_inv, c1, &sig.z_a),
            &grp.powgh(&sig.z_an, &sig.z_sa)?,
        ));
        let d = grp.reduce(&grp.mul(
            &grp.pow2(&sig.dq, &dq_inv, ell, &c3_inv, &sig.c3, &sig.chal),
            &grp.powgh(&sig.z_a, &sig.z_s2)?,
        ));
        let e = &sig.eq * BigInt::from(ell.clone()) + BigInt::from(sig.z_w2.clone())
            - BigInt::from(sig.z_an.clone())
            - BigInt::from(&sig.chal * t);

        let first = FirstMessage { a, b, c, d, e };
        let digest = self.digest(c1, &sig.c2, &sig.c3, &sig.t, &first, msg);
        let (chal, ell0) = challenge(&digest);

        if chal != sig.chal {
            return Err(VerifyError::ChallengeMismatch);
        }
        if ell < &ell0 || ell > &(&ell0 + ELLDIFF_MAX) {
            return Err(VerifyError::EllOutOfWindow);
        }
        if !self.oracle.is_prime(ell, &digest) {
            return Err(VerifyError::CompositeEll);
        }

        Ok(())
    }
}
