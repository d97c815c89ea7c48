//! CSIDH key exchange over the 511-bit prime p = 4 * 3 * 5 * ... * 587 - 1.
//!
//! A private key is a vector of small exponents, one per odd prime factor of
//! p + 1. The public key is the Montgomery coefficient A of the curve reached
//! from y^2 = x^3 + x by the class group action of that vector, and the
//! shared secret is the coefficient reached by acting with one's own private
//! key on the peer's curve.

use log::{debug, trace, warn};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::{
    elliptic::{curve::Curve, point::PointX, velu::VELU_MAX_DEGREE},
    error::CsidhError,
    fields::{
        csidh::{FOUR_SQRT_P, NWORDS},
        fp511::Fp511,
    },
    utilities::bn::{bn_from_u64, bn_is_less_vartime, bn_mul_u64, bn_product},
};

pub const NUM_PRIMES: usize = 74;
pub const PRIVATE_KEY_SIZE: usize = NUM_PRIMES.div_ceil(2);
pub const PUBLIC_KEY_SIZE: usize = Fp511::ENCODED_LENGTH;
pub const SHARED_SECRET_SIZE: usize = Fp511::ENCODED_LENGTH;

pub type SharedSecret = [u8; SHARED_SECRET_SIZE];

#[derive(Clone, Copy, Debug)]
pub struct CsidhParameters {
    pub num_primes: usize,
    pub max_exponent: i8,
    pub two_cofactor: u64,
    pub primes: [u64; NUM_PRIMES],
    /// Bound on the sampling rounds of one group action.
    pub max_action_rounds: usize,
    /// Bound on the 64-byte blocks drawn for one rejection-sampled value.
    pub max_sampling_blocks: usize,
    /// Bound on the inconclusive rounds of public key validation.
    pub max_validation_rounds: usize,
}

pub struct Csidh {
    num_primes: usize,
    max_exponent: i8,
    two_cofactor: u64,
    primes: [u64; NUM_PRIMES],
    max_action_rounds: usize,
    max_sampling_blocks: usize,
    max_validation_rounds: usize,
}

/// Secret exponents packed as signed nibbles. The exponent of the i-th prime
/// lives in byte i / 2: the high nibble for even i, the low nibble for odd i.
#[derive(Clone, PartialEq, Eq)]
pub struct CsidhPrivateKey {
    e: [u8; PRIVATE_KEY_SIZE],
}

#[derive(Clone, Copy, Debug)]
pub struct CsidhPublicKey {
    pub A: Fp511,
}

/// Walk state for the points of one quadratic residue class.
struct ClassState {
    /// Points of this class are first multiplied by k.
    k: [u64; NWORDS],
    /// Remaining steps per prime.
    e: [u8; NUM_PRIMES],
    done: bool,
}

impl ClassState {
    fn new(cofactor: u64) -> Self {
        Self {
            k: bn_from_u64(cofactor),
            e: [0u8; NUM_PRIMES],
            done: false,
        }
    }
}

impl Drop for ClassState {
    fn drop(&mut self) {
        self.k.zeroize();
        self.e.zeroize();
    }
}

impl CsidhPrivateKey {
    pub const ENCODED_LENGTH: usize = PRIVATE_KEY_SIZE;

    /// Pack signed exponents into a private key. Only the low four bits of
    /// each exponent are kept.
    pub fn from_exponents(exponents: &[i8; NUM_PRIMES]) -> Self {
        let mut sk = Self {
            e: [0u8; PRIVATE_KEY_SIZE],
        };
        for (i, v) in exponents.iter().enumerate() {
            sk.set_exponent(i, *v);
        }
        sk
    }

    /// The signed exponent of the i-th prime.
    #[inline]
    pub fn exponent(&self, i: usize) -> i8 {
        let b = self.e[i >> 1];
        let nibble = if i & 1 == 0 { b >> 4 } else { b & 0x0F };
        // sign extend from four bits
        ((nibble << 4) as i8) >> 4
    }

    #[inline]
    pub fn set_exponent(&mut self, i: usize, v: i8) {
        let nibble = (v as u8) & 0x0F;
        let b = &mut self.e[i >> 1];
        if i & 1 == 0 {
            *b = (*b & 0x0F) | (nibble << 4);
        } else {
            *b = (*b & 0xF0) | nibble;
        }
    }

    pub fn encode(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.e
    }

    /// Import a private key from its bytes. No range check is made on the
    /// exponents.
    pub fn decode(bytes: &[u8]) -> Result<Self, CsidhError> {
        let e: [u8; PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| CsidhError::InvalidLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self { e })
    }
}

impl Drop for CsidhPrivateKey {
    fn drop(&mut self) {
        self.e.zeroize();
    }
}

impl ::std::fmt::Debug for CsidhPrivateKey {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "CsidhPrivateKey {{ .. }}")
    }
}

impl CsidhPublicKey {
    pub const ENCODED_LENGTH: usize = PUBLIC_KEY_SIZE;

    pub fn encode(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.A.encode()
    }

    /// Import a public key from its bytes. Only the length is checked, see
    /// `Csidh::import_public_key()` for a validating import.
    pub fn decode(bytes: &[u8]) -> Result<Self, CsidhError> {
        let buf: &[u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| CsidhError::InvalidLength {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self {
            A: Fp511::decode_no_check(buf),
        })
    }

    /// The normalised curve y^2 = x^3 + A*x^2 + x.
    pub fn curve(&self) -> Curve {
        Curve::new(&self.A)
    }
}

impl PartialEq for CsidhPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.A.raw_limbs() == other.A.raw_limbs()
    }
}

impl Eq for CsidhPublicKey {}

impl Csidh {
    /// Build an instance from a parameter table. Panics when the table is
    /// malformed, which happens at compile time for a `const` instance.
    pub const fn new(params: &CsidhParameters) -> Self {
        assert!(
            params.num_primes == NUM_PRIMES,
            "parameter table must list exactly NUM_PRIMES primes"
        );
        // Exponents are stored as signed nibbles.
        assert!(
            params.max_exponent > 0 && params.max_exponent <= 7,
            "max_exponent must lie in [1, 7]"
        );
        assert!(
            params.two_cofactor.is_power_of_two(),
            "two_cofactor must be a power of two"
        );
        let mut i = 0;
        while i < NUM_PRIMES {
            let ell = params.primes[i];
            assert!(
                ell >= 3 && ell & 1 == 1 && ell <= VELU_MAX_DEGREE,
                "primes must be odd and at most VELU_MAX_DEGREE"
            );
            i += 1;
        }

        Self {
            num_primes: params.num_primes,
            max_exponent: params.max_exponent,
            two_cofactor: params.two_cofactor,
            primes: params.primes,
            max_action_rounds: params.max_action_rounds,
            max_sampling_blocks: params.max_sampling_blocks,
            max_validation_rounds: params.max_validation_rounds,
        }
    }

    /// The base curve y^2 = x^3 + x.
    pub const fn starting_curve(&self) -> CsidhPublicKey {
        CsidhPublicKey { A: Fp511::ZERO }
    }

    /// Sample exponents uniformly from [-max_exponent, max_exponent] by
    /// rejection on random bytes.
    pub fn generate_private_key<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
    ) -> Result<CsidhPrivateKey, CsidhError> {
        let mut exponents = [0i8; NUM_PRIMES];
        let mut buf = [0u8; 64];
        let mut filled = 0;

        for _ in 0..self.max_sampling_blocks {
            if let Err(e) = rng.try_fill_bytes(&mut buf) {
                buf.zeroize();
                exponents.zeroize();
                return Err(e.into());
            }

            for b in buf.iter() {
                if filled == self.num_primes {
                    break;
                }
                let v = *b as i8;
                if -self.max_exponent <= v && v <= self.max_exponent {
                    exponents[filled] = v;
                    filled += 1;
                }
            }

            if filled == self.num_primes {
                let sk = CsidhPrivateKey::from_exponents(&exponents);
                buf.zeroize();
                exponents.zeroize();
                return Ok(sk);
            }
        }

        buf.zeroize();
        exponents.zeroize();
        warn!(
            "private key sampling gave up after {} blocks",
            self.max_sampling_blocks
        );
        Err(CsidhError::IterationLimit("private key sampling"))
    }

    /// Act with the ideal class encoded by `private_key` on the curve of
    /// `public_key`.
    ///
    /// Random points are split by whether x^3 + A*x^2 + x is a square. Points
    /// of the residue class walk along positive exponents and the others along
    /// negative ones. Each round cleans a point of every prime it cannot be
    /// used for, then steps through the remaining primes from smallest to
    /// largest.
    pub fn action<R: CryptoRng + RngCore>(
        &self,
        public_key: &CsidhPublicKey,
        private_key: &CsidhPrivateKey,
        rng: &mut R,
    ) -> Result<CsidhPublicKey, CsidhError> {
        let mut E = public_key.curve();
        let mut classes = [
            ClassState::new(self.two_cofactor),
            ClassState::new(self.two_cofactor),
        ];

        for i in 0..self.num_primes {
            let t = private_key.exponent(i);
            let ell = self.primes[i];
            if t > 0 {
                classes[0].e[i] = t as u8;
                classes[1].k = bn_mul_u64(&classes[1].k, ell).0;
            } else if t < 0 {
                classes[1].e[i] = t.unsigned_abs();
                classes[0].k = bn_mul_u64(&classes[0].k, ell).0;
            } else {
                classes[0].k = bn_mul_u64(&classes[0].k, ell).0;
                classes[1].k = bn_mul_u64(&classes[1].k, ell).0;
            }
        }

        let mut rounds = 0;
        while !(classes[0].done && classes[1].done) {
            if rounds == self.max_action_rounds {
                warn!("group action stopped after {rounds} rounds");
                return Err(CsidhError::IterationLimit("group action"));
            }
            rounds += 1;

            let x = Fp511::try_rand(rng, self.max_sampling_blocks)?;
            let sign = if E.montgomery_rhs(&x).is_quadratic_residue() {
                0
            } else {
                1
            };
            trace!("group action round {rounds}: class {sign}");

            let class = &mut classes[sign];
            if class.done {
                continue;
            }

            let mut P = E.ladder(&PointX::from_x_coord(&x), &class.k);
            class.done = true;

            for i in 0..self.num_primes {
                if class.e[i] != 0 {
                    // cofactor: the still active primes after this one
                    let mut cof = bn_from_u64::<NWORDS>(1);
                    for j in (i + 1)..self.num_primes {
                        if class.e[j] != 0 {
                            cof = bn_mul_u64(&cof, self.primes[j]).0;
                        }
                    }

                    let K = E.ladder(&P, &cof);
                    if K.is_zero() != u32::MAX {
                        E.velu_odd_isogeny(&K, self.primes[i], std::slice::from_mut(&mut P));
                        class.e[i] -= 1;
                        if class.e[i] == 0 {
                            class.k = bn_mul_u64(&class.k, self.primes[i]).0;
                        }
                    }
                }
                class.done &= class.e[i] == 0;
            }

            E.normalise();
        }

        debug!("group action finished after {rounds} rounds");
        Ok(CsidhPublicKey { A: E.A })
    }

    pub fn generate_public_key<R: CryptoRng + RngCore>(
        &self,
        private_key: &CsidhPrivateKey,
        rng: &mut R,
    ) -> Result<CsidhPublicKey, CsidhError> {
        self.action(&self.starting_curve(), private_key, rng)
    }

    pub fn keygen<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
    ) -> Result<(CsidhPrivateKey, CsidhPublicKey), CsidhError> {
        debug!("generating CSIDH-512 key pair");
        let sk = self.generate_private_key(rng)?;
        let pk = self.generate_public_key(&sk, rng)?;
        debug!("key pair generated");

        Ok((sk, pk))
    }

    /// Walk the prime range [lo, hi) as a binary tree. Each half is reached
    /// by multiplying P by the primes of the other half. At a leaf, [ell]P
    /// must be the point at infinity, otherwise the order of P does not divide
    /// p + 1. Once the primes found in the order of P multiply past 4 sqrt(p)
    /// the curve is supersingular.
    ///
    /// Returns (is_supersingular, conclusive).
    fn cofactor_multiples(
        &self,
        E: &Curve,
        P: &PointX,
        lo: usize,
        hi: usize,
        order: &mut [u64; NWORDS],
    ) -> (bool, bool) {
        if hi - lo == 1 {
            if P.is_zero() != u32::MAX {
                let ell = self.primes[lo];
                if E.xmul_u64_vartime(P, ell).is_zero() != u32::MAX {
                    return (false, true);
                }

                *order = bn_mul_u64(order, ell).0;
                if bn_is_less_vartime(&FOUR_SQRT_P, order) {
                    return (true, true);
                }
            }
            return (false, false);
        }

        let mid = lo + (hi - lo).div_ceil(2);
        let mul_right: [u64; NWORDS] = bn_product(&self.primes[lo..mid]);
        let mul_left: [u64; NWORDS] = bn_product(&self.primes[mid..hi]);

        let Q = E.xmul_vartime(P, &mul_right);
        let res = self.cofactor_multiples(E, &Q, mid, hi, order);
        if res.1 {
            return res;
        }

        let R = E.xmul_vartime(P, &mul_left);
        self.cofactor_multiples(E, &R, lo, mid, order)
    }

    /// Check that the public key is a supersingular curve of the form
    /// y^2 = x^3 + A*x^2 + x. An error is returned only when the random
    /// source fails.
    pub fn try_validate_public_key<R: CryptoRng + RngCore>(
        &self,
        public_key: &CsidhPublicKey,
        rng: &mut R,
    ) -> Result<bool, CsidhError> {
        let A = public_key.A;
        if A.is_reduced() != u32::MAX {
            debug!("public key rejected: coefficient is not below p");
            return Ok(false);
        }

        // A = +-2 gives a singular curve
        if (A.equals(&Fp511::TWO) | A.equals(&Fp511::MINUS_TWO)) == u32::MAX {
            debug!("public key rejected: singular curve");
            return Ok(false);
        }

        let E = public_key.curve();
        for round in 0..self.max_validation_rounds {
            let x = Fp511::try_rand(rng, self.max_sampling_blocks)?;
            let mut P = PointX::from_x_coord(&x);
            for _ in 0..self.two_cofactor.trailing_zeros() {
                P = E.xdbl(&P);
            }

            let mut order = bn_from_u64::<NWORDS>(1);
            let (is_supersingular, conclusive) =
                self.cofactor_multiples(&E, &P, 0, self.num_primes, &mut order);
            if conclusive {
                debug!("public key validation: supersingular = {is_supersingular}");
                return Ok(is_supersingular);
            }
            trace!("public key validation round {round} inconclusive");
        }

        warn!(
            "public key validation inconclusive after {} rounds",
            self.max_validation_rounds
        );
        Ok(false)
    }

    /// As `try_validate_public_key()`, with a failing random source counted
    /// as a rejection.
    pub fn validate_public_key<R: CryptoRng + RngCore>(
        &self,
        public_key: &CsidhPublicKey,
        rng: &mut R,
    ) -> bool {
        match self.try_validate_public_key(public_key, rng) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("public key validation aborted: {e}");
                false
            }
        }
    }

    /// Decode a public key and check that it is valid.
    pub fn import_public_key<R: CryptoRng + RngCore>(
        &self,
        bytes: &[u8],
        rng: &mut R,
    ) -> Result<CsidhPublicKey, CsidhError> {
        let pk = CsidhPublicKey::decode(bytes)?;
        if !self.try_validate_public_key(&pk, rng)? {
            return Err(CsidhError::InvalidPublicKey);
        }
        Ok(pk)
    }

    /// Compute the shared secret with the holder of `public_key`. When the
    /// peer key is invalid it is overwritten with a random field element so
    /// that it cannot be reused, and an error is returned.
    pub fn derive_shared_secret<R: CryptoRng + RngCore>(
        &self,
        public_key: &mut CsidhPublicKey,
        private_key: &CsidhPrivateKey,
        rng: &mut R,
    ) -> Result<SharedSecret, CsidhError> {
        if !self.try_validate_public_key(public_key, rng)? {
            warn!("peer public key rejected");
            public_key.A = Fp511::try_rand(rng, self.max_sampling_blocks)?;
            return Err(CsidhError::InvalidPublicKey);
        }

        let shared = self.action(public_key, private_key, rng)?;
        Ok(shared.encode())
    }
}
