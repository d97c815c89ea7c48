//! Arithmetic in the CSIDH-512 base field GF(p).
//!
//! `Csidh512` is the constant-time Montgomery field generated by `fp2` for
//! the CSIDH-512 modulus: R = 2^512, elements always fully reduced into
//! [0, p), one conditional correction per operation and u32 masks
//! (0xFFFFFFFF for true, 0x00000000 for false) for every comparison.
//!
//! `Fp511` wraps it with what the key exchange needs on top: a fixed-window
//! exponentiation, Euler's criterion, the Montgomery-limb byte encoding used
//! by keys and bounded rejection sampling.

use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use fp2::utils64::subborrow_u64;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use super::csidh::{CSIDH_512_MODULUS, MONT_MINUS_TWO, NWORDS, P_MINUS_1_HALF};
use crate::error::CsidhError;

fp2::define_fp_core!(
    typename = Csidh512,
    modulus = CSIDH_512_MODULUS,
);

#[derive(Clone, Copy, Debug)]
pub struct Fp511(Csidh512);

fn limbs_to_bytes(limbs: &[u64; NWORDS]) -> [u8; Fp511::ENCODED_LENGTH] {
    let mut out = [0u8; Fp511::ENCODED_LENGTH];
    for (chunk, limb) in out.chunks_exact_mut(8).zip(limbs.iter()) {
        chunk.copy_from_slice(&limb.to_le_bytes());
    }
    out
}

fn bytes_to_limbs(bytes: &[u8; Fp511::ENCODED_LENGTH]) -> [u64; NWORDS] {
    let mut limbs = [0u64; NWORDS];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(word);
    }
    limbs
}

impl Fp511 {
    pub const ENCODED_LENGTH: usize = Csidh512::ENCODED_LENGTH;

    pub const ZERO: Self = Self(Csidh512::ZERO);
    pub const ONE: Self = Self(Csidh512::ONE);
    pub const TWO: Self = Self(Csidh512::TWO);
    pub const MINUS_TWO: Self = Self::from_raw_limbs(MONT_MINUS_TWO);
    pub const FOUR: Self = Self(Csidh512::FOUR);

    /// Build an element from its Montgomery-domain limbs. WARNING: no check
    /// is made that the limbs are below p.
    pub const fn from_raw_limbs(limbs: [u64; NWORDS]) -> Self {
        Self(Csidh512::new(limbs))
    }

    /// The Montgomery-domain limbs of the element.
    pub const fn raw_limbs(&self) -> [u64; NWORDS] {
        self.0.0
    }

    /// Convert an integer into the field.
    pub fn from_u64(x: u64) -> Self {
        Self(Csidh512::from(x))
    }

    /// Convert a signed integer into the field.
    pub fn from_i32(x: i32) -> Self {
        Self(Csidh512::from(x))
    }

    /// Build an element from the canonical integer `limbs`. The second value
    /// is 0xFFFFFFFF when the integer was below p; otherwise the element is
    /// the integer reduced modulo p.
    pub fn from_canonical_limbs(limbs: &[u64; NWORDS]) -> (Self, u32) {
        let ok = Self::from_raw_limbs(*limbs).is_reduced();
        (Self(Csidh512::decode_reduce(&limbs_to_bytes(limbs))), ok)
    }

    /// Decode 64 little endian bytes holding the canonical integer.
    pub fn from_canonical_bytes(bytes: &[u8; Self::ENCODED_LENGTH]) -> (Self, u32) {
        Self::from_canonical_limbs(&bytes_to_limbs(bytes))
    }

    /// The canonical integer in [0, p) represented by this element.
    pub fn to_canonical_limbs(&self) -> [u64; NWORDS] {
        bytes_to_limbs(&self.0.encode())
    }

    /// Encode the Montgomery-domain limbs as 64 little endian bytes.
    pub fn encode(&self) -> [u8; Self::ENCODED_LENGTH] {
        limbs_to_bytes(&self.0.0)
    }

    /// Decode 64 little endian bytes as Montgomery-domain limbs. The value is
    /// not reduced; use `is_reduced()` to check it.
    pub fn decode_no_check(bytes: &[u8; Self::ENCODED_LENGTH]) -> Self {
        Self::from_raw_limbs(bytes_to_limbs(bytes))
    }

    /// Return 0xFFFFFFFF if the stored integer is below p and 0 otherwise.
    pub fn is_reduced(&self) -> u32 {
        let mut cc = 0u8;
        for i in 0..NWORDS {
            (_, cc) = subborrow_u64(self.0.0[i], CSIDH_512_MODULUS[i], cc);
        }
        (cc as u32).wrapping_neg()
    }

    /// Return 0xFFFFFFFF if self is zero and 0 otherwise.
    #[inline(always)]
    pub fn is_zero(&self) -> u32 {
        self.0.is_zero()
    }

    /// Return 0xFFFFFFFF if self == rhs and 0 otherwise.
    #[inline(always)]
    pub fn equals(&self, rhs: &Self) -> u32 {
        self.0.equals(&rhs.0)
    }

    /// Set self to rhs when ctl = 0xFFFFFFFF, leave it when ctl = 0.
    #[inline(always)]
    pub fn set_cond(&mut self, rhs: &Self, ctl: u32) {
        self.0.set_cond(&rhs.0, ctl);
    }

    /// Return a0 when ctl = 0 and a1 when ctl = 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        Self(Csidh512::select(&a0.0, &a1.0, ctl))
    }

    /// Swap a and b when ctl = 0xFFFFFFFF, leave them when ctl = 0.
    #[inline(always)]
    pub fn condswap(a: &mut Self, b: &mut Self, ctl: u32) {
        Csidh512::cond_swap(&mut a.0, &mut b.0, ctl);
    }

    #[inline(always)]
    pub fn set_square(&mut self) {
        self.0.set_square();
    }

    #[inline(always)]
    pub fn square(self) -> Self {
        Self(self.0.square())
    }

    #[inline(always)]
    pub fn set_mul2(&mut self) {
        self.0.set_mul2();
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        Self(self.0.mul2())
    }

    /// Exponentiation with a fixed 4-bit window, scanning `e` from the top.
    /// All windows of all words are processed so the sequence of operations
    /// depends only on the length of `e`. Each table lookup reads every entry.
    fn pow_words(&self, e: &[u64]) -> Self {
        let mut table = [Self::ONE; 16];
        for i in 1..16 {
            table[i] = table[i - 1] * *self;
        }

        let mut r = Self::ONE;
        let mut first = true;
        for word in e.iter().rev() {
            for k in (0..16).rev() {
                if !first {
                    r.0.set_n_square(4);
                }
                first = false;

                let w = ((word >> (4 * k)) & 0xF) as u32;
                let mut s = Self::ONE;
                for (j, entry) in table.iter().enumerate() {
                    // j ^ w < 16, so only j == w borrows into the top bit
                    let ctl = (((j as u32) ^ w).wrapping_sub(1) >> 31).wrapping_neg();
                    s.set_cond(entry, ctl);
                }
                r *= s;
            }
        }
        r
    }

    /// Return self^e for a 512-bit exponent given as little endian words.
    pub fn pow(&self, e: &[u64; NWORDS]) -> Self {
        self.pow_words(e)
    }

    /// Return self^e for a 64-bit exponent.
    pub fn pow_u64(&self, e: u64) -> Self {
        self.pow_words(&[e])
    }

    /// Return 1/self. The inverse of zero is zero.
    pub fn invert(&self) -> Self {
        Self(self.0.invert())
    }

    /// Euler's criterion: 0xFFFFFFFF if self is a non-zero square and 0
    /// otherwise. Unlike the Legendre test of `Csidh512`, zero is not
    /// counted as a square.
    pub fn is_square(&self) -> u32 {
        self.pow(&P_MINUS_1_HALF).equals(&Self::ONE)
    }

    /// Euler's criterion as a boolean.
    pub fn is_quadratic_residue(&self) -> bool {
        self.is_square() == u32::MAX
    }

    /// Sample a uniform element of [0, p) by rejection, drawing at most
    /// `max_attempts` 64-byte blocks from `rng`.
    pub fn try_rand<R: CryptoRng + RngCore>(
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<Self, CsidhError> {
        let mut buf = [0u8; Self::ENCODED_LENGTH];
        for _ in 0..max_attempts {
            if let Err(e) = rng.try_fill_bytes(&mut buf) {
                buf.zeroize();
                return Err(CsidhError::Rng(e));
            }
            // p < 2^511
            buf[Self::ENCODED_LENGTH - 1] &= 0x7F;
            let x = Self::decode_no_check(&buf);
            if x.is_reduced() == u32::MAX {
                buf.zeroize();
                return Ok(x);
            }
        }
        buf.zeroize();
        Err(CsidhError::IterationLimit("field element sampling"))
    }
}

impl Add for Fp511 {
    type Output = Fp511;

    #[inline(always)]
    fn add(self, other: Fp511) -> Fp511 {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Fp511 {
    #[inline(always)]
    fn add_assign(&mut self, other: Fp511) {
        self.0 += other.0;
    }
}

impl Sub for Fp511 {
    type Output = Fp511;

    #[inline(always)]
    fn sub(self, other: Fp511) -> Fp511 {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Fp511 {
    #[inline(always)]
    fn sub_assign(&mut self, other: Fp511) {
        self.0 -= other.0;
    }
}

impl Mul for Fp511 {
    type Output = Fp511;

    #[inline(always)]
    fn mul(self, other: Fp511) -> Fp511 {
        Self(self.0 * other.0)
    }
}

impl MulAssign for Fp511 {
    #[inline(always)]
    fn mul_assign(&mut self, other: Fp511) {
        self.0 *= other.0;
    }
}

impl Neg for Fp511 {
    type Output = Fp511;

    #[inline(always)]
    fn neg(self) -> Fp511 {
        Self(-self.0)
    }
}

impl ::std::fmt::Display for Fp511 {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
