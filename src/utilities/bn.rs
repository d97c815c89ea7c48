//! Fixed-width unsigned integers stored as little endian u64 words.
//!
//! These are used for the integer scalars of the CSIDH algorithms (cofactors,
//! point orders), never for field elements. Everything here is `const fn` so
//! the parameter table can be checked at compile time.

use fp2::utils64::umull_add;

/// Given an integer `a` represented with little endian u64 words, return the number
/// of leading zeros of the binary representation.
fn bn_leading_zeros_vartime(a: &[u64]) -> u32 {
    let mut leading_zeros: u32 = 0;
    for word in a.iter().rev() {
        leading_zeros += word.leading_zeros();
        if *word != 0 {
            break;
        }
    }

    leading_zeros
}

/// Return the bit length of an integer `a` represented as little endian u64 words.
pub fn bn_bit_length_vartime(a: &[u64]) -> usize {
    (a.len() << 6) - (bn_leading_zeros_vartime(a) as usize)
}

/// The integer `x` as an N-word big number.
pub const fn bn_from_u64<const N: usize>(x: u64) -> [u64; N] {
    let mut r = [0u64; N];
    r[0] = x;
    r
}

/// Return (a + b) mod 2^(64 N) and the carry out.
pub const fn bn_add<const N: usize>(a: &[u64; N], b: &[u64; N]) -> ([u64; N], u8) {
    let mut r = [0u64; N];
    let mut cc = 0u8;
    let mut i = 0;
    while i < N {
        let z = (a[i] as u128) + (b[i] as u128) + (cc as u128);
        r[i] = z as u64;
        cc = (z >> 64) as u8;
        i += 1;
    }
    (r, cc)
}

/// Return (a - b) mod 2^(64 N) and the borrow out, which is 1 exactly when a < b.
pub const fn bn_sub<const N: usize>(a: &[u64; N], b: &[u64; N]) -> ([u64; N], u8) {
    let mut r = [0u64; N];
    let mut cc = 0u8;
    let mut i = 0;
    while i < N {
        let z = (a[i] as u128).wrapping_sub(b[i] as u128).wrapping_sub(cc as u128);
        r[i] = z as u64;
        cc = (z >> 127) as u8;
        i += 1;
    }
    (r, cc)
}

/// Return (a * b) mod 2^(64 N) and the word which overflowed.
pub const fn bn_mul_u64<const N: usize>(a: &[u64; N], b: u64) -> ([u64; N], u64) {
    let mut r = [0u64; N];
    let mut carry = 0u64;
    let mut i = 0;
    while i < N {
        (r[i], carry) = umull_add(a[i], b, carry);
        i += 1;
    }
    (r, carry)
}

/// Return the product of all `factors`, truncated to N words.
pub const fn bn_product<const N: usize>(factors: &[u64]) -> [u64; N] {
    let mut r = bn_from_u64::<N>(1);
    let mut i = 0;
    while i < factors.len() {
        r = bn_mul_u64(&r, factors[i]).0;
        i += 1;
    }
    r
}

/// Return true when a < b. Variable time, only for public values.
pub const fn bn_is_less_vartime<const N: usize>(a: &[u64; N], b: &[u64; N]) -> bool {
    bn_sub(a, b).1 == 1
}

/// Return true when a == b. Variable time, only for public values.
pub const fn bn_eq_vartime<const N: usize>(a: &[u64; N], b: &[u64; N]) -> bool {
    let mut i = 0;
    while i < N {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_length() {
        assert_eq!(bn_bit_length_vartime(&[0, 0, 0]), 0);
        assert_eq!(bn_bit_length_vartime(&[1, 0, 0]), 1);
        assert_eq!(bn_bit_length_vartime(&[u64::MAX, 2, 0]), 66);
        assert_eq!(bn_bit_length_vartime(&[0, 0, 1 << 63]), 192);
    }

    #[test]
    fn add_carry() {
        let a = [u64::MAX; 4];
        let (r, c) = bn_add(&a, &bn_from_u64(1));
        assert_eq!(r, [0; 4]);
        assert_eq!(c, 1);

        let b = [u64::MAX, u64::MAX, u64::MAX, 0];
        let c2 = [u64::MAX, u64::MAX, u64::MAX - 5, 0];
        assert_eq!(bn_add(&b, &c2).1, 0);
    }

    #[test]
    fn sub_borrow() {
        let a = [u64::MAX, 1, 0, 0];
        let b = [u64::MAX, 2, 0, 0];
        assert_eq!(bn_sub(&a, &b).1, 1);
        assert_eq!(bn_sub(&b, &a), ([0, 1, 0, 0], 0));
        assert!(bn_is_less_vartime(&a, &b));
        assert!(!bn_is_less_vartime(&b, &a));
        assert!(!bn_is_less_vartime(&a, &a));
    }

    #[test]
    fn mul_u64() {
        let a = [u64::MAX, u64::MAX];
        let (r, hi) = bn_mul_u64(&a, 3);
        // (2^128 - 1) * 3 = 2^129 + 2^128 - 3
        assert_eq!(r, [u64::MAX - 2, u64::MAX]);
        assert_eq!(hi, 2);

        let n: [u64; 2] = bn_product(&[3, 5, 7, 11]);
        assert!(bn_eq_vartime(&n, &[1155, 0]));
    }
}
