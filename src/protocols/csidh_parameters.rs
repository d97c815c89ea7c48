use super::csidh::{Csidh, CsidhParameters};

mod csidh_512 {
    use crate::{
        fields::csidh::{CSIDH_512_MODULUS, NWORDS},
        protocols::csidh::{CsidhParameters, NUM_PRIMES},
        utilities::bn::{bn_add, bn_eq_vartime, bn_from_u64, bn_mul_u64, bn_product},
    };

    const MAX_EXPONENT: i8 = 5;
    const COFACTOR: u64 = 4;
    const PRIMES: [u64; NUM_PRIMES] = [
         3,   5,   7,  11,  13,  17,  19,  23,  29,  31,  37,  41,  43,  47,  53,  59,
        61,  67,  71,  73,  79,  83,  89,  97, 101, 103, 107, 109, 113, 127, 131, 137,
       139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227,
       229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307, 311, 313,
       317, 331, 337, 347, 349, 353, 359, 367, 373, 587,
    ];

    // p + 1 = 4 * 3 * 5 * ... * 587
    const _: () = {
        let (n, hi) = bn_mul_u64(&bn_product::<NWORDS>(&PRIMES), COFACTOR);
        let (p_plus_1, _) = bn_add(&CSIDH_512_MODULUS, &bn_from_u64(1));
        assert!(hi == 0);
        assert!(bn_eq_vartime(&n, &p_plus_1));
    };

    pub const CSIDH_PARAMS: CsidhParameters = CsidhParameters {
        num_primes: NUM_PRIMES,
        max_exponent: MAX_EXPONENT,
        two_cofactor: COFACTOR,
        primes: PRIMES,
        max_action_rounds: 1000,
        max_sampling_blocks: 1000,
        max_validation_rounds: 10,
    };
}

pub const CSIDH_512_PARAMS: CsidhParameters = csidh_512::CSIDH_PARAMS;
pub const CSIDH_512: Csidh = Csidh::new(&csidh_512::CSIDH_PARAMS);
