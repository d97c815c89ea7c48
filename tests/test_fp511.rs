#![allow(non_snake_case)]

#[cfg(test)]
mod test_fp511 {
    use csidh::fields::{
        csidh::{CSIDH_512_MODULUS, NWORDS, P_MINUS_1_HALF},
        fp511::Fp511,
    };
    use csidh::utilities::test_utils::drng::DRNG;
    use num_bigint::BigUint;
    use rand::Rng;

    const TRIALS: usize = 10_000;

    fn to_big(limbs: &[u64; NWORDS]) -> BigUint {
        let bytes: Vec<u8> = limbs.iter().flat_map(|w| w.to_le_bytes()).collect();
        BigUint::from_bytes_le(&bytes)
    }

    fn from_big(x: &BigUint) -> [u64; NWORDS] {
        let mut limbs = [0u64; NWORDS];
        for (l, d) in limbs.iter_mut().zip(x.to_u64_digits()) {
            *l = d;
        }
        limbs
    }

    fn modulus() -> BigUint {
        to_big(&CSIDH_512_MODULUS)
    }

    fn random_limbs<R: Rng>(rng: &mut R) -> [u64; NWORDS] {
        let mut limbs = [0u64; NWORDS];
        for l in limbs.iter_mut() {
            *l = rng.random::<u64>();
        }
        limbs
    }

    /// A uniform-ish element with its canonical value.
    fn random_element<R: Rng>(rng: &mut R) -> (Fp511, BigUint) {
        let x = to_big(&random_limbs(rng)) % modulus();
        let (a, ok) = Fp511::from_canonical_limbs(&from_big(&x));
        assert!(ok == u32::MAX);
        (a, x)
    }

    #[test]
    fn test_add_sub_mul() {
        let mut rng = rand::rng();
        let p = modulus();

        for _ in 0..TRIALS {
            let (a, x) = random_element(&mut rng);
            let (b, y) = random_element(&mut rng);

            let sum = (&x + &y) % &p;
            let diff = (&x + &p - &y) % &p;
            let prod = (&x * &y) % &p;

            assert_eq!((a + b).to_canonical_limbs(), from_big(&sum));
            assert_eq!((a - b).to_canonical_limbs(), from_big(&diff));
            assert_eq!((a * b).to_canonical_limbs(), from_big(&prod));
            assert_eq!(a.square().to_canonical_limbs(), from_big(&((&x * &x) % &p)));
            assert_eq!((-a).to_canonical_limbs(), from_big(&((&p - &x) % &p)));
            assert_eq!(a.mul2().to_canonical_limbs(), from_big(&((&x + &x) % &p)));
        }
    }

    #[test]
    fn test_pow() {
        let mut rng = rand::rng();
        let p = modulus();

        for _ in 0..20 {
            let (a, x) = random_element(&mut rng);
            let e = random_limbs(&mut rng);
            let expected = x.modpow(&to_big(&e), &p);
            assert_eq!(a.pow(&e).to_canonical_limbs(), from_big(&expected));

            let e64 = rng.random::<u64>();
            let expected = x.modpow(&BigUint::from(e64), &p);
            assert_eq!(a.pow_u64(e64).to_canonical_limbs(), from_big(&expected));
        }

        // Edge exponents
        let (a, _) = random_element(&mut rng);
        assert!(a.pow_u64(0).equals(&Fp511::ONE) == u32::MAX);
        assert!(a.pow_u64(1).equals(&a) == u32::MAX);
        assert!(a.pow(&[0u64; NWORDS]).equals(&Fp511::ONE) == u32::MAX);
    }

    #[test]
    fn test_invert() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let (a, _) = random_element(&mut rng);
            if a.is_zero() == u32::MAX {
                continue;
            }
            assert!((a * a.invert()).equals(&Fp511::ONE) == u32::MAX);
        }
        assert!(Fp511::ZERO.invert().is_zero() == u32::MAX);
    }

    #[test]
    fn test_quadratic_residues() {
        let p = modulus();
        let half = to_big(&P_MINUS_1_HALF);
        let one = BigUint::from(1u32);

        let mut count = 0;
        for i in 1u64..1000 {
            let a = Fp511::from_u64(i);
            let expected = BigUint::from(i).modpow(&half, &p) == one;
            assert_eq!(a.is_quadratic_residue(), expected, "residue test failed for {i}");
            if expected {
                count += 1;
            }
        }
        assert_eq!(count, 641);
        assert!(Fp511::ONE.is_square() == u32::MAX);
        assert!(Fp511::ZERO.is_square() == 0);
    }

    #[test]
    fn test_montgomery_mul_vectors() {
        let m1 = Fp511::from_raw_limbs([
            0x85E2579C786882D0,
            0x4E3433657E18DA95,
            0x850AE5507965A0B3,
            0xA15BC4E676475964,
            0,
            0,
            0,
            0,
        ]);
        let m2 = Fp511::from_raw_limbs([
            0x85E2579C786882CF,
            0x4E3433657E18DA95,
            0x850AE5507965A0B3,
            0xA15BC4E676475964,
            0,
            0,
            0,
            0,
        ]);

        let expected_mul = [
            0x51534771258C4624,
            0x2BFEDE86504E2160,
            0xE8127D5E9329670B,
            0x0C84DBD584491D75,
            0x656C73C68B16E38C,
            0x01C0DA470B30B8DE,
            0x2532E3903EAA950B,
            0x3F2C28EA97FE6FEC,
        ];
        let expected_sqr = [
            0xAEBF46E92C88A4B4,
            0xCFE857977B946347,
            0xD3B264FF08493901,
            0x6EEB3D23746B6C7C,
            0xC0CA874A349D64B4,
            0x7AD4A38B406F8504,
            0x38B6B6CEB82472FB,
            0x1587015FD7DDFC7D,
        ];

        assert_eq!((m1 * m2).raw_limbs(), expected_mul);
        assert_eq!(m1.square().raw_limbs(), expected_sqr);
    }

    #[test]
    fn test_small_constants() {
        assert!(Fp511::from_u64(1).equals(&Fp511::ONE) == u32::MAX);
        assert!(Fp511::from_u64(2).equals(&Fp511::TWO) == u32::MAX);
        assert!(Fp511::from_u64(4).equals(&Fp511::FOUR) == u32::MAX);
        assert!(Fp511::from_i32(-2).equals(&Fp511::MINUS_TWO) == u32::MAX);
        assert!((Fp511::TWO + Fp511::MINUS_TWO).is_zero() == u32::MAX);
        assert!(Fp511::from_i32(-7).equals(&(-Fp511::from_u64(7))) == u32::MAX);
        assert_eq!(Fp511::from_u64(6).to_canonical_limbs(), [6, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_reduction_checks() {
        let p = Fp511::from_raw_limbs(CSIDH_512_MODULUS);
        assert!(p.is_reduced() == 0);

        let mut p_minus_1 = CSIDH_512_MODULUS;
        p_minus_1[0] -= 1;
        assert!(Fp511::from_raw_limbs(p_minus_1).is_reduced() == u32::MAX);
        assert!(Fp511::from_raw_limbs([u64::MAX; NWORDS]).is_reduced() == 0);

        let (_, ok) = Fp511::from_canonical_limbs(&CSIDH_512_MODULUS);
        assert!(ok == 0);
    }

    #[test]
    fn test_encoding() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let (a, _) = random_element(&mut rng);
            let b = Fp511::decode_no_check(&a.encode());
            assert!(a.equals(&b) == u32::MAX);
        }

        // Montgomery encoding of one is R mod p
        let one = Fp511::ONE.encode();
        assert_eq!(&one[..8], &0xC8FC8DF598726F0Au64.to_le_bytes());
    }

    #[test]
    fn test_conditional_ops() {
        let mut rng = rand::rng();
        let (a, _) = random_element(&mut rng);
        let (b, _) = random_element(&mut rng);

        assert!(Fp511::select(&a, &b, 0).equals(&a) == u32::MAX);
        assert!(Fp511::select(&a, &b, u32::MAX).equals(&b) == u32::MAX);

        let (mut x, mut y) = (a, b);
        Fp511::condswap(&mut x, &mut y, 0);
        assert!((x.equals(&a) & y.equals(&b)) == u32::MAX);
        Fp511::condswap(&mut x, &mut y, u32::MAX);
        assert!((x.equals(&b) & y.equals(&a)) == u32::MAX);

        let mut z = a;
        z.set_cond(&b, 0);
        assert!(z.equals(&a) == u32::MAX);
        z.set_cond(&b, u32::MAX);
        assert!(z.equals(&b) == u32::MAX);
    }

    #[test]
    fn test_rand() {
        let mut rng = DRNG::from_seed("test_fp511_rand".as_bytes());
        let mut seen_top_bits = 0u64;
        for _ in 0..100 {
            let a = Fp511::try_rand(&mut rng, 10).unwrap();
            assert!(a.is_reduced() == u32::MAX);
            seen_top_bits |= a.raw_limbs()[NWORDS - 1] >> 60;
        }
        // The sampled values cover the high bits of [0, p).
        assert_ne!(seen_top_bits, 0);
    }
}
