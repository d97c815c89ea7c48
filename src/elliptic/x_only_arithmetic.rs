use crate::{
    fields::{csidh::PBITS, fp511::Fp511},
    utilities::bn::bn_bit_length_vartime,
};

use super::{curve::Curve, point::PointX};

impl Curve {
    /// x-only doubling formula using the projective constant
    /// (A24 : C24) = (A + 2C : 4C). Sets (X : Z) = [2](X : Z) in place.
    #[inline(always)]
    pub fn xdbl_proj(A24: &Fp511, C24: &Fp511, X: &mut Fp511, Z: &mut Fp511) {
        let t0 = (*X + *Z).square();
        let mut t1 = (*X - *Z).square();
        let t2 = t0 - t1;
        t1 *= *C24;
        *X = t0 * t1;
        *Z = t2 * (t1 + *A24 * t2);
    }

    /// Return [2]P. Doubling the point at infinity returns infinity.
    pub fn xdbl(&self, P: &PointX) -> PointX {
        let (A24, C24) = self.a24();
        let mut Q = *P;
        Self::xdbl_proj(&A24, &C24, &mut Q.X, &mut Q.Z);
        Q
    }

    /// x-only differential formula. Note: order of arguments:
    /// P, Q, PQ for PQ = P - Q. Returns P + Q, which is undefined
    /// when P = +-Q or either input is the point at infinity.
    #[inline(always)]
    pub fn xadd(P: &PointX, Q: &PointX, PQ: &PointX) -> PointX {
        let t0 = (P.X + P.Z) * (Q.X - Q.Z);
        let t1 = (P.X - P.Z) * (Q.X + Q.Z);
        PointX {
            X: PQ.Z * (t0 + t1).square(),
            Z: PQ.X * (t0 - t1).square(),
        }
    }

    /// x-only doubling and differential addition formula
    /// Note: order of arguments:
    /// (XP : ZP), (XQ : ZQ), (XPQ: ZPQ) For PQ = P - Q
    /// Sets P = [2]P and Q = P + Q in place
    #[inline(always)]
    fn xdbladd_proj(
        A24: &Fp511,
        C24: &Fp511,
        XP: &mut Fp511,
        ZP: &mut Fp511,
        XQ: &mut Fp511,
        ZQ: &mut Fp511,
        XPQ: &Fp511,
        ZPQ: &Fp511,
    ) {
        let mut t0 = *XP + *ZP;
        let mut t1 = *XP - *ZP;
        let mut X2P = t0.square();
        let mut t2 = *XQ - *ZQ;
        let XaddQ = *XQ + *ZQ;
        t0 *= t2;
        let mut Z2P = t1.square();
        t1 *= XaddQ;
        t2 = X2P - Z2P;
        Z2P *= *C24;
        X2P *= Z2P;
        Z2P += *A24 * t2;
        Z2P *= t2;

        *XQ = (t0 + t1).square() * *ZPQ;
        *ZQ = (t0 - t1).square() * *XPQ;
        *XP = X2P;
        *ZP = Z2P;
    }

    /// Return ([2]P, P + Q) given x(P), x(Q) and x(P - Q).
    pub fn xdbladd(&self, P: &PointX, Q: &PointX, PQ: &PointX) -> (PointX, PointX) {
        let (A24, C24) = self.a24();
        let mut P2 = *P;
        let mut PaQ = *Q;
        Self::xdbladd_proj(
            &A24, &C24, &mut P2.X, &mut P2.Z, &mut PaQ.X, &mut PaQ.Z, &PQ.X, &PQ.Z,
        );
        (P2, PaQ)
    }

    /// Montgomery ladder over the low `nbitlen` bits of the little endian
    /// words `n`.
    fn ladder_bits(&self, P: &PointX, n: &[u64], nbitlen: usize) -> PointX {
        let (A24, C24) = self.a24();

        let mut R0 = PointX::INFINITY;
        let mut R1 = *P;
        let mut cc = 0u32;
        for i in (0..nbitlen).rev() {
            let ctl = (((n[i >> 6] >> (i & 63)) as u32) & 1).wrapping_neg();
            PointX::condswap(&mut R0, &mut R1, ctl ^ cc);
            Self::xdbladd_proj(
                &A24, &C24, &mut R0.X, &mut R0.Z, &mut R1.X, &mut R1.Z, &P.X, &P.Z,
            );
            cc = ctl;
        }
        PointX::condswap(&mut R0, &mut R1, cc);

        // The ladder may fail if P = (0,0) (which is a point of
        // order 2) because in that case xadd() returns Z = 0
        // systematically, so the result is considered to be the
        // point-at-infinity, which is wrong is n is odd.
        // We adjust the result in that case.
        let odd = ((n.first().copied().unwrap_or(0) as u32) & 1).wrapping_neg();
        let fix = P.X.is_zero() & !P.Z.is_zero() & odd;
        R0.X.set_cond(&Fp511::ZERO, fix);
        R0.Z.set_cond(&Fp511::ONE, fix);

        R0
    }

    /// Return [n]P for a secret scalar n < 2^511. The ladder always runs
    /// PBITS iterations.
    pub fn ladder(&self, P: &PointX, n: &[u64; 8]) -> PointX {
        self.ladder_bits(P, n, PBITS)
    }

    /// Return [n]P for a public scalar n given as little endian words. Only
    /// the significant bits of n are processed.
    pub fn xmul_vartime(&self, P: &PointX, n: &[u64]) -> PointX {
        let nbitlen = bn_bit_length_vartime(n);
        if nbitlen == 0 {
            return PointX::INFINITY;
        }
        self.ladder_bits(P, n, nbitlen)
    }

    /// Return [n]P for a public scalar n.
    pub fn xmul_u64_vartime(&self, P: &PointX, n: u64) -> PointX {
        self.xmul_vartime(P, &[n])
    }
}

#[cfg(test)]
mod test_x_only {
    use super::*;

    #[test]
    fn small_multiples_of_two_torsion() {
        // (0 : 1) has order two on every curve of the family.
        let E = Curve::new(&Fp511::from_u64(6));
        let T = PointX::new(&Fp511::ZERO, &Fp511::ONE);
        assert!(E.xmul_u64_vartime(&T, 2).is_zero() == u32::MAX);
        assert!(E.xmul_u64_vartime(&T, 3).equals(&T) == u32::MAX);
        assert!(E.ladder(&T, &[5, 0, 0, 0, 0, 0, 0, 0]).equals(&T) == u32::MAX);
        assert!(E.ladder(&T, &[6, 0, 0, 0, 0, 0, 0, 0]).is_zero() == u32::MAX);
        assert!(E.xmul_u64_vartime(&T, 0).is_zero() == u32::MAX);
    }

    #[test]
    fn conditional_point_swap() {
        let P = PointX::from_x_coord(&Fp511::from_u64(3));
        let Q = PointX::new(&Fp511::from_u64(5), &Fp511::from_u64(7));
        let (mut R, mut S) = (P, Q);
        PointX::condswap(&mut R, &mut S, 0);
        assert!((R.equals(&P) & S.equals(&Q)) == u32::MAX);
        PointX::condswap(&mut R, &mut S, u32::MAX);
        assert!((R.equals(&Q) & S.equals(&P)) == u32::MAX);
    }
}
