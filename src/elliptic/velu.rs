use crate::fields::fp511::Fp511;

use super::{curve::Curve, point::PointX};

/// Largest odd degree `velu_odd_isogeny()` accepts, the top CSIDH-512 prime.
pub const VELU_MAX_DEGREE: u64 = 587;

const MAX_KERNEL_MULTIPLES: usize = (VELU_MAX_DEGREE as usize - 1) / 2;

/// A structure which allows iterating over [i]P = (X : Z) for i = 1, 2, ...
/// The caller decides how many multiples to take.
struct PointXMultiples {
    P: PointX,
    Q: PointX,
    R: PointX,
    i: usize,
}

impl PointXMultiples {
    fn new(A24: &Fp511, C24: &Fp511, P: &PointX) -> Self {
        // precompute [2]P for the second output of multiples
        let mut P2 = *P;
        Curve::xdbl_proj(A24, C24, &mut P2.X, &mut P2.Z);

        Self {
            P: *P,
            Q: *P,
            R: P2,
            i: 0,
        }
    }
}

impl Iterator for PointXMultiples {
    type Item = PointX;

    fn next(&mut self) -> Option<Self::Item> {
        self.i += 1;

        if self.i == 1 {
            // For the first call, we just want to return [i]P = P
            return Some(self.P);
        } else if self.i == 2 {
            // For the second call, we want to return [2]P which has been computed
            // on creation of the type
            return Some(self.R);
        }
        // For all other calls, set R = [i]P = [i-1]P + P using [i-2]P as difference
        let S = Curve::xadd(&self.R, &self.P, &self.Q);
        (self.Q, self.R) = (self.R, S);

        Some(self.R)
    }
}

impl Curve {
    /// Compute the codomain of the isogeny of odd degree `degree` with kernel
    /// generated by `kernel` and push each of `img_points` through it.
    ///
    /// The computation runs through the twisted Edwards model with
    /// (a : d) = (A + 2C : A - 2C) and has cost O(degree). The kernel must
    /// have exact order `degree`, at most `VELU_MAX_DEGREE`. The resulting
    /// (A : C) is not normalised.
    pub fn velu_odd_isogeny(&mut self, kernel: &PointX, degree: u64, img_points: &mut [PointX]) {
        let (A24, C24) = self.a24();

        // Convert from Montgomery to projective twisted Edwards (a_ed : d_ed)
        let C2 = self.C.mul2();
        let mut a_ed = self.A + C2;
        let mut d_ed = self.A - C2;

        // We precompute (X - Z) and (X + Z) for (X : Z) = [i]K for i in 1..=(ell - 1)/2
        let d = (degree >> 1) as usize;
        assert!(
            degree <= VELU_MAX_DEGREE,
            "isogeny degree {degree} above {VELU_MAX_DEGREE}"
        );
        let mut multiples = [(Fp511::ZERO, Fp511::ZERO); MAX_KERNEL_MULTIPLES];
        for (c, K) in multiples
            .iter_mut()
            .zip(PointXMultiples::new(&A24, &C24, kernel).take(d))
        {
            *c = (K.X - K.Z, K.X + K.Z);
        }
        let constants = &multiples[..d];

        // Compute the product of the edward multiples
        let mut prod_Y = Fp511::ONE;
        let mut prod_Z = Fp511::ONE;
        for (Y_ed, Z_ed) in constants.iter() {
            prod_Y *= *Y_ed;
            prod_Z *= *Z_ed;
        }

        // Compute prod_Y^8 and prod_Z^8
        for _ in 0..3 {
            prod_Y.set_square();
            prod_Z.set_square();
        }

        // Compute the new codomain in projective twisted Edwards
        // a_new = a_old^ell * prod_Z^8
        // d_new = d_old^ell * prod_Y^8
        a_ed = a_ed.pow_u64(degree);
        d_ed = d_ed.pow_u64(degree);
        a_ed *= prod_Z;
        d_ed *= prod_Y;

        // Evaluate each point through the isogeny
        for P in img_points.iter_mut() {
            let P_sum = P.X + P.Z;
            let P_diff = P.X - P.Z;

            let mut X_new = Fp511::ONE;
            let mut Z_new = Fp511::ONE;
            for (Y_ed, Z_ed) in constants.iter() {
                let EZ_diff = *Z_ed * P_diff;
                let EY_sum = *Y_ed * P_sum;
                X_new *= EZ_diff + EY_sum;
                Z_new *= EZ_diff - EY_sum;
            }

            P.X *= X_new.square();
            P.Z *= Z_new.square();
        }

        // Convert back to Montgomery (A : C) = (2 (a + d) : a - d)
        self.A = (a_ed + d_ed).mul2();
        self.C = a_ed - d_ed;
    }
}
