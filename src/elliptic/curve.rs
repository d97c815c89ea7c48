use crate::fields::fp511::Fp511;

/// Montgomery curve C*y^2 = x^3 + (A/C)*x^2 + x given by the projective
/// coefficient (A : C).
#[derive(Clone, Copy, Debug)]
pub struct Curve {
    pub A: Fp511,
    pub C: Fp511,
}

impl Curve {
    /// The curve y^2 = x^3 + x, the base curve of CSIDH.
    pub const E0: Self = Self {
        A: Fp511::ZERO,
        C: Fp511::ONE,
    };

    /// Create a new curve instance with C = 1. WARNING: no check is made that
    /// the curve is non-singular (A != +-2).
    pub fn new(A: &Fp511) -> Self {
        Self { A: *A, C: Fp511::ONE }
    }

    pub fn new_proj(A: &Fp511, C: &Fp511) -> Self {
        Self { A: *A, C: *C }
    }

    /// The ladder constant (A24 : C24) = (A + 2C : 4C).
    #[inline]
    pub fn a24(&self) -> (Fp511, Fp511) {
        let C2 = self.C.mul2();
        (self.A + C2, C2.mul2())
    }

    /// Scale the coefficient so that C = 1, costs one inversion.
    pub fn normalise(&mut self) {
        self.A *= self.C.invert();
        self.C = Fp511::ONE;
    }

    /// Evaluate x^3 + A*x^2 + x. Expects a normalised curve (C = 1).
    pub fn montgomery_rhs(&self, x: &Fp511) -> Fp511 {
        let mut t = *x + self.A;
        t *= *x;
        t += Fp511::ONE;
        t * *x
    }

    /// Return the j-invariant 256 * (A^2 - 3C^2)^3 / (C^4 * (A^2 - 4C^2)).
    pub fn j_invariant(&self) -> Fp511 {
        let AA = self.A.square();
        let CC = self.C.square();
        let CC3 = CC + CC.mul2();
        let CC4 = CC.mul2().mul2();

        let mut num = AA - CC3;
        num = num.square() * num;
        for _ in 0..8 {
            num.set_mul2();
        }

        let den = CC.square() * (AA - CC4);
        num * den.invert()
    }
}

impl ::std::fmt::Display for Curve {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "Montgomery Curve: (A : C) = ({} : {})", self.A, self.C)
    }
}
