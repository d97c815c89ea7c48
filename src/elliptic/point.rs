use crate::fields::fp511::Fp511;

/// Special x-only representation of a point (or a pair of points,
/// since two Y coordinates may match a given X).
#[derive(Clone, Copy, Debug)]
pub struct PointX {
    pub X: Fp511,
    pub Z: Fp511,
}

impl PointX {
    /// The neutral point of the group.
    pub const INFINITY: Self = Self {
        X: Fp511::ONE,
        Z: Fp511::ZERO,
    };

    /// Create a point from coordinates. WARNING: no check is made on the point.
    pub fn new(X: &Fp511, Z: &Fp511) -> Self {
        Self { X: *X, Z: *Z }
    }

    pub const fn from_x_coord(X: &Fp511) -> Self {
        Self { X: *X, Z: Fp511::ONE }
    }

    /// Point at infinity is of the form (X : 0)
    /// Returns 0xFFFFFFFF if Z == 0 and 0 otherwise
    pub fn is_zero(&self) -> u32 {
        self.Z.is_zero()
    }

    /// Return 0xFFFFFFFF if self and rhs represent the same point.
    /// Otherwise, return 0x00000000.
    pub fn equals(&self, rhs: &PointX) -> u32 {
        let inf1 = self.is_zero();
        let inf2 = rhs.is_zero();
        let e = (self.X * rhs.Z).equals(&(rhs.X * self.Z));
        (inf1 & inf2) | (!inf1 & !inf2 & e)
    }

    #[inline]
    pub fn condswap(P: &mut Self, Q: &mut Self, ctl: u32) {
        Fp511::condswap(&mut P.X, &mut Q.X, ctl);
        Fp511::condswap(&mut P.Z, &mut Q.Z, ctl);
    }
}

impl ::std::fmt::Display for PointX {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "PointX: ({} : {})", self.X, self.Z)
    }
}
