//! Jacobian points

use super::{AffinePoint, FieldElement};
use core::ops::{Add, AddAssign, Neg, Sub};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq},
    zeroize::DefaultIsZeroes,
};

/// A point on the secp256k1 curve in Jacobian coordinates.
///
/// `(X, Y, Z)` represents the affine point `(X / Z², Y / Z³)`. Any point
/// with `Z = 0` is the identity.
#[derive(Clone, Copy, Debug)]
pub struct JacobianPoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl JacobianPoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Base point of secp256k1.
    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE,
    };

    /// Is this point the identity point?
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Returns the affine representation of this point.
    ///
    /// Costs one field inversion.
    pub fn to_affine(&self) -> AffinePoint {
        self.z
            .invert()
            .map(|zinv| {
                let zinv2 = zinv.square();
                let x = self.x.mul(&zinv2);
                let y = self.y.mul(&zinv2).mul(&zinv);
                AffinePoint::new(x, y)
            })
            .unwrap_or(AffinePoint::IDENTITY)
    }

    /// Checks whether the affine x-coordinate of this point equals `x`,
    /// without an inversion: `x·Z² == X`.
    ///
    /// Always `false` for the identity. Variable time.
    pub fn eq_x_vartime(&self, x: &FieldElement) -> bool {
        if bool::from(self.is_identity()) {
            return false;
        }
        x.mul(&self.z.square()) == self.x
    }

    /// Returns `-self`.
    pub fn negate(&self) -> JacobianPoint {
        JacobianPoint {
            x: self.x,
            y: self.y.negate(),
            z: self.z,
        }
    }

    /// Returns `[2] self`.
    ///
    /// "dbl-2009-l" for `a = 0`. The identity maps to a point with `Z = 0`.
    pub fn double(&self) -> JacobianPoint {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = self.x.add(&b).square().sub(&a).sub(&c).double();
        let e = a.double().add(&a);
        let f = e.square();

        let x3 = f.sub(&d.double());
        let y3 = e.mul(&d.sub(&x3)).sub(&c.double().double().double());
        let z3 = self.y.mul(&self.z).double();

        JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// "add-2007-bl" without any handling of the exceptional cases.
    ///
    /// Returns the sum together with `H` and `r`: `H = r = 0` means the
    /// inputs were equal and the sum is garbage.
    fn add_unchecked(&self, other: &JacobianPoint) -> (JacobianPoint, FieldElement, FieldElement) {
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);
        let h = u2.sub(&u1);
        let i = h.double().square();
        let j = h.mul(&i);
        let r = s2.sub(&s1).double();
        let v = u1.mul(&i);

        let x3 = r.square().sub(&j).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&j).double());
        let z3 = self.z.add(&other.z).square().sub(&z1z1).sub(&z2z2).mul(&h);

        (
            JacobianPoint {
                x: x3,
                y: y3,
                z: z3,
            },
            h,
            r,
        )
    }

    /// Returns `self + other` in constant time.
    ///
    /// Every exceptional case (either input the identity, equal inputs,
    /// opposite inputs) is handled by selection rather than branching.
    pub fn add(&self, other: &JacobianPoint) -> JacobianPoint {
        let (sum, h, r) = self.add_unchecked(other);
        let doubled = self.double();

        let mut res = JacobianPoint::conditional_select(&sum, &doubled, h.is_zero() & r.is_zero());
        res.conditional_assign(other, self.is_identity());
        res.conditional_assign(self, other.is_identity());
        res
    }

    /// Returns `self + other`, branching on the exceptional cases.
    ///
    /// Variable time; only use with public inputs.
    pub fn add_vartime(&self, other: &JacobianPoint) -> JacobianPoint {
        if bool::from(self.is_identity()) {
            return *other;
        }
        if bool::from(other.is_identity()) {
            return *self;
        }

        let (sum, h, r) = self.add_unchecked(other);
        if bool::from(h.is_zero()) {
            return if bool::from(r.is_zero()) {
                self.double()
            } else {
                JacobianPoint::IDENTITY
            };
        }
        sum
    }
}

impl From<AffinePoint> for JacobianPoint {
    fn from(p: AffinePoint) -> Self {
        let jacobian = JacobianPoint {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
        };
        Self::conditional_select(&jacobian, &Self::IDENTITY, p.is_identity())
    }
}

impl From<&AffinePoint> for JacobianPoint {
    fn from(p: &AffinePoint) -> Self {
        Self::from(*p)
    }
}

impl From<JacobianPoint> for AffinePoint {
    fn from(p: JacobianPoint) -> AffinePoint {
        p.to_affine()
    }
}

impl ConditionallySelectable for JacobianPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        JacobianPoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for JacobianPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // X1/Z1² == X2/Z2² and Y1/Z1³ == Y2/Z2³, cross-multiplied
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let x_eq = self.x.mul(&z2z2).ct_eq(&other.x.mul(&z1z1));
        let y_eq = self
            .y
            .mul(&z2z2)
            .mul(&other.z)
            .ct_eq(&other.y.mul(&z1z1).mul(&self.z));

        let self_id = self.is_identity();
        let other_id = other.is_identity();
        (self_id & other_id) | (!self_id & !other_id & x_eq & y_eq)
    }
}

impl PartialEq for JacobianPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for JacobianPoint {}

impl Default for JacobianPoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DefaultIsZeroes for JacobianPoint {}

impl Add<&JacobianPoint> for JacobianPoint {
    type Output = JacobianPoint;

    fn add(self, other: &JacobianPoint) -> JacobianPoint {
        JacobianPoint::add(&self, other)
    }
}

impl Add<JacobianPoint> for JacobianPoint {
    type Output = JacobianPoint;

    fn add(self, other: JacobianPoint) -> JacobianPoint {
        JacobianPoint::add(&self, &other)
    }
}

impl AddAssign<&JacobianPoint> for JacobianPoint {
    fn add_assign(&mut self, rhs: &JacobianPoint) {
        *self = JacobianPoint::add(self, rhs);
    }
}

impl Sub<&JacobianPoint> for JacobianPoint {
    type Output = JacobianPoint;

    fn sub(self, other: &JacobianPoint) -> JacobianPoint {
        JacobianPoint::add(&self, &other.negate())
    }
}

impl Neg for JacobianPoint {
    type Output = JacobianPoint;

    fn neg(self) -> JacobianPoint {
        self.negate()
    }
}

impl<'a> Neg for &'a JacobianPoint {
    type Output = JacobianPoint;

    fn neg(self) -> JacobianPoint {
        self.negate()
    }
}
