//! Field arithmetic modulo p = 2^256 - 2^32 - 2^9 - 2^8 - 2^7 - 2^6 - 2^4 - 1
//!
//! Elements are stored as four 64-bit limbs and are kept fully reduced after
//! every operation, so equality and serialization never need a separate
//! normalization step.

use super::util::{
    add4, fold, limbs_from_be_bytes, limbs_to_be_bytes, mask4, mul_wide, sub4,
    sub_modulus_if_needed,
};
use crate::FieldBytes;
use core::{
    cmp::Ordering,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::DefaultIsZeroes,
};

#[cfg(test)]
use num_bigint::BigUint;

/// Limbs of the field modulus `p`.
pub(crate) const MODULUS: [u64; 4] = [
    0xFFFF_FFFE_FFFF_FC2F,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// `2^256 mod p`.
const R: [u64; 4] = [0x0000_0001_0000_03D1, 0, 0, 0];

/// An element in the finite field modulo p.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldElement([u64; 4]);

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self([0, 0, 0, 0]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Builds an element from little-endian limbs already known to be `< p`.
    pub(crate) const fn from_limbs_unchecked(limbs: [u64; 4]) -> Self {
        Self(limbs)
    }

    /// Attempts to parse the given big-endian byte array as an SEC1-encoded
    /// field element.
    ///
    /// Returns `None` if the value is not in range (`>= p`).
    pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
        let bytes: [u8; 32] = (*bytes).into();
        let limbs = limbs_from_be_bytes(&bytes);
        let (_, borrow) = sub4(&limbs, &MODULUS);
        CtOption::new(Self(limbs), Choice::from((borrow & 1) as u8))
    }

    /// Returns the SEC1 encoding of this field element.
    pub fn to_bytes(self) -> FieldBytes {
        limbs_to_be_bytes(&self.0).into()
    }

    /// Determine if this `FieldElement` is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Determine if this `FieldElement` is odd in the SEC1 sense: `self mod 2 == 1`.
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    /// Compares two field elements as integers in `[0, p)`.
    ///
    /// Variable time; only use with public values.
    pub fn cmp_vartime(&self, other: &Self) -> Ordering {
        super::util::cmp_vartime(&self.0, &other.0)
    }

    /// Returns `self + rhs mod p`.
    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = add4(&self.0, &rhs.0);
        Self(sub_modulus_if_needed(&sum, carry, &MODULUS))
    }

    /// Returns `self - rhs mod p`.
    pub fn sub(&self, rhs: &Self) -> Self {
        let (diff, borrow) = sub4(&self.0, &rhs.0);
        let (res, _) = add4(&diff, &mask4(&MODULUS, borrow));
        Self(res)
    }

    /// Returns `-self mod p`.
    pub fn negate(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Returns `2 * self`.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `self * rhs mod p`.
    pub fn mul(&self, rhs: &Self) -> Self {
        let wide = mul_wide(&self.0, &rhs.0);

        // Each fold shrinks the high half: < 2^290, < 2^257, < 2^256.
        let wide = fold(&wide, &R);
        let wide = fold(&wide, &R);
        let wide = fold(&wide, &R);
        debug_assert!(wide[4..].iter().all(|&limb| limb == 0));

        let lo = [wide[0], wide[1], wide[2], wide[3]];
        Self(sub_modulus_if_needed(&lo, 0, &MODULUS))
    }

    /// Returns `self * self`.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    fn pow2k(&self, k: usize) -> Self {
        let mut x = *self;
        for _j in 0..k {
            x = x.square();
        }
        x
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    pub fn invert(&self) -> CtOption<Self> {
        // The binary representation of (p - 2) has 5 blocks of 1s, with lengths in
        // { 1, 2, 22, 223 }. Use an addition chain to calculate 2^n - 1 for each block:
        // [1], [2], 3, 6, 9, 11, [22], 44, 88, 176, 220, [223]

        let x2 = self.pow2k(1).mul(self);
        let x3 = x2.pow2k(1).mul(self);
        let x6 = x3.pow2k(3).mul(&x3);
        let x9 = x6.pow2k(3).mul(&x3);
        let x11 = x9.pow2k(2).mul(&x2);
        let x22 = x11.pow2k(11).mul(&x11);
        let x44 = x22.pow2k(22).mul(&x22);
        let x88 = x44.pow2k(44).mul(&x44);
        let x176 = x88.pow2k(88).mul(&x88);
        let x220 = x176.pow2k(44).mul(&x44);
        let x223 = x220.pow2k(3).mul(&x3);

        // The final result is then assembled using a sliding window over the blocks.
        let res = x223
            .pow2k(23)
            .mul(&x22)
            .pow2k(5)
            .mul(self)
            .pow2k(3)
            .mul(&x2)
            .pow2k(2)
            .mul(self);

        CtOption::new(res, !self.is_zero())
    }

    /// Returns the square root of self mod p, or `None` if no square root exists.
    pub fn sqrt(&self) -> CtOption<Self> {
        // p is congruent to 3 mod 4, so a square root of `a` is a^((p+1)/4) if
        // one exists at all. The result is checked by squaring it back.
        //
        // The binary representation of (p + 1)/4 has 3 blocks of 1s, with lengths in
        // { 2, 22, 223 }. Use an addition chain to calculate 2^n - 1 for each block:
        // 1, [2], 3, 6, 9, 11, [22], 44, 88, 176, 220, [223]

        let x2 = self.pow2k(1).mul(self);
        let x3 = x2.pow2k(1).mul(self);
        let x6 = x3.pow2k(3).mul(&x3);
        let x9 = x6.pow2k(3).mul(&x3);
        let x11 = x9.pow2k(2).mul(&x2);
        let x22 = x11.pow2k(11).mul(&x11);
        let x44 = x22.pow2k(22).mul(&x22);
        let x88 = x44.pow2k(44).mul(&x44);
        let x176 = x88.pow2k(88).mul(&x88);
        let x220 = x176.pow2k(44).mul(&x44);
        let x223 = x220.pow2k(3).mul(&x3);

        let res = x223.pow2k(23).mul(&x22).pow2k(6).mul(&x2).pow2k(2);

        let is_root = res.square().ct_eq(self);
        CtOption::new(res, is_root)
    }

    #[cfg(test)]
    pub(crate) fn modulus_as_biguint() -> BigUint {
        super::util::bytes_to_biguint(&limbs_to_be_bytes(&MODULUS))
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(super::util::select4(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl DefaultIsZeroes for FieldElement {}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement::add(self, other)
    }
}

impl Add<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement::add(&self, other)
    }
}

impl Add<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: FieldElement) -> FieldElement {
        FieldElement::add(&self, &other)
    }
}

impl AddAssign<FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: FieldElement) {
        *self = FieldElement::add(self, &rhs);
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement::sub(self, other)
    }
}

impl Sub<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement::sub(&self, other)
    }
}

impl Sub<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: FieldElement) -> FieldElement {
        FieldElement::sub(&self, &other)
    }
}

impl SubAssign<FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: FieldElement) {
        *self = FieldElement::sub(self, &rhs);
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement::mul(self, other)
    }
}

impl Mul<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement::mul(&self, other)
    }
}

impl Mul<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: FieldElement) -> FieldElement {
        FieldElement::mul(&self, &other)
    }
}

impl MulAssign<FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: FieldElement) {
        *self = FieldElement::mul(self, &rhs);
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        self.negate()
    }
}

#[cfg(test)]
impl From<&BigUint> for FieldElement {
    fn from(x: &BigUint) -> Self {
        let bytes = super::util::biguint_to_bytes(x);
        Self::from_bytes(&bytes.into()).unwrap()
    }
}

#[cfg(test)]
impl FieldElement {
    pub(crate) fn to_biguint(self) -> BigUint {
        super::util::bytes_to_biguint(&self.to_bytes().into())
    }
}
