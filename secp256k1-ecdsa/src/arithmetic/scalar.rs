//! Scalar field arithmetic modulo the group order
//! n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141

use super::util::{
    add4, cmp_vartime, fold, limbs_from_be_bytes, limbs_to_be_bytes, mask4, mul_wide, select4,
    sub4, sub_modulus_if_needed,
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

/// The number of 64-bit limbs used to represent a [`Scalar`].
const LIMBS: usize = 4;

/// Constant representing the modulus
/// n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141
pub(crate) const MODULUS: [u64; LIMBS] = [
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// Constant representing floor(modulus / 2)
const FRAC_MODULUS_2: [u64; LIMBS] = [
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
];

/// Limbs of 2^256 minus the secp256k1 order.
const NEG_MODULUS: [u64; LIMBS] = [!MODULUS[0] + 1, !MODULUS[1], !MODULUS[2], !MODULUS[3]];

/// Exponent used for inversion via Fermat's little theorem: n - 2.
const MODULUS_MINUS_TWO: [u64; LIMBS] = [MODULUS[0] - 2, MODULUS[1], MODULUS[2], MODULUS[3]];

/// An element in the finite field modulo n.
///
/// Always fully reduced, i.e. in `[0, n)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scalar([u64; LIMBS]);

impl From<u64> for Scalar {
    fn from(k: u64) -> Self {
        Scalar([k, 0, 0, 0])
    }
}

impl Scalar {
    /// Zero scalar.
    pub const ZERO: Self = Self([0, 0, 0, 0]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Attempts to parse the given byte array as an SEC1-encoded scalar.
    ///
    /// Returns `None` if the byte array does not contain a big-endian integer
    /// in the range `[0, n)`.
    pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
        let (scalar, overflow) = Self::from_bytes_overflowing(bytes);
        CtOption::new(scalar, !overflow)
    }

    /// Parses a big-endian integer, reducing it modulo `n`.
    ///
    /// Since `2^256 < 2n` the reduction is a single conditional subtraction.
    /// The returned [`Choice`] is set if that subtraction happened, i.e. the
    /// input was `>= n`.
    pub fn from_bytes_overflowing(bytes: &FieldBytes) -> (Self, Choice) {
        let bytes: [u8; 32] = (*bytes).into();
        let w = limbs_from_be_bytes(&bytes);

        // If w is in the range [0, n) then w - n will overflow, resulting in a borrow
        // value of 2^64 - 1.
        let (reduced, borrow) = sub4(&w, &MODULUS);
        let overflow = Choice::from((!borrow & 1) as u8);
        (Self(select4(&w, &reduced, overflow)), overflow)
    }

    /// Parses a big-endian integer and reduces it modulo `n`.
    pub fn reduce_bytes(bytes: &FieldBytes) -> Self {
        Self::from_bytes_overflowing(bytes).0
    }

    /// Returns the SEC1 encoding of this scalar.
    pub fn to_bytes(&self) -> FieldBytes {
        limbs_to_be_bytes(&self.0).into()
    }

    /// Is this scalar equal to zero?
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Scalar::ZERO)
    }

    /// Is this scalar greater than n / 2?
    ///
    /// Since n is odd, exactly one of `s` and `-s` is high for non-zero `s`.
    pub fn is_high(&self) -> Choice {
        let (_, borrow) = sub4(&FRAC_MODULUS_2, &self.0);
        Choice::from((borrow & 1) as u8)
    }

    /// Returns `self + rhs mod n`.
    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = add4(&self.0, &rhs.0);
        Self(sub_modulus_if_needed(&sum, carry, &MODULUS))
    }

    /// Returns `self - rhs mod n`.
    pub fn sub(&self, rhs: &Self) -> Self {
        let (diff, borrow) = sub4(&self.0, &rhs.0);
        let (res, _) = add4(&diff, &mask4(&MODULUS, borrow));
        Self(res)
    }

    /// Returns `-self mod n`.
    pub fn negate(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Returns `self * rhs mod n`.
    pub fn mul(&self, rhs: &Self) -> Self {
        let wide = mul_wide(&self.0, &rhs.0);

        // NEG_MODULUS is 129 bits wide, so four folds are needed for the
        // high half to vanish: < 2^386, < 2^260, < 2^256 + 2^133, < 2^256.
        let wide = fold(&wide, &NEG_MODULUS);
        let wide = fold(&wide, &NEG_MODULUS);
        let wide = fold(&wide, &NEG_MODULUS);
        let wide = fold(&wide, &NEG_MODULUS);
        debug_assert!(wide[4..].iter().all(|&limb| limb == 0));

        let lo = [wide[0], wide[1], wide[2], wide[3]];
        Self(sub_modulus_if_needed(&lo, 0, &MODULUS))
    }

    /// Returns `self * self`.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Raises `self` to the power `exp` (little-endian limbs).
    ///
    /// Variable time with respect to the exponent only.
    pub fn pow_vartime(&self, exp: &[u64; LIMBS]) -> Self {
        let mut res = Self::ONE;
        for limb in exp.iter().rev() {
            for j in (0..64).rev() {
                res = res.square();
                if (limb >> j) & 1 == 1 {
                    res = res.mul(self);
                }
            }
        }
        res
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    ///
    /// Constant time with respect to `self`.
    pub fn invert(&self) -> CtOption<Self> {
        CtOption::new(self.pow_vartime(&MODULUS_MINUS_TWO), !self.is_zero())
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    ///
    /// Uses the binary extended Euclidean algorithm, which is faster than
    /// [`Scalar::invert`] but leaks `self` through timing. Only use it on
    /// public values.
    pub fn invert_vartime(&self) -> CtOption<Self> {
        if bool::from(self.is_zero()) {
            return CtOption::new(Self::ZERO, Choice::from(0));
        }

        const ONE: [u64; LIMBS] = [1, 0, 0, 0];

        // Invariants: u = self * x1 (mod n), v = self * x2 (mod n)
        let mut u = self.0;
        let mut v = MODULUS;
        let mut x1 = Self::ONE;
        let mut x2 = Self::ZERO;

        while u != ONE && v != ONE {
            while u[0] & 1 == 0 {
                u = shr1(&u);
                x1 = x1.halve();
            }
            while v[0] & 1 == 0 {
                v = shr1(&v);
                x2 = x2.halve();
            }
            if cmp_vartime(&u, &v) != Ordering::Less {
                u = sub4(&u, &v).0;
                x1 = x1.sub(&x2);
            } else {
                v = sub4(&v, &u).0;
                x2 = x2.sub(&x1);
            }
        }

        let res = if u == ONE { x1 } else { x2 };
        CtOption::new(res, Choice::from(1))
    }

    /// Returns `self / 2 mod n`.
    fn halve(&self) -> Self {
        let is_odd = (self.0[0] & 1).wrapping_neg();
        let (sum, carry) = add4(&self.0, &mask4(&MODULUS, is_odd));
        let mut res = shr1(&sum);
        res[3] |= carry << 63;
        Self(res)
    }

    #[cfg(test)]
    pub(crate) fn modulus_as_biguint() -> BigUint {
        super::util::bytes_to_biguint(&limbs_to_be_bytes(&MODULUS))
    }
}

/// Shifts 256-bit little-endian limbs right by one bit.
fn shr1(a: &[u64; LIMBS]) -> [u64; LIMBS] {
    [
        (a[0] >> 1) | (a[1] << 63),
        (a[1] >> 1) | (a[2] << 63),
        (a[2] >> 1) | (a[3] << 63),
        a[3] >> 1,
    ]
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Scalar(select4(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl DefaultIsZeroes for Scalar {}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar::add(self, other)
    }
}

impl Add<&Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar::add(&self, other)
    }
}

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: Scalar) -> Scalar {
        Scalar::add(&self, &other)
    }
}

impl AddAssign<Scalar> for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        *self = Scalar::add(self, &rhs);
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar::sub(self, other)
    }
}

impl Sub<&Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar::sub(&self, other)
    }
}

impl Sub<Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: Scalar) -> Scalar {
        Scalar::sub(&self, &other)
    }
}

impl SubAssign<Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: Scalar) {
        *self = Scalar::sub(self, &rhs);
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar::mul(self, other)
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar::mul(&self, other)
    }
}

impl Mul<Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: Scalar) -> Scalar {
        Scalar::mul(&self, &other)
    }
}

impl MulAssign<Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = Scalar::mul(self, &rhs);
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self.negate()
    }
}

#[cfg(test)]
impl From<&BigUint> for Scalar {
    fn from(x: &BigUint) -> Self {
        let bytes = super::util::biguint_to_bytes(x);
        Self::from_bytes(&bytes.into()).unwrap()
    }
}

#[cfg(test)]
impl Scalar {
    pub(crate) fn to_biguint(self) -> BigUint {
        super::util::bytes_to_biguint(&self.to_bytes().into())
    }
}

#[cfg(test)]
mod tests {
    use super::{Scalar, FRAC_MODULUS_2, LIMBS, MODULUS};
    use crate::{arithmetic::util::bytes_to_biguint, FieldBytes};
    use hex_literal::hex;
    use num_bigint::BigUint;
    use proptest::prelude::*;

    /// n - 1
    const MODULUS_MINUS_ONE: [u64; LIMBS] = [MODULUS[0] - 1, MODULUS[1], MODULUS[2], MODULUS[3]];

    const N_BYTES: [u8; 32] =
        hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

    #[test]
    fn is_high() {
        // 0 is not high
        let high: bool = Scalar::ZERO.is_high().into();
        assert!(!high);

        // FRAC_MODULUS_2 - 1 is not high
        let mut scalar = Scalar(FRAC_MODULUS_2);
        scalar.0[3] -= 1;
        let high: bool = scalar.is_high().into();
        assert!(!high);

        // FRAC_MODULUS_2 is not high
        let high: bool = Scalar(FRAC_MODULUS_2).is_high().into();
        assert!(!high);

        // FRAC_MODULUS_2 + 1 is high
        let mut scalar = Scalar(FRAC_MODULUS_2);
        scalar.0[0] += 1;
        let high: bool = scalar.is_high().into();
        assert!(high);

        // MODULUS - 1 is high
        let high: bool = Scalar(MODULUS_MINUS_ONE).is_high().into();
        assert!(high);
    }

    #[test]
    fn negate() {
        let zero_neg = -Scalar::ZERO;
        assert_eq!(zero_neg.0, [0u64; LIMBS]);

        let one_neg = -Scalar::ONE;
        assert_eq!(one_neg.0, MODULUS_MINUS_ONE);

        let frac_modulus_2_neg = -Scalar(FRAC_MODULUS_2);
        let mut frac_modulus_2_plus_one = FRAC_MODULUS_2;
        frac_modulus_2_plus_one[0] += 1;
        assert_eq!(frac_modulus_2_neg.0, frac_modulus_2_plus_one);

        let modulus_minus_one_neg = -Scalar(MODULUS_MINUS_ONE);
        assert_eq!(modulus_minus_one_neg.0, Scalar::ONE.0);
    }

    #[test]
    fn from_bytes_overflowing() {
        let (s, overflow) = Scalar::from_bytes_overflowing(&FieldBytes::default());
        assert_eq!(s, Scalar::ZERO);
        assert!(!bool::from(overflow));

        let (s, overflow) = Scalar::from_bytes_overflowing(&N_BYTES.into());
        assert_eq!(s, Scalar::ZERO);
        assert!(bool::from(overflow));

        let mut n_plus_one = N_BYTES;
        n_plus_one[31] += 1;
        let (s, overflow) = Scalar::from_bytes_overflowing(&n_plus_one.into());
        assert_eq!(s, Scalar::ONE);
        assert!(bool::from(overflow));

        let mut n_minus_one = N_BYTES;
        n_minus_one[31] -= 1;
        let (s, overflow) = Scalar::from_bytes_overflowing(&n_minus_one.into());
        assert_eq!(s.0, MODULUS_MINUS_ONE);
        assert!(!bool::from(overflow));

        // 2^256 - 1 reduces to 2^256 - 1 - n
        let (s, overflow) = Scalar::from_bytes_overflowing(&[0xff; 32].into());
        assert_eq!(
            s.to_bytes(),
            FieldBytes::from(hex!(
                "000000000000000000000000000000014551231950b75fc4402da1732fc9bebe"
            ))
        );
        assert!(bool::from(overflow));
    }

    #[test]
    fn from_bytes_is_strict() {
        assert!(bool::from(Scalar::from_bytes(&N_BYTES.into()).is_none()));
        assert!(bool::from(Scalar::from_bytes(&[0xff; 32].into()).is_none()));
        assert_eq!(
            Scalar::from_bytes(&FieldBytes::default()).unwrap(),
            Scalar::ZERO
        );
        assert_eq!(Scalar::reduce_bytes(&N_BYTES.into()), Scalar::ZERO);
    }

    #[test]
    fn invert() {
        assert!(bool::from(Scalar::ZERO.invert().is_none()));
        assert!(bool::from(Scalar::ZERO.invert_vartime().is_none()));

        assert_eq!(Scalar::ONE.invert().unwrap(), Scalar::ONE);
        assert_eq!(Scalar::ONE.invert_vartime().unwrap(), Scalar::ONE);

        let two = Scalar::from(2u64);
        assert_eq!(two * two.invert().unwrap(), Scalar::ONE);
        assert_eq!(two * two.invert_vartime().unwrap(), Scalar::ONE);

        let minus_one = Scalar(MODULUS_MINUS_ONE);
        assert_eq!(minus_one.invert_vartime().unwrap(), minus_one);
    }

    prop_compose! {
        fn scalar()(bytes in any::<[u8; 32]>()) -> Scalar {
            let mut res = bytes_to_biguint(&bytes);
            let m = Scalar::modulus_as_biguint();
            // Modulus is 256 bit long, same as the maximum `res`,
            // so this is guaranteed to land us in the correct range.
            if res >= m {
                res -= m;
            }
            Scalar::from(&res)
        }
    }

    proptest! {
        #[test]
        fn fuzzy_add(a in scalar(), b in scalar()) {
            let res_bi = (a.to_biguint() + b.to_biguint()) % Scalar::modulus_as_biguint();
            prop_assert_eq!(a + b, Scalar::from(&res_bi));
        }

        #[test]
        fn fuzzy_sub(a in scalar(), b in scalar()) {
            let m = Scalar::modulus_as_biguint();
            let res_bi = (a.to_biguint() + &m - b.to_biguint()) % &m;
            prop_assert_eq!(a - b, Scalar::from(&res_bi));
        }

        #[test]
        fn fuzzy_mul(a in scalar(), b in scalar()) {
            let res_bi = (a.to_biguint() * b.to_biguint()) % Scalar::modulus_as_biguint();
            prop_assert_eq!(a * b, Scalar::from(&res_bi));
        }

        #[test]
        fn fuzzy_from_bytes_overflowing(bytes in any::<[u8; 32]>()) {
            let m = Scalar::modulus_as_biguint();
            let value = bytes_to_biguint(&bytes);
            let (s, overflow) = Scalar::from_bytes_overflowing(&bytes.into());
            prop_assert_eq!(s.to_biguint(), &value % &m);
            prop_assert_eq!(bool::from(overflow), value >= m);
        }

        #[test]
        fn fuzzy_invert(a in scalar()) {
            let a = if bool::from(a.is_zero()) { Scalar::ONE } else { a };
            let inv = a.invert().unwrap();
            let res_bi = (a.to_biguint() * inv.to_biguint()) % Scalar::modulus_as_biguint();
            prop_assert_eq!(res_bi, BigUint::from(1u8));
        }

        #[test]
        fn invert_and_invert_vartime_are_equivalent(a in scalar()) {
            let a = if bool::from(a.is_zero()) { Scalar::ONE } else { a };
            prop_assert_eq!(a.invert().unwrap(), a.invert_vartime().unwrap());
        }

        #[test]
        fn negation_flips_high(a in scalar()) {
            prop_assume!(!bool::from(a.is_zero()));
            prop_assert_ne!(bool::from(a.is_high()), bool::from(a.negate().is_high()));
        }
    }
}
