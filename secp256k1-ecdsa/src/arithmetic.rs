//! A pure-Rust implementation of group operations on secp256k1.
//!
//! These are the building blocks of the [`ecdsa`](crate::ecdsa) module:
//! field and scalar arithmetic, affine and Jacobian points, and the
//! scalar multiplication engines.

pub(crate) mod affine;
pub(crate) mod field;
pub(crate) mod jacobian;
pub mod mul;
pub(crate) mod scalar;
pub(crate) mod util;

pub use self::{
    affine::AffinePoint,
    field::FieldElement,
    jacobian::JacobianPoint,
    mul::{lincomb_vartime, mul_base},
    scalar::Scalar,
};

const CURVE_EQUATION_B_SINGLE: u64 = 7;

/// The `b` coefficient of `y² = x³ + b`.
pub(crate) const CURVE_EQUATION_B: FieldElement =
    FieldElement::from_limbs_unchecked([CURVE_EQUATION_B_SINGLE, 0, 0, 0]);

/// The group order `n` as a field element. Valid since `n < p`.
pub(crate) const ORDER_AS_FIELD: FieldElement =
    FieldElement::from_limbs_unchecked(scalar::MODULUS);

/// `p - n`: x-coordinates at or above this cannot have been reduced mod `n`.
pub(crate) const P_MINUS_ORDER: FieldElement = FieldElement::from_limbs_unchecked([
    0x402D_A172_2FC9_BAEE,
    0x4551_2319_50B7_5FC4,
    0x0000_0000_0000_0001,
    0x0000_0000_0000_0000,
]);
