//! Low-level ECDSA primitives.
//!
//! # ⚠️ Warning: Hazmat!
//!
//! YOU PROBABLY DON'T WANT TO USE THESE!
//!
//! These primitives are easy-to-misuse low-level functions which take the
//! nonce `k` as an argument and skip the low-S policy of [`VerifyingKey`].
//! Only use them if you are implementing a protocol that needs exactly that.
//!
//! [`VerifyingKey`]: super::VerifyingKey

use super::{Error, RecoveryId, Result, Signature};
use crate::{
    arithmetic::{lincomb_vartime, mul_base, ORDER_AS_FIELD, P_MINUS_ORDER},
    AffinePoint, FieldBytes, FieldElement, JacobianPoint, Scalar,
};
use core::cmp::Ordering;
use elliptic_curve::{subtle::ConditionallySelectable, zeroize::Zeroizing};

/// Sign the prehashed message `z` with the secret scalar `d` and nonce `k`.
///
/// `z` is the output of `bits2field`, i.e. 32 big-endian bytes; it is
/// reduced modulo `n`. The returned signature is always normalized to low-S,
/// and the [`RecoveryId`] accounts for that normalization.
///
/// Fails if `k` is zero or if `s` comes out as zero, in which case the
/// caller must retry with a different nonce.
///
/// # Panics
///
/// If `k·G` has an x-coordinate which is zero modulo `n`. Finding such a
/// `k` amounts to breaking the discrete logarithm problem.
pub fn sign_prehashed(
    d: &Scalar,
    z: &FieldBytes,
    k: &Scalar,
) -> Result<(Signature, RecoveryId)> {
    if bool::from(k.is_zero()) {
        return Err(Error::new());
    }

    let z = Scalar::reduce_bytes(z);

    // R = kG
    let big_r = Zeroizing::new(mul_base(k));
    let r_affine = Zeroizing::new(big_r.to_affine());
    let (r, overflow) = Scalar::from_bytes_overflowing(&r_affine.x());

    assert!(!bool::from(r.is_zero()), "ECDSA nonce produced r = 0");
    debug_assert!(!bool::from(overflow), "ECDSA nonce produced R.x >= n");

    let mut recid = RecoveryId::new(r_affine.y_is_odd().into(), overflow.into());

    // s = k⁻¹(z + rd)
    let k_inv = Zeroizing::new(Option::<Scalar>::from(k.invert()).ok_or_else(Error::new)?);
    let tmp = Zeroizing::new(r * d + z);
    let s = *k_inv * &*tmp;

    if bool::from(s.is_zero()) {
        return Err(Error::new());
    }

    let is_high = s.is_high();
    let s = Scalar::conditional_select(&s, &s.negate(), is_high);
    if bool::from(is_high) {
        recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
    }

    Ok((Signature::from_scalars(r, s), recid))
}

/// Verify the signature `(r, s)` of the prehashed message `z` under the
/// public key `q`.
///
/// Both low-S and high-S signatures are accepted. Variable time: every
/// input is assumed to be public.
pub fn verify_prehashed(q: &AffinePoint, z: &FieldBytes, sig: &Signature) -> bool {
    let (r, s) = sig.split_scalars();

    if bool::from(r.is_zero() | s.is_zero()) {
        trace_reject!("signature has a zero component");
        return false;
    }

    let s_inv = match Option::<Scalar>::from(s.invert_vartime()) {
        Some(s_inv) => s_inv,
        None => return false,
    };
    let z = Scalar::reduce_bytes(z);
    let u1 = z * &s_inv;
    let u2 = r * &s_inv;

    let p = lincomb_vartime(&u1, &u2, &JacobianPoint::from(q));
    if bool::from(p.is_identity()) {
        trace_reject!("u1·G + u2·Q is the identity");
        return false;
    }

    // r < n < p, so its bytes always decode as a field element.
    let x = match Option::<FieldElement>::from(FieldElement::from_bytes(&r.to_bytes())) {
        Some(x) => x,
        None => return false,
    };

    if p.eq_x_vartime(&x) {
        return true;
    }

    // R.x may also have been r + n, but only if that is still below p.
    if x.cmp_vartime(&P_MINUS_ORDER) != Ordering::Less {
        trace_reject!("R.x does not match r");
        return false;
    }

    let matches = p.eq_x_vartime(&(x + &ORDER_AS_FIELD));
    if !matches {
        trace_reject!("R.x does not match r or r + n");
    }
    matches
}
