//! Limb-level helpers shared by the field and scalar implementations.
//!
//! All values are little-endian arrays of 64-bit limbs.

use elliptic_curve::subtle::{Choice, ConditionallySelectable};

#[cfg(test)]
use num_bigint::{BigUint, ToBigUint};
#[cfg(test)]
use num_traits::cast::ToPrimitive;

/// Computes `a + b + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a - (b + borrow)`, returning the result along with the new borrow.
///
/// The borrow is either `0` or `u64::MAX`; only its top bit is read.
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a + (b * c) + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Adds two 256-bit values, returning the sum and the carry out (0 or 1).
#[inline(always)]
pub(crate) fn add4(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut carry = 0;
    for i in 0..4 {
        (out[i], carry) = adc(a[i], b[i], carry);
    }
    (out, carry)
}

/// Subtracts two 256-bit values, returning the difference and the borrow
/// mask (`0` or `u64::MAX`).
#[inline(always)]
pub(crate) fn sub4(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut borrow = 0;
    for i in 0..4 {
        (out[i], borrow) = sbb(a[i], b[i], borrow);
    }
    (out, borrow)
}

/// Returns `a & mask` limb-wise.
#[inline(always)]
pub(crate) fn mask4(a: &[u64; 4], mask: u64) -> [u64; 4] {
    [a[0] & mask, a[1] & mask, a[2] & mask, a[3] & mask]
}

/// Constant-time selection between two limb arrays: `b` if `choice` is set.
#[inline(always)]
pub(crate) fn select4(a: &[u64; 4], b: &[u64; 4], choice: Choice) -> [u64; 4] {
    [
        u64::conditional_select(&a[0], &b[0], choice),
        u64::conditional_select(&a[1], &b[1], choice),
        u64::conditional_select(&a[2], &b[2], choice),
        u64::conditional_select(&a[3], &b[3], choice),
    ]
}

/// Reduces a 257-bit value `carry * 2^256 + a` which is known to be below
/// `2 * modulus` into `[0, modulus)`.
#[inline(always)]
pub(crate) fn sub_modulus_if_needed(a: &[u64; 4], carry: u64, modulus: &[u64; 4]) -> [u64; 4] {
    let (diff, borrow) = sub4(a, modulus);
    let (_, borrow) = sbb(carry, 0, borrow);
    // `borrow` is all ones iff `a < modulus` (taking the carry into account)
    select4(&diff, a, Choice::from((borrow & 1) as u8))
}

/// Schoolbook 256x256 -> 512-bit multiplication.
#[inline(always)]
pub(crate) fn mul_wide(a: &[u64; 4], b: &[u64; 4]) -> [u64; 8] {
    let mut w = [0u64; 8];
    for i in 0..4 {
        let mut carry = 0;
        for j in 0..4 {
            (w[i + j], carry) = mac(w[i + j], a[i], b[j], carry);
        }
        w[i + 4] = carry;
    }
    w
}

/// Computes `lo + hi * c` where `lo` and `hi` are the low and high halves of `wide`.
///
/// With `c = 2^256 mod m` this maps `wide` to a congruent (mod `m`) value.
/// Callers must apply it enough times for the high half to vanish.
#[inline(always)]
pub(crate) fn fold(wide: &[u64; 8], c: &[u64; 4]) -> [u64; 8] {
    let hi = [wide[4], wide[5], wide[6], wide[7]];
    let mut w = mul_wide(&hi, c);
    let mut carry = 0;
    for i in 0..4 {
        (w[i], carry) = adc(w[i], wide[i], carry);
    }
    for limb in w.iter_mut().skip(4) {
        (*limb, carry) = adc(*limb, 0, carry);
    }
    w
}

/// Decodes 32 big-endian bytes into little-endian limbs.
#[inline(always)]
pub(crate) fn limbs_from_be_bytes(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = 24 - 8 * i;
        *limb = bytes[start..start + 8]
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    }
    limbs
}

/// Encodes little-endian limbs as 32 big-endian bytes.
#[inline(always)]
pub(crate) fn limbs_to_be_bytes(limbs: &[u64; 4]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, limb) in limbs.iter().enumerate() {
        let start = 24 - 8 * i;
        bytes[start..start + 8].copy_from_slice(&limb.to_be_bytes());
    }
    bytes
}

/// Variable-time comparison of two little-endian limb arrays.
pub(crate) fn cmp_vartime(a: &[u64; 4], b: &[u64; 4]) -> core::cmp::Ordering {
    a.iter().rev().cmp(b.iter().rev())
}

/// Converts a byte array (big-endian) to BigUint.
#[cfg(test)]
pub fn bytes_to_biguint(bytes: &[u8; 32]) -> BigUint {
    bytes
        .iter()
        .enumerate()
        .map(|(i, w)| w.to_biguint().unwrap() << ((31 - i) * 8))
        .sum()
}

/// Converts a BigUint to a byte array (big-endian).
#[cfg(test)]
pub fn biguint_to_bytes(x: &BigUint) -> [u8; 32] {
    let mask = BigUint::from(u8::MAX);
    let mut bytes = [0u8; 32];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = ((x >> ((31 - i) * 8)) as BigUint & &mask).to_u8().unwrap();
    }
    bytes
}
