//! Scalar multiplication engines.
//!
//! - [`mul_base`] / [`mul`]: constant-time signed 4-bit fixed window, used
//!   whenever the scalar is secret.
//! - [`lincomb_vartime`]: `u1·G + u2·Q` with width-5 wNAF and interleaved
//!   doublings (Shamir's trick), used by verification and key recovery where
//!   every input is public.

use super::{util::limbs_from_be_bytes, AffinePoint, JacobianPoint, Scalar};
use core::ops::{Mul, MulAssign};
use elliptic_curve::subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Window width of the wNAF recoding.
const WNAF_WINDOW: usize = 5;

/// Number of wNAF digits needed for a 256-bit scalar plus the final carry.
const WNAF_DIGITS: usize = 257;

/// Lookup table containing precomputed values `[p, 2p, 3p, ..., 8p]`
struct LookupTable([JacobianPoint; 8]);

impl From<&JacobianPoint> for LookupTable {
    fn from(p: &JacobianPoint) -> Self {
        let mut points = [*p; 8];
        for j in 0..7 {
            points[j + 1] = p.add(&points[j]);
        }
        LookupTable(points)
    }
}

impl LookupTable {
    /// Given -8 <= x <= 8, returns x * p in constant time.
    fn select(&self, x: i8) -> JacobianPoint {
        debug_assert!(x >= -8);
        debug_assert!(x <= 8);

        // Compute xabs = |x|
        let xmask = x >> 7;
        let xabs = (x + xmask) ^ xmask;

        // Get an array element in constant time
        let mut t = JacobianPoint::IDENTITY;
        for j in 1..9 {
            let c = (xabs as u8).ct_eq(&(j as u8));
            t.conditional_assign(&self.0[j - 1], c);
        }
        // Now t == |x| * p.

        let neg_mask = Choice::from((xmask & 1) as u8);
        t.conditional_assign(&t.negate(), neg_mask);
        // Now t == x * p.

        t
    }
}

/// Returns `[a_0, ..., a_64]` such that `sum(a_j * 2^(j * 4)) == x`,
/// and `-8 <= a_j <= 7`.
fn to_radix_16(x: &Scalar) -> [i8; 65] {
    // `x` can have up to 256 bits, so we need an additional byte to store the carry.
    let mut output = [0i8; 65];

    // Step 1: change radix.
    // Convert from radix 256 (bytes) to radix 16 (nibbles)
    let bytes = x.to_bytes();
    for i in 0..32 {
        output[2 * i] = (bytes[31 - i] & 0xf) as i8;
        output[2 * i + 1] = ((bytes[31 - i] >> 4) & 0xf) as i8;
    }

    // Step 2: recenter coefficients from [0,16) to [-8,8)
    for i in 0..64 {
        let carry = (output[i] + 8) >> 4;
        output[i] -= carry << 4;
        output[i + 1] += carry;
    }

    output
}

fn mul_windowed(x: &JacobianPoint, k: &Scalar) -> JacobianPoint {
    let scalar_digits = to_radix_16(k);
    let lookup_table = LookupTable::from(x);
    let mut acc = lookup_table.select(scalar_digits[64]);
    for i in (0..64).rev() {
        for _j in 0..4 {
            acc = acc.double();
        }
        acc += &lookup_table.select(scalar_digits[i]);
    }
    acc
}

/// Computes `k * G` in constant time.
pub fn mul_base(k: &Scalar) -> JacobianPoint {
    mul_windowed(&JacobianPoint::GENERATOR, k)
}

/// Computes `k * p` in constant time.
pub fn mul(p: &JacobianPoint, k: &Scalar) -> JacobianPoint {
    mul_windowed(p, k)
}

/// Reads `count` bits of a 256-bit little-endian integer starting at `offset`.
/// Bits past the top read as zero.
fn bits_vartime(limbs: &[u64; 4], offset: usize, count: usize) -> u32 {
    debug_assert!(count > 0 && count <= 31);
    let mut word = 0u32;
    for i in (0..count).rev() {
        let bit = offset + i;
        let b = if bit < 256 {
            (limbs[bit / 64] >> (bit % 64)) & 1
        } else {
            0
        };
        word = (word << 1) | b as u32;
    }
    word
}

/// Width-w non-adjacent form of `x`: `sum(d_i * 2^i) == x` where every
/// non-zero digit is odd, `|d_i| < 2^(w-1)`, and any two non-zero digits
/// are at least `w` positions apart.
///
/// Variable time.
fn to_wnaf(x: &Scalar) -> [i8; WNAF_DIGITS] {
    let limbs = limbs_from_be_bytes(&x.to_bytes().into());
    let mut wnaf = [0i8; WNAF_DIGITS];
    let mut carry = 0u32;
    let mut bit = 0;

    while bit < WNAF_DIGITS {
        if bits_vartime(&limbs, bit, 1) == carry {
            bit += 1;
            continue;
        }

        let now = WNAF_WINDOW.min(WNAF_DIGITS - bit);
        let mut word = (bits_vartime(&limbs, bit, now) + carry) as i32;
        carry = ((word >> (WNAF_WINDOW - 1)) & 1) as u32;
        word -= (carry << WNAF_WINDOW) as i32;

        wnaf[bit] = word as i8;
        bit += now;
    }

    debug_assert_eq!(carry, 0);
    wnaf
}

/// Odd multiples `[p, 3p, 5p, ..., 15p]` for wNAF digit lookups.
struct OddMultiples([JacobianPoint; 1 << (WNAF_WINDOW - 2)]);

impl From<&JacobianPoint> for OddMultiples {
    fn from(p: &JacobianPoint) -> Self {
        let p2 = p.double();
        let mut points = [*p; 1 << (WNAF_WINDOW - 2)];
        for j in 1..points.len() {
            points[j] = points[j - 1].add_vartime(&p2);
        }
        OddMultiples(points)
    }
}

impl OddMultiples {
    /// Returns `digit * p` for an odd, non-zero `digit`.
    fn get(&self, digit: i8) -> JacobianPoint {
        let point = self.0[(digit.unsigned_abs() as usize) >> 1];
        if digit < 0 {
            point.negate()
        } else {
            point
        }
    }
}

/// Computes `u1 * G + u2 * q`.
///
/// Variable time in every input; only use with public values.
pub fn lincomb_vartime(u1: &Scalar, u2: &Scalar, q: &JacobianPoint) -> JacobianPoint {
    let wnaf1 = to_wnaf(u1);
    let wnaf2 = to_wnaf(u2);
    let table1 = OddMultiples::from(&JacobianPoint::GENERATOR);
    let table2 = OddMultiples::from(q);

    let top = (0..WNAF_DIGITS)
        .rev()
        .find(|&i| wnaf1[i] != 0 || wnaf2[i] != 0);

    let mut acc = JacobianPoint::IDENTITY;
    let Some(top) = top else {
        return acc;
    };

    for i in (0..=top).rev() {
        acc = acc.double();
        if wnaf1[i] != 0 {
            acc = acc.add_vartime(&table1.get(wnaf1[i]));
        }
        if wnaf2[i] != 0 {
            acc = acc.add_vartime(&table2.get(wnaf2[i]));
        }
    }
    acc
}

impl Mul<Scalar> for JacobianPoint {
    type Output = JacobianPoint;

    fn mul(self, other: Scalar) -> JacobianPoint {
        mul_windowed(&self, &other)
    }
}

impl Mul<&Scalar> for &JacobianPoint {
    type Output = JacobianPoint;

    fn mul(self, other: &Scalar) -> JacobianPoint {
        mul_windowed(self, other)
    }
}

impl Mul<&Scalar> for JacobianPoint {
    type Output = JacobianPoint;

    fn mul(self, other: &Scalar) -> JacobianPoint {
        mul_windowed(&self, other)
    }
}

impl MulAssign<Scalar> for JacobianPoint {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = mul_windowed(self, &rhs);
    }
}

impl Mul<Scalar> for AffinePoint {
    type Output = JacobianPoint;

    fn mul(self, other: Scalar) -> JacobianPoint {
        mul_windowed(&JacobianPoint::from(self), &other)
    }
}
