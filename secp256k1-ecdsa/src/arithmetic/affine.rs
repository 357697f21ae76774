//! Affine points

use super::{FieldElement, CURVE_EQUATION_B};
use crate::{CompressedPoint, FieldBytes, UncompressedPoint};
use core::ops::Neg;
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::DefaultIsZeroes,
    Error, Result,
};

/// SEC1 tag of an uncompressed point.
const TAG_UNCOMPRESSED: u8 = 0x04;

/// secp256k1 curve point expressed in affine coordinates.
///
/// Points are encoded using the [SEC1] `Elliptic-Curve-Point-to-Octet-String`
/// encoding. The identity has no encoding in this crate: it never appears as
/// a valid public key.
///
/// [SEC1]: https://www.secg.org/sec1-v2.pdf
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    /// x-coordinate
    pub(crate) x: FieldElement,

    /// y-coordinate
    pub(crate) y: FieldElement,

    /// Is this point the point at infinity? 0 = no, 1 = yes
    ///
    /// This is a proxy for [`Choice`], but uses `u8` instead to permit `const`
    /// constructors for `IDENTITY` and `GENERATOR`.
    pub(super) infinity: u8,
}

impl AffinePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    /// Base point of secp256k1.
    ///
    /// ```text
    /// Gₓ = 79be667e f9dcbbac 55a06295 ce870b07 029bfcdb 2dce28d9 59f2815b 16f81798
    /// Gᵧ = 483ada77 26a3c465 5da4fbfc 0e1108a8 fd17b448 a6855419 9c47d08f fb10d4b8
    /// ```
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_limbs_unchecked([
            0x59F2_815B_16F8_1798,
            0x029B_FCDB_2DCE_28D9,
            0x55A0_6295_CE87_0B07,
            0x79BE_667E_F9DC_BBAC,
        ]),
        y: FieldElement::from_limbs_unchecked([
            0x9C47_D08F_FB10_D4B8,
            0xFD17_B448_A685_5419,
            0x5DA4_FBFC_0E11_08A8,
            0x483A_DA77_26A3_C465,
        ]),
        infinity: 0,
    };

    /// Create a new [`AffinePoint`] with the given coordinates.
    ///
    /// The caller is responsible for the point being on the curve.
    pub(crate) const fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y, infinity: 0 }
    }

    /// Is this point the identity point?
    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Get the affine x-coordinate as a serialized field element.
    pub fn x(&self) -> FieldBytes {
        self.x.to_bytes()
    }

    /// Is the affine y-coordinate odd?
    pub fn y_is_odd(&self) -> Choice {
        self.y.is_odd()
    }

    /// Does `(x, y)` satisfy `y² = x³ + 7`?
    fn is_on_curve(x: &FieldElement, y: &FieldElement) -> Choice {
        let lhs = y.square();
        let rhs = x.square().mul(x).add(&CURVE_EQUATION_B);
        lhs.ct_eq(&rhs)
    }

    /// Recovers the point with the given x-coordinate and y parity.
    ///
    /// Returns `None` if `x >= p` or `x³ + 7` is not a square.
    pub fn decompress(x_bytes: &FieldBytes, y_is_odd: Choice) -> CtOption<Self> {
        FieldElement::from_bytes(x_bytes).and_then(|x| {
            let alpha = x.square().mul(&x).add(&CURVE_EQUATION_B);
            let beta = alpha.sqrt();

            beta.map(|beta| {
                let y = FieldElement::conditional_select(
                    &beta.negate(),
                    &beta,
                    beta.is_odd().ct_eq(&y_is_odd),
                );

                Self::new(x, y)
            })
        })
    }

    /// Decode a point from its SEC1 encoding: 33-byte compressed (`02`/`03`
    /// tag) or 65-byte uncompressed (`04` tag).
    ///
    /// Rejects the identity encoding, coordinates `>= p`, and points which
    /// are not on the curve.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let point = match bytes {
            [tag @ (0x02 | 0x03), x @ ..] if x.len() == 32 => {
                Self::decompress(FieldBytes::from_slice(x), Choice::from(tag & 1))
            }
            [TAG_UNCOMPRESSED, coords @ ..] if coords.len() == 64 => {
                let (x, y) = coords.split_at(32);
                FieldElement::from_bytes(FieldBytes::from_slice(x)).and_then(|x| {
                    FieldElement::from_bytes(FieldBytes::from_slice(y)).and_then(|y| {
                        CtOption::new(Self::new(x, y), Self::is_on_curve(&x, &y))
                    })
                })
            }
            _ => {
                trace_reject!(len = bytes.len(), "unsupported SEC1 point encoding");
                return Err(Error);
            }
        };

        Option::from(point).ok_or_else(|| {
            trace_reject!("SEC1 point is not on the curve");
            Error
        })
    }

    /// Serialize this point in compressed SEC1 form.
    ///
    /// The identity encodes as all zeroes.
    pub fn to_compressed(&self) -> CompressedPoint {
        let mut out = [0u8; 33];
        if self.infinity == 0 {
            out[0] = 0x02 | self.y.is_odd().unwrap_u8();
            out[1..].copy_from_slice(&self.x.to_bytes());
        }
        out
    }

    /// Serialize this point in uncompressed SEC1 form.
    ///
    /// The identity encodes as all zeroes.
    pub fn to_uncompressed(&self) -> UncompressedPoint {
        let mut out = [0u8; 65];
        if self.infinity == 0 {
            out[0] = TAG_UNCOMPRESSED;
            out[1..33].copy_from_slice(&self.x.to_bytes());
            out[33..].copy_from_slice(&self.y.to_bytes());
        }
        out
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &AffinePoint, b: &AffinePoint, choice: Choice) -> AffinePoint {
        AffinePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &AffinePoint) -> Choice {
        (self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)) & self.infinity.ct_eq(&other.infinity)
    }
}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DefaultIsZeroes for AffinePoint {}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &AffinePoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl Neg for AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> Self::Output {
        AffinePoint {
            x: self.x,
            y: self.y.negate(),
            infinity: self.infinity,
        }
    }
}
