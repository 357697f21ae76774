//! Elliptic Curve Digital Signature Algorithm (ECDSA).
//!
//! This module contains support for computing and verifying ECDSA signatures.
//! To use it, you will need to enable the `ecdsa` feature of this crate
//! (enabled by default).
//!
//! ## Signatures
//!
//! [`Signature`] holds the `(r, s)` scalar pair. [`SigningKey`] always
//! produces "low S" signatures (`s <= n/2`, see [BIP 0062]) and reports the
//! [`RecoveryId`] needed to recover the [`VerifyingKey`] from them.
//! [`VerifyingKey`] rejects "high S" signatures; callers who must accept
//! them can normalize first with [`Signature::normalize_s`] or use the
//! [`hazmat`] functions directly.
//!
//! ## Encodings
//!
//! - fixed-size: 64 bytes, `r || s`, both big-endian
//! - ASN.1 DER: see the [`der`] module
//!
//! [BIP 0062]: https://github.com/bitcoin/bips/blob/master/bip-0062.mediawiki

pub mod der;
pub mod hazmat;

mod sign;
mod verify;

pub use self::{sign::SigningKey, verify::VerifyingKey};
pub use signature::{self, Error};

use crate::{FieldBytes, Scalar};
use core::{cmp::Ordering, fmt};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Result type with the `ecdsa` module's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Size of a fixed-size `r || s` signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Fixed-size `r || s` signature bytes.
pub type SignatureBytes = [u8; SIGNATURE_SIZE];

/// ECDSA/secp256k1 signature: the scalar pair `(r, s)`.
///
/// Any pair of scalars is representable, including zeroes. Whether a pair is
/// a valid signature is decided at verification time.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    /// Create a signature from its scalar components.
    pub fn from_scalars(r: Scalar, s: Scalar) -> Self {
        Self { r, s }
    }

    /// Parse a fixed-size `r || s` signature.
    ///
    /// Fails if either component is `>= n`.
    pub fn from_bytes(bytes: &SignatureBytes) -> Result<Self> {
        let (r_bytes, s_bytes) = bytes.split_at(32);
        let r = Option::<Scalar>::from(Scalar::from_bytes(FieldBytes::from_slice(r_bytes)));
        let s = Option::<Scalar>::from(Scalar::from_bytes(FieldBytes::from_slice(s_bytes)));

        match (r, s) {
            (Some(r), Some(s)) => Ok(Self { r, s }),
            _ => {
                trace_reject!("signature component out of range");
                Err(Error::new())
            }
        }
    }

    /// Parse a fixed-size `r || s` signature from a slice, which must be
    /// exactly 64 bytes long.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes = SignatureBytes::try_from(slice).map_err(|_| Error::new())?;
        Self::from_bytes(&bytes)
    }

    /// Parse an ASN.1 DER-encoded signature.
    ///
    /// See [`der::decode`] for the exact acceptance rules.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        der::decode(bytes).map(|(r, s)| Self { r, s })
    }

    /// Serialize as fixed-size `r || s` bytes.
    pub fn to_bytes(&self) -> SignatureBytes {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..32].copy_from_slice(&self.r.to_bytes());
        bytes[32..].copy_from_slice(&self.s.to_bytes());
        bytes
    }

    /// Serialize as ASN.1 DER.
    pub fn to_der(&self) -> der::Signature {
        der::Signature::from_scalars(&self.r, &self.s)
    }

    /// Serialize as ASN.1 DER into a heap-allocated buffer.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn to_der_vec(&self) -> Vec<u8> {
        self.to_der().as_bytes().to_vec()
    }

    /// Serialize as ASN.1 DER into `out`, returning the number of bytes
    /// written.
    ///
    /// Size the buffer with [`Signature::der_encoded_len`], or retry with
    /// [`der::BufferTooSmall::required`] bytes after a failure. Nothing is
    /// written on failure.
    pub fn write_der(&self, out: &mut [u8]) -> core::result::Result<usize, der::BufferTooSmall> {
        der::encode_into(&self.r, &self.s, out)
    }

    /// Length of the ASN.1 DER encoding of this signature.
    pub fn der_encoded_len(&self) -> usize {
        der::encoded_len(&self.r, &self.s)
    }

    /// Get the `r` component of this signature.
    pub fn r(&self) -> Scalar {
        self.r
    }

    /// Get the `s` component of this signature.
    pub fn s(&self) -> Scalar {
        self.s
    }

    /// Split the signature into its `r` and `s` scalars.
    pub fn split_scalars(&self) -> (Scalar, Scalar) {
        (self.r, self.s)
    }

    /// Normalize signature into "low S" form as described in
    /// [BIP 0062: Dealing with Malleability][1].
    ///
    /// Returns `None` if the signature was already low-S.
    ///
    /// [1]: https://github.com/bitcoin/bips/blob/master/bip-0062.mediawiki
    pub fn normalize_s(&self) -> Option<Self> {
        let s = self.s;

        if s.is_high().into() {
            Some(Self::from_scalars(self.r, s.negate()))
        } else {
            None
        }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ecdsa::Signature<secp256k1>(")?;
        for byte in self.to_bytes() {
            write!(f, "{:02X}", byte)?;
        }
        write!(f, ")")
    }
}

impl From<Signature> for SignatureBytes {
    fn from(signature: Signature) -> SignatureBytes {
        signature.to_bytes()
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(slice: &[u8]) -> Result<Self> {
        Self::from_slice(slice)
    }
}

impl TryFrom<der::Signature> for Signature {
    type Error = Error;

    fn try_from(der: der::Signature) -> Result<Self> {
        Self::from_der(der.as_bytes())
    }
}

impl From<Signature> for der::Signature {
    fn from(signature: Signature) -> der::Signature {
        signature.to_der()
    }
}

impl signature::SignatureEncoding for Signature {
    type Repr = SignatureBytes;
}

/// Recovery IDs, a.k.a. "recid".
///
/// An integer in `0..=3` identifying which of the candidate points for `R`
/// produced a signature, which is what public key recovery needs to pick
/// the right key:
///
/// - low bit (0/1): is the y-coordinate of `R` odd?
/// - high bit (0/2): did the x-coordinate of `R` overflow the group order,
///   i.e. is `R.x = r + n`?
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Maximum supported value for the recovery ID (inclusive).
    pub const MAX: u8 = 3;

    /// Create a new [`RecoveryId`] from the following 1-bit arguments:
    ///
    /// - `is_y_odd`: is the affine y-coordinate of `R` odd?
    /// - `is_x_reduced`: did the affine x-coordinate of `R` overflow the
    ///   group order?
    pub const fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        Self(((is_x_reduced as u8) << 1) | (is_y_odd as u8))
    }

    /// Did the affine x-coordinate of `R` overflow the group order?
    pub const fn is_x_reduced(self) -> bool {
        (self.0 & 0b10) != 0
    }

    /// Is the affine y-coordinate of `R` odd?
    pub const fn is_y_odd(self) -> bool {
        (self.0 & 1) != 0
    }

    /// Convert a `u8` into a [`RecoveryId`].
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte <= Self::MAX {
            Some(Self(byte))
        } else {
            None
        }
    }

    /// Convert this [`RecoveryId`] into a `u8`.
    pub const fn to_byte(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte).ok_or_else(Error::new)
    }
}

impl From<RecoveryId> for u8 {
    fn from(id: RecoveryId) -> u8 {
        id.0
    }
}

/// Convert a message digest into the 32 bytes it contributes to the
/// signature, following `bits2field` in RFC6979 § 2.3.2.
///
/// - digests shorter than 16 bytes are rejected
/// - shorter digests are left-padded with zeroes
/// - longer digests are truncated to their leftmost 32 bytes
pub(crate) fn bits2field(prehash: &[u8]) -> Result<FieldBytes> {
    if prehash.len() < 16 {
        trace_reject!(len = prehash.len(), "prehash too short");
        return Err(Error::new());
    }

    let mut field_bytes = FieldBytes::default();

    match prehash.len().cmp(&field_bytes.len()) {
        Ordering::Equal => field_bytes.copy_from_slice(prehash),
        Ordering::Less => {
            let offset = field_bytes.len() - prehash.len();
            field_bytes[offset..].copy_from_slice(prehash);
        }
        Ordering::Greater => {
            let len = field_bytes.len();
            field_bytes.copy_from_slice(&prehash[..len]);
        }
    }

    Ok(field_bytes)
}

#[cfg(test)]
mod tests {
    use super::{bits2field, RecoveryId, Signature};
    use crate::{FieldBytes, Scalar};
    use hex_literal::hex;

    // Test vectors generated using rust-secp256k1
    #[test]
    #[rustfmt::skip]
    fn normalize_s_high() {
        let sig_hi = Signature::from_bytes(&[
            0x20, 0xc0, 0x1a, 0x91, 0x0e, 0xbb, 0x26, 0x10,
            0xaf, 0x2d, 0x76, 0x3f, 0xa0, 0x9b, 0x3b, 0x30,
            0x92, 0x3c, 0x8e, 0x40, 0x8b, 0x11, 0xdf, 0x2c,
            0x61, 0xad, 0x76, 0xd9, 0x70, 0xa2, 0xf1, 0xbc,
            0xee, 0x2f, 0x11, 0xef, 0x8c, 0xb0, 0x0a, 0x49,
            0x61, 0x7d, 0x13, 0x57, 0xf4, 0xd5, 0x56, 0x41,
            0x09, 0x0a, 0x48, 0xf2, 0x01, 0xe9, 0xb9, 0x59,
            0xc4, 0x8f, 0x6f, 0x6b, 0xec, 0x6f, 0x93, 0x8f,
        ]).unwrap();

        let sig_lo = Signature::from_bytes(&[
            0x20, 0xc0, 0x1a, 0x91, 0x0e, 0xbb, 0x26, 0x10,
            0xaf, 0x2d, 0x76, 0x3f, 0xa0, 0x9b, 0x3b, 0x30,
            0x92, 0x3c, 0x8e, 0x40, 0x8b, 0x11, 0xdf, 0x2c,
            0x61, 0xad, 0x76, 0xd9, 0x70, 0xa2, 0xf1, 0xbc,
            0x11, 0xd0, 0xee, 0x10, 0x73, 0x4f, 0xf5, 0xb6,
            0x9e, 0x82, 0xec, 0xa8, 0x0b, 0x2a, 0xa9, 0xbd,
            0xb1, 0xa4, 0x93, 0xf4, 0xad, 0x5e, 0xe6, 0xe1,
            0xfb, 0x42, 0xef, 0x20, 0xe3, 0xc6, 0xad, 0xb2,
        ]).unwrap();

        let sig_normalized = sig_hi.normalize_s().unwrap();
        assert_eq!(sig_lo, sig_normalized);
    }

    #[test]
    fn normalize_s_low() {
        #[rustfmt::skip]
        let sig = Signature::from_bytes(&[
            1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ]).unwrap();

        assert_eq!(sig.normalize_s(), None);
    }

    #[test]
    fn normalize_s_boundary() {
        let half = Scalar::from_bytes(&FieldBytes::from(hex!(
            "7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0"
        )))
        .unwrap();
        let sig = Signature::from_scalars(Scalar::ONE, half);
        assert_eq!(sig.normalize_s(), None);

        let sig = Signature::from_scalars(Scalar::ONE, half + Scalar::ONE);
        assert_eq!(sig.normalize_s().unwrap().s(), half);
    }

    #[test]
    fn fixed_size_encoding() {
        let bytes = hex!(
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
            "5d6f2ac192d8d7c0f09c575e67f6c42c6f9b61d8e3211bea3eb5bbe9bf148eac"
        );
        let sig = Signature::from_bytes(&bytes).unwrap();
        assert_eq!(sig.to_bytes(), bytes);
        assert_eq!(Signature::from_slice(&bytes).unwrap(), sig);
        assert!(Signature::from_slice(&bytes[..63]).is_err());

        // r = n is out of range
        let mut bad = bytes;
        bad[..32].copy_from_slice(&hex!(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        ));
        assert!(Signature::from_bytes(&bad).is_err());

        // zeroes are representable
        assert!(Signature::from_bytes(&[0u8; 64]).is_ok());
    }

    #[test]
    fn der_round_trip() {
        let sig = Signature::from_scalars(Scalar::from(0x1234u64), Scalar::ONE.negate());
        let der = sig.to_der();
        assert_eq!(der.len(), sig.der_encoded_len());
        assert_eq!(Signature::from_der(der.as_bytes()).unwrap(), sig);

        let mut buf = [0u8; 16];
        let err = sig.write_der(&mut buf).unwrap_err();
        assert_eq!(err.required, der.len());
        assert!(buf.iter().all(|&b| b == 0));

        let mut buf = [0u8; 80];
        let len = sig.write_der(&mut buf).unwrap();
        assert_eq!(&buf[..len], der.as_bytes());
    }

    #[test]
    fn recovery_id() {
        for byte in 0..=RecoveryId::MAX {
            let id = RecoveryId::from_byte(byte).unwrap();
            assert_eq!(id.to_byte(), byte);
            assert_eq!(RecoveryId::new(id.is_y_odd(), id.is_x_reduced()), id);
        }
        assert_eq!(RecoveryId::from_byte(4), None);
        assert!(RecoveryId::try_from(4u8).is_err());
        assert!(RecoveryId::new(true, false).is_y_odd());
        assert!(RecoveryId::new(false, true).is_x_reduced());
        assert_eq!(u8::from(RecoveryId::new(true, true)), 3);
    }

    #[test]
    fn bits2field_lengths() {
        assert!(bits2field(&[0xAA; 15]).is_err());

        let short = bits2field(&[0xAA; 16]).unwrap();
        assert_eq!(&short[..16], &[0u8; 16]);
        assert_eq!(&short[16..], &[0xAA; 16]);

        let exact = bits2field(&[0x55; 32]).unwrap();
        assert_eq!(exact, FieldBytes::from([0x55; 32]));

        let mut long = [0x11u8; 64];
        long[32..].fill(0x22);
        assert_eq!(bits2field(&long).unwrap(), FieldBytes::from([0x11; 32]));
    }
}
