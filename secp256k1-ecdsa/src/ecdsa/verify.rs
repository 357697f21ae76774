//! ECDSA verifying key.

use super::{bits2field, hazmat, Error, RecoveryId, Result, Signature};
use crate::{
    arithmetic::{lincomb_vartime, ORDER_AS_FIELD, P_MINUS_ORDER},
    AffinePoint, CompressedPoint, FieldElement, JacobianPoint, Scalar, UncompressedPoint,
};
use core::cmp::Ordering;
use elliptic_curve::subtle::Choice;
use sha2::{Digest, Sha256};
use signature::{hazmat::PrehashVerifier, Verifier};

#[cfg(feature = "alloc")]
use alloc::boxed::Box;

/// ECDSA/secp256k1 verifying key, i.e. a public key.
///
/// Verification through this type enforces the low-S rule of [BIP 0062]:
/// signatures with `s > n/2` are rejected. Use
/// [`hazmat::verify_prehashed`] to accept both forms.
///
/// [BIP 0062]: https://github.com/bitcoin/bips/blob/master/bip-0062.mediawiki
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VerifyingKey {
    /// Public key point; never the identity.
    inner: AffinePoint,
}

impl VerifyingKey {
    /// Initialize [`VerifyingKey`] from a SEC1-encoded public key, either
    /// compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        AffinePoint::from_sec1_bytes(bytes)
            .map_err(|_| Error::new())
            .and_then(Self::from_affine)
    }

    /// Initialize [`VerifyingKey`] from an affine point.
    ///
    /// Fails if the point is the identity.
    pub fn from_affine(affine: AffinePoint) -> Result<Self> {
        if bool::from(affine.is_identity()) {
            trace_reject!("verifying key is the identity");
            return Err(Error::new());
        }

        Ok(Self { inner: affine })
    }

    /// Borrow the inner [`AffinePoint`] for this public key.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.inner
    }

    /// Serialize this key in compressed SEC1 form.
    pub fn to_compressed(&self) -> CompressedPoint {
        self.inner.to_compressed()
    }

    /// Serialize this key in uncompressed SEC1 form.
    pub fn to_uncompressed(&self) -> UncompressedPoint {
        self.inner.to_uncompressed()
    }

    /// Serialize this key as a boxed SEC1 byte string, optionally applying
    /// point compression.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn to_sec1_bytes(&self, compress: bool) -> Box<[u8]> {
        if compress {
            Box::from(&self.to_compressed()[..])
        } else {
            Box::from(&self.to_uncompressed()[..])
        }
    }

    /// Recover a [`VerifyingKey`] from the given message prehash, signature
    /// and [`RecoveryId`].
    ///
    /// Computes `r⁻¹·(s·R − z·G)`, where `R` is the point identified by `r`
    /// and the recovery id, then checks that the signature verifies under
    /// the result. High-S signatures are accepted.
    pub fn recover_from_prehash(
        prehash: &[u8],
        signature: &Signature,
        recovery_id: RecoveryId,
    ) -> Result<Self> {
        let z_bytes = bits2field(prehash)?;
        let (r, s) = signature.split_scalars();

        if bool::from(r.is_zero() | s.is_zero()) {
            trace_reject!("signature has a zero component");
            return Err(Error::new());
        }

        let mut x = Option::<FieldElement>::from(FieldElement::from_bytes(&r.to_bytes()))
            .ok_or_else(Error::new)?;

        if recovery_id.is_x_reduced() {
            if x.cmp_vartime(&P_MINUS_ORDER) != Ordering::Less {
                trace_reject!("r + n is not a field element");
                return Err(Error::new());
            }
            x += ORDER_AS_FIELD;
        }

        let big_r = Option::<AffinePoint>::from(AffinePoint::decompress(
            &x.to_bytes(),
            Choice::from(recovery_id.is_y_odd() as u8),
        ))
        .ok_or_else(|| {
            trace_reject!("no curve point for recovered R.x");
            Error::new()
        })?;

        let r_inv = Option::<Scalar>::from(r.invert_vartime()).ok_or_else(Error::new)?;
        let z = Scalar::reduce_bytes(&z_bytes);
        let u1 = -(r_inv * z);
        let u2 = r_inv * s;

        let q = lincomb_vartime(&u1, &u2, &JacobianPoint::from(&big_r)).to_affine();
        let verifying_key = Self::from_affine(q)?;

        if hazmat::verify_prehashed(&verifying_key.inner, &z_bytes, signature) {
            Ok(verifying_key)
        } else {
            Err(Error::new())
        }
    }

    /// Recover a [`VerifyingKey`] from the SHA-256 digest of `msg`.
    pub fn recover_from_msg(
        msg: &[u8],
        signature: &Signature,
        recovery_id: RecoveryId,
    ) -> Result<Self> {
        Self::recover_from_prehash(&Sha256::digest(msg), signature, recovery_id)
    }
}

impl PrehashVerifier<Signature> for VerifyingKey {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> Result<()> {
        let z = bits2field(prehash)?;

        if bool::from(signature.s().is_high()) {
            trace_reject!("signature is not low-S");
            return Err(Error::new());
        }

        if hazmat::verify_prehashed(&self.inner, &z, signature) {
            Ok(())
        } else {
            Err(Error::new())
        }
    }
}

impl Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> Result<()> {
        self.verify_prehash(&Sha256::digest(msg), signature)
    }
}

impl From<VerifyingKey> for AffinePoint {
    fn from(verifying_key: VerifyingKey) -> AffinePoint {
        verifying_key.inner
    }
}

impl TryFrom<&[u8]> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_sec1_bytes(bytes)
    }
}
