//! ECDSA signing key.

use super::{bits2field, hazmat, Error, RecoveryId, Result, Signature, VerifyingKey};
use crate::{arithmetic::mul_base, FieldBytes, Scalar, ORDER};
use core::fmt::{self, Debug};
use elliptic_curve::{
    consts::U32,
    generic_array::GenericArray,
    rand_core::CryptoRngCore,
    subtle::ConstantTimeEq,
    zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing},
};
use sha2::{Digest, Sha256};
use signature::{hazmat::PrehashSigner, Signer};

/// ECDSA/secp256k1 signing key.
///
/// Signatures are computed with [RFC6979] deterministic nonces over
/// HMAC-SHA-256 and are always normalized to low-S.
///
/// [RFC6979]: https://datatracker.ietf.org/doc/html/rfc6979
#[derive(Clone)]
pub struct SigningKey {
    /// Secret scalar value, in `[1, n)`.
    secret_scalar: Scalar,

    /// Verifying key which corresponds to this signing key.
    verifying_key: VerifyingKey,
}

impl SigningKey {
    /// Generate a cryptographically random [`SigningKey`].
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        let mut bytes = Zeroizing::new([0u8; 32]);

        loop {
            rng.fill_bytes(&mut *bytes);

            if let Ok(signing_key) = Self::from_slice(&bytes[..]) {
                return signing_key;
            }
        }
    }

    /// Parse a [`SigningKey`] from its 32-byte big-endian serialization.
    ///
    /// The value must be in `[1, n)`.
    pub fn from_bytes(bytes: &FieldBytes) -> Result<Self> {
        let secret_scalar = Option::<Scalar>::from(Scalar::from_bytes(bytes))
            .filter(|scalar| !bool::from(scalar.is_zero()))
            .ok_or_else(Error::new)?;

        let verifying_key = VerifyingKey::from_affine(mul_base(&secret_scalar).to_affine())?;

        Ok(Self {
            secret_scalar,
            verifying_key,
        })
    }

    /// Parse a [`SigningKey`] from a byte slice, which must be exactly 32
    /// bytes long.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != 32 {
            return Err(Error::new());
        }

        Self::from_bytes(FieldBytes::from_slice(slice))
    }

    /// Serialize this [`SigningKey`] as 32 big-endian bytes.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material. Please treat it with the care it deserves!
    pub fn to_bytes(&self) -> FieldBytes {
        self.secret_scalar.to_bytes()
    }

    /// Get the [`VerifyingKey`] which corresponds to this [`SigningKey`].
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Sign the given message prehash, returning a signature and the
    /// [`RecoveryId`] of its `R` point.
    ///
    /// The prehash goes through `bits2field`: it must be at least 16 bytes;
    /// longer than 32 bytes are truncated to the leftmost 32.
    pub fn sign_prehash_recoverable(&self, prehash: &[u8]) -> Result<(Signature, RecoveryId)> {
        let z = bits2field(prehash)?;
        let k = self.nonce(&z)?;
        hazmat::sign_prehashed(&self.secret_scalar, &z, &k)
    }

    /// Sign the SHA-256 digest of `msg`, returning a signature and the
    /// [`RecoveryId`] of its `R` point.
    pub fn sign_recoverable(&self, msg: &[u8]) -> Result<(Signature, RecoveryId)> {
        self.sign_prehash_recoverable(&Sha256::digest(msg))
    }

    /// Derive the RFC6979 nonce for the message `z`.
    fn nonce(&self, z: &FieldBytes) -> Result<Zeroizing<Scalar>> {
        let x: Zeroizing<[u8; 32]> = Zeroizing::new(self.secret_scalar.to_bytes().into());
        let h = Scalar::reduce_bytes(z).to_bytes();

        let mut k_bytes = rfc6979::generate_k::<Sha256, U32>(
            GenericArray::from_slice(&x[..]),
            &FieldBytes::from(ORDER),
            &h,
            &[],
        );
        let k = Option::<Scalar>::from(Scalar::from_bytes(&k_bytes));
        k_bytes.as_mut_slice().zeroize();

        k.map(Zeroizing::new).ok_or_else(Error::new)
    }
}

impl Signer<Signature> for SigningKey {
    fn try_sign(&self, msg: &[u8]) -> Result<Signature> {
        self.sign_recoverable(msg).map(|(signature, _)| signature)
    }
}

impl Signer<(Signature, RecoveryId)> for SigningKey {
    fn try_sign(&self, msg: &[u8]) -> Result<(Signature, RecoveryId)> {
        self.sign_recoverable(msg)
    }
}

impl PrehashSigner<Signature> for SigningKey {
    fn sign_prehash(&self, prehash: &[u8]) -> Result<Signature> {
        self.sign_prehash_recoverable(prehash)
            .map(|(signature, _)| signature)
    }
}

impl PrehashSigner<(Signature, RecoveryId)> for SigningKey {
    fn sign_prehash(&self, prehash: &[u8]) -> Result<(Signature, RecoveryId)> {
        self.sign_prehash_recoverable(prehash)
    }
}

impl From<&SigningKey> for VerifyingKey {
    fn from(signing_key: &SigningKey) -> VerifyingKey {
        *signing_key.verifying_key()
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.secret_scalar.zeroize();
    }
}

impl ZeroizeOnDrop for SigningKey {}

impl Eq for SigningKey {}

impl PartialEq for SigningKey {
    fn eq(&self, other: &SigningKey) -> bool {
        self.secret_scalar.ct_eq(&other.secret_scalar).into()
    }
}
