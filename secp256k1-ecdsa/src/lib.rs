//! ECDSA over the secp256k1 elliptic curve.
//!
//! Provides:
//!
//! - signing with RFC6979 deterministic nonces and low-S normalization,
//!   along with the recovery id of each signature
//! - verification, including recovery of the verifying key from a signature
//! - a DER codec for signatures which always emits minimal encodings but
//!   accepts the historically lenient inputs found on the wire
//!
//! The underlying field, scalar and point arithmetic is implemented in the
//! [`arithmetic`] module.
//!
//! ## Usage
//!
#![cfg_attr(all(feature = "ecdsa", feature = "std"), doc = "```")]
#![cfg_attr(not(all(feature = "ecdsa", feature = "std")), doc = "```ignore")]
//! use secp256k1_ecdsa::ecdsa::{
//!     signature::{Signer, Verifier},
//!     Signature, SigningKey, VerifyingKey,
//! };
//!
//! let signing_key = SigningKey::from_bytes(&[0x42; 32].into())?;
//! let message = b"ECDSA proves knowledge of a secret number in the context of a single message";
//!
//! let signature: Signature = signing_key.sign(message);
//! let der = signature.to_der();
//!
//! let verifying_key = VerifyingKey::from_sec1_bytes(&signing_key.verifying_key().to_compressed())?;
//! let signature = Signature::from_der(der.as_bytes())?;
//! assert!(verifying_key.verify(message, &signature).is_ok());
//! # Ok::<(), secp256k1_ecdsa::ecdsa::Error>(())
//! ```
//!
//! ## Minimum Supported Rust Version
//!
//! Rust **1.65** or higher.
//!
//! Minimum supported Rust version can be changed in the future, but it will be
//! done with a minor version bump.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

#[cfg(feature = "alloc")]
#[allow(unused_imports)]
#[macro_use]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

#[macro_use]
mod macros;

pub mod arithmetic;

#[cfg(feature = "ecdsa")]
#[cfg_attr(docsrs, doc(cfg(feature = "ecdsa")))]
pub mod ecdsa;

#[cfg(any(feature = "test-vectors", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-vectors")))]
pub mod test_vectors;

pub use crate::arithmetic::{AffinePoint, FieldElement, JacobianPoint, Scalar};
pub use elliptic_curve;

use elliptic_curve::{consts::U32, generic_array::GenericArray};

/// 32-byte serialized field element or scalar, big-endian.
pub type FieldBytes = GenericArray<u8, U32>;

/// SEC1-encoded compressed curve point.
pub type CompressedPoint = [u8; 33];

/// SEC1-encoded uncompressed curve point.
pub type UncompressedPoint = [u8; 65];

/// Order of the secp256k1 group, big-endian.
///
/// ```text
/// n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141
/// ```
pub const ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];
