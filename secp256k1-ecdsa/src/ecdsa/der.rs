//! ASN.1 DER encoding of ECDSA signatures.
//!
//! ```text
//! ECDSA-Sig-Value ::= SEQUENCE {
//!     r INTEGER,
//!     s INTEGER
//! }
//! ```
//!
//! Encoding always produces the minimal form. Decoding follows the rules
//! libsecp256k1 applies to untrusted input: lengths must be minimal and
//! definite, integers must not carry superfluous `0x00` padding, and integers
//! which do not fit in a scalar (negative, wider than 32 bytes, or `>= n`)
//! decode as zero rather than failing. Superfluous `0xFF` padding is rejected
//! only when the following byte has its high bit set, which some historical
//! signatures rely on.

use super::{Error, Result};
use crate::{FieldBytes, Scalar};
use core::fmt;

/// Maximum size of a DER-encoded secp256k1 signature: two 33-byte integers
/// plus three tag/length headers.
pub const MAX_LEN: usize = 72;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// Bounds-checked cursor over untrusted DER input.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Have all bytes been consumed?
    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek().ok_or_else(Error::new)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::new());
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a DER length.
    ///
    /// Rejects the reserved `0xFF` octet, the indefinite form, and every
    /// non-minimal long form. A long-form length must also fit in the bytes
    /// which follow it. On error the cursor position is unspecified.
    pub fn read_length(&mut self) -> Result<usize> {
        let b1 = self.read_byte()?;

        if b1 == 0xFF {
            trace_reject!("DER length octet 0xFF is reserved");
            return Err(Error::new());
        }

        if b1 & 0x80 == 0 {
            return Ok(usize::from(b1));
        }

        if b1 == 0x80 {
            trace_reject!("indefinite DER length");
            return Err(Error::new());
        }

        let mut octets_left = usize::from(b1 & 0x7F);
        if octets_left > self.remaining() {
            trace_reject!(octets_left, "DER length octets exceed input");
            return Err(Error::new());
        }

        if self.peek() == Some(0) {
            trace_reject!("non-minimal DER length: leading zero octet");
            return Err(Error::new());
        }

        if octets_left > core::mem::size_of::<usize>() {
            trace_reject!(octets_left, "DER length does not fit in usize");
            return Err(Error::new());
        }

        let mut len = 0usize;
        while octets_left > 0 {
            let octet = self.peek().ok_or_else(Error::new)?;
            len = (len << 8) | usize::from(octet);
            // `octets_left` counts the current octet, which is still unread
            if len + octets_left > self.remaining() {
                trace_reject!(len, "DER length exceeds input");
                return Err(Error::new());
            }
            self.pos += 1;
            octets_left -= 1;
        }

        if len < 0x80 {
            trace_reject!(len, "non-minimal DER length: long form below 128");
            return Err(Error::new());
        }

        Ok(len)
    }

    /// Read a DER INTEGER as a scalar.
    ///
    /// Out-of-range values (negative, more than 32 significant bytes, or
    /// `>= n`) decode as [`Scalar::ZERO`]: the encoding itself is still
    /// well-formed and the cursor moves past it.
    pub fn read_integer(&mut self) -> Result<Scalar> {
        if self.peek() != Some(INTEGER_TAG) {
            trace_reject!("expected DER INTEGER tag");
            return Err(Error::new());
        }
        self.pos += 1;

        let len = self.read_length()?;
        if len == 0 || len > self.remaining() {
            trace_reject!(len, "DER INTEGER length out of bounds");
            return Err(Error::new());
        }

        let mut content = self.read_slice(len)?;

        if content[0] == 0x00 && len > 1 && content[1] & 0x80 == 0x00 {
            trace_reject!("superfluous 0x00 padding in DER INTEGER");
            return Err(Error::new());
        }

        if content[0] == 0xFF && len > 1 && content[1] & 0x80 == 0x80 {
            trace_reject!("superfluous 0xFF padding in DER INTEGER");
            return Err(Error::new());
        }

        // negative
        let mut overflow = content[0] & 0x80 == 0x80;

        while let [0, rest @ ..] = content {
            content = rest;
        }

        if content.len() > 32 {
            overflow = true;
        }

        if overflow {
            return Ok(Scalar::ZERO);
        }

        let mut bytes = FieldBytes::default();
        bytes[32 - content.len()..].copy_from_slice(content);
        let (scalar, overflow) = Scalar::from_bytes_overflowing(&bytes);

        if overflow.into() {
            Ok(Scalar::ZERO)
        } else {
            Ok(scalar)
        }
    }
}

/// Parse a DER-encoded signature into its `(r, s)` scalars.
///
/// Fails only on malformed encodings. The scalars are not checked for being
/// non-zero or low: that is left to verification.
pub fn decode(bytes: &[u8]) -> Result<(Scalar, Scalar)> {
    let mut reader = Reader::new(bytes);

    if reader.read_byte()? != SEQUENCE_TAG {
        trace_reject!("expected DER SEQUENCE tag");
        return Err(Error::new());
    }

    let len = reader.read_length()?;
    if len != reader.remaining() {
        trace_reject!(
            len,
            remaining = reader.remaining(),
            "DER SEQUENCE length does not match input"
        );
        return Err(Error::new());
    }

    let r = reader.read_integer()?;
    let s = reader.read_integer()?;

    if !reader.is_finished() {
        trace_reject!(
            remaining = reader.remaining(),
            "trailing bytes inside DER SEQUENCE"
        );
        return Err(Error::new());
    }

    Ok((r, s))
}

/// Minimal big-endian INTEGER content for `scalar`: the 32-byte value behind
/// a zero guard byte, with leading zeros stripped while the next byte keeps
/// the value non-negative.
fn integer_content(scalar: &Scalar) -> ([u8; 33], usize) {
    let mut buf = [0u8; 33];
    buf[1..].copy_from_slice(&scalar.to_bytes());

    let mut start = 0;
    while start < 32 && buf[start] == 0 && buf[start + 1] < 0x80 {
        start += 1;
    }
    (buf, start)
}

/// Length of the DER encoding of `(r, s)`.
pub fn encoded_len(r: &Scalar, s: &Scalar) -> usize {
    let (_, r_start) = integer_content(r);
    let (_, s_start) = integer_content(s);
    6 + (33 - r_start) + (33 - s_start)
}

/// Write the DER encoding of `(r, s)` into `out`, returning the number of
/// bytes written.
///
/// If `out` is too small nothing is written and the error carries the
/// required size.
pub fn encode_into(
    r: &Scalar,
    s: &Scalar,
    out: &mut [u8],
) -> core::result::Result<usize, BufferTooSmall> {
    let (r_buf, r_start) = integer_content(r);
    let (s_buf, s_start) = integer_content(s);
    let r_bytes = &r_buf[r_start..];
    let s_bytes = &s_buf[s_start..];

    let required = 6 + r_bytes.len() + s_bytes.len();
    if out.len() < required {
        return Err(BufferTooSmall { required });
    }

    out[0] = SEQUENCE_TAG;
    out[1] = (4 + r_bytes.len() + s_bytes.len()) as u8;
    out[2] = INTEGER_TAG;
    out[3] = r_bytes.len() as u8;
    out[4..4 + r_bytes.len()].copy_from_slice(r_bytes);

    let s_pos = 4 + r_bytes.len();
    out[s_pos] = INTEGER_TAG;
    out[s_pos + 1] = s_bytes.len() as u8;
    out[s_pos + 2..required].copy_from_slice(s_bytes);

    Ok(required)
}

/// Output buffer is too small to hold a DER-encoded signature.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BufferTooSmall {
    /// Number of bytes the encoding needs.
    pub required: usize,
}

impl fmt::Display for BufferTooSmall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer too small: {} bytes required", self.required)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BufferTooSmall {}

/// An owned DER-encoded signature, stored inline.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    bytes: [u8; MAX_LEN],
    len: usize,
}

impl Signature {
    /// Encode `(r, s)`.
    pub fn from_scalars(r: &Scalar, s: &Scalar) -> Self {
        let mut bytes = [0u8; MAX_LEN];
        let len = match encode_into(r, s, &mut bytes) {
            Ok(len) => len,
            // two 33-byte integers plus headers always fit
            Err(BufferTooSmall { required }) => unreachable!("{} > {}", required, MAX_LEN),
        };
        Self { bytes, len }
    }

    /// Borrow the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Length of the encoding in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: an encoded signature has at least 8 bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decode the `(r, s)` scalars back out of this encoding.
    pub fn to_scalars(&self) -> Result<(Scalar, Scalar)> {
        decode(self.as_bytes())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "der::Signature(")?;
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    /// Accepts any input [`decode`] accepts and stores its canonical
    /// re-encoding.
    fn try_from(bytes: &[u8]) -> Result<Self> {
        let (r, s) = decode(bytes)?;
        Ok(Self::from_scalars(&r, &s))
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode_into, encoded_len, BufferTooSmall, Reader, Signature, MAX_LEN};
    use crate::{FieldBytes, Scalar};
    use hex_literal::hex;

    fn scalar(bytes: [u8; 32]) -> Scalar {
        Scalar::from_bytes(&FieldBytes::from(bytes)).unwrap()
    }

    fn read_length(bytes: &[u8]) -> Option<usize> {
        Reader::new(bytes).read_length().ok()
    }

    fn read_integer(bytes: &[u8]) -> Option<Scalar> {
        let mut reader = Reader::new(bytes);
        let scalar = reader.read_integer().ok()?;
        assert!(reader.is_finished());
        Some(scalar)
    }

    #[test]
    fn length_short_form() {
        assert_eq!(read_length(&[0x00]), Some(0));
        assert_eq!(read_length(&[0x45]), Some(0x45));
        assert_eq!(read_length(&[0x7F]), Some(0x7F));
    }

    #[test]
    fn length_rejects() {
        // empty
        assert_eq!(read_length(&[]), None);
        // reserved
        assert_eq!(read_length(&[0xFF, 0x01]), None);
        // indefinite
        assert_eq!(read_length(&[0x80, 0x00]), None);
        // more length octets than input
        assert_eq!(read_length(&[0x82, 0x01]), None);
        // leading zero octet
        let mut buf = [0u8; 0x103];
        buf[..3].copy_from_slice(&[0x82, 0x00, 0x80]);
        assert_eq!(read_length(&buf), None);
        // too many octets for usize
        let mut buf = [0xAAu8; 16];
        buf[0] = 0x80 | (core::mem::size_of::<usize>() as u8 + 1);
        assert_eq!(read_length(&buf), None);
        // long form for a value below 128
        let mut buf = [0u8; 0x81];
        buf[..2].copy_from_slice(&[0x81, 0x7F]);
        assert_eq!(read_length(&buf), None);
        // longer than the input
        assert_eq!(read_length(&[0x85, 0x01, 0x02, 0x03, 0x04, 0x05]), None);
    }

    #[test]
    fn length_long_form() {
        let mut buf = [0u8; 2 + 0x80];
        buf[..2].copy_from_slice(&[0x81, 0x80]);
        let mut reader = Reader::new(&buf);
        assert_eq!(reader.read_length().unwrap(), 0x80);
        assert_eq!(reader.remaining(), 0x80);

        // one byte short of the declared length
        assert_eq!(read_length(&buf[..buf.len() - 1]), None);

        let mut buf = [0u8; 3 + 0x0102];
        buf[..3].copy_from_slice(&[0x82, 0x01, 0x02]);
        assert_eq!(read_length(&buf), Some(0x0102));
    }

    #[test]
    fn integer_values() {
        assert_eq!(read_integer(&hex!("020100")), Some(Scalar::ZERO));
        assert_eq!(read_integer(&hex!("020101")), Some(Scalar::ONE));
        assert_eq!(read_integer(&hex!("02020080")), Some(Scalar::from(0x80)));
        assert_eq!(
            read_integer(&hex!(
                "022100fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"
            )),
            Some(Scalar::ONE.negate())
        );
    }

    #[test]
    fn integer_rejects() {
        // empty, wrong tag, zero length, truncated
        assert_eq!(read_integer(&[]), None);
        assert_eq!(read_integer(&hex!("030101")), None);
        assert_eq!(read_integer(&hex!("0200")), None);
        assert_eq!(read_integer(&hex!("020201")), None);
        // superfluous zero padding
        assert_eq!(read_integer(&hex!("02020001")), None);
        assert_eq!(read_integer(&hex!("0203000080")), None);
        // superfluous 0xFF padding in front of a set high bit
        assert_eq!(read_integer(&hex!("0202ff80")), None);
    }

    #[test]
    fn integer_overflow_decodes_as_zero() {
        // negative
        assert_eq!(read_integer(&hex!("020180")), Some(Scalar::ZERO));
        assert_eq!(read_integer(&hex!("0201ff")), Some(Scalar::ZERO));
        // 0xFF followed by a clear high bit is tolerated, as a negative value
        assert_eq!(read_integer(&hex!("0202ff7f")), Some(Scalar::ZERO));
        // n itself
        assert_eq!(
            read_integer(&hex!(
                "022100fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
            )),
            Some(Scalar::ZERO)
        );
        // 33 significant bytes
        assert_eq!(
            read_integer(&hex!(
                "0221010000000000000000000000000000000000000000000000000000000000000001"
            )),
            Some(Scalar::ZERO)
        );
    }

    #[test]
    fn decode_known_signature() {
        let der = hex!(
            "3044022079be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
            "02205d6f2ac192d8d7c0f09c575e67f6c42c6f9b61d8e3211bea3eb5bbe9bf148eac"
        );
        let (r, s) = decode(&der).unwrap();
        assert_eq!(
            r,
            scalar(hex!(
                "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
            ))
        );
        assert_eq!(
            s,
            scalar(hex!(
                "5d6f2ac192d8d7c0f09c575e67f6c42c6f9b61d8e3211bea3eb5bbe9bf148eac"
            ))
        );

        let mut out = [0u8; MAX_LEN];
        let len = encode_into(&r, &s, &mut out).unwrap();
        assert_eq!(&out[..len], &der[..]);
    }

    #[test]
    fn decode_rejects() {
        // empty
        assert!(decode(&[]).is_err());
        // wrong tag
        assert!(decode(&hex!("3106020101020101")).is_err());
        // reserved length octet
        assert!(decode(&hex!("30ff020101020101")).is_err());
        // declared length longer than input
        assert!(decode(&hex!("3007020101020101")).is_err());
        // declared length shorter than input
        assert!(decode(&hex!("3005020101020101")).is_err());
        // trailing bytes after the sequence
        assert!(decode(&hex!("300602010102010100")).is_err());
        // trailing bytes inside the sequence
        assert!(decode(&hex!("3009020101020101020101")).is_err());
        // missing s
        assert!(decode(&hex!("3003020101")).is_err());
        // non-minimal padding
        assert!(decode(&hex!("300702020001020101")).is_err());
    }

    #[test]
    fn decode_accepts_zero_and_oversized_integers() {
        assert_eq!(
            decode(&hex!("3006020100020100")).unwrap(),
            (Scalar::ZERO, Scalar::ZERO)
        );

        // SEQUENCE with a long-form length holding two 65-byte integers
        let mut der = [0u8; 3 + 2 * 67];
        der[..3].copy_from_slice(&[0x30, 0x81, 0x86]);
        for start in [3, 70] {
            der[start..start + 3].copy_from_slice(&[0x02, 0x41, 0x01]);
        }
        assert_eq!(decode(&der).unwrap(), (Scalar::ZERO, Scalar::ZERO));
    }

    #[test]
    fn encode_minimal() {
        let mut out = [0u8; MAX_LEN];

        let len = encode_into(&Scalar::ZERO, &Scalar::ZERO, &mut out).unwrap();
        assert_eq!(&out[..len], &hex!("3006020100020100"));

        let len = encode_into(&Scalar::ONE, &Scalar::from(0x80), &mut out).unwrap();
        assert_eq!(&out[..len], &hex!("300702010102020080"));

        let big = Scalar::ONE.negate();
        let len = encode_into(&big, &big, &mut out).unwrap();
        assert_eq!(len, MAX_LEN);
        assert_eq!(encoded_len(&big, &big), MAX_LEN);
        assert_eq!(&out[..6], &hex!("3046022100ff"));
    }

    #[test]
    fn encode_reports_required_size() {
        let big = Scalar::ONE.negate();
        let mut out = [0xAAu8; MAX_LEN - 1];
        assert_eq!(
            encode_into(&big, &big, &mut out),
            Err(BufferTooSmall { required: MAX_LEN })
        );
        assert!(out.iter().all(|&b| b == 0xAA));

        let mut out = [0u8; 7];
        assert_eq!(
            encode_into(&Scalar::ONE, &Scalar::ONE, &mut out),
            Err(BufferTooSmall { required: 8 })
        );
        let mut out = [0u8; 8];
        assert_eq!(encode_into(&Scalar::ONE, &Scalar::ONE, &mut out), Ok(8));
    }

    #[test]
    fn owned_signature() {
        let sig = Signature::from_scalars(&Scalar::ONE, &Scalar::from(2));
        assert_eq!(sig.as_bytes(), &hex!("3006020101020102"));
        assert_eq!(sig.len(), 8);
        assert_eq!(sig.to_scalars().unwrap(), (Scalar::ONE, Scalar::from(2)));
        assert_eq!(
            Signature::try_from(&hex!("3006020101020102")[..]).unwrap(),
            sig
        );
    }
}
