//! DER signature codec tests

#![cfg(feature = "ecdsa")]

use hex_literal::hex;
use proptest::prelude::*;
use secp256k1_ecdsa::{
    ecdsa::{der, Signature},
    FieldBytes, Scalar,
};

/// Splits a DER signature produced by the encoder into its INTEGER contents.
fn integer_contents(der: &[u8]) -> (&[u8], &[u8]) {
    assert_eq!(der[0], 0x30);
    assert_eq!(usize::from(der[1]), der.len() - 2);
    assert_eq!(der[2], 0x02);
    let r_len = usize::from(der[3]);
    let r = &der[4..4 + r_len];
    assert_eq!(der[4 + r_len], 0x02);
    let s_len = usize::from(der[5 + r_len]);
    let s = &der[6 + r_len..];
    assert_eq!(s.len(), s_len);
    (r, s)
}

fn is_minimal_positive(content: &[u8]) -> bool {
    let negative = content[0] & 0x80 != 0;
    let padded = content.len() > 1 && content[0] == 0 && content[1] & 0x80 == 0;
    !negative && !padded
}

prop_compose! {
    fn scalar()(bytes in any::<[u8; 32]>()) -> Scalar {
        Scalar::reduce_bytes(&FieldBytes::from(bytes))
    }
}

#[test]
fn rejection_set() {
    let rejected: &[&[u8]] = &[
        // empty
        &[],
        // wrong outer tag
        &hex!("3106020101020101"),
        // reserved length octet
        &hex!("30ff020101020101"),
        // declared length overruns the input
        &hex!("3007020101020101"),
        // declared length falls short of the input
        &hex!("3005020101020101"),
        // trailing bytes after the SEQUENCE
        &hex!("300602010102010100"),
        // trailing bytes inside the SEQUENCE
        &hex!("30080201010201010500"),
        // non-minimal zero padding
        &hex!("300702020001020101"),
        // wrong inner tag
        &hex!("3006030101020101"),
        // empty INTEGER
        &hex!("30050200020101"),
        // indefinite length
        &hex!("3080020101020101"),
        // long form length below 128
        &hex!("308106020101020101"),
    ];

    for bytes in rejected {
        assert!(
            Signature::from_der(bytes).is_err(),
            "accepted {}",
            hex::encode(bytes)
        );
    }
}

#[test]
fn zero_and_negative_integers_decode_as_zero() {
    // explicit zeroes
    let (r, s) = der::decode(&hex!("3006020100020100")).unwrap();
    assert_eq!((r, s), (Scalar::ZERO, Scalar::ZERO));

    // negative r
    let (r, s) = der::decode(&hex!("3006020180020101")).unwrap();
    assert_eq!((r, s), (Scalar::ZERO, Scalar::ONE));

    // s = n
    let sig = hex!(
        "3026020101"
        "022100fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
    );
    let (r, s) = der::decode(&sig).unwrap();
    assert_eq!((r, s), (Scalar::ONE, Scalar::ZERO));
}

#[test]
fn lenient_ff_padding() {
    // 0xFF followed by a byte with the high bit clear is accepted as negative
    let (r, s) = der::decode(&hex!("300702020f7f020101")).unwrap();
    assert_eq!(r, Scalar::from(0x0f7f_u64));
    assert_eq!(s, Scalar::ONE);

    let (r, _) = der::decode(&hex!("30070202ff7f020101")).unwrap();
    assert_eq!(r, Scalar::ZERO);

    assert!(der::decode(&hex!("30070202ff80020101")).is_err());
}

#[test]
fn long_form_lengths() {
    // 33 significant bytes in r: still well formed, decodes as zero
    let mut sig = [0u8; 2 + 2 + 33 + 3];
    sig[0] = 0x30;
    sig[1] = (sig.len() - 2) as u8;
    sig[2] = 0x02;
    sig[3] = 33;
    sig[4] = 0x01;
    sig[37..].copy_from_slice(&[0x02, 0x01, 0x01]);
    let (r, s) = der::decode(&sig).unwrap();
    assert_eq!((r, s), (Scalar::ZERO, Scalar::ONE));

    // the same INTEGER with a long-form length of 128 content bytes
    let mut long = [0u8; 3 + 3 + 128 + 3];
    long[..3].copy_from_slice(&[0x30, 0x81, 134]);
    long[3..6].copy_from_slice(&[0x02, 0x81, 0x80]);
    long[6] = 0x01;
    long[134..].copy_from_slice(&[0x02, 0x01, 0x01]);
    let (r, s) = der::decode(&long).unwrap();
    assert_eq!((r, s), (Scalar::ZERO, Scalar::ONE));
}

proptest! {
    #[test]
    fn round_trip(r in scalar(), s in scalar()) {
        let sig = Signature::from_scalars(r, s);
        let der = sig.to_der();

        prop_assert_eq!(der.len(), sig.der_encoded_len());
        prop_assert!(der.len() <= der::MAX_LEN);
        prop_assert_eq!(Signature::from_der(der.as_bytes()).unwrap(), sig);
    }

    #[test]
    fn encoding_is_minimal(r in scalar(), s in scalar()) {
        let der = Signature::from_scalars(r, s).to_der();
        let (r_content, s_content) = integer_contents(der.as_bytes());

        prop_assert!(is_minimal_positive(r_content));
        prop_assert!(is_minimal_positive(s_content));
    }

    #[test]
    fn write_der_two_phase(r in scalar(), s in scalar(), short in 0usize..8) {
        let sig = Signature::from_scalars(r, s);
        let required = sig.der_encoded_len();

        let mut buf = [0xAAu8; der::MAX_LEN];
        let too_small = required - 1 - short;
        let err = sig.write_der(&mut buf[..too_small]).unwrap_err();
        prop_assert_eq!(err.required, required);
        prop_assert!(buf.iter().all(|&b| b == 0xAA));

        let written = sig.write_der(&mut buf).unwrap();
        let der = sig.to_der();
        prop_assert_eq!(&buf[..written], der.as_bytes());
    }

    #[test]
    fn arbitrary_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..80)) {
        if let Ok(sig) = Signature::from_der(&bytes) {
            let der = sig.to_der();
            prop_assert_eq!(Signature::from_der(der.as_bytes()).unwrap(), sig);
            prop_assert!(der.len() <= bytes.len());
        }
    }
}
