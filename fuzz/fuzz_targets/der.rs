#![no_main]
use libfuzzer_sys::fuzz_target;
use secp256k1_ecdsa::ecdsa::{der, Signature};

fuzz_target!(|data: &[u8]| {
    let Ok(sig) = Signature::from_der(data) else {
        return;
    };

    // Re-encoding is canonical: it parses back to the same scalars and never
    // grows past the input.
    let encoded = sig.to_der();
    assert!(encoded.len() <= data.len());
    assert!(encoded.len() <= der::MAX_LEN);
    assert_eq!(Signature::from_der(encoded.as_bytes()).ok(), Some(sig));

    let mut buf = [0u8; der::MAX_LEN];
    let written = sig.write_der(&mut buf).unwrap();
    assert_eq!(&buf[..written], encoded.as_bytes());
});
