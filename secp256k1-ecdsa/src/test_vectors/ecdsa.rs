//! ECDSA/secp256k1 test vectors

use hex_literal::hex;

/// Known-answer vector for signing with an explicit nonce.
pub struct TestVector {
    /// Secret key.
    pub d: &'static [u8; 32],
    /// Public key x-coordinate.
    pub q_x: &'static [u8; 32],
    /// Public key y-coordinate.
    pub q_y: &'static [u8; 32],
    /// Nonce.
    pub k: &'static [u8; 32],
    /// Prehashed message.
    pub m: &'static [u8; 32],
    /// Signature `r` component.
    pub r: &'static [u8; 32],
    /// Signature `s` component, low-S.
    pub s: &'static [u8; 32],
    /// Recovery id of the signature.
    pub recid: u8,
}

/// Known-answer vector for signing with an RFC6979 nonce over SHA-256.
pub struct Rfc6979TestVector {
    /// Secret key.
    pub d: &'static [u8; 32],
    /// Message, before hashing.
    pub msg: &'static [u8],
    /// Signature `r` component.
    pub r: &'static [u8; 32],
    /// Signature `s` component, low-S.
    pub s: &'static [u8; 32],
    /// Recovery id of the signature.
    pub recid: u8,
}

/// ECDSA/secp256k1 test vectors
pub const ECDSA_TEST_VECTORS: &[TestVector] = &[TestVector {
    d: &hex!("ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f"),
    q_x: &hex!("779dd197a5df977ed2cf6cb31d82d43328b790dc6b3b7d4437a427bd5847dfcd"),
    q_y: &hex!("e94b724a555b6d017bb7607c3e3281daf5b1699d6ef4124975c9237b917d426f"),
    k: &hex!("49a0d7b786ec9cde0d0721d72804befd06571c974b191efb42ecf322ba9ddd9a"),
    m: &hex!("4b688df40bcedbe641ddb16ff0a1842d9c67ea1c3bf63f3e0471baa664531d1a"),
    r: &hex!("241097efbf8b63bf145c8961dbdf10c310efbb3b2676bbc0f8b08505c9e2f795"),
    s: &hex!("021006b7838609339e8b415a7f9acb1b661828131aef1ecbc7955dfb01f3ca0e"),
    recid: 0,
}];

/// Private key 1 signing SHA-256("") with the smallest nonces.
pub const FIXED_NONCE_TEST_VECTORS: &[TestVector] = &[
    TestVector {
        d: &hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        q_x: &hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        q_y: &hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
        k: &hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        m: &hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
        r: &hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        s: &hex!("5d6f2ac192d8d7c0f09c575e67f6c42c6f9b61d8e3211bea3eb5bbe9bf148eac"),
        recid: 0,
    },
    TestVector {
        d: &hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        q_x: &hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        q_y: &hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
        k: &hex!("0000000000000000000000000000000000000000000000000000000000000002"),
        m: &hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
        r: &hex!("c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"),
        s: &hex!("2b255e14928b333f1a5f65646867e500789bf4ceb683384197b18d2265d495a4"),
        recid: 1,
    },
];

/// Deterministic signatures from the widely published secp256k1 RFC6979
/// vectors, normalized to low-S.
pub const RFC6979_TEST_VECTORS: &[Rfc6979TestVector] = &[
    Rfc6979TestVector {
        d: &hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        msg: b"Satoshi Nakamoto",
        r: &hex!("934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d8"),
        s: &hex!("2442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5"),
        recid: 1,
    },
    Rfc6979TestVector {
        d: &hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        msg: b"",
        r: &hex!("77c8d336572f6f466055b5f70f433851f8f535f6c4fc71133a6cfd71079d03b7"),
        s: &hex!("0ed9f5eb8aa5b266abac35d416c3207e7a538bf5f37649727d7a9823b1069577"),
        recid: 1,
    },
    Rfc6979TestVector {
        d: &hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        msg: b"All those moments will be lost in time, like tears in rain. Time to die...",
        r: &hex!("8600dbd41e348fe5c9465ab92d23e3db8b98b873beecd930736488696438cb6b"),
        s: &hex!("547fe64427496db33bf66019dacbf0039c04199abb0122918601db38a72cfc21"),
        recid: 0,
    },
    Rfc6979TestVector {
        d: &hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"),
        msg: b"Satoshi Nakamoto",
        r: &hex!("fd567d121db66e382991534ada77a6bd3106f0a1098c231e47993447cd6af2d0"),
        s: &hex!("6b39cd0eb1bc8603e159ef5c20a5c8ad685a45b06ce9bebed3f153d10d93bed5"),
        recid: 0,
    },
];
