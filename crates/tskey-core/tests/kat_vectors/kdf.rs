//! PBKDF2-HMAC-SHA256 and HKDF-SHA256 vectors.

use tskey_core::kdf::{hkdf_sha256, pbkdf2_sha256};

use super::{counting_seed, hex};

/// RFC 7914 §11 style PBKDF2-HMAC-SHA256 vector, c = 4096, dkLen = 32.
#[test]
fn pbkdf2_sha256_reference_vector() {
    let key = pbkdf2_sha256(b"password", b"salt").unwrap();
    assert_eq!(
        key.expose().as_slice(),
        hex("c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a").as_slice(),
        "PBKDF2-HMAC-SHA256 mismatch"
    );
}

/// Password-mode stream key: password as input, realm as salt.
#[test]
fn password_mode_stream_key() {
    let key = pbkdf2_sha256(b"password", b"example.com").unwrap();
    assert_eq!(
        key.expose().as_slice(),
        hex("c10440704f9baac88b3fb37e06820e33cb746f60042d7918b160a24a28770bb3").as_slice()
    );
}

/// Seed-mode stream key: salt is `seed[..12] || seed[240..]`, info is the realm.
#[test]
fn seed_mode_stream_key() {
    let seed = counting_seed();
    let bytes = seed.expose();
    let mut salt = Vec::with_capacity(28);
    salt.extend_from_slice(&bytes[..12]);
    salt.extend_from_slice(&bytes[240..]);

    let key = hkdf_sha256(bytes, &salt, b"example.com").unwrap();
    assert_eq!(
        key.expose().as_slice(),
        hex("bc1895dbfe64c39aa60a3e44f39c4a3ebc666c304e76329f9b58debe01f9ca30").as_slice()
    );
}
