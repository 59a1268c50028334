//! AES-256-GCM vectors: NIST SP 800-38D and the seed envelope.

use tskey_core::symmetric::{open, seal, TAG_LEN};
use tskey_core::{decrypt_seed, encrypt_seed, ENCRYPTED_SEED_LEN};

use super::{counting_seed, hex};

/// NIST SP 800-38D Test Case 14: AES-256-GCM, zero key / IV / plaintext.
///
/// CT:  cea7403d4d606b6e074ec5d3baf39d18
/// Tag: d0d1c8a799996bf0265b98b5d48ab919
#[test]
fn nist_test_case_14_aes256_gcm() {
    let sealed = seal(&[0u8; 16], &[0u8; 32], [0u8; 12]).unwrap();
    assert_eq!(
        sealed.as_slice(),
        hex("cea7403d4d606b6e074ec5d3baf39d18d0d1c8a799996bf0265b98b5d48ab919").as_slice(),
        "NIST Test Case 14 mismatch"
    );

    let opened = open(&sealed, &[0u8; 32], [0u8; 12]).unwrap();
    assert_eq!(opened.as_slice(), &[0u8; 16]);
}

/// Envelope for seed `00..ff` under password `"password"`.
#[test]
fn seed_envelope_vector() {
    let seed = counting_seed();
    let sealed = encrypt_seed(seed.expose(), "password").unwrap();
    let bytes = sealed.as_bytes();

    assert_eq!(bytes.len(), ENCRYPTED_SEED_LEN);
    assert_eq!(&bytes[..12], &seed.expose()[..12], "nonce stored in clear");
    assert_eq!(
        &bytes[12..28],
        hex("96ac4a8c56819d9b92feb1cc8822dbe2").as_slice(),
        "first ciphertext block mismatch"
    );
    assert_eq!(
        &bytes[ENCRYPTED_SEED_LEN - TAG_LEN..],
        hex("818a672944428f648fedda271fc62e18").as_slice(),
        "tag mismatch"
    );

    let opened = decrypt_seed(bytes, "password").unwrap();
    assert_eq!(opened, seed);
}
