//! AES-256-GCM authenticated encryption.
//!
//! Two framings share one implementation:
//! - [`seal`] / [`open`] take the nonce from the caller and return
//!   `ciphertext || tag` (the seed envelope embeds its own nonce)
//! - [`encrypt_with_key`] / [`decrypt_with_key`] draw a random nonce and
//!   frame the output as `nonce (12) || ciphertext || tag (16)`

use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead;
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;

/// AES-256-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// AES-256-GCM key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

fn aead_key(key: &[u8]) -> Result<aead::LessSafeKey, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::Encryption(format!(
            "invalid key length: {} bytes (expected {KEY_LEN})",
            key.len()
        )));
    }
    let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, key)
        .map_err(|_| CryptoError::Encryption("failed to create AES-256-GCM key".into()))?;
    Ok(aead::LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under `key` with an explicit nonce.
///
/// Returns `ciphertext || tag`. The caller owns nonce uniqueness.
///
/// # Errors
///
/// Returns [`CryptoError::Encryption`] if the key is not 32 bytes or sealing fails.
pub fn seal(plaintext: &[u8], key: &[u8], nonce: [u8; NONCE_LEN]) -> Result<Vec<u8>, CryptoError> {
    let key = aead_key(key)?;
    let mut in_out = plaintext.to_vec();
    if key
        .seal_in_place_append_tag(
            aead::Nonce::assume_unique_for_key(nonce),
            aead::Aad::empty(),
            &mut in_out,
        )
        .is_err()
    {
        in_out.zeroize();
        return Err(CryptoError::Encryption("AES-256-GCM encryption failed".into()));
    }
    Ok(in_out)
}

/// Decrypt `ciphertext || tag` produced by [`seal`].
///
/// # Errors
///
/// Returns [`CryptoError::Encryption`] if the key is not 32 bytes, and
/// [`CryptoError::AuthenticationFailed`] on a tag mismatch (wrong key,
/// wrong nonce, or tampered data).
pub fn open(
    ciphertext_and_tag: &[u8],
    key: &[u8],
    nonce: [u8; NONCE_LEN],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let key = aead_key(key)?;
    let mut in_out = Zeroizing::new(ciphertext_and_tag.to_vec());
    let plaintext_len = key
        .open_in_place(
            aead::Nonce::assume_unique_for_key(nonce),
            aead::Aad::empty(),
            in_out.as_mut_slice(),
        )
        .map_err(|_| CryptoError::AuthenticationFailed)?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}

/// Encrypt with a fresh random nonce: `nonce || ciphertext || tag`.
///
/// Used to wrap the seed under an authenticator-derived key.
///
/// # Errors
///
/// Returns [`CryptoError::Random`] if the OS random source fails and
/// [`CryptoError::Encryption`] for key or sealing errors.
pub fn encrypt_with_key(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::Random(format!("nonce generation failed: {e}")))?;

    let sealed = seal(plaintext, key, nonce)?;
    let mut out = Vec::with_capacity(NONCE_LEN.saturating_add(sealed.len()));
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Decrypt `nonce || ciphertext || tag` produced by [`encrypt_with_key`].
///
/// # Errors
///
/// Returns [`CryptoError::AuthenticationFailed`] if the input is too short
/// to hold a nonce and tag, or if authentication fails.
pub fn decrypt_with_key(sealed: &[u8], key: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if sealed.len() < NONCE_LEN.saturating_add(TAG_LEN) {
        return Err(CryptoError::AuthenticationFailed);
    }
    let (nonce_bytes, rest) = sealed.split_at(NONCE_LEN);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);
    open(rest, key, nonce)
}
