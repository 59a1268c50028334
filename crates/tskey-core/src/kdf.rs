//! Key derivation: PBKDF2-HMAC-SHA256 and HKDF-SHA256.
//!
//! Both produce a 256-bit key in a [`SecretBytes`] container. Parameters are
//! fixed for gokey compatibility: 4096 PBKDF2 iterations, SHA-256 everywhere.

use std::num::NonZeroU32;

use ring::{hkdf, pbkdf2};
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::secret::SecretBytes;

/// Derived key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 4096;

/// A derived 256-bit key.
pub type DerivedKey = SecretBytes<KEY_LEN>;

/// Marker type for `ring::hkdf::Prk::expand`, requesting a 32-byte output.
struct Len32;

impl hkdf::KeyType for Len32 {
    fn len(&self) -> usize {
        KEY_LEN
    }
}

/// PBKDF2-HMAC-SHA256 with [`PBKDF2_ITERATIONS`] rounds.
///
/// Accepts any password and salt, including empty ones: an empty realm is a
/// valid salt in password mode.
///
/// # Errors
///
/// Returns [`CryptoError::KeyDerivation`] if the iteration count is invalid.
pub fn pbkdf2_sha256(password: &[u8], salt: &[u8]) -> Result<DerivedKey, CryptoError> {
    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
        .ok_or_else(|| CryptoError::KeyDerivation("PBKDF2 iteration count is zero".into()))?;

    let mut out = [0u8; KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        &mut out,
    );

    let key = DerivedKey::new(out);
    out.zeroize();
    Ok(key)
}

/// HKDF-SHA256 extract-and-expand to a 32-byte key.
///
/// # Errors
///
/// Returns [`CryptoError::KeyDerivation`] if expansion fails.
pub fn hkdf_sha256(ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<DerivedKey, CryptoError> {
    let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, salt).extract(ikm);
    let info_refs: &[&[u8]] = &[info];
    let okm = prk
        .expand(info_refs, Len32)
        .map_err(|_| CryptoError::KeyDerivation("HKDF expand failed".into()))?;

    let mut out = [0u8; KEY_LEN];
    okm.fill(&mut out)
        .map_err(|_| CryptoError::KeyDerivation("HKDF fill failed".into()))?;

    let key = DerivedKey::new(out);
    out.zeroize();
    Ok(key)
}
