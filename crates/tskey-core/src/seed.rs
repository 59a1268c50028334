//! Seed generation and the at-rest seed envelope.
//!
//! Envelope layout (272 bytes):
//!
//! ```text
//! seed[0..12] || AES-256-GCM(key, nonce = seed[0..12], seed[12..256]) || tag(16)
//! key = PBKDF2-HMAC-SHA256(password, salt = seed[0..12], 4096)
//! ```
//!
//! The first 12 seed bytes double as nonce and salt, so they are stored in
//! the clear. Every seed is fresh random data, which keeps the nonce unique
//! per key.

use std::fmt;

use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::kdf;
use crate::secret::{Seed, SEED_LEN};
use crate::symmetric::{self, NONCE_LEN, TAG_LEN};

/// Length of an encrypted seed envelope in bytes.
pub const ENCRYPTED_SEED_LEN: usize = SEED_LEN + TAG_LEN;

/// A sealed seed, exactly [`ENCRYPTED_SEED_LEN`] bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedSeed([u8; ENCRYPTED_SEED_LEN]);

impl EncryptedSeed {
    /// Raw envelope bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ENCRYPTED_SEED_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for EncryptedSeed {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array = <[u8; ENCRYPTED_SEED_LEN]>::try_from(bytes).map_err(|_| {
            CryptoError::InvalidSeedLength {
                expected: ENCRYPTED_SEED_LEN,
                actual: bytes.len(),
            }
        })?;
        Ok(Self(array))
    }
}

impl AsRef<[u8]> for EncryptedSeed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EncryptedSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedSeed({ENCRYPTED_SEED_LEN} bytes)")
    }
}

/// Fresh 256-byte seed from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`CryptoError::Random`] if the OS random source fails.
pub fn generate_seed() -> Result<Seed, CryptoError> {
    Seed::random()
}

/// Seal `seed` under `password`.
///
/// # Errors
///
/// - [`CryptoError::InvalidSeedLength`] unless `seed` is 256 bytes
/// - [`CryptoError::KeyDerivation`] / [`CryptoError::Encryption`] on
///   primitive failure
pub fn encrypt_seed(seed: &[u8], password: &str) -> Result<EncryptedSeed, CryptoError> {
    if seed.len() != SEED_LEN {
        return Err(CryptoError::InvalidSeedLength {
            expected: SEED_LEN,
            actual: seed.len(),
        });
    }
    let (nonce_bytes, plaintext) = seed.split_at(NONCE_LEN);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);

    let key = kdf::pbkdf2_sha256(password.as_bytes(), &nonce)?;
    let mut sealed = symmetric::seal(plaintext, key.expose(), nonce)?;

    let mut out = [0u8; ENCRYPTED_SEED_LEN];
    out[..NONCE_LEN].copy_from_slice(&nonce);
    out[NONCE_LEN..].copy_from_slice(&sealed);
    sealed.zeroize();
    Ok(EncryptedSeed(out))
}

/// Open an envelope produced by [`encrypt_seed`].
///
/// # Errors
///
/// - [`CryptoError::InvalidSeedLength`] unless `encrypted` is 272 bytes
/// - [`CryptoError::AuthenticationFailed`] for a wrong password or
///   tampered envelope
pub fn decrypt_seed(encrypted: &[u8], password: &str) -> Result<Seed, CryptoError> {
    let envelope = EncryptedSeed::try_from(encrypted)?;
    let (nonce_bytes, sealed) = envelope.as_bytes().split_at(NONCE_LEN);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);

    let key = kdf::pbkdf2_sha256(password.as_bytes(), &nonce)?;
    let plaintext = symmetric::open(sealed, key.expose(), nonce)?;

    let mut seed = [0u8; SEED_LEN];
    seed[..NONCE_LEN].copy_from_slice(&nonce);
    seed[NONCE_LEN..].copy_from_slice(&plaintext);
    let out = Seed::new(seed);
    seed.zeroize();
    tracing::debug!("seed envelope opened");
    Ok(out)
}
