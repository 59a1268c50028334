//! Deterministic byte stream (DRBG) compatible with gokey.
//!
//! A 256-bit key is derived from the secret and the realm, then AES-256 in
//! counter mode encrypts an endless run of zero bytes:
//!
//! ```text
//! password mode:  key = PBKDF2-HMAC-SHA256(password, salt = realm, 4096)
//! seed mode:      key = HKDF-SHA256(ikm = seed, salt = seed[..12] || seed[240..], info = realm)
//! block i:        AES-256(key, i as 128-bit big-endian)
//! ```
//!
//! Each [`ByteStream::read`] consumes `ceil(len / 16)` whole blocks; a
//! partial trailing block is discarded.
//!
//! # Compatibility
//!
//! The block index runs on across reads as one 128-bit big-endian counter.
//! The TypeScript TSKey client instead counts reads in the low 8 bytes
//! (little-endian) and restarts the block index in the high 8 bytes on
//! every read. The two layouts agree on the first window of a generation,
//! and on nothing after it. A password whose first candidate failed the
//! policy (about one realm in six with the default spec) therefore comes
//! out differently here; such sites need a password change when migrating.

use std::fmt;

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes256, Block};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::kdf::{self, DerivedKey};
use crate::secret::{SecretMaterial, SEED_LEN};

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Seed bytes taken from the front of the seed for the HKDF salt.
const SALT_HEAD_LEN: usize = 12;

/// Seed bytes taken from the back of the seed for the HKDF salt.
const SALT_TAIL_LEN: usize = 16;

/// Reproducible keystream for one (secret, realm) pair.
///
/// Owns its counter: one instance per generation call, never shared.
pub struct ByteStream {
    cipher: Aes256,
    counter: u128,
}

impl ByteStream {
    /// Derive the stream key for `secret` and `realm`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyDerivation`] if key derivation fails.
    pub fn new(secret: &SecretMaterial<'_>, realm: &str) -> Result<Self, CryptoError> {
        let key = match secret {
            SecretMaterial::Password(password) => {
                kdf::pbkdf2_sha256(password.as_bytes(), realm.as_bytes())?
            }
            SecretMaterial::Seed(seed) => {
                let seed = seed.expose();
                let tail_start = SEED_LEN.saturating_sub(SALT_TAIL_LEN);
                let mut salt = [0u8; SALT_HEAD_LEN + SALT_TAIL_LEN];
                salt[..SALT_HEAD_LEN].copy_from_slice(&seed[..SALT_HEAD_LEN]);
                salt[SALT_HEAD_LEN..].copy_from_slice(&seed[tail_start..]);
                kdf::hkdf_sha256(seed, &salt, realm.as_bytes())?
            }
        };
        tracing::trace!(mode = secret.mode(), "derived stream key");
        Self::from_key(&key)
    }

    fn from_key(key: &DerivedKey) -> Result<Self, CryptoError> {
        let cipher = Aes256::new_from_slice(key.expose())
            .map_err(|_| CryptoError::KeyDerivation("invalid AES-256 key length".into()))?;
        Ok(Self { cipher, counter: 0 })
    }

    /// Next `len` keystream bytes.
    ///
    /// The counter advances by `ceil(len / 16)` blocks, so reads of whole
    /// blocks concatenate to the same bytes as one long read.
    pub fn read(&mut self, len: usize) -> Zeroizing<Vec<u8>> {
        let blocks = len.div_ceil(BLOCK_LEN);
        let mut out = Zeroizing::new(Vec::with_capacity(blocks.saturating_mul(BLOCK_LEN)));
        for _ in 0..blocks {
            let mut block = Block::from(self.counter.to_be_bytes());
            self.cipher.encrypt_block(&mut block);
            out.extend_from_slice(&block);
            self.counter = self.counter.wrapping_add(1);
        }
        out.truncate(len);
        out
    }

    /// Number of blocks consumed so far.
    #[must_use]
    pub const fn blocks_consumed(&self) -> u128 {
        self.counter
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}
