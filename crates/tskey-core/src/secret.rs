//! Zeroizing containers for secret material.
//!
//! - [`SecretBytes`]: fixed-size secret, wiped on drop, masked in `Debug`
//! - [`Seed`]: the 256-byte random seed
//! - [`SecretMaterial`]: which secret drives a derivation (password or seed)

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Length of the random seed in bytes.
pub const SEED_LEN: usize = 256;

// ---------------------------------------------------------------------------
// SecretBytes<N>
// ---------------------------------------------------------------------------

/// Fixed-size buffer for keys and seeds.
///
/// The bytes are erased when the value goes out of scope. `Debug` and
/// `Display` never print the contents.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> SecretBytes<N> {
    /// Take ownership of `data`.
    #[must_use]
    pub const fn new(data: [u8; N]) -> Self {
        Self { bytes: data }
    }

    /// Copy a slice of exactly `N` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSeedLength`] if `data.len() != N`.
    pub fn from_slice(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() != N {
            return Err(CryptoError::InvalidSeedLength {
                expected: N,
                actual: data.len(),
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(data);
        Ok(Self { bytes })
    }

    /// Fill a new buffer from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Random`] if the OS random source fails.
    pub fn random() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; N];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::Random(format!("CSPRNG fill failed: {e}")))?;
        Ok(Self { bytes })
    }

    /// Expose the raw bytes for a cryptographic operation.
    #[must_use]
    pub const fn expose(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{N}>(***)")
    }
}

impl<const N: usize> fmt::Display for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{N}>(***)")
    }
}

impl<const N: usize> PartialEq for SecretBytes<N> {
    fn eq(&self, other: &Self) -> bool {
        // Constant-time: no early exit on the first differing byte.
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl<const N: usize> Eq for SecretBytes<N> {}

impl<const N: usize> From<[u8; N]> for SecretBytes<N> {
    fn from(data: [u8; N]) -> Self {
        Self::new(data)
    }
}

/// The 256-byte random seed that drives seed-mode derivation.
pub type Seed = SecretBytes<SEED_LEN>;

// ---------------------------------------------------------------------------
// SecretMaterial
// ---------------------------------------------------------------------------

/// The secret a password is derived from.
///
/// Seed mode ignores any master password entirely, so an unlock password
/// can change without changing site passwords.
#[derive(Clone, Copy)]
pub enum SecretMaterial<'a> {
    /// Master password (UTF-8), PBKDF2 derivation.
    Password(&'a str),
    /// Random seed, HKDF derivation.
    Seed(&'a Seed),
}

impl SecretMaterial<'_> {
    /// Short label for logs: `"password"` or `"seed"`.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Password(_) => "password",
            Self::Seed(_) => "seed",
        }
    }
}

impl fmt::Debug for SecretMaterial<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretMaterial::{}(***)", self.mode())
    }
}
