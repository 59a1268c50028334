//! Error types for `tskey-core`.

use thiserror::Error;

/// Errors produced by the derivation core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The sampler ran off the end of its byte window before accepting a byte.
    ///
    /// Recovered inside the generator by drawing a fresh window; never
    /// returned from [`crate::generate_password`].
    #[error("not enough random bytes in the sampling window")]
    InsufficientEntropy,

    /// A seed or encrypted seed does not have the exact expected length.
    #[error("invalid seed length: expected {expected} bytes, got {actual}")]
    InvalidSeedLength {
        /// Required length in bytes.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// AEAD tag verification failed.
    #[error("wrong password or corrupted data")]
    AuthenticationFailed,

    /// Password spec rejected before generation (unsatisfiable or out of range).
    #[error("invalid password spec: {0}")]
    InvalidSpec(String),

    /// Sampling alphabet is empty, too large, or not ASCII.
    #[error("invalid charset: {0}")]
    InvalidCharset(String),

    /// The compliance loop hit its attempt cap without a compliant candidate.
    #[error("no compliant password after {attempts} attempts")]
    GenerationExhausted {
        /// Number of windows drawn before giving up.
        attempts: u32,
    },

    /// PBKDF2 / HKDF failure.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// AES-GCM setup or sealing failure (not an authentication failure).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// The OS random source failed.
    #[error("random source failure: {0}")]
    Random(String),
}
