//! Vault error types for `tskey-vault`.

use thiserror::Error;
use tskey_core::CryptoError;

/// Errors produced by vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Cryptographic operation failed (delegated from tskey-core).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// No encrypted seed is stored, or the session holds none.
    #[error("no seed found, run setup first")]
    NoSeed,

    /// The session sat idle past its auto-lock timeout.
    #[error("session expired, unlock again")]
    SessionExpired,

    /// Authenticator unlock requested but none is enrolled.
    #[error("no authenticator enrolled")]
    NoAuthenticator,

    /// Stored or user-supplied text is not valid base64 / hex.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Store contents could not be read or written.
    #[error("store error: {0}")]
    Store(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// `true` when the user supplied the wrong password (or authenticator key).
    #[must_use]
    pub const fn is_wrong_password(&self) -> bool {
        matches!(self, Self::Crypto(CryptoError::AuthenticationFailed))
    }
}
