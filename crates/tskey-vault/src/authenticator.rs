//! Authenticator-key unlock (WebAuthn PRF or any 32-byte hardware secret).
//!
//! Enrollment wraps the unlocked seed with AES-256-GCM under the
//! authenticator key and stores it next to the password envelope. Either
//! one opens the same seed, so site passwords do not depend on which
//! method unlocked it.

use data_encoding::{BASE64, HEXLOWER};
use tskey_core::{decrypt_with_key, encrypt_with_key, Seed};
use zeroize::Zeroizing;

use crate::error::VaultError;
use crate::session::Session;
use crate::store::{AuthenticatorConfig, UnlockMethod, VaultStore};

/// Required authenticator key length in bytes.
pub const AUTHENTICATOR_KEY_LEN: usize = 32;

/// Password-shaped form of an authenticator key: lowercase hex.
///
/// Held as the session password after an authenticator unlock.
#[must_use]
pub fn key_to_password(key: &[u8]) -> Zeroizing<String> {
    Zeroizing::new(HEXLOWER.encode(key))
}

/// Wrap the session seed under `key` and make it the preferred unlock.
///
/// `credential_id` and `salt` are stored verbatim for the caller's next
/// key derivation.
///
/// # Errors
///
/// - [`VaultError::SessionExpired`] / [`VaultError::NoSeed`] from the session
/// - [`VaultError::Crypto`] if `key` is not 32 bytes
pub fn enroll_authenticator(
    store: &impl VaultStore,
    session: &Session,
    key: &[u8],
    credential_id: &str,
    salt: &str,
) -> Result<(), VaultError> {
    let seed = session.seed()?;
    let wrapped = encrypt_with_key(seed.expose(), key)?;
    store.update(|data| {
        data.prf = Some(AuthenticatorConfig {
            credential_id: credential_id.to_owned(),
            salt: salt.to_owned(),
            wrapped_seed: BASE64.encode(&wrapped),
        });
        data.unlock_method = UnlockMethod::Prf;
        Ok(())
    })?;
    tracing::info!("authenticator enrolled");
    Ok(())
}

/// Enrolled authenticator, if any.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] if the store cannot be read.
pub fn authenticator_config(
    store: &impl VaultStore,
) -> Result<Option<AuthenticatorConfig>, VaultError> {
    Ok(store.load()?.prf)
}

/// Unlock with an authenticator key.
///
/// # Errors
///
/// - [`VaultError::NoAuthenticator`] if none is enrolled
/// - [`VaultError::InvalidEncoding`] if the stored wrap is not base64
/// - [`VaultError::Crypto`] wrapping `AuthenticationFailed` for a wrong key
pub fn unlock_with_authenticator(
    store: &impl VaultStore,
    key: &[u8],
) -> Result<Session, VaultError> {
    let data = store.load()?;
    let config = data.prf.as_ref().ok_or(VaultError::NoAuthenticator)?;
    let wrapped = BASE64
        .decode(config.wrapped_seed.as_bytes())
        .map_err(|e| VaultError::InvalidEncoding(format!("wrapped seed: {e}")))?;
    let plaintext = decrypt_with_key(&wrapped, key)?;
    let seed = Seed::from_slice(&plaintext)?;
    tracing::debug!("unlocked with authenticator");
    Ok(Session::new(
        &key_to_password(key),
        Some(seed),
        UnlockMethod::Prf,
        data.settings.auto_lock(),
    ))
}

/// Forget the authenticator and fall back to password unlock.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] on store failure.
pub fn remove_authenticator(store: &impl VaultStore) -> Result<(), VaultError> {
    store.update(|data| {
        data.prf = None;
        data.unlock_method = UnlockMethod::Password;
        Ok(())
    })?;
    tracing::info!("authenticator removed");
    Ok(())
}
