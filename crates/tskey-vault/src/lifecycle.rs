//! Seed lifecycle: setup, unlock, import, export, password change.
//!
//! The seed is generated once and never changes; only its envelope does.
//! Changing the master password re-seals the same seed, so seed-mode site
//! passwords survive it.

use data_encoding::HEXLOWER;
use tskey_core::{decrypt_seed, encrypt_seed, generate_seed, Seed};
use zeroize::Zeroizing;

use crate::error::VaultError;
use crate::session::Session;
use crate::store::{UnlockMethod, VaultData, VaultStore};

/// Whether an encrypted seed is stored.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] if the store cannot be read.
pub fn has_seed(store: &impl VaultStore) -> Result<bool, VaultError> {
    Ok(store.load()?.encrypted_seed.is_some())
}

/// Whether the user has backed up the seed.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] if the store cannot be read.
pub fn is_seed_exported(store: &impl VaultStore) -> Result<bool, VaultError> {
    Ok(store.load()?.seed_exported)
}

/// Record that the seed has been backed up.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] on store failure.
pub fn mark_seed_exported(store: &impl VaultStore) -> Result<(), VaultError> {
    store.update(|data| {
        data.seed_exported = true;
        Ok(())
    })
}

/// Generate a fresh seed, seal it under `password`, and unlock.
///
/// Replaces any stored seed and clears authenticator enrollment, since the
/// wrapped copy belongs to the old seed.
///
/// # Errors
///
/// Propagates seed generation, encryption, and store errors.
pub fn setup_seed(store: &impl VaultStore, password: &str) -> Result<Session, VaultError> {
    let seed = generate_seed()?;
    let session = install_seed(store, seed, password, false)?;
    tracing::info!("new seed created");
    Ok(session)
}

/// Seal an existing seed (from a backup) under `password`, and unlock.
///
/// The seed is marked exported: it came from a backup.
///
/// # Errors
///
/// - [`VaultError::Crypto`] wrapping `InvalidSeedLength` unless `seed` is
///   256 bytes
/// - store errors
pub fn import_seed(
    store: &impl VaultStore,
    seed: &[u8],
    password: &str,
) -> Result<Session, VaultError> {
    let seed = Seed::from_slice(seed)?;
    let session = install_seed(store, seed, password, true)?;
    tracing::info!("seed imported");
    Ok(session)
}

/// Parse a hex seed backup, as produced by [`export_seed`].
///
/// Whitespace is ignored and either case is accepted.
///
/// # Errors
///
/// - [`VaultError::InvalidEncoding`] for non-hex input
/// - [`VaultError::Crypto`] wrapping `InvalidSeedLength` for the wrong length
pub fn parse_seed_hex(text: &str) -> Result<Seed, VaultError> {
    let cleaned: Zeroizing<String> = Zeroizing::new(
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect(),
    );
    let bytes = Zeroizing::new(
        HEXLOWER
            .decode(cleaned.as_bytes())
            .map_err(|e| VaultError::InvalidEncoding(format!("seed hex: {e}")))?,
    );
    Ok(Seed::from_slice(&bytes)?)
}

fn install_seed(
    store: &impl VaultStore,
    seed: Seed,
    password: &str,
    exported: bool,
) -> Result<Session, VaultError> {
    let sealed = encrypt_seed(seed.expose(), password)?;
    let timeout = store.update(|data| {
        data.set_encrypted_seed(&sealed);
        data.seed_exported = exported;
        data.unlock_method = UnlockMethod::Password;
        data.prf = None;
        Ok(data.settings.auto_lock())
    })?;
    Ok(Session::new(
        password,
        Some(seed),
        UnlockMethod::Password,
        timeout,
    ))
}

/// Open the stored seed with `password`.
///
/// # Errors
///
/// - [`VaultError::NoSeed`] if setup has not run
/// - [`VaultError::Crypto`] wrapping `AuthenticationFailed` for a wrong password
pub fn unlock(store: &impl VaultStore, password: &str) -> Result<Session, VaultError> {
    let data = store.load()?;
    let seed = open_stored_seed(&data, password)?;
    tracing::debug!("unlocked with password");
    Ok(Session::new(
        password,
        Some(seed),
        UnlockMethod::Password,
        data.settings.auto_lock(),
    ))
}

/// Session that derives from the password alone, without a seed.
///
/// Site passwords then depend on the master password, exactly as in gokey's
/// password mode.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] if settings cannot be read.
pub fn unlock_password_only(
    store: &impl VaultStore,
    password: &str,
) -> Result<Session, VaultError> {
    let settings = store.load()?.settings;
    Ok(Session::new(
        password,
        None,
        UnlockMethod::Password,
        settings.auto_lock(),
    ))
}

/// Lowercase hex of the session seed, for backup.
///
/// # Errors
///
/// - [`VaultError::SessionExpired`] past the idle timeout
/// - [`VaultError::NoSeed`] for a password-only session
pub fn export_seed(session: &Session) -> Result<Zeroizing<String>, VaultError> {
    let seed = session.seed()?;
    Ok(Zeroizing::new(HEXLOWER.encode(seed.expose())))
}

/// Re-seal the stored seed under `new_password`.
///
/// `current_password` must open the stored envelope; the session's seed is
/// what gets re-sealed. Site passwords do not change.
///
/// # Errors
///
/// - [`VaultError::SessionExpired`] / [`VaultError::NoSeed`] from the session
/// - [`VaultError::Crypto`] wrapping `AuthenticationFailed` if
///   `current_password` is wrong
pub fn change_password(
    store: &impl VaultStore,
    session: &mut Session,
    current_password: &str,
    new_password: &str,
) -> Result<(), VaultError> {
    let seed = session.seed()?;
    store.update(|data| {
        let stored = open_stored_seed(data, current_password)?;
        if stored != *seed {
            return Err(VaultError::Store(
                "stored seed does not match the unlocked session".into(),
            ));
        }
        let sealed = encrypt_seed(seed.expose(), new_password)?;
        data.set_encrypted_seed(&sealed);
        Ok(())
    })?;
    session.set_password(new_password);
    session.touch();
    tracing::info!("master password changed");
    Ok(())
}

fn open_stored_seed(data: &VaultData, password: &str) -> Result<Seed, VaultError> {
    let sealed = data.encrypted_seed()?.ok_or(VaultError::NoSeed)?;
    Ok(decrypt_seed(sealed.as_bytes(), password)?)
}
