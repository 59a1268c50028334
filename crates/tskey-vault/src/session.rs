//! Unlocked session: the secrets a caller holds between unlock and lock.
//!
//! A `Session` is an owned value, not global state. Expiry is checked each
//! time a secret is handed out; an expired session refuses with
//! [`VaultError::SessionExpired`] and should be dropped.

use std::fmt;
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use tskey_core::{SecretMaterial, Seed};

use crate::error::VaultError;
use crate::store::UnlockMethod;

/// Secrets for one unlocked period.
pub struct Session {
    password: SecretString,
    seed: Option<Seed>,
    method: UnlockMethod,
    last_activity: Instant,
    timeout: Option<Duration>,
}

impl Session {
    /// New session, active as of now.
    ///
    /// `timeout = None` disables auto-lock.
    #[must_use]
    pub fn new(
        password: &str,
        seed: Option<Seed>,
        method: UnlockMethod,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            password: SecretString::from(password.to_owned()),
            seed,
            method,
            last_activity: Instant::now(),
            timeout,
        }
    }

    /// `true` once idle for at least the timeout.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// [`Self::is_expired`] against an explicit clock reading.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.timeout
            .is_some_and(|timeout| now.saturating_duration_since(self.last_activity) >= timeout)
    }

    /// Record activity, pushing expiry back by a full timeout.
    ///
    /// Has no effect once expired.
    pub fn touch(&mut self) {
        if !self.is_expired() {
            self.last_activity = Instant::now();
        }
    }

    fn ensure_active(&self) -> Result<(), VaultError> {
        if self.is_expired() {
            tracing::debug!("session expired");
            return Err(VaultError::SessionExpired);
        }
        Ok(())
    }

    /// Secret that drives generation: the seed when held, else the password.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::SessionExpired`] past the idle timeout.
    pub fn secret_material(&self) -> Result<SecretMaterial<'_>, VaultError> {
        self.ensure_active()?;
        Ok(self.seed.as_ref().map_or_else(
            || SecretMaterial::Password(self.password.expose_secret()),
            SecretMaterial::Seed,
        ))
    }

    /// The unlocked seed.
    ///
    /// # Errors
    ///
    /// - [`VaultError::SessionExpired`] past the idle timeout
    /// - [`VaultError::NoSeed`] for a password-only session
    pub fn seed(&self) -> Result<&Seed, VaultError> {
        self.ensure_active()?;
        self.seed.as_ref().ok_or(VaultError::NoSeed)
    }

    /// The password this session was unlocked with.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::SessionExpired`] past the idle timeout.
    pub fn password(&self) -> Result<&str, VaultError> {
        self.ensure_active()?;
        Ok(self.password.expose_secret())
    }

    pub(crate) fn set_password(&mut self, password: &str) {
        self.password = SecretString::from(password.to_owned());
    }

    /// Whether a seed is held.
    #[must_use]
    pub const fn has_seed(&self) -> bool {
        self.seed.is_some()
    }

    /// How this session was unlocked.
    #[must_use]
    pub const fn unlock_method(&self) -> UnlockMethod {
        self.method
    }

    /// Idle timeout, `None` when auto-lock is off.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// End the session; the password and seed are wiped as they drop.
    pub fn lock(self) {
        tracing::debug!(method = ?self.method, "session locked");
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("method", &self.method)
            .field("has_seed", &self.seed.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
