//! User settings stored alongside the encrypted seed.
//!
//! Readable before unlock: nothing here is secret. Missing fields take
//! their defaults, so older store files keep loading as settings grow.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tskey_core::{PasswordSpec, RealmConfig};

use crate::error::VaultError;
use crate::store::VaultStore;

// ── Top-level settings ─────────────────────────────────────────────

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Minutes of inactivity before the session locks; `0` disables auto-lock.
    #[serde(default = "default_auto_lock_minutes")]
    pub auto_lock_minutes: u32,

    /// Whether generated passwords may be filled into pages automatically.
    #[serde(default = "default_auto_fill_enabled")]
    pub auto_fill_enabled: bool,

    /// How URLs map to realms.
    #[serde(default)]
    pub realm: RealmSettings,

    /// Length and class minimums for generated passwords.
    #[serde(default)]
    pub password_spec: PasswordSpec,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_lock_minutes: default_auto_lock_minutes(),
            auto_fill_enabled: default_auto_fill_enabled(),
            realm: RealmSettings::default(),
            password_spec: PasswordSpec::default(),
        }
    }
}

const fn default_auto_lock_minutes() -> u32 {
    15
}
const fn default_auto_fill_enabled() -> bool {
    true
}

impl Settings {
    /// Idle timeout for a new session, `None` when auto-lock is off.
    #[must_use]
    pub fn auto_lock(&self) -> Option<Duration> {
        (self.auto_lock_minutes > 0)
            .then(|| Duration::from_secs(u64::from(self.auto_lock_minutes).saturating_mul(60)))
    }
}

// ── Realm settings ─────────────────────────────────────────────────

/// Persistent part of [`RealmConfig`]; the version comes from the site table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RealmSettings {
    /// Keep subdomains in the realm.
    #[serde(default)]
    pub include_subdomain: bool,

    /// Hostname or realm → replacement realm.
    #[serde(default)]
    pub custom_mappings: BTreeMap<String, String>,
}

impl RealmSettings {
    /// Build an extraction config, optionally with a version suffix.
    #[must_use]
    pub fn to_config(&self, version: Option<u32>) -> RealmConfig {
        RealmConfig {
            custom_mappings: self.custom_mappings.clone(),
            include_subdomain: self.include_subdomain,
            version,
        }
    }
}

// ── Store access ───────────────────────────────────────────────────

/// Current settings from `store`.
///
/// # Errors
///
/// Returns [`VaultError::Store`] if the store cannot be read.
pub fn load_settings(store: &impl VaultStore) -> Result<Settings, VaultError> {
    Ok(store.load()?.settings)
}

/// Apply `edit` to the stored settings and persist the result.
///
/// The edited spec is validated before anything is written.
///
/// # Errors
///
/// - [`VaultError::Crypto`] wrapping `InvalidSpec` if the new password spec
///   can never be satisfied
/// - [`VaultError::Store`] / [`VaultError::Io`] if the store cannot be
///   read or written
pub fn update_settings(
    store: &impl VaultStore,
    edit: impl FnOnce(&mut Settings),
) -> Result<Settings, VaultError> {
    store.update(|data| {
        let mut settings = data.settings.clone();
        edit(&mut settings);
        settings.password_spec.validate()?;
        data.settings = settings.clone();
        tracing::debug!(
            auto_lock_minutes = settings.auto_lock_minutes,
            mappings = settings.realm.custom_mappings.len(),
            "settings updated"
        );
        Ok(settings)
    })
}

// ── Tests ──────────────────────────────────────────────────────────
