//! Site-aware generation: URL → realm → versioned realm → password.

use std::fmt;

use tskey_core::{apply_version, extract_realm, generate_password, PasswordSpec};

use crate::error::VaultError;
use crate::session::Session;
use crate::settings::Settings;
use crate::sites::site_version;
use crate::store::VaultStore;

/// A derived password and the realm it was derived for.
#[derive(Clone, PartialEq, Eq)]
pub struct Generated {
    /// Realm fed to the generator, version suffix included.
    pub realm: String,
    /// The site password.
    pub password: String,
}

impl fmt::Debug for Generated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generated")
            .field("realm", &self.realm)
            .field("password", &"***")
            .finish()
    }
}

/// Base realm for `url` under the user's realm settings (no version).
#[must_use]
pub fn realm_for_url(settings: &Settings, url: &str) -> String {
    extract_realm(url, &settings.realm.to_config(None))
}

/// Password for the site at `url`, using stored settings and site version.
///
/// Counts as session activity.
///
/// # Errors
///
/// - [`VaultError::SessionExpired`] past the idle timeout
/// - [`VaultError::Crypto`] from generation
/// - store errors
pub fn generate_for_url(
    store: &impl VaultStore,
    session: &mut Session,
    url: &str,
) -> Result<Generated, VaultError> {
    let data = store.load()?;
    let base = realm_for_url(&data.settings, url);
    let version = site_version(store, &base)?;
    let realm = apply_version(&base, Some(version));
    let generated = generate_for_realm(session, &realm, &data.settings.password_spec)?;
    session.touch();
    Ok(generated)
}

/// Password for an explicit realm and spec, bypassing stored settings.
///
/// # Errors
///
/// - [`VaultError::SessionExpired`] past the idle timeout
/// - [`VaultError::Crypto`] from generation
pub fn generate_for_realm(
    session: &Session,
    realm: &str,
    spec: &PasswordSpec,
) -> Result<Generated, VaultError> {
    let secret = session.secret_material()?;
    let password = generate_password(&secret, realm, spec)?;
    tracing::debug!(realm, mode = secret.mode(), "password generated");
    Ok(Generated {
        realm: realm.to_owned(),
        password,
    })
}
