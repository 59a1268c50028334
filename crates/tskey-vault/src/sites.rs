//! Per-site rotation versions.
//!
//! Bumping a realm's version appends `#<version>` to the realm before
//! derivation, giving the site a new password without touching the seed.

use tskey_core::{apply_version, parse_realm};

use crate::error::VaultError;
use crate::store::{SiteConfig, VaultStore};

/// Stored version for `realm`; `1` if it was never bumped.
///
/// A `#<version>` suffix on `realm` is ignored: versions are keyed by base realm.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] if the store cannot be read.
pub fn site_version(store: &impl VaultStore, realm: &str) -> Result<u32, VaultError> {
    let base = parse_realm(realm).realm;
    Ok(store
        .load()?
        .sites
        .get(&base)
        .map_or(1, |site| site.version.max(1)))
}

/// Bump the version for `realm` and return the new value.
///
/// The first bump yields `2`, the first version that changes the password.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] on store failure.
pub fn increment_site_version(store: &impl VaultStore, realm: &str) -> Result<u32, VaultError> {
    let base = parse_realm(realm).realm;
    let version = store.update(|data| {
        let current = data.sites.get(&base).map_or(1, |site| site.version.max(1));
        let next = current.saturating_add(1);
        data.sites.insert(
            base.clone(),
            SiteConfig {
                realm: base.clone(),
                version: next,
            },
        );
        Ok(next)
    })?;
    tracing::debug!(realm = %base, version, "site version bumped");
    Ok(version)
}

/// `realm` with its stored version suffix applied.
///
/// # Errors
///
/// Returns [`VaultError::Store`] / [`VaultError::Io`] if the store cannot be read.
pub fn effective_realm(store: &impl VaultStore, realm: &str) -> Result<String, VaultError> {
    let base = parse_realm(realm).realm;
    let version = site_version(store, &base)?;
    Ok(apply_version(&base, Some(version)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn unset_version_is_one() {
        let store = MemoryStore::default();
        assert_eq!(site_version(&store, "example.com").unwrap(), 1);
        assert_eq!(effective_realm(&store, "example.com").unwrap(), "example.com");
    }

    #[test]
    fn first_bump_yields_two() {
        let store = MemoryStore::default();
        assert_eq!(increment_site_version(&store, "example.com").unwrap(), 2);
        assert_eq!(increment_site_version(&store, "example.com").unwrap(), 3);
        assert_eq!(site_version(&store, "example.com").unwrap(), 3);
        assert_eq!(
            effective_realm(&store, "example.com").unwrap(),
            "example.com#3"
        );
    }

    #[test]
    fn versions_are_per_realm() {
        let store = MemoryStore::default();
        increment_site_version(&store, "a.com").unwrap();
        assert_eq!(site_version(&store, "a.com").unwrap(), 2);
        assert_eq!(site_version(&store, "b.com").unwrap(), 1);
    }

    #[test]
    fn suffixed_realm_uses_base_key() {
        let store = MemoryStore::default();
        increment_site_version(&store, "example.com#7").unwrap();
        let data = store.load().unwrap();
        let site = data.sites.get("example.com").unwrap();
        assert_eq!(site.realm, "example.com");
        assert_eq!(site.version, 2);
        assert_eq!(
            effective_realm(&store, "example.com#2").unwrap(),
            "example.com#2"
        );
    }

    #[test]
    fn stored_zero_is_treated_as_one() {
        let store = MemoryStore::default();
        store
            .update(|data| {
                data.sites.insert(
                    "x.org".into(),
                    SiteConfig {
                        realm: "x.org".into(),
                        version: 0,
                    },
                );
                Ok(())
            })
            .unwrap();
        assert_eq!(site_version(&store, "x.org").unwrap(), 1);
        assert_eq!(increment_site_version(&store, "x.org").unwrap(), 2);
    }
}
