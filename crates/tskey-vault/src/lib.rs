//! `tskey-vault`: session and storage layer for TSKey.
//!
//! Keeps the sealed seed, per-site versions and settings in a small JSON
//! store, and hands out short-lived unlocked sessions that drive
//! `tskey-core` generation.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod session;
pub mod settings;
pub mod store;

pub mod authenticator;
pub mod lifecycle;

pub mod service;
pub mod sites;

pub use authenticator::{
    authenticator_config, enroll_authenticator, key_to_password, remove_authenticator,
    unlock_with_authenticator, AUTHENTICATOR_KEY_LEN,
};
pub use error::VaultError;
pub use lifecycle::{
    change_password, export_seed, has_seed, import_seed, is_seed_exported, mark_seed_exported,
    parse_seed_hex, setup_seed, unlock, unlock_password_only,
};
pub use service::{generate_for_realm, generate_for_url, realm_for_url, Generated};
pub use session::Session;
pub use settings::{load_settings, update_settings, RealmSettings, Settings};
pub use sites::{effective_realm, increment_site_version, site_version};
pub use store::{
    AuthenticatorConfig, FileStore, MemoryStore, SiteConfig, UnlockMethod, VaultData, VaultStore,
};
