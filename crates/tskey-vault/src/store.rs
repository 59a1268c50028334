//! Persistent vault data and the stores that hold it.
//!
//! Everything TSKey persists fits in one small JSON document: the sealed
//! seed, authenticator enrollment, per-site versions, and settings. The
//! seed is stored sealed (base64), never in the clear.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use tskey_core::EncryptedSeed;

use crate::error::VaultError;
use crate::settings::Settings;

// ── Data model ─────────────────────────────────────────────────────

/// How the user unlocks the seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockMethod {
    /// Master password.
    #[default]
    Password,
    /// Authenticator-derived key (WebAuthn PRF or similar).
    Prf,
}

/// Enrolled authenticator: where its key comes from and the seed it wraps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorConfig {
    /// Credential identifier (base64), opaque to the vault.
    pub credential_id: String,
    /// PRF evaluation salt (base64), opaque to the vault.
    pub salt: String,
    /// `nonce || ciphertext || tag` of the seed under the authenticator key (base64).
    pub wrapped_seed: String,
}

/// Stored rotation state for one realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base realm (no version suffix).
    pub realm: String,
    /// Current version, `1` meaning unrotated.
    pub version: u32,
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultData {
    /// Sealed seed envelope, base64.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_seed: Option<String>,

    /// Whether the user has backed up the seed.
    #[serde(default)]
    pub seed_exported: bool,

    /// Preferred unlock method.
    #[serde(default)]
    pub unlock_method: UnlockMethod,

    /// Authenticator enrollment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<AuthenticatorConfig>,

    /// Base realm → rotation state.
    #[serde(default)]
    pub sites: BTreeMap<String, SiteConfig>,

    /// User settings.
    #[serde(default)]
    pub settings: Settings,
}

impl VaultData {
    /// Decode the stored envelope, if one exists.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidEncoding`] if the stored text is not base64
    /// - [`VaultError::Crypto`] wrapping `InvalidSeedLength` if it decodes
    ///   to the wrong number of bytes
    pub fn encrypted_seed(&self) -> Result<Option<EncryptedSeed>, VaultError> {
        let Some(text) = self.encrypted_seed.as_deref() else {
            return Ok(None);
        };
        let bytes = BASE64
            .decode(text.as_bytes())
            .map_err(|e| VaultError::InvalidEncoding(format!("encrypted seed: {e}")))?;
        Ok(Some(EncryptedSeed::try_from(bytes.as_slice())?))
    }

    /// Replace the stored envelope.
    pub fn set_encrypted_seed(&mut self, sealed: &EncryptedSeed) {
        self.encrypted_seed = Some(BASE64.encode(sealed.as_bytes()));
    }
}

// ── Store trait ────────────────────────────────────────────────────

/// Load/save access to [`VaultData`].
pub trait VaultStore {
    /// Read the current document; a store that was never written yields
    /// [`VaultData::default`].
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Store`] for unreadable contents and
    /// [`VaultError::Io`] for filesystem failures.
    fn load(&self) -> Result<VaultData, VaultError>;

    /// Replace the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Store`] / [`VaultError::Io`] on failure.
    fn save(&self, data: &VaultData) -> Result<(), VaultError>;

    /// Load, apply `edit`, and save only if `edit` succeeds.
    ///
    /// # Errors
    ///
    /// Propagates errors from `load`, `edit`, and `save`.
    fn update<T>(
        &self,
        edit: impl FnOnce(&mut VaultData) -> Result<T, VaultError>,
    ) -> Result<T, VaultError>
    where
        Self: Sized,
    {
        let mut data = self.load()?;
        let out = edit(&mut data)?;
        self.save(&data)?;
        Ok(out)
    }
}

// ── File store ─────────────────────────────────────────────────────

const STORE_FILE: &str = "tskey.json";
const STORE_TMP_FILE: &str = ".tskey.json.tmp";

/// JSON file at `{data_dir}/tskey.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `data_dir` (created on first save).
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: data_dir.into(),
        }
    }

    /// Path of the JSON document.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    /// Directory holding the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl VaultStore for FileStore {
    fn load(&self) -> Result<VaultData, VaultError> {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(VaultData::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&contents)
            .map_err(|e| VaultError::Store(format!("{} is corrupt: {e}", path.display())))
    }

    /// Atomic write: `.tmp` file, owner-only permissions, then rename.
    fn save(&self, data: &VaultData) -> Result<(), VaultError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path();
        let tmp = self.dir.join(STORE_TMP_FILE);

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| VaultError::Store(format!("serialize failed: {e}")))?;

        fs::write(&tmp, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &path)?;
        tracing::trace!(path = %path.display(), "store saved");
        Ok(())
    }
}

// ── Memory store ───────────────────────────────────────────────────

/// In-process store for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<VaultData>,
}

impl MemoryStore {
    /// Store pre-filled with `data`.
    #[must_use]
    pub const fn with_data(data: VaultData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

impl VaultStore for MemoryStore {
    fn load(&self) -> Result<VaultData, VaultError> {
        self.data
            .lock()
            .map(|data| data.clone())
            .map_err(|_| VaultError::Store("memory store lock poisoned".into()))
    }

    fn save(&self, data: &VaultData) -> Result<(), VaultError> {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| VaultError::Store("memory store lock poisoned".into()))?;
        *guard = data.clone();
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────
