//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tskey_core::PasswordSpec;

/// Deterministic site passwords from one master secret.
///
/// The master password is read from `TSKEY_PASSWORD`, or else from the
/// first line of standard input.
#[derive(Parser, Debug)]
#[command(name = "tskey", author, version, about)]
pub struct Cli {
    /// Directory holding `tskey.json` (default: $XDG_CONFIG_HOME/tskey or ~/.config/tskey).
    #[arg(long, global = true, env = "TSKEY_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new random seed sealed under the master password.
    Setup {
        /// Replace an existing seed (its site passwords are lost).
        #[arg(long)]
        force: bool,
    },
    /// Check that the master password opens the stored seed.
    UnlockCheck,
    /// Print the password for a URL or hostname.
    Generate(GenerateArgs),
    /// Print the realm a URL maps to, with its stored version.
    Realm {
        /// URL or hostname.
        url: String,
    },
    /// Rotate a realm's password by bumping its version.
    Bump {
        /// Base realm, e.g. `github.com`.
        realm: String,
    },
    /// Print the seed as hex for backup.
    ExportSeed,
    /// Restore a seed from its hex backup.
    ImportSeed {
        /// 512 hex characters; whitespace is ignored.
        hex: String,
        /// Replace an existing seed.
        #[arg(long)]
        force: bool,
    },
    /// Re-seal the seed under a new master password.
    ///
    /// The new password comes from `TSKEY_NEW_PASSWORD`, or the next line of
    /// standard input.
    ChangePassword,
    /// Show or change settings; prints the result as JSON.
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// URL or hostname.
    pub url: String,

    #[command(flatten)]
    pub spec: SpecArgs,

    /// Print only the realm, without deriving a password.
    #[arg(long)]
    pub realm_only: bool,

    /// Derive from the master password alone, without the stored seed.
    #[arg(long)]
    pub password_only: bool,
}

/// Overrides for the stored password spec.
#[derive(Args, Debug, Default, Clone)]
pub struct SpecArgs {
    /// Password length.
    #[arg(long, value_name = "N")]
    pub length: Option<usize>,
    /// Minimum uppercase letters.
    #[arg(long, value_name = "N")]
    pub upper: Option<usize>,
    /// Minimum lowercase letters.
    #[arg(long, value_name = "N")]
    pub lower: Option<usize>,
    /// Minimum digits.
    #[arg(long, value_name = "N")]
    pub digits: Option<usize>,
    /// Minimum symbols.
    #[arg(long, value_name = "N")]
    pub special: Option<usize>,
}

impl SpecArgs {
    /// Whether any override was given.
    pub const fn is_empty(&self) -> bool {
        self.length.is_none()
            && self.upper.is_none()
            && self.lower.is_none()
            && self.digits.is_none()
            && self.special.is_none()
    }

    /// Apply the overrides to `spec`.
    pub fn apply(&self, spec: &mut PasswordSpec) {
        if let Some(length) = self.length {
            spec.length = length;
        }
        if let Some(upper) = self.upper {
            spec.upper = upper;
        }
        if let Some(lower) = self.lower {
            spec.lower = lower;
        }
        if let Some(digits) = self.digits {
            spec.digits = digits;
        }
        if let Some(special) = self.special {
            spec.special = special;
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Minutes of inactivity before locking; 0 disables.
    #[arg(long, value_name = "MINUTES")]
    pub auto_lock_minutes: Option<u32>,

    /// Allow automatic filling.
    #[arg(long, value_name = "BOOL")]
    pub auto_fill: Option<bool>,

    /// Keep subdomains in realms.
    #[arg(long, value_name = "BOOL")]
    pub include_subdomain: Option<bool>,

    /// Map a hostname or realm to another realm.
    #[arg(long = "map", value_name = "FROM=TO", value_parser = parse_mapping)]
    pub mappings: Vec<(String, String)>,

    /// Remove a mapping.
    #[arg(long = "unmap", value_name = "FROM")]
    pub unmap: Vec<String>,

    #[command(flatten)]
    pub spec: SpecArgs,
}

impl SettingsArgs {
    /// Whether any change was requested.
    pub fn is_empty(&self) -> bool {
        self.auto_lock_minutes.is_none()
            && self.auto_fill.is_none()
            && self.include_subdomain.is_none()
            && self.mappings.is_empty()
            && self.unmap.is_empty()
            && self.spec.is_empty()
    }
}

fn parse_mapping(text: &str) -> Result<(String, String)> {
    let Some((from, to)) = text.split_once('=') else {
        bail!("expected FROM=TO, got `{text}`");
    };
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        bail!("both sides of `{text}` must be non-empty");
    }
    Ok((from.to_ascii_lowercase(), to.to_owned()))
}

impl Cli {
    /// Data directory from the flag, `$XDG_CONFIG_HOME/tskey`, or `~/.config/tskey`.
    ///
    /// # Errors
    ///
    /// Fails when no flag is given and no home directory can be found.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(config).join("tskey"));
        }
        dirs::home_dir()
            .map(|home| home.join(".config").join("tskey"))
            .context("cannot determine home directory; pass --data-dir")
    }
}
