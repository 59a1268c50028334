//! Subcommand implementations. Results go to `out`; diagnostics go to tracing.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tskey_core::parse_realm;
use tskey_vault::{
    change_password, effective_realm, export_seed, generate_for_realm, generate_for_url,
    has_seed, import_seed, increment_site_version, load_settings, mark_seed_exported,
    parse_seed_hex, realm_for_url, setup_seed, site_version, unlock, unlock_password_only,
    update_settings, FileStore, Session,
};

use crate::cli::{Cli, Command, GenerateArgs, SettingsArgs};
use crate::input::Secrets;

/// Run `cli` against its data directory.
///
/// # Errors
///
/// Any vault, input, or output failure, with context.
pub fn run<R: BufRead>(cli: &Cli, secrets: &mut Secrets<R>, out: &mut impl Write) -> Result<()> {
    let store = FileStore::new(cli.data_dir()?);
    tracing::debug!(path = %store.path().display(), "using store");

    match &cli.command {
        Command::Setup { force } => setup(&store, secrets, *force, out),
        Command::UnlockCheck => {
            open(&store, secrets)?;
            writeln!(out, "ok")?;
            Ok(())
        }
        Command::Generate(args) => generate(&store, secrets, args, out),
        Command::Realm { url } => realm(&store, url, out),
        Command::Bump { realm } => {
            let base = parse_realm(realm).realm;
            let version = increment_site_version(&store, &base)?;
            writeln!(out, "{}", effective_realm(&store, &base)?)?;
            tracing::info!(version, "site version bumped");
            Ok(())
        }
        Command::ExportSeed => {
            let session = open(&store, secrets)?;
            let hex = export_seed(&session)?;
            mark_seed_exported(&store)?;
            writeln!(out, "{}", hex.as_str())?;
            Ok(())
        }
        Command::ImportSeed { hex, force } => import(&store, secrets, hex, *force, out),
        Command::ChangePassword => {
            let current = secrets.master_password()?;
            let mut session = open_with(&store, &current)?;
            let new = secrets.new_password()?;
            if new.is_empty() {
                bail!("new master password must not be empty");
            }
            change_password(&store, &mut session, &current, &new)
                .context("failed to change master password")?;
            writeln!(out, "master password changed")?;
            Ok(())
        }
        Command::Settings(args) => settings(&store, args, out),
    }
}

fn open<R: BufRead>(store: &FileStore, secrets: &mut Secrets<R>) -> Result<Session> {
    let password = secrets.master_password()?;
    open_with(store, &password)
}

fn open_with(store: &FileStore, password: &str) -> Result<Session> {
    if !has_seed(store)? {
        bail!(
            "no seed in {}; run `tskey setup` or `tskey import-seed` first",
            store.dir().display()
        );
    }
    unlock(store, password).context("failed to unlock seed")
}

fn setup<R: BufRead>(
    store: &FileStore,
    secrets: &mut Secrets<R>,
    force: bool,
    out: &mut impl Write,
) -> Result<()> {
    if has_seed(store)? && !force {
        bail!("a seed already exists; pass --force to replace it");
    }
    let password = secrets.master_password()?;
    if password.is_empty() {
        bail!("master password must not be empty");
    }
    setup_seed(store, &password)?;
    writeln!(out, "seed created in {}", store.path().display())?;
    writeln!(out, "back it up with `tskey export-seed`")?;
    Ok(())
}

fn import<R: BufRead>(
    store: &FileStore,
    secrets: &mut Secrets<R>,
    hex: &str,
    force: bool,
    out: &mut impl Write,
) -> Result<()> {
    if has_seed(store)? && !force {
        bail!("a seed already exists; pass --force to replace it");
    }
    let seed = parse_seed_hex(hex).context("invalid seed backup")?;
    let password = secrets.master_password()?;
    if password.is_empty() {
        bail!("master password must not be empty");
    }
    import_seed(store, seed.expose(), &password)?;
    writeln!(out, "seed imported")?;
    Ok(())
}

fn generate<R: BufRead>(
    store: &FileStore,
    secrets: &mut Secrets<R>,
    args: &GenerateArgs,
    out: &mut impl Write,
) -> Result<()> {
    let settings = load_settings(store)?;
    let base = realm_for_url(&settings, &args.url);
    if args.realm_only {
        writeln!(out, "{}", effective_realm(store, &base)?)?;
        return Ok(());
    }

    let mut session = if args.password_only {
        let password = secrets.master_password()?;
        unlock_password_only(store, &password)?
    } else {
        open(store, secrets)?
    };

    let generated = if args.spec.is_empty() {
        generate_for_url(store, &mut session, &args.url)?
    } else {
        let mut spec = settings.password_spec;
        args.spec.apply(&mut spec);
        let realm = effective_realm(store, &base)?;
        generate_for_realm(&session, &realm, &spec)?
    };
    session.lock();

    tracing::debug!(realm = %generated.realm, "generated");
    writeln!(out, "{}", generated.password)?;
    Ok(())
}

fn realm(store: &FileStore, url: &str, out: &mut impl Write) -> Result<()> {
    let settings = load_settings(store)?;
    let base = realm_for_url(&settings, url);
    let version = site_version(store, &base)?;
    writeln!(out, "realm: {base}")?;
    writeln!(out, "version: {version}")?;
    writeln!(out, "effective: {}", effective_realm(store, &base)?)?;
    Ok(())
}

fn settings(store: &FileStore, args: &SettingsArgs, out: &mut impl Write) -> Result<()> {
    let settings = if args.is_empty() {
        load_settings(store)?
    } else {
        update_settings(store, |s| {
            if let Some(minutes) = args.auto_lock_minutes {
                s.auto_lock_minutes = minutes;
            }
            if let Some(enabled) = args.auto_fill {
                s.auto_fill_enabled = enabled;
            }
            if let Some(include) = args.include_subdomain {
                s.realm.include_subdomain = include;
            }
            for from in &args.unmap {
                s.realm.custom_mappings.remove(&from.to_ascii_lowercase());
            }
            for (from, to) in &args.mappings {
                s.realm.custom_mappings.insert(from.clone(), to.clone());
            }
            args.spec.apply(&mut s.password_spec);
        })
        .context("settings not saved")?
    };
    serde_json::to_writer_pretty(&mut *out, &settings)?;
    writeln!(out)?;
    Ok(())
}
