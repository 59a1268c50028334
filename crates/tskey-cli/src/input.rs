//! Master-password input: environment first, then standard input lines.

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use zeroize::Zeroizing;

const PASSWORD_ENV: &str = "TSKEY_PASSWORD";
const NEW_PASSWORD_ENV: &str = "TSKEY_NEW_PASSWORD";

/// Source of secret input for one invocation.
pub struct Secrets<R> {
    password: Option<Zeroizing<String>>,
    new_password: Option<Zeroizing<String>>,
    reader: R,
}

impl<R: BufRead> Secrets<R> {
    /// Secrets from `TSKEY_PASSWORD` / `TSKEY_NEW_PASSWORD`, falling back to `reader`.
    pub fn from_env(reader: R) -> Self {
        let var = |name: &str| std::env::var(name).ok().map(Zeroizing::new);
        Self::new(var(PASSWORD_ENV), var(NEW_PASSWORD_ENV), reader)
    }

    pub const fn new(
        password: Option<Zeroizing<String>>,
        new_password: Option<Zeroizing<String>>,
        reader: R,
    ) -> Self {
        Self {
            password,
            new_password,
            reader,
        }
    }

    /// The master password.
    ///
    /// # Errors
    ///
    /// Fails if neither the environment nor standard input provides one.
    pub fn master_password(&mut self) -> Result<Zeroizing<String>> {
        match self.password.take() {
            Some(password) => Ok(password),
            None => self.read_line(PASSWORD_ENV),
        }
    }

    /// The replacement master password for `change-password`.
    ///
    /// # Errors
    ///
    /// Fails if neither the environment nor standard input provides one.
    pub fn new_password(&mut self) -> Result<Zeroizing<String>> {
        match self.new_password.take() {
            Some(password) => Ok(password),
            None => self.read_line(NEW_PASSWORD_ENV),
        }
    }

    fn read_line(&mut self, env_name: &str) -> Result<Zeroizing<String>> {
        let mut line = Zeroizing::new(String::new());
        let read = self
            .reader
            .read_line(&mut line)
            .context("failed to read standard input")?;
        if read == 0 {
            bail!("no password given: set {env_name} or pipe it on standard input");
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}
