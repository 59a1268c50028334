//! Deterministic password generation.
//!
//! One [`ByteStream`] is built per call. Each attempt reads a fresh window
//! of `length * 4` bytes from it, samples `length` characters, and keeps the
//! candidate only if it meets the spec. Retries continue the same stream, so
//! the result is the first compliant candidate in stream order.
//!
//! The number of windows is capped per spec by
//! [`PasswordSpec::attempt_budget`], which leaves a false failure below
//! `2^-64` for every spec that validates.

use zeroize::Zeroize;

use crate::charset::{self, CHARSET};
use crate::drbg::ByteStream;
use crate::error::CryptoError;
use crate::policy::{self, PasswordSpec};
use crate::secret::SecretMaterial;

/// Bytes drawn per output character for each attempt.
pub const BYTES_PER_CHAR: usize = 4;

/// Derive the password for `realm` from `secret`.
///
/// In seed mode the master password plays no part, so two calls with the
/// same seed and realm agree regardless of which password unlocked the seed.
///
/// # Errors
///
/// - [`CryptoError::InvalidSpec`] if `spec` fails [`PasswordSpec::validate`]
/// - [`CryptoError::KeyDerivation`] if the stream key cannot be derived
/// - [`CryptoError::GenerationExhausted`] after
///   [`PasswordSpec::attempt_budget`] non-compliant windows
pub fn generate_password(
    secret: &SecretMaterial<'_>,
    realm: &str,
    spec: &PasswordSpec,
) -> Result<String, CryptoError> {
    let budget = spec.attempt_budget()?;
    let mut stream = ByteStream::new(secret, realm)?;
    let window_len = spec.length.saturating_mul(BYTES_PER_CHAR);

    for attempt in 1..=budget {
        let window = stream.read(window_len);
        match sample_candidate(&window, spec.length) {
            Ok(candidate) if policy::is_compliant(&candidate, spec) => {
                tracing::debug!(mode = secret.mode(), attempt, "generated compliant password");
                return Ok(candidate);
            }
            Ok(mut candidate) => {
                tracing::trace!(attempt, "candidate failed policy, drawing next window");
                candidate.zeroize();
            }
            Err(CryptoError::InsufficientEntropy) => {
                tracing::trace!(attempt, "window exhausted, drawing next window");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::warn!(
        attempts = budget,
        length = spec.length,
        "password generation exhausted its attempt budget"
    );
    Err(CryptoError::GenerationExhausted { attempts: budget })
}

/// Sample `length` characters from `window`, threading the byte offset.
fn sample_candidate(window: &[u8], length: usize) -> Result<String, CryptoError> {
    let mut candidate = String::with_capacity(length);
    let mut offset = 0usize;
    for _ in 0..length {
        match charset::sample(window, offset, CHARSET) {
            Ok(sample) => {
                candidate.push(sample.ch);
                offset = offset.saturating_add(sample.consumed);
            }
            Err(e) => {
                candidate.zeroize();
                return Err(e);
            }
        }
    }
    Ok(candidate)
}
