//! Alphabet and unbiased character sampling.
//!
//! [`CHARSET`] is the 94-symbol alphabet shared with gokey. Its order is
//! part of the derivation: byte buckets map to positions in this string, so
//! the sub-alphabets (including the `1234567890` digit order) must never be
//! reordered.

use std::num::NonZeroU8;

use crate::error::CryptoError;

/// Lowercase letters.
pub const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Uppercase letters.
pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Digits, `1` through `9` then `0`.
pub const DIGITS: &str = "1234567890";

/// The 32 printable ASCII symbols.
pub const SPECIAL: &str = "`~!@#$%^&*()-_=+[{]}\\|;:'\",<.>/?";

/// Full sampling alphabet: lower, upper, digits, special.
pub const CHARSET: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "1234567890",
    "`~!@#$%^&*()-_=+[{]}\\|;:'\",<.>/?"
);

/// Character class used by the compliance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// `A`–`Z`
    Upper,
    /// `a`–`z`
    Lower,
    /// `0`–`9`
    Digit,
    /// One of [`SPECIAL`]
    Special,
}

impl CharClass {
    /// Classify `c` by the four canonical sub-alphabets.
    ///
    /// Returns `None` for characters outside all four.
    #[must_use]
    pub fn of(c: char) -> Option<Self> {
        if UPPER.contains(c) {
            Some(Self::Upper)
        } else if LOWER.contains(c) {
            Some(Self::Lower)
        } else if DIGITS.contains(c) {
            Some(Self::Digit)
        } else if SPECIAL.contains(c) {
            Some(Self::Special)
        } else {
            None
        }
    }
}

/// Bytes below this value are accepted for an alphabet of `max` characters.
#[must_use]
pub fn acceptance_threshold(max: NonZeroU8) -> u8 {
    u8::MAX.saturating_sub(u8::MAX % max)
}

/// Share of byte values [`sample`] accepts when drawing from [`CHARSET`].
#[must_use]
pub fn charset_acceptance() -> f64 {
    u8::try_from(CHARSET.len())
        .ok()
        .and_then(NonZeroU8::new)
        .map_or(0.0, |max| f64::from(acceptance_threshold(max)) / 256.0)
}

/// One accepted draw from the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Selected character.
    pub ch: char,
    /// Bytes consumed from the offset, rejected ones included.
    pub consumed: usize,
}

/// Select one character from `charset` by rejection sampling over `bytes`.
///
/// With `max = charset.len()`, each byte below `255 - (255 % max)` maps to
/// `charset[b / (255 / max)]`; bytes at or above that threshold are skipped.
/// Every character therefore owns exactly `255 / max` byte values.
///
/// # Errors
///
/// - [`CryptoError::InvalidCharset`] if `charset` is empty, longer than 255
///   bytes, or not ASCII
/// - [`CryptoError::InsufficientEntropy`] if every byte from `offset` to the
///   end of `bytes` is rejected
pub fn sample(bytes: &[u8], offset: usize, charset: &str) -> Result<Sample, CryptoError> {
    if !charset.is_ascii() {
        return Err(CryptoError::InvalidCharset("charset must be ASCII".into()));
    }
    let alphabet = charset.as_bytes();
    let max = u8::try_from(alphabet.len())
        .ok()
        .and_then(NonZeroU8::new)
        .ok_or_else(|| {
            CryptoError::InvalidCharset(format!(
                "charset length must be 1..=255, got {}",
                alphabet.len()
            ))
        })?;

    // max <= 255, so every bucket holds at least one byte value.
    let bucket = NonZeroU8::new(u8::MAX / max)
        .ok_or_else(|| CryptoError::InvalidCharset("empty sampling bucket".into()))?;
    let threshold = acceptance_threshold(max);

    let window = bytes.get(offset..).unwrap_or_default();
    for (skipped, &b) in window.iter().enumerate() {
        if b >= threshold {
            continue;
        }
        let index = usize::from(b / bucket);
        let ch = char::from(alphabet[index]);
        return Ok(Sample {
            ch,
            consumed: skipped.saturating_add(1),
        });
    }
    Err(CryptoError::InsufficientEntropy)
}
