//! Password spec and compliance checking.

use std::f64::consts::LN_2;

use serde::{Deserialize, Serialize};

use crate::charset::{self, CharClass, DIGITS, LOWER, SPECIAL, UPPER};
use crate::error::CryptoError;
use crate::generator::BYTES_PER_CHAR;

/// Default generated password length.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Longest password [`PasswordSpec::validate`] accepts.
pub const MAX_PASSWORD_LENGTH: usize = 1024;

/// Lowest per-attempt success probability [`PasswordSpec::validate`] accepts.
///
/// A six-digit PIN (about 1.45e-6) clears it; a seven-digit one does not.
pub const MIN_ATTEMPT_SUCCESS: f64 = 1e-6;

/// Attempt budgets keep the chance of a false failure below `2^-FAILURE_BITS`.
const FAILURE_BITS: f64 = 64.0;

/// Length and per-class minimums for a generated password.
///
/// Missing fields deserialize to their defaults, so a partial JSON object
/// overrides only what it names. In Rust, use struct update syntax:
///
/// ```
/// use tskey_core::PasswordSpec;
///
/// let spec = PasswordSpec { length: 20, ..PasswordSpec::default() };
/// assert_eq!(spec.upper, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordSpec {
    /// Exact number of characters.
    pub length: usize,
    /// Minimum uppercase letters.
    pub upper: usize,
    /// Minimum lowercase letters.
    pub lower: usize,
    /// Minimum digits.
    pub digits: usize,
    /// Minimum symbols.
    pub special: usize,
}

impl Default for PasswordSpec {
    fn default() -> Self {
        Self {
            length: DEFAULT_PASSWORD_LENGTH,
            upper: 1,
            lower: 1,
            digits: 1,
            special: 1,
        }
    }
}

impl PasswordSpec {
    /// Sum of the four class minimums.
    #[must_use]
    pub const fn required(&self) -> usize {
        self.upper
            .saturating_add(self.lower)
            .saturating_add(self.digits)
            .saturating_add(self.special)
    }

    /// Reject specs the generator could never satisfy, or would satisfy
    /// too rarely to terminate in reasonable time.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSpec`] if `length` is zero or above
    /// [`MAX_PASSWORD_LENGTH`], if the class minimums exceed `length`, or if
    /// [`attempt_success`](Self::attempt_success) is below
    /// [`MIN_ATTEMPT_SUCCESS`].
    pub fn validate(&self) -> Result<(), CryptoError> {
        self.attempt_budget().map(|_| ())
    }

    /// Number of windows the generator may draw before giving up.
    ///
    /// Sized from `p` = [`attempt_success`](Self::attempt_success) so that
    /// `(1 - p)^budget < 2^-64`: a valid spec fails closed only with
    /// negligible probability.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn attempt_budget(&self) -> Result<u32, CryptoError> {
        if self.length == 0 || self.length > MAX_PASSWORD_LENGTH {
            return Err(CryptoError::InvalidSpec(format!(
                "length must be between 1 and {MAX_PASSWORD_LENGTH}, got {}",
                self.length
            )));
        }
        let required = self.required();
        if required > self.length {
            return Err(CryptoError::InvalidSpec(format!(
                "class minimums add up to {required}, more than length {}",
                self.length
            )));
        }
        let p = self.attempt_success();
        if p < MIN_ATTEMPT_SUCCESS {
            return Err(CryptoError::InvalidSpec(format!(
                "class minimums too tight for length {}: an attempt succeeds with \
                 probability {p:.2e}, below {MIN_ATTEMPT_SUCCESS:e}",
                self.length
            )));
        }
        let budget = (FAILURE_BITS * LN_2 / -(-p).ln_1p()).ceil().max(1.0);
        // At most 64 ln 2 / MIN_ATTEMPT_SUCCESS, about 4.4e7.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let budget = budget as u32;
        Ok(budget)
    }

    /// Probability that one generation attempt yields a compliant candidate.
    ///
    /// Accepted bytes map to independent, uniform characters, so this is the
    /// chance that a `length * 4` byte window holds at least `length`
    /// accepted bytes, times the multinomial chance that `length` uniform
    /// characters meet every class minimum. Only meaningful for lengths
    /// within [`MAX_PASSWORD_LENGTH`].
    #[must_use]
    pub fn attempt_success(&self) -> f64 {
        window_fill_probability(self.length) * compliance_probability(self)
    }
}

/// Chance that `length * BYTES_PER_CHAR` random bytes hold `length` accepted ones.
fn window_fill_probability(length: usize) -> f64 {
    let draws = length.saturating_mul(BYTES_PER_CHAR);
    let accept = charset::charset_acceptance();
    let odds = accept / (1.0 - accept);
    let mut pmf = (1.0 - accept).powi(exponent(draws));
    let mut short = 0.0;
    for a in 0..length {
        short += pmf;
        pmf *= (real(draws) - real(a)) / (real(a) + 1.0) * odds;
    }
    (1.0 - short).max(0.0)
}

/// Chance that `spec.length` uniform characters meet every class minimum.
///
/// Classes are split off one at a time. With `r` positions not taken by
/// earlier classes, the next class count is binomial over `r` with that
/// class's share of the alphabet still in play.
fn compliance_probability(spec: &PasswordSpec) -> f64 {
    let n = spec.length;
    // met[r]: chance the classes already folded in meet their minimums
    // using exactly the last r positions.
    let mut met: Vec<f64> = (0..=n)
        .map(|r| if r >= spec.special { 1.0 } else { 0.0 })
        .collect();
    let mut pool = SPECIAL.len();
    for (size, min) in [
        (DIGITS.len(), spec.digits),
        (LOWER.len(), spec.lower),
        (UPPER.len(), spec.upper),
    ] {
        pool = pool.saturating_add(size);
        let share = real(size) / real(pool);
        met = (0..=n).map(|r| weighted_tail(r, share, min, &met)).collect();
    }
    met.get(n).copied().unwrap_or(0.0)
}

/// Sum over `a >= min` of `P[Binomial(r, share) = a] * rest[r - a]`.
fn weighted_tail(r: usize, share: f64, min: usize, rest: &[f64]) -> f64 {
    let odds = share / (1.0 - share);
    let mut pmf = (1.0 - share).powi(exponent(r));
    let mut total = 0.0;
    let remaining = rest.get(..=r).unwrap_or_default();
    for (a, &weight) in remaining.iter().rev().enumerate() {
        if a >= min {
            total = pmf.mul_add(weight, total);
        }
        pmf *= (real(r) - real(a)) / (real(a) + 1.0) * odds;
    }
    total
}

fn real(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}

fn exponent(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Per-class character counts of a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    /// Uppercase letters.
    pub upper: usize,
    /// Lowercase letters.
    pub lower: usize,
    /// Digits.
    pub digits: usize,
    /// Symbols.
    pub special: usize,
}

/// Count characters of `candidate` in each canonical class.
#[must_use]
pub fn count_classes(candidate: &str) -> ClassCounts {
    candidate
        .chars()
        .filter_map(CharClass::of)
        .fold(ClassCounts::default(), |mut counts, class| {
            let slot = match class {
                CharClass::Upper => &mut counts.upper,
                CharClass::Lower => &mut counts.lower,
                CharClass::Digit => &mut counts.digits,
                CharClass::Special => &mut counts.special,
            };
            *slot = slot.saturating_add(1);
            counts
        })
}

/// `true` when every class count meets the spec minimum.
#[must_use]
pub fn is_compliant(candidate: &str, spec: &PasswordSpec) -> bool {
    let counts = count_classes(candidate);
    counts.upper >= spec.upper
        && counts.lower >= spec.lower
        && counts.digits >= spec.digits
        && counts.special >= spec.special
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec() {
        let spec = PasswordSpec::default();
        assert_eq!(spec.length, 16);
        assert_eq!(spec.required(), 4);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn counts_each_class() {
        let counts = count_classes("aB3$ xY9\\");
        assert_eq!(
            counts,
            ClassCounts {
                upper: 2,
                lower: 2,
                digits: 2,
                special: 2,
            }
        );
    }

    #[test]
    fn compliance_requires_every_minimum() {
        let spec = PasswordSpec {
            length: 4,
            ..PasswordSpec::default()
        };
        assert!(is_compliant("aB3$", &spec));
        assert!(!is_compliant("aB3c", &spec));
        assert!(!is_compliant("ab3$", &spec));
    }

    #[test]
    fn zero_minimums_accept_anything() {
        let spec = PasswordSpec {
            length: 3,
            upper: 0,
            lower: 0,
            digits: 0,
            special: 0,
        };
        assert!(is_compliant("zzz", &spec));
        assert!(is_compliant("", &spec));
    }

    #[test]
    fn validate_rejects_overfull_spec() {
        let spec = PasswordSpec {
            length: 3,
            ..PasswordSpec::default()
        };
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, CryptoError::InvalidSpec(_)));
        assert!(err.to_string().contains("more than length 3"));
    }

    #[test]
    fn validate_rejects_zero_and_huge_length() {
        let zero = PasswordSpec {
            length: 0,
            upper: 0,
            lower: 0,
            digits: 0,
            special: 0,
        };
        assert!(zero.validate().is_err());
        let huge = PasswordSpec {
            length: MAX_PASSWORD_LENGTH + 1,
            ..PasswordSpec::default()
        };
        assert!(huge.validate().is_err());
    }

    fn digits_only(length: usize) -> PasswordSpec {
        PasswordSpec {
            length,
            upper: 0,
            lower: 0,
            digits: length,
            special: 0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        let error = ((actual - expected) / expected).abs();
        assert!(error < 1e-4, "{actual} vs {expected}");
    }

    #[test]
    fn attempt_success_matches_closed_forms() {
        // Every position pinned to digits.
        assert_close(digits_only(4).attempt_success(), (10f64 / 94.0).powi(4));
        assert_close(digits_only(6).attempt_success(), (10f64 / 94.0).powi(6));
        // Four positions, one per class: 4! orderings.
        let tight = PasswordSpec {
            length: 4,
            ..PasswordSpec::default()
        };
        let orderings = 24.0 * 26.0 * 26.0 * 10.0 * 32.0 / 94f64.powi(4);
        assert_close(tight.attempt_success(), orderings);
    }

    #[test]
    fn attempt_success_of_loose_specs() {
        let default = PasswordSpec::default().attempt_success();
        assert!((0.82..0.83).contains(&default), "{default}");
        let raised = PasswordSpec {
            length: 20,
            upper: 3,
            lower: 3,
            digits: 3,
            special: 3,
        };
        let raised = raised.attempt_success();
        assert!((0.29..0.30).contains(&raised), "{raised}");
        let free = PasswordSpec {
            length: 1,
            upper: 0,
            lower: 0,
            digits: 0,
            special: 0,
        };
        // Only the window fill matters: four bytes, all rejected.
        assert_close(free.attempt_success(), 1.0 - (68f64 / 256.0).powi(4));
    }

    #[test]
    fn long_specs_stay_finite() {
        let spec = PasswordSpec {
            length: MAX_PASSWORD_LENGTH,
            ..PasswordSpec::default()
        };
        let p = spec.attempt_success();
        assert!(p > 0.999_999 && p <= 1.0, "{p}");
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn budget_covers_failure_bound() {
        for spec in [PasswordSpec::default(), digits_only(4), digits_only(6)] {
            let p = spec.attempt_success();
            let budget = spec.attempt_budget().unwrap();
            let miss = (1.0 - p).powf(f64::from(budget));
            assert!(miss < 2f64.powi(-64), "{spec:?}: {budget} attempts leave {miss}");
        }
        let budget = digits_only(4).attempt_budget().unwrap();
        assert!((340_000..350_000).contains(&budget), "{budget}");
    }

    #[test]
    fn pins_up_to_six_digits_validate() {
        for length in 1..=6 {
            assert!(digits_only(length).validate().is_ok(), "{length} digits");
        }
    }

    #[test]
    fn validate_rejects_improbable_spec() {
        for length in [7, 20] {
            let err = digits_only(length).validate().unwrap_err();
            assert!(matches!(err, CryptoError::InvalidSpec(_)));
            assert!(err.to_string().contains("too tight"), "{err}");
        }
        // Every position pinned, 32 per class: about 1.2e-8.
        let crowded = PasswordSpec {
            length: 128,
            upper: 32,
            lower: 32,
            digits: 32,
            special: 32,
        };
        assert!(crowded.attempt_budget().is_err());
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let spec: PasswordSpec = serde_json::from_str(r#"{"length": 32}"#).unwrap();
        assert_eq!(
            spec,
            PasswordSpec {
                length: 32,
                ..PasswordSpec::default()
            }
        );
    }
}
