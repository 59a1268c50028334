//! Fuzz target for realm extraction.
//!
//! Any string is a valid input: extraction falls back to the trimmed
//! input instead of failing. Must never panic.
//!
//! ```sh
//! cd crates/tskey-vault
//! cargo +nightly fuzz run realm_extract -- -max_len=512
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use tskey_core::{extract_realm, parse_realm, RealmConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let realm = extract_realm(s, &RealmConfig::default());
        let _ = parse_realm(&realm);
        let _ = parse_realm(s);
    }
});
