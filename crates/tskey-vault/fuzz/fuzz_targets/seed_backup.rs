//! Fuzz target for seed restore paths.
//!
//! Feeds arbitrary text to the hex backup parser and arbitrary bytes to the
//! envelope opener. Neither may panic.
//!
//! ```sh
//! cd crates/tskey-vault
//! cargo +nightly fuzz run seed_backup -- -max_len=1024
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = tskey_vault::parse_seed_hex(s);
    }
    let _ = tskey_core::decrypt_seed(data, "fuzz");
});
