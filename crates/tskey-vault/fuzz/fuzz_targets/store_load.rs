//! Fuzz target for the stored JSON document.
//!
//! Arbitrary bytes as `tskey.json`: decoding the document and its sealed
//! seed must fail cleanly, never panic.
//!
//! ```sh
//! cd crates/tskey-vault
//! cargo +nightly fuzz run store_load -- -max_len=4096
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use tskey_vault::VaultData;

fuzz_target!(|data: &[u8]| {
    if let Ok(vault) = serde_json::from_slice::<VaultData>(data) {
        let _ = vault.encrypted_seed();
        let _ = vault.settings.password_spec.validate();
        let _ = vault.settings.auto_lock();
    }
});
