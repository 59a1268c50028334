//! `tskey-core`: deterministic password derivation for TSKey.
//!
//! Pipeline: realm normalization → key-stream derivation → rejection
//! sampling → compliance-checked regeneration. Byte-compatible with gokey.
//! No I/O, no async, no global state.
//!
//! Passwords that needed a retry window differ from the TypeScript TSKey
//! client; see the compatibility notes in [`drbg`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod secret;

pub mod kdf;
pub mod symmetric;

pub mod charset;
pub mod drbg;
pub mod generator;
pub mod policy;

pub mod realm;

pub mod seed;

pub use charset::{sample, CharClass, Sample, CHARSET};
pub use drbg::ByteStream;
pub use error::CryptoError;
pub use generator::{generate_password, BYTES_PER_CHAR};
pub use policy::{
    count_classes, is_compliant, ClassCounts, PasswordSpec, DEFAULT_PASSWORD_LENGTH,
    MAX_PASSWORD_LENGTH, MIN_ATTEMPT_SUCCESS,
};
pub use realm::{apply_version, extract_realm, parse_realm, ParsedRealm, RealmConfig};
pub use secret::{SecretBytes, SecretMaterial, Seed, SEED_LEN};
pub use seed::{decrypt_seed, encrypt_seed, generate_seed, EncryptedSeed, ENCRYPTED_SEED_LEN};
pub use symmetric::{decrypt_with_key, encrypt_with_key};
