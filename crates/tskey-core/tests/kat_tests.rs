#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Known-answer tests for tskey-core.
//!
//! Pinned outputs for every derivation step, so any change to the KDF
//! parameters, counter layout, charset order, or sampling rule is caught:
//! - PBKDF2 / HKDF key derivation
//! - AES-256-CTR keystream
//! - AES-256-GCM seed envelope
//! - end-to-end generated passwords

mod kat_vectors;
