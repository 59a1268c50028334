mod aes_gcm;
mod generator;
mod kdf;
mod keystream;

/// Decode a lowercase hex literal.
pub fn hex(s: &str) -> Vec<u8> {
    assert_eq!(s.len() % 2, 0, "odd hex length");
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

/// The 256-byte seed `00 01 02 .. ff` used by every seed-mode vector.
pub fn counting_seed() -> tskey_core::Seed {
    let mut bytes = [0u8; tskey_core::SEED_LEN];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = u8::try_from(i).unwrap();
    }
    tskey_core::Seed::new(bytes)
}
