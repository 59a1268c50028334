//! Entropy quality of seeds, keystreams, and generated characters.
//!
//! Thresholds are relaxed below the theoretical values so natural variance
//! never fails a run, while degenerate output (all zeros, a stuck counter,
//! a skewed bucket mapping) still does.
//!
//! | Sample size | Expected entropy | Our threshold |
//! |-------------|-----------------|---------------|
//! | 256 bytes   | ~7.18           | 6.5           |
//! | 64 KB       | ~7.997          | 7.99          |

use tskey_core::charset::{sample, CHARSET};
use tskey_core::{generate_seed, ByteStream, SecretMaterial};

/// Shannon entropy of a byte slice (bits per byte).
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] += 1;
    }
    let len = data.len() as f64;
    freq.iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[test]
fn generated_seed_entropy() {
    let seed = generate_seed().unwrap();
    let entropy = shannon_entropy(seed.expose());
    assert!(entropy > 6.5, "seed entropy too low: {entropy:.3}");
}

#[test]
fn password_keystream_64kb_entropy() {
    let mut stream = ByteStream::new(&SecretMaterial::Password("entropy"), "example.com").unwrap();
    let bytes = stream.read(65_536);
    let entropy = shannon_entropy(&bytes);
    assert!(entropy > 7.99, "keystream entropy too low: {entropy:.4}");
}

#[test]
fn zero_seed_keystream_is_still_uniform() {
    let seed = tskey_core::Seed::new([0u8; tskey_core::SEED_LEN]);
    let mut stream = ByteStream::new(&SecretMaterial::Seed(&seed), "example.com").unwrap();
    let bytes = stream.read(65_536);
    let entropy = shannon_entropy(&bytes);
    assert!(entropy > 7.99, "keystream entropy too low: {entropy:.4}");
}

/// Every character is drawn about equally often.
///
/// 200k samples over 94 symbols: expected count ~2128, standard deviation
/// ~46. A ±15% band is over 6 sigma wide.
#[test]
fn character_distribution_is_flat() {
    let mut stream = ByteStream::new(&SecretMaterial::Password("uniform"), "realm").unwrap();
    let bytes = stream.read(320_000);
    let mut counts = [0u32; 94];
    let mut offset = 0;
    let mut drawn = 0u32;
    while drawn < 200_000 {
        let s = sample(&bytes, offset, CHARSET).unwrap();
        offset += s.consumed;
        let index = CHARSET.find(s.ch).unwrap();
        counts[index] += 1;
        drawn += 1;
    }
    let expected = f64::from(drawn) / 94.0;
    for (i, &c) in counts.iter().enumerate() {
        let ratio = f64::from(c) / expected;
        assert!(
            (0.85..1.15).contains(&ratio),
            "character {:?} drawn {c} times, expected ~{expected:.0}",
            CHARSET.as_bytes()[i] as char
        );
    }
}
