//! AES-256-CTR keystream vectors.
//!
//! Counter block `i` is the 128-bit big-endian block index starting at 0,
//! so these match gokey's stream for the same key.

use tskey_core::{ByteStream, SecretMaterial};

use super::{counting_seed, hex};

#[test]
fn password_mode_first_two_blocks() {
    let mut stream = ByteStream::new(&SecretMaterial::Password("password"), "example.com").unwrap();
    assert_eq!(
        stream.read(32).as_slice(),
        hex("c617b9b7f88f4b4c77ea6e77e372cb2c2484b8b38e508d9b1359fd13d162e418").as_slice()
    );
}

#[test]
fn password_mode_split_reads_match() {
    let mut stream = ByteStream::new(&SecretMaterial::Password("password"), "example.com").unwrap();
    let expected = hex("c617b9b7f88f4b4c77ea6e77e372cb2c2484b8b38e508d9b1359fd13d162e418");
    assert_eq!(stream.read(16).as_slice(), &expected[..16]);
    assert_eq!(stream.read(16).as_slice(), &expected[16..]);
}

#[test]
fn seed_mode_first_two_blocks() {
    let seed = counting_seed();
    let mut stream = ByteStream::new(&SecretMaterial::Seed(&seed), "example.com").unwrap();
    assert_eq!(
        stream.read(32).as_slice(),
        hex("5c56d55dde368a891ca1bc90262df5e6cd00a553de8a8cc8c64b7b188873e394").as_slice()
    );
}
