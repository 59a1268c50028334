//! End-to-end generated passwords.

use tskey_core::{generate_password, PasswordSpec, SecretMaterial};

use super::counting_seed;

fn default_password(secret: &SecretMaterial<'_>, realm: &str) -> String {
    generate_password(secret, realm, &PasswordSpec::default()).unwrap()
}

/// First window is compliant.
#[test]
fn password_mode_default_spec() {
    assert_eq!(
        default_password(&SecretMaterial::Password("password"), "example.com"),
        "l/>*LM8486ws#/<*"
    );
}

/// Longer windows extend the same stream, so the prefix is shared.
#[test]
fn password_mode_length_20() {
    let spec = PasswordSpec {
        length: 20,
        upper: 3,
        lower: 3,
        digits: 3,
        special: 3,
    };
    let password =
        generate_password(&SecretMaterial::Password("password"), "example.com", &spec).unwrap();
    assert_eq!(password, "l/>*LM8486ws#/<*O&+j");
}

/// First window fails the policy; the answer comes from the second.
#[test]
fn password_mode_second_window() {
    assert_eq!(
        default_password(
            &SecretMaterial::Password("super-secret-master-password"),
            "example.com"
        ),
        "Fg;.xBJ;7z,7COq#"
    );
}

#[test]
fn empty_password_and_realm() {
    assert_eq!(
        default_password(&SecretMaterial::Password(""), ""),
        "igMwg4*G|RN&k9uW"
    );
}

/// Seed `00..ff`; needs a second window.
#[test]
fn seed_mode_default_spec() {
    let seed = counting_seed();
    assert_eq!(
        default_password(&SecretMaterial::Seed(&seed), "example.com"),
        "(Qf{Q8HRz5!TM*M8"
    );
}
