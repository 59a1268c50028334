//! URL / hostname to realm normalization.
//!
//! A realm is the registrable domain of a site (`login.github.com` →
//! `github.com`), optionally remapped by the user and optionally suffixed
//! with `#<version>` to rotate the derived password.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use url::{Host, Url};

/// Per-call realm options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealmConfig {
    /// Hostname or realm → replacement realm.
    pub custom_mappings: BTreeMap<String, String>,
    /// Keep the subdomain (`api.example.com` instead of `example.com`).
    pub include_subdomain: bool,
    /// Rotation counter; `None` and `Some(1)` add no suffix.
    pub version: Option<u32>,
}

/// A realm split into its base and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRealm {
    /// Realm without the `#<version>` suffix.
    pub realm: String,
    /// Version, `1` when no suffix is present.
    pub version: u32,
}

/// Registrable domain split from a hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainParts<'a> {
    /// Labels left of the registrable domain, if any.
    pub subdomain: Option<&'a str>,
    /// ICANN public suffix plus one label.
    pub domain: &'a str,
}

/// Canonical realm for `url_or_hostname`.
///
/// Mapping lookups happen twice: first on the raw hostname, then on the
/// derived realm. The raw-hostname mapping wins.
///
/// ```
/// use tskey_core::{extract_realm, RealmConfig};
///
/// assert_eq!(extract_realm("https://login.github.com/auth", &RealmConfig::default()), "github.com");
/// ```
#[must_use]
pub fn extract_realm(url_or_hostname: &str, config: &RealmConfig) -> String {
    let hostname = hostname_of(url_or_hostname);

    if let Some(mapped) = config.custom_mappings.get(&hostname) {
        return apply_version(mapped, config.version);
    }

    let realm = if hostname.parse::<IpAddr>().is_ok() {
        hostname.clone()
    } else {
        match registrable_domain(&hostname) {
            Some(DomainParts {
                subdomain: Some(sub),
                domain,
            }) if config.include_subdomain => format!("{sub}.{domain}"),
            Some(parts) => parts.domain.to_owned(),
            None => hostname.clone(),
        }
    };

    let realm = config.custom_mappings.get(&realm).unwrap_or(&realm);
    apply_version(realm, config.version)
}

/// Append `#<version>` when `version > 1`.
#[must_use]
pub fn apply_version(realm: &str, version: Option<u32>) -> String {
    match version {
        Some(v) if v > 1 => format!("{realm}#{v}"),
        _ => realm.to_owned(),
    }
}

/// Split a trailing `#<digits>` off `realm`.
///
/// Only the last `#` group is considered, and only when something precedes
/// it: `a#b#2` parses as (`a#b`, 2), `example#test` and `#2` as version 1.
/// A suffix too large for `u32` is left in place.
#[must_use]
pub fn parse_realm(realm: &str) -> ParsedRealm {
    if let Some((base, digits)) = realm.rsplit_once('#') {
        if !base.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(version) = digits.parse::<u32>() {
                return ParsedRealm {
                    realm: base.to_owned(),
                    version,
                };
            }
        }
    }
    ParsedRealm {
        realm: realm.to_owned(),
        version: 1,
    }
}

/// Split `host` into subdomain and registrable domain.
///
/// Only ICANN suffixes count: a private-section suffix such as `github.io`
/// is itself treated as a registrable domain, so `user.github.io` yields
/// `github.io`. Returns `None` when the host is a bare suffix or a single
/// label (`localhost`, `com`).
#[must_use]
pub fn registrable_domain(host: &str) -> Option<DomainParts<'_>> {
    let host = host.trim_end_matches('.');
    let suffix = icann_suffix(host)?;
    let rest = host.strip_suffix(suffix)?.strip_suffix('.')?;
    if rest.is_empty() {
        return None;
    }
    match rest.rfind('.') {
        Some(dot) => {
            let start = dot.saturating_add(1);
            Some(DomainParts {
                subdomain: Some(&rest[..dot]).filter(|s| !s.is_empty()),
                domain: &host[start..],
            })
        }
        None => Some(DomainParts {
            subdomain: None,
            domain: host,
        }),
    }
}

/// Longest ICANN (or unlisted) public suffix of `host`.
fn icann_suffix(host: &str) -> Option<&str> {
    let mut candidate = host;
    loop {
        let suffix = psl::suffix(candidate.as_bytes())?;
        let text = std::str::from_utf8(suffix.as_bytes()).ok()?;
        if suffix.typ() != Some(psl::Type::Private) {
            return Some(text);
        }
        // Drop the private label and look up what remains.
        let (_, parent) = text.split_once('.')?;
        candidate = parent;
    }
}

/// Hostname of a URL, or the trimmed, lower-cased input when it has none.
fn hostname_of(input: &str) -> String {
    match Url::parse(input) {
        Ok(url) => match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => return domain.to_owned(),
            Some(Host::Ipv4(addr)) => return addr.to_string(),
            Some(Host::Ipv6(addr)) => return addr.to_string(),
            _ => tracing::debug!("URL has no host, treating input as hostname"),
        },
        Err(e) => tracing::debug!(error = %e, "not a URL, treating input as hostname"),
    }
    let literal = input.trim().to_lowercase();
    let after_scheme = literal
        .split_once("://")
        .map_or(literal.as_str(), |(_, rest)| rest);
    let authority = after_scheme.split(['/', '?']).next().unwrap_or_default();
    if authority.is_empty() {
        return literal;
    }
    if let Some(v6) = authority.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return v6.to_owned();
    }
    if authority.parse::<IpAddr>().is_err() {
        if let Some((name, port)) = authority.rsplit_once(':') {
            if !name.is_empty() && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
                return name.to_owned();
            }
        }
    }
    authority.to_owned()
}
