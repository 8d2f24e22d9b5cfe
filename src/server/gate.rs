//! Basic-Auth gate that only applies to public origins.
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use base64::Engine as _;
use tracing::warn;

pub(crate) const AUTH_USER_VAR: &str = "AUTH_USER";
pub(crate) const AUTH_PASSWORD_VAR: &str = "AUTH_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// Where the shared credential pair comes from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// `AUTH_USER` / `AUTH_PASSWORD`, read on every gated request.
    Environment,
    Fixed(Option<Credentials>),
}

impl CredentialSource {
    /// `None` when either value is missing or empty.
    #[must_use]
    pub fn load(&self) -> Option<Credentials> {
        match self {
            Self::Environment => {
                let user = std::env::var(AUTH_USER_VAR).ok()?;
                let password = std::env::var(AUTH_PASSWORD_VAR).ok()?;
                (!user.is_empty() && !password.is_empty())
                    .then_some(Credentials { user, password })
            }
            Self::Fixed(credentials) => credentials
                .clone()
                .filter(|creds| !creds.user.is_empty() && !creds.password.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateDecision {
    Allow,
    /// `challenge` asks the client for credentials via `WWW-Authenticate`.
    Reject { challenge: bool },
}

/// Loopback, private and non-global origins are trusted. An unknown origin is not.
#[must_use]
pub fn requires_auth(origin: Option<SocketAddr>) -> bool {
    let Some(origin) = origin else {
        return true;
    };
    match canonical_ip(origin.ip()) {
        IpAddr::V4(ip) => !ip.is_private() && is_global_unicast_v4(ip),
        IpAddr::V6(ip) => !is_unique_local_v6(ip) && is_global_unicast_v6(ip),
    }
}

pub(crate) fn authorize(
    origin: Option<SocketAddr>,
    authorization: Option<&str>,
    source: &CredentialSource,
) -> GateDecision {
    if !requires_auth(origin) {
        return GateDecision::Allow;
    }

    let Some(expected) = source.load() else {
        warn!("External access is blocked because AUTH_USER and AUTH_PASSWORD are not set.");
        return GateDecision::Reject { challenge: false };
    };

    let Some((user, password)) = authorization.and_then(parse_basic_auth) else {
        return GateDecision::Reject { challenge: true };
    };
    let user_ok = constant_time_eq(user.as_bytes(), expected.user.as_bytes());
    let password_ok = constant_time_eq(password.as_bytes(), expected.password.as_bytes());
    if user_ok & password_ok {
        GateDecision::Allow
    } else {
        if let Some(origin) = origin {
            warn!("Rejected credentials from {}", origin);
        }
        GateDecision::Reject { challenge: true }
    }
}

/// Decodes `Basic <base64(user:password)>`.
#[must_use]
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_owned(), password.to_owned()))
}

/// Compares without an early exit on the first differing byte. Only the
/// lengths leak.
#[must_use]
pub fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(IpAddr::V6(v6), IpAddr::V4),
        IpAddr::V4(_) => ip,
    }
}

fn is_global_unicast_v4(ip: Ipv4Addr) -> bool {
    !(ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_multicast()
        || ip.is_link_local()
        || ip.is_broadcast())
}

fn is_global_unicast_v6(ip: Ipv6Addr) -> bool {
    let [first, ..] = ip.segments();
    let link_local = (first & 0xffc0) == 0xfe80;
    !(ip.is_unspecified() || ip.is_loopback() || ip.is_multicast() || link_local)
}

fn is_unique_local_v6(ip: Ipv6Addr) -> bool {
    let [first, ..] = ip.segments();
    (first & 0xfe00) == 0xfc00
}
