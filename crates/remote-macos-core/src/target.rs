//! Connection target resolution.
//!
//! A [`Target`] is everything needed to open one VNC session: host, port,
//! credentials and the connect/settle timeout.  It is derived from raw
//! configuration strings on every tool call; nothing here is cached.
//!
//! # Host string shapes
//!
//! `MACOS_HOST` may carry its own port.  Three shapes are recognised:
//!
//! | Input                 | Host           | Embedded port |
//! |-----------------------|----------------|---------------|
//! | `[2601::1]:5999`      | `[2601::1]`    | `5999`        |
//! | `example.com:5901`    | `example.com`  | `5901`        |
//! | `example.com::5901`   | `example.com`  | `5901`        |
//! | `example.com`         | `example.com`  | none          |
//!
//! Port precedence: embedded port, then `MACOS_PORT`, then 5900.
//!
//! This module never reads the process environment itself; callers pass a
//! lookup function (see [`Target::from_lookup`]) so resolution stays testable.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Default RFB port when neither the host string nor `MACOS_PORT` names one.
pub const DEFAULT_VNC_PORT: u16 = 5900;

/// Connect/settle timeout used when `MACOS_VNC_TIMEOUT` is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Largest accepted timeout override: one day.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

pub const HOST_VAR: &str = "MACOS_HOST";
pub const PORT_VAR: &str = "MACOS_PORT";
pub const USERNAME_VAR: &str = "MACOS_USERNAME";
pub const PASSWORD_VAR: &str = "MACOS_PASSWORD";
pub const TIMEOUT_VAR: &str = "MACOS_VNC_TIMEOUT";

/// Configuration errors, raised before any connection attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),
    /// The selected port string is not an integer in `1..=65535`.
    #[error("MACOS_PORT must be an integer in 1..=65535, got {0:?}")]
    InvalidPort(String),
    /// The timeout override is not a positive number of seconds up to
    /// [`MAX_TIMEOUT`].
    #[error("MACOS_VNC_TIMEOUT must be a positive number of seconds up to 86400, got {0:?}")]
    InvalidTimeout(String),
    /// Stripping the embedded port left nothing behind.
    #[error("MACOS_HOST does not contain a host name: {0:?}")]
    EmptyHost(String),
}

/// A validated VNC connection target.
///
/// Invariants: `host` is non-empty, `password` is non-empty, `port > 0`,
/// `timeout > 0`.
#[derive(Clone, PartialEq)]
pub struct Target {
    /// Host name, IPv4 literal, or bracketed IPv6 literal (`[2601::1]`).
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: String,
    /// Upper bound for connecting and for the post-connect settle loop.
    pub timeout: Duration,
}

impl Target {
    /// Builds a target from a variable lookup, typically `std::env::var`.
    ///
    /// Every value is trimmed; blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `MACOS_HOST` or `MACOS_PASSWORD` is
    /// missing, or when the port or timeout does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let raw_host = read(HOST_VAR).ok_or(ConfigError::Missing(HOST_VAR))?;
        let password = read(PASSWORD_VAR).ok_or(ConfigError::Missing(PASSWORD_VAR))?;
        let raw_port = read(PORT_VAR).unwrap_or_default();
        let username = read(USERNAME_VAR);
        let timeout = parse_timeout(read(TIMEOUT_VAR).as_deref())?;

        let (host, port) = resolve_host_port(&raw_host, &raw_port)?;
        debug!(
            host = %host,
            port,
            has_username = username.is_some(),
            timeout_ms = timeout.as_millis() as u64,
            "Resolved VNC target"
        );

        Ok(Self {
            host,
            port,
            username,
            password,
            timeout,
        })
    }

    /// `host::port`, the single-string target form used by VNC tooling.
    ///
    /// Used for logging and operator output; dialing uses
    /// [`Target::socket_address`].
    pub fn display_name(&self) -> String {
        format!("{}::{}", self.host, self.port)
    }

    /// `host:port`, suitable for a TCP connect call.  Bracketed IPv6 hosts
    /// stay bracketed, so the result is always unambiguous.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.host, self.port)
    }
}

fn is_port_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Splits a raw host string into host and port.
///
/// `raw_port` is the explicitly configured port (may be empty).  A port
/// embedded in `raw_host` wins over it; 5900 applies when neither is given.
///
/// # Errors
///
/// [`ConfigError::InvalidPort`] when the selected port is not an integer in
/// `1..=65535`; [`ConfigError::EmptyHost`] when no host name remains.
pub fn resolve_host_port(raw_host: &str, raw_port: &str) -> Result<(String, u16), ConfigError> {
    let mut host = raw_host.trim();
    let port_candidate = raw_port.trim();
    let mut inline_port: Option<&str> = None;

    match host.find(']') {
        Some(closing) if host.starts_with('[') => {
            let (bracketed, remainder) = host.split_at(closing + 1);
            host = bracketed;
            if let Some(candidate) = remainder.strip_prefix(':') {
                if is_port_digits(candidate) {
                    inline_port = Some(candidate);
                }
            }
        }
        _ => {
            if host.matches(':').count() == 1 {
                if let Some((maybe_host, maybe_port)) = host.rsplit_once(':') {
                    if is_port_digits(maybe_port) {
                        host = maybe_host;
                        inline_port = Some(maybe_port);
                    }
                }
            } else if host.matches("::").count() == 1 {
                if let Some((maybe_host, maybe_port)) = host.split_once("::") {
                    if is_port_digits(maybe_port) {
                        host = maybe_host;
                        inline_port = Some(maybe_port);
                    }
                }
            }
        }
    }

    if host.is_empty() {
        return Err(ConfigError::EmptyHost(raw_host.to_string()));
    }

    let port_str = inline_port
        .or_else(|| (!port_candidate.is_empty()).then_some(port_candidate))
        .unwrap_or("");
    let port = if port_str.is_empty() {
        DEFAULT_VNC_PORT
    } else {
        match port_str.parse::<u16>() {
            Ok(port) if port > 0 => port,
            _ => return Err(ConfigError::InvalidPort(port_str.to_string())),
        }
    };

    Ok((host.to_string(), port))
}

/// Parses the timeout override, falling back to [`DEFAULT_TIMEOUT`].
///
/// # Errors
///
/// [`ConfigError::InvalidTimeout`] for non-numeric, non-finite, zero or
/// negative values, and for anything above [`MAX_TIMEOUT`].
pub fn parse_timeout(raw: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_TIMEOUT);
    };
    raw.parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|timeout| *timeout <= MAX_TIMEOUT)
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
