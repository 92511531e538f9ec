use serde::Serialize;

use crate::error::{EndpointError, Result};

/// Port assumed when a token carries none, or an unparsable one.
pub const DEFAULT_PORT: u16 = 18000;

/// A normalized SeedLink server address.
///
/// `key` is the canonical `host:port` form, used as the cache key and as the
/// identifier reported back to callers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ServerEndpoint {
    host: String,
    port: u16,
    key: String,
}

impl ServerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        let key = format!("{host}:{port}");
        Self { host, port, key }
    }

    /// Parse a `host` or `host:port` token.
    ///
    /// A missing or non-numeric port falls back to [`DEFAULT_PORT`]. A numeric
    /// port outside `0..65536` is rejected with [`EndpointError::InvalidPort`].
    /// No name resolution happens here.
    pub fn parse(token: &str) -> Result<Self> {
        Self::parse_with_default(token, DEFAULT_PORT)
    }

    /// Like [`parse`](Self::parse) with a caller-chosen fallback port.
    pub fn parse_with_default(token: &str, default_port: u16) -> Result<Self> {
        let token = token.trim();
        let (host, port) = match token.split_once(':') {
            Some((host, port)) => (host, parse_port(port)),
            None => (token, None),
        };
        let port = port.unwrap_or(i64::from(default_port));
        let port = u16::try_from(port).map_err(|_| EndpointError::InvalidPort {
            token: token.to_owned(),
            port,
        })?;
        Ok(Self::new(host, port))
    }

    /// Parse a comma-delimited list of tokens, skipping blank entries.
    ///
    /// Fails on the first invalid token, or with [`EndpointError::EmptyQuery`]
    /// when nothing remains.
    pub fn parse_list(query: &str) -> Result<Vec<Self>> {
        Self::parse_list_with_default(query, DEFAULT_PORT)
    }

    pub fn parse_list_with_default(query: &str, default_port: u16) -> Result<Vec<Self>> {
        let endpoints = query
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Self::parse_with_default(t, default_port))
            .collect::<Result<Vec<_>>>()?;
        if endpoints.is_empty() {
            return Err(EndpointError::EmptyQuery);
        }
        Ok(endpoints)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Canonical `host:port` string.
    pub fn key(&self) -> &str {
        &self.key
    }
}

// Non-numeric text yields `None`; digits too long for `i64` saturate so the
// range check still rejects them.
fn parse_port(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(port) = raw.parse::<i64>() {
        return Some(port);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

impl std::fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}
