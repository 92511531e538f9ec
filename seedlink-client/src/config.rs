use std::time::Duration;

use seedlink_probe_protocol::DEFAULT_PORT;
use tracing::warn;

/// Environment variable overriding [`ProbeConfig::idle_timeout`], in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "SEEDLINK_PROBE_TIMEOUT_MS";
/// Environment variable overriding [`ProbeConfig::cache_ttl`], in milliseconds.
pub const ENV_CACHE_TTL_MS: &str = "SEEDLINK_PROBE_CACHE_TTL_MS";
/// Environment variable overriding [`ProbeConfig::max_concurrent_probes`].
pub const ENV_MAX_CONCURRENT: &str = "SEEDLINK_PROBE_MAX_CONCURRENT";

/// Configuration for probing and caching.
#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// Inactivity allowed during a whole exchange, connect included. Default: 10 seconds.
    pub idle_timeout: Duration,
    /// How long a successful result is served from cache. Default: 5 minutes.
    pub cache_ttl: Duration,
    /// Port used when a token has none. Default: 18000.
    pub default_port: u16,
    /// Sessions allowed in flight per query. Default: 1 (strictly sequential).
    pub max_concurrent_probes: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
            default_port: DEFAULT_PORT,
            max_concurrent_probes: 1,
        }
    }
}

impl ProbeConfig {
    /// Defaults overridden by `SEEDLINK_PROBE_*` environment variables.
    ///
    /// Unset or unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(ms) = parse_var(&lookup, ENV_TIMEOUT_MS) {
            config.idle_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, ENV_CACHE_TTL_MS) {
            config.cache_ttl = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var(&lookup, ENV_MAX_CONCURRENT) {
            config.max_concurrent_probes = usize::try_from(n).unwrap_or(usize::MAX).max(1);
        }
        config
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().replace('_', "").parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(name, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.idle_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.default_port, 18000);
        assert_eq!(config.max_concurrent_probes, 1);
    }

    #[test]
    fn overrides_from_lookup() {
        let config = ProbeConfig::from_lookup(lookup(&[
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_CACHE_TTL_MS, "60_000"),
            (ENV_MAX_CONCURRENT, "8"),
        ]));
        assert_eq!(config.idle_timeout, Duration::from_millis(2500));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.max_concurrent_probes, 8);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = ProbeConfig::from_lookup(lookup(&[
            (ENV_TIMEOUT_MS, "soon"),
            (ENV_MAX_CONCURRENT, "0"),
        ]));
        assert_eq!(config.idle_timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent_probes, 1);
    }
}
