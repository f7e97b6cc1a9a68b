//! Client configuration.

use std::time::Duration;

use tracing::warn;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/simulate";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "TWINDEX_ENDPOINT";

/// Environment variable overriding the timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "TWINDEX_TIMEOUT_SECS";

/// Where and how the simulation request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Full URL of the simulate endpoint.
    pub endpoint: String,
    /// Whole-request timeout. Expiry surfaces as a network failure.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("twindex/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Defaults with [`ENDPOINT_ENV`] and [`TIMEOUT_ENV`] applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by variable name.
    ///
    /// Blank values are ignored. A timeout that is not a positive integer is
    /// ignored with a warning.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(ENDPOINT_ENV)
            && !endpoint.trim().is_empty()
        {
            self.endpoint = endpoint.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV)
            && !raw.trim().is_empty()
        {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout = Duration::from_secs(secs),
                _ => warn!(
                    "Ignoring {}={:?}: expected a positive number of seconds",
                    TIMEOUT_ENV, raw
                ),
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:8000/simulate");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.user_agent.starts_with("twindex/"));
    }

    #[test]
    fn builders_override_fields() {
        let config = ClientConfig::default()
            .with_endpoint("http://example.test/sim")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("probe/1");
        assert_eq!(config.endpoint, "http://example.test/sim");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "probe/1");
    }

    #[test]
    fn overrides_apply_endpoint_and_timeout() {
        let config = ClientConfig::default().with_overrides(lookup_from(&[
            (ENDPOINT_ENV, " http://10.0.0.2:9000/simulate "),
            (TIMEOUT_ENV, "30"),
        ]));
        assert_eq!(config.endpoint, "http://10.0.0.2:9000/simulate");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_or_blank_overrides_keep_defaults() {
        let config = ClientConfig::default().with_overrides(lookup_from(&[(ENDPOINT_ENV, "  ")]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn invalid_timeout_is_ignored() {
        for bad in ["soon", "-3", "0", "1.5"] {
            let config =
                ClientConfig::default().with_overrides(lookup_from(&[(TIMEOUT_ENV, bad)]));
            assert_eq!(config.timeout, DEFAULT_TIMEOUT, "value {bad:?}");
        }
    }
}
