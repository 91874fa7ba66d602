//! Global configuration for the bridge, deserialized from `config.toml`.

use serde::{Deserialize, Serialize};

/// Default background refresh period in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;

/// Default timeout for a single store request in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Bridge-wide configuration.
///
/// Every field has a default so a missing or partial `config.toml` still
/// yields a working configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base URL of the upstream conversation-bridge service.
    pub store_base_url: String,
    /// Background refresh period in milliseconds.
    pub poll_interval_ms: u64,
    /// Per-request timeout toward the store in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            store_base_url: "http://127.0.0.1:5100".to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.poll_interval_ms, 3_000);
        assert_eq!(config.request_timeout_ms, 10_000);
        assert!(config.store_base_url.starts_with("http://"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: BridgeConfig = toml::from_str("poll_interval_ms = 500").unwrap();
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.store_base_url, BridgeConfig::default().store_base_url);
    }

    #[test]
    fn test_full_toml() {
        let config: BridgeConfig = toml::from_str(
            r#"
store_base_url = "http://bridge.local:9000"
poll_interval_ms = 1000
request_timeout_ms = 2000
"#,
        )
        .unwrap();
        assert_eq!(config.store_base_url, "http://bridge.local:9000");
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.request_timeout_ms, 2000);
    }
}
