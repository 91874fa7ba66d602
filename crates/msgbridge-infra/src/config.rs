//! Configuration loader for msgbridge.
//!
//! Reads a `config.toml` and deserializes it into [`BridgeConfig`].
//! Falls back to defaults when the file is missing or malformed, so the
//! bridge always starts with a usable configuration.

use std::path::Path;

use msgbridge_types::config::BridgeConfig;

/// Load bridge configuration from a TOML file.
///
/// - If the file does not exist, returns [`BridgeConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns
///   the default.
/// - Missing fields in a valid file take their default values.
pub async fn load_bridge_config(path: &Path) -> BridgeConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return BridgeConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return BridgeConfig::default();
        }
    };

    match toml::from_str::<BridgeConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            BridgeConfig::default()
        }
    }
}
