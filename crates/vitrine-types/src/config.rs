//! Server configuration types for Vitrine.
//!
//! `ServerConfig` represents the top-level `vitrine.toml` that controls the
//! bind address, session expiry, and update channel sizing.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Vitrine session hub.
///
/// Loaded from `vitrine.toml` (or a path given via `--config`). All fields
/// have sensible defaults, so an empty or missing file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP/WS server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Seconds of inactivity after which a session is destroyed.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Seconds between idle-sweep passes.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Capacity of the broadcast channel carrying re-render updates.
    #[serde(default = "default_update_capacity")]
    pub update_capacity: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8470".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    1800
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_update_capacity() -> usize {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            update_capacity: default_update_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default_values() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8470");
        assert_eq!(config.idle_timeout_secs, 1800);
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.update_capacity, 256);
    }

    #[test]
    fn test_server_config_deserialize_empty() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8470");
        assert_eq!(config.idle_timeout_secs, 1800);
    }

    #[test]
    fn test_server_config_deserialize_partial() {
        let config: ServerConfig = toml::from_str(
            r#"
bind_addr = "0.0.0.0:9000"
idle_timeout_secs = 120
"#,
        )
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.idle_timeout_secs, 120);
        // Untouched fields keep their defaults
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.update_capacity, 256);
    }
}
