//! Configuration loader for the Vitrine server.
//!
//! Reads a TOML file into [`ServerConfig`], falling back to defaults when the
//! file is missing or malformed. A bad config file never prevents startup.

use std::path::Path;

use vitrine_types::config::ServerConfig;

/// Config file consulted when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "vitrine.toml";

/// Load server configuration from `path`, or `./vitrine.toml` when `None`.
///
/// - If the file does not exist, returns [`ServerConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(path: Option<&Path>) -> ServerConfig {
    let config_path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return ServerConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return ServerConfig::default();
        }
    };

    match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(Some(&tmp.path().join("absent.toml"))).await;
        assert_eq!(config.bind_addr, "127.0.0.1:8470");
        assert_eq!(config.idle_timeout_secs, 1800);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("vitrine.toml");
        tokio::fs::write(
            &config_path,
            r#"
bind_addr = "0.0.0.0:9000"
idle_timeout_secs = 300
"#,
        )
        .await
        .unwrap();

        let config = load_config(Some(&config_path)).await;
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.idle_timeout_secs, 300);
        assert_eq!(config.sweep_interval_secs, 60);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("vitrine.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(Some(&config_path)).await;
        assert_eq!(config.bind_addr, "127.0.0.1:8470");
    }
}
