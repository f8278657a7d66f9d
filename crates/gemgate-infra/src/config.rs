//! Configuration file loader for Gemgate.
//!
//! Reads an optional TOML file into [`ProxyConfig`]. Without a file the
//! defaults apply; a file that was named but cannot be read or parsed is an
//! error.

use std::path::Path;

use gemgate_types::config::ProxyConfig;
use gemgate_types::error::ConfigError;

/// Load configuration from `path`, or defaults when `path` is `None`.
pub async fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let Some(path) = path else {
        tracing::debug!("No config file given, using defaults");
        return Ok(ProxyConfig::default());
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let config = parse_config(&content, path)?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Parse TOML `content`; `origin` is only used in error messages.
pub fn parse_config(content: &str, origin: &Path) -> Result<ProxyConfig, ConfigError> {
    toml::from_str::<ProxyConfig>(content).map_err(|e| ConfigError::Parse {
        path: origin.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_without_path_returns_default() {
        let config = load_config(None).await.unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gemgate.toml");
        tokio::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 7000

[gemini]
base_url = "http://localhost:9999"

[timeouts]
download_secs = 5
"#,
        )
        .await
        .unwrap();

        let config = load_config(Some(&path)).await.unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.gemini.base_url, "http://localhost:9999");
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.timeouts.download_secs, 5);
        assert_eq!(config.timeouts.upload_secs, 120);
    }

    #[tokio::test]
    async fn load_config_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");

        let err = load_config(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[tokio::test]
    async fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gemgate.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn parse_config_rejects_wrong_types() {
        let err = parse_config("[server]\nport = \"high\"", Path::new("inline")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "inline"));
    }
}
