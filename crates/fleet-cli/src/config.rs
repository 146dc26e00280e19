//! CLI configuration

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Endpoint used when neither flags nor config name one
pub const DEFAULT_ENDPOINT: &str = "https://api.fleet.dev";

/// Request timeout used when the config does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Management API endpoint
    pub endpoint: Option<String>,

    /// API token
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    /// Flag/env value wins over the file, which wins over the default
    pub fn resolve_endpoint(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn resolve_token(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| self.token.clone())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("fleet").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.endpoint.is_none());
        assert!(config.token.is_none());
        assert_eq!(config.timeout().as_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_missing_config() {
        // Should return default config when file doesn't exist
        let config = CliConfig::load(Some("/nonexistent/path/config.toml")).unwrap();
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "endpoint = \"http://localhost:9000\"\ntoken = \"abc\"\ntimeout_seconds = 5"
        )
        .unwrap();

        let config = CliConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout().as_secs(), 5);
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = [").unwrap();

        let err = CliConfig::load(file.path().to_str()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_resolution_precedence() {
        let config = CliConfig {
            endpoint: Some("http://from-file".into()),
            token: Some("file-token".into()),
            timeout_seconds: None,
        };
        assert_eq!(config.resolve_endpoint(Some("http://from-flag")), "http://from-flag");
        assert_eq!(config.resolve_endpoint(None), "http://from-file");
        assert_eq!(CliConfig::default().resolve_endpoint(None), DEFAULT_ENDPOINT);

        assert_eq!(config.resolve_token(Some("flag-token")).as_deref(), Some("flag-token"));
        assert_eq!(config.resolve_token(None).as_deref(), Some("file-token"));
        assert_eq!(CliConfig::default().resolve_token(Some("  ")), None);
    }
}
