//! Configuration file handling.
//!
//! A TOML file with optional `[reference]`, `[comtrade]`, `[server]` and
//! `[resolution]` sections. Every field has a default, so an empty file (or
//! no file) is a valid configuration.

use cbam_api::ServerConfig;
use cbam_comtrade::ComtradeConfig;
use cbam_core::{Error, ReferenceConfig, ResolutionConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for the `cbam` binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CbamConfig {
    /// Reference data location.
    pub reference: ReferenceConfig,
    /// Trade API endpoint and key.
    pub comtrade: ComtradeConfig,
    /// HTTP listener.
    pub server: ServerConfig,
    /// Country alias and EU membership overrides.
    pub resolution: ResolutionConfig,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Reference data directory.
    pub emissions: Option<PathBuf>,
    /// Trade API subscription key.
    pub api_key: Option<String>,
    /// Listener interface.
    pub host: Option<String>,
    /// Listener port.
    pub port: Option<u16>,
}

impl CbamConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply command-line and environment values on top of the file.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(path) = overrides.emissions {
            self.reference.path = path;
        }
        if let Some(key) = overrides.api_key.filter(|k| !k.trim().is_empty()) {
            self.comtrade.api_key = Some(key);
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_path_is_default() {
        let config = CbamConfig::load(None).unwrap();
        assert_eq!(config.server.port, 5099);
        assert_eq!(config.reference.path, PathBuf::from("data/emissions"));
        assert!(config.comtrade.api_key.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[reference]
path = "/srv/cbam/reference"

[comtrade]
api_key = "abc123"

[resolution]
aliases = {{ "Viet Nam" = "Vietnam" }}
"#
        )
        .unwrap();

        let config = CbamConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.reference.path, PathBuf::from("/srv/cbam/reference"));
        assert_eq!(config.reference.factors_sheet, "Sheet1.csv");
        assert_eq!(config.comtrade.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.server.host, "127.0.0.1");
        let aliases = config.resolution.aliases.unwrap();
        assert_eq!(aliases["Viet Nam"], "Vietnam");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CbamConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a port\"").unwrap();
        let err = CbamConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_overrides_win() {
        let config = CbamConfig::default().apply(Overrides {
            emissions: Some(PathBuf::from("fixtures")),
            api_key: Some("key".to_string()),
            host: Some("0.0.0.0".to_string()),
            port: Some(8000),
        });
        assert_eq!(config.reference.path, PathBuf::from("fixtures"));
        assert_eq!(config.comtrade.api_key.as_deref(), Some("key"));
        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = CbamConfig::default().apply(Overrides {
            api_key: Some("  ".to_string()),
            ..Overrides::default()
        });
        assert!(config.comtrade.api_key.is_none());
    }
}
