// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 Waddle Social

//! Configuration management for the IQ inspection tool.
//!
//! Configuration is read from `--config <path>` when given, otherwise from
//! the XDG config directory (`~/.config/waddle/iq.toml`). A missing default
//! file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use waddle_xmpp_iq::CodecConfig;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is not set
    pub filter: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn,waddle_xmpp_iq=info".into(),
            json: false,
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Codec configuration
    pub codec: CodecConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from `path`, or from the XDG config directory when
    /// no path is given.
    ///
    /// Returns the configuration and the file it came from, if any.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = path {
            return Ok((Self::load_from(path)?, Some(path.to_path_buf())));
        }

        match Self::config_file_path() {
            Some(path) if path.exists() => Ok((Self::load_from(&path)?, Some(path))),
            _ => Ok((Config::default(), None)),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Get the path to the default config file
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("waddle").join("iq.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.codec.capture_raw);
        assert_eq!(config.codec.max_depth, 64);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[codec]\ndefault_namespace = \"jabber:client\"\nmax_depth = 16\n\n[logging]\njson = true"
        )
        .unwrap();

        let (config, source) = Config::load(Some(file.path())).unwrap();

        assert_eq!(source.as_deref(), Some(file.path()));
        assert_eq!(config.codec.default_namespace, "jabber:client");
        assert_eq!(config.codec.max_depth, 16);
        assert!(config.codec.capture_raw);
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, LoggingConfig::default().filter);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(Config::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[codec\nmax_depth = ").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }
}
