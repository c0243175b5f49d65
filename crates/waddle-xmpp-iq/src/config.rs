//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::parser::DEFAULT_MAX_DEPTH;

/// Settings for an [`IqCodec`](crate::IqCodec).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Namespace the encoder assumes is already in scope (e.g.
    /// `jabber:client` inside a client stream). Empty for standalone stanzas.
    pub default_namespace: String,
    /// Keep the inner markup of decoded IQs in `Iq::raw_xml`
    pub capture_raw: bool,
    /// Maximum element nesting accepted while decoding. Values above
    /// [`MAX_DEPTH_LIMIT`](crate::parser::MAX_DEPTH_LIMIT) are clamped.
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_namespace: String::new(),
            capture_raw: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.default_namespace, "");
        assert!(config.capture_raw);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CodecConfig = toml::from_str("default_namespace = \"jabber:client\"").unwrap();
        assert_eq!(config.default_namespace, "jabber:client");
        assert!(config.capture_raw);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_config_serialization() {
        let config = CodecConfig {
            max_depth: 8,
            ..Default::default()
        };
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: CodecConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }
}
