//! Encoder configuration

use serde::{Deserialize, Serialize};

use crate::AbiError;

/// Default bound on tuple/array nesting
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Deepest tuple/array nesting accepted in a signature
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    /// Register the `bool`, `bytesN`, `bytes` and `string` leaf codecs
    #[serde(default)]
    pub standard_leaf_types: bool,
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: default_max_nesting_depth(),
            standard_leaf_types: false,
        }
    }
}

impl EncoderConfig {
    /// Load from a TOML fragment; missing keys keep their defaults
    pub fn from_toml_str(s: &str) -> Result<Self, AbiError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a JSON object; missing keys keep their defaults
    pub fn from_json_str(s: &str) -> Result<Self, AbiError> {
        serde_json::from_str(s).map_err(|e| AbiError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncoderConfig::default();
        assert_eq!(config.max_nesting_depth, 32);
        assert!(!config.standard_leaf_types);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let config = EncoderConfig::from_toml_str("standard_leaf_types = true").unwrap();
        assert_eq!(config.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
        assert!(config.standard_leaf_types);

        let config = EncoderConfig::from_toml_str("max_nesting_depth = 4").unwrap();
        assert_eq!(config.max_nesting_depth, 4);
    }

    #[test]
    fn test_config_from_json() {
        let config = EncoderConfig::from_json_str(r#"{"max_nesting_depth": 8}"#).unwrap();
        assert_eq!(config.max_nesting_depth, 8);
        assert!(matches!(
            EncoderConfig::from_json_str("[1, 2]"),
            Err(AbiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_from_toml_bad_type() {
        assert!(matches!(
            EncoderConfig::from_toml_str("max_nesting_depth = \"deep\""),
            Err(AbiError::InvalidConfig(_))
        ));
    }
}
