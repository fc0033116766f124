//! Engine configuration (sigforge.toml)
//!
//! ```toml
//! bracket_depth = 3
//! strict = false
//! optional_returns = ["core.Object.find"]
//!
//! [aliases]
//! qreal = "double"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sigforge_parser::DEFAULT_BRACKET_DEPTH;

use crate::error::ConfigError;

/// Deepest bracket nesting a configuration may ask for.
pub const MAX_BRACKET_DEPTH: usize = 16;

/// Engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum bracket nesting inside an argument list
    #[serde(default = "default_bracket_depth")]
    pub bracket_depth: usize,

    /// Fully qualified functions whose result may be `None`
    #[serde(default)]
    pub optional_returns: Vec<String>,

    /// Native token -> native token it resolves like
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Report resolution misses as errors instead of warnings
    #[serde(default)]
    pub strict: bool,
}

fn default_bracket_depth() -> usize {
    DEFAULT_BRACKET_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bracket_depth: default_bracket_depth(),
            optional_returns: Vec::new(),
            aliases: BTreeMap::new(),
            strict: false,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse a configuration from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bracket_depth == 0 || self.bracket_depth > MAX_BRACKET_DEPTH {
            return Err(ConfigError::Validation(format!(
                "bracket_depth must be between 1 and {}, got {}",
                MAX_BRACKET_DEPTH, self.bracket_depth
            )));
        }

        for name in &self.optional_returns {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "optional_returns entries cannot be empty".to_string(),
                ));
            }
        }

        for (token, target) in &self.aliases {
            if token.trim().is_empty() || target.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Alias '{}' -> '{}' has an empty side",
                    token, target
                )));
            }
            if token == target {
                return Err(ConfigError::Validation(format!(
                    "Alias '{}' points to itself",
                    token
                )));
            }
        }

        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        let config = EngineConfig::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.bracket_depth, 3);
    }

    #[test]
    fn test_full_config() {
        let config = EngineConfig::from_str(
            r#"
bracket_depth = 4
strict = true
optional_returns = ["core.Object.find"]

[aliases]
qreal = "double"
"#,
        )
        .unwrap();
        assert_eq!(config.bracket_depth, 4);
        assert!(config.strict);
        assert_eq!(config.optional_returns, vec!["core.Object.find"]);
        assert_eq!(config.aliases.get("qreal").map(String::as_str), Some("double"));
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = EngineConfig::from_str("bracket_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_self_alias() {
        let err = EngineConfig::from_str("[aliases]\nint = \"int\"").unwrap_err();
        assert!(err.to_string().contains("points to itself"));
    }

    #[test]
    fn test_rejects_unknown_key() {
        let err = EngineConfig::from_str("colour = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = EngineConfig::default();
        config.aliases.insert("qreal".into(), "double".into());
        let text = config.to_toml().unwrap();
        assert_eq!(EngineConfig::from_str(&text).unwrap(), config);
    }
}
