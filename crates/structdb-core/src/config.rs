//! Runtime configuration loaded from TOML.
//!
//! Every key has a default; an empty document yields `StoreConfig::default()`.
//! Unknown keys are rejected so typos do not silently fall back to defaults.

use crate::{
    DEFAULT_BULK_ESCALATION_THRESHOLD, DEFAULT_EXACT_MATCH_CAST_WIDTH, error::InternalError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

///
/// StoreConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub insert: InsertConfig,
    pub query: QueryConfig,
}

impl StoreConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.insert.bulk_escalation_threshold == 0 {
            return Err(ConfigError::Invalid {
                key: "insert.bulk_escalation_threshold",
                message: "must be at least 1".to_string(),
            });
        }
        if self.query.exact_match_cast_width == 0 {
            return Err(ConfigError::Invalid {
                key: "query.exact_match_cast_width",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

///
/// InsertConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InsertConfig {
    /// Advisory batch size for callers choosing between repeated single
    /// calls and one bulk call. Not consulted by the orchestrator itself.
    pub bulk_escalation_threshold: usize,
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self {
            bulk_escalation_threshold: DEFAULT_BULK_ESCALATION_THRESHOLD,
        }
    }
}

///
/// QueryConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    /// Byte width of the binary cast applied by exact string equality.
    pub exact_match_cast_width: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            exact_match_cast_width: DEFAULT_EXACT_MATCH_CAST_WIDTH,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn empty_document_yields_defaults() {
        let config = StoreConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.insert.bulk_escalation_threshold, 10);
        assert_eq!(config.query.exact_match_cast_width, 300);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = StoreConfig::from_toml_str("[insert]\nbulk_escalation_threshold = 250\n")
            .expect("partial config should parse");

        assert_eq!(config.insert.bulk_escalation_threshold, 250);
        assert_eq!(config.query, QueryConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = StoreConfig::from_toml_str("[insert]\nbatch_threshold = 5\n")
            .expect_err("unknown key should be rejected");

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_cast_width_is_invalid() {
        let err = StoreConfig::from_toml_str("[query]\nexact_match_cast_width = 0\n")
            .expect_err("zero width should be rejected");

        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "query.exact_match_cast_width",
                ..
            }
        ));
    }

    #[test]
    fn config_errors_map_to_configuration_class() {
        let err: InternalError =
            StoreConfig::from_toml_str("[insert]\nbulk_escalation_threshold = 0\n")
                .expect_err("zero threshold should be rejected")
                .into();

        assert_eq!(err.class, ErrorClass::Configuration);
    }
}
