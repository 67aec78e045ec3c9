//! YAML configuration for preset matching and search.
//!
//! Lets deployments keep matcher and search defaults in one file instead of
//! hard-coding them. The loaded [`PresetsConfig`] converts into the runtime
//! [`MatcherConfig`] and [`SearchConfig`] structs.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "osm-presets"
//!
//! matcher:
//!   include_supplemental: true
//!   parallel_threshold: 2048
//!
//! search:
//!   default_country: "us"
//!   require_searchable: true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::MatcherConfig;
use crate::search::SearchConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PresetsConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub matcher: MatcherYamlConfig,

    #[serde(default)]
    pub search: SearchYamlConfig,
}

impl PresetsConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PresetsConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.matcher.validate()?;
        self.search.validate()?;
        Ok(())
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            parallel_threshold: self.matcher.parallel_threshold,
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            default_country: self.search.default_country.clone(),
            require_searchable: self.search.require_searchable,
        }
    }
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            matcher: MatcherYamlConfig::default(),
            search: SearchYamlConfig::default(),
        }
    }
}

/// Matcher YAML configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherYamlConfig {
    /// Score brand presets alongside the primary ones.
    #[serde(default = "true_value")]
    pub include_supplemental: bool,

    #[serde(default = "MatcherConfig::default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl MatcherYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.parallel_threshold == 0 {
            return Err(ConfigLoadError::Validation(
                "matcher.parallel_threshold must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherYamlConfig {
    fn default() -> Self {
        Self {
            include_supplemental: true,
            parallel_threshold: MatcherConfig::default_parallel_threshold(),
        }
    }
}

/// Search YAML configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchYamlConfig {
    #[serde(default)]
    pub default_country: Option<String>,

    #[serde(default = "SearchConfig::default_require_searchable")]
    pub require_searchable: bool,
}

impl SearchYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if let Some(code) = &self.default_country {
            let valid = !code.is_empty()
                && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
            if !valid {
                return Err(ConfigLoadError::Validation(format!(
                    "search.default_country `{code}` must be a non-empty region code"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SearchYamlConfig {
    fn default() -> Self {
        Self {
            default_country: None,
            require_searchable: SearchConfig::default_require_searchable(),
        }
    }
}

fn true_value() -> bool {
    true
}
