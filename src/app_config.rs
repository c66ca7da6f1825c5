use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;

use crate::merge::service::{DEFAULT_CREDIT_LINE, DEFAULT_CREDIT_MARKER};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Primary language code (ISO), the track whose credits are filtered
    #[serde(default = "default_primary_language")]
    pub primary_language: String,

    /// Secondary language code (ISO)
    #[serde(default = "default_secondary_language")]
    pub secondary_language: String,

    /// Merge pipeline settings
    #[serde(default)]
    pub merge: MergeConfig,

    /// Max transcript pairs merged concurrently in batch mode
    #[serde(default = "default_concurrent_merges")]
    pub concurrent_merges: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Merge pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MergeConfig {
    /// Substring identifying provider-credit cues in the primary track.
    /// An empty string disables the credit filter.
    #[serde(default = "default_credit_marker", alias = "subtitle_group_marker")]
    pub credit_marker: String,

    /// Text of the synthetic attribution block opening every output file
    #[serde(default = "default_credit_line")]
    pub credit_line: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            credit_marker: default_credit_marker(),
            credit_line: default_credit_line(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_primary_language() -> String {
    "zh".to_string()
}

fn default_secondary_language() -> String {
    "en".to_string()
}

fn default_credit_marker() -> String {
    DEFAULT_CREDIT_MARKER.to_string()
}

fn default_credit_line() -> String {
    DEFAULT_CREDIT_LINE.to_string()
}

fn default_concurrent_merges() -> usize {
    4
}

impl Config {
    /// Decode a configuration from JSON text.
    ///
    /// Accepts the legacy `merge.subtitle_group_marker` key as an alias of
    /// `merge.credit_marker` and warns when it is used.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).context("Failed to parse config JSON")?;

        if value
            .get("merge")
            .and_then(|merge| merge.get("subtitle_group_marker"))
            .is_some()
        {
            warn!(
                "Config key 'merge.subtitle_group_marker' is deprecated, rename it to 'merge.credit_marker'"
            );
        }

        serde_json::from_value(value).context("Failed to decode config")
    }

    /// Load a configuration file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to open config file: {:?}", path.as_ref()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        crate::language_utils::validate_language_code(&self.primary_language)
            .context("Invalid primary_language")?;
        crate::language_utils::validate_language_code(&self.secondary_language)
            .context("Invalid secondary_language")?;

        if crate::language_utils::language_codes_match(
            &self.primary_language,
            &self.secondary_language,
        ) {
            return Err(anyhow!(
                "Primary and secondary languages must differ, got '{}' and '{}'",
                self.primary_language,
                self.secondary_language
            ));
        }

        if self.concurrent_merges == 0 {
            return Err(anyhow!("concurrent_merges must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            primary_language: default_primary_language(),
            secondary_language: default_secondary_language(),
            merge: MergeConfig::default(),
            concurrent_merges: default_concurrent_merges(),
            log_level: LogLevel::default(),
        }
    }
}
