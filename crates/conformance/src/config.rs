//! Suite configuration via `conformance.toml`
//!
//! Every field is optional; a missing file or an empty file yields the
//! canonical literals the scenarios were written against.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "conformance.toml";

/// Errors raised while loading or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("failed to access config file '{path}': {source}")]
    Io {
        /// Offending path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid TOML for this config
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Values parsed but are inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Parameters of a conformance run
///
/// # Example
///
/// ```toml
/// table = "test"
/// field = "a"
/// key_width = 5
/// scan_records = 100
/// scan_start = 50
/// scan_count = 5
/// extended = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceConfig {
    /// Table every scenario writes to
    #[serde(default = "default_table")]
    pub table: String,
    /// Field name carrying the test bytes
    #[serde(default = "default_field")]
    pub field: String,
    /// Width of zero-padded scan keys
    #[serde(default = "default_key_width")]
    pub key_width: usize,
    /// Records inserted by the scan scenario
    #[serde(default = "default_scan_records")]
    pub scan_records: u32,
    /// Index the scan starts from
    #[serde(default = "default_scan_start")]
    pub scan_start: u32,
    /// Records requested by the scan
    #[serde(default = "default_scan_count")]
    pub scan_count: u32,
    /// Run the extended scenarios after the canonical three
    #[serde(default = "default_extended")]
    pub extended: bool,
}

fn default_table() -> String {
    "test".to_string()
}

fn default_field() -> String {
    "a".to_string()
}

fn default_key_width() -> usize {
    5
}

fn default_scan_records() -> u32 {
    100
}

fn default_scan_start() -> u32 {
    50
}

fn default_scan_count() -> u32 {
    5
}

fn default_extended() -> bool {
    true
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            field: default_field(),
            key_width: default_key_width(),
            scan_records: default_scan_records(),
            scan_start: default_scan_start(),
            scan_count: default_scan_count(),
            extended: default_extended(),
        }
    }
}

impl ConformanceConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# kvharness conformance configuration
#
# Table and field the scenarios write to
table = "test"
field = "a"

# Scan scenario: insert `scan_records` keys zero-padded to `key_width`
# digits, then scan `scan_count` records starting at index `scan_start`.
key_width = 5
scan_records = 100
scan_start = 50
scan_count = 5

# Run read_missing, scan_edges and update_missing after the canonical
# scenarios (default: true)
extended = true
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ConformanceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::io(path, e))?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }

    /// Check that the values describe a runnable suite.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table.is_empty() {
            return Err(ConfigError::Invalid("table must not be empty".into()));
        }
        if self.field.is_empty() {
            return Err(ConfigError::Invalid("field must not be empty".into()));
        }
        if self.key_width == 0 {
            return Err(ConfigError::Invalid("key_width must be at least 1".into()));
        }
        if self.scan_count == 0 {
            return Err(ConfigError::Invalid("scan_count must be at least 1".into()));
        }
        let end = u64::from(self.scan_start) + u64::from(self.scan_count);
        if end > u64::from(self.scan_records) {
            return Err(ConfigError::Invalid(format!(
                "scan window {}..{} exceeds scan_records {}",
                self.scan_start, end, self.scan_records
            )));
        }
        // Wider indices would sort out of numeric order
        let widest = self.scan_records.saturating_sub(1).to_string().len();
        if widest > self.key_width {
            return Err(ConfigError::Invalid(format!(
                "key_width {} cannot hold index {}",
                self.key_width,
                self.scan_records - 1
            )));
        }
        Ok(())
    }
}
