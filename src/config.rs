//! Codec configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Every key is
//! optional: stock defaults are serialized to a TOML table, the user's file
//! is merged on top key-by-key, and the result is deserialized and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [encode]
//! defensive = true          # Named entities for Latin-1, typography, Greek, math
//! fallback = "decimal"      # decimal | hexadecimal | none
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [encode]
//! fallback = "hexadecimal"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::fallback::FallbackStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Codec configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Encoder settings.
    pub encode: EncodeConfig,
    /// Parallel batch settings.
    pub processing: ProcessingConfig,
}

impl CodecConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    /// Use named entities for non-syntax characters (`é` → `&eacute;`).
    /// When false those characters go through the fallback instead.
    pub defensive: bool,
    /// How to escape characters no table covers.
    pub fallback: FallbackStyle,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            defensive: true,
            fallback: FallbackStyle::Decimal,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of batch workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(CodecConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let merged = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge user values onto the stock defaults, deserialize, and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CodecConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CodecConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse a config from TOML text.
pub fn parse_config(content: &str) -> Result<CodecConfig, ConfigError> {
    let value: toml::Value = toml::from_str(content)?;
    resolve_config(Some(value))
}

/// Load config from a file.
///
/// A missing file is not an error: the stock defaults apply.
pub fn load_config(path: &Path) -> Result<CodecConfig, ConfigError> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# jukebox-html Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encode]
# Use named entities (&eacute;, &euro;, &mdash;, &alpha;) for characters
# that are not markup syntax. When false, those characters are escaped by
# the fallback instead. &, <, > and " are always escaped.
defensive = true

# Escape for characters at or above U+00A0 that have no named entity:
#   "decimal"      -> &#333;
#   "hexadecimal"  -> &#x14D;
#   "none"         -> left as literal text
fallback = "decimal"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch encoding/decoding.
# Omit to use all available CPU cores. Values above the core count are
# clamped down.
# max_processes = 4
"##
}
