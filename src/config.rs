//! Scan configuration.
//!
//! Handles loading, validating, and merging the optional `mdseries.toml` file.
//! Stock defaults are overridden by the file, and the file is overridden by
//! command-line flags:
//!
//! ```text
//! stock defaults  →  content/mdseries.toml  →  --variant-suffix / --ext / --concurrency
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! variant_suffix = "_CN"          # Filename marker of the translated variant
//! extensions = ["md"]             # Recognized document extensions
//! ignore = ["target", "node_modules"]  # Names skipped while walking
//! report_orphans = true           # List documents nothing links to
//!
//! [processing]
//! max_threads = 4                 # Max parallel file readers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the content root.
pub const CONFIG_FILE_NAME: &str = "mdseries.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Scan configuration loaded from `mdseries.toml`.
///
/// All fields have defaults; a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Suffix on the file stem marking the translated variant.
    pub variant_suffix: String,
    /// File extensions (without dot, case-insensitive) treated as documents.
    pub extensions: Vec<String>,
    /// File or directory names skipped during the walk.
    pub ignore: Vec<String>,
    /// Whether the report lists documents with no inbound links.
    pub report_orphans: bool,
    /// Parallel file-reading settings.
    pub processing: ProcessingConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            variant_suffix: "_CN".to_string(),
            extensions: vec!["md".to_string()],
            ignore: vec!["target".to_string(), "node_modules".to_string()],
            report_orphans: true,
            processing: ProcessingConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.variant_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "variant_suffix must not be empty".into(),
            ));
        }
        if self.variant_suffix.contains('/') {
            return Err(ConfigError::Validation(
                "variant_suffix must not contain '/'".into(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if self.extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
            return Err(ConfigError::Validation(
                "extensions must not contain empty entries".into(),
            ));
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Whether `ext` (no leading dot) is one of the configured extensions.
    pub fn is_document_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    /// Apply command-line overrides on top of file values, then re-validate.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self, ConfigError> {
        if let Some(suffix) = &overrides.variant_suffix {
            self.variant_suffix = suffix.clone();
        }
        if !overrides.extensions.is_empty() {
            self.extensions = overrides.extensions.clone();
        }
        if let Some(n) = overrides.concurrency {
            self.processing.max_threads = Some(n);
        }
        if overrides.no_orphans {
            self.report_orphans = false;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Values given on the command line. `None`/empty means "keep the file value".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub variant_suffix: Option<String>,
    pub extensions: Vec<String>,
    pub concurrency: Option<usize>,
    pub no_orphans: bool,
}

/// Parallel file-reading settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel file readers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ScanConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ScanConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ScanConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the scan config for a content root.
///
/// An explicit `config_file` must exist; otherwise `mdseries.toml` in `root`
/// is used when present and stock defaults when not.
pub fn load_config(root: &Path, config_file: Option<&Path>) -> Result<ScanConfig, ConfigError> {
    let overlay = match config_file {
        Some(path) => Some(toml::from_str(&fs::read_to_string(path)?)?),
        None => load_raw_config(&root.join(CONFIG_FILE_NAME))?,
    };
    resolve_config(stock_defaults_value()?, overlay)
}

/// Returns a fully-commented stock `mdseries.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mdseries Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the content root as mdseries.toml, or pass --config.
# Command-line flags override values set here.
# Unknown keys will cause an error.

# Suffix on the file stem that marks the translated variant:
#   01_Adapter.md / 01_Adapter_CN.md
variant_suffix = "_CN"

# Extensions (without dot) of files treated as documents.
extensions = ["md"]

# File and directory names skipped while walking. Hidden entries
# (leading '.') are always skipped.
ignore = ["target", "node_modules"]

# List documents that no other document links to.
report_orphans = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel file readers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}
