//! Converter settings.
//!
//! Handles loading, validating, and merging `convert.toml` files. Stock
//! defaults are the base layer; a user settings file overrides any subset of
//! keys, and command-line flags override both.
//!
//! ## Settings File Location
//!
//! `convert.toml` is read from the current directory, or from the path given
//! with `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! format = "jpeg"      # jpeg | png | webp | avif
//! quality = 90         # 0-100, ignored by png and webp
//! # max_width = 1920   # omit for no bound
//! # max_height = 1080  # omit for no bound
//!
//! [input]
//! recursive = false    # descend into subdirectories
//!
//! [delivery]
//! directory = "converted"
//! stagger_ms = 0       # pause between saved files
//! manifest = true      # write manifest.json next to the results
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{ConvertConfig, OutputFormat, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up when no explicit settings path is given.
pub const SETTINGS_FILENAME: &str = "convert.toml";

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

/// Converter settings loaded from `convert.toml`.
///
/// All fields have sensible defaults. User settings files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Target format, quality and bounds.
    pub output: OutputSettings,
    /// How input paths are collected.
    pub input: InputSettings,
    /// Where and how results are saved.
    pub delivery: DeliverySettings,
}

impl Settings {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.quality > 100 {
            return Err(ConfigError::Validation(
                "output.quality must be 0-100".into(),
            ));
        }
        if self.output.max_width == Some(0) {
            return Err(ConfigError::Validation(
                "output.max_width must be positive (omit it for no bound)".into(),
            ));
        }
        if self.output.max_height == Some(0) {
            return Err(ConfigError::Validation(
                "output.max_height must be positive (omit it for no bound)".into(),
            ));
        }
        if self.delivery.directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "delivery.directory must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The per-batch conversion config these settings describe.
    pub fn convert_config(&self) -> ConvertConfig {
        ConvertConfig::from_percent(
            self.output.format,
            self.output.quality,
            self.output.max_width,
            self.output.max_height,
        )
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Integer percentage, normalized to `[0, 1]` before encoding.
    pub quality: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: (Quality::default().value() * 100.0).round() as u32,
            max_width: None,
            max_height: None,
        }
    }
}

/// Input collection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputSettings {
    /// Walk into subdirectories of directory arguments.
    pub recursive: bool,
}

/// Result delivery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeliverySettings {
    /// Destination directory for converted files.
    pub directory: String,
    /// Milliseconds to wait between saved files.
    pub stagger_ms: u64,
    /// Write a `manifest.json` summary next to the results.
    pub manifest: bool,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            directory: "converted".to_string(),
            stagger_ms: 0,
            manifest: true,
        }
    }
}

// =============================================================================
// Settings loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(Settings::default())?)
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

/// Read a settings file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_settings(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_settings(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Settings, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: Settings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load `convert.toml` from the given directory, falling back to defaults.
pub fn load_settings(dir: &Path) -> Result<Settings, ConfigError> {
    let overlay = load_raw_settings(&dir.join(SETTINGS_FILENAME))?;
    resolve_settings(stock_defaults_value()?, overlay)
}

/// Load an explicitly named settings file. A missing file is an error.
pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_settings(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `convert.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-convert settings
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Target format: "jpeg", "png", "webp" or "avif".
format = "jpeg"

# Encoding quality (0 = worst, 100 = best).
# Only JPEG and AVIF use it; PNG and WebP output is lossless.
quality = 90

# Maximum output size in pixels. Images are shrunk to fit, keeping their
# aspect ratio, and never enlarged. Omit for no bound on that axis.
# max_width = 1920
# max_height = 1080

# ---------------------------------------------------------------------------
# Input
# ---------------------------------------------------------------------------
[input]
# Descend into subdirectories when a directory is given.
recursive = false

# ---------------------------------------------------------------------------
# Delivery
# ---------------------------------------------------------------------------
[delivery]
# Where converted files are written.
directory = "converted"

# Pause between saved files, in milliseconds.
stagger_ms = 0

# Write manifest.json (sizes, dimensions, compression) next to the results.
manifest = true
"##
}
