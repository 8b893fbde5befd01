//! Batch configuration.
//!
//! Settings are layered, each layer overriding the one before it:
//!
//! ```text
//! stock defaults  →  photo-strip.toml  →  CLI flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_dir = "samples"     # Directory of photos to process
//! output_dir = "output"     # Where processed photos are written (must exist)
//! max_width = 1024          # Bounding box width in pixels, 0 = unconstrained
//! max_height = 1024         # Bounding box height in pixels, 0 = unconstrained
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::Bounds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "photo-strip.toml";

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Directory whose entries are processed.
    pub input_dir: PathBuf,
    /// Directory processed files are written to, under their source filename.
    pub output_dir: PathBuf,
    /// Maximum output width in pixels. `0` leaves width unconstrained.
    pub max_width: u32,
    /// Maximum output height in pixels. `0` leaves height unconstrained.
    pub max_height: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("samples"),
            output_dir: PathBuf::from("output"),
            max_width: 1024,
            max_height: 1024,
        }
    }
}

impl BatchConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "input_dir must not be empty".into(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        if self.input_dir == self.output_dir {
            return Err(ConfigError::Validation(
                "output_dir must differ from input_dir (sources would be overwritten)".into(),
            ));
        }
        Ok(())
    }

    /// The bounding box, with `0` mapped to "unconstrained".
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.max_width, self.max_height)
    }
}

/// Values given on the command line. `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl Overrides {
    /// Convert to a sparse TOML table containing only the set values.
    pub fn to_toml(&self) -> toml::Value {
        let mut table = toml::map::Map::new();
        if let Some(dir) = &self.input_dir {
            table.insert(
                "input_dir".into(),
                toml::Value::String(dir.to_string_lossy().into_owned()),
            );
        }
        if let Some(dir) = &self.output_dir {
            table.insert(
                "output_dir".into(),
                toml::Value::String(dir.to_string_lossy().into_owned()),
            );
        }
        if let Some(width) = self.max_width {
            table.insert("max_width".into(), toml::Value::Integer(i64::from(width)));
        }
        if let Some(height) = self.max_height {
            table.insert("max_height".into(), toml::Value::Integer(i64::from(height)));
        }
        toml::Value::Table(table)
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(BatchConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = Option<toml::Value>>,
) -> Result<BatchConfig, ConfigError> {
    let merged = overlays.into_iter().flatten().fold(base, merge_toml);
    let config: BatchConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path` (if present) and apply CLI overrides on top.
pub fn load_config(path: &Path, overrides: &Overrides) -> Result<BatchConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let file = load_raw_config(path)?;
    resolve_config(base, [file, Some(overrides.to_toml())])
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-strip configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--input, --output, --max-width, --max-height)
# override the values in this file.
# Unknown keys will cause an error.

# Directory of photos to process. Every entry is tried; files that
# cannot be decoded as images are skipped.
input_dir = "samples"

# Directory processed photos are written to, using the source filename.
# It must already exist.
output_dir = "output"

# ---------------------------------------------------------------------------
# Bounding box
# ---------------------------------------------------------------------------
# Larger photos are downsized (Lanczos3) to fit, keeping their aspect ratio.
# Smaller photos are never enlarged. 0 means unconstrained on that axis.
max_width = 1024
max_height = 1024
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = BatchConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("samples"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.max_width, 1024);
        assert_eq!(config.max_height, 1024);
    }

    #[test]
    fn default_bounds_are_1024_square() {
        assert_eq!(BatchConfig::default().bounds(), Bounds::new(1024, 1024));
    }

    #[test]
    fn zero_dimension_is_unconstrained() {
        let config = BatchConfig {
            max_width: 0,
            ..BatchConfig::default()
        };
        assert_eq!(config.bounds().max_width, None);
        assert_eq!(config.bounds().max_height, Some(1024));
    }

    #[test]
    fn parse_partial_config() {
        let config: BatchConfig = toml::from_str("max_width = 640").unwrap();
        assert_eq!(config.max_width, 640);
        // Unspecified defaults preserved
        assert_eq!(config.max_height, 1024);
        assert_eq!(config.input_dir, PathBuf::from("samples"));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: BatchConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, BatchConfig::default());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("missing.toml"), &Overrides::default()).unwrap();
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"
input_dir = "camera"
max_height = 0
"#,
        )
        .unwrap();

        let config = load_config(&path, &Overrides::default()).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("camera"));
        assert_eq!(config.max_height, 0);
        // Unspecified values should be defaults
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.max_width, 1024);
    }

    #[test]
    fn overrides_win_over_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "max_width = 640\nmax_height = 480\n").unwrap();

        let overrides = Overrides {
            output_dir: Some(PathBuf::from("web")),
            max_width: Some(2048),
            ..Overrides::default()
        };
        let config = load_config(&path, &overrides).unwrap();
        assert_eq!(config.max_width, 2048);
        assert_eq!(config.max_height, 480);
        assert_eq!(config.output_dir, PathBuf::from("web"));
    }

    #[test]
    fn empty_overrides_are_empty_table() {
        let value = Overrides::default().to_toml();
        assert!(value.as_table().unwrap().is_empty());
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(&path, &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("max_width = 1024\nmax_height = 1024").unwrap();
        let overlay: toml::Value = toml::from_str("max_width = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("max_width").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("max_height").unwrap().as_integer(), Some(1024));
    }

    #[test]
    fn resolve_skips_missing_layers() {
        let base = stock_defaults_value().unwrap();
        let config = resolve_config(base, [None, None]).unwrap();
        assert_eq!(config, BatchConfig::default());
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<BatchConfig, _> = toml::from_str("max_widht = 800");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "quality = 90\n").unwrap();

        let result = load_config(&path, &Overrides::default());
        assert!(result.is_err());
    }

    #[test]
    fn negative_dimension_rejected() {
        let result: Result<BatchConfig, _> = toml::from_str("max_width = -1");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(BatchConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_same_input_and_output_rejected() {
        let config = BatchConfig {
            input_dir: PathBuf::from("photos"),
            output_dir: PathBuf::from("photos"),
            ..BatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_empty_dirs_rejected() {
        let config = BatchConfig {
            input_dir: PathBuf::new(),
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BatchConfig {
            output_dir: PathBuf::new(),
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "input_dir = \"same\"\noutput_dir = \"same\"\n").unwrap();

        let result = load_config(&path, &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
