//! Conversion configuration
//!
//! Defaults reproduce the fixed layout Supercoder users expect: read every
//! file in `Input/`, write `Output/OUTPUT_<name>`, quantize at 29.97 fps and
//! treat `B` events as trial starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::types::FrameRate;

/// Default input directory, relative to the working directory
pub const DEFAULT_INPUT_DIR: &str = "Input";

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "Output";

/// Prefix prepended to every output file name
pub const DEFAULT_OUTPUT_PREFIX: &str = "OUTPUT_";

/// Code that marks the first event of a trial
pub const DEFAULT_TRIAL_MARKER: &str = "B";

/// Settings for one conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    pub frame_rate: FrameRate,
    pub trial_marker: String,
    /// Create `output_dir` before converting instead of requiring it to exist
    pub create_output_dir: bool,
    /// Process inputs in file-name order instead of directory-listing order
    pub sorted: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            frame_rate: FrameRate::NTSC,
            trial_marker: DEFAULT_TRIAL_MARKER.to_string(),
            create_output_dir: false,
            sorted: false,
        }
    }
}

impl ConverterConfig {
    /// Configuration reading from `input_dir` and writing to `output_dir`
    pub fn with_dirs(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Parse configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        let config: ConverterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Serialize configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        if !self.frame_rate.is_valid() {
            return Err(ConvertError::InvalidConfig(format!(
                "frame rate must be a positive finite number, got {}",
                self.frame_rate.fps()
            )));
        }
        if self.trial_marker.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "trial marker must not be empty".to_string(),
            ));
        }
        if self.output_prefix.contains(|c: char| c == '/' || c == '\\') {
            return Err(ConvertError::InvalidConfig(format!(
                "output prefix must not contain path separators: {:?}",
                self.output_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_supercoder_layout() {
        let config = ConverterConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("Input"));
        assert_eq!(config.output_dir, PathBuf::from("Output"));
        assert_eq!(config.output_prefix, "OUTPUT_");
        assert_eq!(config.frame_rate, FrameRate(29.97));
        assert_eq!(config.trial_marker, "B");
        assert!(!config.create_output_dir);
        assert!(!config.sorted);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ConverterConfig::from_json(r#"{"frame_rate": 25.0, "sorted": true}"#).unwrap();
        assert_eq!(config.frame_rate, FrameRate(25.0));
        assert!(config.sorted);
        assert_eq!(config.input_dir, PathBuf::from("Input"));
        assert_eq!(config.trial_marker, "B");
    }

    #[test]
    fn test_json_round_trip() {
        let config = ConverterConfig::with_dirs("in", "out");
        let json = config.to_json().unwrap();
        assert_eq!(ConverterConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_frame_rate() {
        let result = ConverterConfig::from_json(r#"{"frame_rate": 0.0}"#);
        assert!(matches!(result, Err(ConvertError::InvalidConfig(_))));

        let config = ConverterConfig {
            frame_rate: FrameRate(-1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_marker_and_bad_prefix() {
        let config = ConverterConfig {
            trial_marker: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConverterConfig {
            output_prefix: "../OUTPUT_".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_json() {
        let result = ConverterConfig::from_json("not valid json");
        assert!(matches!(result, Err(ConvertError::Json(_))));
    }
}
