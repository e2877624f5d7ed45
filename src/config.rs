//! Project configuration (sigtrim.yaml) parsing.
//!
//! Every field has a default, so an empty or missing file gives the same
//! behaviour as the original web uploader.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SigtrimError};
use crate::pipeline::sampler::{SAMPLE_HEIGHT, SAMPLE_WIDTH};
use crate::pipeline::{BackgroundCheck, IntakeRules, TrimMode};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "sigtrim.yaml";

/// Configuration loaded from sigtrim.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size of the canvas used for the background check.
    pub sample: SampleSize,

    /// Background rule.
    pub background: BackgroundCheck,

    /// Crop rule.
    pub trim: TrimMode,

    /// Limits applied to selected files.
    pub intake: IntakeRules,

    /// Where `normalize` writes trimmed PNGs.
    pub output: PathBuf,

    /// Where `upload` stores files and records.
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleSize {
    pub width: u32,
    pub height: u32,
}

impl Default for SampleSize {
    fn default() -> Self {
        Self {
            width: SAMPLE_WIDTH,
            height: SAMPLE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory receiving uploaded files.
    pub uploads: PathBuf,

    /// JSON file receiving signature records.
    pub records: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uploads: PathBuf::from("uploads"),
            records: PathBuf::from("signatures.json"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample: SampleSize::default(),
            background: BackgroundCheck::default(),
            trim: TrimMode::default(),
            intake: IntakeRules::default(),
            output: PathBuf::from("trimmed"),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SigtrimError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(content).map_err(|e| SigtrimError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sample.width == 0 || self.sample.height == 0 {
            return Err(SigtrimError::Config {
                message: format!(
                    "Sample size must be non-zero, got {}x{}",
                    self.sample.width, self.sample.height
                ),
                help: Some("The original uploader samples at 200x80".to_string()),
            });
        }

        if self.intake.accept.is_empty() {
            return Err(SigtrimError::Config {
                message: "intake.accept is empty; no file could ever be accepted".to_string(),
                help: Some("List MIME types such as image/png, or use image/*".to_string()),
            });
        }

        Ok(())
    }

    /// Serialize to YAML, as written by `sigtrim init`.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| SigtrimError::Config {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })
    }
}
