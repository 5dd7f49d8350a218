//! Pipeline configuration loaded from `linkedin_games.json`.
//!
//! If the config file doesn't exist, default values are used. Every field
//! is optional in the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::game::{Overrides, PlayTimePolicy};
use crate::paths;

pub const DEFAULT_CONFIG_FILE: &str = "linkedin_games.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Base URL of the Ollama server
    pub ollama_host: String,
    /// Vision model used for OCR
    pub ocr_model: String,
    /// Root directory for `response.json` files
    pub ocr_output_dir: PathBuf,
    /// Glob selecting the responses to parse
    pub responses_glob: String,
    /// Parsed results table
    pub results_csv: PathBuf,
    /// Missing-values report
    pub missing_values_txt: PathBuf,
    /// Capture times written by the `exif` command; joined when present
    pub exif_csv: PathBuf,
    /// Results with a `captured_at` column
    pub dated_results_csv: PathBuf,
    /// exiftool executable
    pub exiftool: String,
    /// How play time is picked among standalone time lines
    pub play_time_policy: PlayTimePolicy,
    /// Manual corrections, added on top of the built-in ones
    pub overrides: Overrides,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ollama_host: "http://localhost:11434".to_string(),
            ocr_model: "glm-ocr".to_string(),
            ocr_output_dir: paths::get_ocr_dir(),
            responses_glob: paths::get_responses_glob(),
            results_csv: paths::get_results_csv(),
            missing_values_txt: paths::get_missing_values_txt(),
            exif_csv: paths::get_exif_csv(),
            dated_results_csv: paths::get_dated_results_csv(),
            exiftool: "exiftool".to_string(),
            play_time_policy: PlayTimePolicy::default(),
            overrides: Overrides::default(),
        }
    }
}

impl PipelineConfig {
    /// Load config from file, or return defaults if it is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }
        match fs::read_to_string(config_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Save default config to file (for reference).
    pub fn save_default(config_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        fs::write(config_path, json)
            .context(format!("Failed to write {}", config_path.display()))?;
        Ok(())
    }

    /// Built-in overrides with the configured ones layered on top.
    pub fn effective_overrides(&self) -> Overrides {
        let mut overrides = Overrides::default();
        overrides.extend(self.overrides.clone());
        overrides
    }
}
