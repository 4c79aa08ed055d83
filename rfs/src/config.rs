//! repofs configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::repo::hash::HashAlgorithm;

/// Main repofs configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tool catalog configuration
    pub tools: ToolsConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .repofs.yml
        let local_config = PathBuf::from(".repofs.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/repofs/repofs.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("repofs").join("repofs.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Tool catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Exclusion globs applied to every walk on top of the caller's own
    #[serde(rename = "default-excludes")]
    pub default_excludes: Vec<String>,

    /// Hash algorithm used when a checksum call does not name one
    #[serde(rename = "default-algorithm")]
    pub default_algorithm: HashAlgorithm,

    /// Result limits
    pub limits: LimitsConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            default_excludes: vec!["**/.git/**".to_string(), "**/node_modules/**".to_string()],
            default_algorithm: HashAlgorithm::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Result limits for search tools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Default max results for glob search
    #[serde(rename = "glob-max-results")]
    pub glob_max_results: usize,

    /// Default max matches for regex search
    #[serde(rename = "regex-max-results")]
    pub regex_max_results: usize,

    /// Upper bound for any caller-supplied maxResults
    #[serde(rename = "max-results-cap")]
    pub max_results_cap: usize,

    /// Lines longer than this (in chars) are cut when files are displayed
    #[serde(rename = "max-line-length")]
    pub max_line_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            glob_max_results: crate::DEFAULT_GLOB_MAX_RESULTS,
            regex_max_results: crate::DEFAULT_REGEX_MAX_RESULTS,
            max_results_cap: 5000,
            max_line_length: 2000,
        }
    }
}

impl LimitsConfig {
    /// Clamp a caller-supplied result limit into `1..=max_results_cap`
    pub fn clamp_results(&self, requested: Option<u64>, default: usize) -> usize {
        let cap = self.max_results_cap.max(1);
        match requested {
            Some(n) => (n.min(cap as u64) as usize).max(1),
            None => default.clamp(1, cap),
        }
    }
}
