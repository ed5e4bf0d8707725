use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tally_augment::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// API key value that means "not configured".
pub const PLACEHOLDER_KEY: &str = "placeholder-key";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Taxonomy dataset; the bundled one when unset.
    pub taxonomy_path: Option<PathBuf>,
    pub augmentation: AugmentationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AugmentationConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_ms: 8000,
        }
    }
}

impl AugmentationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The key to send, if one is configured.
    pub fn active_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_KEY)
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid config file")
    }

    /// Explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Apply `TALLY_*` overrides read through `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup("TALLY_TAXONOMY") {
            self.taxonomy_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("TALLY_COMPLETION_URL") {
            self.augmentation.base_url = url;
        }
        if let Some(model) = lookup("TALLY_COMPLETION_MODEL") {
            self.augmentation.model = model;
        }
        if let Some(key) = lookup("TALLY_COMPLETION_API_KEY") {
            self.augmentation.api_key = Some(key);
        }
        if let Some(ms) = lookup("TALLY_COMPLETION_TIMEOUT_MS") {
            self.augmentation.timeout_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("TALLY_COMPLETION_TIMEOUT_MS is not a number: {ms}"))?;
        }
        Ok(self)
    }

    pub fn augmentation_enabled(&self) -> bool {
        self.augmentation.active_key().is_some()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "tally", "tally")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
