//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables
//! 3. `.coderefine.toml` in the working directory
//! 4. `~/.config/coderefine/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{self, DEFAULT_API_URL, DEFAULT_LANGUAGE};
use crate::env::Env;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub review: ReviewConfig,
    pub github: GithubConfig,
    pub ui: UiConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Defaults for the review and rewrite panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub language: String,
    /// Focus areas checked by default (`bugs`, `security`, `performance`, `best_practices`).
    pub focus_areas: Vec<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            focus_areas: Vec::new(),
        }
    }
}

/// Defaults for the GitHub panel toggles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub post_comment: bool,
    pub auto_commit: bool,
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Run the count-up and bar-fill animations instead of jumping to final values.
    pub animations: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { animations: true }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from the global config, then `.coderefine.toml` in `work_dir`,
    /// then applies environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        Self::load_layers(Self::global_config_path().as_deref(), work_dir, env)
    }

    /// Same as [`Config::load`] with an explicit global config path.
    pub fn load_layers(
        global_path: Option<&Path>,
        work_dir: Option<&Path>,
        env: &Env,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let global = Self::load_file(global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one.
    ///
    /// Only fields where `other` differs from the built-in default override
    /// the current value, so a sparse file leaves earlier layers intact.
    fn merge(&mut self, other: Config) {
        let defaults = Config::default();

        if other.api.base_url != defaults.api.base_url {
            self.api.base_url = other.api.base_url;
        }

        if other.review.language != defaults.review.language {
            self.review.language = other.review.language;
        }
        if !other.review.focus_areas.is_empty() {
            self.review.focus_areas = other.review.focus_areas;
        }

        if other.github.post_comment {
            self.github.post_comment = true;
        }
        if other.github.auto_commit {
            self.github.auto_commit = true;
        }

        // Disabled overrides enabled
        if !other.ui.animations {
            self.ui.animations = false;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(url) = env.get(constants::ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(language) = env.get(constants::ENV_LANGUAGE) {
            self.review.language = language.to_lowercase();
        }
        match env.flag(constants::ENV_ANIMATIONS) {
            Some(enabled) => self.ui.animations = enabled,
            None if env.get(constants::ENV_ANIMATIONS).is_some() => {
                tracing::warn!(
                    "ignoring invalid {} value",
                    constants::ENV_ANIMATIONS
                );
            }
            None => {}
        }
    }
}
