//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pagetree/pagetree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `PAGETREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::DEFAULT_MAX_DEPTH;
use crate::application::ApplicationError;

pub const DEFAULT_API_BASE_URL: &str = "https://www.notion.so/api/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Unified configuration for pagetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the record API (without trailing `/getRecordValues`)
    pub api_base_url: String,
    /// Session token sent as the `token_v2` cookie; public pages need none
    pub token_v2: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of block levels to fetch; 0 disables the limit
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_v2: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub api_base_url: Option<String>,
    pub token_v2: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_depth: Option<usize>,
}

/// Get the XDG config directory for pagetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pagetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pagetree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins field by field where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            api_base_url: overlay
                .api_base_url
                .clone()
                .unwrap_or_else(|| self.api_base_url.clone()),
            token_v2: overlay.token_v2.clone().or_else(|| self.token_v2.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/pagetree/pagetree.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `PAGETREE_*` prefix
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply PAGETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PAGETREE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("api_base_url") {
            settings.api_base_url = val;
        }
        if let Ok(val) = config.get_string("token_v2") {
            settings.token_v2 = Some(val);
        }
        if let Ok(val) = config.get_int("timeout_secs") {
            settings.timeout_secs = u64::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("PAGETREE_TIMEOUT_SECS must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_int("max_depth") {
            settings.max_depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("PAGETREE_MAX_DEPTH must not be negative: {val}"),
            })?;
        }

        Ok(settings)
    }

    /// Copy with the session token masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            token_v2: self.token_v2.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            timeout_secs: Some(5),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.timeout_secs, 5);
        assert_eq!(merged.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(merged.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn given_token_when_redacting_then_masks_it() {
        let settings = Settings {
            token_v2: Some("secret".to_string()),
            ..Settings::default()
        };

        let shown = settings.redacted().to_toml().unwrap();

        assert!(!shown.contains("secret"));
        assert!(shown.contains("********"));
    }
}
