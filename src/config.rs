//! Settings for cirrus
//!
//! Settings live in `config.toml` inside the config directory:
//!
//! 1. `CIRRUS_CONFIG_DIR` environment variable
//! 2. `~/.config/cirrus`
//!
//! Every path can be overridden on the command line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "CIRRUS_CONFIG_DIR";

const SETTINGS_FILE: &str = "config.toml";

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand_path(&dir);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("cirrus"))
}

/// Get the settings file path
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(SETTINGS_FILE))
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub iam: IamSettings,

    #[serde(default, rename = "security-groups")]
    pub security_groups: SecurityGroupSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamSettings {
    /// Declared IAM snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared: Option<String>,
    /// Live IAM snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupSettings {
    /// Live security group snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
    /// Directory for migrated declared rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Settings {
    /// Load settings from the config directory, or defaults if there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_path()?)
    }

    /// Load settings from a specific file, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("Settings file {} does not exist, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in settings file: {}", path.display()))?;

        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Render settings as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }
}

/// Pick a path from the command line, falling back to a configured setting
pub fn resolve_path(
    arg: Option<PathBuf>,
    configured: Option<&str>,
    flag: &str,
    setting: &str,
) -> Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path);
    }
    configured.map(expand_path).with_context(|| {
        format!("No path given: pass {flag} or set '{setting}' in the settings file")
    })
}

/// Like [`resolve_path`], but absent is allowed
pub fn resolve_optional_path(arg: Option<PathBuf>, configured: Option<&str>) -> Option<PathBuf> {
    arg.or_else(|| configured.map(expand_path))
}
