use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::model::UnitSystem;

pub const DEFAULT_CITY: &str = "London";

/// Credentials and endpoint overrides for the OpenWeather API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub geo_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// City loaded when the current location cannot be used.
    pub default_city: String,

    pub units: UnitSystem,

    /// When false, location detection reports "unsupported".
    pub detect_location: bool,

    /// Example TOML:
    /// [openweather]
    /// api_key = "..."
    pub openweather: OpenWeatherConfig,

    /// Display names for reverse-geocoded places, matched case-insensitively
    /// anywhere in the upstream name:
    /// [aliases]
    /// "Kangini Bhavan" = "Bengaluru"
    pub aliases: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            units: UnitSystem::Metric,
            detect_location: true,
            openweather: OpenWeatherConfig::default(),
            aliases: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyboard", "skyboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

/// Display name for a place after alias substitution.
///
/// An alias applies when its key, lowercased, occurs anywhere in the
/// lowercased place name. Keys are tried in sorted order and the first hit wins.
pub fn resolve_alias<'a>(aliases: &'a BTreeMap<String, String>, name: &'a str) -> &'a str {
    let lowered = name.to_lowercase();
    aliases
        .iter()
        .find(|(key, _)| !key.trim().is_empty() && lowered.contains(&key.to_lowercase()))
        .map(|(_, alias)| alias.as_str())
        .unwrap_or(name)
}
