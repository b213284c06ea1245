use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::provider::openweather::OpenWeatherClient;

/// File read for `KEY=value` pairs, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPENWEATHER_API_KEY", "apiKey"];

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Overrides the OpenWeather endpoint, mostly useful for testing.
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
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
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Pick the API key: explicit flag, then environment, then config file.
    ///
    /// `env` looks up a variable by name so callers decide where the
    /// environment comes from.
    pub fn resolve_api_key<F>(&self, flag: Option<&str>, env: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = || {
            API_KEY_ENV_VARS
                .iter()
                .filter_map(|&name| env(name))
                .find(|value| !value.trim().is_empty())
        };

        flag.map(str::to_string)
            .filter(|key| !key.trim().is_empty())
            .or_else(from_env)
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `cityweather configure` or set OPENWEATHER_API_KEY."
                )
            })
    }

    /// Like [`Config::load`], but falls back to defaults when the file can't be read.
    ///
    /// A flag or environment key can still make the lookup work.
    pub fn load_or_default() -> Self {
        Self::or_default(Self::load())
    }

    fn or_default(loaded: Result<Self>) -> Self {
        loaded.unwrap_or_else(|err| {
            warn!("{err:#}; continuing with default configuration");
            Self::default()
        })
    }

    /// Build a client for the configured endpoint.
    pub fn client(&self, api_key: String) -> OpenWeatherClient {
        match &self.base_url {
            Some(url) => OpenWeatherClient::with_base_url(api_key, url.clone()),
            None => OpenWeatherClient::new(api_key),
        }
    }
}

/// Read `KEY=value` pairs from a dotenv file without touching the process environment.
///
/// A missing file yields an empty map.
pub fn dotenv_vars(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open env file: {}", path.display()))?
        .map(|item| {
            item.with_context(|| format!("Failed to parse env file: {}", path.display()))
        })
        .collect()
}

/// Environment lookup that prefers real variables and falls back to `dotenv` entries.
pub fn env_with_dotenv(
    dotenv: &HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> + '_ {
    move |name: &str| std::env::var(name).ok().or_else(|| dotenv.get(name).cloned())
}
