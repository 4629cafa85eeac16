use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const API_URL_ENV: &str = "LEADS_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
}

impl Config {
    /// Resolve settings: `--api-url` flag, then `LEADS_API_URL`, then the config file.
    pub fn load(api_url_flag: Option<&str>) -> Result<Self> {
        Self::load_from(
            api_url_flag.map(str::to_string),
            env::var(API_URL_ENV).ok(),
            Self::default_path().as_deref(),
        )
    }

    /// The config file is only read when neither the flag nor the env var gives a URL.
    fn load_from(flag: Option<String>, env_value: Option<String>, path: Option<&Path>) -> Result<Self> {
        let early = Self::resolve(flag, env_value, Self::default());
        if early.api_url.is_some() {
            return Ok(early);
        }
        let file = match path {
            Some(path) => Self::from_file(path)?.unwrap_or_default(),
            None => Self::default(),
        };
        Ok(Self::resolve(None, None, file))
    }

    fn resolve(flag: Option<String>, env_value: Option<String>, file: Config) -> Self {
        let api_url = [flag, env_value, file.api_url]
            .into_iter()
            .flatten()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .find(|url| !url.is_empty());
        Self { api_url }
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "leads")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Read a config file. A missing file is not an error.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(Some(config))
    }

    pub fn api_url(&self) -> Result<&str> {
        self.api_url.as_deref().ok_or_else(|| {
            anyhow!(
                "API URL not configured. Pass --api-url, set it with: export {}=https://api.example.com, \
                 or add {{\"api_url\": \"...\"}} to the config file",
                API_URL_ENV
            )
        })
    }
}
