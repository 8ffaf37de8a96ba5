//! User configuration management

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::todoist::{TodoistClient, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};

pub const APP_DIR_NAME: &str = "todo-glance";
pub const TOKEN_ENV_VAR: &str = "TODOIST_API_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub todoist: TodoistConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TodoistConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for TodoistConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: default_base_url(),
            page_size: default_page_size(),
        }
    }
}

impl fmt::Debug for TodoistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoistConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

fn default_interval_secs() -> u64 {
    60
}

/// `$XDG_CONFIG_HOME/todo-glance`, created on first use.
pub fn get_app_dir() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow!("Cannot find config directory"))?;
    let dir = config_dir.join(APP_DIR_NAME);
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join("config.toml"))
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(load_config()?.unwrap_or_default())
    }

    /// Builds an API client from the resolved token and the `[todoist]` section.
    pub fn todoist_client(&self, token_flag: Option<&str>) -> Result<TodoistClient> {
        let token = resolve_api_token(token_flag, self)?;
        let client = TodoistClient::new(&token)?
            .with_base_url(self.todoist.base_url.as_str())
            .with_page_size(self.todoist.page_size);
        Ok(client)
    }
}

pub fn load_config() -> Result<Option<Config>> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| anyhow!("Invalid config at {}: {}", path.display(), e))?;
    Ok(Some(config))
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config)?;
    fs::write(&path, content)?;
    Ok(())
}

/// Picks the API token: explicit flag (or env var, via clap) first, then the config file.
pub fn resolve_api_token(flag: Option<&str>, config: &Config) -> Result<String> {
    let from_flag = flag.map(str::trim).filter(|t| !t.is_empty());
    let from_config = config
        .todoist
        .api_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match from_flag.or(from_config) {
        Some(token) => Ok(token.to_string()),
        None => bail!(
            "No Todoist API token configured.\n\
             Set {} or add `api_token` under [todoist] in {}",
            TOKEN_ENV_VAR,
            config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "config.toml".to_string())
        ),
    }
}
