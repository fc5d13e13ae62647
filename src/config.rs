//! Layered configuration: config file, then environment, then CLI flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::db::ConnectionConfig;
use crate::llm::DEFAULT_GEMINI_MODEL;

/// On-disk shape of `config.toml`. Every field is optional; missing values
/// fall back to the environment and then to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
}

impl FileConfig {
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hotelql")
            .join("config.toml")
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}

/// Values passed on the command line, which win over everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides<'a> {
    pub database_url: Option<&'a str>,
    pub model: Option<&'a str>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: ConnectionConfig,
    pub gemini_api_key: String,
    pub gemini_model: String,
}

impl AppConfig {
    /// Load `config.toml` and resolve it against the environment and the
    /// given CLI overrides.
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::resolve(FileConfig::load()?, overrides)
    }

    /// Precedence per value: CLI override, then environment variable
    /// (`DATABASE_URL`, `GEMINI_API_KEY`, `GEMINI_MODEL`), then config
    /// file, then built-in default.
    ///
    /// An absent API key is not an error here; the Gemini client rejects
    /// it at construction so the failure still happens before any call.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let url = overrides
            .database_url
            .map(str::to_string)
            .or_else(|| env_nonempty("DATABASE_URL"))
            .or(file.database_url);
        let database = match url {
            Some(url) => ConnectionConfig::from_url(&url)?,
            None => ConnectionConfig::default(),
        };

        let gemini_api_key = env_nonempty("GEMINI_API_KEY")
            .or(file.gemini_api_key)
            .unwrap_or_default();

        let gemini_model = overrides
            .model
            .map(str::to_string)
            .or_else(|| env_nonempty("GEMINI_MODEL"))
            .or(file.gemini_model)
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            database,
            gemini_api_key,
            gemini_model,
        })
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
