use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Runtime configuration, loaded from a YAML file with environment
/// overrides for the remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the game API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token for the `/my/...` account endpoints.
    #[serde(default)]
    pub api_token: String,
    /// Path of the redb database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_api_url() -> String {
    "https://api.artifactsmmo.com".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("grind.redb")
}

fn default_port() -> u16 {
    4180
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: String::new(),
            db_path: default_db_path(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from `path` (or `grind.yaml` in the working
    /// directory when present), then apply `GRIND_API_URL`,
    /// `GRIND_API_TOKEN`, and `GRIND_DB` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let fallback = Path::new("grind.yaml");
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        if let Ok(url) = std::env::var("GRIND_API_URL") {
            config.api_url = url;
        }
        if let Ok(token) = std::env::var("GRIND_API_TOKEN") {
            config.api_token = token;
        }
        if let Ok(db) = std::env::var("GRIND_DB") {
            config.db_path = PathBuf::from(db);
        }
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}
