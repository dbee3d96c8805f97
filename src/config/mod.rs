use crate::constants::config::{
    ENV_BASE_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_SLUG, ENV_TOKEN_URL,
};
use crate::fakturoid::{Credentials, Endpoints};
use crate::utils::paths::resolve_config_path;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FAKTUROID_CLIENT_ID and FAKTUROID_CLIENT_SECRET required (use env variables or {})", path.display())]
    MissingCredentials { path: PathBuf },

    #[error("FAKTUROID_SLUG required (your Fakturoid account slug)")]
    MissingSlug,

    #[error("cannot read config file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{key} is not a valid URL: {value}")]
    InvalidUrl { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub slug: Option<String>,
    pub base_url: Option<String>,
    pub token_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub source_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = resolve_config_path();
        let file = read_file_config(&path)?;
        Self::from_layers(file, |key| std::env::var(key).ok(), path)
    }

    pub fn from_layers<F>(
        file: Option<FileConfig>,
        env: F,
        source_path: PathBuf,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let pick = |key: &str, fallback: Option<String>| {
            non_empty(env(key)).or_else(|| non_empty(fallback))
        };

        let client_id = pick(ENV_CLIENT_ID, file.client_id);
        let client_secret = pick(ENV_CLIENT_SECRET, file.client_secret);
        let slug = pick(ENV_SLUG, file.slug);

        let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
            return Err(ConfigError::MissingCredentials { path: source_path });
        };
        let slug = slug.ok_or(ConfigError::MissingSlug)?;

        let defaults = Endpoints::default();
        let base_url = pick(ENV_BASE_URL, file.base_url).unwrap_or(defaults.base_url);
        let token_url = pick(ENV_TOKEN_URL, file.token_url).unwrap_or(defaults.token_url);
        ensure_url(ENV_BASE_URL, &base_url)?;
        ensure_url(ENV_TOKEN_URL, &token_url)?;

        Ok(Self {
            credentials: Credentials::new(client_id, client_secret, slug),
            endpoints: Endpoints::new(base_url, token_url),
            source_path,
        })
    }
}

pub fn read_file_config(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            source,
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ensure_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
        }),
    }
}
