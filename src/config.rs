//! Process configuration
//!
//! Read from the environment after loading an optional env file
//! (`CHAT_ENV_FILE`, default `.env`).

use crate::llm::DEFAULT_BASE_URL;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not found! Add GEMINI_API_KEY to your .env file")]
    MissingApiKey,
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("Failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent when the key is missing; the server then only shows the error
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load the env file, then read the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CHAT_ENV_FILE")
            .map_or_else(|_| PathBuf::from(".env"), PathBuf::from);
        load_env_file(&path)?;
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = match var("CHAT_HOST") {
            Some(value) => value.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                name: "CHAT_HOST",
                value,
                reason: e.to_string(),
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = parse_or("CHAT_PORT", var("CHAT_PORT"), DEFAULT_PORT)?;
        let timeout_secs = parse_or(
            "CHAT_REQUEST_TIMEOUT_SECS",
            var("CHAT_REQUEST_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;

        Ok(Self {
            api_key: var("GEMINI_API_KEY").map(|key| key.trim().to_string()),
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            listen_addr: SocketAddr::new(host, port),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

/// A missing file is fine; a malformed one is not
fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Loaded env file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(source) => Err(ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
