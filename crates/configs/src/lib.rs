//! # configs
//!
//! Layered configuration for the binaries: an optional `rusty-feed.toml`
//! in the working directory, overridden by `RUSTY_FEED__`-prefixed
//! environment variables (with `__` as the section separator, e.g.
//! `RUSTY_FEED__POSTS_API__BASE_URL`). A `.env` file is loaded first when
//! present. Every section has workable local-development defaults.

use std::path::PathBuf;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Posts API backend.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PostsApiConfig {
    pub base_url: String,
}

impl Default for PostsApiConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:3001".to_string() }
    }
}

/// Local media storage.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub root_path: PathBuf,
    pub url_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("./data/uploads"),
            url_prefix: "/static/uploads".to_string(),
        }
    }
}

/// Text-detection collaborator used by the signup age gate.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub endpoint: String,
    /// Absent by default; required only when age verification is enabled.
    pub api_key: Option<SecretString>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            api_key: None,
        }
    }
}

/// Signup policy.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SignupConfig {
    pub require_age_verification: bool,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self { require_age_verification: true }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub posts_api: PostsApiConfig,
    pub media: MediaConfig,
    pub ocr: OcrConfig,
    pub signup: SignupConfig,
}

/// Loads the layered configuration: defaults ← optional file ← environment.
pub fn load() -> Result<AppConfig, ConfigError> {
    // A missing .env is normal outside local development.
    if dotenvy::dotenv().is_ok() {
        debug!(".env loaded");
    }

    let config = Config::builder()
        .add_source(File::with_name("rusty-feed").required(false))
        .add_source(Environment::with_prefix("RUSTY_FEED").separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}
