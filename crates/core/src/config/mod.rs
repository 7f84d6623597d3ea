//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MODELCAT_*)
//! 2. TOML config file (if MODELCAT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::policy::FreshnessPolicy;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MODELCAT_*)
/// 2. TOML config file (if MODELCAT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog endpoint URL, including path.
    ///
    /// Set via MODELCAT_ENDPOINT environment variable.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Directory holding cache records.
    ///
    /// Set via MODELCAT_CACHE_DIR environment variable. Defaults to the
    /// platform cache directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Freshness window in seconds when conditional validation is off.
    ///
    /// Set via MODELCAT_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Revalidate with the server on every call using the stored ETag.
    ///
    /// Set via MODELCAT_ENABLE_CONDITIONAL_VALIDATION environment variable.
    #[serde(default = "default_true")]
    pub enable_conditional_validation: bool,

    /// Serve a stored response when the network attempt fails.
    ///
    /// Set via MODELCAT_ALLOW_STALE_ON_ERROR environment variable.
    #[serde(default = "default_true")]
    pub allow_stale_on_error: bool,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via MODELCAT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MODELCAT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Bearer token sent with catalog requests.
    ///
    /// Set via MODELCAT_AUTH_TOKEN environment variable.
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8080/api/models".into()
}

fn default_cache_ttl_secs() -> u64 {
    21_600 // 6h
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    "modelcat/0.1".into()
}

fn default_true() -> bool {
    true
}

/// Platform cache directory for response records (e.g. `~/.cache/modelcat/responses`).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "modelcat").map(|dirs| dirs.cache_dir().join("responses"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            cache_dir: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            enable_conditional_validation: true,
            allow_stale_on_error: true,
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            auth_token: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Parsed endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the endpoint is not an http(s) URL.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::Invalid { field: "endpoint".into(), reason: e.to_string() })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::Invalid {
                field: "endpoint".into(),
                reason: format!("unsupported scheme: {scheme}"),
            }),
        }
    }

    /// Cache directory, falling back to the platform default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when no directory is configured and the
    /// platform has no cache location (e.g. no home directory).
    pub fn resolved_cache_dir(&self) -> Result<PathBuf, ConfigError> {
        self.cache_dir.clone().or_else(default_cache_dir).ok_or_else(|| ConfigError::Missing {
            field: "cache_dir".into(),
            hint: "Set MODELCAT_CACHE_DIR environment variable".into(),
        })
    }

    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy {
            ttl: self.cache_ttl(),
            conditional_validation: self.enable_conditional_validation,
            stale_on_error: self.allow_stale_on_error,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MODELCAT_`
    /// 2. TOML file from `MODELCAT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MODELCAT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MODELCAT_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
