//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.sentiq/config.toml` (user)
//! 3. `/etc/sentiq/config.toml` (system)
//! 4. Built-in defaults
//!
//! Environment variables are applied on top with [`Config::apply_env`].
//! Credentials are never read from the file; they come from
//! `GEMINI_API_KEY` and `GROQ_API_KEY` only.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::ratelimit::{DEFAULT_REQUESTS_PER_MINUTE, RateLimitScope};
use crate::types::ProviderId;
use crate::{Result, SentiqError};

/// Environment variable names.
pub mod env {
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
    pub const GROQ_MODEL: &str = "GROQ_MODEL";
    pub const CACHE_FILE: &str = "SENTIQ_CACHE_FILE";
    pub const RPM: &str = "SENTIQ_RPM";
}

/// Gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Per-call timeout applied when the caller supplies none.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Provider slot configurations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    /// Gemini.
    #[serde(default)]
    pub primary: ProviderConfig,
    /// Groq.
    #[serde(default)]
    pub secondary: ProviderConfig,
}

/// Per-adapter settings. Unset fields fall back to the adapter's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Only meaningful for the secondary (Groq) adapter.
    #[serde(default)]
    pub json_mode: Option<bool>,
}

/// Token bucket settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Bucket capacity; refill is `requests_per_minute / 60` tokens per second.
    #[serde(default = "default_rpm")]
    pub requests_per_minute: u32,
    #[serde(default)]
    pub scope: RateLimitScope,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_rpm(),
            scope: RateLimitScope::default(),
        }
    }
}

fn default_rpm() -> u32 {
    DEFAULT_REQUESTS_PER_MINUTE
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// A missing file is only an error when `explicit_path` names it;
    /// otherwise built-in defaults are used.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SentiqError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            SentiqError::Configuration(msg) => {
                SentiqError::Configuration(format!("Failed to parse config file {path:?}: {msg}"))
            }
            other => other,
        })
    }

    /// Parse TOML config text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SentiqError::Configuration(e.to_string()))
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SentiqError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".sentiq").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/sentiq/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply `GEMINI_MODEL`, `GROQ_MODEL`, `SENTIQ_CACHE_FILE` and
    /// `SENTIQ_RPM` from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source. Empty values are
    /// ignored.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = var(env::GEMINI_MODEL) {
            self.providers.primary.default_model = Some(model);
        }
        if let Some(model) = var(env::GROQ_MODEL) {
            self.providers.secondary.default_model = Some(model);
        }
        if let Some(path) = var(env::CACHE_FILE) {
            self.cache.path = PathBuf::from(path);
        }
        if let Some(rpm) = var(env::RPM) {
            self.rate_limit.requests_per_minute = rpm.trim().parse().map_err(|_| {
                SentiqError::Configuration(format!("{} is not a number: {rpm:?}", env::RPM))
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn provider(&self, id: ProviderId) -> &ProviderConfig {
        match id {
            ProviderId::Primary => &self.providers.primary,
            ProviderId::Secondary => &self.providers.secondary,
        }
    }
}

/// Environment variable holding the credential for `id`.
pub fn api_key_var(id: ProviderId) -> &'static str {
    match id {
        ProviderId::Primary => env::GEMINI_API_KEY,
        ProviderId::Secondary => env::GROQ_API_KEY,
    }
}

/// Credential for `id` from the process environment, if set.
pub fn api_key(id: ProviderId) -> Option<String> {
    std::env::var(api_key_var(id))
        .ok()
        .filter(|k| !k.trim().is_empty())
}
