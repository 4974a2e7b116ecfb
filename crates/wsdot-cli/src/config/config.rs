//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;
use wsdot_api::{ApiFamily, Strategy};

/// Environment variable that overrides the stored access code.
pub const ACCESS_CODE_ENV: &str = "WSDOT_ACCESS_CODE";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Upstream API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// `[api]` table.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// Access code issued by WSDOT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
    /// Overrides the WSDOT traveler base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsdot_base_url: Option<String>,
    /// Overrides the ferries base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsf_base_url: Option<String>,
    /// `native` or `jsonp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Returns the access code, preferring [`ACCESS_CODE_ENV`] over the file.
    #[must_use]
    pub fn access_code(&self) -> Option<String> {
        self.access_code_with(std::env::var(ACCESS_CODE_ENV).ok())
    }

    fn access_code_with(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|code| !code.trim().is_empty())
            .or_else(|| self.api.access_code.clone())
    }

    /// Parses the base URL override for `family`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a URL.
    pub fn base_url(&self, family: ApiFamily) -> Result<Option<Url>> {
        let raw = match family {
            ApiFamily::Wsdot => self.api.wsdot_base_url.as_deref(),
            ApiFamily::Wsf => self.api.wsf_base_url.as_deref(),
        };
        raw.map(|s| {
            Url::parse(s).with_context(|| format!("invalid {family} base URL in config: {s}"))
        })
        .transpose()
    }
}

/// Shows the first four characters of a secret.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}***")
}
