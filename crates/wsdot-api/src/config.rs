//! Client configuration.

use url::Url;

use crate::endpoint::ApiFamily;
use crate::error::{Error, Result};

/// Access code and base URLs shared by every request of one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Access code sent as a query parameter.
    pub api_key: String,
    /// Base URL of the WSDOT traveler APIs.
    pub wsdot_base_url: Url,
    /// Base URL of the ferries APIs.
    pub wsf_base_url: Url,
}

impl ClientConfig {
    /// Creates a configuration pointing at the production base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingConfig("api_key"));
        }
        Ok(Self {
            api_key,
            wsdot_base_url: default_base_url(ApiFamily::Wsdot)?,
            wsf_base_url: default_base_url(ApiFamily::Wsf)?,
        })
    }

    /// Returns the base URL for `family`.
    #[must_use]
    pub const fn base_url(&self, family: ApiFamily) -> &Url {
        match family {
            ApiFamily::Wsdot => &self.wsdot_base_url,
            ApiFamily::Wsf => &self.wsf_base_url,
        }
    }

    /// Replaces the base URL for `family`, adding a trailing slash if missing.
    #[must_use]
    pub fn with_base_url(mut self, family: ApiFamily, url: Url) -> Self {
        let url = ensure_trailing_slash(url);
        match family {
            ApiFamily::Wsdot => self.wsdot_base_url = url,
            ApiFamily::Wsf => self.wsf_base_url = url,
        }
        self
    }
}

/// Parses the production base URL of `family`.
///
/// # Errors
///
/// Returns [`Error::Url`] if the built-in constant does not parse.
pub fn default_base_url(family: ApiFamily) -> Result<Url> {
    Url::parse(family.default_base_url()).map_err(|source| Error::Url {
        endpoint: String::from(family.as_str()),
        source,
    })
}

/// `Url::join` drops the last segment unless the base ends with `/`.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_new_uses_production_urls() {
        // Arrange & Act
        let config = ClientConfig::new("key").unwrap();

        // Assert
        assert_eq!(
            config.base_url(ApiFamily::Wsdot).as_str(),
            "https://wsdot.wa.gov/Traffic/api/"
        );
        assert_eq!(
            config.base_url(ApiFamily::Wsf).as_str(),
            "https://www.wsdot.wa.gov/ferries/api/"
        );
    }

    #[test]
    fn test_new_rejects_blank_key() {
        // Arrange & Act
        let result = ClientConfig::new("  ");

        // Assert
        assert!(matches!(result, Err(Error::MissingConfig("api_key"))));
    }

    #[test]
    fn test_with_base_url_adds_trailing_slash() {
        // Arrange
        let url = Url::parse("http://127.0.0.1:8080/ferries").unwrap();

        // Act
        let config = ClientConfig::new("key")
            .unwrap()
            .with_base_url(ApiFamily::Wsf, url);

        // Assert
        assert_eq!(
            config.base_url(ApiFamily::Wsf).as_str(),
            "http://127.0.0.1:8080/ferries/"
        );
    }
}
