//! Fetch strategies.
//!
//! A strategy turns a fully-built request URL into raw JSON text. The native
//! strategy issues a plain GET; the JSONP strategy adds a `callback`
//! parameter and strips the wrapper, for hosts where CORS is unavailable.
#![allow(clippy::future_not_send)]

mod jsonp;
mod native;

use std::fmt;
use std::str::FromStr;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, ErrorKind};

pub use jsonp::{DEFAULT_CALLBACK, JsonpFetch, unwrap_jsonp};
pub use native::NativeFetch;

/// Longest body excerpt kept in an error message.
const MAX_BODY_EXCERPT: usize = 200;

/// Retrieves raw response text.
///
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(FetchStrategy: Send)]
pub trait LocalFetchStrategy {
    /// Issues a GET to `url` and returns the JSON text.
    ///
    /// `endpoint` is the function name, used in diagnostics only.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classifying the transport or HTTP failure.
    async fn fetch_text(&self, endpoint: &str, url: &Url) -> Result<String, ApiError>;
}

/// Which strategy a client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Plain HTTP GET.
    Native,
    /// Callback-wrapped GET.
    Jsonp,
}

impl Strategy {
    /// JSONP on `wasm32`, native everywhere else.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Jsonp
        } else {
            Self::Native
        }
    }

    /// Lowercase tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Jsonp => "jsonp",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "jsonp" => Ok(Self::Jsonp),
            _ => Err(format!("unknown fetch strategy: {s} (expected native or jsonp)")),
        }
    }
}

/// Strategy chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyFetch {
    /// See [`NativeFetch`].
    Native(NativeFetch),
    /// See [`JsonpFetch`].
    Jsonp(JsonpFetch),
}

impl AnyFetch {
    /// Wraps `http` in the given strategy.
    #[must_use]
    pub fn new(strategy: Strategy, http: Client) -> Self {
        match strategy {
            Strategy::Native => Self::Native(NativeFetch::new(http)),
            Strategy::Jsonp => Self::Jsonp(JsonpFetch::new(http)),
        }
    }

    /// The strategy in use.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Native(_) => Strategy::Native,
            Self::Jsonp(_) => Strategy::Jsonp,
        }
    }
}

impl LocalFetchStrategy for AnyFetch {
    async fn fetch_text(&self, endpoint: &str, url: &Url) -> Result<String, ApiError> {
        match self {
            Self::Native(fetch) => fetch.fetch_text(endpoint, url).await,
            Self::Jsonp(fetch) => fetch.fetch_text(endpoint, url).await,
        }
    }
}

/// Sends a GET and returns the body of a 2xx response.
async fn get_text(
    http: &Client,
    endpoint: &str,
    url: &Url,
    accept: &str,
) -> Result<String, ApiError> {
    tracing::debug!(endpoint, url = %crate::error::redact_url(url), "API request");

    let response = http
        .get(url.clone())
        .header(reqwest::header::ACCEPT, accept)
        .send()
        .await
        .map_err(|e| ApiError::from_reqwest(&e, endpoint, url))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(
            ApiError::new(ErrorKind::RateLimit, endpoint, url, "rate limit exceeded")
                .with_status(status.as_u16()),
        );
    }

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::from_reqwest(&e, endpoint, url))?;

    if !status.is_success() {
        let message = format!("HTTP {status}: {}", excerpt(&body));
        return Err(
            ApiError::new(ErrorKind::Api, endpoint, url, message).with_status(status.as_u16()),
        );
    }

    Ok(body)
}

/// First `MAX_BODY_EXCERPT` characters of `body`, trimmed.
fn excerpt(body: &str) -> &str {
    let body = body.trim();
    body.char_indices()
        .nth(MAX_BODY_EXCERPT)
        .and_then(|(end, _)| body.get(..end))
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_detect_native_off_wasm() {
        // Arrange & Act & Assert
        assert_eq!(Strategy::detect(), Strategy::Native);
        assert_eq!(Strategy::default(), Strategy::Native);
    }

    #[test]
    fn test_strategy_from_str() {
        // Arrange & Act & Assert
        assert_eq!("JSONP".parse::<Strategy>().unwrap(), Strategy::Jsonp);
        assert_eq!("native".parse::<Strategy>().unwrap(), Strategy::Native);
        assert!("xhr".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        // Arrange
        let body = "x".repeat(500);

        // Act
        let short = excerpt(&body);

        // Assert
        assert_eq!(short.len(), MAX_BODY_EXCERPT);
        assert_eq!(excerpt("  brief \n"), "brief");
    }

    #[tokio::test]
    async fn test_any_fetch_dispatches_to_strategy() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("callback", DEFAULT_CALLBACK))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(format!("{DEFAULT_CALLBACK}([1,2]);")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        let fetch = AnyFetch::new(Strategy::Jsonp, Client::new());
        let url = Url::parse(&format!("{}/data", mock_server.uri())).unwrap();

        // Act
        let text = fetch.fetch_text("getData", &url).await.unwrap();

        // Assert
        assert_eq!(fetch.strategy(), Strategy::Jsonp);
        assert_eq!(text, "[1,2]");
    }
}
