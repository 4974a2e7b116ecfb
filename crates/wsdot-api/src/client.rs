//! `WsdotClient` - registry-driven client for both API families.
#![allow(clippy::future_not_send)]

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::{ApiFamily, Endpoint, Params};
use crate::error::{ApiError, Error, ErrorKind, Result};
use crate::fetch::{AnyFetch, LocalFetchStrategy, Strategy};
use crate::normalize::{NormalizedValue, normalize};
use crate::registry::find_endpoint;

/// Default delay between attempts after a retryable failure.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Substrings of a top-level `Message` that mark a 200 response as a failure.
const FAILURE_KEYWORDS: &[&str] = &[
    "error",
    "invalid",
    "failed",
    "exception",
    "unauthorized",
    "denied",
];

/// Client for the WSDOT traveler and ferries APIs.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct WsdotClient<F = AnyFetch> {
    /// Access code and base URLs.
    config: ClientConfig,
    /// Transport.
    fetcher: F,
    /// Whether responses are conformed to the endpoint's output schema.
    validate: bool,
    /// Base delay between retries; multiplied by the attempt number.
    retry_delay: Duration,
}

/// Builder for `WsdotClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct WsdotClientBuilder {
    api_key: Option<String>,
    user_agent: Option<String>,
    wsdot_base_url: Option<Url>,
    wsf_base_url: Option<Url>,
    strategy: Option<Strategy>,
    validate: bool,
    retry_delay: Option<Duration>,
    timeout: Option<Duration>,
}

impl WsdotClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            api_key: None,
            user_agent: None,
            wsdot_base_url: None,
            wsf_base_url: None,
            strategy: None,
            validate: true,
            retry_delay: None,
            timeout: None,
        }
    }

    /// Sets the access code (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Overrides the WSDOT traveler base URL (for wiremock in tests).
    #[must_use]
    pub fn wsdot_base_url(mut self, url: Url) -> Self {
        self.wsdot_base_url = Some(url);
        self
    }

    /// Overrides the ferries base URL (for wiremock in tests).
    #[must_use]
    pub fn wsf_base_url(mut self, url: Url) -> Self {
        self.wsf_base_url = Some(url);
        self
    }

    /// Selects the fetch strategy (default: [`Strategy::detect`]).
    #[must_use]
    pub const fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Enables or disables output-schema conformance (default: enabled).
    #[must_use]
    pub const fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Sets the base delay between retries (default: 1s).
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Sets the per-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<WsdotClient> {
        let api_key = self.api_key.ok_or(Error::MissingConfig("api_key"))?;
        let user_agent = self.user_agent.ok_or(Error::MissingConfig("user_agent"))?;

        let mut config = ClientConfig::new(api_key)?;
        if let Some(url) = self.wsdot_base_url {
            config = config.with_base_url(ApiFamily::Wsdot, url);
        }
        if let Some(url) = self.wsf_base_url {
            config = config.with_base_url(ApiFamily::Wsf, url);
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(Error::HttpClient)?;

        let strategy = self.strategy.unwrap_or_else(Strategy::detect);

        Ok(WsdotClient {
            config,
            fetcher: AnyFetch::new(strategy, http_client),
            validate: self.validate,
            retry_delay: self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
        })
    }
}

impl WsdotClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> WsdotClientBuilder {
        WsdotClientBuilder::new()
    }
}

impl<F> WsdotClient<F> {
    /// Creates a client with a caller-supplied transport.
    #[must_use]
    pub const fn with_fetcher(config: ClientConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            validate: true,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Enables or disables output-schema conformance.
    #[must_use]
    pub const fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Sets the base delay between retries.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Access code and base URLs.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Builds the full request URL, including the access code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] for missing or malformed parameters,
    /// or [`Error::Url`] if the result is not a valid URL.
    pub fn url_for(&self, endpoint: &Endpoint, params: &Params) -> Result<Url> {
        let path = endpoint.render_path(params)?;
        let mut url = self
            .config
            .base_url(endpoint.api)
            .join(&path)
            .map_err(|source| Error::Url {
                endpoint: String::from(endpoint.function_name),
                source,
            })?;
        url.query_pairs_mut()
            .append_pair(endpoint.api.access_code_param(), &self.config.api_key);
        Ok(url)
    }
}

impl<F: LocalFetchStrategy + Sync> WsdotClient<F> {
    /// Fetches the raw response text of `endpoint`.
    ///
    /// Network, timeout and rate-limit failures are retried up to the
    /// endpoint's cache-preset retry count.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or every attempt fails.
    #[instrument(skip_all, fields(endpoint = endpoint.function_name))]
    pub async fn fetch_text(&self, endpoint: &Endpoint, params: &Params) -> Result<String> {
        let url = self.url_for(endpoint, params)?;
        let max_retries = endpoint.cache.preset().retry;

        let mut retries = 0u32;
        loop {
            match self.fetcher.fetch_text(endpoint.function_name, &url).await {
                Ok(text) => {
                    #[cfg(feature = "otel")]
                    crate::metrics::record_request(endpoint.function_name, "ok");
                    return Ok(text);
                }
                Err(err) if err.kind.is_retryable() && retries < max_retries => {
                    retries = retries.saturating_add(1);
                    tracing::warn!(
                        retry = retries,
                        max_retries,
                        kind = %err.kind,
                        "API request failed. Retrying..."
                    );
                    tokio::time::sleep(self.retry_delay.saturating_mul(retries)).await;
                }
                Err(err) => {
                    #[cfg(feature = "otel")]
                    crate::metrics::record_request(endpoint.function_name, "error");
                    return Err(err.into());
                }
            }
        }
    }

    /// Fetches and normalizes `endpoint`.
    ///
    /// When validation is enabled the result is conformed to the endpoint's
    /// output schema.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching fails, the body is not JSON, the body
    /// carries a failure `Message`, or the result does not match the schema.
    #[instrument(skip_all, fields(endpoint = endpoint.function_name))]
    pub async fn fetch(&self, endpoint: &Endpoint, params: &Params) -> Result<NormalizedValue> {
        let text = self.fetch_text(endpoint, params).await?;

        let value = normalize(&text).map_err(|source| Error::Parse {
            endpoint: String::from(endpoint.function_name),
            source,
        })?;

        if let Some(message) = soft_error_message(&value) {
            let url = self.url_for(endpoint, params)?;
            return Err(ApiError::new(ErrorKind::Api, endpoint.function_name, &url, message).into());
        }

        if !self.validate {
            return Ok(value);
        }
        endpoint
            .output
            .conform(value)
            .map_err(|source| Error::Schema {
                endpoint: String::from(endpoint.function_name),
                source,
            })
    }

    /// Fetches `endpoint` and decodes the normalized result into `T`.
    ///
    /// Dates are presented to `T` as RFC 3339 strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the value does not fit `T`, or any error
    /// from [`Self::fetch`].
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &Params,
    ) -> Result<T> {
        let value = self.fetch(endpoint, params).await?;
        serde_json::from_value(value.into_json()).map_err(|source| Error::Decode {
            endpoint: String::from(endpoint.function_name),
            source,
        })
    }

    /// Fetches the endpoint registered as `function_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEndpoint`] if no endpoint has that name, or any
    /// error from [`Self::fetch`].
    pub async fn call(&self, function_name: &str, params: &Params) -> Result<NormalizedValue> {
        let endpoint = find_endpoint(function_name)
            .ok_or_else(|| Error::UnknownEndpoint(String::from(function_name)))?;
        self.fetch(endpoint, params).await
    }
}

/// Returns the top-level `Message` if it reports a failure.
fn soft_error_message(value: &NormalizedValue) -> Option<&str> {
    let message = value.get("Message")?.as_str()?;
    let lowered = message.to_lowercase();
    FAILURE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
        .then_some(message)
}
