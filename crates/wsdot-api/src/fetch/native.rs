//! Plain HTTP GET strategy.

use reqwest::Client;
use url::Url;

use super::{LocalFetchStrategy, get_text};
use crate::error::ApiError;

/// Issues a GET with `Accept: application/json` and returns the body.
#[derive(Debug, Clone)]
pub struct NativeFetch {
    http: Client,
}

impl NativeFetch {
    /// Wraps an HTTP client.
    #[must_use]
    pub const fn new(http: Client) -> Self {
        Self { http }
    }
}

impl LocalFetchStrategy for NativeFetch {
    async fn fetch_text(&self, endpoint: &str, url: &Url) -> Result<String, ApiError> {
        get_text(&self.http, endpoint, url, "application/json").await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;
    use crate::error::ErrorKind;

    async fn fetch_from(template: wiremock::ResponseTemplate) -> Result<String, ApiError> {
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/vessels/rest/vesselbasics"))
            .respond_with(template)
            .mount(&mock_server)
            .await;
        let http = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let url = Url::parse(&format!(
            "{}/vessels/rest/vesselbasics?apiaccesscode=secret",
            mock_server.uri()
        ))
        .unwrap();
        NativeFetch::new(http).fetch_text("getVesselBasics", &url).await
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        // Arrange
        let template = wiremock::ResponseTemplate::new(200).set_body_string("[]");

        // Act
        let text = fetch_from(template).await.unwrap();

        // Assert
        assert_eq!(text, "[]");
    }

    #[tokio::test]
    async fn test_accept_header_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::header("Accept", "application/json"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;
        let url = Url::parse(&mock_server.uri()).unwrap();

        // Act & Assert (mock expect(1) verifies the header)
        NativeFetch::new(Client::new())
            .fetch_text("getAnything", &url)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_429_is_rate_limit() {
        // Arrange
        let template = wiremock::ResponseTemplate::new(429);

        // Act
        let err = fetch_from(template).await.unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::RateLimit);
        assert_eq!(err.status, Some(429));
    }

    #[tokio::test]
    async fn test_server_error_is_api_error_with_body() {
        // Arrange
        let template = wiremock::ResponseTemplate::new(500).set_body_string("backend down");

        // Act
        let err = fetch_from(template).await.unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Api);
        assert_eq!(err.status, Some(500));
        assert!(err.message.contains("backend down"));
        assert!(!err.url.contains("secret"));
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout() {
        // Arrange
        let template = wiremock::ResponseTemplate::new(200)
            .set_body_string("[]")
            .set_delay(Duration::from_secs(2));

        // Act
        let err = fetch_from(template).await.unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network() {
        // Arrange: nothing listens on port 1.
        let url = Url::parse("http://127.0.0.1:1/vessels/rest/vesselbasics").unwrap();

        // Act
        let err = NativeFetch::new(Client::new())
            .fetch_text("getAnything", &url)
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(err.status.is_none());
    }
}
