//! JSONP strategy.

use reqwest::Client;
use url::Url;

use super::{LocalFetchStrategy, get_text};
use crate::error::{ApiError, ErrorKind};

/// Callback name used unless overridden.
pub const DEFAULT_CALLBACK: &str = "wsdotCallback";

/// Adds `callback=<name>` to the request and unwraps `name(...)` from the body.
#[derive(Debug, Clone)]
pub struct JsonpFetch {
    http: Client,
    callback: String,
}

impl JsonpFetch {
    /// Wraps an HTTP client, using [`DEFAULT_CALLBACK`].
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self {
            http,
            callback: String::from(DEFAULT_CALLBACK),
        }
    }

    /// Overrides the callback name.
    #[must_use]
    pub fn callback(mut self, name: impl Into<String>) -> Self {
        self.callback = name.into();
        self
    }
}

impl LocalFetchStrategy for JsonpFetch {
    async fn fetch_text(&self, endpoint: &str, url: &Url) -> Result<String, ApiError> {
        let mut url = url.clone();
        url.query_pairs_mut().append_pair("callback", &self.callback);

        let body = get_text(&self.http, endpoint, &url, "application/javascript").await?;
        unwrap_jsonp(&body, &self.callback)
            .map(String::from)
            .ok_or_else(|| {
                ApiError::new(
                    ErrorKind::Cors,
                    endpoint,
                    &url,
                    format!("response is neither JSON nor wrapped in {}(...)", self.callback),
                )
            })
    }
}

/// Strips `callback(...)` (optionally `/**/`-prefixed and `;`-terminated).
///
/// A bare JSON object or array is returned unchanged. Returns `None` for any
/// other body.
#[must_use]
pub fn unwrap_jsonp<'a>(body: &'a str, callback: &str) -> Option<&'a str> {
    let trimmed = body.trim();
    let unprefixed = trimmed.strip_prefix("/**/").unwrap_or(trimmed).trim_start();

    let wrapped = unprefixed
        .strip_prefix(callback)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| {
            let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
            rest.strip_suffix(')')
        });

    match wrapped {
        Some(inner) => Some(inner.trim()),
        None if trimmed.starts_with(['{', '[']) => Some(trimmed),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_unwrap_plain_wrapper() {
        // Arrange & Act & Assert
        assert_eq!(unwrap_jsonp("cb({\"a\":1})", "cb"), Some("{\"a\":1}"));
        assert_eq!(unwrap_jsonp("cb([1]);\n", "cb"), Some("[1]"));
    }

    #[test]
    fn test_unwrap_comment_prefixed_wrapper() {
        // Arrange & Act & Assert
        assert_eq!(unwrap_jsonp("/**/ cb ( [] );", "cb"), Some("[]"));
    }

    #[test]
    fn test_bare_json_passes_through() {
        // Arrange & Act & Assert
        assert_eq!(unwrap_jsonp("  [1,2]  ", "cb"), Some("[1,2]"));
    }

    #[test]
    fn test_other_bodies_are_rejected() {
        // Arrange & Act & Assert
        assert_eq!(unwrap_jsonp("<html>blocked</html>", "cb"), None);
        assert_eq!(unwrap_jsonp("other([1])", "cb"), None);
        assert_eq!(unwrap_jsonp("cb([1]", "cb"), None);
    }

    #[tokio::test]
    async fn test_callback_param_and_unwrap() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/schedule/rest/validdaterange"))
            .and(wiremock::matchers::query_param("callback", "ferries"))
            .and(wiremock::matchers::query_param("apiaccesscode", "k"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(r#"ferries({"DateFrom":"/Date(0)/"});"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        let url = Url::parse(&format!(
            "{}/schedule/rest/validdaterange?apiaccesscode=k",
            mock_server.uri()
        ))
        .unwrap();
        let fetch = JsonpFetch::new(Client::new()).callback("ferries");

        // Act
        let text = fetch
            .fetch_text("getScheduleValidDateRange", &url)
            .await
            .unwrap();

        // Assert
        assert_eq!(text, r#"{"DateFrom":"/Date(0)/"}"#);
    }

    #[tokio::test]
    async fn test_unwrapped_html_is_cors_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;
        let url = Url::parse(&mock_server.uri()).unwrap();

        // Act
        let err = JsonpFetch::new(Client::new())
            .fetch_text("getTerminalBasics", &url)
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Cors);
        assert!(err.url.contains("callback=wsdotCallback"));
    }
}
