//! Error types.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Query parameters whose values are masked in diagnostics.
const SECRET_PARAMS: &[&str] = &["AccessCode", "apiaccesscode"];

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection refused, DNS failure, reset, or unreadable body.
    Network,
    /// The request did not complete in time.
    Timeout,
    /// A cross-origin (JSONP) response did not carry its callback wrapper.
    Cors,
    /// HTTP 429.
    RateLimit,
    /// Non-2xx status, or an error message embedded in a 200 response.
    Api,
}

impl ErrorKind {
    /// Returns `true` for failures worth repeating with the same request.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::RateLimit)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Cors => "CORS",
            Self::RateLimit => "rate limit",
            Self::Api => "API",
        };
        f.write_str(name)
    }
}

/// A failed HTTP exchange with an upstream API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} error calling {endpoint} ({url}): {message}")]
#[allow(clippy::module_name_repetitions)]
pub struct ApiError {
    /// Failure classification.
    pub kind: ErrorKind,
    /// Endpoint function name.
    pub endpoint: String,
    /// Request URL with the access code masked.
    pub url: String,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Human-readable detail.
    pub message: String,
}

impl ApiError {
    /// Creates an error for `endpoint` at `url`.
    #[must_use]
    pub fn new(kind: ErrorKind, endpoint: &str, url: &Url, message: impl Into<String>) -> Self {
        Self {
            kind,
            endpoint: String::from(endpoint),
            url: redact_url(url),
            status: None,
            message: message.into(),
        }
    }

    /// Attaches the HTTP status code.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Classifies a transport-level `reqwest` failure.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, endpoint: &str, url: &Url) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else {
            ErrorKind::Network
        };
        let error = Self::new(kind, endpoint, url, err.to_string());
        match err.status() {
            Some(status) => error.with_status(status.as_u16()),
            None => error,
        }
    }
}

/// Masks access-code query values.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    if url.query().is_none() {
        return redacted.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if SECRET_PARAMS.contains(&k.as_ref()) {
                String::from("***")
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Malformed JSON text.
#[derive(Debug, Error)]
#[error("invalid JSON at line {line}, column {column}: {source}")]
#[allow(clippy::module_name_repetitions)]
pub struct ParseError {
    line: usize,
    column: usize,
    #[source]
    source: serde_json::Error,
}

impl ParseError {
    /// 1-based line of the syntax error.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the syntax error.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}

/// A normalized value that does not match its declared schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("at {path}: expected {expected}, found {found}")]
#[allow(clippy::module_name_repetitions)]
pub struct SchemaError {
    /// Location, e.g. `$[0].StartRoadwayLocation.Latitude`.
    pub path: String,
    /// Expected schema kind.
    pub expected: &'static str,
    /// Observed value kind.
    pub found: &'static str,
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP exchange failed or the API reported an error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The response body is not valid JSON.
    #[error("failed to parse response from {endpoint}")]
    Parse {
        /// Endpoint function name.
        endpoint: String,
        /// Underlying syntax error.
        #[source]
        source: ParseError,
    },

    /// The normalized response does not match the output schema.
    #[error("response from {endpoint} does not match its schema")]
    Schema {
        /// Endpoint function name.
        endpoint: String,
        /// Mismatch detail.
        #[source]
        source: SchemaError,
    },

    /// The normalized response could not be decoded into the requested type.
    #[error("failed to decode response from {endpoint}")]
    Decode {
        /// Endpoint function name.
        endpoint: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A request parameter is missing or malformed.
    #[error("invalid parameter `{name}` for {endpoint}: {reason}")]
    InvalidParam {
        /// Endpoint function name.
        endpoint: String,
        /// Parameter name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No endpoint is registered under this function name.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// The request URL could not be assembled.
    #[error("invalid URL for {endpoint}")]
    Url {
        /// Endpoint function name.
        endpoint: String,
        /// Underlying URL error.
        #[source]
        source: url::ParseError,
    },

    /// A required builder setting is missing.
    #[error("{0} is required")]
    MissingConfig(&'static str),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

impl Error {
    /// Returns the request classification, if this is an HTTP-level error.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Api(e) => Some(e.kind),
            _ => None,
        }
    }
}

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
