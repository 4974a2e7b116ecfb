//! Typed client library for the WSDOT traveler information and Washington
//! State Ferries REST APIs.
//!
//! Every endpoint is described once in the [`registry`]: URL template,
//! parameters, output [`schema`], sample parameters and cache strategy. The
//! [`WsdotClient`] fetches an endpoint through a [`fetch`] strategy, runs the
//! body through the [`normalize`]r (vendor dates become real dates, internal
//! vessel-watch fields are dropped) and conforms the result to the schema.

/// Typed access to common endpoints.
pub mod api;

/// Cache strategy presets.
pub mod cache;

/// Registry-driven HTTP client.
pub mod client;

/// Client configuration.
pub mod config;

/// Endpoint metadata and parameters.
pub mod endpoint;

/// Error types.
pub mod error;

/// Native and JSONP transports.
pub mod fetch;

#[cfg(feature = "otel")]
mod metrics;

/// Typed response models.
pub mod models;

/// Response normalization.
pub mod normalize;

/// OpenAPI generation.
pub mod openapi;

/// Endpoint tables.
pub mod registry;

/// Output schemas.
pub mod schema;

pub use api::{LocalWsdotApi, WsdotApi};
pub use cache::{CachePreset, CacheStrategy};
pub use client::{WsdotClient, WsdotClientBuilder};
pub use config::ClientConfig;
pub use endpoint::{ApiFamily, Endpoint, Params};
pub use error::{ApiError, Error, ErrorKind, ParseError, Result, SchemaError};
pub use fetch::Strategy;
pub use normalize::{NormalizedValue, normalize};
pub use registry::{all_endpoints, endpoints_for, find_endpoint};
