//! Endpoint metadata and request parameters.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cache::CacheStrategy;
use crate::error::{Error, Result};
use crate::schema::Schema;

/// Default base URL of the WSDOT traveler information APIs.
pub const WSDOT_BASE_URL: &str = "https://wsdot.wa.gov/Traffic/api/";

/// Default base URL of the Washington State Ferries APIs.
pub const WSF_BASE_URL: &str = "https://www.wsdot.wa.gov/ferries/api/";

/// Upstream API family. Each has its own base URL and access-code parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFamily {
    /// WSDOT traveler information (`/Traffic/api`).
    Wsdot,
    /// Washington State Ferries (`/ferries/api`).
    Wsf,
}

impl ApiFamily {
    /// Both families.
    pub const ALL: [Self; 2] = [Self::Wsdot, Self::Wsf];

    /// Name of the query parameter carrying the access code.
    #[must_use]
    pub const fn access_code_param(self) -> &'static str {
        match self {
            Self::Wsdot => "AccessCode",
            Self::Wsf => "apiaccesscode",
        }
    }

    /// Default base URL.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Wsdot => WSDOT_BASE_URL,
            Self::Wsf => WSF_BASE_URL,
        }
    }

    /// Human-readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Wsdot => "WSDOT Traveler Information API",
            Self::Wsf => "Washington State Ferries API",
        }
    }

    /// Lowercase tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wsdot => "wsdot",
            Self::Wsf => "wsf",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown API family: {s} (expected wsdot or wsf)"))
    }
}

/// Accepted format of a request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Decimal integer.
    Integer,
    /// Free text.
    String,
    /// `true` or `false`.
    Boolean,
    /// `YYYY-MM-DD`.
    Date,
}

impl ParamKind {
    /// Checks `value`, returning a reason on failure.
    fn check(self, value: &str) -> Result<(), String> {
        match self {
            Self::Integer => value
                .parse::<i64>()
                .map(drop)
                .map_err(|_| format!("expected an integer, got {value:?}")),
            Self::String if value.is_empty() => Err(String::from("must not be empty")),
            Self::String => Ok(()),
            Self::Boolean => match value {
                "true" | "false" => Ok(()),
                _ => Err(format!("expected true or false, got {value:?}")),
            },
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(drop)
                .map_err(|_| format!("expected a YYYY-MM-DD date, got {value:?}")),
        }
    }
}

/// One declared request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Placeholder name in the path template.
    pub name: &'static str,
    /// Accepted format.
    pub kind: ParamKind,
    /// What the parameter selects.
    pub description: &'static str,
}

/// Example parameters, used for documentation and sample requests only.
#[derive(Debug, Clone, Copy)]
pub enum SampleParams {
    /// The endpoint takes no parameters.
    None,
    /// Fixed values.
    Literal(&'static [(&'static str, &'static str)]),
    /// Values that depend on the current date.
    Computed(fn() -> Params),
}

/// Request parameters, keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a parameter in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.insert(name.into(), value.to_string());
    }

    /// Returns the value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Static description of one upstream endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    /// Upstream family.
    pub api: ApiFamily,
    /// Stable camelCase identifier, also the OpenAPI `operationId`.
    pub function_name: &'static str,
    /// Path relative to the family base URL, with `{name}` placeholders.
    pub path_template: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Input schema.
    pub params: &'static [ParamSpec],
    /// Output schema.
    pub output: Schema,
    /// Example parameters.
    pub sample: SampleParams,
    /// Freshness preset.
    pub cache: CacheStrategy,
}

impl Endpoint {
    /// Placeholder names in template order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&'static str> {
        placeholders(self.path_template)
    }

    /// Returns the declaration of `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Checks that every declared parameter is present and well-formed.
    ///
    /// Parameters that are not declared are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] for the first missing or malformed value.
    pub fn validate_params(&self, params: &Params) -> Result<()> {
        for spec in self.params {
            let value = params
                .get(spec.name)
                .ok_or_else(|| self.invalid_param(spec.name, "is required"))?;
            spec.kind
                .check(value)
                .map_err(|reason| self.invalid_param(spec.name, reason))?;
        }
        Ok(())
    }

    /// Substitutes every placeholder with its percent-encoded value.
    ///
    /// Path placeholders encode a space as `%20`; query placeholders use
    /// form encoding (`+`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if validation fails or a placeholder
    /// has no value.
    pub fn render_path(&self, params: &Params) -> Result<String> {
        self.validate_params(params)?;

        let mut rendered = String::with_capacity(self.path_template.len());
        let mut rest = self.path_template;
        while let Some(open) = rest.find('{') {
            let (before, after) = rest.split_at(open);
            rendered.push_str(before);
            let Some(close) = after.find('}') else {
                rendered.push_str(after);
                return Ok(rendered);
            };
            let name = after.get(1..close).unwrap_or_default();
            let value = params
                .get(name)
                .ok_or_else(|| self.invalid_param(name, "is required"))?;
            let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
            if rendered.contains('?') {
                rendered.push_str(&encoded);
            } else {
                // A literal `+` is already `%2B`, so every `+` here is a space.
                rendered.push_str(&encoded.replace('+', "%20"));
            }
            rest = after.get(close.saturating_add(1)..).unwrap_or_default();
        }
        rendered.push_str(rest);
        Ok(rendered)
    }

    /// Returns the example parameters, if any.
    #[must_use]
    pub fn sample_params(&self) -> Params {
        match self.sample {
            SampleParams::None => Params::new(),
            SampleParams::Literal(pairs) => pairs.iter().copied().collect(),
            SampleParams::Computed(build) => build(),
        }
    }

    fn invalid_param(&self, name: &str, reason: impl Into<String>) -> Error {
        Error::InvalidParam {
            endpoint: String::from(self.function_name),
            name: String::from(name),
            reason: reason.into(),
        }
    }
}

/// Extracts `{name}` placeholders from a template.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(after) = rest.get(open.saturating_add(1)..) else {
            break;
        };
        let Some(close) = after.find('}') else {
            break;
        };
        if let Some(name) = after.get(..close) {
            names.push(name);
        }
        rest = after.get(close.saturating_add(1)..).unwrap_or_default();
    }
    names
}
