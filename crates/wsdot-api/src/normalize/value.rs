//! `NormalizedValue` - a JSON tree with native dates.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// A parsed response in which vendor date strings became dates.
///
/// Objects keep the key order of the source document.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(Number),
    /// A string that is not a recognized date.
    String(String),
    /// A recognized date. `None` when the string had a date shape but no valid instant.
    Date(Option<DateTime<Utc>>),
    /// JSON array.
    Array(Vec<Self>),
    /// JSON object, in source order.
    Object(Vec<(String, Self)>),
}

impl NormalizedValue {
    /// Looks up `key` on an object. Returns `None` for non-objects.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the string if this is a plain string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the date if this is a valid date.
    #[must_use]
    pub const fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(dt) => *dt,
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` for `Null` and for dates that failed to parse.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Date(None))
    }

    /// Short name of the variant, used in schema diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(Some(_)) => "date",
            Self::Date(None) => "null date",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Converts into a `serde_json::Value`, rendering dates as RFC 3339.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Null | Self::Date(None) => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Number(n) => Value::Number(n),
            Self::String(s) => Value::String(s),
            Self::Date(Some(dt)) => Value::String(rfc3339(&dt)),
            Self::Array(items) => Value::Array(items.into_iter().map(Self::into_json).collect()),
            Self::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

fn rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for NormalizedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null | Self::Date(None) => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Date(Some(dt)) => serializer.serialize_str(&rfc3339(dt)),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
