//! Response normalization.
//!
//! Parses raw response text and rewrites it into a [`NormalizedValue`]:
//! excluded vessel-watch fields are dropped at every depth, strings under
//! registered field names go through that field's date parser, and any
//! other string in the `/Date(ms)/` shape becomes a date. Everything else is
//! passed through unchanged.

mod dates;
mod fields;
mod value;

use serde_json::Value;

use crate::error::ParseError;

pub use dates::{
    DateFormat, DateParse, parse_epoch_wrapper, parse_us_date, parse_us_datetime,
    to_epoch_wrapper,
};
pub use fields::{EXCLUDED_FIELDS, date_format_for, is_excluded};
pub use value::NormalizedValue;

/// Parses `text` and normalizes the result.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the line and column if `text` is not valid JSON.
pub fn normalize(text: &str) -> Result<NormalizedValue, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(normalize_value(value))
}

/// Normalizes an already-parsed JSON value.
#[must_use]
pub fn normalize_value(value: Value) -> NormalizedValue {
    revive(None, value)
}

fn revive(key: Option<&str>, value: Value) -> NormalizedValue {
    match value {
        Value::Null => NormalizedValue::Null,
        Value::Bool(b) => NormalizedValue::Bool(b),
        Value::Number(n) => NormalizedValue::Number(n),
        Value::String(s) => revive_string(key, s),
        // Array elements have no field name, so only the generic sniff applies.
        Value::Array(items) => {
            NormalizedValue::Array(items.into_iter().map(|v| revive(None, v)).collect())
        }
        Value::Object(map) => NormalizedValue::Object(
            map.into_iter()
                .filter(|(k, _)| !is_excluded(k))
                .map(|(k, v)| {
                    let revived = revive(Some(&k), v);
                    (k, revived)
                })
                .collect(),
        ),
    }
}

fn revive_string(key: Option<&str>, s: String) -> NormalizedValue {
    let format = key
        .and_then(date_format_for)
        .unwrap_or(DateFormat::EpochWrapper);

    match format.parse(&s) {
        DateParse::Parsed(dt) => NormalizedValue::Date(Some(dt)),
        DateParse::Invalid => {
            tracing::debug!(
                field = key.unwrap_or("-"),
                value = %s,
                ?format,
                "Unparseable date, substituting null"
            );
            NormalizedValue::Date(None)
        }
        DateParse::Unrecognized => NormalizedValue::String(s),
    }
}
