//! Declarative output schemas.
//!
//! Schemas are plain `const` data so the registry can be a static table and
//! the OpenAPI generator can map them without touching a validator.

use chrono::{DateTime, Utc};

use crate::error::SchemaError;
use crate::normalize::{DateFormat, DateParse, NormalizedValue};

/// Shape of a response value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Any string.
    String,
    /// A whole number.
    Integer,
    /// Any number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// A date produced by the normalizer (or coercible into one).
    Date,
    /// The inner schema, or `null`. Nullable object fields may also be absent.
    Nullable(&'static Self),
    /// A homogeneous array.
    Array(&'static Self),
    /// An object with the listed fields; undeclared fields are kept.
    Object(&'static [Field]),
}

/// One declared object field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// JSON key.
    pub name: &'static str,
    /// Value schema.
    pub schema: Schema,
}

/// Builds a `&'static [Field]` for [`Schema::Object`].
///
/// Expands to struct literals so the slice is promoted to `'static`.
macro_rules! fields {
    ($($name:literal: $schema:expr),* $(,)?) => {
        &[$($crate::schema::Field { name: $name, schema: $schema }),*]
    };
}
pub(crate) use fields;

impl Schema {
    /// Kind name used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Nullable(_) => "nullable",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Returns `true` if `null` (or an absent field) is acceptable.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Validates `value` against this schema and applies coercions.
    ///
    /// Strings in `Date` positions are converted when they match a vendor
    /// date shape or RFC 3339. Absent nullable fields are inserted as `null`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] pointing at the first mismatch.
    pub fn conform(&self, value: NormalizedValue) -> Result<NormalizedValue, SchemaError> {
        self.conform_at(value, "$")
    }

    fn conform_at(
        &self,
        value: NormalizedValue,
        path: &str,
    ) -> Result<NormalizedValue, SchemaError> {
        let mismatch = |found: &'static str| SchemaError {
            path: String::from(path),
            expected: self.kind(),
            found,
        };

        match (self, value) {
            (Self::Nullable(_), v) if v.is_null() => Ok(v),
            (Self::Nullable(inner), v) => inner.conform_at(v, path),
            (Self::String, v @ NormalizedValue::String(_))
            | (Self::Boolean, v @ NormalizedValue::Bool(_))
            | (Self::Date, v @ NormalizedValue::Date(_)) => Ok(v),
            (Self::Number, NormalizedValue::Number(n)) => Ok(NormalizedValue::Number(n)),
            (Self::Integer, NormalizedValue::Number(n)) if n.is_i64() || n.is_u64() => {
                Ok(NormalizedValue::Number(n))
            }
            (Self::Date, NormalizedValue::String(s)) => match coerce_date(&s) {
                DateParse::Parsed(dt) => Ok(NormalizedValue::Date(Some(dt))),
                DateParse::Invalid => {
                    tracing::debug!(path, value = %s, "Unparseable date replaced with null");
                    Ok(NormalizedValue::Date(None))
                }
                DateParse::Unrecognized => Err(mismatch("string")),
            },
            (Self::Array(item), NormalizedValue::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| item.conform_at(v, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(NormalizedValue::Array),
            (Self::Object(fields), NormalizedValue::Object(entries)) => {
                conform_object(fields, entries, path).map(NormalizedValue::Object)
            }
            (_, v) => Err(mismatch(v.kind())),
        }
    }
}

fn conform_object(
    fields: &[Field],
    mut entries: Vec<(String, NormalizedValue)>,
    path: &str,
) -> Result<Vec<(String, NormalizedValue)>, SchemaError> {
    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        match entries.iter().position(|(k, _)| k == field.name) {
            Some(index) => {
                let slot = entries.get_mut(index).map(|(_, v)| v);
                if let Some(slot) = slot {
                    let value = std::mem::replace(slot, NormalizedValue::Null);
                    *slot = field.schema.conform_at(value, &field_path)?;
                }
            }
            None if field.schema.is_nullable() => {
                entries.push((String::from(field.name), NormalizedValue::Null));
            }
            None => {
                return Err(SchemaError {
                    path: field_path,
                    expected: field.schema.kind(),
                    found: "nothing",
                });
            }
        }
    }
    Ok(entries)
}

/// Tries RFC 3339, then every vendor shape.
///
/// `Invalid` means some vendor shape matched but the value is not a real date.
fn coerce_date(s: &str) -> DateParse {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return DateParse::Parsed(dt.with_timezone(&Utc));
    }
    [DateFormat::EpochWrapper, DateFormat::UsDateTime, DateFormat::UsDate]
        .into_iter()
        .map(|format| format.parse(s))
        .fold(DateParse::Unrecognized, |best, next| match (best, next) {
            (DateParse::Unrecognized, _) | (DateParse::Invalid, DateParse::Parsed(_)) => next,
            _ => best,
        })
}
