//! Coercion from loosely-typed values into statically-typed target fields.
//!
//! Field writers call these helpers to convert the transformed JSON value
//! into the field's actual Rust type. Null never reaches a helper; the
//! mapper skips the write entirely for null values, leaving the field at
//! its zero value.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::error::CoercionError;

/// An enumerated target type with case-insensitive name-based parsing.
pub trait CoerceEnum: Sized {
    /// Type name plus variant list, used in error messages
    const EXPECTED: &'static str;

    /// Parse a variant by name, ignoring ASCII case.
    fn from_name(name: &str) -> Option<Self>;
}

/// Coerce to an enumerated type from a textual value.
///
/// Fails when the value is not textual or names no variant.
pub fn enum_value<E: CoerceEnum>(value: &JsonValue) -> Result<E, CoercionError> {
    let name = value.as_str().ok_or_else(|| CoercionError::Incompatible {
        expected: E::EXPECTED,
        value: value.to_string(),
    })?;

    E::from_name(name).ok_or_else(|| CoercionError::EnumParse {
        value: name.to_string(),
        expected: E::EXPECTED,
    })
}

/// Coerce to a string from textual, numeric, or boolean values.
pub fn string(value: &JsonValue) -> Result<String, CoercionError> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(CoercionError::Incompatible {
            expected: "string",
            value: other.to_string(),
        }),
    }
}

/// Coerce to a signed integer.
pub fn int(value: &JsonValue) -> Result<i64, CoercionError> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| CoercionError::Incompatible {
                expected: "integer",
                value: n.to_string(),
            }),
        JsonValue::String(s) => s.parse::<i64>().map_err(|_| CoercionError::Incompatible {
            expected: "integer",
            value: format!("\"{}\"", s),
        }),
        JsonValue::Bool(b) => Ok(if *b { 1 } else { 0 }),
        other => Err(CoercionError::Incompatible {
            expected: "integer",
            value: other.to_string(),
        }),
    }
}

/// Coerce to a float.
pub fn float(value: &JsonValue) -> Result<f64, CoercionError> {
    match value {
        JsonValue::Number(n) => n.as_f64().ok_or_else(|| CoercionError::Incompatible {
            expected: "float",
            value: n.to_string(),
        }),
        JsonValue::String(s) => s.parse::<f64>().map_err(|_| CoercionError::Incompatible {
            expected: "float",
            value: format!("\"{}\"", s),
        }),
        other => Err(CoercionError::Incompatible {
            expected: "float",
            value: other.to_string(),
        }),
    }
}

/// Coerce to a boolean from boolean, textual, or numeric values.
pub fn boolean(value: &JsonValue) -> Result<bool, CoercionError> {
    match value {
        JsonValue::Bool(b) => Ok(*b),
        JsonValue::String(s) => {
            if s.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if s.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(CoercionError::Incompatible {
                    expected: "boolean",
                    value: format!("\"{}\"", s),
                })
            }
        }
        JsonValue::Number(n) => Ok(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        other => Err(CoercionError::Incompatible {
            expected: "boolean",
            value: other.to_string(),
        }),
    }
}

/// Coerce to a UTC timestamp from an RFC 3339 string.
///
/// An unparseable string substitutes the minimum representable timestamp
/// instead of failing the field; a non-string value fails.
pub fn datetime(value: &JsonValue) -> Result<DateTime<Utc>, CoercionError> {
    match value {
        JsonValue::String(s) => Ok(DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)),
        other => Err(CoercionError::Incompatible {
            expected: "datetime",
            value: other.to_string(),
        }),
    }
}
