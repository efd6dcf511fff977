//! Loosely-typed source records and dotted-path resolution.
//!
//! Source records arrive as already-deserialized, untyped trees whose shape
//! is not known at compile time. This module abstracts the concrete
//! representation behind [`SourceValue`] so the resolver and transformation
//! functions never branch on it.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value as JsonValue;

/// A dot-delimited path to a field in a loosely-typed record.
///
/// # Examples
///
/// - `name` - Top-level field
/// - `origin.name` - Nested field
///
/// The resolver only performs plain key lookups; array indices and wildcards
/// are not interpreted (array-aware rules receive the whole array value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// The raw path string
    pub raw: String,
    /// Parsed path segments
    pub segments: Vec<String>,
}

impl FieldPath {
    /// Parse a field path with a given delimiter.
    pub fn parse(path: &str, delimiter: &str) -> Self {
        let segments = path
            .split(delimiter)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        Self {
            raw: path.to_string(),
            segments,
        }
    }

    /// Create a field path from a dotted string (the profile format).
    pub fn from_dotted(path: &str) -> Self {
        Self::parse(path, ".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Uniform "get child by key, or absent" access over loosely-typed data.
///
/// Implemented for the two representations callers actually hand us: a
/// parsed document tree (`serde_json::Value`) and a plain string-keyed map.
/// Adapters stay thin so the resolver works the same over both.
pub trait SourceValue {
    /// Get a child node by key, or `None` if the key is absent or this node
    /// is not an object.
    fn child(&self, key: &str) -> Option<&dyn SourceValue>;

    /// Whether this node is an explicit null.
    fn is_null(&self) -> bool;

    /// Coerce this node to a plain JSON value.
    fn to_json(&self) -> JsonValue;
}

impl SourceValue for JsonValue {
    fn child(&self, key: &str) -> Option<&dyn SourceValue> {
        match self {
            JsonValue::Object(map) => map.get(key).map(|v| v as &dyn SourceValue),
            _ => None,
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    fn to_json(&self) -> JsonValue {
        self.clone()
    }
}

impl SourceValue for HashMap<String, JsonValue> {
    fn child(&self, key: &str) -> Option<&dyn SourceValue> {
        self.get(key).map(|v| v as &dyn SourceValue)
    }

    fn is_null(&self) -> bool {
        false
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// Resolve a dotted path against a loosely-typed root.
///
/// Walks the segments left to right. Reaching a missing or null node at any
/// step (including the last) yields `None` rather than an error; the
/// returned value is never JSON null.
pub fn resolve(root: &dyn SourceValue, path: &FieldPath) -> Option<JsonValue> {
    let mut current: &dyn SourceValue = root;

    for segment in &path.segments {
        if current.is_null() {
            return None;
        }
        current = current.child(segment)?;
    }

    if current.is_null() {
        None
    } else {
        Some(current.to_json())
    }
}
