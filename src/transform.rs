//! Transformation registry and built-in transformation rules.
//!
//! Transformation functions are pure `raw value -> transformed value`
//! functions registered by name and applied per field rule. Registration
//! happens at setup time, before mapping calls begin; application only
//! takes `&self`, so a built registry is safe to share across threads.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::TransformError;

/// Trait for transformation functions.
///
/// Transforms receive the raw resolved value (never null; the mapper skips
/// the transformation step for absent values) and return any JSON value.
pub trait TransformFn: Send + Sync {
    fn apply(&self, value: &JsonValue) -> Result<JsonValue, TransformError>;
}

impl<F> TransformFn for F
where
    F: Fn(&JsonValue) -> Result<JsonValue, TransformError> + Send + Sync,
{
    fn apply(&self, value: &JsonValue) -> Result<JsonValue, TransformError> {
        self(value)
    }
}

/// Registry for storing and applying transformation functions.
pub struct TransformRegistry {
    transforms: HashMap<String, Box<dyn TransformFn>>,
}

impl TransformRegistry {
    /// Create a new empty transform registry.
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("status_to_lifestatus", Box::new(status_to_lifestatus));
        registry.register("gender_mapping", Box::new(gender_mapping));
        registry.register("default_if_empty", Box::new(default_if_empty));
        registry.register("extract_season", Box::new(extract_season));
        registry.register("array_count", Box::new(array_count));
        registry
    }

    /// Register a transformation function.
    ///
    /// # Example
    ///
    /// ```
    /// use mapforge::{TransformRegistry, TransformFn};
    /// use serde_json::{json, Value};
    ///
    /// let mut registry = TransformRegistry::new();
    /// registry.register("uppercase", Box::new(|value: &Value| {
    ///     Ok(json!(value.as_str().unwrap_or_default().to_uppercase()))
    /// }) as Box<dyn TransformFn>);
    /// ```
    pub fn register(&mut self, name: impl Into<String>, func: Box<dyn TransformFn>) {
        self.transforms.insert(name.into(), func);
    }

    /// Apply a registered transformation to a raw value.
    pub fn apply(&self, name: &str, value: &JsonValue) -> Result<JsonValue, TransformError> {
        let transform = self
            .transforms
            .get(name)
            .ok_or_else(|| TransformError::NotFound(name.to_string()))?;

        transform.apply(value)
    }

    /// Check if a transformation is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Get all registered transformation names.
    pub fn names(&self) -> Vec<String> {
        self.transforms.keys().cloned().collect()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive "alive"/"dead" to life-status names; anything else maps
/// to "Unknown".
fn status_to_lifestatus(value: &JsonValue) -> Result<JsonValue, TransformError> {
    let status = match value.as_str() {
        Some(s) => s,
        None => return Ok(JsonValue::String("Unknown".to_string())),
    };

    let mapped = if status.eq_ignore_ascii_case("alive") {
        "Alive"
    } else if status.eq_ignore_ascii_case("dead") {
        "Dead"
    } else {
        "Unknown"
    };

    Ok(JsonValue::String(mapped.to_string()))
}

/// Case-insensitive "male"/"female"/"genderless" to gender names; anything
/// else maps to "Unknown".
fn gender_mapping(value: &JsonValue) -> Result<JsonValue, TransformError> {
    let gender = match value.as_str() {
        Some(s) => s,
        None => return Ok(JsonValue::String("Unknown".to_string())),
    };

    let mapped = if gender.eq_ignore_ascii_case("male") {
        "Male"
    } else if gender.eq_ignore_ascii_case("female") {
        "Female"
    } else if gender.eq_ignore_ascii_case("genderless") {
        "Genderless"
    } else {
        "Unknown"
    };

    Ok(JsonValue::String(mapped.to_string()))
}

/// Empty or null string becomes the literal "Standard"; everything else
/// passes through unchanged.
fn default_if_empty(value: &JsonValue) -> Result<JsonValue, TransformError> {
    match value {
        JsonValue::Null => Ok(JsonValue::String("Standard".to_string())),
        JsonValue::String(s) if s.is_empty() => Ok(JsonValue::String("Standard".to_string())),
        other => Ok(other.clone()),
    }
}

/// Extract a "Season {n}" label from an episode code of the shape
/// `S<season>E<episode>` (e.g. `S01E01` -> `Season 1`).
///
/// A code without a leading `S` or without an `E`, and a code whose season
/// segment does not parse as an integer, both yield "Unknown".
fn extract_season(value: &JsonValue) -> Result<JsonValue, TransformError> {
    let code = match value.as_str() {
        Some(s) => s,
        None => return Ok(JsonValue::String("Unknown".to_string())),
    };

    let label = if code.starts_with('S') {
        match code.find('E') {
            Some(e_pos) => match code[1..e_pos].parse::<i64>() {
                Ok(season) => format!("Season {}", season),
                Err(_) => "Unknown".to_string(),
            },
            None => "Unknown".to_string(),
        }
    } else {
        "Unknown".to_string()
    };

    Ok(JsonValue::String(label))
}

/// Element count of an ordered sequence; 0 for any non-sequence value.
fn array_count(value: &JsonValue) -> Result<JsonValue, TransformError> {
    let count = value.as_array().map(|arr| arr.len()).unwrap_or(0);
    Ok(JsonValue::from(count as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_apply() {
        let mut registry = TransformRegistry::new();

        registry.register(
            "uppercase",
            Box::new(|value: &JsonValue| {
                let text = value.as_str().ok_or_else(|| {
                    TransformError::Execution("expected a string".to_string())
                })?;
                Ok(json!(text.to_uppercase()))
            }) as Box<dyn TransformFn>,
        );

        let result = registry.apply("uppercase", &json!("hello")).unwrap();
        assert_eq!(result, json!("HELLO"));
    }

    #[test]
    fn test_apply_not_found() {
        let registry = TransformRegistry::new();

        let result = registry.apply("nonexistent", &json!("x"));
        assert!(matches!(result, Err(TransformError::NotFound(_))));
    }

    #[test]
    fn test_with_builtins() {
        let registry = TransformRegistry::with_builtins();

        assert!(registry.contains("status_to_lifestatus"));
        assert!(registry.contains("gender_mapping"));
        assert!(registry.contains("default_if_empty"));
        assert!(registry.contains("extract_season"));
        assert!(registry.contains("array_count"));
        assert!(!registry.contains("other"));
    }

    #[test]
    fn test_status_to_lifestatus() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(
            registry.apply("status_to_lifestatus", &json!("Alive")).unwrap(),
            json!("Alive")
        );
        assert_eq!(
            registry.apply("status_to_lifestatus", &json!("DEAD")).unwrap(),
            json!("Dead")
        );
        assert_eq!(
            registry
                .apply("status_to_lifestatus", &json!("unknown-value"))
                .unwrap(),
            json!("Unknown")
        );
        assert_eq!(
            registry.apply("status_to_lifestatus", &json!(42)).unwrap(),
            json!("Unknown")
        );
    }

    #[test]
    fn test_gender_mapping() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(registry.apply("gender_mapping", &json!("MALE")).unwrap(), json!("Male"));
        assert_eq!(registry.apply("gender_mapping", &json!("female")).unwrap(), json!("Female"));
        assert_eq!(
            registry.apply("gender_mapping", &json!("Genderless")).unwrap(),
            json!("Genderless")
        );
        assert_eq!(registry.apply("gender_mapping", &json!("robot")).unwrap(), json!("Unknown"));
    }

    #[test]
    fn test_default_if_empty() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(registry.apply("default_if_empty", &json!("")).unwrap(), json!("Standard"));
        assert_eq!(
            registry.apply("default_if_empty", &JsonValue::Null).unwrap(),
            json!("Standard")
        );
        assert_eq!(
            registry.apply("default_if_empty", &json!("Planet")).unwrap(),
            json!("Planet")
        );
    }

    #[test]
    fn test_extract_season() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(registry.apply("extract_season", &json!("S01E01")).unwrap(), json!("Season 1"));
        assert_eq!(registry.apply("extract_season", &json!("S03E07")).unwrap(), json!("Season 3"));
        assert_eq!(registry.apply("extract_season", &json!("weird")).unwrap(), json!("Unknown"));
    }

    #[test]
    fn test_extract_season_malformed_codes() {
        let registry = TransformRegistry::with_builtins();

        // No E separator
        assert_eq!(registry.apply("extract_season", &json!("S0101")).unwrap(), json!("Unknown"));
        // E present but season segment is not numeric
        assert_eq!(registry.apply("extract_season", &json!("SxxE01")).unwrap(), json!("Unknown"));
        // Not a string at all
        assert_eq!(registry.apply("extract_season", &json!(101)).unwrap(), json!("Unknown"));
    }

    #[test]
    fn test_array_count() {
        let registry = TransformRegistry::with_builtins();

        assert_eq!(registry.apply("array_count", &json!(["a", "b", "c"])).unwrap(), json!(3));
        assert_eq!(registry.apply("array_count", &json!([])).unwrap(), json!(0));
        assert_eq!(registry.apply("array_count", &json!(42)).unwrap(), json!(0));
        assert_eq!(registry.apply("array_count", &json!("abc")).unwrap(), json!(0));
    }
}
