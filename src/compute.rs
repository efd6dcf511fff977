//! Computation registry and built-in computation rules.
//!
//! Computation functions derive a target field from the whole source record
//! rather than a single resolved path. They read whatever sub-fields they
//! need and treat absent ones as empty string / zero instead of failing.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::TransformError;

/// Names whose presence in a character name marks a main character.
const MAIN_CHARACTER_NAMES: [&str; 5] = ["Rick", "Morty", "Summer", "Beth", "Jerry"];

/// Trait for computation functions over the whole source record.
pub trait ComputeFn: Send + Sync {
    fn apply(&self, record: &JsonValue) -> Result<JsonValue, TransformError>;
}

impl<F> ComputeFn for F
where
    F: Fn(&JsonValue) -> Result<JsonValue, TransformError> + Send + Sync,
{
    fn apply(&self, record: &JsonValue) -> Result<JsonValue, TransformError> {
        self(record)
    }
}

/// Registry for storing and applying computation functions.
pub struct ComputationRegistry {
    computations: HashMap<String, Box<dyn ComputeFn>>,
}

impl ComputationRegistry {
    /// Create a new empty computation registry.
    pub fn new() -> Self {
        Self {
            computations: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("is_main_character", Box::new(is_main_character));
        registry.register("generate_display_name", Box::new(generate_display_name));
        registry.register("importance_score", Box::new(importance_score));
        registry
    }

    /// Register a computation function.
    pub fn register(&mut self, name: impl Into<String>, func: Box<dyn ComputeFn>) {
        self.computations.insert(name.into(), func);
    }

    /// Apply a registered computation to the whole source record.
    pub fn apply(&self, name: &str, record: &JsonValue) -> Result<JsonValue, TransformError> {
        let computation = self
            .computations
            .get(name)
            .ok_or_else(|| TransformError::NotFound(name.to_string()))?;

        computation.apply(record)
    }

    /// Check if a computation is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.computations.contains_key(name)
    }

    /// Get all registered computation names.
    pub fn names(&self) -> Vec<String> {
        self.computations.keys().cloned().collect()
    }
}

impl Default for ComputationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn record_str<'a>(record: &'a JsonValue, key: &str) -> &'a str {
    record.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// True when the record's name contains one of the fixed main-character
/// names. The match is a case-sensitive substring check against the source
/// strings.
fn is_main_character(record: &JsonValue) -> Result<JsonValue, TransformError> {
    let name = record_str(record, "name");

    let is_main = MAIN_CHARACTER_NAMES.iter().any(|main| name.contains(main));
    Ok(JsonValue::Bool(is_main))
}

/// `"{name} ({species})"` from the record's name and species.
fn generate_display_name(record: &JsonValue) -> Result<JsonValue, TransformError> {
    let name = record_str(record, "name");
    let species = record_str(record, "species");

    Ok(JsonValue::String(format!("{} ({})", name, species)))
}

/// Count of associated episode sub-records, doubled for names containing
/// "Rick" or "Morty".
fn importance_score(record: &JsonValue) -> Result<JsonValue, TransformError> {
    let episodes = record
        .get("episode")
        .and_then(|v| v.as_array())
        .map(|arr| arr.len())
        .unwrap_or(0) as i64;

    let name = record_str(record, "name");
    let score = if name.contains("Rick") || name.contains("Morty") {
        episodes * 2
    } else {
        episodes
    };

    Ok(JsonValue::from(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_builtins() {
        let registry = ComputationRegistry::with_builtins();

        assert!(registry.contains("is_main_character"));
        assert!(registry.contains("generate_display_name"));
        assert!(registry.contains("importance_score"));
        assert!(!registry.contains("other"));
    }

    #[test]
    fn test_apply_not_found() {
        let registry = ComputationRegistry::new();

        let result = registry.apply("nonexistent", &json!({}));
        assert!(matches!(result, Err(TransformError::NotFound(_))));
    }

    #[test]
    fn test_is_main_character() {
        let registry = ComputationRegistry::with_builtins();

        let rick = json!({"name": "Rick Sanchez"});
        assert_eq!(registry.apply("is_main_character", &rick).unwrap(), json!(true));

        let beth = json!({"name": "Beth Smith"});
        assert_eq!(registry.apply("is_main_character", &beth).unwrap(), json!(true));

        let birdperson = json!({"name": "Birdperson"});
        assert_eq!(registry.apply("is_main_character", &birdperson).unwrap(), json!(false));

        // Substring match is case-sensitive
        let lowercase = json!({"name": "rick sanchez"});
        assert_eq!(registry.apply("is_main_character", &lowercase).unwrap(), json!(false));
    }

    #[test]
    fn test_generate_display_name() {
        let registry = ComputationRegistry::with_builtins();

        let record = json!({"name": "Rick Sanchez", "species": "Human"});
        assert_eq!(
            registry.apply("generate_display_name", &record).unwrap(),
            json!("Rick Sanchez (Human)")
        );
    }

    #[test]
    fn test_generate_display_name_tolerates_absent_fields() {
        let registry = ComputationRegistry::with_builtins();

        assert_eq!(
            registry.apply("generate_display_name", &json!({})).unwrap(),
            json!(" ()")
        );
    }

    #[test]
    fn test_importance_score() {
        let registry = ComputationRegistry::with_builtins();

        let rick = json!({"name": "Rick Sanchez", "episode": ["e1", "e2", "e3"]});
        assert_eq!(registry.apply("importance_score", &rick).unwrap(), json!(6));

        let side = json!({"name": "Birdperson", "episode": ["e1", "e2"]});
        assert_eq!(registry.apply("importance_score", &side).unwrap(), json!(2));

        // Absent episode list counts as zero
        let bare = json!({"name": "Morty Smith"});
        assert_eq!(registry.apply("importance_score", &bare).unwrap(), json!(0));
    }
}
