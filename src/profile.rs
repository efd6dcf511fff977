//! Mapping profile model and configuration loader.
//!
//! A profile set is loaded once at startup from a YAML file (or an already
//! parsed JSON document) and is immutable afterwards. Key matching on load
//! is case-insensitive and unknown keys are ignored, so payloads written for
//! newer engine versions still load. There are no partial loads: any
//! malformed profile aborts the whole load.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::error::MappingError;

/// One target field's population rule.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Dot-delimited path into the source record
    pub source_field: String,
    /// Writable field name on the target type
    pub target_field: String,
    /// Advisory declared type; coercion is driven by the target field's
    /// actual type, not this
    pub data_type: Option<String>,
    /// Name of a registered transformation function
    pub transformation_rule: Option<String>,
    /// Substituted when the rule is not required and the field fails
    pub default_value: Option<JsonValue>,
    /// Defaults to true
    pub is_required: bool,
    /// Reserved; declared in payloads but not enforced by the engine
    pub validation_rule: Option<String>,
}

/// A target field derived from the whole source record via a named function.
#[derive(Debug, Clone)]
pub struct ComputedFieldRule {
    pub field_name: String,
    pub computation_rule: String,
    pub data_type: Option<String>,
    /// Informational only; no dependency graph is built from these
    pub dependent_fields: Vec<String>,
}

/// One named transformation from a source shape to one target entity type.
#[derive(Debug, Clone)]
pub struct EntityMapping {
    /// Target type identifier, used only for diagnostics
    pub target_type: String,
    /// Field rules keyed by rule name (unique within the profile)
    pub fields: IndexMap<String, FieldRule>,
    /// Applied in declared order, strictly after regular fields
    pub computed_fields: Vec<ComputedFieldRule>,
}

/// The loaded set of named mapping profiles.
///
/// Built once at process start; read-only during mapping calls.
#[derive(Debug, Clone, Default)]
pub struct MappingProfileSet {
    profiles: IndexMap<String, EntityMapping>,
}

impl MappingProfileSet {
    /// Load a profile set from a YAML file.
    ///
    /// # Errors
    /// Returns `MappingError::Configuration` if the file cannot be read or
    /// the payload does not parse into the expected shape.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MappingError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| {
            MappingError::Configuration(format!(
                "Failed to read mapping config {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::load_from_str(&contents)
    }

    /// Load a profile set from a YAML string.
    pub fn load_from_str(contents: &str) -> Result<Self, MappingError> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(contents)
            .map_err(|e| MappingError::Configuration(format!("Failed to parse YAML: {}", e)))?;

        let json = serde_json::to_value(yaml).map_err(|e| {
            MappingError::Configuration(format!("Failed to convert config payload: {}", e))
        })?;

        Self::load_from_value(&json)
    }

    /// Load a profile set from an already parsed document.
    ///
    /// The payload must carry a top-level `mappings` object; each entry maps
    /// a profile name to `targetType`, `fields`, and `computedFields`.
    pub fn load_from_value(payload: &JsonValue) -> Result<Self, MappingError> {
        let root = payload.as_object().ok_or_else(|| {
            MappingError::Configuration("Config payload must be an object".to_string())
        })?;

        let mappings = get_ci(root, "mappings")
            .ok_or_else(|| {
                MappingError::Configuration("Config missing 'mappings' object".to_string())
            })?
            .as_object()
            .ok_or_else(|| {
                MappingError::Configuration("'mappings' must be an object".to_string())
            })?;

        let mut profiles = IndexMap::new();

        for (profile_name, entry) in mappings {
            let mapping = parse_entity_mapping(profile_name, entry)?;
            profiles.insert(profile_name.clone(), mapping);
        }

        Ok(Self { profiles })
    }

    /// Get a profile by name.
    pub fn get(&self, name: &str) -> Option<&EntityMapping> {
        self.profiles.get(name)
    }

    /// Check if a profile is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Get all loaded profile names.
    pub fn profile_names(&self) -> Vec<&String> {
        self.profiles.keys().collect()
    }

    /// Number of loaded profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn parse_entity_mapping(profile_name: &str, entry: &JsonValue) -> Result<EntityMapping, MappingError> {
    let obj = entry.as_object().ok_or_else(|| {
        MappingError::Configuration(format!("Profile '{}' must be an object", profile_name))
    })?;

    let target_type = get_ci(obj, "targetType")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let mut fields = IndexMap::new();
    if let Some(fields_value) = get_ci(obj, "fields") {
        let fields_obj = fields_value.as_object().ok_or_else(|| {
            MappingError::Configuration(format!(
                "Profile '{}': 'fields' must be an object",
                profile_name
            ))
        })?;

        for (rule_name, rule_value) in fields_obj {
            let rule = parse_field_rule(profile_name, rule_name, rule_value)?;
            fields.insert(rule_name.clone(), rule);
        }
    }

    let mut computed_fields = Vec::new();
    if let Some(computed_value) = get_ci(obj, "computedFields") {
        let computed_arr = computed_value.as_array().ok_or_else(|| {
            MappingError::Configuration(format!(
                "Profile '{}': 'computedFields' must be a sequence",
                profile_name
            ))
        })?;

        for (idx, entry) in computed_arr.iter().enumerate() {
            computed_fields.push(parse_computed_rule(profile_name, idx, entry)?);
        }
    }

    Ok(EntityMapping {
        target_type,
        fields,
        computed_fields,
    })
}

fn parse_field_rule(
    profile_name: &str,
    rule_name: &str,
    value: &JsonValue,
) -> Result<FieldRule, MappingError> {
    let obj = value.as_object().ok_or_else(|| {
        MappingError::Configuration(format!(
            "Profile '{}', rule '{}': field rule must be an object",
            profile_name, rule_name
        ))
    })?;

    let source_field = require_string(obj, "sourceField", profile_name, rule_name)?;
    let target_field = require_string(obj, "targetField", profile_name, rule_name)?;

    Ok(FieldRule {
        source_field,
        target_field,
        data_type: optional_string(obj, "dataType"),
        transformation_rule: optional_string(obj, "transformationRule"),
        default_value: get_ci(obj, "defaultValue").cloned(),
        is_required: get_ci(obj, "isRequired")
            .and_then(|v| v.as_bool())
            .unwrap_or(true),
        validation_rule: optional_string(obj, "validationRule"),
    })
}

fn parse_computed_rule(
    profile_name: &str,
    idx: usize,
    value: &JsonValue,
) -> Result<ComputedFieldRule, MappingError> {
    let obj = value.as_object().ok_or_else(|| {
        MappingError::Configuration(format!(
            "Profile '{}': computed field #{} must be an object",
            profile_name, idx
        ))
    })?;

    let field_name = get_ci(obj, "fieldName")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            MappingError::Configuration(format!(
                "Profile '{}': computed field #{} missing 'fieldName'",
                profile_name, idx
            ))
        })?
        .to_string();

    let computation_rule = get_ci(obj, "computationRule")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            MappingError::Configuration(format!(
                "Profile '{}': computed field '{}' missing 'computationRule'",
                profile_name, field_name
            ))
        })?
        .to_string();

    let dependent_fields = get_ci(obj, "dependentFields")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(ComputedFieldRule {
        field_name,
        computation_rule,
        data_type: optional_string(obj, "dataType"),
        dependent_fields,
    })
}

/// Case-insensitive key lookup over a payload object.
fn get_ci<'a>(map: &'a serde_json::Map<String, JsonValue>, key: &str) -> Option<&'a JsonValue> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn optional_string(map: &serde_json::Map<String, JsonValue>, key: &str) -> Option<String> {
    get_ci(map, key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn require_string(
    map: &serde_json::Map<String, JsonValue>,
    key: &str,
    profile_name: &str,
    rule_name: &str,
) -> Result<String, MappingError> {
    get_ci(map, key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            MappingError::Configuration(format!(
                "Profile '{}', rule '{}': missing '{}'",
                profile_name, rule_name, key
            ))
        })
}
