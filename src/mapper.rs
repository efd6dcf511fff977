//! Entity mapper orchestration.
//!
//! `EntityMapper` ties the profile store, the two function registries, and
//! the per-type field tables together. A mapping call is single-pass and
//! synchronous: resolve each field rule's source path, transform, coerce,
//! write; then apply computed fields in declared order on top. Every
//! failure below the profile lookup is absorbed per-field, so the call
//! either returns a populated entity or fails with profile-not-found.

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::compute::ComputationRegistry;
use crate::error::{FieldFailure, FieldFailureKind, MappingError};
use crate::profile::{ComputedFieldRule, FieldRule, MappingProfileSet};
use crate::source::{self, FieldPath};
use crate::target::{FieldTable, MapTarget};
use crate::transform::TransformRegistry;

/// Configuration-driven mapper from loosely-typed records to typed entities.
///
/// Holds no implicit global state: profiles and registries are constructed
/// once, passed in explicitly, and only read during mapping calls, so
/// concurrent calls against a built mapper are safe.
pub struct EntityMapper {
    profiles: MappingProfileSet,
    transforms: TransformRegistry,
    computations: ComputationRegistry,
}

impl EntityMapper {
    /// Create a mapper from a loaded profile set and populated registries.
    pub fn new(
        profiles: MappingProfileSet,
        transforms: TransformRegistry,
        computations: ComputationRegistry,
    ) -> Self {
        Self {
            profiles,
            transforms,
            computations,
        }
    }

    /// Create a mapper with the built-in transformation and computation
    /// rules.
    pub fn with_builtins(profiles: MappingProfileSet) -> Self {
        Self::new(
            profiles,
            TransformRegistry::with_builtins(),
            ComputationRegistry::with_builtins(),
        )
    }

    /// The loaded profile set.
    pub fn profiles(&self) -> &MappingProfileSet {
        &self.profiles
    }

    /// Map a source record into a fresh `T` using a named profile.
    ///
    /// Per-field failures are recovered locally (logged, default substituted
    /// where the rule allows, zero value otherwise); only an unknown profile
    /// name fails the call.
    ///
    /// # Errors
    /// `MappingError::ProfileNotFound` when no profile with the given name
    /// is loaded.
    pub fn map_entity<T: MapTarget>(
        &self,
        source: &JsonValue,
        profile_name: &str,
    ) -> Result<T, MappingError> {
        let (entity, _failures) = self.map_entity_with_report(source, profile_name)?;
        Ok(entity)
    }

    /// Map a source record and also return the recovered per-field failures.
    ///
    /// The entity is identical to what [`map_entity`](Self::map_entity)
    /// produces; the report exists so callers and tests can observe the
    /// recovery policy without capturing logs.
    pub fn map_entity_with_report<T: MapTarget>(
        &self,
        source: &JsonValue,
        profile_name: &str,
    ) -> Result<(T, Vec<FieldFailure>), MappingError> {
        let mapping = self
            .profiles
            .get(profile_name)
            .ok_or_else(|| MappingError::ProfileNotFound(profile_name.to_string()))?;

        let table = T::field_table();
        let mut entity = T::default();
        let mut failures = Vec::new();

        for (rule_name, rule) in &mapping.fields {
            if let Some(failure) = self.apply_field_rule(&table, &mut entity, source, rule) {
                warn!(
                    profile = profile_name,
                    rule = rule_name.as_str(),
                    target_type = T::TYPE_NAME,
                    "{}",
                    failure
                );
                failures.push(failure);
            }
        }

        // Computed fields run strictly after regular fields and may
        // overwrite them.
        for computed in &mapping.computed_fields {
            if let Some(failure) = self.apply_computed_rule(&table, &mut entity, source, computed) {
                warn!(
                    profile = profile_name,
                    target_type = T::TYPE_NAME,
                    "{}",
                    failure
                );
                failures.push(failure);
            }
        }

        debug!(
            profile = profile_name,
            target_type = T::TYPE_NAME,
            recovered_failures = failures.len(),
            "mapped entity"
        );

        Ok((entity, failures))
    }

    fn apply_field_rule<T>(
        &self,
        table: &FieldTable<T>,
        entity: &mut T,
        source: &JsonValue,
        rule: &FieldRule,
    ) -> Option<FieldFailure> {
        let path = FieldPath::from_dotted(&rule.source_field);

        let raw = match source::resolve(source, &path) {
            Some(value) => value,
            None => {
                return self.fall_back(
                    table,
                    entity,
                    rule,
                    FieldFailureKind::PathAbsent,
                    format!("source path '{}' is absent", rule.source_field),
                );
            }
        };

        let transformed = match &rule.transformation_rule {
            Some(name) if self.transforms.contains(name) => {
                match self.transforms.apply(name, &raw) {
                    Ok(value) => value,
                    Err(err) => {
                        return self.fall_back(
                            table,
                            entity,
                            rule,
                            FieldFailureKind::Transform,
                            err.to_string(),
                        );
                    }
                }
            }
            Some(name) => {
                // Unregistered rule name: the raw value passes through.
                debug!(rule = name.as_str(), "transformation rule not registered, passing value through");
                raw
            }
            None => raw,
        };

        // A null transform result is a no-op write; the field keeps its
        // zero value.
        if transformed.is_null() {
            return None;
        }

        match table.write(entity, &rule.target_field, &transformed) {
            Ok(()) => None,
            Err(err) => self.fall_back(
                table,
                entity,
                rule,
                FieldFailureKind::Coercion,
                err.to_string(),
            ),
        }
    }

    /// Record the failure and, for optional rules carrying a default,
    /// coerce and write the default in place of the failed value.
    fn fall_back<T>(
        &self,
        table: &FieldTable<T>,
        entity: &mut T,
        rule: &FieldRule,
        kind: FieldFailureKind,
        message: String,
    ) -> Option<FieldFailure> {
        if !rule.is_required {
            if let Some(default) = &rule.default_value {
                if !default.is_null() {
                    if let Err(err) = table.write(entity, &rule.target_field, default) {
                        return Some(FieldFailure::new(
                            &rule.target_field,
                            FieldFailureKind::Coercion,
                            format!("{}; default value rejected: {}", message, err),
                        ));
                    }
                }
            }
        }

        Some(FieldFailure::new(&rule.target_field, kind, message))
    }

    fn apply_computed_rule<T>(
        &self,
        table: &FieldTable<T>,
        entity: &mut T,
        source: &JsonValue,
        rule: &ComputedFieldRule,
    ) -> Option<FieldFailure> {
        if !self.computations.contains(&rule.computation_rule) {
            // Unregistered computation: the field is simply not set.
            return Some(FieldFailure::new(
                &rule.field_name,
                FieldFailureKind::Computation,
                format!("computation rule '{}' not registered", rule.computation_rule),
            ));
        }

        let value = match self.computations.apply(&rule.computation_rule, source) {
            Ok(value) => value,
            Err(err) => {
                return Some(FieldFailure::new(
                    &rule.field_name,
                    FieldFailureKind::Computation,
                    err.to_string(),
                ));
            }
        };

        if value.is_null() {
            return None;
        }

        match table.write(entity, &rule.field_name, &value) {
            Ok(()) => None,
            Err(err) => Some(FieldFailure::new(
                &rule.field_name,
                FieldFailureKind::Computation,
                err.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce;
    use crate::error::TransformError;
    use serde_json::json;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Widget {
        id: i64,
        name: String,
        label: String,
        count: i64,
    }

    impl MapTarget for Widget {
        const TYPE_NAME: &'static str = "Widget";

        fn field_table() -> FieldTable<Self> {
            FieldTable::new()
                .field("id", |w: &mut Self, v| {
                    w.id = coerce::int(v)?;
                    Ok(())
                })
                .field("name", |w: &mut Self, v| {
                    w.name = coerce::string(v)?;
                    Ok(())
                })
                .field("label", |w: &mut Self, v| {
                    w.label = coerce::string(v)?;
                    Ok(())
                })
                .field("count", |w: &mut Self, v| {
                    w.count = coerce::int(v)?;
                    Ok(())
                })
        }
    }

    fn mapper_from_yaml(yaml: &str) -> EntityMapper {
        let profiles = MappingProfileSet::load_from_str(yaml).unwrap();
        EntityMapper::with_builtins(profiles)
    }

    #[test]
    fn test_map_entity_basic() {
        let mapper = mapper_from_yaml(
            r#"
mappings:
  widget:
    targetType: Widget
    fields:
      id:
        sourceField: id
        targetField: id
      name:
        sourceField: meta.name
        targetField: name
"#,
        );

        let source = json!({"id": 5, "meta": {"name": "gearbox"}});
        let widget: Widget = mapper.map_entity(&source, "widget").unwrap();

        assert_eq!(widget.id, 5);
        assert_eq!(widget.name, "gearbox");
    }

    #[test]
    fn test_profile_not_found() {
        let mapper = mapper_from_yaml("mappings: {}");

        let result: Result<Widget, _> = mapper.map_entity(&json!({}), "missing");
        assert!(matches!(result, Err(MappingError::ProfileNotFound(_))));
    }

    #[test]
    fn test_absent_path_applies_default_when_optional() {
        let mapper = mapper_from_yaml(
            r#"
mappings:
  widget:
    fields:
      label:
        sourceField: label
        targetField: label
        isRequired: false
        defaultValue: "Standard"
"#,
        );

        let (widget, failures): (Widget, _) =
            mapper.map_entity_with_report(&json!({}), "widget").unwrap();

        assert_eq!(widget.label, "Standard");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FieldFailureKind::PathAbsent);
    }

    #[test]
    fn test_absent_path_leaves_zero_value_when_required() {
        let mapper = mapper_from_yaml(
            r#"
mappings:
  widget:
    fields:
      label:
        sourceField: label
        targetField: label
        defaultValue: "Standard"
"#,
        );

        // Required rule: the default is not consulted.
        let (widget, failures): (Widget, _) =
            mapper.map_entity_with_report(&json!({}), "widget").unwrap();

        assert_eq!(widget.label, "");
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn test_coercion_failure_recovers() {
        let mapper = mapper_from_yaml(
            r#"
mappings:
  widget:
    fields:
      id:
        sourceField: id
        targetField: id
"#,
        );

        let (widget, failures): (Widget, _) = mapper
            .map_entity_with_report(&json!({"id": "not-a-number"}), "widget")
            .unwrap();

        assert_eq!(widget.id, 0);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FieldFailureKind::Coercion);
    }

    #[test]
    fn test_unknown_target_field_recovers() {
        let mapper = mapper_from_yaml(
            r#"
mappings:
  widget:
    fields:
      mystery:
        sourceField: id
        targetField: no_such_field
"#,
        );

        let (widget, failures): (Widget, _) = mapper
            .map_entity_with_report(&json!({"id": 1}), "widget")
            .unwrap();

        assert_eq!(widget, Widget::default());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FieldFailureKind::Coercion);
    }

    #[test]
    fn test_unregistered_transformation_passes_through() {
        let mapper = mapper_from_yaml(
            r#"
mappings:
  widget:
    fields:
      name:
        sourceField: name
        targetField: name
        transformationRule: not_registered_anywhere
"#,
        );

        let (widget, failures): (Widget, _) = mapper
            .map_entity_with_report(&json!({"name": "raw value"}), "widget")
            .unwrap();

        assert_eq!(widget.name, "raw value");
        assert!(failures.is_empty());
    }

    #[test]
    fn test_failing_transformation_recovers() {
        let profiles = MappingProfileSet::load_from_str(
            r#"
mappings:
  widget:
    fields:
      name:
        sourceField: name
        targetField: name
        transformationRule: always_fails
        isRequired: false
        defaultValue: "fallback"
"#,
        )
        .unwrap();

        let mut transforms = TransformRegistry::new();
        transforms.register(
            "always_fails",
            Box::new(|_: &JsonValue| -> Result<JsonValue, TransformError> {
                Err(TransformError::Execution("boom".to_string()))
            }),
        );

        let mapper = EntityMapper::new(profiles, transforms, ComputationRegistry::new());

        let (widget, failures): (Widget, _) = mapper
            .map_entity_with_report(&json!({"name": "x"}), "widget")
            .unwrap();

        assert_eq!(widget.name, "fallback");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FieldFailureKind::Transform);
    }

    #[test]
    fn test_unregistered_computation_leaves_field_unset() {
        let mapper = mapper_from_yaml(
            r#"
mappings:
  widget:
    fields: {}
    computedFields:
      - fieldName: label
        computationRule: nobody_home
"#,
        );

        let (widget, failures): (Widget, _) =
            mapper.map_entity_with_report(&json!({}), "widget").unwrap();

        assert_eq!(widget.label, "");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FieldFailureKind::Computation);
    }

    #[test]
    fn test_computed_field_overrides_regular_field() {
        let profiles = MappingProfileSet::load_from_str(
            r#"
mappings:
  widget:
    fields:
      label:
        sourceField: label
        targetField: label
    computedFields:
      - fieldName: label
        computationRule: shout_label
"#,
        )
        .unwrap();

        let mut computations = ComputationRegistry::new();
        computations.register(
            "shout_label",
            Box::new(|record: &JsonValue| -> Result<JsonValue, TransformError> {
                let label = record.get("label").and_then(|v| v.as_str()).unwrap_or("");
                Ok(json!(label.to_uppercase()))
            }),
        );

        let mapper = EntityMapper::new(profiles, TransformRegistry::new(), computations);

        let widget: Widget = mapper
            .map_entity(&json!({"label": "quiet"}), "widget")
            .unwrap();

        // Computed fields apply after regular fields and win.
        assert_eq!(widget.label, "QUIET");
    }

    #[test]
    fn test_idempotent_mapping() {
        let mapper = mapper_from_yaml(
            r#"
mappings:
  widget:
    fields:
      id:
        sourceField: id
        targetField: id
      count:
        sourceField: parts
        targetField: count
        transformationRule: array_count
"#,
        );

        let source = json!({"id": 3, "parts": ["a", "b"]});

        let first: Widget = mapper.map_entity(&source, "widget").unwrap();
        let second: Widget = mapper.map_entity(&source, "widget").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.count, 2);
    }
}
