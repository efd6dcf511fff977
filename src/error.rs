//! Error types for the mapping engine.
//!
//! Only [`MappingError`] ever crosses the `map_entity` boundary; every other
//! failure is absorbed per-field and surfaced through logs and
//! [`FieldFailure`] records.

use std::fmt;

/// Error type for mapping calls that fail as a whole.
#[derive(Debug, Clone)]
pub enum MappingError {
    /// The mapping configuration payload could not be parsed.
    Configuration(String),
    /// No profile with the given name is loaded.
    ProfileNotFound(String),
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            MappingError::ProfileNotFound(name) => write!(f, "Mapping profile not found: {}", name),
        }
    }
}

impl std::error::Error for MappingError {}

/// Error type for transformation and computation functions.
#[derive(Debug, Clone)]
pub enum TransformError {
    /// No function registered under the given name.
    NotFound(String),
    /// The function ran but could not produce a value.
    Execution(String),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::NotFound(name) => write!(f, "Rule not registered: {}", name),
            TransformError::Execution(msg) => write!(f, "Rule execution failed: {}", msg),
        }
    }
}

impl std::error::Error for TransformError {}

/// Error type for coercing a loosely-typed value into a typed target field.
#[derive(Debug, Clone)]
pub enum CoercionError {
    /// The profile references a field the target type does not have.
    UnknownField { field: String },
    /// No conversion rule applies between the value and the target type.
    Incompatible {
        expected: &'static str,
        value: String,
    },
    /// A textual value did not match any variant of the target enum.
    EnumParse {
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionError::UnknownField { field } => {
                write!(f, "Target type has no writable field '{}'", field)
            }
            CoercionError::Incompatible { expected, value } => {
                write!(f, "Cannot coerce {} to {}", value, expected)
            }
            CoercionError::EnumParse { value, expected } => {
                write!(f, "'{}' does not name a variant of {}", value, expected)
            }
        }
    }
}

impl std::error::Error for CoercionError {}

/// Classification of a recovered per-field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFailureKind {
    /// The source path resolved to absent or null.
    PathAbsent,
    /// A transformation function failed.
    Transform,
    /// Coercion into the target field failed.
    Coercion,
    /// A computation function failed or was not registered.
    Computation,
}

/// One recovered per-field failure from a mapping call.
///
/// These never abort the call; the mapper logs them and, where the rule
/// allows, substitutes the declared default value.
#[derive(Debug, Clone)]
pub struct FieldFailure {
    pub target_field: String,
    pub kind: FieldFailureKind,
    pub message: String,
}

impl FieldFailure {
    pub fn new(target_field: impl Into<String>, kind: FieldFailureKind, message: impl Into<String>) -> Self {
        Self {
            target_field: target_field.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}' ({:?}): {}", self.target_field, self.kind, self.message)
    }
}
