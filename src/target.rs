//! Target entity trait and per-type field writer table.
//!
//! Profiles address target fields by name at runtime while target types stay
//! statically typed. [`FieldTable`] bridges the two: each target type builds
//! an accessor table once per mapping call, keyed by field name, and the
//! mapper writes through it. A profile referencing a field the target does
//! not have surfaces as [`CoercionError::UnknownField`].

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::CoercionError;

/// A writer for one named field of a target type.
pub type FieldWriter<T> = Box<dyn Fn(&mut T, &JsonValue) -> Result<(), CoercionError> + Send + Sync>;

/// Compiled accessor table for a target type, keyed by target field name.
///
/// # Example
///
/// ```
/// use mapforge::{coerce, FieldTable, MapTarget};
///
/// #[derive(Default)]
/// struct Character {
///     id: i64,
///     name: String,
/// }
///
/// impl MapTarget for Character {
///     const TYPE_NAME: &'static str = "Character";
///
///     fn field_table() -> FieldTable<Self> {
///         FieldTable::new()
///             .field("id", |c: &mut Self, v| {
///                 c.id = coerce::int(v)?;
///                 Ok(())
///             })
///             .field("name", |c: &mut Self, v| {
///                 c.name = coerce::string(v)?;
///                 Ok(())
///             })
///     }
/// }
/// ```
pub struct FieldTable<T> {
    writers: HashMap<String, FieldWriter<T>>,
}

impl<T> FieldTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            writers: HashMap::new(),
        }
    }

    /// Add a writer for a named field.
    pub fn field<F>(mut self, name: impl Into<String>, writer: F) -> Self
    where
        F: Fn(&mut T, &JsonValue) -> Result<(), CoercionError> + Send + Sync + 'static,
    {
        self.writers.insert(name.into(), Box::new(writer));
        self
    }

    /// Coerce and write a value into a named field of the target.
    pub fn write(&self, target: &mut T, field: &str, value: &JsonValue) -> Result<(), CoercionError> {
        let writer = self.writers.get(field).ok_or_else(|| CoercionError::UnknownField {
            field: field.to_string(),
        })?;

        writer(target, value)
    }

    /// Check if the target type has a writer for a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.writers.contains_key(name)
    }

    /// Get all writable field names.
    pub fn field_names(&self) -> Vec<&String> {
        self.writers.keys().collect()
    }
}

impl<T> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A strongly-typed entity that mapping profiles can populate.
///
/// The zero value comes from `Default`; fields a profile never writes (or
/// whose rules fail without a usable default) keep it.
pub trait MapTarget: Default {
    /// The name of this entity type, for diagnostics
    const TYPE_NAME: &'static str;

    /// Build the field writer table for this type.
    fn field_table() -> FieldTable<Self>;
}
