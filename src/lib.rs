//! # Mapforge: Configuration-Driven Entity Mapper
//!
//! Mapforge populates strongly-typed target entities from loosely-typed
//! source records (already-deserialized query results whose shape is not
//! known at compile time) according to named mapping profiles loaded from
//! configuration.
//!
//! ## Features
//!
//! - **Mapping profiles**: Per-field source paths, transformations, defaults,
//!   and required flags, plus computed fields over the whole record
//! - **Nested path resolution**: Dotted paths that short-circuit safely
//!   through absent or null intermediate nodes
//! - **Transformation and computation registries**: Built-in rules,
//!   extensible with custom functions at setup time
//! - **Type coercion**: Enum, date, numeric, and boolean conversion into the
//!   target field's actual type
//! - **Per-field failure isolation**: A failed field is logged and falls back
//!   to its default or zero value; a mapping call never partially aborts
//!
//! ## Example profile
//!
//! ```yaml
//! mappings:
//!   character:
//!     targetType: Character
//!     fields:
//!       status:
//!         sourceField: status
//!         targetField: status
//!         transformationRule: status_to_lifestatus
//!       origin:
//!         sourceField: origin.name
//!         targetField: origin_name
//!         isRequired: false
//!         defaultValue: "Unknown location"
//!     computedFields:
//!       - fieldName: display_name
//!         computationRule: generate_display_name
//!         dependentFields: [name, species]
//! ```
//!
//! ## Example mapping call
//!
//! ```ignore
//! use mapforge::{EntityMapper, MappingProfileSet};
//!
//! let profiles = MappingProfileSet::load_from_file("config/mappings.yaml")?;
//! let mapper = EntityMapper::with_builtins(profiles);
//!
//! let character: Character = mapper.map_entity(&record, "character")?;
//! ```

// Core modules
pub mod coerce;
pub mod compute;
pub mod error;
pub mod mapper;
pub mod profile;
pub mod source;
pub mod target;
pub mod transform;

// Re-export key types
pub use coerce::CoerceEnum;
pub use compute::{ComputationRegistry, ComputeFn};
pub use error::{CoercionError, FieldFailure, FieldFailureKind, MappingError, TransformError};
pub use mapper::EntityMapper;
pub use profile::{ComputedFieldRule, EntityMapping, FieldRule, MappingProfileSet};
pub use source::{resolve, FieldPath, SourceValue};
pub use target::{FieldTable, FieldWriter, MapTarget};
pub use transform::{TransformFn, TransformRegistry};
