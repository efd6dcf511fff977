//! Custom rules demo.
//!
//! Registers a custom transformation and a custom computation on top of the
//! built-ins, with the profile set loaded from an inline YAML payload.
//! Optionally reads the source record from a JSON file.
//!
//! Run with: `cargo run --example custom_rules_demo -- --verbose`

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};

use mapforge::{
    coerce, ComputationRegistry, EntityMapper, FieldTable, MappingProfileSet, MapTarget,
    TransformError, TransformRegistry,
};

const PROFILE_YAML: &str = r#"
mappings:
  location:
    targetType: Location
    fields:
      id:
        sourceField: id
        targetField: id
      name:
        sourceField: name
        targetField: name
        transformationRule: uppercase
      type:
        sourceField: type
        targetField: location_type
        transformationRule: default_if_empty
      dimension:
        sourceField: dimension
        targetField: dimension
        isRequired: false
        defaultValue: "Unknown dimension"
    computedFields:
      - fieldName: summary
        computationRule: location_summary
        dataType: string
        dependentFields: [name, residents]
"#;

#[derive(Parser)]
#[command(name = "custom_rules_demo")]
#[command(about = "Entity mapping with custom transformation and computation rules", long_about = None)]
struct Cli {
    /// Path to a JSON file holding the source record (uses a built-in
    /// sample when omitted)
    #[arg(short, long)]
    record: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
struct Location {
    id: i64,
    name: String,
    location_type: String,
    dimension: String,
    summary: String,
}

impl MapTarget for Location {
    const TYPE_NAME: &'static str = "Location";

    fn field_table() -> FieldTable<Self> {
        FieldTable::new()
            .field("id", |l: &mut Self, v| {
                l.id = coerce::int(v)?;
                Ok(())
            })
            .field("name", |l: &mut Self, v| {
                l.name = coerce::string(v)?;
                Ok(())
            })
            .field("location_type", |l: &mut Self, v| {
                l.location_type = coerce::string(v)?;
                Ok(())
            })
            .field("dimension", |l: &mut Self, v| {
                l.dimension = coerce::string(v)?;
                Ok(())
            })
            .field("summary", |l: &mut Self, v| {
                l.summary = coerce::string(v)?;
                Ok(())
            })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let record = match &cli.record {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => json!({
            "id": 1,
            "name": "Citadel of Ricks",
            "type": "",
            "residents": ["Rick Prime", "Evil Morty", "Cop Rick"]
        }),
    };

    let profiles = MappingProfileSet::load_from_str(PROFILE_YAML)?;

    let mut transforms = TransformRegistry::with_builtins();
    transforms.register(
        "uppercase",
        Box::new(|value: &Value| -> Result<Value, TransformError> {
            let text = value
                .as_str()
                .ok_or_else(|| TransformError::Execution("expected a string".to_string()))?;
            Ok(json!(text.to_uppercase()))
        }),
    );

    let mut computations = ComputationRegistry::with_builtins();
    computations.register(
        "location_summary",
        Box::new(|record: &Value| -> Result<Value, TransformError> {
            let name = record.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let residents = record
                .get("residents")
                .and_then(|v| v.as_array())
                .map(|arr| arr.len())
                .unwrap_or(0);
            Ok(json!(format!("{} houses {} residents", name, residents)))
        }),
    );

    let mapper = EntityMapper::new(profiles, transforms, computations);

    let location: Location = mapper.map_entity(&record, "location")?;
    println!("{}", serde_json::to_string_pretty(&location)?);

    Ok(())
}
