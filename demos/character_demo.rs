//! Character mapping demo.
//!
//! Maps loosely-typed character records (the shape an external API query
//! would return) into a typed `Character` entity using the `character`
//! profile from `config/mappings.yaml`.
//!
//! Run with: `cargo run --example character_demo`

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use mapforge::{coerce, CoerceEnum, EntityMapper, FieldTable, MappingProfileSet, MapTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
enum LifeStatus {
    Alive,
    Dead,
    #[default]
    Unknown,
}

impl CoerceEnum for LifeStatus {
    const EXPECTED: &'static str = "LifeStatus [Alive|Dead|Unknown]";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("alive") {
            Some(LifeStatus::Alive)
        } else if name.eq_ignore_ascii_case("dead") {
            Some(LifeStatus::Dead)
        } else if name.eq_ignore_ascii_case("unknown") {
            Some(LifeStatus::Unknown)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
enum Gender {
    Female,
    Male,
    Genderless,
    #[default]
    Unknown,
}

impl CoerceEnum for Gender {
    const EXPECTED: &'static str = "Gender [Female|Male|Genderless|Unknown]";

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("female") {
            Some(Gender::Female)
        } else if name.eq_ignore_ascii_case("male") {
            Some(Gender::Male)
        } else if name.eq_ignore_ascii_case("genderless") {
            Some(Gender::Genderless)
        } else if name.eq_ignore_ascii_case("unknown") {
            Some(Gender::Unknown)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Character {
    id: i64,
    name: String,
    status: LifeStatus,
    species: String,
    gender: Gender,
    origin_name: String,
    episode_count: i64,
    is_main_character: bool,
    display_name: String,
    importance_score: i64,
    created: DateTime<Utc>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            status: LifeStatus::default(),
            species: String::new(),
            gender: Gender::default(),
            origin_name: String::new(),
            episode_count: 0,
            is_main_character: false,
            display_name: String::new(),
            importance_score: 0,
            created: DateTime::<Utc>::MIN_UTC,
        }
    }
}

impl MapTarget for Character {
    const TYPE_NAME: &'static str = "Character";

    fn field_table() -> FieldTable<Self> {
        FieldTable::new()
            .field("id", |c: &mut Self, v| {
                c.id = coerce::int(v)?;
                Ok(())
            })
            .field("name", |c: &mut Self, v| {
                c.name = coerce::string(v)?;
                Ok(())
            })
            .field("status", |c: &mut Self, v| {
                c.status = coerce::enum_value(v)?;
                Ok(())
            })
            .field("species", |c: &mut Self, v| {
                c.species = coerce::string(v)?;
                Ok(())
            })
            .field("gender", |c: &mut Self, v| {
                c.gender = coerce::enum_value(v)?;
                Ok(())
            })
            .field("origin_name", |c: &mut Self, v| {
                c.origin_name = coerce::string(v)?;
                Ok(())
            })
            .field("episode_count", |c: &mut Self, v| {
                c.episode_count = coerce::int(v)?;
                Ok(())
            })
            .field("is_main_character", |c: &mut Self, v| {
                c.is_main_character = coerce::boolean(v)?;
                Ok(())
            })
            .field("display_name", |c: &mut Self, v| {
                c.display_name = coerce::string(v)?;
                Ok(())
            })
            .field("importance_score", |c: &mut Self, v| {
                c.importance_score = coerce::int(v)?;
                Ok(())
            })
            .field("created", |c: &mut Self, v| {
                c.created = coerce::datetime(v)?;
                Ok(())
            })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let profiles = MappingProfileSet::load_from_file("config/mappings.yaml")?;
    let mapper = EntityMapper::with_builtins(profiles);

    let records = vec![
        json!({
            "id": 1,
            "name": "Rick Sanchez",
            "status": "Alive",
            "species": "Human",
            "gender": "Male",
            "origin": {"name": "Earth (C-137)"},
            "episode": ["S01E01", "S01E02", "S01E03"],
            "created": "2017-11-04T18:48:46.250Z"
        }),
        // Sparse record: null origin, missing species, unmapped status
        json!({
            "id": 249,
            "name": "Birdperson",
            "status": "presumed dead",
            "gender": "Male",
            "origin": null,
            "episode": ["S01E11"],
            "created": "2017-12-30T16:27:31.399Z"
        }),
    ];

    for record in &records {
        let character: Character = mapper.map_entity(record, "character")?;
        println!("{}", serde_json::to_string_pretty(&character)?);
    }

    Ok(())
}
