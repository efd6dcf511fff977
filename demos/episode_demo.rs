//! Episode mapping demo.
//!
//! Shows season extraction from episode codes, including the "Unknown"
//! fallback for malformed codes, using the `episode` profile from
//! `config/mappings.yaml`.
//!
//! Run with: `cargo run --example episode_demo`

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use mapforge::{coerce, EntityMapper, FieldTable, MappingProfileSet, MapTarget};

#[derive(Debug, Clone, Serialize)]
struct Episode {
    id: i64,
    name: String,
    air_date: DateTime<Utc>,
    episode_code: String,
    season: String,
    character_count: i64,
}

impl Default for Episode {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            air_date: DateTime::<Utc>::MIN_UTC,
            episode_code: String::new(),
            season: String::new(),
            character_count: 0,
        }
    }
}

impl MapTarget for Episode {
    const TYPE_NAME: &'static str = "Episode";

    fn field_table() -> FieldTable<Self> {
        FieldTable::new()
            .field("id", |e: &mut Self, v| {
                e.id = coerce::int(v)?;
                Ok(())
            })
            .field("name", |e: &mut Self, v| {
                e.name = coerce::string(v)?;
                Ok(())
            })
            .field("air_date", |e: &mut Self, v| {
                e.air_date = coerce::datetime(v)?;
                Ok(())
            })
            .field("episode_code", |e: &mut Self, v| {
                e.episode_code = coerce::string(v)?;
                Ok(())
            })
            .field("season", |e: &mut Self, v| {
                e.season = coerce::string(v)?;
                Ok(())
            })
            .field("character_count", |e: &mut Self, v| {
                e.character_count = coerce::int(v)?;
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
            "name": "Pilot",
            "episode": "S01E01",
            "characters": ["Rick Sanchez", "Morty Smith", "Jerry Smith"],
            "created": "2017-11-10T12:56:33.798Z"
        }),
        json!({
            "id": 28,
            "name": "The Ricklantis Mixup",
            "episode": "S03E07",
            "characters": ["Rick Sanchez", "Morty Smith"],
            "created": "2017-11-10T12:56:36.618Z"
        }),
        // Malformed episode code: season falls back to "Unknown"
        json!({
            "id": 999,
            "name": "Lost Tape",
            "episode": "special-01",
            "characters": [],
            "created": "not a timestamp"
        }),
    ];

    for record in &records {
        let episode: Episode = mapper.map_entity(record, "episode")?;
        println!(
            "{:>4}  {:<24} {:<10} ({} characters)",
            episode.id, episode.name, episode.season, episode.character_count
        );
    }

    Ok(())
}
