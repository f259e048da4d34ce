//! Batch loading against an in-memory source

use std::sync::Mutex;

use async_trait::async_trait;
use pokedex::api::{ApiError, PokemonSource};
use pokedex::catalog::{load_catalog, SearchToken};
use pokedex::state::{PokemonSpecies, PokemonSummary, SpritePair};
use pretty_assertions::assert_eq;

const KNOWN: [&str; 12] = [
    "bulbasaur",
    "ivysaur",
    "venusaur",
    "charmander",
    "charmeleon",
    "charizard",
    "squirtle",
    "wartortle",
    "blastoise",
    "caterpie",
    "metapod",
    "butterfree",
];

/// Serves ids 1..=12 plus pikachu, records every request, and can be told to
/// fail on one key.
#[derive(Default)]
struct FakeDex {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl FakeDex {
    fn failing_on(key: &'static str) -> Self {
        Self {
            fail_on: Some(key),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

fn summary(id: u32, name: &str) -> PokemonSummary {
    PokemonSummary {
        id,
        name: name.to_string(),
        height: id,
        weight: id * 10,
        sprites: SpritePair::default(),
        types: vec!["normal".into()],
        cry: None,
    }
}

#[async_trait]
impl PokemonSource for FakeDex {
    async fn fetch_pokemon(&self, key: &str) -> Result<PokemonSummary, ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.to_string());
        }
        if self.fail_on == Some(key) {
            return Err(ApiError::Status {
                status: 500,
                url: format!("fake://pokemon/{key}"),
            });
        }
        if key == "pikachu" {
            return Ok(summary(25, "pikachu"));
        }
        let found = key
            .parse::<u32>()
            .ok()
            .and_then(|id| KNOWN.get((id as usize).checked_sub(1)?).map(|name| summary(id, name)));
        found.ok_or_else(|| ApiError::NotFound(key.to_string()))
    }

    async fn fetch_species(&self, id: u32) -> Result<PokemonSpecies, ApiError> {
        Err(ApiError::NotFound(id.to_string()))
    }
}

#[tokio::test]
async fn count_loads_ids_in_order() {
    let dex = FakeDex::default();
    let entries = load_catalog(&dex, &SearchToken::Count(10)).await.expect("load");

    let ids: Vec<u32> = entries.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    assert_eq!(dex.calls(), (1..=10).map(|id| id.to_string()).collect::<Vec<_>>());
}

#[tokio::test]
async fn name_loads_single_entry() {
    let dex = FakeDex::default();
    let token = SearchToken::parse("Pikachu").expect("token");
    let entries = load_catalog(&dex, &token).await.expect("load");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "pikachu");
    assert_eq!(dex.calls(), vec!["pikachu".to_string()]);
}

#[tokio::test]
async fn unknown_name_is_missing() {
    let dex = FakeDex::default();
    let token = SearchToken::parse("notapokemon").expect("token");
    let error = load_catalog(&dex, &token).await.expect_err("should fail");

    assert!(error.is_missing());
}

#[tokio::test]
async fn first_failure_aborts_the_batch() {
    let dex = FakeDex::failing_on("3");
    let result = load_catalog(&dex, &SearchToken::Count(6)).await;

    assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
    // Nothing after the failing id is requested.
    assert_eq!(dex.calls(), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn zero_count_is_empty() {
    let dex = FakeDex::default();
    let entries = load_catalog(&dex, &SearchToken::Count(0)).await.expect("load");

    assert!(entries.is_empty());
    assert!(dex.calls().is_empty());
}
