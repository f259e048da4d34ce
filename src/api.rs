//! PokeAPI client

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::display::sanitize_text;
use crate::state::{FlavorText, PokemonSpecies, PokemonSummary, SpritePair};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("no Pokemon found for \"{0}\"")]
    NotFound(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The server answered, but not with the requested resource.
    pub fn is_missing(&self) -> bool {
        matches!(self, ApiError::NotFound(_) | ApiError::Status { .. })
    }
}

/// Where summary and species records come from.
#[async_trait]
pub trait PokemonSource: Send + Sync {
    /// `key` is an id or a lowercase name.
    async fn fetch_pokemon(&self, key: &str) -> Result<PokemonSummary, ApiError>;

    async fn fetch_species(&self, id: u32) -> Result<PokemonSpecies, ApiError>;
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    sprites: SpritesResponse,
    types: Vec<PokemonTypeSlot>,
    cries: Option<PokemonCries>,
}

#[derive(Clone, Debug, Deserialize)]
struct SpritesResponse {
    front_default: Option<String>,
    front_shiny: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonCries {
    latest: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    id: u32,
    name: String,
    is_baby: bool,
    is_legendary: bool,
    is_mythical: bool,
    has_gender_differences: bool,
    flavor_text_entries: Vec<FlavorTextEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
    version: NamedResource,
}

pub fn parse_pokemon(bytes: &[u8]) -> Result<PokemonSummary, ApiError> {
    let response: PokemonResponse = serde_json::from_slice(bytes)?;
    Ok(PokemonSummary {
        id: response.id,
        name: response.name,
        height: response.height,
        weight: response.weight,
        sprites: SpritePair {
            standard: response.sprites.front_default,
            alternate: response.sprites.front_shiny,
        },
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        cry: response.cries.and_then(|cries| cries.latest),
    })
}

pub fn parse_species(bytes: &[u8]) -> Result<PokemonSpecies, ApiError> {
    let response: PokemonSpeciesResponse = serde_json::from_slice(bytes)?;
    Ok(PokemonSpecies {
        id: response.id,
        name: response.name,
        is_baby: response.is_baby,
        is_legendary: response.is_legendary,
        is_mythical: response.is_mythical,
        has_gender_differences: response.has_gender_differences,
        flavor_text_entries: response
            .flavor_text_entries
            .into_iter()
            .map(|entry| FlavorText {
                version: entry.version.name,
                language: entry.language.name,
                text: sanitize_text(&entry.flavor_text),
            })
            .collect(),
    })
}

// ============================================================================
// HTTP client
// ============================================================================

#[derive(Clone, Debug)]
pub struct PokeApi {
    client: reqwest::Client,
    base_url: String,
}

impl Default for PokeApi {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl PokeApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedex-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn pokemon_url(&self, key: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, urlencoding::encode(key))
    }

    pub fn species_url(&self, id: u32) -> String {
        format!("{}/pokemon-species/{}", self.base_url, id)
    }

    /// Raw bytes of any URL (sprites, cries).
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_resource(&self, url: &str, key: &str) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(%url, "GET");
        self.fetch_bytes(url).await.map_err(|error| {
            let error = missing_as_not_found(error, key);
            if !matches!(error, ApiError::NotFound(_)) {
                tracing::warn!(%url, %error, "request failed");
            }
            error
        })
    }
}

/// A 404 for a keyed resource means the key names nothing.
fn missing_as_not_found(error: ApiError, key: &str) -> ApiError {
    match error {
        ApiError::Status { status: 404, .. } => ApiError::NotFound(key.to_string()),
        other => other,
    }
}

#[async_trait]
impl PokemonSource for PokeApi {
    async fn fetch_pokemon(&self, key: &str) -> Result<PokemonSummary, ApiError> {
        let bytes = self.fetch_resource(&self.pokemon_url(key), key).await?;
        parse_pokemon(&bytes)
    }

    async fn fetch_species(&self, id: u32) -> Result<PokemonSpecies, ApiError> {
        let bytes = self
            .fetch_resource(&self.species_url(id), &id.to_string())
            .await?;
        parse_species(&bytes)
    }
}

static CLIENT: OnceLock<PokeApi> = OnceLock::new();

/// Install the configured client. Only the first call has an effect.
pub fn install(api: PokeApi) {
    if CLIENT.set(api).is_err() {
        tracing::debug!("api client already installed");
    }
}

pub fn client() -> &'static PokeApi {
    CLIENT.get_or_init(PokeApi::default)
}
