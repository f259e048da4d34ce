//! Application state - single source of truth

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{DebugSection, DebugState, ron_string};

use crate::columns::{self, SortState};
use crate::sprite::SpriteData;

pub const DEFAULT_COUNT: u32 = 10;
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_VERSION: &str = "red";
pub const NOT_FOUND_MESSAGE: &str = "Pokemon not found";

/// Standard and alternate (shiny) front sprites.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpritePair {
    pub standard: Option<String>,
    pub alternate: Option<String>,
}

/// One row of the result table, as returned by `/pokemon/{id-or-name}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: u32,
    pub name: String,
    /// Decimeters.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub sprites: SpritePair,
    pub types: Vec<String>,
    pub cry: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorText {
    pub version: String,
    pub language: String,
    pub text: String,
}

/// Species data from `/pokemon-species/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonSpecies {
    pub id: u32,
    pub name: String,
    pub is_baby: bool,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub has_gender_differences: bool,
    pub flavor_text_entries: Vec<FlavorText>,
}

/// A summary row enriched with its species data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub sprites: SpritePair,
    pub types: Vec<String>,
    pub cry: Option<String>,
    pub is_baby: bool,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub has_gender_differences: bool,
    pub flavor_text_entries: Vec<FlavorText>,
}

impl PokemonDetail {
    /// Identity comes from the species response, everything else from the row.
    pub fn merge(summary: &PokemonSummary, species: PokemonSpecies) -> Self {
        Self {
            id: species.id,
            name: species.name,
            height: summary.height,
            weight: summary.weight,
            sprites: summary.sprites.clone(),
            types: summary.types.clone(),
            cry: summary.cry.clone(),
            is_baby: species.is_baby,
            is_legendary: species.is_legendary,
            is_mythical: species.is_mythical,
            has_gender_differences: species.has_gender_differences,
            flavor_text_entries: species.flavor_text_entries,
        }
    }

    pub fn descriptions<'a>(&'a self, locale: &'a str) -> impl Iterator<Item = &'a FlavorText> {
        self.flavor_text_entries
            .iter()
            .filter(move |entry| entry.language == locale)
    }

    pub fn sprite_url(&self, form: FormVariant) -> Option<&str> {
        match form {
            FormVariant::Standard => self.sprites.standard.as_deref(),
            FormVariant::Alternate => self.sprites.alternate.as_deref(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormVariant {
    #[default]
    Standard,
    Alternate,
}

impl FormVariant {
    pub fn toggle(self) -> Self {
        match self {
            FormVariant::Standard => FormVariant::Alternate,
            FormVariant::Alternate => FormVariant::Standard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormVariant::Standard => "Normal Form",
            FormVariant::Alternate => "Shiny Form",
        }
    }
}

/// The detail record plus the inspector's own selections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub record: PokemonDetail,
    pub form: FormVariant,
    /// Index into `record.descriptions(locale)`.
    pub description_index: usize,
}

impl DetailView {
    pub fn new(record: PokemonDetail, locale: &str, default_version: &str) -> Self {
        let description_index = record
            .descriptions(locale)
            .position(|entry| entry.version == default_version)
            .unwrap_or(0);
        Self {
            record,
            form: FormVariant::Standard,
            description_index,
        }
    }

    pub fn description_count(&self, locale: &str) -> usize {
        self.record.descriptions(locale).count()
    }

    pub fn selected_description<'a>(&'a self, locale: &'a str) -> Option<&'a FlavorText> {
        self.record.descriptions(locale).nth(self.description_index)
    }

    pub fn sprite_url(&self) -> Option<&str> {
        self.record.sprite_url(self.form)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    List,
    Detail,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusArea {
    Search,
    #[default]
    Table,
}

/// Settings fixed at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub default_count: u32,
    pub locale: String,
    pub default_version: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_COUNT,
            locale: DEFAULT_LOCALE.to_string(),
            default_version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl Preferences {
    pub fn default_token(&self) -> String {
        self.default_count.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub preferences: Preferences,
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,
    pub view: ViewMode,

    /// Text currently in the search box.
    pub query: String,
    /// Token of the most recent load.
    pub token: String,
    /// Bumped on every load; results tagged with an older id are dropped.
    pub request_id: u64,
    pub catalog_loading: bool,
    pub entries: Vec<PokemonSummary>,
    pub sort: Option<SortState>,
    /// Row key (name) of the highlighted row.
    pub selected: Option<String>,

    pub detail: DataResource<DetailView>,
    pub pending_detail: Option<u32>,

    pub sprites: HashMap<String, SpriteData>,
    pub sprite_failures: HashSet<String>,

    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl AppState {
    pub fn new(preferences: Preferences) -> Self {
        let token = preferences.default_token();
        Self {
            preferences,
            terminal_size: (80, 24),
            focus: FocusArea::Table,
            view: ViewMode::List,
            query: token.clone(),
            token,
            request_id: 0,
            catalog_loading: false,
            entries: Vec::new(),
            sort: None,
            selected: None,
            detail: DataResource::Empty,
            pending_detail: None,
            sprites: HashMap::new(),
            sprite_failures: HashSet::new(),
            message: None,
            tick: 0,
        }
    }

    /// Start with a specific search instead of the default count.
    pub fn with_search(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.query = token.clone();
        self.token = token;
        self
    }

    /// Entries in display order.
    pub fn rows(&self) -> Vec<&PokemonSummary> {
        columns::sorted_indices(&self.entries, self.sort)
            .into_iter()
            .filter_map(|idx| self.entries.get(idx))
            .collect()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let name = self.selected.as_deref()?;
        self.rows().iter().position(|entry| entry.name == name)
    }

    pub fn selected_entry(&self) -> Option<&PokemonSummary> {
        let name = self.selected.as_deref()?;
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entry_by_id(&self, id: u32) -> Option<&PokemonSummary> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn current_detail(&self) -> Option<&DetailView> {
        match self.view {
            ViewMode::Detail => self.detail.data(),
            ViewMode::List => None,
        }
    }

    pub fn needs_sprite(&self, url: &str) -> bool {
        !self.sprites.contains_key(url) && !self.sprite_failures.contains(url)
    }

    pub fn is_busy(&self) -> bool {
        self.catalog_loading || self.detail.is_loading()
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Search")
                .entry("query", ron_string(&self.query))
                .entry("token", ron_string(&self.token))
                .entry("request", ron_string(&self.request_id))
                .entry("loading", ron_string(&self.catalog_loading)),
            DebugSection::new("Table")
                .entry("entries", ron_string(&self.entries.len()))
                .entry("sort", ron_string(&self.sort))
                .entry("selected", ron_string(&self.selected))
                .entry("focus", ron_string(&self.focus)),
            DebugSection::new("Detail")
                .entry("view", ron_string(&self.view))
                .entry("pending", ron_string(&self.pending_detail))
                .entry(
                    "name",
                    ron_string(&self.detail.data().map(|detail| detail.record.name.clone())),
                ),
            DebugSection::new("Status")
                .entry("sprites", ron_string(&self.sprites.len()))
                .entry("sprite_failures", ron_string(&self.sprite_failures.len()))
                .entry("message", ron_string(&self.message)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(entries: Vec<FlavorText>) -> PokemonSpecies {
        PokemonSpecies {
            id: 25,
            name: "pikachu".into(),
            is_baby: false,
            is_legendary: false,
            is_mythical: false,
            has_gender_differences: true,
            flavor_text_entries: entries,
        }
    }

    fn flavor(version: &str, language: &str, text: &str) -> FlavorText {
        FlavorText {
            version: version.into(),
            language: language.into(),
            text: text.into(),
        }
    }

    fn summary() -> PokemonSummary {
        PokemonSummary {
            id: 25,
            name: "pikachu".into(),
            height: 4,
            weight: 60,
            sprites: SpritePair {
                standard: Some("https://img/25.png".into()),
                alternate: Some("https://img/shiny/25.png".into()),
            },
            types: vec!["electric".into()],
            cry: Some("https://cry/25.ogg".into()),
        }
    }

    #[test]
    fn merge_keeps_row_fields_and_species_flags() {
        let detail = PokemonDetail::merge(&summary(), species(vec![]));
        assert_eq!(detail.id, 25);
        assert_eq!(detail.height, 4);
        assert_eq!(detail.weight, 60);
        assert_eq!(detail.types, vec!["electric".to_string()]);
        assert_eq!(detail.cry.as_deref(), Some("https://cry/25.ogg"));
        assert!(detail.has_gender_differences);
    }

    #[test]
    fn detail_view_prefers_default_version() {
        let record = PokemonDetail::merge(
            &summary(),
            species(vec![
                flavor("yellow", "en", "first"),
                flavor("red", "ja", "japanese"),
                flavor("red", "en", "second"),
            ]),
        );
        let view = DetailView::new(record, "en", "red");
        assert_eq!(view.description_index, 1);
        assert_eq!(view.selected_description("en").map(|e| e.text.as_str()), Some("second"));
        assert_eq!(view.description_count("en"), 2);
    }

    #[test]
    fn detail_view_falls_back_to_first_entry() {
        let record = PokemonDetail::merge(
            &summary(),
            species(vec![flavor("gold", "en", "gold text"), flavor("silver", "en", "x")]),
        );
        let view = DetailView::new(record, "en", "red");
        assert_eq!(view.description_index, 0);
        assert_eq!(view.selected_description("en").map(|e| e.version.as_str()), Some("gold"));
    }

    #[test]
    fn sprite_url_follows_form() {
        let record = PokemonDetail::merge(&summary(), species(vec![]));
        let mut view = DetailView::new(record, "en", "red");
        assert_eq!(view.sprite_url(), Some("https://img/25.png"));
        view.form = view.form.toggle();
        assert_eq!(view.sprite_url(), Some("https://img/shiny/25.png"));
    }
}
