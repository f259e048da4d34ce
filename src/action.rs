//! Actions - everything that can happen in the app

use serde::{Deserialize, Serialize};

use crate::columns::Column;
use crate::sprite::SpriteData;
use crate::state::{FocusArea, FormVariant, PokemonSpecies, PokemonSummary};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    /// Startup: load the initial token
    Init,

    // ===== Search category =====
    /// Search box text changed
    SearchInput(String),
    /// Submit the search box
    SearchSubmit(String),
    /// Back to the default count and reload
    SearchReset,

    // ===== Catalog category =====
    CatalogDidLoad {
        request: u64,
        entries: Vec<PokemonSummary>,
    },
    /// A name search got a non-success response
    CatalogDidNotFound { request: u64, name: String },
    CatalogDidError { request: u64, error: String },

    // ===== Sprite category =====
    SpriteDidLoad { url: String, sprite: SpriteData },
    SpriteDidError { url: String, error: String },

    // ===== Table category =====
    /// Highlight the row at this display index
    RowSelect(usize),
    SortBy(Column),

    // ===== Detail category =====
    /// Fetch species data for the highlighted row
    DetailOpen,
    DetailDidLoad { id: u32, species: PokemonSpecies },
    DetailDidError { id: u32, error: String },
    DetailClose,
    DetailFormToggle,
    DetailFormSet(FormVariant),
    /// Select a description by index among the locale's entries
    DescriptionSelect(usize),

    // ===== Cry category =====
    CryPlay,
    CryDidPlay,
    CryDidError(String),

    // ===== UI category =====
    FocusSet(FocusArea),
    FocusNext,
    UiTerminalResize(u16, u16),
    /// Force a re-render (cursor movement)
    Render,

    /// Spinner tick
    Tick,
    Quit,
}
