//! Reducer - pure state transitions, side effects returned as `Effect`s

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::catalog::SearchToken;
use crate::columns::SortState;
use crate::effect::Effect;
use crate::state::{
    AppState, DetailView, FocusArea, FormVariant, PokemonDetail, ViewMode, NOT_FOUND_MESSAGE,
};

pub const EMPTY_TOKEN_HINT: &str = "Enter a count or a Pokemon name";
pub const NO_CRY_MESSAGE: &str = "No cry available.";
pub const DETAIL_GONE_MESSAGE: &str = "Pokemon left the list before its details loaded";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => start_load(state),

        // ===== Search =====
        Action::SearchInput(query) => {
            if state.query == query {
                return DispatchResult::unchanged();
            }
            state.query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(raw) => {
            let token = raw.trim().to_string();
            state.query = token.clone();
            if token.is_empty() {
                state.message = Some(EMPTY_TOKEN_HINT.to_string());
                return DispatchResult::changed();
            }
            state.message = None;
            state.token = token;
            state.focus = FocusArea::Table;
            start_load(state)
        }

        Action::SearchReset => {
            reset_to_default(state);
            state.message = None;
            start_load(state)
        }

        // ===== Catalog =====
        Action::CatalogDidLoad { request, entries } => {
            if request != state.request_id {
                tracing::debug!(request, current = state.request_id, "dropping stale catalog");
                return DispatchResult::unchanged();
            }
            state.catalog_loading = false;
            state.entries = entries;
            state.selected = state.rows().first().map(|entry| entry.name.clone());

            let mut effects: Vec<Effect> = Vec::new();
            for entry in &state.entries {
                if let Some(url) = entry.sprites.standard.as_deref() {
                    let already_queued = effects.iter().any(|effect| {
                        matches!(effect, Effect::LoadSprite { url: queued } if queued == url)
                    });
                    if state.needs_sprite(url) && !already_queued {
                        effects.push(Effect::LoadSprite {
                            url: url.to_string(),
                        });
                    }
                }
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::CatalogDidNotFound { request, name } => {
            if request != state.request_id {
                return DispatchResult::unchanged();
            }
            tracing::info!(%name, "name search found nothing, reloading default list");
            state.message = Some(NOT_FOUND_MESSAGE.to_string());
            reset_to_default(state);
            start_load(state)
        }

        Action::CatalogDidError { request, error } => {
            if request != state.request_id {
                return DispatchResult::unchanged();
            }
            state.catalog_loading = false;
            state.message = Some(format!("Failed to load Pokemon: {error}"));
            DispatchResult::changed()
        }

        // ===== Sprites =====
        Action::SpriteDidLoad { url, sprite } => {
            state.sprite_failures.remove(&url);
            state.sprites.insert(url, sprite);
            DispatchResult::changed()
        }

        Action::SpriteDidError { url, error } => {
            tracing::debug!(%url, %error, "sprite unavailable");
            state.sprite_failures.insert(url);
            DispatchResult::changed()
        }

        // ===== Table =====
        Action::RowSelect(index) => {
            let Some(name) = state.rows().get(index).map(|entry| entry.name.clone()) else {
                return DispatchResult::unchanged();
            };
            if state.selected.as_deref() == Some(name.as_str()) {
                return DispatchResult::unchanged();
            }
            state.selected = Some(name);
            DispatchResult::changed()
        }

        Action::SortBy(column) => {
            let next = SortState::activate(state.sort, column);
            if next == state.sort {
                return DispatchResult::unchanged();
            }
            state.sort = next;
            DispatchResult::changed()
        }

        // ===== Detail =====
        Action::DetailOpen => {
            if state.view != ViewMode::List {
                return DispatchResult::unchanged();
            }
            let Some(id) = state.selected_entry().map(|entry| entry.id) else {
                return DispatchResult::unchanged();
            };
            state.detail = DataResource::Loading;
            state.pending_detail = Some(id);
            DispatchResult::changed_with(Effect::LoadSpecies { id })
        }

        Action::DetailDidLoad { id, species } => {
            if state.pending_detail != Some(id) {
                return DispatchResult::unchanged();
            }
            state.pending_detail = None;
            let Some(summary) = state.entry_by_id(id) else {
                state.detail = DataResource::Empty;
                state.message = Some(DETAIL_GONE_MESSAGE.to_string());
                return DispatchResult::changed();
            };
            let record = PokemonDetail::merge(summary, species);
            let view = DetailView::new(
                record,
                &state.preferences.locale,
                &state.preferences.default_version,
            );
            let effects: Vec<Effect> = [FormVariant::Standard, FormVariant::Alternate]
                .into_iter()
                .filter_map(|form| view.record.sprite_url(form))
                .filter(|url| state.needs_sprite(url))
                .map(|url| Effect::LoadSprite {
                    url: url.to_string(),
                })
                .collect();
            state.detail = DataResource::Loaded(view);
            state.view = ViewMode::Detail;
            DispatchResult::changed_with_many(effects)
        }

        Action::DetailDidError { id, error } => {
            if state.pending_detail != Some(id) {
                return DispatchResult::unchanged();
            }
            state.pending_detail = None;
            state.message = Some(format!("Failed to load details: {error}"));
            state.detail = DataResource::Failed(error);
            state.view = ViewMode::List;
            DispatchResult::changed()
        }

        Action::DetailClose => {
            if state.view == ViewMode::List && state.detail.is_empty() {
                return DispatchResult::unchanged();
            }
            state.view = ViewMode::List;
            state.detail = DataResource::Empty;
            state.pending_detail = None;
            DispatchResult::changed()
        }

        Action::DetailFormToggle => match state.current_detail().map(|view| view.form.toggle()) {
            Some(form) => set_form(state, form),
            None => DispatchResult::unchanged(),
        },

        Action::DetailFormSet(form) => set_form(state, form),

        Action::DescriptionSelect(index) => {
            let locale = state.preferences.locale.clone();
            let Some(view) = detail_mut(state) else {
                return DispatchResult::unchanged();
            };
            if index >= view.description_count(&locale) || index == view.description_index {
                return DispatchResult::unchanged();
            }
            view.description_index = index;
            DispatchResult::changed()
        }

        // ===== Cry =====
        Action::CryPlay => {
            let Some(view) = state.current_detail() else {
                return DispatchResult::unchanged();
            };
            match view.record.cry.clone() {
                Some(url) => DispatchResult::changed_with(Effect::PlayCry { url }),
                None => {
                    state.message = Some(NO_CRY_MESSAGE.to_string());
                    DispatchResult::changed()
                }
            }
        }

        Action::CryDidPlay => DispatchResult::unchanged(),

        Action::CryDidError(error) => {
            state.message = Some(format!("Cry error: {error}"));
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::FocusSet(focus) => {
            if state.focus == focus {
                return DispatchResult::unchanged();
            }
            state.focus = focus;
            DispatchResult::changed()
        }

        Action::FocusNext => {
            if state.view == ViewMode::Detail {
                return DispatchResult::unchanged();
            }
            state.focus = match state.focus {
                FocusArea::Search => FocusArea::Table,
                FocusArea::Table => FocusArea::Search,
            };
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if !state.is_busy() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Bump the request id and ask for the current token. A newer request makes
/// every older result stale.
fn start_load(state: &mut AppState) -> DispatchResult<Effect> {
    let Some(token) = SearchToken::parse(&state.token) else {
        state.message = Some(EMPTY_TOKEN_HINT.to_string());
        return DispatchResult::changed();
    };
    state.request_id = state.request_id.wrapping_add(1);
    state.catalog_loading = true;
    DispatchResult::changed_with(Effect::LoadCatalog {
        request: state.request_id,
        token,
    })
}

fn reset_to_default(state: &mut AppState) {
    let token = state.preferences.default_token();
    state.query = token.clone();
    state.token = token;
}

fn detail_mut(state: &mut AppState) -> Option<&mut DetailView> {
    if state.view != ViewMode::Detail {
        return None;
    }
    match &mut state.detail {
        DataResource::Loaded(view) => Some(view),
        _ => None,
    }
}

fn set_form(state: &mut AppState, form: FormVariant) -> DispatchResult<Effect> {
    let Some(view) = detail_mut(state) else {
        return DispatchResult::unchanged();
    };
    if view.form == form {
        return DispatchResult::unchanged();
    }
    view.form = form;
    let url = view.sprite_url().map(str::to_string);
    match url {
        Some(url) if state.needs_sprite(&url) => {
            DispatchResult::changed_with(Effect::LoadSprite { url })
        }
        _ => DispatchResult::changed(),
    }
}
