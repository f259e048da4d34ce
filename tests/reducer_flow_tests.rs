//! Store-level flows driven through EffectStoreTestHarness

use pokedex::{
    action::Action,
    catalog::SearchToken,
    columns::{Column, SortDirection},
    components::{Component, PokedexTable, PokedexTableProps},
    effect::Effect,
    reducer::reducer,
    state::{
        AppState, FlavorText, PokemonSpecies, PokemonSummary, SpritePair, ViewMode,
        NOT_FOUND_MESSAGE,
    },
};
use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;

fn summary(id: u32, name: &str) -> PokemonSummary {
    PokemonSummary {
        id,
        name: name.into(),
        height: 7,
        weight: 69,
        sprites: SpritePair {
            standard: Some(format!("https://img/{id}.png")),
            alternate: Some(format!("https://img/shiny/{id}.png")),
        },
        types: vec!["grass".into(), "poison".into()],
        cry: Some(format!("https://cry/{id}.ogg")),
    }
}

fn first_n(count: u32) -> Vec<PokemonSummary> {
    (1..=count).map(|id| summary(id, &format!("mon{id}"))).collect()
}

fn species(id: u32) -> PokemonSpecies {
    PokemonSpecies {
        id,
        name: format!("mon{id}"),
        is_baby: false,
        is_legendary: false,
        is_mythical: true,
        has_gender_differences: false,
        flavor_text_entries: vec![
            FlavorText {
                version: "red".into(),
                language: "en".into(),
                text: "Red entry".into(),
            },
            FlavorText {
                version: "rouge".into(),
                language: "fr".into(),
                text: "Entrée".into(),
            },
        ],
    }
}

/// Pull the request id out of the single LoadCatalog effect.
fn catalog_request(effects: &[Effect]) -> (u64, SearchToken) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::LoadCatalog { request, token } => Some((*request, token.clone())),
            _ => None,
        })
        .expect("LoadCatalog effect")
}

#[test]
fn startup_loads_default_count() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.catalog_loading);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    let (request, token) = catalog_request(&effects);
    assert_eq!(token, SearchToken::Count(10));

    harness.complete_action(Action::CatalogDidLoad {
        request,
        entries: first_n(10),
    });
    harness.process_emitted();

    harness.assert_state(|s| !s.catalog_loading);
    harness.assert_state(|s| {
        s.entries.iter().map(|e| e.id).collect::<Vec<_>>() == (1..=10).collect::<Vec<_>>()
    });
    harness.assert_state(|s| s.selected.as_deref() == Some("mon1"));

    // One sprite request per row
    let effects = harness.drain_effects();
    effects.effects_count(10);
    effects.effects_all_match(|e| matches!(e, Effect::LoadSprite { .. }));
}

#[test]
fn name_search_yields_one_entry() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchSubmit("Pikachu".into()));
    let (request, token) = catalog_request(&harness.drain_effects());
    assert_eq!(token, SearchToken::Name("pikachu".into()));

    harness.complete_action(Action::CatalogDidLoad {
        request,
        entries: vec![summary(25, "pikachu")],
    });
    harness.process_emitted();

    harness.assert_state(|s| s.entries.len() == 1 && s.entries[0].name == "pikachu");
}

#[test]
fn invalid_name_falls_back_to_default_list() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchSubmit("notapokemon".into()));
    let (request, _) = catalog_request(&harness.drain_effects());

    harness.complete_action(Action::CatalogDidNotFound {
        request,
        name: "notapokemon".into(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.token == "10");
    harness.assert_state(|s| s.message.as_deref() == Some(NOT_FOUND_MESSAGE));

    let (reload, token) = catalog_request(&harness.drain_effects());
    assert_eq!(token, SearchToken::Count(10));
    assert!(reload > request);

    harness.complete_action(Action::CatalogDidLoad {
        request: reload,
        entries: first_n(10),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.entries.len() == 10);
    // The not-found message survives the reload
    harness.assert_state(|s| s.message.as_deref() == Some(NOT_FOUND_MESSAGE));
}

#[test]
fn superseded_batch_never_overwrites_newer_results() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchSubmit("50".into()));
    let (old, _) = catalog_request(&harness.drain_effects());
    harness.dispatch_collect(Action::SearchSubmit("3".into()));
    let (new, _) = catalog_request(&harness.drain_effects());

    harness.complete_action(Action::CatalogDidLoad {
        request: new,
        entries: first_n(3),
    });
    harness.complete_action(Action::CatalogDidLoad {
        request: old,
        entries: first_n(50),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.entries.len() == 3);
}

#[test]
fn detail_open_and_close() {
    let state = AppState {
        entries: first_n(3),
        selected: Some("mon2".into()),
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::DetailOpen);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::LoadSpecies { id: 2 }));
    harness.assert_state(|s| s.view == ViewMode::List && s.detail.is_loading());

    harness.complete_action(Action::DetailDidLoad {
        id: 2,
        species: species(2),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.view == ViewMode::Detail);
    harness.assert_state(|s| {
        let view = s.current_detail().expect("detail");
        view.record.is_mythical
            && view.record.weight == 69
            && view.description_count("en") == 1
            && view.selected_description("en").map(|d| d.text.as_str()) == Some("Red entry")
    });

    harness.dispatch_collect(Action::DetailClose);
    harness.assert_state(|s| s.view == ViewMode::List);
    harness.assert_state(|s| s.current_detail().is_none() && s.detail.is_empty());
}

#[test]
fn cry_and_form_in_detail() {
    let state = AppState {
        entries: first_n(1),
        selected: Some("mon1".into()),
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::DetailOpen);
    harness.complete_action(Action::DetailDidLoad {
        id: 1,
        species: species(1),
    });
    harness.process_emitted();
    harness.drain_effects();

    harness.dispatch_collect(Action::CryPlay);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::PlayCry { url } if url == "https://cry/1.ogg"),
    );

    harness.dispatch_collect(Action::DetailFormToggle);
    harness.assert_state(|s| {
        s.current_detail().and_then(|v| v.sprite_url()) == Some("https://img/shiny/1.png")
    });
}

#[test]
fn keyboard_sort_through_table() {
    let state = AppState {
        entries: vec![summary(2, "ivysaur"), summary(1, "bulbasaur")],
        selected: Some("ivysaur".into()),
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    let mut table = PokedexTable::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("1", |state, event| {
        let props = PokedexTableProps {
            state,
            is_focused: true,
        };
        table
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_count(1);
    actions.assert_first(Action::SortBy(Column::Id));

    harness.dispatch_all(actions);
    harness.assert_state(|s| s.rows()[0].name == "bulbasaur");
    // Selection follows the name, not the position
    harness.assert_state(|s| s.selected_index() == Some(1));

    harness.dispatch_collect(Action::SortBy(Column::Id));
    harness.assert_state(|s| s.sort.map(|x| x.direction) == Some(SortDirection::Descending));
    harness.assert_state(|s| s.rows()[0].name == "ivysaur");
}
