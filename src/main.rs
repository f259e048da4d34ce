//! Pokedex TUI - search PokeAPI, sort the results, inspect a Pokemon

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokedex::action::Action;
use pokedex::api::{self, PokeApi, PokemonSource, DEFAULT_API_BASE};
use pokedex::audio;
use pokedex::catalog;
use pokedex::components::{
    screen_layout, Component, DetailPanel, DetailPanelProps, Footer, FooterProps, PokedexTable,
    PokedexTableProps, SearchBar, SearchBarProps,
};
use pokedex::effect::Effect;
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::sprite;
use pokedex::state::{
    AppState, FocusArea, Preferences, ViewMode, DEFAULT_COUNT, DEFAULT_LOCALE, DEFAULT_VERSION,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

const TICK_MS: u64 = 120;

/// Terminal Pokedex backed by PokeAPI
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse Pokemon from PokeAPI in the terminal")]
struct Args {
    /// Initial search: a count (first N Pokemon) or a name
    #[arg(long, short)]
    search: Option<String>,

    /// Count loaded on start and after a failed name search
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    default_count: u32,

    /// Language of the descriptions
    #[arg(long, default_value = DEFAULT_LOCALE)]
    locale: String,

    /// Game version whose description is selected first
    #[arg(long, default_value = DEFAULT_VERSION)]
    default_version: String,

    /// PokeAPI base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// HTTP timeout in seconds (minimum 1)
    #[arg(
        long,
        default_value_t = api::DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Append logs to this file (nothing is logged without it)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "pokedex=trace"
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokedexComponentId {
    Search,
    Table,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokedexContext {
    Search,
    Table,
    Detail,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        if self.view == ViewMode::Detail {
            return Some(PokedexComponentId::Detail);
        }
        match self.focus {
            FocusArea::Search => Some(PokedexComponentId::Search),
            FocusArea::Table => Some(PokedexComponentId::Table),
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        if self.view == ViewMode::Detail {
            Some(PokedexComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::Search => PokedexContext::Search,
            PokedexComponentId::Table => PokedexContext::Table,
            PokedexComponentId::Detail => PokedexContext::Detail,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::Table
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        search,
        default_count,
        locale,
        default_version,
        api_base,
        timeout_secs,
        log_file,
        log_level,
        debug: debug_args,
    } = Args::parse();

    if let Some(path) = &log_file {
        logging::init(path, &log_level)?;
    }
    let client =
        PokeApi::new(&api_base, Duration::from_secs(timeout_secs)).map_err(io::Error::other)?;
    tracing::info!(base = client.base_url(), "starting pokedex");
    api::install(client);

    let preferences = Preferences {
        default_count,
        locale,
        default_version,
    };

    let debug = DebugSession::new(debug_args);
    let state = debug
        .load_state_or_else_async(move || async move {
            let state = AppState::new(preferences);
            let state = match search {
                Some(token) => state.with_search(token),
                None => state,
            };
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

struct PokedexUi {
    search: SearchBar,
    table: PokedexTable,
    detail: DetailPanel,
    footer: Footer,
}

impl PokedexUi {
    fn new() -> Self {
        Self {
            search: SearchBar::new(),
            table: PokedexTable::new(),
            detail: DetailPanel::new(),
            footer: Footer::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        let layout = screen_layout(area);
        let list_mode = state.view == ViewMode::List;

        event_ctx.set_component_area(PokedexComponentId::Search, layout.search);
        self.search.render(
            frame,
            layout.search,
            SearchBarProps {
                query: &state.query,
                is_focused: render_ctx.is_focused()
                    && list_mode
                    && state.focus == FocusArea::Search,
            },
        );

        if list_mode {
            event_ctx.set_component_area(PokedexComponentId::Table, layout.body);
            event_ctx
                .component_areas
                .remove(&PokedexComponentId::Detail);
            self.table.render(
                frame,
                layout.body,
                PokedexTableProps {
                    state,
                    is_focused: render_ctx.is_focused() && state.focus == FocusArea::Table,
                },
            );
        } else {
            event_ctx.set_component_area(PokedexComponentId::Detail, layout.body);
            event_ctx
                .component_areas
                .remove(&PokedexComponentId::Table);
            self.detail.render(
                frame,
                layout.body,
                DetailPanelProps {
                    state,
                    is_focused: render_ctx.is_focused(),
                },
            );
        }

        self.footer.render(frame, layout.footer, FooterProps { state });
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            query: &state.query,
            is_focused: true,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_table_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = PokedexTableProps {
            state,
            is_focused: true,
        };
        respond(self.table.handle_event(event, props).into_iter().collect())
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DetailPanelProps {
            state,
            is_focused: true,
        };
        respond(self.detail.handle_event(event, props).into_iter().collect())
    }
}

fn respond(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> = EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_search = Rc::clone(&ui);
    bus.register(PokedexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_table = Rc::clone(&ui);
    bus.register(PokedexComponentId::Table, move |event, state| {
        ui_table
            .borrow_mut()
            .handle_table_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokedexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, state| {
        let typing = state.view == ViewMode::List && state.focus == FocusArea::Search;
        match event.kind {
            EventKind::Resize(width, height) => {
                HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
            }
            EventKind::Key(key) => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    HandlerResponse::action(Action::Quit)
                }
                KeyCode::Char('q') if !typing => HandlerResponse::action(Action::Quit),
                KeyCode::Tab if !typing && state.view == ViewMode::List => {
                    HandlerResponse::action(Action::FocusNext)
                }
                _ => HandlerResponse::ignored(),
            },
            _ => HandlerResponse::ignored(),
        }
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    tracing::debug!(?effect, "effect");
    match effect {
        Effect::LoadCatalog { request, token } => {
            // Same key: a newer search aborts the batch still in flight.
            ctx.tasks().spawn(TaskKey::new("catalog"), async move {
                match catalog::load_catalog(api::client(), &token).await {
                    Ok(entries) => Action::CatalogDidLoad { request, entries },
                    Err(error) => catalog::failure_action(request, &token, error),
                }
            });
        }
        Effect::LoadSpecies { id } => {
            ctx.tasks().spawn(TaskKey::new("species"), async move {
                match api::client().fetch_species(id).await {
                    Ok(species) => Action::DetailDidLoad { id, species },
                    Err(error) => Action::DetailDidError {
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadSprite { url } => {
            let key = format!("sprite_{url}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let bytes = match api::client().fetch_bytes(&url).await {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        return Action::SpriteDidError {
                            url,
                            error: error.to_string(),
                        }
                    }
                };
                match sprite::decode_sprite(&bytes) {
                    Ok(sprite) => Action::SpriteDidLoad { url, sprite },
                    Err(error) => Action::SpriteDidError {
                        url,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::PlayCry { url } => {
            ctx.tasks().spawn(TaskKey::new("cry"), async move {
                let bytes = match api::client().fetch_bytes(&url).await {
                    Ok(bytes) => bytes,
                    Err(error) => return Action::CryDidError(error.to_string()),
                };
                match tokio::task::spawn_blocking(move || audio::play_cry(bytes)).await {
                    Ok(Ok(())) => Action::CryDidPlay,
                    Ok(Err(error)) => Action::CryDidError(error.to_string()),
                    Err(error) => Action::CryDidError(error.to_string()),
                }
            });
        }
    }
}
