pub mod detail_panel;
pub mod footer;
pub mod pokedex_table;
pub mod search_bar;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Color;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use detail_panel::{DetailPanel, DetailPanelProps};
pub use footer::{Footer, FooterProps};
pub use pokedex_table::{PokedexTable, PokedexTableProps};
pub use search_bar::{SearchBar, SearchBarProps};

pub const BG_PANEL: Color = Color::Rgb(24, 24, 32);
pub const BG_HIGHLIGHT: Color = Color::Rgb(150, 32, 40);
pub const TEXT_MAIN: Color = Color::Rgb(236, 236, 240);
pub const TEXT_DIM: Color = Color::Rgb(150, 150, 165);
pub const ACCENT_RED: Color = Color::Rgb(230, 60, 60);
pub const ACCENT_GOLD: Color = Color::Rgb(240, 200, 80);

/// Search bar, main panel and status bar.
pub struct ScreenLayout {
    pub search: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .split(area);
    ScreenLayout {
        search: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

pub fn spinner_frame(tick: u64) -> char {
    match tick % 4 {
        0 => '|',
        1 => '/',
        2 => '-',
        _ => '\\',
    }
}
