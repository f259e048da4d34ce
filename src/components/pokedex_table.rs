use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tui_dispatch::EventKind;

use super::{
    spinner_frame, Component, ACCENT_GOLD, ACCENT_RED, BG_HIGHLIGHT, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::columns::Column;
use crate::state::{AppState, FocusArea, PokemonSummary};

pub const LOADING_LABEL: &str = "Gotta Catch 'Em All";
const ROW_HEIGHT: u16 = 3;
const SPRITE_COLS: u16 = 8;
const PAGE: usize = 10;

pub struct PokedexTableProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct PokedexTable {
    table_state: TableState,
}

impl PokedexTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn header(state: &AppState) -> Row<'static> {
        let cells = Column::ALL.iter().map(|column| {
            let mut title = column.title().to_string();
            if let Some(sort) = state.sort.filter(|sort| sort.column == *column) {
                title.push(' ');
                title.push_str(sort.direction.arrow());
            }
            Cell::from(title)
        });
        Row::new(cells)
            .style(
                Style::default()
                    .fg(ACCENT_GOLD)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1)
    }

    fn row(state: &AppState, entry: &PokemonSummary) -> Row<'static> {
        let cells = Column::ALL.iter().map(|column| match column {
            Column::Sprite => Cell::from(sprite_cell(state, entry)),
            Column::View => Cell::from(Span::styled(
                column.cell_text(entry),
                Style::default().fg(ACCENT_RED),
            )),
            _ => Cell::from(column.cell_text(entry)),
        });
        Row::new(cells).height(ROW_HEIGHT)
    }
}

fn sprite_cell(state: &AppState, entry: &PokemonSummary) -> Text<'static> {
    let Some(url) = entry.sprites.standard.as_deref() else {
        return Text::from("-");
    };
    match state.sprites.get(url) {
        Some(sprite) => Text::from(sprite.to_lines(SPRITE_COLS, ROW_HEIGHT)),
        None if state.sprite_failures.contains(url) => Text::from("?"),
        None => Text::from(Span::styled("...", Style::default().fg(TEXT_DIM))),
    }
}

fn widths() -> [Constraint; 6] {
    [
        Constraint::Length(6),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(SPRITE_COLS + 2),
        Constraint::Length(10),
    ]
}

impl Component<Action> for PokedexTable {
    type Props<'a> = PokedexTableProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        let count = props.state.entries.len();
        let last = count.saturating_sub(1);
        let current = props.state.selected_index().unwrap_or(0);
        let select = |index: usize| (count > 0).then_some(Action::RowSelect(index.min(last)));

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => select(current.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => select(current + 1),
            KeyCode::PageUp => select(current.saturating_sub(PAGE)),
            KeyCode::PageDown => select(current + PAGE),
            KeyCode::Home | KeyCode::Char('g') => select(0),
            KeyCode::End | KeyCode::Char('G') => select(last),
            KeyCode::Enter | KeyCode::Char('v') => Some(Action::DetailOpen),
            KeyCode::Char('/') => Some(Action::FocusSet(FocusArea::Search)),
            KeyCode::Char('r') => Some(Action::SearchReset),
            KeyCode::Char(ch) => Column::from_shortcut(ch).map(Action::SortBy),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let border_style = if props.is_focused {
            Style::default().fg(ACCENT_RED)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let title = format!(" Pokedex ({}) ", state.entries.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));

        if state.entries.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let text = if state.catalog_loading {
                format!("{} {}", spinner_frame(state.tick), LOADING_LABEL)
            } else {
                "No Pokemon to show".to_string()
            };
            let top = inner.y + inner.height / 2;
            let line_area = Rect::new(inner.x, top, inner.width, inner.height.min(1));
            frame.render_widget(
                Paragraph::new(Line::from(text)).alignment(Alignment::Center),
                line_area,
            );
            return;
        }

        let rows: Vec<Row> = state
            .rows()
            .into_iter()
            .map(|entry| Self::row(state, entry))
            .collect();
        let table = Table::new(rows, widths())
            .header(Self::header(state))
            .block(block)
            .column_spacing(1)
            .row_highlight_style(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        self.table_state.select(state.selected_index());
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}
