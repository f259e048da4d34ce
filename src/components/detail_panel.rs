use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle,
};

use super::{Component, ACCENT_GOLD, ACCENT_RED, BG_HIGHLIGHT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::display::{capitalize, height_inches, type_line, weight_kgs, yes_no};
use crate::state::{AppState, DetailView, FormVariant};

const SPRITE_PANEL_WIDTH: u16 = 34;
const VERSION_LIST_WIDTH: u16 = 18;

pub struct DetailPanelProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

pub struct DetailPanel {
    versions: SelectList,
}

impl Default for DetailPanel {
    fn default() -> Self {
        Self {
            versions: SelectList::new(),
        }
    }
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Label/value pairs of the fact table.
pub fn fact_rows(view: &DetailView) -> Vec<(&'static str, String)> {
    let record = &view.record;
    vec![
        ("Pokedex #", record.id.to_string()),
        ("Height", height_inches(record.height)),
        ("Weight", weight_kgs(record.weight)),
        (
            "Has Different Appearance per gender?",
            yes_no(record.has_gender_differences).to_string(),
        ),
        ("Is a baby?", yes_no(record.is_baby).to_string()),
        ("Is a Legendary?", yes_no(record.is_legendary).to_string()),
        ("Is a Mythical Pokemon?", yes_no(record.is_mythical).to_string()),
        ("Type", type_line(&record.types)),
    ]
}

fn version_items(view: &DetailView, locale: &str) -> Vec<Line<'static>> {
    view.record
        .descriptions(locale)
        .map(|entry| Line::from(capitalize(&entry.version)))
        .collect()
}

fn version_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn render_sprite(frame: &mut Frame, area: Rect, state: &AppState, view: &DetailView) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(area);

    let selected = match view.form {
        FormVariant::Standard => 0,
        FormVariant::Alternate => 1,
    };
    let tabs = Tabs::new(vec![
        FormVariant::Standard.label(),
        FormVariant::Alternate.label(),
    ])
    .select(selected)
    .style(Style::default().fg(TEXT_DIM))
    .highlight_style(
        Style::default()
            .fg(ACCENT_RED)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(tabs, chunks[0]);

    let image_area = chunks[1];
    let lines = match view.sprite_url() {
        None => vec![Line::from("No image for this form")],
        Some(url) => match state.sprites.get(url) {
            Some(sprite) => sprite.to_lines(image_area.width, image_area.height),
            None if state.sprite_failures.contains(url) => vec![Line::from("Image unavailable")],
            None => vec![Line::from("Loading image...")],
        },
    };
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        image_area,
    );
}

fn render_facts(frame: &mut Frame, area: Rect, view: &DetailView) {
    let rows: Vec<Row> = fact_rows(view)
        .into_iter()
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(label).style(Style::default().fg(TEXT_DIM)),
                Cell::from(value).style(Style::default().fg(TEXT_MAIN)),
            ])
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(38), Constraint::Min(10)])
        .block(Block::default().borders(Borders::TOP).title(" Facts "))
        .column_spacing(1);
    frame.render_widget(table, area);
}

impl Component<Action> for DetailPanel {
    type Props<'a> = DetailPanelProps<'a>;

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
        let Some(view) = props.state.current_detail() else {
            return None;
        };
        let count = view.description_count(&props.state.preferences.locale);
        let index = view.description_index;

        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('x') => Some(Action::DetailClose),
            KeyCode::Left | KeyCode::Right | KeyCode::Char('s') => Some(Action::DetailFormToggle),
            KeyCode::Char('1') => Some(Action::DetailFormSet(FormVariant::Standard)),
            KeyCode::Char('2') => Some(Action::DetailFormSet(FormVariant::Alternate)),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => Some(Action::CryPlay),
            KeyCode::Up | KeyCode::Char('k') if index > 0 => {
                Some(Action::DescriptionSelect(index - 1))
            }
            KeyCode::Down | KeyCode::Char('j') if index + 1 < count => {
                Some(Action::DescriptionSelect(index + 1))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let Some(view) = state.current_detail() else {
            return;
        };
        let locale = state.preferences.locale.as_str();

        let border_style = if props.is_focused {
            Style::default().fg(ACCENT_RED)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" #{} {} ", view.record.id, capitalize(&view.record.name)))
            .title_style(Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD))
            .border_style(border_style)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::horizontal([
            Constraint::Length(SPRITE_PANEL_WIDTH),
            Constraint::Min(20),
        ])
        .split(inner);
        render_sprite(frame, columns[0], state, view);

        let right = Layout::vertical([Constraint::Min(4), Constraint::Length(9)]).split(columns[1]);
        let about = Layout::horizontal([
            Constraint::Length(VERSION_LIST_WIDTH),
            Constraint::Min(10),
        ])
        .split(right[0]);

        let items = version_items(view, locale);
        let props_list = SelectListProps {
            items: &items,
            count: items.len(),
            selected: view.description_index.min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: version_list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::DescriptionSelect,
            render_item: &|item| item.clone(),
        };
        self.versions.render(frame, about[0], props_list);

        let description = view
            .selected_description(locale)
            .map(|entry| entry.text.clone())
            .unwrap_or_else(|| "No description available.".to_string());
        frame.render_widget(
            Paragraph::new(description)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::LEFT)),
            about[1],
        );

        render_facts(frame, right[1], view);
    }
}
