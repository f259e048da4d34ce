use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    Frame,
};
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{spinner_frame, Component, ACCENT_GOLD, ACCENT_RED, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::{AppState, FocusArea, ViewMode};

pub struct FooterProps<'a> {
    pub state: &'a AppState,
}

pub struct Footer {
    status_bar: StatusBar,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            status_bar: StatusBar::new(),
        }
    }
}

impl Footer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Message first, then whatever is loading.
pub fn status_text(state: &AppState) -> String {
    if let Some(message) = &state.message {
        return message.clone();
    }
    let spinner = spinner_frame(state.tick);
    if state.catalog_loading {
        format!("{spinner} Loading Pokemon...")
    } else if state.detail.is_loading() {
        format!("{spinner} Loading details...")
    } else {
        String::new()
    }
}

fn hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.view == ViewMode::Detail {
        return vec![
            StatusBarHint::new("Esc", "Close"),
            StatusBarHint::new("s", "Form"),
            StatusBarHint::new("j/k", "Game"),
            StatusBarHint::new("p", "Cry"),
            StatusBarHint::new("q", "Quit"),
        ];
    }
    match state.focus {
        FocusArea::Search => vec![
            StatusBarHint::new("Enter", "Search"),
            StatusBarHint::new("Esc", "Table"),
        ],
        FocusArea::Table => vec![
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("1-5", "Sort"),
            StatusBarHint::new("Enter", "View"),
            StatusBarHint::new("r", "Home"),
            StatusBarHint::new("q", "Quit"),
        ],
    }
}

impl Component<Action> for Footer {
    type Props<'a> = FooterProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let status = status_text(state);
        let status_style = if state.message.is_some() {
            Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(ACCENT_GOLD)
        };
        let status_items = [StatusBarItem::span(Span::styled(status.as_str(), status_style))];
        let hints = hints(state);

        let style = StatusBarStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_RED)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let status_props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, status_props);
    }
}
