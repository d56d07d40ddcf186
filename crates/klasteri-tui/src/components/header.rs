//! Header strip — app name plus the category tab row.
//!
//! Not a focusable component: the App draws it directly and forwards mouse
//! clicks for tab switching.

use klasteri_api::model::Category;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Action;
use crate::app_state::{AppState, View};
use crate::theme::{category_color, C_MUTED, C_PRIMARY, C_SECONDARY};

pub struct Header {
    /// Column spans of each tab as last drawn, for mouse hit-testing.
    tab_spans: Vec<(Category, u16, u16)>, // (category, x_start, x_end)
}

impl Header {
    pub fn new() -> Self {
        Self {
            tab_spans: Vec::new(),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.tab_spans.clear();

        let mut spans = vec![
            Span::styled(
                " klasteri ",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled("│", Style::default().fg(C_MUTED)),
        ];
        let mut x = area.x + 11;

        for category in Category::ALL {
            let label = format!(" {} ", category.label());
            let width = label.chars().count() as u16;
            let active = state.view != View::Search && state.category == category;
            let style = if active {
                Style::default()
                    .fg(category_color(category))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            spans.push(Span::styled(label, style));
            self.tab_spans.push((category, x, x + width));
            x += width;
        }

        if state.view == View::Search {
            if let Some(results) = &state.search_results {
                spans.push(Span::styled(
                    format!("  kërkim: \"{}\" ({})", results.query, results.total_count),
                    Style::default().fg(C_SECONDARY),
                ));
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// A left click on a tab switches category.
    pub fn hit_tab(&self, column: u16, row: u16, area: Rect) -> Option<Action> {
        if row != area.y {
            return None;
        }
        self.tab_spans
            .iter()
            .find(|(_, start, end)| column >= *start && column < *end)
            .map(|(category, _, _)| Action::SwitchCategory(*category))
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}
