//! SearchInput — wraps tui-input for the server-side search bar.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED};

pub enum SearchEvent {
    Changed,
    /// Enter pressed with the current query.
    Submitted(String),
    Cancelled,
}

pub struct SearchInput {
    input: Input,
    pub active: bool,
}

impl SearchInput {
    pub fn new() -> Self {
        Self {
            input: Input::default(),
            active: false,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    /// Handle a key event. Returns what happened.
    ///
    /// Esc behaviour:
    ///   - If the input has text: clear the text (keeps the bar open but empty)
    ///   - If the input is already empty: deactivate and emit `Cancelled`
    pub fn handle_key(&mut self, key: KeyEvent) -> SearchEvent {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.input = Input::default();
                    SearchEvent::Changed
                } else {
                    self.deactivate();
                    SearchEvent::Cancelled
                }
            }
            KeyCode::Enter => {
                let query = self.input.value().to_string();
                self.deactivate();
                SearchEvent::Submitted(query)
            }
            _ => {
                self.input
                    .handle_event(&ratatui::crossterm::event::Event::Key(key));
                SearchEvent::Changed
            }
        }
    }

    /// Render the search bar into `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(4) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled("/ kërko lajme…", Style::default().fg(C_MUTED))
        } else {
            // scroll is a column offset, never a byte offset; slicing the
            // string there splits multibyte characters like 'ë'.
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!("/ {}", visible), Style::default().fg(C_FILTER_FG))
        };

        let paragraph =
            Paragraph::new(Line::from(vec![display])).style(Style::default().bg(C_FILTER_BG));
        frame.render_widget(paragraph, area);

        if self.active && !value.is_empty() {
            let cursor_x = area.x + 2 + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::Terminal;

    fn type_chars(input: &mut SearchInput, c: char, n: usize) {
        for _ in 0..n {
            let _ = input.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn long_multibyte_query_scrolls_without_panicking() {
        let mut input = SearchInput::new();
        input.activate();
        // 'ë' is two bytes; enough of them force the bar to scroll
        type_chars(&mut input, 'ë', 41);

        let backend = TestBackend::new(20, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| input.draw(f, f.area()))
            .expect("draw must not panic on a scrolled multibyte query");
    }

    #[test]
    fn esc_clears_before_it_cancels() {
        let mut input = SearchInput::new();
        input.activate();
        type_chars(&mut input, 'a', 3);

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(input.handle_key(esc), SearchEvent::Changed));
        assert!(input.active);
        assert!(matches!(input.handle_key(esc), SearchEvent::Cancelled));
        assert!(!input.active);
    }
}
