//! HelpOverlay — centered keybinding reference, toggled with `?`.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::pane_chrome,
};

const BINDINGS: &[(&str, &str)] = &[
    ("↑↓ / jk", "lëviz nëpër listë"),
    ("Enter", "hap storjen"),
    ("Esc / h", "kthehu mbrapa"),
    ("←→ / hl", "ndërro kategorinë"),
    ("/", "kërko (min 2 shkronja)"),
    ("r", "rifresko lajmet"),
    ("y", "kopjo linkun"),
    ("p", "nis / ndal narracionin"),
    ("Space", "pauzë / vazhdo"),
    ("s", "ndal narracionin"),
    ("Tab / 1-3", "ndërro panelin"),
    ("?", "kjo ndihmë"),
    ("q", "dil"),
];

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if self.visible {
            // any key closes
            self.visible = false;
        }
        vec![]
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.visible = !self.visible;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.visible {
            return;
        }
        let w = 46.min(area.width.saturating_sub(4));
        let h = (BINDINGS.len() as u16 + 4).min(area.height.saturating_sub(2));
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(w)) / 2,
            area.y + (area.height.saturating_sub(h)) / 2,
            w,
            h,
        );
        frame.render_widget(Clear, popup);

        let block = pane_chrome("ndihma", None, true, None);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines: Vec<Line> = Vec::new();
        for (key, what) in BINDINGS {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:<10}", key),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ),
                Span::styled(*what, Style::default().fg(C_SECONDARY)),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            " shtyp çfarëdo tasti për ta mbyllur",
            Style::default().fg(C_MUTED),
        )));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
