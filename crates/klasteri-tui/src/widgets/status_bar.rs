//! Status bar — bottom line with night indicator, mode, and keybindings.

use chrono::Timelike;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::{AppState, View};
use crate::player::PlayerState;
use crate::theme::{C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED, C_NIGHT, C_PLAYING, C_SECONDARY};

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let (label, label_color) = if state.searching {
        ("KËRKO", C_MODE_SEARCH)
    } else {
        match state.view {
            View::Feed => ("LAJME", C_MODE_NORMAL),
            View::Cluster => ("STORJA", C_MODE_NORMAL),
            View::Search => ("REZULTATE", C_MODE_NORMAL),
        }
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", label),
        Style::default()
            .fg(label_color)
            .add_modifier(Modifier::BOLD),
    )];

    if state.night_panels_visible() {
        spans.push(Span::styled(
            "☾ ",
            Style::default().fg(C_NIGHT).add_modifier(Modifier::BOLD),
        ));
    }
    if matches!(
        state.player.state,
        Some(PlayerState::Playing) | Some(PlayerState::Loading)
    ) {
        spans.push(Span::styled("▶ ", Style::default().fg(C_PLAYING)));
    }

    let keys = if state.searching {
        " type to search  Enter submit  Esc cancel"
    } else {
        match state.view {
            View::Feed => {
                " ↑↓/jk select  Enter open  ←→/hl category  / search  p narration  Space pause  r refresh  Tab panes  y copy link  ? help  q quit"
            }
            View::Cluster => {
                " ↑↓/jk sources  Esc back  y copy link  p narration  Space pause  ? help  q quit"
            }
            View::Search => " ↑↓/jk select  Enter open  / new search  Esc back  ? help  q quit",
        }
    };
    spans.push(Span::styled(keys, Style::default().fg(C_MUTED)));

    // Right side: wall clock, the input to the night gate.
    let clock = format!("{:02}:{:02} ", state.now.hour(), state.now.minute());
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let pad = (area.width as usize)
        .saturating_sub(used)
        .saturating_sub(clock.chars().count());
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(clock, Style::default().fg(C_SECONDARY)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the log bar: last error (if any) or a quiet idle line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let (dot, text) = match &state.error_message {
        Some(err) => (
            Span::styled("○", Style::default().fg(crate::theme::C_ERROR)),
            Span::styled(err.as_str(), Style::default().fg(C_SECONDARY)),
        ),
        None => (
            Span::styled("●", Style::default().fg(C_PLAYING)),
            Span::styled("", Style::default()),
        ),
    };
    let line = Line::from(vec![dot, Span::raw(" "), text]);
    frame.render_widget(Paragraph::new(line), area);
}
