//! SummaryPanel — the daily digest with its narration controls.

use klasteri_api::model::summary_paragraphs;
use klasteri_api::timefmt;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, FetchStatus},
    component::Component,
    player::PlayerState,
    theme::{self, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, Badge},
    widgets::progress_bar,
};

pub struct SummaryPanel {
    scroll: u16,
    /// Progress track rect as last drawn, for click-to-seek hit-testing.
    bar_area: Rect,
}

impl SummaryPanel {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            bar_area: Rect::default(),
        }
    }

    fn player_line(&self, state: &AppState) -> Line<'static> {
        let p = &state.player;
        let (icon, label, color) = match p.state {
            Some(PlayerState::Loading) => ("◌", "duke u ngarkuar…".to_string(), C_SECONDARY),
            Some(PlayerState::Playing) => (
                "▶",
                format!("edhe {}", timefmt::remaining(p.remaining_secs)),
                C_PLAYING,
            ),
            Some(PlayerState::Paused) => ("⏸", "pauzë".to_string(), C_SECONDARY),
            _ => ("▷", "p për ta dëgjuar".to_string(), C_MUTED),
        };
        let mut spans = vec![Span::styled(
            format!(" {} ", icon),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if !label.is_empty() {
            spans.push(Span::styled(label, Style::default().fg(color)));
        }
        Line::from(spans)
    }
}

impl Component for SummaryPanel {
    fn id(&self) -> ComponentId {
        ComponentId::SummaryPanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll += 1,
            KeyCode::Enter | KeyCode::Char('p') => return vec![Action::PlaySummary],
            KeyCode::Char(' ') => return vec![Action::TogglePauseSummary],
            KeyCode::Char('s') => return vec![Action::StopSummary],
            KeyCode::Left => {
                let p = &state.player;
                if p.is_active() {
                    let total = p.position_secs + p.remaining_secs;
                    if total > 0.0 {
                        let f = ((p.position_secs - 10.0).max(0.0)) / total;
                        return vec![Action::SeekFraction(f)];
                    }
                }
            }
            KeyCode::Right => {
                let p = &state.player;
                if p.is_active() {
                    let total = p.position_secs + p.remaining_secs;
                    if total > 0.0 {
                        let f = ((p.position_secs + 10.0).min(total)) / total;
                        return vec![Action::SeekFraction(f)];
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll += 1,
            MouseEventKind::Down(MouseButton::Left) => {
                let bar = self.bar_area;
                if bar.height > 0
                    && event.row == bar.y
                    && state.player.is_active()
                {
                    let total = state.player.position_secs + state.player.remaining_secs;
                    if let Some(f) = progress_bar::hit_fraction(
                        bar,
                        event.column,
                        Some(state.player.position_secs),
                        Some(total),
                    ) {
                        return vec![Action::SeekFraction(f)];
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::Refresh = action {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.bar_area = Rect::default();

        let badge = state.summary.as_ref().and_then(|s| {
            s.has_audio.then_some(Badge {
                text: "♪",
                color: C_PLAYING,
            })
        });
        let block = pane_chrome("përmbledhja", Some('3'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(summary) = &state.summary else {
            let msg = match state.summary_status {
                FetchStatus::Loading | FetchStatus::Idle => "duke u ngarkuar…",
                FetchStatus::Failed => "përmbledhja s'u ngarkua",
                FetchStatus::Loaded => "ende pa përmbledhje për sot",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", msg), theme::style_muted())),
                inner,
            );
            return;
        };

        let mut lines: Vec<Line> = vec![Line::from(Span::styled(
            timefmt::summary_time_label(&summary.created_at, state.now),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ))];

        for paragraph in summary_paragraphs(&summary.summary_text) {
            lines.push(Line::default());
            let spans: Vec<Span> = paragraph
                .into_iter()
                .map(|s| {
                    if s.bold {
                        Span::styled(
                            s.text,
                            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::styled(s.text, Style::default().fg(C_SECONDARY))
                    }
                })
                .collect();
            lines.push(Line::from(spans));
        }

        if let Some(refs) = &summary.clusters {
            if !refs.is_empty() {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "lexo më shumë",
                    Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
                )));
                for r in refs {
                    lines.push(Line::from(Span::styled(
                        format!("  · {}", r.title),
                        Style::default().fg(C_SECONDARY),
                    )));
                }
            }
        }

        // Reserve the bottom rows for the narration controls when available.
        let text_area = if summary.has_audio && inner.height > 3 {
            Rect {
                height: inner.height - 2,
                ..inner
            }
        } else {
            inner
        };

        let max_scroll = (lines.len() as u16).saturating_sub(text_area.height);
        if self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            text_area,
        );

        if summary.has_audio && inner.height > 3 {
            let controls = Rect::new(inner.x, inner.y + inner.height - 2, inner.width, 1);
            frame.render_widget(Paragraph::new(self.player_line(state)), controls);

            let bar = Rect::new(inner.x + 1, inner.y + inner.height - 1, inner.width.saturating_sub(2), 1);
            if state.player.is_active() {
                let total = state.player.position_secs + state.player.remaining_secs;
                progress_bar::draw_progress(
                    frame,
                    bar,
                    state.player.progress,
                    Some(state.player.position_secs),
                    (total > 0.0).then_some(total),
                );
                self.bar_area = bar;
            } else {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        "─".repeat(bar.width as usize),
                        Style::default().fg(theme::C_SEPARATOR),
                    )),
                    bar,
                );
            }
        }
    }
}

impl Default for SummaryPanel {
    fn default() -> Self {
        Self::new()
    }
}
