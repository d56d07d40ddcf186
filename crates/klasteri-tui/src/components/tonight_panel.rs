//! TonightPanel — the night-gated rail of currently trending clusters.

use klasteri_api::model::Category;
use klasteri_api::timefmt;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, FetchStatus},
    component::Component,
    theme::{self, source_color, C_MUTED, C_NIGHT, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct TonightPanel {
    selected: usize,
    scroll: usize,
}

impl TonightPanel {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll: 0,
        }
    }
}

impl Component for TonightPanel {
    fn id(&self) -> ComponentId {
        ComponentId::TonightPanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let len = state.tonight.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected = len.saturating_sub(1),
            KeyCode::Enter => {
                if let Some(cluster) = state.tonight.get(self.selected) {
                    return vec![Action::OpenCluster(cluster.id)];
                }
            }
            KeyCode::Char('y') => {
                if let Some(cluster) = state.tonight.get(self.selected) {
                    return vec![Action::CopyToClipboard(cluster.top_article.url.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        let len = state.tonight.len();
        match event.kind {
            MouseEventKind::ScrollUp => self.selected = self.selected.saturating_sub(1),
            MouseEventKind::ScrollDown => {
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let inner_top = area.y + 1;
                if event.row >= inner_top {
                    // two rows per entry
                    let idx = self.scroll + ((event.row - inner_top) / 2) as usize;
                    if idx < len {
                        if idx == self.selected {
                            return vec![Action::OpenCluster(state.tonight[idx].id)];
                        }
                        self.selected = idx;
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, _action: &Action, state: &AppState) -> Vec<Action> {
        if self.selected >= state.tonight.len() {
            self.selected = state.tonight.len().saturating_sub(1);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = match state.tonight_status {
            FetchStatus::Failed => Some(Badge {
                text: "ERR",
                color: theme::C_ERROR,
            }),
            _ => Some(Badge {
                text: "☾",
                color: C_NIGHT,
            }),
        };
        let block = pane_chrome("sonte", Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.tonight.is_empty() {
            let msg = match state.tonight_status {
                FetchStatus::Loading | FetchStatus::Idle => "duke u ngarkuar…",
                FetchStatus::Failed => "rail-i i mbrëmjes s'u ngarkua",
                FetchStatus::Loaded => "asgjë për sonte",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", msg), theme::style_muted())),
                inner,
            );
            return;
        }

        // Two lines per entry: clock + title, then source and counts.
        let rows = (inner.height / 2) as usize;
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if rows > 0 && self.selected >= self.scroll + rows {
            self.scroll = self.selected + 1 - rows;
        }

        let mut lines: Vec<Line> = Vec::new();
        for (i, cluster) in state
            .tonight
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(rows)
        {
            let selected = i == self.selected;
            let category = cluster.category.as_deref().and_then(Category::from_key);
            let title_style = if selected && focused {
                theme::style_selected_focused()
            } else if selected {
                theme::style_selected()
            } else {
                theme::style_default()
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:>9} ", timefmt::clock_time(&cluster.top_article.crawled_at, state.now)),
                    Style::default().fg(C_SECONDARY),
                ),
                Span::styled(cluster.title.as_str(), title_style),
            ]));
            lines.push(Line::from(vec![
                Span::raw("           "),
                Span::styled(
                    cluster.top_article.source_name.as_str(),
                    Style::default().fg(source_color(&cluster.top_article.source_name, category)),
                ),
                Span::styled(
                    format!(
                        "  {}/{} sot",
                        cluster.today_article_count, cluster.total_article_count
                    ),
                    Style::default().fg(C_MUTED).add_modifier(Modifier::DIM),
                ),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for TonightPanel {
    fn default() -> Self {
        Self::new()
    }
}
