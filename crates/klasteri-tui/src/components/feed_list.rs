//! FeedList — the main left column: clusters of the active category feed,
//! or the current search results.

use klasteri_api::model::{Category, Cluster};
use klasteri_api::timefmt;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, FetchStatus, View},
    component::Component,
    theme::{
        self, source_color, C_MUTED, C_RECENT, C_SECONDARY,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct FeedList {
    selected: usize,
    scroll: usize,
}

impl FeedList {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll: 0,
        }
    }

    pub fn reset_selection(&mut self) {
        self.selected = 0;
        self.scroll = 0;
    }

    fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn selected_cluster<'a>(&self, state: &'a AppState) -> Option<&'a Cluster> {
        state.visible_clusters().get(self.selected)
    }

    fn row_line<'a>(&self, cluster: &'a Cluster, state: &AppState, selected: bool, focused: bool) -> Line<'a> {
        let main = cluster.main_article();
        let ago = main
            .map(|a| timefmt::time_ago(&a.crawled_at, state.now))
            .unwrap_or_default();
        let recent = main
            .map(|a| timefmt::is_recent(&a.crawled_at, state.now))
            .unwrap_or(false);
        let category = cluster.category.as_deref().and_then(Category::from_key);
        let accent = main
            .map(|a| source_color(&a.source_name, category))
            .unwrap_or(C_SECONDARY);

        let row_style = if selected && focused {
            theme::style_selected_focused()
        } else if selected {
            theme::style_selected()
        } else {
            theme::style_default()
        };

        let mut spans = vec![
            Span::styled(
                if recent { " ● " } else { " · " },
                Style::default().fg(if recent { C_RECENT } else { C_MUTED }),
            ),
            Span::styled(format!("{:>7} ", ago), Style::default().fg(C_SECONDARY)),
            Span::styled("▎", Style::default().fg(accent)),
            Span::styled(cluster.title.as_str(), row_style),
        ];
        if cluster.article_count > 1 {
            spans.push(Span::styled(
                format!(" ({})", cluster.article_count),
                Style::default().fg(C_MUTED),
            ));
        }
        Line::from(spans)
    }
}

impl Component for FeedList {
    fn id(&self) -> ComponentId {
        ComponentId::FeedList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let len = state.visible_clusters().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::PageUp => self.selected = self.selected.saturating_sub(10),
            KeyCode::PageDown => {
                if len > 0 {
                    self.selected = (self.selected + 10).min(len - 1);
                }
            }
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected = len.saturating_sub(1),
            KeyCode::Enter => {
                if let Some(cluster) = self.selected_cluster(state) {
                    return vec![Action::OpenCluster(cluster.id)];
                }
            }
            KeyCode::Char('y') => {
                if let Some(url) = self
                    .selected_cluster(state)
                    .and_then(|c| c.main_article())
                    .map(|a| a.url.clone())
                {
                    return vec![Action::CopyToClipboard(url)];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        let len = state.visible_clusters().len();
        match event.kind {
            MouseEventKind::ScrollUp => self.selected = self.selected.saturating_sub(1),
            MouseEventKind::ScrollDown => {
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                // First click selects, a click on the selected row opens.
                let inner_top = area.y + 1;
                if event.row >= inner_top {
                    let idx = self.scroll + (event.row - inner_top) as usize;
                    if idx < len {
                        if idx == self.selected {
                            if let Some(cluster) = state.visible_clusters().get(idx) {
                                return vec![Action::OpenCluster(cluster.id)];
                            }
                        }
                        self.selected = idx;
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::SwitchCategory(_) | Action::SubmitSearch(_) | Action::CloseSearch => {
                self.reset_selection();
            }
            Action::SelectUp(n) => self.selected = self.selected.saturating_sub(*n),
            Action::SelectDown(n) => {
                let len = state.visible_clusters().len();
                if len > 0 {
                    self.selected = (self.selected + n).min(len - 1);
                }
            }
            Action::SelectFirst => self.selected = 0,
            Action::SelectLast => {
                self.selected = state.visible_clusters().len().saturating_sub(1);
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let clusters = state.visible_clusters();
        self.clamp(clusters.len());

        let title = match state.view {
            View::Search => "rezultatet".to_string(),
            _ => state.category.label().to_lowercase(),
        };
        let badge = match state.feed_status {
            FetchStatus::Failed => Some(Badge {
                text: "ERR",
                color: theme::C_ERROR,
            }),
            FetchStatus::Loading => Some(Badge {
                text: "…",
                color: theme::C_SECONDARY,
            }),
            _ => None,
        };
        let block = pane_chrome(&title, Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if clusters.is_empty() {
            let msg = match state.feed_status {
                FetchStatus::Loading => "duke u ngarkuar…",
                FetchStatus::Failed => "s'u ngarkuan lajmet — r për rifreskim",
                _ => "asnjë lajm",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", msg), theme::style_muted())),
                inner,
            );
            return;
        }

        // Keep the selection in view.
        let height = inner.height as usize;
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if height > 0 && self.selected >= self.scroll + height {
            self.scroll = self.selected + 1 - height;
        }

        let lines: Vec<Line> = clusters
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(height)
            .map(|(i, c)| self.row_line(c, state, i == self.selected, focused))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        // Scroll position indicator in the bottom border.
        if clusters.len() > height && inner.width > 10 {
            let pos = format!(" {}/{} ", self.selected + 1, clusters.len());
            let x = area.x + area.width - 2 - pos.width() as u16;
            let y = area.y + area.height - 1;
            frame.render_widget(
                Paragraph::new(Span::styled(pos, Style::default().fg(C_MUTED).add_modifier(Modifier::DIM))),
                Rect::new(x, y, area.width.saturating_sub(x - area.x), 1),
            );
        }
    }
}

impl Default for FeedList {
    fn default() -> Self {
        Self::new()
    }
}
