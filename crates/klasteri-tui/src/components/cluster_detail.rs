//! ClusterDetail — full story view: main article, other sources, card math.

use klasteri_api::model::Category;
use klasteri_api::timefmt;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
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
    theme::{self, category_color, source_color, C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct ClusterDetail {
    /// 0 = main article, 1.. = entries of `other_sources()`.
    selected_source: usize,
    scroll: u16,
}

impl ClusterDetail {
    pub fn new() -> Self {
        Self {
            selected_source: 0,
            scroll: 0,
        }
    }

    pub fn reset(&mut self) {
        self.selected_source = 0;
        self.scroll = 0;
    }

    fn selected_url(&self, state: &AppState) -> Option<String> {
        let cluster = state.cluster.as_ref()?;
        if self.selected_source == 0 {
            cluster.main_article().map(|a| a.url.clone())
        } else {
            cluster
                .other_sources()
                .get(self.selected_source - 1)
                .map(|a| a.url.clone())
        }
    }
}

impl Component for ClusterDetail {
    fn id(&self) -> ComponentId {
        ComponentId::ClusterDetail
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let source_count = state
            .cluster
            .as_ref()
            .map(|c| 1 + c.other_sources().len())
            .unwrap_or(0);
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
                return vec![Action::CloseCluster];
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_source = self.selected_source.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if source_count > 0 && self.selected_source + 1 < source_count {
                    self.selected_source += 1;
                }
            }
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
            KeyCode::PageDown => self.scroll += 5,
            KeyCode::Enter | KeyCode::Char('y') => {
                if let Some(url) = self.selected_url(state) {
                    return vec![Action::CopyToClipboard(url)];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(2),
            MouseEventKind::ScrollDown => self.scroll += 2,
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::OpenCluster(_) = action {
            self.reset();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = match state.cluster_status {
            FetchStatus::Failed => Some(Badge {
                text: "ERR",
                color: theme::C_ERROR,
            }),
            FetchStatus::Loading => Some(Badge {
                text: "…",
                color: C_SECONDARY,
            }),
            _ => None,
        };
        let block = pane_chrome("storja", Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(err) = &state.cluster_error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", err), theme::style_muted()))
                    .wrap(Wrap { trim: false }),
                inner,
            );
            return;
        }
        let Some(cluster) = &state.cluster else {
            frame.render_widget(
                Paragraph::new(Span::styled("  duke u ngarkuar…", theme::style_muted())),
                inner,
            );
            return;
        };

        let category = cluster.category.as_deref().and_then(Category::from_key);
        let mut lines: Vec<Line> = Vec::new();

        // Story header
        let mut title_spans = vec![Span::styled(
            cluster.title.as_str(),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )];
        if let Some(cat) = category {
            title_spans.push(Span::styled(
                format!("  [{}]", cat.label()),
                Style::default().fg(category_color(cat)),
            ));
        }
        lines.push(Line::from(title_spans));
        lines.push(Line::from(Span::styled(
            format!(
                "{} artikuj · përditësuar {}",
                cluster.article_count,
                timefmt::time_ago(&cluster.last_updated, state.now)
            ),
            Style::default().fg(C_MUTED),
        )));
        lines.push(Line::default());

        // Main article
        if let Some(main) = cluster.main_article() {
            let marker = if self.selected_source == 0 { "▶ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(C_SECONDARY)),
                Span::styled(
                    main.source_name.as_str(),
                    Style::default()
                        .fg(source_color(&main.source_name, category))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", timefmt::time_ago(&main.crawled_at, state.now)),
                    Style::default().fg(C_MUTED),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("  {}", main.title),
                theme::style_default(),
            )));
            if let Some(content) = &main.content {
                lines.push(Line::from(Span::styled(
                    format!("  {}", content),
                    Style::default().fg(C_SECONDARY),
                )));
            }
            lines.push(Line::default());
        }

        // Other sources
        let others = cluster.other_sources();
        if !others.is_empty() {
            lines.push(Line::from(Span::styled(
                "burime tjera",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )));
            for (i, article) in others.iter().enumerate() {
                let marker = if self.selected_source == i + 1 {
                    "▶ "
                } else {
                    "  "
                };
                lines.push(Line::from(vec![
                    Span::styled(marker, Style::default().fg(C_SECONDARY)),
                    Span::styled(
                        article.source_name.as_str(),
                        Style::default().fg(source_color(&article.source_name, category)),
                    ),
                    Span::styled(
                        format!("  {}", article.title),
                        Style::default().fg(C_SECONDARY),
                    ),
                ]));
            }
        }
        if cluster.remaining_count() > 0 {
            lines.push(Line::from(Span::styled(
                format!("  + {} lajme tjera", cluster.remaining_count()),
                Style::default().fg(C_MUTED),
            )));
        }

        let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
        if self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            inner,
        );
    }
}

impl Default for ClusterDetail {
    fn default() -> Self {
        Self::new()
    }
}
