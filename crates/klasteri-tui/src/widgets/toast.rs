//! Toast notification system — transient status messages.
//!
//! Fetch errors and clipboard confirmations surface here; a persistent
//! spinner row shows while a foreground fetch is in flight.

use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn color(self) -> ratatui::style::Color {
        match self {
            Self::Info => C_TOAST_INFO,
            Self::Success => C_TOAST_SUCCESS,
            Self::Warning => C_TOAST_WARNING,
            Self::Error => C_TOAST_ERROR,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Success => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
        }
    }

    fn lifetime(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_secs(3),
            Self::Warning => Duration::from_secs(4),
            Self::Error => Duration::from_secs(5),
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const MAX_VISIBLE: usize = 4;

pub struct ToastManager {
    toasts: Vec<Toast>,
    spinner_message: Option<String>,
    spinner_frame: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: Vec::new(),
            spinner_message: None,
            spinner_frame: 0,
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        // Re-pushing the same message restarts its lifetime instead of stacking.
        self.toasts.retain(|t| t.message != message);
        self.toasts.push(Toast {
            expires: Instant::now() + severity.lifetime(),
            message,
            severity,
        });
        if self.toasts.len() > MAX_VISIBLE * 2 {
            self.toasts.remove(0);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    /// Start or replace the persistent spinner row. It animates on every
    /// `tick()` and stays until resolved or dismissed.
    pub fn spinner(&mut self, message: impl Into<String>) {
        self.spinner_message = Some(message.into());
        self.spinner_frame = 0;
    }

    /// Dismiss the spinner and push an expiring toast in its place.
    pub fn resolve_spinner(&mut self, severity: Severity, message: impl Into<String>) {
        self.spinner_message = None;
        self.push(severity, message);
    }

    pub fn dismiss_spinner(&mut self) {
        self.spinner_message = None;
    }

    /// Remove expired toasts and advance the spinner frame. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if self.spinner_message.is_some() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty() && self.spinner_message.is_none()
    }

    /// Render into the top-right corner of `area`, spinner topmost, newest
    /// toast first below it.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60);
        let mut y = area.y + 1;

        let mut rows: Vec<(String, ratatui::style::Color)> = Vec::new();
        if let Some(ref msg) = self.spinner_message {
            rows.push((
                format!(" {} {} ", SPINNER_FRAMES[self.spinner_frame], msg),
                C_TOAST_INFO,
            ));
        }
        for toast in self.toasts.iter().rev().take(MAX_VISIBLE) {
            rows.push((
                format!(" {} {} ", toast.severity.icon(), &toast.message),
                toast.severity.color(),
            ));
        }

        for (text, color) in rows {
            if y >= area.y + area.height {
                break;
            }
            let w = (text.width() as u16 + 1).min(max_width);
            let row = Rect {
                x: area.x + area.width.saturating_sub(w + 1),
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, row);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    text,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))),
                row,
            );
            y += 1;
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolving_the_spinner_swaps_it_for_a_toast() {
        let mut toasts = ToastManager::new();
        toasts.spinner("duke kërkuar…");
        assert!(!toasts.is_empty());

        toasts.resolve_spinner(Severity::Error, "kërkimi dështoi");
        assert!(toasts.spinner_message.is_none());
        assert!(!toasts.is_empty(), "the failure toast replaces the spinner");
    }

    #[test]
    fn repeated_message_does_not_stack() {
        let mut toasts = ToastManager::new();
        toasts.error("Lajmet s'u ngarkuan");
        toasts.error("Lajmet s'u ngarkuan");
        assert_eq!(toasts.toasts.len(), 1);
    }
}
