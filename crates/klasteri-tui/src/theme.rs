//! Color palette and style constants for the news TUI.
//!
//! Source and category accents come from the product's brand tables. The
//! terminal runs on a dark background, so every accent is passed through the
//! readability adjustment before use.

use klasteri_api::color::{accessible_color, parse_rgb};
use klasteri_api::model::Category;
use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_NIGHT: Color = Color::Rgb(120, 100, 200);
pub const C_ERROR: Color = Color::Rgb(255, 80, 80);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SEPARATOR: Color = Color::Rgb(40, 40, 52);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 40);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_NUMBER_HINT: Color = Color::Rgb(90, 90, 115);
pub const C_FILTER_BG: Color = Color::Rgb(20, 20, 32);
pub const C_FILTER_FG: Color = Color::Rgb(255, 200, 80);
pub const C_RECENT: Color = Color::Rgb(80, 200, 120);
pub const C_PLAYING: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_SEARCH: Color = Color::Rgb(255, 200, 80);

/// Accent used when neither the source nor the category has an entry.
pub const DEFAULT_ACCENT: &str = "#3b82f6";

// ── Brand tables ──────────────────────────────────────────────────────────────

/// Per-source brand colors. Open-ended: a source with no entry falls back to
/// its category color, then to `DEFAULT_ACCENT`.
pub const SOURCE_COLORS: &[(&str, &str)] = &[
    ("Deutsche Welle", "#00A5FF"),
    ("Zëri i Amerikës", "#0033A0"),
    ("Evropa e Lire", "#005EB8"),
    ("Alsat", "#f73434ff"),
    ("RTM2", "#C8102E"),
    ("TV21", "#00D1F2"),
    ("Shenja", "#E60000"),
    ("MIA", "#252525ff"),
    ("Telegrafi", "#ce29c0ff"),
    ("Portalb", "#57804bff"),
    ("Koha", "#0099e6ff"),
    ("BotaSot", "#D50000"),
    ("Zhurnal", "#c63939ff"),
    ("Almakos", "#2E7D32"),
    ("Sloboden Pečat", "#D21114"),
    ("Infoshqip", "#279f24ff"),
    ("Fol", "#444444"),
    ("Info7", "#1A237E"),
    ("Kohanews", "#1F2933"),
    ("Ina Online", "#1d5fc2ff"),
    ("Pressonline", "#37474F"),
    ("Zyrtare", "#263238"),
    ("Telegrami", "#FFCC00"),
    ("Lajm", "#E10600"),
    ("Lideri", "#B71C1C"),
    ("Medial", "#2E7D32"),
    ("Tetova1", "#C62828"),
    ("Tetova Sot", "#a6a6a6ff"),
    ("Aktuale.mk", "#F9A825"),
];

pub fn category_color_hex(category: Category) -> &'static str {
    match category {
        Category::TopOverall => "#1e3a5f",
        Category::Vendi => "#dc5661",
        Category::Rajoni => "#f59e0b",
        Category::Bota => "#8b5cf6",
        Category::Sport => "#10b981",
        Category::Tech => "#06b6d4",
    }
}

/// Resolve the accent for an article: explicit source color, else the
/// category color, else the fixed default — adjusted for the dark terminal.
pub fn source_color(source_name: &str, category: Option<Category>) -> Color {
    let hex = SOURCE_COLORS
        .iter()
        .find(|(name, _)| *name == source_name)
        .map(|(_, hex)| *hex)
        .or(category.map(category_color_hex))
        .unwrap_or(DEFAULT_ACCENT);
    to_tui_color(&accessible_color(hex, true))
}

pub fn category_color(category: Category) -> Color {
    to_tui_color(&accessible_color(category_color_hex(category), true))
}

/// Convert a `#hex` or `rgb(r, g, b)` string to a ratatui color.
pub fn to_tui_color(color: &str) -> Color {
    match parse_rgb(color) {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => C_SECONDARY,
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_selected() -> Style {
    Style::default().bg(C_SELECTION_BG).fg(C_PRIMARY)
}

pub fn style_selected_focused() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_chain_source_category_default() {
        // known source: its own brand color (dark blue, lifted for night)
        assert_ne!(source_color("Koha", None), to_tui_color(DEFAULT_ACCENT));
        // unknown source with a category: the category accent
        assert_eq!(
            source_color("Gazeta e Re", Some(Category::Sport)),
            category_color(Category::Sport)
        );
        // unknown source, no category: the fixed default
        assert_eq!(
            source_color("Gazeta e Re", None),
            to_tui_color(&accessible_color(DEFAULT_ACCENT, true))
        );
    }

    #[test]
    fn dark_brand_colors_are_lifted() {
        // "MIA" is #252525 (luminance ≈ 0.145) — must not render as-is
        let Color::Rgb(r, g, b) = source_color("MIA", None) else {
            panic!("expected rgb color");
        };
        assert!(r > 0x25 && g > 0x25 && b > 0x25);
    }
}
